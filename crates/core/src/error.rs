use thiserror::Error;

use crate::grading::GradingError;
use crate::model::{AttemptError, ResultError, TestError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Test(#[from] TestError),
    #[error(transparent)]
    Attempt(#[from] AttemptError),
    #[error(transparent)]
    Result(#[from] ResultError),
    #[error(transparent)]
    Grading(#[from] GradingError),
}
