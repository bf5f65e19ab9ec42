use std::sync::Arc;

use eduhub_core::model::{Test, TestResult};
use storage::LocalStore;

use crate::error::SessionError;

/// Storage key of the last submitted test definition.
pub const LAST_TEST_KEY: &str = "test";
/// Storage key of the last graded result.
pub const LAST_RESULT_KEY: &str = "testResults";

/// The last graded attempt, kept so the result page survives a restart.
#[derive(Clone)]
pub struct ResultCache {
    store: Arc<dyn LocalStore>,
}

impl ResultCache {
    #[must_use]
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    /// # Errors
    ///
    /// Returns `SessionError::Encoding` or `SessionError::Storage`.
    pub async fn store(&self, test: &Test, result: &TestResult) -> Result<(), SessionError> {
        let test = serde_json::to_string(test)?;
        let result = serde_json::to_string(result)?;
        self.store.set_item(LAST_TEST_KEY, &test).await?;
        self.store.set_item(LAST_RESULT_KEY, &result).await?;
        Ok(())
    }

    /// Both halves of the cached pair, or `None` when either is missing or stale.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the store cannot be read.
    pub async fn load(&self) -> Result<Option<(Test, TestResult)>, SessionError> {
        let test = self.store.get_item(LAST_TEST_KEY).await?;
        let result = self.store.get_item(LAST_RESULT_KEY).await?;
        let (Some(test), Some(result)) = (test, result) else {
            return Ok(None);
        };

        let decoded = serde_json::from_str::<Test>(&test).and_then(|test| {
            serde_json::from_str::<TestResult>(&result).map(|result| (test, result))
        });
        match decoded {
            Ok((test, result)) if result.test_id() == &test.id => Ok(Some((test, result))),
            Ok((test, result)) => {
                tracing::warn!(
                    test = %test.id,
                    result = %result.test_id(),
                    "cached result does not match cached test"
                );
                self.clear().await?;
                Ok(None)
            }
            Err(err) => {
                tracing::warn!(error = %err, "discarding unreadable cached result");
                self.clear().await?;
                Ok(None)
            }
        }
    }

    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the records cannot be removed.
    pub async fn clear(&self) -> Result<(), SessionError> {
        self.store.remove_item(LAST_TEST_KEY).await?;
        self.store.remove_item(LAST_RESULT_KEY).await?;
        Ok(())
    }
}
