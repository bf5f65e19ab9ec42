use crate::grading::round2;
use crate::model::TestResult;

/// Average above which a student's results are shown as good.
pub const GOOD_AVERAGE: f64 = 18.0;

/// Aggregate figures over a student's completed tests in a course.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultStatistics {
    pub count: usize,
    pub passed: usize,
    pub average_score: f64,
    pub highest_score: f64,
    pub lowest_score: f64,
    pub average_minutes: f64,
    mean_score: f64,
}

impl ResultStatistics {
    /// Returns `None` when there is nothing to aggregate.
    #[must_use]
    pub fn from_results(results: &[TestResult]) -> Option<Self> {
        if results.is_empty() {
            return None;
        }

        let mut total_score = 0.0;
        let mut total_secs = 0.0;
        let mut highest = f64::MIN;
        let mut lowest = f64::MAX;
        let mut passed = 0;
        for result in results {
            total_score += result.score();
            total_secs += result.duration_secs();
            highest = highest.max(result.score());
            lowest = lowest.min(result.score());
            if result.passed() {
                passed += 1;
            }
        }

        #[allow(clippy::cast_precision_loss)]
        let count = results.len() as f64;
        let mean_score = total_score / count;
        Some(Self {
            count: results.len(),
            passed,
            average_score: round2(mean_score),
            highest_score: highest,
            lowest_score: lowest,
            average_minutes: round2(total_secs / count / 60.0),
            mean_score,
        })
    }

    /// Judged on the unrounded mean.
    #[must_use]
    pub fn is_good(&self) -> bool {
        self.mean_score > GOOD_AVERAGE
    }
}
