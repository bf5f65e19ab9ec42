use eduhub_core::model::{Test, TestResult};
use eduhub_core::stats::{GOOD_AVERAGE, ResultStatistics};
use services::CourseOverview;

use crate::vm::time_fmt::{format_minutes, format_score};

pub const NO_RESULTS: &str = "No test results available.";
pub const EMPTY_LIST: &str = "This list is empty";
pub const TESTS_UNAVAILABLE: &str = "Could not load the tests of this course.";
pub const RESULTS_UNAVAILABLE: &str = "Could not load your completed tests.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatisticsVm {
    pub average: String,
    pub average_class: &'static str,
    pub highest: String,
    pub lowest: String,
    pub average_time: String,
    pub passed: String,
}

#[must_use]
pub fn map_statistics(stats: &ResultStatistics) -> StatisticsVm {
    StatisticsVm {
        average: format_score(stats.average_score),
        average_class: if stats.is_good() { "pass" } else { "fail" },
        highest: format_score(stats.highest_score),
        lowest: format_score(stats.lowest_score),
        average_time: format_minutes(stats.average_minutes),
        passed: format!("{} of {}", stats.passed, stats.count),
    }
}

/// A test the user can take.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CourseTestRowVm {
    pub test_id: String,
    pub title: String,
    pub details: String,
}

/// A graded attempt; `test` is set when the course still lists the test.
#[derive(Clone, Debug, PartialEq)]
pub struct CompletedRowVm {
    pub result: TestResult,
    pub test: Option<Test>,
    pub title: String,
    pub label: String,
    pub score_class: &'static str,
}

/// `None` for a listing that could not be loaded.
#[derive(Clone, Debug, PartialEq)]
pub struct CourseVm {
    pub course_id: String,
    pub tests: Option<Vec<CourseTestRowVm>>,
    pub completed: Option<Vec<CompletedRowVm>>,
    pub statistics: Option<StatisticsVm>,
}

fn map_test_row(test: &Test) -> CourseTestRowVm {
    CourseTestRowVm {
        test_id: test.id.to_string(),
        title: test.title.clone(),
        details: format!(
            "{} questions, {} minutes",
            test.questions.len(),
            test.available_minutes
        ),
    }
}

fn map_completed_row(overview: &CourseOverview, result: &TestResult) -> CompletedRowVm {
    let test = overview.test_for(result).cloned();
    let title = if !result.title().is_empty() {
        result.title().to_string()
    } else if let Some(test) = &test {
        test.title.clone()
    } else {
        result.test_id().to_string()
    };
    let verdict = if result.passed() { "Passed" } else { "Failed" };
    CompletedRowVm {
        label: format!("{} ({verdict})", format_score(result.score())),
        score_class: if result.score() > GOOD_AVERAGE { "pass" } else { "fail" },
        result: result.clone(),
        test,
        title,
    }
}

#[must_use]
pub fn map_course(overview: &CourseOverview) -> CourseVm {
    CourseVm {
        course_id: overview.course_id.to_string(),
        tests: overview
            .tests
            .as_ref()
            .map(|tests| tests.iter().map(map_test_row).collect()),
        completed: overview.results.as_ref().map(|results| {
            results
                .iter()
                .map(|result| map_completed_row(overview, result))
                .collect()
        }),
        statistics: overview.statistics.as_ref().map(map_statistics),
    }
}
