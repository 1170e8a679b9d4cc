use serde::{Deserialize, Serialize};

use crate::scenario::scenario_model::{TestResult, TestStatus};

// ============================================================================
// Test suite report: aggregates multiple TestResult instances
// ============================================================================

/// Aggregated report for a suite of scenario runs.
///
/// Built from a `Vec<TestResult>` via `from_results()`. Consumed by
/// console, HTML, and JUnit reporters to produce human-readable output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuiteReport {
    /// Name of the test suite
    pub suite_name: String,

    /// Total number of scenarios
    pub total: usize,

    /// Scenarios that passed
    pub passed: usize,

    /// Scenarios that failed unexpectedly
    pub failed: usize,

    /// Known-defect scenarios that failed as expected
    pub xfailed: usize,

    /// Known-defect scenarios that passed
    pub xpassed: usize,

    /// Total execution duration in milliseconds (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u128>,

    /// Individual scenario results
    pub test_results: Vec<TestResult>,
}

impl TestSuiteReport {
    /// Build a suite report from a list of scenario results.
    pub fn from_results(suite_name: &str, results: Vec<TestResult>) -> Self {
        let count = |status: TestStatus| results.iter().filter(|r| r.status == status).count();
        Self {
            suite_name: suite_name.to_string(),
            total: results.len(),
            passed: count(TestStatus::Passed),
            failed: count(TestStatus::Failed),
            xfailed: count(TestStatus::ExpectedFailure),
            xpassed: count(TestStatus::UnexpectedPass),
            duration_ms: None,
            test_results: results,
        }
    }

    /// Set the total execution duration.
    pub fn with_duration(mut self, duration_ms: u128) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Whether no scenario failed unexpectedly. XFAIL and XPASS do not count.
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}
