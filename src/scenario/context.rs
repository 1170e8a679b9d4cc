use tracing::{debug, info};

use crate::browser::session::PageSession;
use crate::error::{Error, Result};
use crate::scenario::scenario_model::{AssertionResult, CheckSpec, ScenarioData};

/// Everything a scenario body works with.
pub struct ScenarioContext {
    pub session: PageSession,
    pub data: ScenarioData,
    pub checks: Checks,
}

impl ScenarioContext {
    pub fn new(session: PageSession, data: ScenarioData) -> Self {
        Self {
            session,
            data,
            checks: Checks::new(),
        }
    }

    /// Start the next scenario step.
    pub fn step(&mut self, label: &str) {
        self.checks.advance();
        info!(step = self.checks.current_step, label, "step");
    }

    /// Save a screenshot named after the step. Best effort.
    pub fn screenshot(&mut self, label: &str) {
        self.session.screenshot(label);
    }
}

/// Records check results; a failed check ends the scenario with
/// `Error::OutcomeMismatch`.
#[derive(Debug, Clone)]
pub struct Checks {
    /// Current step index (0-based)
    pub current_step: usize,

    pub assertion_results: Vec<AssertionResult>,

    started: bool,
}

impl Checks {
    pub fn new() -> Self {
        Checks {
            current_step: 0,
            assertion_results: Vec::new(),
            started: false,
        }
    }

    /// Advance to the next step. The first call selects step 0.
    pub fn advance(&mut self) {
        if self.started {
            self.current_step += 1;
        }
        self.started = true;
    }

    /// Number of steps started so far.
    pub fn steps_run(&self) -> usize {
        if self.started { self.current_step + 1 } else { 0 }
    }

    fn record(&mut self, spec: CheckSpec, passed: bool, actual: String) -> Result<()> {
        let message = (!passed).then(|| format!("expected {}, observed '{}'", spec.expected(), actual));
        debug!(check = spec.kind(), passed, "check");
        self.assertion_results.push(AssertionResult {
            step_index: self.current_step,
            spec: spec.clone(),
            passed,
            actual: Some(actual.clone()),
            message,
        });
        if passed {
            Ok(())
        } else {
            Err(Error::OutcomeMismatch {
                check: spec.kind().to_string(),
                expected: spec.expected(),
                actual,
            })
        }
    }

    pub fn url_contains(&mut self, url: &str, expected: &str) -> Result<()> {
        let passed = url.contains(expected);
        self.record(
            CheckSpec::UrlContains {
                expected: expected.to_string(),
            },
            passed,
            url.to_string(),
        )
    }

    pub fn url_contains_any(&mut self, url: &str, expected: &[&str]) -> Result<()> {
        let passed = expected.iter().any(|e| url.contains(e));
        self.record(
            CheckSpec::UrlContainsAny {
                expected: expected.iter().map(|e| e.to_string()).collect(),
            },
            passed,
            url.to_string(),
        )
    }

    pub fn text_contains(&mut self, text: &str, expected: &str, case_sensitive: bool) -> Result<()> {
        let passed = if case_sensitive {
            text.contains(expected)
        } else {
            text.to_lowercase().contains(&expected.to_lowercase())
        };
        self.record(
            CheckSpec::TextContains {
                expected: expected.to_string(),
                case_sensitive,
            },
            passed,
            text.to_string(),
        )
    }

    /// Case-insensitive: passes when any of `expected` occurs in `text`.
    pub fn text_contains_any(&mut self, text: &str, expected: &[&str]) -> Result<()> {
        let lower = text.to_lowercase();
        let passed = expected.iter().any(|e| lower.contains(&e.to_lowercase()));
        self.record(
            CheckSpec::TextContainsAny {
                expected: expected.iter().map(|e| e.to_string()).collect(),
            },
            passed,
            text.to_string(),
        )
    }

    pub fn count_at_least(&mut self, what: &str, count: usize, minimum: usize) -> Result<()> {
        self.record(
            CheckSpec::CountAtLeast {
                what: what.to_string(),
                minimum,
            },
            count >= minimum,
            count.to_string(),
        )
    }

    pub fn holds(&mut self, description: &str, condition: bool, actual: impl Into<String>) -> Result<()> {
        self.record(
            CheckSpec::Holds {
                description: description.to_string(),
            },
            condition,
            actual.into(),
        )
    }

    pub fn all_passed(&self) -> bool {
        self.assertion_results.iter().all(|r| r.passed)
    }

    pub fn pass_count(&self) -> usize {
        self.assertion_results.iter().filter(|r| r.passed).count()
    }

    pub fn fail_count(&self) -> usize {
        self.assertion_results.iter().filter(|r| !r.passed).count()
    }

    pub fn total_count(&self) -> usize {
        self.assertion_results.len()
    }
}

impl Default for Checks {
    fn default() -> Self {
        Self::new()
    }
}
