use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use tracing::{error, info, warn};

use crate::browser::driver::Driver;
use crate::browser::session::{PageSession, SessionConfig};
use crate::browser::webdriver::{BrowserOptions, WebDriverClient};
use crate::error::{Error, Result};
use crate::scenario::context::ScenarioContext;
use crate::scenario::scenario_model::{Expectation, Scenario, ScenarioData, TestResult, TestStatus};

/// Opens one fresh browser per scenario.
pub trait SessionFactory {
    fn open(&mut self) -> Result<Box<dyn Driver>>;
}

/// Opens W3C WebDriver sessions.
#[derive(Debug, Clone)]
pub struct WebDriverFactory {
    options: BrowserOptions,
}

impl WebDriverFactory {
    pub fn new(options: BrowserOptions) -> Self {
        Self { options }
    }
}

impl SessionFactory for WebDriverFactory {
    fn open(&mut self) -> Result<Box<dyn Driver>> {
        Ok(Box::new(WebDriverClient::launch(&self.options)?))
    }
}

/// Runs scenarios one at a time, each in its own browser session.
pub struct ScenarioRunner<F: SessionFactory> {
    factory: F,
    session_config: SessionConfig,
    data: ScenarioData,
}

impl<F: SessionFactory> ScenarioRunner<F> {
    pub fn new(factory: F, session_config: SessionConfig, data: ScenarioData) -> Self {
        Self {
            factory,
            session_config,
            data,
        }
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Run every scenario in order.
    pub fn run_all<'a>(&mut self, scenarios: impl IntoIterator<Item = &'a Scenario>) -> Vec<TestResult> {
        scenarios.into_iter().map(|s| self.run(s)).collect()
    }

    /// Run one scenario. The session is released exactly once whatever
    /// the body does, including panicking.
    pub fn run(&mut self, scenario: &Scenario) -> TestResult {
        info!(scenario = scenario.name, "running scenario");
        let start = Instant::now();

        let driver = match self.factory.open() {
            Ok(driver) => driver,
            Err(e) => {
                error!(scenario = scenario.name, error = %e, "could not open browser session");
                return Self::finish(scenario, start, Err(e.to_string()), None);
            }
        };

        let session = PageSession::new(driver, self.session_config.clone());
        let mut ctx = ScenarioContext::new(session, self.data.clone());

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| (scenario.run)(&mut ctx)));
        let body = match outcome {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                if e.is_outcome_mismatch() {
                    info!(scenario = scenario.name, error = %e, "check failed");
                } else {
                    warn!(scenario = scenario.name, error = %e, "scenario aborted");
                }
                Err(e.to_string())
            }
            Err(payload) => Err(format!("scenario panicked: {}", panic_message(payload.as_ref()))),
        };

        if body.is_err() {
            ctx.screenshot(&format!("{}_failure", scenario.name));
        }
        if let Err(e) = ctx.session.release() {
            warn!(scenario = scenario.name, error = %e, "session release failed");
        }

        Self::finish(scenario, start, body, Some(ctx))
    }

    fn finish(
        scenario: &Scenario,
        start: Instant,
        body: std::result::Result<(), String>,
        ctx: Option<ScenarioContext>,
    ) -> TestResult {
        let status = TestStatus::classify(&scenario.expectation, body.is_ok());
        let xfail_reason = match scenario.expectation {
            Expectation::KnownDefect { reason } => Some(reason.to_string()),
            Expectation::Pass => None,
        };
        let (steps_run, assertion_results, screenshots) = match ctx {
            Some(ctx) => (
                ctx.checks.steps_run(),
                ctx.checks.assertion_results.clone(),
                ctx.session.screenshots().to_vec(),
            ),
            None => (0, Vec::new(), Vec::new()),
        };

        match status {
            TestStatus::Passed => info!(scenario = scenario.name, "passed"),
            TestStatus::ExpectedFailure => info!(scenario = scenario.name, "failed as expected"),
            TestStatus::UnexpectedPass => {
                warn!(scenario = scenario.name, "known defect scenario passed unexpectedly")
            }
            TestStatus::Failed => {
                let reason = body.as_ref().err().map(String::as_str).unwrap_or("check failed");
                warn!(scenario = scenario.name, reason, "failed")
            }
        }

        TestResult {
            scenario_name: scenario.name.to_string(),
            status,
            passed: !status.is_failure(),
            xfail_reason,
            steps_run,
            assertion_results,
            error: body.err(),
            duration_ms: start.elapsed().as_millis(),
            screenshots,
        }
    }
}

/// Pick scenarios by name, keeping catalog order. Unknown names are an error.
pub fn select<'a>(catalog: &'a [Scenario], names: &[String]) -> Result<Vec<&'a Scenario>> {
    if names.is_empty() {
        return Ok(catalog.iter().collect());
    }
    let unknown: Vec<&str> = names
        .iter()
        .filter(|n| !catalog.iter().any(|s| s.name == n.as_str()))
        .map(String::as_str)
        .collect();
    if !unknown.is_empty() {
        return Err(Error::Config(format!(
            "unknown scenario(s): {}",
            unknown.join(", ")
        )));
    }
    Ok(catalog
        .iter()
        .filter(|s| names.iter().any(|n| n == s.name))
        .collect())
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
