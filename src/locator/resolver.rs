use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::browser::driver::{Driver, ElementRef};
use crate::error::{Error, Result};
use crate::locator::locator_model::{Locator, Target};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Total budget for a lookup and the pause between sweeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl WaitPolicy {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT, DEFAULT_POLL_INTERVAL)
    }
}

/// What counts as "present" for a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Presence {
    /// Attached to the DOM
    #[default]
    Attached,
    /// Attached and rendered
    Displayed,
}

/// The element set a target resolved to, and which candidate produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    target: String,
    index: usize,
    locator: Locator,
    elements: Vec<ElementRef>,
}

impl Resolved {
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Zero-based position of the matching candidate in the target's list.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    /// Whether a lower-priority candidate had to be used.
    pub fn used_fallback(&self) -> bool {
        self.index > 0
    }

    /// First matching element. Never empty.
    pub fn first(&self) -> &ElementRef {
        &self.elements[0]
    }

    pub fn elements(&self) -> &[ElementRef] {
        &self.elements
    }

    pub fn into_elements(self) -> Vec<ElementRef> {
        self.elements
    }
}

/// One sweep over the candidates, in priority order, without waiting.
///
/// A driver error on a candidate counts as "absent" for this sweep.
pub fn probe(driver: &mut dyn Driver, target: &Target, presence: Presence) -> Option<Resolved> {
    for (index, locator) in target.candidates().iter().enumerate() {
        let found = match driver.find_elements(locator) {
            Ok(found) => found,
            Err(e) => {
                trace!(target_name = %target, %locator, error = %e, "candidate probe failed");
                continue;
            }
        };

        let elements: Vec<ElementRef> = match presence {
            Presence::Attached => found,
            Presence::Displayed => found
                .into_iter()
                .filter(|el| driver.is_displayed(el).unwrap_or(false))
                .collect(),
        };

        if !elements.is_empty() {
            return Some(Resolved {
                target: target.name().to_string(),
                index,
                locator: locator.clone(),
                elements,
            });
        }
    }
    None
}

/// Resolve `target` within the policy's budget.
///
/// Every sweep checks all candidates in order, so an earlier candidate that
/// is present always wins over a later one.
pub fn locate(
    driver: &mut dyn Driver,
    target: &Target,
    policy: &WaitPolicy,
    presence: Presence,
) -> Result<Resolved> {
    let start = Instant::now();
    let deadline = start + policy.timeout;

    loop {
        if let Some(resolved) = probe(driver, target, presence) {
            if resolved.used_fallback() {
                debug!(
                    target_name = %target,
                    candidate = resolved.index(),
                    locator = %resolved.locator(),
                    "resolved via fallback candidate"
                );
            }
            return Ok(resolved);
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(Error::NotFound {
                target: target.name().to_string(),
                waited_ms: start.elapsed().as_millis(),
                tried: target.candidates().len(),
            });
        }
        std::thread::sleep(policy.poll_interval.min(deadline - now));
    }
}

/// Resolve an optional target: `None` when it never shows up.
pub fn try_locate(
    driver: &mut dyn Driver,
    target: &Target,
    policy: &WaitPolicy,
    presence: Presence,
) -> Option<Resolved> {
    match locate(driver, target, policy, presence) {
        Ok(resolved) => Some(resolved),
        Err(e) => {
            debug!(target_name = %target, error = %e, "optional target absent");
            None
        }
    }
}
