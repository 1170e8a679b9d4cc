use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::browser::driver::Driver;
use crate::locator::action::{Action, act};
use crate::locator::locator_model::Locator;

/// Cookie-consent and banner dismiss controls, most specific first.
pub const CONSENT_DISMISS: &[Locator] = &[
    Locator::css("button.cc-allow"),
    Locator::css(".cc-btn"),
    Locator::css(".cookie-accept"),
    Locator::css(".cookie-consent__accept"),
    Locator::css("button.cookie-accept"),
    Locator::css("button[aria-label='close']"),
    Locator::css("button[title*='Accept']"),
    Locator::css("button[title*='Close']"),
    Locator::css("a.cookie-accept"),
    Locator::css(".accept-cookies"),
    Locator::css(".agree"),
    Locator::css(".banner-close"),
    Locator::css(".close-cookie"),
    Locator::css("button#accept-cookies"),
];

/// Generic modal close controls, probed only when no consent control exists.
pub const MODAL_DISMISS: &[Locator] = &[
    Locator::css("[data-dismiss='modal']"),
    Locator::css("button.close"),
    Locator::css(".modal-close"),
];

pub const DEFAULT_READY_TIMEOUT: Duration = Duration::from_secs(3);

const READY_POLL: Duration = Duration::from_millis(100);

/// What the dismissal pass did. Informational only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dismissal {
    Dismissed { locator: Locator, clicked: usize },
    NothingFound,
}

/// Poll `document.readyState` until it is `complete` or `timeout` elapses.
pub fn wait_for_ready(driver: &mut dyn Driver, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if let Ok(state) = driver.ready_state() {
            if state == "complete" {
                return true;
            }
        }
        let now = Instant::now();
        if now >= deadline {
            return false;
        }
        std::thread::sleep(READY_POLL.min(deadline - now));
    }
}

/// Best-effort dismissal of consent banners and modals.
///
/// Never fails: every error is swallowed, and an absent overlay is the
/// normal case.
pub fn dismiss_overlays(driver: &mut dyn Driver, ready_timeout: Duration) -> Dismissal {
    if !wait_for_ready(driver, ready_timeout) {
        trace!("document not complete before overlay probe");
    }

    for group in [CONSENT_DISMISS, MODAL_DISMISS] {
        if let Some(dismissal) = dismiss_first(driver, group) {
            debug!(?dismissal, "overlay dismissed");
            return dismissal;
        }
    }
    Dismissal::NothingFound
}

fn dismiss_first(driver: &mut dyn Driver, group: &[Locator]) -> Option<Dismissal> {
    for locator in group {
        let elements = match driver.find_elements(locator) {
            Ok(elements) if !elements.is_empty() => elements,
            _ => continue,
        };

        let clicked = elements
            .iter()
            .filter(|el| act(driver, el, &Action::Click).succeeded())
            .count();

        return Some(Dismissal::Dismissed {
            locator: locator.clone(),
            clicked,
        });
    }
    None
}
