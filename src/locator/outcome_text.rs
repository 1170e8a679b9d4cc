use std::time::{Duration, Instant};

use crate::browser::driver::Driver;
use crate::locator::locator_model::{Locator, Target};
use crate::target;

/// Alert containers used by the storefront theme for success and warning banners.
pub const ALERT_CONTAINERS: Target = target!(
    "ALERT_CONTAINERS",
    [Locator::css(
        ".alert, .alert-success, .alert-danger, .alert-warning, .alert-dismissible"
    )]
);

/// Main content region, scanned when no alert is present.
pub const MAIN_CONTENT: Target = target!("MAIN_CONTENT", [Locator::css("#content")]);

const CLOSE_GLYPH: char = '\u{00D7}';

/// Strip the dismiss glyph and surrounding whitespace from banner text.
pub fn clean_alert_text(raw: &str) -> String {
    raw.replace(CLOSE_GLYPH, "").trim().to_string()
}

/// Concatenate the text of every alert container currently in the DOM.
///
/// Returns an empty string when no container has text.
pub fn alert_text(driver: &mut dyn Driver) -> String {
    let mut texts = Vec::new();
    for locator in ALERT_CONTAINERS.candidates() {
        let Ok(elements) = driver.find_elements(locator) else {
            continue;
        };
        for el in elements {
            if let Ok(text) = driver.text(&el) {
                let cleaned = clean_alert_text(&text);
                if !cleaned.is_empty() {
                    texts.push(cleaned);
                }
            }
        }
    }
    texts.join(" ")
}

/// Alert text, or the main content text when there is no alert.
pub fn success_or_warning_text(driver: &mut dyn Driver) -> String {
    let alerts = alert_text(driver);
    if !alerts.is_empty() {
        return alerts;
    }
    for locator in MAIN_CONTENT.candidates() {
        if let Ok(elements) = driver.find_elements(locator) {
            if let Some(first) = elements.first() {
                return driver
                    .text(first)
                    .map(|t| t.trim().to_string())
                    .unwrap_or_default();
            }
        }
    }
    String::new()
}

/// Poll for an alert banner until `timeout` elapses, then fall back to
/// `success_or_warning_text`.
pub fn wait_for_outcome_text(driver: &mut dyn Driver, timeout: Duration, poll: Duration) -> String {
    let deadline = Instant::now() + timeout;
    loop {
        let text = alert_text(driver);
        if !text.is_empty() {
            return text;
        }
        let now = Instant::now();
        if now >= deadline {
            return success_or_warning_text(driver);
        }
        std::thread::sleep(poll.min(deadline - now));
    }
}
