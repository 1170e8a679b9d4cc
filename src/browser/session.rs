use std::path::PathBuf;
use std::time::{Duration, Instant};

use serde_json::json;
use tracing::{debug, info, warn};

use crate::browser::driver::{Driver, ElementRef, SCRIPT_SCROLL_BY, SCRIPT_SCROLL_TO_BOTTOM};
use crate::browser::screenshot::ScreenshotWriter;
use crate::error::{Error, Result};
use crate::locator::action::{Action, Outcome, act};
use crate::locator::locator_model::{Locator, Target};
use crate::locator::outcome_text;
use crate::locator::overlay::{self, Dismissal};
use crate::locator::resolver::{self, Presence, Resolved, WaitPolicy};

/// Per-session settings injected by the runner.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Site root, e.g. `https://ecommerce-playground.lambdatest.io/`
    pub base_url: String,
    /// Default budget for required lookups
    pub default_wait: Duration,
    pub poll_interval: Duration,
    /// Budget for the ready-state wait before overlay dismissal
    pub overlay_wait: Duration,
    /// Screenshot directory; None disables screenshots
    pub screenshot_dir: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://ecommerce-playground.lambdatest.io/".to_string(),
            default_wait: resolver::DEFAULT_TIMEOUT,
            poll_interval: resolver::DEFAULT_POLL_INTERVAL,
            overlay_wait: overlay::DEFAULT_READY_TIMEOUT,
            screenshot_dir: None,
        }
    }
}

/// A browser session bound to a base address and a default wait.
///
/// Created per scenario and released exactly once, either explicitly through
/// [`PageSession::release`] or on drop.
pub struct PageSession {
    driver: Box<dyn Driver>,
    config: SessionConfig,
    screenshots: Option<ScreenshotWriter>,
    captured: Vec<PathBuf>,
    released: bool,
}

impl PageSession {
    pub fn new(driver: Box<dyn Driver>, config: SessionConfig) -> Self {
        let screenshots = config.screenshot_dir.clone().map(ScreenshotWriter::new);
        Self {
            driver,
            config,
            screenshots,
            captured: Vec::new(),
            released: false,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Direct access to the driver for page-specific scripting.
    pub fn driver(&mut self) -> &mut dyn Driver {
        self.driver.as_mut()
    }

    pub fn wait_policy(&self) -> WaitPolicy {
        WaitPolicy::new(self.config.default_wait, self.config.poll_interval)
    }

    pub fn policy_for(&self, timeout: Duration) -> WaitPolicy {
        self.wait_policy().with_timeout(timeout)
    }

    /// Absolute URL for a site-relative path. An empty path is the site root.
    pub fn url_for(&self, path: &str) -> String {
        join_url(&self.config.base_url, path)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.released {
            return Err(Error::SessionReleased);
        }
        Ok(())
    }

    // ---- navigation ----

    /// Navigate to `path` under the base URL and wait for the document.
    pub fn visit(&mut self, path: &str) -> Result<()> {
        self.ensure_open()?;
        let url = self.url_for(path);
        debug!(%url, "visit");
        self.driver.navigate(&url)?;
        self.wait_for_ready(self.config.default_wait);
        Ok(())
    }

    /// Navigate to an absolute URL.
    pub fn navigate(&mut self, url: &str) -> Result<()> {
        self.ensure_open()?;
        self.driver.navigate(url)?;
        self.wait_for_ready(self.config.default_wait);
        Ok(())
    }

    pub fn wait_for_ready(&mut self, timeout: Duration) -> bool {
        if self.released {
            return false;
        }
        overlay::wait_for_ready(self.driver.as_mut(), timeout)
    }

    pub fn dismiss_overlays(&mut self) -> Dismissal {
        if self.released {
            return Dismissal::NothingFound;
        }
        overlay::dismiss_overlays(self.driver.as_mut(), self.config.overlay_wait)
    }

    pub fn current_url(&mut self) -> Result<String> {
        self.ensure_open()?;
        self.driver.current_url()
    }

    pub fn title(&mut self) -> Result<String> {
        self.ensure_open()?;
        self.driver.title()
    }

    pub fn page_source(&mut self) -> Result<String> {
        self.ensure_open()?;
        self.driver.page_source()
    }

    /// Rendered text of `<body>`, empty when it cannot be read.
    pub fn body_text(&mut self) -> String {
        if self.released {
            return String::new();
        }
        let Ok(bodies) = self.driver.find_elements(&Locator::tag("body")) else {
            return String::new();
        };
        match bodies.first() {
            Some(body) => self.driver.text(body).unwrap_or_default(),
            None => String::new(),
        }
    }

    /// Poll until the current URL contains `fragment` (case-insensitive).
    pub fn wait_until_url_contains(&mut self, fragment: &str, timeout: Duration) -> bool {
        let wanted = fragment.to_lowercase();
        self.poll_until(timeout, |session| {
            session
                .driver
                .current_url()
                .map(|u| u.to_lowercase().contains(&wanted))
                .unwrap_or(false)
        })
    }

    /// Poll until the body text contains `needle`.
    pub fn wait_for_text_in_body(&mut self, needle: &str, timeout: Duration) -> bool {
        self.poll_until(timeout, |session| session.body_text().contains(needle))
    }

    /// Poll `condition` until it holds or `timeout` elapses. Always false
    /// on a released session.
    pub fn poll_until(&mut self, timeout: Duration, mut condition: impl FnMut(&mut Self) -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if self.released {
                return false;
            }
            if condition(self) {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            std::thread::sleep(self.config.poll_interval.min(deadline - now));
        }
    }

    // ---- location ----

    /// Resolve a required target within the default wait.
    pub fn locate(&mut self, target: &Target) -> Result<Resolved> {
        self.locate_within(target, self.config.default_wait)
    }

    pub fn locate_within(&mut self, target: &Target, timeout: Duration) -> Result<Resolved> {
        self.ensure_open()?;
        let policy = self.policy_for(timeout);
        resolver::locate(self.driver.as_mut(), target, &policy, Presence::Attached)
    }

    /// Resolve a target that must also be rendered.
    pub fn locate_visible(&mut self, target: &Target, timeout: Duration) -> Result<Resolved> {
        self.ensure_open()?;
        let policy = self.policy_for(timeout);
        resolver::locate(self.driver.as_mut(), target, &policy, Presence::Displayed)
    }

    /// Resolve an optional target; `None` signals the degraded path.
    pub fn find_optional(&mut self, target: &Target, timeout: Duration) -> Option<Resolved> {
        if self.released {
            return None;
        }
        let policy = self.policy_for(timeout);
        resolver::try_locate(self.driver.as_mut(), target, &policy, Presence::Attached)
    }

    /// All elements of the first present candidate, without waiting.
    pub fn find_now(&mut self, target: &Target) -> Vec<ElementRef> {
        if self.released {
            return Vec::new();
        }
        resolver::probe(self.driver.as_mut(), target, Presence::Attached)
            .map(Resolved::into_elements)
            .unwrap_or_default()
    }

    // ---- interaction ----

    /// Perform `action` on an already-resolved element.
    pub fn act_on(&mut self, element: &ElementRef, target_name: &str, action: Action<'_>) -> Result<Outcome> {
        self.ensure_open()?;
        act(self.driver.as_mut(), element, &action).require(target_name, &action)
    }

    pub fn click(&mut self, target: &Target) -> Result<Outcome> {
        let resolved = self.locate(target)?;
        self.scroll_into_view(resolved.first());
        self.act_on(resolved.first(), target.name(), Action::Click)
    }

    /// Clear the field, then type `text`.
    pub fn fill(&mut self, target: &Target, text: &str) -> Result<Outcome> {
        let resolved = self.locate(target)?;
        self.act_on(resolved.first(), target.name(), Action::ClearAndType(text))
    }

    pub fn press_enter(&mut self, target: &Target) -> Result<Outcome> {
        let resolved = self.locate(target)?;
        self.act_on(resolved.first(), target.name(), Action::PressEnter)
    }

    /// Trimmed text of the target's first element.
    pub fn text_of(&mut self, target: &Target) -> Result<String> {
        let resolved = self.locate(target)?;
        Ok(self.driver.text(resolved.first())?.trim().to_string())
    }

    /// Trimmed, non-empty texts of every element currently matching the target.
    pub fn texts_of(&mut self, target: &Target) -> Vec<String> {
        let elements = self.find_now(target);
        elements
            .iter()
            .filter_map(|el| self.driver.text(el).ok())
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    }

    pub fn is_selected(&mut self, target: &Target) -> Result<bool> {
        let resolved = self.locate(target)?;
        self.driver.is_selected(resolved.first())
    }

    pub fn scroll_into_view(&mut self, element: &ElementRef) {
        if self.released {
            return;
        }
        if let Err(e) = self.driver.scroll_into_view(element) {
            debug!(error = %e, "scroll into view failed");
        }
    }

    pub fn scroll_by(&mut self, pixels: i64) {
        if self.released {
            return;
        }
        if let Err(e) = self.driver.execute_script(SCRIPT_SCROLL_BY, vec![json!(pixels)]) {
            debug!(error = %e, "scroll failed");
        }
    }

    pub fn scroll_to_bottom(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = self.driver.execute_script(SCRIPT_SCROLL_TO_BOTTOM, Vec::new()) {
            debug!(error = %e, "scroll to bottom failed");
        }
    }

    // ---- outcome ----

    /// Concatenated alert banner text; empty when there is none.
    pub fn outcome_text(&mut self) -> String {
        if self.released {
            return String::new();
        }
        outcome_text::alert_text(self.driver.as_mut())
    }

    /// Alert text, falling back to the main content text.
    pub fn success_or_warning_text(&mut self) -> String {
        if self.released {
            return String::new();
        }
        outcome_text::success_or_warning_text(self.driver.as_mut())
    }

    /// Wait up to the default budget for an alert banner, then fall back to content text.
    pub fn wait_for_outcome_text(&mut self) -> String {
        if self.released {
            return String::new();
        }
        outcome_text::wait_for_outcome_text(
            self.driver.as_mut(),
            self.config.default_wait,
            self.config.poll_interval,
        )
    }

    // ---- artifacts ----

    /// Save a screenshot for human review. Failures are logged, never raised.
    pub fn screenshot(&mut self, label: &str) -> Option<PathBuf> {
        if self.released {
            return None;
        }
        let writer = self.screenshots.clone()?;
        let png = match self.driver.screenshot_png() {
            Ok(png) => png,
            Err(e) => {
                warn!(label, error = %e, "screenshot capture failed");
                return None;
            }
        };
        match writer.write(label, &png) {
            Ok(path) => {
                info!(path = %path.display(), "screenshot saved");
                self.captured.push(path.clone());
                Some(path)
            }
            Err(e) => {
                warn!(label, error = %e, "screenshot write failed");
                None
            }
        }
    }

    /// Paths of every screenshot saved in this session.
    pub fn screenshots(&self) -> &[PathBuf] {
        &self.captured
    }

    // ---- lifecycle ----

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Quit the browser. Later calls are no-ops.
    pub fn release(&mut self) -> Result<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        debug!("releasing browser session");
        self.driver.quit()
    }
}

impl Drop for PageSession {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            warn!(error = %e, "browser session release failed");
        }
    }
}

/// Join a base URL and a site-relative path with exactly one slash.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        format!("{}/", base)
    } else {
        format!("{}/{}", base, path)
    }
}
