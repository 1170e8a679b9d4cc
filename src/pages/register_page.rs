use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use tracing::debug;

use crate::browser::session::PageSession;
use crate::error::Result;
use crate::locator::locator_model::{Locator, Target};
use crate::locator::outcome_text::clean_alert_text;
use crate::pages::routes;
use crate::target;

pub const ACCOUNT_CREATED: &str = "Your Account Has Been Created!";

const REGISTER_LINK_WAIT: Duration = Duration::from_secs(5);

/// Values typed into the registration form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub telephone: String,
    pub password: String,
}

/// Account registration form.
pub struct RegisterPage<'s> {
    session: &'s mut PageSession,
}

impl<'s> RegisterPage<'s> {
    pub const REGISTER_LINK: Target = target!(
        "REGISTER_LINK",
        [
            Locator::xpath("//span[normalize-space()='Register']"),
            Locator::link_text("Register"),
        ]
    );

    pub const FIRST_NAME: Target = target!(
        "FIRST_NAME",
        [Locator::id("input-firstname"), Locator::name("firstname")]
    );

    pub const LAST_NAME: Target = target!(
        "LAST_NAME",
        [Locator::id("input-lastname"), Locator::name("lastname")]
    );

    pub const EMAIL: Target = target!("EMAIL", [Locator::id("input-email"), Locator::name("email")]);

    pub const TELEPHONE: Target = target!(
        "TELEPHONE",
        [Locator::id("input-telephone"), Locator::name("telephone")]
    );

    pub const PASSWORD: Target = target!(
        "PASSWORD",
        [Locator::id("input-password"), Locator::name("password")]
    );

    pub const CONFIRM: Target = target!(
        "CONFIRM",
        [Locator::id("input-confirm"), Locator::name("confirm")]
    );

    pub const PRIVACY: Target = target!(
        "PRIVACY",
        [Locator::css("label[for='input-agree']"), Locator::id("input-agree")]
    );

    pub const CONTINUE: Target = target!(
        "CONTINUE",
        [
            Locator::css("input[value='Continue']"),
            Locator::xpath("//input[@value='Continue']"),
            Locator::css("button[type='submit']"),
        ]
    );

    pub const ALERT_DANGER: Target = target!(
        "ALERT_DANGER",
        [
            Locator::css(".alert.alert-danger.alert-dismissible"),
            Locator::css(".alert-danger"),
        ]
    );

    pub fn new(session: &'s mut PageSession) -> Self {
        Self { session }
    }

    /// Open the form directly.
    pub fn open(&mut self) -> Result<()> {
        self.session.visit(routes::REGISTER)
    }

    /// Reach the form through the header link, or the direct route when the
    /// link is missing or cannot be clicked.
    pub fn open_from_home(&mut self) -> Result<()> {
        self.session.visit("")?;
        self.session.dismiss_overlays();

        let clicked = match self.session.find_optional(&Self::REGISTER_LINK, REGISTER_LINK_WAIT) {
            Some(_) => self.session.click(&Self::REGISTER_LINK).is_ok(),
            None => false,
        };
        if !clicked {
            debug!("header register link unavailable, using direct route");
            self.session.visit(routes::REGISTER)?;
        }
        let wait = self.session.config().default_wait;
        self.session.wait_for_ready(wait);
        Ok(())
    }

    pub fn fill(&mut self, form: &Registration) -> Result<()> {
        self.session.fill(&Self::FIRST_NAME, &form.first_name)?;
        self.session.fill(&Self::LAST_NAME, &form.last_name)?;
        self.session.fill(&Self::EMAIL, &form.email)?;
        self.session.fill(&Self::TELEPHONE, &form.telephone)?;
        self.session.fill(&Self::PASSWORD, &form.password)?;
        self.session.fill(&Self::CONFIRM, &form.password)?;
        Ok(())
    }

    pub fn agree_privacy(&mut self) -> Result<()> {
        self.session.click(&Self::PRIVACY)?;
        Ok(())
    }

    pub fn submit(&mut self) -> Result<()> {
        self.session.click(&Self::CONTINUE)?;
        Ok(())
    }

    /// Fill, agree and submit in one go.
    pub fn register(&mut self, form: &Registration) -> Result<()> {
        self.fill(form)?;
        self.agree_privacy()?;
        self.submit()
    }

    /// Text of the danger alert, cleaned; empty when none becomes visible.
    pub fn alert_text(&mut self, timeout: Duration) -> String {
        let alert = match self.session.locate_visible(&Self::ALERT_DANGER, timeout) {
            Ok(alert) => alert,
            Err(e) => {
                debug!(error = %e, "no danger alert");
                return String::new();
            }
        };
        let raw = self
            .session
            .driver()
            .text(alert.first())
            .unwrap_or_default();
        extract_warning(&clean_alert_text(&raw))
    }

    pub fn account_created(&mut self, timeout: Duration) -> bool {
        self.session.wait_for_text_in_body(ACCOUNT_CREATED, timeout)
    }
}

static WARNING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(Warning:\s*.+)").expect("warning pattern is a valid regex"));
static LEADING_NON_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\w]+").expect("leading glyph pattern is a valid regex"));

/// Prefer a `Warning: ...` substring; otherwise drop leading icon glyphs.
pub fn extract_warning(raw: &str) -> String {
    let raw = raw.trim();
    if let Some(m) = WARNING_RE.captures(raw).and_then(|c| c.get(1)) {
        return m.as_str().trim().to_string();
    }
    LEADING_NON_WORD_RE.replace(raw, "").trim().to_string()
}
