use tracing::debug;

use crate::browser::session::PageSession;
use crate::error::{Error, Result};
use crate::locator::locator_model::{Locator, Target};
use crate::pages::routes;
use crate::target;

/// Account login form.
pub struct LoginPage<'s> {
    session: &'s mut PageSession,
}

impl<'s> LoginPage<'s> {
    pub const EMAIL: Target = target!(
        "EMAIL",
        [Locator::id("input-email"), Locator::css("input[name='email']")]
    );

    pub const PASSWORD: Target = target!(
        "PASSWORD",
        [Locator::id("input-password"), Locator::css("input[name='password']")]
    );

    pub const SUBMIT: Target = target!(
        "LOGIN_SUBMIT",
        [
            Locator::css("input[type='submit'][value='Login']"),
            Locator::css("input[value='Login']"),
            Locator::css("button[type='submit']"),
        ]
    );

    pub fn new(session: &'s mut PageSession) -> Self {
        Self { session }
    }

    pub fn open(&mut self) -> Result<()> {
        self.session.visit(routes::LOGIN)
    }

    /// Log in and wait for the account dashboard.
    ///
    /// The login form page has the same layout as the dashboard, so success
    /// is judged by the URL. A rejected login is an `OutcomeMismatch`.
    pub fn login(&mut self, email: &str, password: &str) -> Result<()> {
        self.open()?;
        self.session.dismiss_overlays();
        self.session.fill(&Self::EMAIL, email)?;
        self.session.fill(&Self::PASSWORD, password)?;
        self.session.click(&Self::SUBMIT)?;

        let wait = self.session.config().default_wait;
        if self.session.wait_until_url_contains(routes::ACCOUNT_DASHBOARD, wait) {
            return Ok(());
        }
        let url = self.session.current_url()?;
        debug!(%url, email, "login not accepted");
        Err(Error::OutcomeMismatch {
            check: "Login".to_string(),
            expected: format!("URL containing '{}'", routes::ACCOUNT_DASHBOARD),
            actual: url,
        })
    }
}
