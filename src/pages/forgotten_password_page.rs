use crate::browser::session::PageSession;
use crate::error::Result;
use crate::locator::action::Action;
use crate::locator::locator_model::{Locator, Target};
use crate::pages::routes;
use crate::target;

/// Password reset request form.
pub struct ForgottenPasswordPage<'s> {
    session: &'s mut PageSession,
}

impl<'s> ForgottenPasswordPage<'s> {
    pub const EMAIL: Target = target!(
        "EMAIL",
        [Locator::id("input-email"), Locator::css("input[name='email']")]
    );

    pub const SUBMIT: Target = target!(
        "RESET_SUBMIT",
        [
            Locator::css("input[type='submit'][value='Continue']"),
            Locator::css("input[value='Continue']"),
            Locator::css("button[type='submit']"),
        ]
    );

    pub fn new(session: &'s mut PageSession) -> Self {
        Self { session }
    }

    pub fn open(&mut self) -> Result<()> {
        self.session.visit(routes::FORGOTTEN)?;
        self.session.dismiss_overlays();
        Ok(())
    }

    /// Submit a reset request and return the resulting banner or content text.
    pub fn request_reset(&mut self, email: &str) -> Result<String> {
        let wait = self.session.config().default_wait;
        let input = self.session.locate_visible(&Self::EMAIL, wait)?;
        self.session
            .act_on(input.first(), Self::EMAIL.name(), Action::ClearAndType(email))?;
        self.session.click(&Self::SUBMIT)?;
        Ok(self.session.wait_for_outcome_text())
    }
}
