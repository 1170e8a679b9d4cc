use std::time::Duration;

use tracing::debug;

use crate::browser::session::PageSession;
use crate::error::Result;
use crate::locator::locator_model::{Locator, Target};
use crate::pages::routes;
use crate::target;

pub const SUCCESS_MESSAGE: &str = "Your enquiry has been successfully sent to the store owner!";

const CONTINUE_WAIT: Duration = Duration::from_secs(5);

/// "Contact Us" enquiry form.
pub struct ContactPage<'s> {
    session: &'s mut PageSession,
}

impl<'s> ContactPage<'s> {
    pub const NAME: Target = target!("NAME", [Locator::id("input-name"), Locator::name("name")]);

    pub const EMAIL: Target = target!("EMAIL", [Locator::id("input-email"), Locator::name("email")]);

    pub const ENQUIRY: Target = target!(
        "ENQUIRY",
        [Locator::id("input-enquiry"), Locator::name("enquiry")]
    );

    pub const SUBMIT: Target = target!(
        "CONTACT_SUBMIT",
        [
            Locator::css("input[value='Submit']"),
            Locator::css("button[type='submit']"),
        ]
    );

    pub const PAGE_HEADING: Target = target!(
        "PAGE_HEADING",
        [Locator::tag("h1"), Locator::tag("h2"), Locator::css(".page-heading")]
    );

    pub const SUCCESS_TEXT: Target = target!(
        "CONTACT_SUCCESS",
        [
            Locator::xpath(
                "//*[contains(text(), 'Your enquiry has been successfully sent to the store owner!')]"
            ),
            Locator::xpath("//*[contains(text(), 'Your enquiry has been successfully sent')]"),
            Locator::xpath("//*[contains(text(), 'successfully sent to the store owner')]"),
        ]
    );

    pub const CONTINUE: Target = target!(
        "CONTINUE",
        [
            Locator::xpath("//a[contains(text(), 'Continue')]"),
            Locator::xpath("//button[contains(text(), 'Continue')]"),
        ]
    );

    pub fn new(session: &'s mut PageSession) -> Self {
        Self { session }
    }

    pub fn open(&mut self) -> Result<()> {
        self.session.visit(routes::CONTACT)?;
        self.session.dismiss_overlays();
        Ok(())
    }

    pub fn is_loaded(&mut self) -> bool {
        self.session.locate(&Self::PAGE_HEADING).is_ok() && self.session.locate(&Self::NAME).is_ok()
    }

    pub fn fill(&mut self, name: &str, email: &str, enquiry: &str) -> Result<()> {
        self.session.fill(&Self::NAME, name)?;
        self.session.fill(&Self::EMAIL, email)?;
        self.session.fill(&Self::ENQUIRY, enquiry)?;
        Ok(())
    }

    pub fn submit(&mut self) -> Result<()> {
        self.session.click(&Self::SUBMIT)?;
        let wait = self.session.config().default_wait;
        self.session.wait_for_ready(wait);
        Ok(())
    }

    /// Wait for the `contact/success` route or the success text in the source.
    pub fn wait_for_success_page(&mut self, timeout: Duration) -> bool {
        self.session.poll_until(timeout, |session| Self::on_success_page(session))
    }

    pub fn is_on_success_page(&mut self) -> bool {
        Self::on_success_page(self.session)
    }

    fn on_success_page(session: &mut PageSession) -> bool {
        let url = session.current_url().unwrap_or_default().to_lowercase();
        if url.contains("contact/success") {
            return true;
        }
        session
            .page_source()
            .map(|source| source.to_lowercase().contains(&SUCCESS_MESSAGE.to_lowercase()))
            .unwrap_or(false)
    }

    /// Success text from the success page, if the page was reached.
    pub fn success_message(&mut self, timeout: Duration) -> Option<String> {
        if !self.wait_for_success_page(timeout) {
            return None;
        }
        for text in self.session.texts_of(&Self::SUCCESS_TEXT) {
            if text.to_lowercase().contains("successfully sent") {
                return Some(text);
            }
        }
        Some(SUCCESS_MESSAGE.to_string())
    }

    /// Click "Continue" on the success page. Missing button is not an error.
    pub fn click_continue(&mut self) -> bool {
        if self.session.find_optional(&Self::CONTINUE, CONTINUE_WAIT).is_none() {
            debug!("no continue button on success page");
            return false;
        }
        match self.session.click(&Self::CONTINUE) {
            Ok(_) => {
                let wait = self.session.config().default_wait;
                self.session.wait_for_ready(wait);
                true
            }
            Err(e) => {
                debug!(error = %e, "continue button not clickable");
                false
            }
        }
    }

    pub fn on_home_page(&mut self) -> bool {
        let url = self.session.current_url().unwrap_or_default().to_lowercase();
        let base = self.session.base_url().trim_end_matches('/').to_lowercase();
        url.contains("route=common/home") || url.ends_with('/') || url == base
    }
}
