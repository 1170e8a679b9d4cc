use std::fmt;

use crate::browser::session::PageSession;
use crate::error::Result;
use crate::locator::locator_model::{Locator, Target};
use crate::pages::routes;
use crate::target;

/// Newsletter subscription choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subscription {
    Yes,
    No,
}

impl fmt::Display for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subscription::Yes => f.write_str("Yes"),
            Subscription::No => f.write_str("No"),
        }
    }
}

/// Account newsletter preferences.
pub struct NewsletterPage<'s> {
    session: &'s mut PageSession,
}

impl<'s> NewsletterPage<'s> {
    pub const YES: Target = target!(
        "NEWSLETTER_YES",
        [
            Locator::css("input[name='newsletter'][value='1']"),
            Locator::xpath("//label[normalize-space()='Yes']/input[@name='newsletter']"),
        ]
    );

    pub const NO: Target = target!(
        "NEWSLETTER_NO",
        [
            Locator::css("input[name='newsletter'][value='0']"),
            Locator::xpath("//label[normalize-space()='No']/input[@name='newsletter']"),
        ]
    );

    pub const CONTINUE: Target = target!(
        "NEWSLETTER_CONTINUE",
        [
            Locator::css("input[type='submit']"),
            Locator::css("button[type='submit']"),
            Locator::css("input[value='Continue']"),
        ]
    );

    pub fn new(session: &'s mut PageSession) -> Self {
        Self { session }
    }

    pub fn open(&mut self) -> Result<()> {
        self.session.visit(routes::NEWSLETTER)
    }

    fn radio(choice: Subscription) -> Target {
        match choice {
            Subscription::Yes => Self::YES,
            Subscription::No => Self::NO,
        }
    }

    pub fn choose(&mut self, choice: Subscription) -> Result<()> {
        self.session.click(&Self::radio(choice))?;
        Ok(())
    }

    /// Save the preference and return the confirmation text.
    pub fn save(&mut self) -> Result<String> {
        self.session.click(&Self::CONTINUE)?;
        Ok(self.session.wait_for_outcome_text())
    }

    pub fn is_selected(&mut self, choice: Subscription) -> Result<bool> {
        self.session.is_selected(&Self::radio(choice))
    }

    /// The currently selected option, if any.
    pub fn selected(&mut self) -> Result<Option<Subscription>> {
        for choice in [Subscription::Yes, Subscription::No] {
            if self.is_selected(choice)? {
                return Ok(Some(choice));
            }
        }
        Ok(None)
    }
}
