use std::time::Duration;

use tracing::debug;

use crate::browser::session::PageSession;
use crate::error::Result;
use crate::locator::locator_model::{Locator, Target};
use crate::locator::outcome_text::clean_alert_text;
use crate::pages::routes;
use crate::target;

pub const COMMENT_THANKS: &str =
    "Thank you for your comment. It has been submitted to the webmaster for approval.";

const FORM_ANCHOR_WAIT: Duration = Duration::from_secs(10);

/// A blog article with its comment form.
pub struct BlogPage<'s> {
    session: &'s mut PageSession,
}

impl<'s> BlogPage<'s> {
    pub const ARTICLE_TITLE: Target = target!(
        "ARTICLE_TITLE",
        [
            Locator::tag("h1"),
            Locator::tag("h2"),
            Locator::css(".article-title"),
            Locator::css(".post-title"),
        ]
    );

    /// Scroll anchors for the comment form, most specific first.
    pub const COMMENT_FORM_ANCHOR: Target = target!(
        "COMMENT_FORM_ANCHOR",
        [
            Locator::xpath("//div[@data-id and contains(@class, 'content-comment-form')]"),
            Locator::id("form-comment"),
            Locator::xpath("//h4[contains(text(), 'Write a comment')]"),
            Locator::css("div[data-id][id*='entry']"),
            Locator::css("div[class*='comment-form']"),
        ]
    );

    pub const COMMENT_NAME: Target = target!(
        "COMMENT_NAME",
        [Locator::id("input-name"), Locator::name("name")]
    );

    pub const COMMENT_EMAIL: Target = target!(
        "COMMENT_EMAIL",
        [Locator::id("input-email"), Locator::name("email")]
    );

    pub const COMMENT_TEXT: Target = target!(
        "COMMENT_TEXT",
        [
            Locator::id("input-comment"),
            Locator::name("text"),
            Locator::name("comment"),
        ]
    );

    pub const COMMENT_SUBMIT: Target = target!(
        "COMMENT_SUBMIT",
        [Locator::id("button-comment"), Locator::css("button#button-comment")]
    );

    pub const COMMENT_SUCCESS: Target = target!(
        "COMMENT_SUCCESS",
        [
            Locator::css("#form-comment .alert.alert-success.alert-dismissible"),
            Locator::css("form#form-comment .alert.alert-success"),
            Locator::xpath("//form[@id='form-comment']//div[contains(@class, 'alert-success')]"),
            Locator::xpath(
                "//*[contains(text(), 'Thank you for your comment') and contains(text(), 'submitted to the webmaster')]"
            ),
            Locator::css(".alert.alert-success.alert-dismissible"),
            Locator::css(".alert.alert-success"),
            Locator::css(".success"),
            Locator::css(".text-success"),
        ]
    );

    pub const COMMENT_ERROR: Target = target!(
        "COMMENT_ERROR",
        [
            Locator::css(".alert.alert-danger"),
            Locator::css(".text-danger"),
            Locator::css(".error"),
        ]
    );

    pub fn new(session: &'s mut PageSession) -> Self {
        Self { session }
    }

    pub fn open_article(&mut self, article_id: u32) -> Result<()> {
        self.session.visit(&routes::blog_article(article_id))?;
        self.session.dismiss_overlays();
        Ok(())
    }

    pub fn is_loaded(&mut self) -> bool {
        self.session.locate(&Self::ARTICLE_TITLE).is_ok()
    }

    pub fn title(&mut self) -> Option<String> {
        self.session.text_of(&Self::ARTICLE_TITLE).ok()
    }

    /// Scroll the comment form into view, or to the bottom of the page when
    /// no anchor is found. Returns whether an anchor was found.
    pub fn scroll_to_comment_form(&mut self) -> bool {
        match self
            .session
            .find_optional(&Self::COMMENT_FORM_ANCHOR, FORM_ANCHOR_WAIT)
        {
            Some(anchor) => {
                debug!(locator = %anchor.locator(), "comment form anchor");
                self.session.scroll_into_view(anchor.first());
                true
            }
            None => {
                self.session.scroll_to_bottom();
                false
            }
        }
    }

    pub fn fill_comment(&mut self, name: &str, email: &str, comment: &str) -> Result<()> {
        self.scroll_to_comment_form();
        self.session.fill(&Self::COMMENT_NAME, name)?;
        self.session.fill(&Self::COMMENT_EMAIL, email)?;
        self.session.fill(&Self::COMMENT_TEXT, comment)?;
        Ok(())
    }

    pub fn submit_comment(&mut self) -> Result<()> {
        self.session.click(&Self::COMMENT_SUBMIT)?;
        let wait = self.session.config().default_wait;
        self.session.wait_for_ready(wait);
        Ok(())
    }

    /// The thank-you banner, once one mentioning "thank you" and
    /// "webmaster" shows up within `timeout`.
    pub fn success_message(&mut self, timeout: Duration) -> Option<String> {
        let mut found = None;
        self.session.poll_until(timeout, |session| {
            for locator in Self::COMMENT_SUCCESS.candidates() {
                let elements = session.driver().find_elements(locator).unwrap_or_default();
                for el in &elements {
                    let text = clean_alert_text(&session.driver().text(el).unwrap_or_default());
                    let lower = text.to_lowercase();
                    if lower.contains("thank you") && lower.contains("webmaster") {
                        found = Some(text);
                        return true;
                    }
                }
            }
            false
        });
        found
    }

    pub fn error_message(&mut self, timeout: Duration) -> Option<String> {
        let error = self.session.locate_visible(&Self::COMMENT_ERROR, timeout).ok()?;
        let text = self.session.driver().text(error.first()).ok()?;
        let text = text.trim().to_string();
        (!text.is_empty()).then_some(text)
    }
}
