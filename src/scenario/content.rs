//! Content flows: the contact form and blog comments.

use std::time::Duration;

use tracing::{debug, info};

use crate::error::Result;
use crate::pages::blog_page::{BlogPage, COMMENT_THANKS};
use crate::pages::contact_page::ContactPage;
use crate::scenario::context::ScenarioContext;

pub const BLOG_ARTICLE_ID: u32 = 37;

/// Upper bound on the wait for an error banner once no success banner came.
const ERROR_WAIT: Duration = Duration::from_secs(3);

pub fn contact_form(ctx: &mut ScenarioContext) -> Result<()> {
    ctx.step("open contact page");
    let mut page = ContactPage::new(&mut ctx.session);
    page.open()?;
    let loaded = page.is_loaded();
    ctx.checks.holds("contact page loaded", loaded, loaded.to_string())?;

    ctx.step("fill and submit enquiry");
    let mut page = ContactPage::new(&mut ctx.session);
    page.fill(
        "John Cena",
        "johncena.test@gmail.com",
        "Hello, this is a test enquiry message for the contact form.",
    )?;
    ctx.screenshot("contact_form_filled");
    let mut page = ContactPage::new(&mut ctx.session);
    page.submit()?;

    ctx.step("verify success page");
    let wait = ctx.session.config().default_wait;
    let mut page = ContactPage::new(&mut ctx.session);
    let message = page.success_message(wait).unwrap_or_default();
    ctx.checks
        .holds("success page reached", !message.is_empty(), message.clone())?;
    ctx.checks.text_contains(&message, "successfully sent", false)?;
    ctx.screenshot("contact_success");

    ctx.step("continue to home page");
    let mut page = ContactPage::new(&mut ctx.session);
    if page.click_continue() {
        let home = page.on_home_page();
        info!(home, "continued from contact success page");
    } else {
        debug!("continue button missing on success page");
    }
    Ok(())
}

pub fn blog_comment(ctx: &mut ScenarioContext) -> Result<()> {
    ctx.step("open blog article");
    let mut page = BlogPage::new(&mut ctx.session);
    page.open_article(BLOG_ARTICLE_ID)?;
    let loaded = page.is_loaded();
    let title = page.title().unwrap_or_default();
    ctx.checks.holds("article loaded", loaded, title)?;

    ctx.step("post a comment");
    let mut page = BlogPage::new(&mut ctx.session);
    page.fill_comment(
        "Test Commenter",
        "testcommenter123@example.com",
        "This is a test comment for the blog article by testcommenter123@example.com. \
         Testing comment submission functionality.",
    )?;
    ctx.screenshot("comment_form_filled");
    let mut page = BlogPage::new(&mut ctx.session);
    page.submit_comment()?;

    ctx.step("verify thank-you banner");
    let wait = ctx.session.config().default_wait;
    let mut page = BlogPage::new(&mut ctx.session);
    let banner = match page.success_message(wait) {
        Some(banner) => banner,
        None => page.error_message(ERROR_WAIT.min(wait)).unwrap_or_default(),
    };
    ctx.screenshot("comment_submitted");
    ctx.checks.text_contains(&banner, COMMENT_THANKS, false)
}
