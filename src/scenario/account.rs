//! Account flows: registration, password reset, newsletter, address book
//! and product reviews.

use std::time::Duration;

use tracing::{debug, info};

use crate::error::Result;
use crate::pages::address_page::{AddressForm, AddressPage};
use crate::pages::forgotten_password_page::ForgottenPasswordPage;
use crate::pages::login_page::LoginPage;
use crate::pages::newsletter_page::{NewsletterPage, Subscription};
use crate::pages::product_page::ProductPage;
use crate::pages::register_page::{ACCOUNT_CREATED, RegisterPage, Registration};
use crate::scenario::context::ScenarioContext;

const REGISTER_WAIT: Duration = Duration::from_secs(12);
const ALERT_WAIT: Duration = Duration::from_secs(8);
const ADDRESS_SAVE_WAIT: Duration = Duration::from_secs(3);

/// iPhone product page used for reviews.
pub const REVIEW_PRODUCT_ID: u32 = 107;
pub const REVIEWER_NAME: &str = "Sizhe";
pub const VALID_REVIEW: &str = "Good build quality and stable performance in daily use.";
pub const SHORT_REVIEW: &str = "Too short";

const NEW_USER_PASSWORD: &str = "Test@12345";

fn new_registration(ctx: &ScenarioContext) -> Registration {
    Registration {
        first_name: "Sumangala".to_string(),
        last_name: "Rao".to_string(),
        email: ctx.data.unique_email("sumangala"),
        telephone: "0400000000".to_string(),
        password: NEW_USER_PASSWORD.to_string(),
    }
}

/// Register a fresh account; the browser is logged in afterwards.
fn register_fresh_user(ctx: &mut ScenarioContext) -> Result<()> {
    let form = new_registration(ctx);
    info!(email = %form.email, "registering new user");
    let mut page = RegisterPage::new(&mut ctx.session);
    page.open()?;
    page.register(&form)?;
    let created = page.account_created(REGISTER_WAIT);
    ctx.checks.holds(
        "account creation confirmed",
        created,
        format!("page for {} without '{}'", form.email, ACCOUNT_CREATED),
    )
}

pub fn register_new_user(ctx: &mut ScenarioContext) -> Result<()> {
    ctx.step("register with a unique e-mail");
    register_fresh_user(ctx)?;
    let source = ctx.session.page_source()?;
    ctx.checks.text_contains(&source, ACCOUNT_CREATED, true)
}

pub fn register_existing_email(ctx: &mut ScenarioContext) -> Result<()> {
    ctx.step("open register form from home page");
    let form = Registration {
        first_name: "First".to_string(),
        last_name: "Last".to_string(),
        email: ctx.data.existing_email.clone(),
        telephone: "98765432".to_string(),
        password: "Password123!".to_string(),
    };
    let mut page = RegisterPage::new(&mut ctx.session);
    page.open_from_home()?;

    ctx.step("submit registration");
    let mut page = RegisterPage::new(&mut ctx.session);
    page.register(&form)?;
    let alert = page.alert_text(ALERT_WAIT);
    ctx.checks.holds("an alert appeared", !alert.is_empty(), alert.clone())?;
    ctx.checks.text_contains(&alert, "already registered", true)
}

pub fn forgotten_password_registered(ctx: &mut ScenarioContext) -> Result<()> {
    ctx.step("request reset for a registered e-mail");
    let email = ctx.data.credentials.email.clone();
    let mut page = ForgottenPasswordPage::new(&mut ctx.session);
    page.open()?;
    let message = page.request_reset(&email)?.to_lowercase();
    let url = ctx.session.current_url()?.to_lowercase();

    let confirmed = (message.contains("email")
        && (message.contains("sent") || message.contains("success")))
        || url.contains("success");
    ctx.checks.holds(
        "reset confirmation shown",
        confirmed,
        format!("{} (URL {})", message, url),
    )
}

pub fn forgotten_password_unregistered(ctx: &mut ScenarioContext) -> Result<()> {
    ctx.step("request reset for an unknown e-mail");
    let email = ctx.data.unregistered_email.clone();
    let mut page = ForgottenPasswordPage::new(&mut ctx.session);
    page.open()?;
    let message = page.request_reset(&email)?;
    ctx.checks
        .text_contains_any(&message, &["success", "email", "warning"])
}

fn login(ctx: &mut ScenarioContext) -> Result<()> {
    let credentials = ctx.data.credentials.clone();
    LoginPage::new(&mut ctx.session).login(&credentials.email, &credentials.password)
}

fn set_newsletter(ctx: &mut ScenarioContext, choice: Subscription) -> Result<()> {
    ctx.step(&format!("subscribe: {}", choice));
    let mut page = NewsletterPage::new(&mut ctx.session);
    page.open()?;
    page.choose(choice)?;
    let message = page.save()?;
    ctx.checks
        .text_contains_any(&message, &["success", "updated", "modified"])?;

    ctx.step(&format!("verify {} persisted", choice));
    let mut page = NewsletterPage::new(&mut ctx.session);
    page.open()?;
    let persisted = page.is_selected(choice)?;
    ctx.checks.holds(
        &format!("newsletter '{}' persists after saving", choice),
        persisted,
        persisted.to_string(),
    )
}

pub fn newsletter_toggle(ctx: &mut ScenarioContext) -> Result<()> {
    ctx.step("log in");
    login(ctx)?;
    set_newsletter(ctx, Subscription::Yes)?;
    set_newsletter(ctx, Subscription::No)
}

/// Address values no real address would have.
pub fn junk_address() -> AddressForm {
    AddressForm {
        first_name: "1234567".to_string(),
        last_name: "3454".to_string(),
        company: "~!!".to_string(),
        address_1: "!@##".to_string(),
        city: "&*(()".to_string(),
        postcode: "(*&^".to_string(),
        country: "Australia".to_string(),
        region: "New South Wales".to_string(),
    }
}

pub fn invalid_address_rejected(ctx: &mut ScenarioContext) -> Result<()> {
    ctx.step("register a fresh user");
    register_fresh_user(ctx)?;

    ctx.step("submit junk address");
    let form = junk_address();
    let mut page = AddressPage::new(&mut ctx.session);
    page.open()?;
    let (country, region) = page.fill(&form)?;
    debug!(%country, %region, "location chosen");
    page.mark_default()?;
    page.save()?;
    let saved = page.address_book_reached(ADDRESS_SAVE_WAIT);
    ctx.screenshot("invalid_address_after_save");

    ctx.checks.holds(
        "junk address is not saved to the address book",
        !saved,
        ctx.session.current_url().unwrap_or_default(),
    )
}

fn open_review_form(ctx: &mut ScenarioContext) -> Result<()> {
    ctx.step("log in");
    login(ctx)?;
    ctx.step("open product reviews");
    let mut page = ProductPage::new(&mut ctx.session);
    page.open(REVIEW_PRODUCT_ID)?;
    if !page.open_review_tab() {
        debug!("no review tab, form expected inline");
    }
    Ok(())
}

pub fn review_submission(ctx: &mut ScenarioContext) -> Result<()> {
    open_review_form(ctx)?;
    ctx.step("submit a valid review");
    let mut page = ProductPage::new(&mut ctx.session);
    page.fill_review(REVIEWER_NAME, VALID_REVIEW)?;
    page.choose_rating(4)?;
    page.submit_review()?;
    let message = ctx.session.wait_for_outcome_text();
    ctx.checks
        .text_contains_any(&message, &["thank you", "submitted", "success"])
}

pub fn review_too_short(ctx: &mut ScenarioContext) -> Result<()> {
    open_review_form(ctx)?;
    ctx.step("submit a review that is too short");
    let mut page = ProductPage::new(&mut ctx.session);
    page.fill_review(REVIEWER_NAME, SHORT_REVIEW)?;
    page.submit_review()?;
    let message = ctx.session.wait_for_outcome_text();
    ctx.checks
        .text_contains_any(&message, &["warning", "error", "length"])
}
