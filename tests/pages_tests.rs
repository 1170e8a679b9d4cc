use std::time::Duration;

use ecommerce_playground::error::Error;
use ecommerce_playground::locator::locator_model::Locator;
use ecommerce_playground::pages::address_page::{AddressPage, COUNTRY_SELECT};
use ecommerce_playground::pages::blog_page::{BlogPage, COMMENT_THANKS};
use ecommerce_playground::pages::compare_page::ComparePage;
use ecommerce_playground::pages::forgotten_password_page::ForgottenPasswordPage;
use ecommerce_playground::pages::listing_page::{ListingPage, ListingState};
use ecommerce_playground::pages::login_page::LoginPage;
use ecommerce_playground::pages::newsletter_page::{NewsletterPage, Subscription};
use ecommerce_playground::pages::product_page::{ProductPage, TermLocation};
use ecommerce_playground::pages::register_page::{RegisterPage, extract_warning};
use ecommerce_playground::pages::routes;
use serde_json::json;

use crate::common::fake_driver::{FakeDriver, FakeElement, OnClick};
use crate::common::{BASE, session};

mod common;

const SHORT: Duration = Duration::from_millis(60);

#[test]
fn routes_build_product_and_article_paths() {
    assert_eq!(
        routes::product(107),
        "index.php?route=product/product&product_id=107"
    );
    assert!(routes::blog_article(37).ends_with("article&article_id=37"));
}

// ============================================================================
// Registration
// ============================================================================

#[test]
fn extract_warning_prefers_warning_substring() {
    assert_eq!(
        extract_warning("\u{f06a} Warning: E-Mail Address is already registered!"),
        "Warning: E-Mail Address is already registered!"
    );
    assert_eq!(extract_warning("  \u{f06a}  Something odd  "), "Something odd");
    assert_eq!(extract_warning(""), "");
}

#[test]
fn register_alert_text_reads_danger_banner() {
    let driver = FakeDriver::new();
    driver.add(
        &Locator::css(".alert-danger"),
        FakeElement::new("! Warning: E-Mail Address is already registered!"),
    );
    let mut session = session(driver);
    let mut page = RegisterPage::new(&mut session);

    assert_eq!(
        page.alert_text(SHORT),
        "Warning: E-Mail Address is already registered!"
    );
}

#[test]
fn register_alert_text_empty_without_banner() {
    let mut session = session(FakeDriver::new());
    assert_eq!(RegisterPage::new(&mut session).alert_text(SHORT), "");
}

// ============================================================================
// Login
// ============================================================================

fn login_form(driver: &FakeDriver, submit: FakeElement) {
    driver.add(&Locator::id("input-email"), FakeElement::new(""));
    driver.add(&Locator::id("input-password"), FakeElement::new(""));
    driver.add(&Locator::css("input[type='submit'][value='Login']"), submit);
}

#[test]
fn login_waits_for_account_dashboard() {
    let driver = FakeDriver::new();
    login_form(
        &driver,
        FakeElement::new("Login").on_click(OnClick::Navigate(format!(
            "{}index.php?route=account/account",
            BASE
        ))),
    );
    let state = driver.state();
    let mut session = session(driver);

    LoginPage::new(&mut session)
        .login("user@example.com", "secret")
        .unwrap();
    assert!(state.borrow().url.ends_with("route=account/account"));
}

#[test]
fn rejected_login_is_outcome_mismatch_with_url() {
    let driver = FakeDriver::new();
    login_form(
        &driver,
        FakeElement::new("Login").on_click(OnClick::ShowAlert(
            "Warning: No match for E-Mail Address and/or Password.".into(),
        )),
    );
    let mut session = session(driver);

    let err = LoginPage::new(&mut session)
        .login("user@example.com", "wrong")
        .unwrap_err();
    match err {
        Error::OutcomeMismatch { check, expected, actual } => {
            assert_eq!(check, "Login");
            assert!(expected.contains("route=account/account"));
            assert_eq!(actual, format!("{}{}", BASE, routes::LOGIN));
        }
        other => panic!("unexpected error: {other}"),
    }
}

// ============================================================================
// Newsletter
// ============================================================================

#[test]
fn newsletter_choice_and_save() {
    let driver = FakeDriver::new();
    driver.add(
        &Locator::css("input[name='newsletter'][value='1']"),
        FakeElement::new("").radio("newsletter", false),
    );
    driver.add(
        &Locator::css("input[name='newsletter'][value='0']"),
        FakeElement::new("").radio("newsletter", true),
    );
    driver.add(
        &Locator::css("input[type='submit']"),
        FakeElement::new("Continue").on_click(OnClick::ShowAlert(
            "Success: Your newsletter subscription has been successfully updated! \u{00D7}".into(),
        )),
    );
    let mut session = session(driver);
    let mut page = NewsletterPage::new(&mut session);

    assert_eq!(page.selected().unwrap(), Some(Subscription::No));
    page.choose(Subscription::Yes).unwrap();
    assert!(page.is_selected(Subscription::Yes).unwrap());
    assert!(!page.is_selected(Subscription::No).unwrap());

    let message = page.save().unwrap();
    assert_eq!(
        message,
        "Success: Your newsletter subscription has been successfully updated!"
    );
    assert_eq!(Subscription::Yes.to_string(), "Yes");
}

// ============================================================================
// Compare
// ============================================================================

#[test]
fn compare_product_names_skip_remove_links() {
    let driver = FakeDriver::new();
    let table = driver.add(&Locator::css("table#compare-products"), FakeElement::new(""));
    {
        let state = driver.state();
        let mut state = state.borrow_mut();
        let cells = Locator::css("thead tr th a[href*='product/product']");
        state.add_child(
            &table,
            &cells,
            FakeElement::new("iPod Classic").with_attr("href", "index.php?route=product/product&product_id=48"),
        );
        state.add_child(
            &table,
            &cells,
            FakeElement::new("Remove").with_attr("href", "index.php?route=product/compare&remove=48"),
        );
        state.add_child(
            &table,
            &cells,
            FakeElement::new("iPod Classic").with_attr("href", "index.php?route=product/product&product_id=48"),
        );
        state.add_child(
            &table,
            &cells,
            FakeElement::new("HTC Touch HD").with_attr("href", "index.php?route=product/product&product_id=28"),
        );
    }
    let mut session = session(driver);

    assert_eq!(
        ComparePage::new(&mut session).product_names(),
        vec!["iPod Classic", "HTC Touch HD"]
    );
}

#[test]
fn compare_names_empty_without_table() {
    let mut session = session(FakeDriver::new());
    assert!(ComparePage::new(&mut session).product_names().is_empty());
}

#[test]
fn compare_remove_item_and_success_banner() {
    let driver = FakeDriver::new();
    let remove_key = Locator::css("a[href*='remove']");
    driver.add(
        &remove_key,
        FakeElement::new("Remove")
            .on_click(OnClick::ShowAlert("Success: You have modified your product comparison! \u{00D7}".into()))
            .on_click(OnClick::Remove(remove_key.to_string())),
    );
    let mut session = session(driver);
    let mut page = ComparePage::new(&mut session);

    assert!(page.remove_item(0));
    assert!(!page.remove_item(0));
    drop(page);
    assert_eq!(
        session.outcome_text(),
        "Success: You have modified your product comparison!"
    );
}

#[test]
fn compare_empty_message_detected() {
    let driver = FakeDriver::new();
    driver.add(
        &Locator::xpath("//*[contains(@class, 'alert-info')]"),
        FakeElement::new("You have not chosen any products to compare. The list is empty."),
    );
    let mut session = session(driver);
    let mut page = ComparePage::new(&mut session);
    assert!(page.is_loaded());
    assert!(page.is_empty());
}

#[test]
fn compare_adds_from_search_results() {
    let driver = FakeDriver::new();
    let compare = Locator::css("button[title*='Compare']");
    let first = driver.add(&compare, FakeElement::new(""));
    let second = driver.add(&compare, FakeElement::new("").intercepted());
    let third = driver.add(&compare, FakeElement::new(""));
    let state = driver.state();
    let mut session = session(driver);

    let added = ComparePage::new(&mut session).add_from_search(2).unwrap();
    assert_eq!(added, 2);
    let state = state.borrow();
    assert_eq!(state.element(&first).clicks, 1);
    assert_eq!(state.element(&second).clicks, 1);
    assert_eq!(state.element(&third).clicks, 0);
    assert!(state.navigations[0].ends_with(routes::SEARCH_ALL));
}

// ============================================================================
// Listing and product
// ============================================================================

#[test]
fn listing_reports_no_products() {
    let driver = FakeDriver::new();
    driver.add(
        &Locator::xpath("//*[contains(text(),'There are no products to list')]"),
        FakeElement::new("There are no products to list in this category."),
    );
    let mut session = session(driver);
    assert_eq!(
        ListingPage::new(&mut session).wait_for_results().unwrap(),
        ListingState::NoProducts
    );
}

#[test]
fn listing_links_deduplicated() {
    let driver = FakeDriver::new();
    let links = Locator::css("div.product-layout a[href*='product']");
    driver.add(&links, FakeElement::new("").with_attr("href", "p?id=1"));
    driver.add(&links, FakeElement::new("").with_attr("href", "p?id=1"));
    driver.add(&links, FakeElement::new("").with_attr("href", " p?id=2 "));
    driver.add(&Locator::css(".product-layout"), FakeElement::new(""));
    let mut session = session(driver);
    let mut page = ListingPage::new(&mut session);

    assert_eq!(page.wait_for_results().unwrap(), ListingState::HasProducts);
    assert_eq!(page.listing_links(), vec!["p?id=1", "p?id=2"]);
}

#[test]
fn product_term_search_order() {
    let driver = FakeDriver::new();
    driver.add(&Locator::tag("body"), FakeElement::new("Brand: Nikon D300"));
    let mut session = session(driver);
    let mut page = ProductPage::new(&mut session);

    assert_eq!(page.find_term("nikon"), Some(TermLocation::Body));
    assert_eq!(page.find_term("canon"), None);
    assert_eq!(TermLocation::Details.to_string(), "product details/manufacturer");
}

#[test]
fn rating_falls_back_to_any_radio() {
    let driver = FakeDriver::new();
    let any = driver.add(&Locator::css("input[name='rating']"), FakeElement::new(""));
    let state = driver.state();
    let mut session = session(driver);

    ProductPage::new(&mut session).choose_rating(4).unwrap();
    assert_eq!(state.borrow().element(&any).clicks, 1);
}

// ============================================================================
// Address
// ============================================================================

#[test]
fn select_option_reports_chosen_text() {
    let driver = FakeDriver::new();
    driver.respond_to_script("sel.selectedIndex", json!({"ok": true, "text": "Australia"}));
    let mut session = session(driver);

    let chosen = AddressPage::new(&mut session)
        .select_option(COUNTRY_SELECT, "australia")
        .unwrap();
    assert_eq!(chosen, "Australia");
}

#[test]
fn select_option_failure_is_interaction_blocked() {
    let driver = FakeDriver::new();
    driver.respond_to_script("sel.selectedIndex", json!({"ok": false, "reason": "select-not-found"}));
    let mut session = session(driver);

    let err = AddressPage::new(&mut session)
        .select_option(COUNTRY_SELECT, "Narnia")
        .unwrap_err();
    assert!(err.to_string().contains("select-not-found"));
}

#[test]
fn region_wait_times_out_without_options() {
    let driver = FakeDriver::new();
    driver.respond_to_script("o.value.trim()", json!(0));
    let mut session = session(driver);
    assert!(!AddressPage::new(&mut session).wait_for_region_options(SHORT));
}

#[test]
fn address_book_reached_by_url_or_text() {
    let driver = FakeDriver::new();
    let state = driver.state();
    state.borrow_mut().url = format!("{}index.php?route=account/address/add", BASE);
    let mut session = session(driver);

    assert!(!AddressPage::new(&mut session).address_book_reached(SHORT));
    state.borrow_mut().url = format!("{}index.php?route=account/address", BASE);
    assert!(AddressPage::new(&mut session).address_book_reached(SHORT));
}

// ============================================================================
// Blog and password reset
// ============================================================================

#[test]
fn blog_success_requires_thank_you_and_webmaster() {
    let driver = FakeDriver::new();
    driver.add(&Locator::css(".alert.alert-success"), FakeElement::new("Thank you!"));
    let mut session = session(driver);
    assert!(BlogPage::new(&mut session).success_message(SHORT).is_none());

    let driver = FakeDriver::new();
    driver.add(
        &Locator::css("form#form-comment .alert.alert-success"),
        FakeElement::new(&format!("{} \u{00D7}", COMMENT_THANKS)),
    );
    let mut session = common::session(driver);
    assert_eq!(
        BlogPage::new(&mut session).success_message(SHORT).as_deref(),
        Some(COMMENT_THANKS)
    );
}

#[test]
fn blog_missing_elements_degrade_to_none() {
    let mut session = session(FakeDriver::new());
    let mut page = BlogPage::new(&mut session);

    assert!(page.error_message(SHORT).is_none());
    assert!(page.title().is_none());
    assert!(!page.is_loaded());
}

#[test]
fn password_reset_returns_banner() {
    let driver = FakeDriver::new();
    driver.add(&Locator::id("input-email"), FakeElement::new(""));
    driver.add(
        &Locator::css("input[type='submit'][value='Continue']"),
        FakeElement::new("Continue").on_click(OnClick::ShowAlert(
            "An email with a confirmation link has been sent your email address.".into(),
        )),
    );
    let mut session = session(driver);

    let text = ForgottenPasswordPage::new(&mut session)
        .request_reset("someone@example.com")
        .unwrap();
    assert!(text.contains("email"));
}
