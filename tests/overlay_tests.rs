use std::time::{Duration, Instant};

use ecommerce_playground::locator::locator_model::Locator;
use ecommerce_playground::locator::outcome_text::{
    alert_text, clean_alert_text, success_or_warning_text, wait_for_outcome_text,
};
use ecommerce_playground::locator::overlay::{
    CONSENT_DISMISS, Dismissal, MODAL_DISMISS, dismiss_overlays, wait_for_ready,
};

use crate::common::fake_driver::{ALERT_CSS, FakeDriver, FakeElement};

mod common;

const SHORT: Duration = Duration::from_millis(50);

// ============================================================================
// Overlay dismissal
// ============================================================================

#[test]
fn nothing_to_dismiss_is_not_an_error() {
    let mut driver = FakeDriver::new();
    assert_eq!(dismiss_overlays(&mut driver, SHORT), Dismissal::NothingFound);
}

#[test]
fn consent_banner_clicked() {
    let mut driver = FakeDriver::new();
    let accept = driver.add(&Locator::css(".cc-btn"), FakeElement::new("Got it"));

    let dismissal = dismiss_overlays(&mut driver, SHORT);
    assert_eq!(
        dismissal,
        Dismissal::Dismissed {
            locator: Locator::css(".cc-btn"),
            clicked: 1,
        }
    );
    assert_eq!(driver.state().borrow().element(&accept).clicks, 1);
}

#[test]
fn most_specific_consent_control_first() {
    let mut driver = FakeDriver::new();
    let specific = driver.add(&CONSENT_DISMISS[0], FakeElement::new("Allow"));
    let generic = driver.add(&Locator::css(".agree"), FakeElement::new("Agree"));

    dismiss_overlays(&mut driver, SHORT);
    let state = driver.state();
    let state = state.borrow();
    assert_eq!(state.element(&specific).clicks, 1);
    assert_eq!(state.element(&generic).clicks, 0);
}

#[test]
fn modal_probed_only_without_consent_control() {
    let mut driver = FakeDriver::new();
    let close = driver.add(&MODAL_DISMISS[1], FakeElement::new("x"));

    let dismissal = dismiss_overlays(&mut driver, SHORT);
    assert!(matches!(dismissal, Dismissal::Dismissed { ref locator, .. } if *locator == MODAL_DISMISS[1]));
    assert_eq!(driver.state().borrow().element(&close).clicks, 1);

    let mut driver = FakeDriver::new();
    driver.add(&Locator::css(".cookie-accept"), FakeElement::new("OK"));
    let untouched = driver.add(&MODAL_DISMISS[0], FakeElement::new("x"));
    dismiss_overlays(&mut driver, SHORT);
    assert_eq!(driver.state().borrow().element(&untouched).clicks, 0);
}

#[test]
fn unclickable_overlay_is_swallowed() {
    let mut driver = FakeDriver::new();
    driver.add(&Locator::css(".banner-close"), FakeElement::new("x").unclickable());

    let dismissal = dismiss_overlays(&mut driver, SHORT);
    assert_eq!(
        dismissal,
        Dismissal::Dismissed {
            locator: Locator::css(".banner-close"),
            clicked: 0,
        }
    );
}

#[test]
fn every_matching_control_is_clicked() {
    let mut driver = FakeDriver::new();
    let a = driver.add(&Locator::css(".cc-btn"), FakeElement::new("a"));
    let b = driver.add(&Locator::css(".cc-btn"), FakeElement::new("b").intercepted());

    let dismissal = dismiss_overlays(&mut driver, SHORT);
    assert!(matches!(dismissal, Dismissal::Dismissed { clicked: 2, .. }));
    let state = driver.state();
    let state = state.borrow();
    assert_eq!(state.element(&a).clicks, 1);
    assert_eq!(state.element(&b).clicks, 1);
}

#[test]
fn ready_wait_gives_up_on_loading_document() {
    let mut driver = FakeDriver::new();
    driver.state().borrow_mut().ready_state = "loading".to_string();

    let start = Instant::now();
    assert!(!wait_for_ready(&mut driver, SHORT));
    assert!(start.elapsed() >= SHORT);

    driver.state().borrow_mut().ready_state = "complete".to_string();
    assert!(wait_for_ready(&mut driver, SHORT));
}

#[test]
fn dismissal_still_probes_when_document_never_completes() {
    let mut driver = FakeDriver::new();
    driver.state().borrow_mut().ready_state = "interactive".to_string();
    driver.add(&Locator::css(".cc-btn"), FakeElement::new("ok"));

    assert!(matches!(
        dismiss_overlays(&mut driver, SHORT),
        Dismissal::Dismissed { clicked: 1, .. }
    ));
}

// ============================================================================
// Outcome text
// ============================================================================

#[test]
fn clean_alert_text_strips_close_glyph() {
    assert_eq!(
        clean_alert_text("  Success: You have modified your product comparison! \u{00D7} "),
        "Success: You have modified your product comparison!"
    );
    assert_eq!(clean_alert_text("\u{00D7}"), "");
}

#[test]
fn alert_text_joins_every_banner() {
    let mut driver = FakeDriver::new();
    let alerts = Locator::css(ALERT_CSS);
    driver.add(&alerts, FakeElement::new("Warning: E-Mail Address is already registered! \u{00D7}"));
    driver.add(&alerts, FakeElement::new("   "));
    driver.add(&alerts, FakeElement::new("Check the form"));

    assert_eq!(
        alert_text(&mut driver),
        "Warning: E-Mail Address is already registered! Check the form"
    );
}

#[test]
fn falls_back_to_main_content() {
    let mut driver = FakeDriver::new();
    driver.add(
        &Locator::css("#content"),
        FakeElement::new("  An email with a confirmation link has been sent  "),
    );
    assert_eq!(
        success_or_warning_text(&mut driver),
        "An email with a confirmation link has been sent"
    );
}

#[test]
fn empty_when_nothing_on_page() {
    let mut driver = FakeDriver::new();
    assert_eq!(success_or_warning_text(&mut driver), "");
}

#[test]
fn waits_for_alert_before_reading_content() {
    let mut driver = FakeDriver::new();
    let alerts = Locator::css(ALERT_CSS);
    driver.add(&alerts, FakeElement::new("Success: Your newsletter subscription has been successfully updated!"));
    driver.appear_after(&alerts, 2);
    driver.add(&Locator::css("#content"), FakeElement::new("Newsletter Subscription"));

    let text = wait_for_outcome_text(&mut driver, Duration::from_millis(300), Duration::from_millis(10));
    assert!(text.starts_with("Success"));
}

#[test]
fn outcome_wait_ends_with_content_text() {
    let mut driver = FakeDriver::new();
    driver.add(&Locator::css("#content"), FakeElement::new("Forgot Your Password?"));

    let text = wait_for_outcome_text(&mut driver, SHORT, Duration::from_millis(10));
    assert_eq!(text, "Forgot Your Password?");
}
