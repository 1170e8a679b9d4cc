use std::time::{Duration, Instant};

use ecommerce_playground::browser::driver::{Driver, ElementRef};
use ecommerce_playground::error::Error;
use ecommerce_playground::locator::action::{Action, Outcome, act};
use ecommerce_playground::locator::locator_model::{Locator, Strategy, Target};
use ecommerce_playground::locator::resolver::{
    Presence, WaitPolicy, locate, probe, try_locate,
};
use ecommerce_playground::target;

use crate::common::fake_driver::{FakeDriver, FakeElement};

mod common;

const SEARCH: Target = target!(
    "SEARCH",
    [
        Locator::id("search-primary"),
        Locator::name("search"),
        Locator::css("input.search"),
    ]
);

fn quick() -> WaitPolicy {
    WaitPolicy::new(Duration::from_millis(150), Duration::from_millis(10))
}

// ============================================================================
// Locator model
// ============================================================================

#[test]
fn locator_display_names_strategy_and_selector() {
    assert_eq!(Locator::css("#content").to_string(), "css=#content");
    assert_eq!(Locator::xpath("//h1").to_string(), "xpath=//h1");
    assert_eq!(Locator::tag("body").to_string(), "tag_name=body");
}

#[test]
fn id_and_name_go_out_as_attribute_css() {
    assert_eq!(
        Locator::id("input-email").to_w3c(),
        ("css selector", "[id=\"input-email\"]".to_string())
    );
    assert_eq!(
        Locator::name("q\"x").to_w3c(),
        ("css selector", "[name=\"q\\\"x\"]".to_string())
    );
    assert_eq!(Locator::link_text("Register").to_w3c().0, "link text");
}

#[test]
fn dynamic_target_requires_candidates() {
    let err = Target::dynamic("EMPTY", Vec::new()).unwrap_err();
    assert!(matches!(err, Error::EmptyTarget(ref name) if name == "EMPTY"));

    let target = Target::dynamic(
        "RATING[5]",
        vec![Locator::owned(Strategy::Css, "input[value='5']")],
    )
    .unwrap();
    assert_eq!(target.name(), "RATING[5]");
    assert_eq!(target.candidates().len(), 1);
}

#[test]
fn target_macro_keeps_candidate_order() {
    let names: Vec<String> = SEARCH.candidates().iter().map(|l| l.to_string()).collect();
    assert_eq!(names, vec!["id=search-primary", "name=search", "css=input.search"]);
    assert_eq!(SEARCH.to_string(), "SEARCH");
}

// ============================================================================
// Resolver
// ============================================================================

#[test]
fn first_present_candidate_wins() {
    let mut driver = FakeDriver::new();
    let second = driver.add(&Locator::name("search"), FakeElement::new(""));
    driver.add(&Locator::css("input.search"), FakeElement::new(""));

    let resolved = locate(&mut driver, &SEARCH, &quick(), Presence::Attached).unwrap();
    assert_eq!(resolved.index(), 1);
    assert!(resolved.used_fallback());
    assert_eq!(resolved.first(), &second);
    assert_eq!(resolved.target(), "SEARCH");
}

#[test]
fn primary_candidate_preferred_when_both_present() {
    let mut driver = FakeDriver::new();
    let primary = driver.add(&Locator::id("search-primary"), FakeElement::new(""));
    driver.add(&Locator::css("input.search"), FakeElement::new(""));

    let resolved = locate(&mut driver, &SEARCH, &quick(), Presence::Attached).unwrap();
    assert_eq!(resolved.index(), 0);
    assert!(!resolved.used_fallback());
    assert_eq!(resolved.first(), &primary);
}

#[test]
fn earlier_candidate_that_appears_later_still_wins() {
    // The primary shows up on the second sweep while the fallback is present
    // from the start; a per-candidate wait would never see this ordering.
    let mut driver = FakeDriver::new();
    let primary = driver.add(&Locator::id("search-primary"), FakeElement::new(""));
    driver.add(&Locator::css("input.search"), FakeElement::new(""));
    driver.appear_after(&Locator::id("search-primary"), 1);

    let first_sweep = probe(&mut driver, &SEARCH, Presence::Attached).unwrap();
    assert_eq!(first_sweep.index(), 2);

    let resolved = locate(&mut driver, &SEARCH, &quick(), Presence::Attached).unwrap();
    assert_eq!(resolved.first(), &primary);
}

#[test]
fn waits_for_late_element() {
    let mut driver = FakeDriver::new();
    driver.add(&Locator::css("input.search"), FakeElement::new(""));
    driver.appear_after(&Locator::css("input.search"), 3);

    let resolved = locate(&mut driver, &SEARCH, &quick(), Presence::Attached).unwrap();
    assert_eq!(resolved.index(), 2);
    let state = driver.state();
    assert_eq!(state.borrow().lookups["css=input.search"], 4);
}

#[test]
fn not_found_reports_target_and_candidates() {
    let mut driver = FakeDriver::new();
    let start = Instant::now();
    let err = locate(&mut driver, &SEARCH, &quick(), Presence::Attached).unwrap_err();

    assert!(start.elapsed() >= Duration::from_millis(150));
    assert!(err.is_not_found());
    match err {
        Error::NotFound { target, tried, .. } => {
            assert_eq!(target, "SEARCH");
            assert_eq!(tried, 3);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn candidate_lookup_error_counts_as_absent() {
    let mut driver = FakeDriver::new();
    driver.fail_lookups(&Locator::id("search-primary"));
    driver.add(&Locator::name("search"), FakeElement::new(""));

    let resolved = locate(&mut driver, &SEARCH, &quick(), Presence::Attached).unwrap();
    assert_eq!(resolved.index(), 1);
}

#[test]
fn displayed_presence_skips_hidden_elements() {
    let mut driver = FakeDriver::new();
    driver.add(&Locator::id("search-primary"), FakeElement::new("").hidden());
    let visible = driver.add(&Locator::css("input.search"), FakeElement::new(""));

    let attached = locate(&mut driver, &SEARCH, &quick(), Presence::Attached).unwrap();
    assert_eq!(attached.index(), 0);

    let displayed = locate(&mut driver, &SEARCH, &quick(), Presence::Displayed).unwrap();
    assert_eq!(displayed.index(), 2);
    assert_eq!(displayed.first(), &visible);
}

#[test]
fn try_locate_is_none_for_absent_target() {
    let mut driver = FakeDriver::new();
    assert!(try_locate(&mut driver, &SEARCH, &quick(), Presence::Attached).is_none());
}

#[test]
fn resolved_returns_every_match_of_the_winning_candidate() {
    let mut driver = FakeDriver::new();
    driver.add(&Locator::name("search"), FakeElement::new("a"));
    driver.add(&Locator::name("search"), FakeElement::new("b"));

    let resolved = locate(&mut driver, &SEARCH, &quick(), Presence::Attached).unwrap();
    assert_eq!(resolved.elements().len(), 2);
    assert_eq!(resolved.into_elements().len(), 2);
}

// ============================================================================
// Act-with-fallback
// ============================================================================

fn add_button(driver: &FakeDriver, element: FakeElement) -> ElementRef {
    driver.add(&Locator::css("button"), element)
}

#[test]
fn native_click_succeeds() {
    let mut driver = FakeDriver::new();
    let button = add_button(&driver, FakeElement::new("Go"));

    let outcome = act(&mut driver, &button, &Action::Click);
    assert_eq!(outcome, Outcome::Succeeded);
    assert_eq!(driver.state().borrow().element(&button).clicks, 1);
}

#[test]
fn intercepted_click_falls_back_to_script() {
    let mut driver = FakeDriver::new();
    let button = add_button(&driver, FakeElement::new("Go").intercepted());

    let outcome = act(&mut driver, &button, &Action::Click);
    match &outcome {
        Outcome::SucceededViaFallback { native_error } => {
            assert!(native_error.contains("intercepted"))
        }
        other => panic!("expected fallback, got {other:?}"),
    }
    assert!(outcome.succeeded());
    let state = driver.state();
    let state = state.borrow();
    assert_eq!(state.element(&button).clicks, 1);
    assert!(state.log.iter().any(|l| l.starts_with("script_click")));
}

#[test]
fn exhausted_click_becomes_interaction_blocked() {
    let mut driver = FakeDriver::new();
    let button = add_button(&driver, FakeElement::new("Go").unclickable());

    let outcome = act(&mut driver, &button, &Action::Click);
    assert!(!outcome.succeeded());

    let err = outcome.require("BUY", &Action::Click).unwrap_err();
    match err {
        Error::InteractionBlocked {
            target,
            action,
            native,
            fallback,
        } => {
            assert_eq!(target, "BUY");
            assert_eq!(action, "click");
            assert!(native.contains("intercepted"));
            assert!(fallback.contains("blocked"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn clear_and_type_replaces_value() {
    let mut driver = FakeDriver::new();
    let field = driver.add(&Locator::id("input-email"), FakeElement::new(""));
    driver.send_keys(&field, "old").unwrap();

    let outcome = act(&mut driver, &field, &Action::ClearAndType("new@example.com"));
    assert_eq!(outcome, Outcome::Succeeded);
    assert_eq!(driver.state().borrow().element(&field).value, "new@example.com");
}

#[test]
fn blocked_typing_sets_value_by_script() {
    let mut driver = FakeDriver::new();
    let field = driver.add(&Locator::id("input-email"), FakeElement::new("").typing_blocked());

    let outcome = act(&mut driver, &field, &Action::ClearAndType("x@example.com"));
    assert!(matches!(outcome, Outcome::SucceededViaFallback { .. }));
    assert_eq!(driver.state().borrow().element(&field).value, "x@example.com");
}

#[test]
fn type_fallback_appends_to_current_value() {
    let mut driver = FakeDriver::new();
    let mut element = FakeElement::new("").typing_blocked();
    element.value = "Nik".to_string();
    let field = driver.add(&Locator::id("q"), element);

    let outcome = act(&mut driver, &field, &Action::Type("on"));
    assert!(outcome.succeeded());
    assert_eq!(driver.state().borrow().element(&field).value, "Nikon");
}

#[test]
fn exhausted_typing_leaves_no_partial_text() {
    let mut driver = FakeDriver::new();
    let mut element = FakeElement::new("").read_only();
    element.value = "stale".to_string();
    let field = driver.add(&Locator::id("q"), element);

    let outcome = act(&mut driver, &field, &Action::ClearAndType("fresh"));
    assert!(matches!(outcome, Outcome::Exhausted { .. }));
    let value = driver.state().borrow().element(&field).value.clone();
    assert!(!value.contains("fresh"));
}

#[test]
fn action_names() {
    assert_eq!(Action::Click.name(), "click");
    assert_eq!(Action::Type("x").name(), "type");
    assert_eq!(Action::ClearAndType("x").name(), "clear_and_type");
    assert_eq!(Action::PressEnter.name(), "press_enter");
}
