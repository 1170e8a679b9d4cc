use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::browser::driver::{Driver, ElementRef};
use crate::browser::webdriver::KEY_ENTER;
use crate::error::{Error, Result};

/// An interaction to perform on a resolved element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action<'a> {
    Click,
    /// Append text to the field
    Type(&'a str),
    /// Clear the field, then type
    ClearAndType(&'a str),
    PressEnter,
}

impl Action<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Click => "click",
            Action::Type(_) => "type",
            Action::ClearAndType(_) => "clear_and_type",
            Action::PressEnter => "press_enter",
        }
    }
}

/// Result of one action attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// The native interaction worked
    Succeeded,
    /// The native interaction failed; the script-driven one worked
    SucceededViaFallback { native_error: String },
    /// Both variants failed
    Exhausted { native_error: String, fallback_error: String },
}

impl Outcome {
    pub fn succeeded(&self) -> bool {
        !matches!(self, Outcome::Exhausted { .. })
    }

    /// Turn an exhausted outcome into `Error::InteractionBlocked`.
    pub fn require(self, target: &str, action: &Action<'_>) -> Result<Outcome> {
        match self {
            Outcome::Exhausted {
                native_error,
                fallback_error,
            } => Err(Error::InteractionBlocked {
                target: target.to_string(),
                action: action.name().to_string(),
                native: native_error,
                fallback: fallback_error,
            }),
            other => Ok(other),
        }
    }
}

/// Perform `action` natively, falling back to a script-driven equivalent.
///
/// Typing never leaves partial text behind: the field is cleared before
/// typing and cleared again when both variants fail.
pub fn act(driver: &mut dyn Driver, element: &ElementRef, action: &Action<'_>) -> Outcome {
    let native = native(driver, element, action);
    let native_error = match native {
        Ok(()) => return Outcome::Succeeded,
        Err(e) => e.to_string(),
    };

    debug!(element = %element, action = action.name(), error = %native_error, "native action failed, trying script fallback");

    match fallback(driver, element, action) {
        Ok(()) => Outcome::SucceededViaFallback { native_error },
        Err(e) => {
            if matches!(action, Action::Type(_) | Action::ClearAndType(_)) {
                let _ = driver
                    .clear(element)
                    .or_else(|_| driver.script_set_value(element, ""));
            }
            warn!(element = %element, action = action.name(), "action exhausted");
            Outcome::Exhausted {
                native_error,
                fallback_error: e.to_string(),
            }
        }
    }
}

fn native(driver: &mut dyn Driver, element: &ElementRef, action: &Action<'_>) -> Result<()> {
    match action {
        Action::Click => driver.click(element),
        Action::Type(text) => driver.send_keys(element, text),
        Action::ClearAndType(text) => {
            driver.clear(element)?;
            driver.send_keys(element, text)
        }
        Action::PressEnter => driver.send_keys(element, KEY_ENTER),
    }
}

fn fallback(driver: &mut dyn Driver, element: &ElementRef, action: &Action<'_>) -> Result<()> {
    match action {
        Action::Click => driver.script_click(element),
        Action::Type(text) => {
            let current = driver.attribute(element, "value")?.unwrap_or_default();
            driver.script_set_value(element, &format!("{}{}", current, text))
        }
        Action::ClearAndType(text) => driver.script_set_value(element, text),
        Action::PressEnter => {
            let arg = driver.element_arg(element);
            driver
                .execute_script(
                    "const f = arguments[0].form; if (!f) { throw new Error('no enclosing form'); } \
                     if (f.requestSubmit) { f.requestSubmit(); } else { f.submit(); }",
                    vec![arg],
                )
                .map(|_| ())
        }
    }
}
