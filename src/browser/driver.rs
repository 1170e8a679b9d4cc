use std::fmt;

use serde_json::{Value, json};

use crate::error::Result;
use crate::locator::locator_model::Locator;

/// Opaque handle to an element inside the current page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementRef(pub String);

impl ElementRef {
    pub fn new(id: impl Into<String>) -> Self {
        ElementRef(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub const SCRIPT_CLICK: &str = "arguments[0].click();";

pub const SCRIPT_SET_VALUE: &str = "const el = arguments[0]; el.value = arguments[1]; \
     el.dispatchEvent(new Event('input', {bubbles: true})); \
     el.dispatchEvent(new Event('change', {bubbles: true}));";

pub const SCRIPT_SCROLL_INTO_VIEW: &str = "arguments[0].scrollIntoView({block: 'center'});";

pub const SCRIPT_READY_STATE: &str = "return document.readyState";

pub const SCRIPT_SCROLL_BY: &str = "window.scrollBy(0, arguments[0]);";

pub const SCRIPT_SCROLL_TO_BOTTOM: &str = "window.scrollTo(0, document.body.scrollHeight);";

/// Everything the locator strategy and the page objects need from a browser.
///
/// `WebDriverClient` talks to a real browser over the W3C protocol; tests use
/// an in-memory implementation. Script-driven helpers have default
/// implementations on top of `execute_script`.
pub trait Driver {
    fn navigate(&mut self, url: &str) -> Result<()>;

    fn current_url(&mut self) -> Result<String>;

    fn title(&mut self) -> Result<String>;

    fn page_source(&mut self) -> Result<String>;

    /// All elements matching `locator`. No match is an empty list, not an error.
    fn find_elements(&mut self, locator: &Locator) -> Result<Vec<ElementRef>>;

    /// All elements matching `locator` below `parent`.
    fn find_elements_in(&mut self, parent: &ElementRef, locator: &Locator) -> Result<Vec<ElementRef>>;

    fn click(&mut self, element: &ElementRef) -> Result<()>;

    fn clear(&mut self, element: &ElementRef) -> Result<()>;

    fn send_keys(&mut self, element: &ElementRef, text: &str) -> Result<()>;

    /// Rendered text of the element.
    fn text(&mut self, element: &ElementRef) -> Result<String>;

    fn attribute(&mut self, element: &ElementRef, name: &str) -> Result<Option<String>>;

    fn is_selected(&mut self, element: &ElementRef) -> Result<bool>;

    fn is_displayed(&mut self, element: &ElementRef) -> Result<bool>;

    /// Move the pointer over the element (mega menus open on hover).
    fn hover(&mut self, element: &ElementRef) -> Result<()>;

    fn execute_script(&mut self, script: &str, args: Vec<Value>) -> Result<Value>;

    /// JSON form of an element when passed as a script argument.
    fn element_arg(&self, element: &ElementRef) -> Value;

    /// PNG bytes of the current viewport.
    fn screenshot_png(&mut self) -> Result<Vec<u8>>;

    /// End the browser session. Called exactly once by `PageSession`.
    fn quit(&mut self) -> Result<()>;

    fn script_click(&mut self, element: &ElementRef) -> Result<()> {
        let arg = self.element_arg(element);
        self.execute_script(SCRIPT_CLICK, vec![arg]).map(|_| ())
    }

    fn script_set_value(&mut self, element: &ElementRef, value: &str) -> Result<()> {
        let arg = self.element_arg(element);
        self.execute_script(SCRIPT_SET_VALUE, vec![arg, json!(value)])
            .map(|_| ())
    }

    fn scroll_into_view(&mut self, element: &ElementRef) -> Result<()> {
        let arg = self.element_arg(element);
        self.execute_script(SCRIPT_SCROLL_INTO_VIEW, vec![arg])
            .map(|_| ())
    }

    fn ready_state(&mut self) -> Result<String> {
        let value = self.execute_script(SCRIPT_READY_STATE, Vec::new())?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }
}
