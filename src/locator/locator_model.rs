use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How a locator's selector string is interpreted by the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Css,
    XPath,
    Id,
    Name,
    LinkText,
    PartialLinkText,
    TagName,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Css => "css",
            Strategy::XPath => "xpath",
            Strategy::Id => "id",
            Strategy::Name => "name",
            Strategy::LinkText => "link_text",
            Strategy::PartialLinkText => "partial_link_text",
            Strategy::TagName => "tag_name",
        }
    }
}

/// One concrete way to find a target in the DOM.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    pub strategy: Strategy,
    pub selector: Cow<'static, str>,
}

impl Locator {
    pub const fn css(selector: &'static str) -> Self {
        Self::borrowed(Strategy::Css, selector)
    }

    pub const fn xpath(selector: &'static str) -> Self {
        Self::borrowed(Strategy::XPath, selector)
    }

    pub const fn id(selector: &'static str) -> Self {
        Self::borrowed(Strategy::Id, selector)
    }

    pub const fn name(selector: &'static str) -> Self {
        Self::borrowed(Strategy::Name, selector)
    }

    pub const fn link_text(selector: &'static str) -> Self {
        Self::borrowed(Strategy::LinkText, selector)
    }

    pub const fn tag(selector: &'static str) -> Self {
        Self::borrowed(Strategy::TagName, selector)
    }

    const fn borrowed(strategy: Strategy, selector: &'static str) -> Self {
        Locator {
            strategy,
            selector: Cow::Borrowed(selector),
        }
    }

    /// Build a locator from runtime text (product names, radio values, ...).
    pub fn owned(strategy: Strategy, selector: impl Into<String>) -> Self {
        Locator {
            strategy,
            selector: Cow::Owned(selector.into()),
        }
    }

    /// W3C WebDriver `using`/`value` pair. Id and name have no W3C strategy
    /// of their own and go out as attribute CSS selectors.
    pub fn to_w3c(&self) -> (&'static str, String) {
        match self.strategy {
            Strategy::Css => ("css selector", self.selector.to_string()),
            Strategy::XPath => ("xpath", self.selector.to_string()),
            Strategy::Id => ("css selector", format!("[id=\"{}\"]", escape_attr(&self.selector))),
            Strategy::Name => ("css selector", format!("[name=\"{}\"]", escape_attr(&self.selector))),
            Strategy::LinkText => ("link text", self.selector.to_string()),
            Strategy::PartialLinkText => ("partial link text", self.selector.to_string()),
            Strategy::TagName => ("tag name", self.selector.to_string()),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy.as_str(), self.selector)
    }
}

fn escape_attr(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Declare a static [`Target`]:
///
/// ```
/// use ecommerce_playground::target;
/// use ecommerce_playground::locator::locator_model::{Locator, Target};
///
/// const SUBMIT: Target = target!("SUBMIT", [Locator::id("button-submit"), Locator::css("button[type='submit']")]);
/// assert_eq!(SUBMIT.candidates().len(), 2);
/// ```
#[macro_export]
macro_rules! target {
    ($name:expr, [$($candidate:expr),+ $(,)?]) => {
        $crate::locator::locator_model::Target::new($name, {
            const CANDIDATES: &[$crate::locator::locator_model::Locator] = &[$($candidate),+];
            CANDIDATES
        })
    };
}

/// A semantically named UI element bound to an ordered, non-empty list of
/// locator candidates. Earlier candidates win.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    name: Cow<'static, str>,
    candidates: Cow<'static, [Locator]>,
}

impl Target {
    /// Declare a static target. Panics at compile time when used in a
    /// `const` with an empty candidate list.
    pub const fn new(name: &'static str, candidates: &'static [Locator]) -> Self {
        assert!(!candidates.is_empty(), "target needs at least one locator candidate");
        Target {
            name: Cow::Borrowed(name),
            candidates: Cow::Borrowed(candidates),
        }
    }

    /// Declare a target from runtime data.
    pub fn dynamic(name: impl Into<String>, candidates: Vec<Locator>) -> Result<Self> {
        let name = name.into();
        if candidates.is_empty() {
            return Err(Error::EmptyTarget(name));
        }
        Ok(Target {
            name: Cow::Owned(name),
            candidates: Cow::Owned(candidates),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn candidates(&self) -> &[Locator] {
        &self.candidates
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
