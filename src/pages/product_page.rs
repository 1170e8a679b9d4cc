use std::fmt;
use std::time::Duration;

use crate::browser::session::PageSession;
use crate::error::Result;
use crate::locator::action::Action;
use crate::locator::locator_model::{Locator, Strategy, Target};
use crate::pages::routes;
use crate::target;

/// Budget for the quick breadcrumb read on product pages.
pub const BREADCRUMB_QUICK_WAIT: Duration = Duration::from_secs(1);

/// Where a search term was found on a product page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermLocation {
    Name,
    Details,
    Tags,
    Description,
    Body,
}

impl fmt::Display for TermLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TermLocation::Name => "name",
            TermLocation::Details => "product details/manufacturer",
            TermLocation::Tags => "tags",
            TermLocation::Description => "description",
            TermLocation::Body => "page body",
        };
        f.write_str(s)
    }
}

/// Product detail page.
pub struct ProductPage<'s> {
    session: &'s mut PageSession,
}

impl<'s> ProductPage<'s> {
    pub const ADD_TO_CART: Target = target!(
        "ADD_TO_CART",
        [
            Locator::id("button-cart"),
            Locator::css("button.button-cart"),
            Locator::xpath("//button[contains(normalize-space(.), 'Add to Cart')]"),
        ]
    );

    pub const CART_TOAST: Target = target!(
        "CART_TOAST",
        [
            Locator::css("div.alert.alert-success.alert-dismissible"),
            Locator::css(".alert-success"),
        ]
    );

    pub const BREADCRUMB: Target = target!(
        "BREADCRUMB",
        [
            Locator::css("ul.breadcrumb"),
            Locator::css("ol.breadcrumb"),
            Locator::css("div.breadcrumb"),
        ]
    );

    pub const PRODUCT_NAME: Target = target!(
        "PRODUCT_NAME",
        [
            Locator::tag("h1"),
            Locator::css(".product-info h1"),
            Locator::css(".product-title h1"),
            Locator::css("h1#content"),
        ]
    );

    pub const DETAILS: Target = target!(
        "DETAILS",
        [
            Locator::css(".list-unstyled li"),
            Locator::css(".product-info .list-unstyled li"),
            Locator::css("#content .list-unstyled li"),
        ]
    );

    pub const TAGS: Target = target!(
        "TAGS",
        [
            Locator::css(".tags a"),
            Locator::css(".product-tags a"),
            Locator::css(".tag-list a"),
        ]
    );

    pub const DESCRIPTION: Target = target!(
        "DESCRIPTION",
        [
            Locator::css(".description"),
            Locator::css("#tab-description"),
            Locator::css(".product-desc"),
            Locator::css(".tab-content"),
        ]
    );

    pub const REVIEW_TAB: Target = target!(
        "REVIEW_TAB",
        [
            Locator::css("a[href='#tab-review']"),
            Locator::css("a[data-toggle='tab'][href*='review']"),
            Locator::css("li a[href*='review']"),
        ]
    );

    pub const REVIEW_NAME: Target = target!(
        "REVIEW_NAME",
        [
            Locator::id("input-name"),
            Locator::css("input[name='name']"),
            Locator::css("input#name"),
        ]
    );

    pub const REVIEW_TEXT: Target = target!(
        "REVIEW_TEXT",
        [
            Locator::id("input-review"),
            Locator::css("textarea[name='text']"),
            Locator::css("textarea#review"),
        ]
    );

    pub const REVIEW_SUBMIT: Target = target!(
        "REVIEW_SUBMIT",
        [
            Locator::id("button-review"),
            Locator::css("button#button-review"),
            Locator::css("input[value='Continue']"),
            Locator::css("button[type='submit']"),
        ]
    );

    pub fn new(session: &'s mut PageSession) -> Self {
        Self { session }
    }

    pub fn open(&mut self, product_id: u32) -> Result<()> {
        self.session.visit(&routes::product(product_id))
    }

    /// Add the product to the cart and return the success toast text.
    pub fn add_to_cart(&mut self) -> Result<String> {
        self.session.click(&Self::ADD_TO_CART)?;
        let wait = self.session.config().default_wait;
        let toast = self.session.locate_visible(&Self::CART_TOAST, wait)?;
        let text = self.session.driver().text(toast.first())?;
        Ok(crate::locator::outcome_text::clean_alert_text(&text))
    }

    /// Breadcrumb text, or empty when none shows up within `timeout`.
    pub fn breadcrumb_quick(&mut self, timeout: Duration) -> String {
        let mut found = String::new();
        self.session.poll_until(timeout, |session| {
            match session.texts_of(&Self::BREADCRUMB).into_iter().next() {
                Some(text) => {
                    found = text;
                    true
                }
                None => false,
            }
        });
        found
    }

    /// Look for `term` (case-insensitive) in the name, details, tags,
    /// description and finally the whole body.
    pub fn find_term(&mut self, term: &str) -> Option<TermLocation> {
        let wanted = term.to_lowercase();
        let sections = [
            (Self::PRODUCT_NAME, TermLocation::Name),
            (Self::DETAILS, TermLocation::Details),
            (Self::TAGS, TermLocation::Tags),
            (Self::DESCRIPTION, TermLocation::Description),
        ];
        for (target, location) in &sections {
            let text = self.session.texts_of(target).join(" ").to_lowercase();
            if text.contains(&wanted) {
                return Some(*location);
            }
        }
        if self.session.body_text().to_lowercase().contains(&wanted) {
            return Some(TermLocation::Body);
        }
        None
    }

    /// Switch to the review tab when the theme has one.
    pub fn open_review_tab(&mut self) -> bool {
        let tabs = self.session.find_now(&Self::REVIEW_TAB);
        match tabs.first() {
            Some(tab) => self
                .session
                .act_on(tab, Self::REVIEW_TAB.name(), Action::Click)
                .is_ok(),
            None => false,
        }
    }

    pub fn fill_review(&mut self, name: &str, text: &str) -> Result<()> {
        let wait = self.session.config().default_wait;
        let name_input = self.session.locate_visible(&Self::REVIEW_NAME, wait)?;
        let text_input = self.session.locate_visible(&Self::REVIEW_TEXT, wait)?;
        self.session
            .act_on(name_input.first(), Self::REVIEW_NAME.name(), Action::ClearAndType(name))?;
        self.session
            .act_on(text_input.first(), Self::REVIEW_TEXT.name(), Action::ClearAndType(text))?;
        Ok(())
    }

    /// Pick a star rating, falling back to any rating radio.
    pub fn choose_rating(&mut self, stars: u8) -> Result<()> {
        let rating = Target::dynamic(
            format!("RATING[{}]", stars),
            vec![
                Locator::owned(
                    Strategy::Css,
                    format!("input[name='rating'][value='{}']", stars),
                ),
                Locator::css("input[name='rating']"),
            ],
        )?;
        self.session.click(&rating)?;
        Ok(())
    }

    pub fn submit_review(&mut self) -> Result<()> {
        self.session.click(&Self::REVIEW_SUBMIT)?;
        Ok(())
    }
}
