use crate::browser::session::PageSession;
use crate::error::Result;
use crate::locator::locator_model::{Locator, Target};
use crate::pages::push_unique_hrefs;
use crate::target;

/// State of a listing once it has settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingState {
    HasProducts,
    NoProducts,
}

/// Category, manufacturer or search-results listing.
pub struct ListingPage<'s> {
    session: &'s mut PageSession,
}

impl<'s> ListingPage<'s> {
    pub const PRODUCT_TILES: Target = target!(
        "PRODUCT_TILES",
        [
            Locator::css(".product-layout"),
            Locator::css(".product-thumb"),
            Locator::css(".product-list"),
        ]
    );

    pub const NO_PRODUCTS: Locator =
        Locator::xpath("//*[contains(text(),'There are no products to list')]");

    /// Result-link selectors on search pages; every match is collected.
    pub const SEARCH_RESULT_LINKS: &'static [Locator] = &[
        Locator::css(".product-layout .caption a"),
        Locator::css(".product-thumb .caption a"),
        Locator::css(".product-list .caption a"),
        Locator::css("h4 a"),
        Locator::css(".product-name a"),
    ];

    /// Product-link selectors on category/manufacturer listings, most
    /// specific first; the first that matches wins.
    pub const LISTING_LINKS: Target = target!(
        "LISTING_LINKS",
        [
            Locator::css("div.product-layout a[href*='product']"),
            Locator::css("div.product-thumb a[href*='product']"),
            Locator::css("div.product-item a[href*='product']"),
            Locator::css(".product-grid .product a[href*='product']"),
            Locator::css("#content a[href*='product']"),
            Locator::css("a[href*='product/product']"),
        ]
    );

    pub const LISTING_READY: Target = target!(
        "LISTING_READY",
        [
            Locator::css("#content"),
            Locator::css("ul.breadcrumb"),
            Locator::css("div.breadcrumb"),
        ]
    );

    pub fn new(session: &'s mut PageSession) -> Self {
        Self { session }
    }

    /// Wait until product tiles or the "no products" notice appear.
    pub fn wait_for_results(&mut self) -> Result<ListingState> {
        let mut candidates = Self::PRODUCT_TILES.candidates().to_vec();
        candidates.push(Self::NO_PRODUCTS);
        let settled = Target::dynamic("SEARCH_RESULTS", candidates)?;
        let resolved = self.session.locate(&settled)?;
        if resolved.index() < Self::PRODUCT_TILES.candidates().len() {
            Ok(ListingState::HasProducts)
        } else {
            Ok(ListingState::NoProducts)
        }
    }

    /// Every result link on a search page, de-duplicated, in document order.
    pub fn search_result_links(&mut self) -> Vec<String> {
        let mut links = Vec::new();
        for locator in Self::SEARCH_RESULT_LINKS {
            let elements = self
                .session
                .driver()
                .find_elements(locator)
                .unwrap_or_default();
            push_unique_hrefs(self.session.driver(), &elements, &mut links);
        }
        links
    }

    /// Product links from the first listing selector that matches.
    pub fn listing_links(&mut self) -> Vec<String> {
        let wait = self.session.config().poll_interval * 4;
        self.session.find_optional(&Self::LISTING_READY, wait);

        let mut links = Vec::new();
        for locator in Self::LISTING_LINKS.candidates() {
            let elements = self
                .session
                .driver()
                .find_elements(locator)
                .unwrap_or_default();
            push_unique_hrefs(self.session.driver(), &elements, &mut links);
            if !links.is_empty() {
                break;
            }
        }
        links
    }
}
