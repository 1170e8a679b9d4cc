use std::time::Duration;

use tracing::{debug, info};

use crate::browser::session::PageSession;
use crate::error::{Error, Result};
use crate::locator::action::Action;
use crate::locator::locator_model::{Locator, Strategy, Target};
use crate::locator::overlay::Dismissal;
use crate::target;

const NAV_HOVER_SETTLE: Duration = Duration::from_millis(200);

/// Storefront landing page.
pub struct HomePage<'s> {
    session: &'s mut PageSession,
}

impl<'s> HomePage<'s> {
    pub const FEATURED_PRODUCTS: Target = target!(
        "FEATURED_PRODUCTS",
        [
            Locator::css("#content .product-layout"),
            Locator::css(".product-thumb"),
            Locator::css(".product-layout"),
        ]
    );

    pub const PRODUCT_LINKS: Target = target!(
        "PRODUCT_LINKS",
        [
            Locator::css("#content .product-layout .caption a"),
            Locator::css(".product-thumb a"),
            Locator::css(".product-layout a"),
        ]
    );

    pub const SHOP_BY_CATEGORY: Target = target!(
        "SHOP_BY_CATEGORY",
        [
            Locator::link_text("Shop by Category"),
            Locator::xpath("//a[normalize-space()='Shop by Category']"),
        ]
    );

    pub const CATEGORY_PANEL: Target = target!(
        "CATEGORY_PANEL",
        [
            Locator::css("div#widget-navbar-217834 ul.list-unstyled"),
            Locator::css("#widget-navbar-217834 ul"),
        ]
    );

    pub const PROMO_HEADING: Target = target!(
        "PROMO_HEADING",
        [Locator::xpath(
            "//h3[contains(translate(., 'UPTO', 'upto'), 'upto 50% off') and \
             contains(translate(., 'WASHING MACHINE', 'washing machine'), 'washing machine')]"
        )]
    );

    /// Relative to the promotion heading.
    pub const PROMO_SHOP_NOW: Locator =
        Locator::xpath(".//following::a[normalize-space()='SHOP NOW'][1]");

    pub const NAV_ASUS: Target = target!(
        "NAV_ASUS",
        [Locator::xpath(
            "//nav//a[normalize-space() = 'Asus' or contains(normalize-space(.), 'Asus')]"
        )]
    );

    pub const NAV_CONTAINERS: &'static [Locator] = &[
        Locator::css("nav#menu"),
        Locator::css("nav.navbar"),
        Locator::tag("nav"),
    ];

    pub const ANY_ASUS_LINK: Target = target!(
        "ANY_ASUS_LINK",
        [Locator::xpath(
            "//a[contains(., 'Asus') and (contains(@href,'manufacturer') or \
             contains(@href,'category') or contains(@href,'product'))]"
        )]
    );

    pub const SEARCH_INPUT: Target = target!(
        "SEARCH_INPUT",
        [
            Locator::css("input[name='search']"),
            Locator::css("input[type='search']"),
            Locator::css("input#search"),
            Locator::css("input.form-control[type='text']"),
        ]
    );

    pub const SEARCH_BUTTON: Target = target!(
        "SEARCH_BUTTON",
        [
            Locator::css("button[type='button'].btn-default"),
            Locator::css("button[type='submit']"),
        ]
    );

    pub fn new(session: &'s mut PageSession) -> Self {
        Self { session }
    }

    /// Visit the site root and clear any consent banner.
    pub fn open(&mut self) -> Result<Dismissal> {
        self.session.visit("")?;
        Ok(self.session.dismiss_overlays())
    }

    pub fn title(&mut self) -> Result<String> {
        self.session.title()
    }

    pub fn has_featured_products(&mut self) -> bool {
        let wait = self.session.config().default_wait;
        self.session
            .find_optional(&Self::FEATURED_PRODUCTS, wait)
            .or_else(|| self.session.find_optional(&Self::PRODUCT_LINKS, wait))
            .is_some()
    }

    /// Follow a product link by its visible name.
    pub fn open_product(&mut self, name: &str) -> Result<()> {
        let link = Target::dynamic(
            format!("PRODUCT_LINK[{}]", name),
            vec![
                Locator::owned(Strategy::LinkText, name),
                Locator::owned(Strategy::PartialLinkText, name),
            ],
        )?;
        self.session.click(&link)?;
        Ok(())
    }

    /// Open the slide-out category panel and list the category names in it.
    pub fn open_category_panel(&mut self) -> Result<Vec<String>> {
        self.session.click(&Self::SHOP_BY_CATEGORY)?;
        let wait = self.session.config().default_wait;
        let panel = self.session.locate_visible(&Self::CATEGORY_PANEL, wait)?;
        let anchors = self
            .session
            .driver()
            .find_elements_in(panel.first(), &Locator::tag("a"))?;

        let mut names = Vec::new();
        for anchor in &anchors {
            let text = self.session.driver().text(anchor).unwrap_or_default();
            let text = text.trim();
            if !text.is_empty() {
                names.push(text.to_string());
            }
        }
        debug!(count = names.len(), "category panel entries");
        Ok(names)
    }

    /// Click a category in the open panel by its link text.
    pub fn open_category(&mut self, name: &str) -> Result<()> {
        let link = Target::dynamic(
            format!("CATEGORY[{}]", name),
            vec![Locator::owned(Strategy::LinkText, name)],
        )?;
        self.session.click(&link)?;
        let wait = self.session.config().default_wait;
        self.session.wait_for_ready(wait);
        Ok(())
    }

    /// Click the "SHOP NOW" link following the washing machine promotion.
    pub fn click_promo_shop_now(&mut self) -> Result<()> {
        self.session.scroll_by(1200);
        let wait = self.session.config().default_wait;
        let heading = self.session.locate_visible(&Self::PROMO_HEADING, wait)?;
        let links = self
            .session
            .driver()
            .find_elements_in(heading.first(), &Self::PROMO_SHOP_NOW)?;
        let Some(shop_now) = links.first() else {
            return Err(Error::NotFound {
                target: "PROMO_SHOP_NOW".to_string(),
                waited_ms: 0,
                tried: 1,
            });
        };
        self.session.scroll_into_view(shop_now);
        self.session.act_on(shop_now, "PROMO_SHOP_NOW", Action::Click)?;
        self.session.wait_for_ready(wait);
        Ok(())
    }

    /// Reach the Asus listing through the mega menu.
    ///
    /// Tries the nav link directly, then hovers each nav container and
    /// retries, then any Asus manufacturer/category/product link. Returns
    /// whether a navigation was started.
    pub fn open_asus_from_megamenu(&mut self) -> Result<bool> {
        if self.click_now(&Self::NAV_ASUS)? {
            return Ok(true);
        }

        for container in Self::NAV_CONTAINERS {
            let found = self
                .session
                .driver()
                .find_elements(container)
                .unwrap_or_default();
            let Some(first) = found.first() else {
                continue;
            };
            if let Err(e) = self.session.driver().hover(first) {
                debug!(%container, error = %e, "hover failed");
            }
            std::thread::sleep(NAV_HOVER_SETTLE);
            if self.click_now(&Self::NAV_ASUS)? {
                return Ok(true);
            }
        }

        self.click_now(&Self::ANY_ASUS_LINK)
    }

    fn click_now(&mut self, target: &Target) -> Result<bool> {
        let elements = self.session.find_now(target);
        let Some(first) = elements.first() else {
            return Ok(false);
        };
        self.session.act_on(first, target.name(), Action::Click)?;
        Ok(true)
    }

    /// Type `term` into the header search and submit it.
    pub fn search(&mut self, term: &str) -> Result<()> {
        let wait = self.session.config().default_wait;
        let input = self.session.locate_visible(&Self::SEARCH_INPUT, wait)?;
        self.session
            .act_on(input.first(), Self::SEARCH_INPUT.name(), Action::ClearAndType(term))?;

        match self
            .session
            .act_on(input.first(), Self::SEARCH_INPUT.name(), Action::PressEnter)
        {
            Ok(_) => {}
            Err(e) => {
                info!(error = %e, "enter did not submit search, using the button");
                self.session.click(&Self::SEARCH_BUTTON)?;
            }
        }
        Ok(())
    }
}
