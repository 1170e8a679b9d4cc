use std::time::Duration;

use tracing::{debug, info};

use crate::browser::driver::ElementRef;
use crate::browser::session::PageSession;
use crate::error::Result;
use crate::locator::action::Action;
use crate::locator::locator_model::{Locator, Target};
use crate::locator::outcome_text::clean_alert_text;
use crate::pages::routes;
use crate::target;

const HEADER_LINK_WAIT: Duration = Duration::from_secs(3);
const ROWS_WAIT: Duration = Duration::from_secs(5);
const ADD_SETTLE: Duration = Duration::from_millis(500);

/// Product comparison page.
pub struct ComparePage<'s> {
    session: &'s mut PageSession,
}

impl<'s> ComparePage<'s> {
    pub const HEADER_COMPARE_LINK: Target = target!(
        "HEADER_COMPARE_LINK",
        [
            Locator::css("div#entry_217823 a[aria-label='Compare']"),
            Locator::xpath("//div[@id='entry_217823']//a[@aria-label='Compare']"),
            Locator::xpath("//header//div[@id='entry_217823']//a[contains(@href, 'product/compare')]"),
            Locator::xpath("//header//a[@aria-label='Compare']"),
            Locator::xpath("//header//a[contains(@href, 'product/compare')]"),
            Locator::xpath("//a[@aria-label='Compare']"),
            Locator::xpath("//a[contains(@href, 'product/compare')]"),
        ]
    );

    pub const COMPARE_TABLE: Target = target!(
        "COMPARE_TABLE",
        [
            Locator::css("table#compare-products"),
            Locator::css("#content table"),
            Locator::css(".compare-product"),
            Locator::css(".table-responsive table"),
        ]
    );

    pub const COMPARE_ROWS: Target = target!(
        "COMPARE_ROWS",
        [
            Locator::css("#content table tr"),
            Locator::css(".compare-product"),
            Locator::css(".table-responsive tbody tr"),
        ]
    );

    pub const REMOVE_BUTTONS: Target = target!(
        "REMOVE_BUTTONS",
        [
            Locator::css("a[href*='remove']"),
            Locator::css(".btn-danger"),
            Locator::css(".remove"),
            Locator::css("td a[href*='remove']"),
            Locator::css("input[value*='Remove']"),
            Locator::css("button[value*='Remove']"),
        ]
    );

    pub const EMPTY_MESSAGE: Target = target!(
        "EMPTY_MESSAGE",
        [
            Locator::xpath(
                "//*[@id='content']//p[contains(text(), 'not chosen') or contains(text(), 'no products')]"
            ),
            Locator::xpath("//*[contains(@class, 'alert-info')]"),
            Locator::xpath("//*[contains(@class, 'empty')]"),
            Locator::xpath("//*[@id='content']/p"),
        ]
    );

    pub const SUCCESS_MESSAGE: Target = target!(
        "COMPARE_SUCCESS",
        [
            Locator::css(".alert-success"),
            Locator::css(".alert.alert-success"),
            Locator::xpath("//*[contains(@class, 'alert') and contains(@class, 'success')]"),
            Locator::xpath("//*[contains(text(), 'Success') and contains(text(), 'modified')]"),
            Locator::xpath("//*[contains(text(), 'You have modified your product comparison')]"),
            Locator::xpath("//*[contains(text(), 'Success:')]"),
        ]
    );

    /// Product name cells inside the table, first group that yields names wins.
    pub const NAME_CELLS: &'static [Locator] = &[
        Locator::css("thead tr th a[href*='product/product']"),
        Locator::css("thead tr th strong"),
        Locator::css("tbody tr:first-child td a[href*='product/product']"),
        Locator::css("tbody tr:first-child td strong"),
        Locator::css("tr:first-child td a[href*='product/product']"),
        Locator::css("tr:first-child td strong"),
        Locator::css("td a[href*='product/product']:not([href*='remove'])"),
    ];

    /// "Add to compare" controls on listing pages; all matches are collected.
    pub const ADD_TO_COMPARE: &'static [Locator] = &[
        Locator::css("button[data-original-title*='Compare']"),
        Locator::css("a[data-original-title*='Compare']"),
        Locator::css("button[title*='Compare']"),
        Locator::css("a[title*='Compare']"),
        Locator::css("button[aria-label*='Compare']"),
        Locator::css("a[aria-label*='Compare']"),
        Locator::css(".fa-exchange"),
        Locator::css("button.compare"),
        Locator::css("a.compare"),
        Locator::css("[onclick*='compare']"),
    ];

    pub fn new(session: &'s mut PageSession) -> Self {
        Self { session }
    }

    pub fn open(&mut self) -> Result<()> {
        self.session.visit(routes::COMPARE)?;
        self.session.dismiss_overlays();
        Ok(())
    }

    /// Reach the page through the header compare link, or the direct route.
    pub fn open_from_header(&mut self) -> Result<()> {
        self.session.visit("")?;
        self.session.dismiss_overlays();

        let clicked = match self.session.find_optional(&Self::HEADER_COMPARE_LINK, HEADER_LINK_WAIT) {
            Some(link) => {
                self.session.scroll_into_view(link.first());
                self.session
                    .act_on(link.first(), Self::HEADER_COMPARE_LINK.name(), Action::Click)
                    .is_ok()
            }
            None => false,
        };
        if !clicked {
            debug!("header compare link unavailable, using direct route");
            self.session.visit(routes::COMPARE)?;
        }
        let wait = self.session.config().default_wait;
        self.session.wait_for_ready(wait);
        Ok(())
    }

    /// Open the all-products search page and add the first `count` products
    /// to the comparison. Returns how many were added.
    pub fn add_from_search(&mut self, count: usize) -> Result<usize> {
        self.session.visit(routes::SEARCH_ALL)?;
        self.session.dismiss_overlays();

        let mut buttons: Vec<ElementRef> = Vec::new();
        for locator in Self::ADD_TO_COMPARE {
            let found = self
                .session
                .driver()
                .find_elements(locator)
                .unwrap_or_default();
            for el in found {
                if !buttons.contains(&el) {
                    buttons.push(el);
                }
            }
        }

        let mut added = 0;
        for button in buttons.iter().take(count) {
            self.session.scroll_into_view(button);
            match self.session.act_on(button, "ADD_TO_COMPARE", Action::Click) {
                Ok(_) => {
                    added += 1;
                    info!(added, "product added to comparison");
                    std::thread::sleep(ADD_SETTLE);
                }
                Err(e) => debug!(error = %e, "could not add product to comparison"),
            }
        }
        Ok(added)
    }

    pub fn is_loaded(&mut self) -> bool {
        !self.session.find_now(&Self::COMPARE_TABLE).is_empty()
            || !self.session.find_now(&Self::EMPTY_MESSAGE).is_empty()
    }

    /// Number of table rows with text.
    pub fn row_count(&mut self) -> usize {
        if self.session.find_optional(&Self::COMPARE_ROWS, ROWS_WAIT).is_none() {
            return 0;
        }
        self.session.texts_of(&Self::COMPARE_ROWS).len()
    }

    pub fn has_items(&mut self) -> bool {
        self.row_count() > 0
    }

    pub fn is_empty(&mut self) -> bool {
        match self.session.find_optional(&Self::EMPTY_MESSAGE, ROWS_WAIT) {
            Some(_) => {
                let text = self.session.texts_of(&Self::EMPTY_MESSAGE).join(" ").to_lowercase();
                text.contains("empty") || text.contains("no products")
            }
            None => !self.has_items(),
        }
    }

    /// Click the remove control at `index`. Returns whether one was clicked.
    pub fn remove_item(&mut self, index: usize) -> bool {
        let wait = self.session.config().default_wait;
        let Some(buttons) = self.session.find_optional(&Self::REMOVE_BUTTONS, wait) else {
            return false;
        };
        let Some(button) = buttons.elements().get(index) else {
            return false;
        };
        let clicked = self
            .session
            .act_on(button, Self::REMOVE_BUTTONS.name(), Action::Click)
            .is_ok();
        self.session.wait_for_ready(wait);
        clicked
    }

    pub fn success_message(&mut self, timeout: Duration) -> Option<String> {
        self.session.find_optional(&Self::SUCCESS_MESSAGE, timeout)?;
        self.session
            .texts_of(&Self::SUCCESS_MESSAGE)
            .into_iter()
            .map(|t| clean_alert_text(&t))
            .find(|t| !t.is_empty())
    }

    /// Product names in the comparison table, de-duplicated, excluding
    /// "Remove" links.
    pub fn product_names(&mut self) -> Vec<String> {
        let tables = self.session.find_now(&Self::COMPARE_TABLE);
        let Some(table) = tables.first() else {
            return Vec::new();
        };

        let mut names: Vec<String> = Vec::new();
        for locator in Self::NAME_CELLS {
            let cells = self
                .session
                .driver()
                .find_elements_in(table, locator)
                .unwrap_or_default();
            for cell in &cells {
                let driver = self.session.driver();
                let text = driver.text(cell).unwrap_or_default().trim().to_string();
                let href = driver.attribute(cell, "href").ok().flatten().unwrap_or_default();
                if is_product_name(&text, &href) && !names.contains(&text) {
                    names.push(text);
                }
            }
            if !names.is_empty() {
                break;
            }
        }
        names
    }
}

fn is_product_name(text: &str, href: &str) -> bool {
    !text.is_empty()
        && !text.to_lowercase().contains("remove")
        && !href.to_lowercase().contains("remove")
}
