use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::browser::session::PageSession;
use crate::error::{Error, Result};
use crate::locator::locator_model::{Locator, Target};
use crate::pages::routes;
use crate::target;

pub const COUNTRY_SELECT: &str = "select[name='country_id']";
pub const REGION_SELECT: &str = "select[name='zone_id']";

/// Budget for the region list to populate after a country change.
pub const REGION_POPULATE_WAIT: Duration = Duration::from_secs(12);

/// Choose the first enabled, non-empty option whose text matches
/// `arguments[1]`, or the first valid option when nothing matches.
const SELECT_OPTION_SCRIPT: &str = r#"
const sel = document.querySelector(arguments[0]);
if (!sel) return {ok: false, reason: 'select-not-found'};
const want = (arguments[1] || '').toLowerCase();
let idx = -1, chosen = null;
for (let i = 0; i < sel.options.length; i++) {
  const opt = sel.options[i];
  if (opt.disabled || opt.value === '') continue;
  const txt = opt.text.trim();
  if (!want || txt.toLowerCase() === want || txt.toLowerCase().includes(want)) {
    idx = i; chosen = txt; break;
  }
}
if (idx === -1) {
  for (let i = 0; i < sel.options.length; i++) {
    const opt = sel.options[i];
    if (!opt.disabled && opt.value !== '') { idx = i; chosen = opt.text.trim(); break; }
  }
}
if (idx === -1) return {ok: false, reason: 'no-valid-option'};
sel.selectedIndex = idx;
sel.dispatchEvent(new Event('change', {bubbles: true}));
return {ok: true, text: chosen};
"#;

const VALID_OPTION_COUNT_SCRIPT: &str = r#"
const sel = document.querySelector(arguments[0]);
if (!sel) return 0;
return Array.from(sel.options).filter(o => !o.disabled && o.value.trim() !== '').length;
"#;

#[derive(Debug, Deserialize)]
struct SelectResult {
    ok: bool,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    reason: Option<String>,
}

/// Values typed into the add-address form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressForm {
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub address_1: String,
    pub city: String,
    pub postcode: String,
    pub country: String,
    pub region: String,
}

/// Account "add address" form.
pub struct AddressPage<'s> {
    session: &'s mut PageSession,
}

impl<'s> AddressPage<'s> {
    pub const FIRST_NAME: Target = target!(
        "FIRST_NAME",
        [Locator::name("firstname"), Locator::id("input-firstname")]
    );
    pub const LAST_NAME: Target = target!(
        "LAST_NAME",
        [Locator::name("lastname"), Locator::id("input-lastname")]
    );
    pub const COMPANY: Target = target!("COMPANY", [Locator::name("company"), Locator::id("input-company")]);
    pub const ADDRESS_1: Target = target!(
        "ADDRESS_1",
        [Locator::name("address_1"), Locator::id("input-address-1")]
    );
    pub const CITY: Target = target!("CITY", [Locator::name("city"), Locator::id("input-city")]);
    pub const POSTCODE: Target = target!(
        "POSTCODE",
        [Locator::name("postcode"), Locator::id("input-postcode")]
    );
    pub const COUNTRY: Target = target!("COUNTRY", [Locator::name("country_id"), Locator::id("input-country")]);
    pub const REGION: Target = target!("REGION", [Locator::name("zone_id"), Locator::id("input-zone")]);

    pub const DEFAULT_YES: Target = target!(
        "DEFAULT_YES",
        [
            Locator::css("input[name='default'][value='1']"),
            Locator::xpath("//input[@name='default' and @value='1']"),
        ]
    );

    pub const SAVE: Target = target!(
        "ADDRESS_SAVE",
        [
            Locator::xpath("//input[@value='Continue']"),
            Locator::css("input[value='Continue']"),
            Locator::css("button[type='submit']"),
        ]
    );

    pub const ADDRESS_ADDED: &'static str = "Your address has been successfully added";

    pub fn new(session: &'s mut PageSession) -> Self {
        Self { session }
    }

    pub fn open(&mut self) -> Result<()> {
        self.session.visit(routes::ADDRESS_ADD)?;
        self.session.locate(&Self::FIRST_NAME)?;
        Ok(())
    }

    /// Type every text field and pick country and region.
    ///
    /// Returns the country and region actually chosen.
    pub fn fill(&mut self, form: &AddressForm) -> Result<(String, String)> {
        self.session.fill(&Self::FIRST_NAME, &form.first_name)?;
        self.session.fill(&Self::LAST_NAME, &form.last_name)?;
        self.session.fill(&Self::COMPANY, &form.company)?;
        self.session.fill(&Self::ADDRESS_1, &form.address_1)?;
        self.session.fill(&Self::CITY, &form.city)?;
        self.session.fill(&Self::POSTCODE, &form.postcode)?;
        self.select_country_and_region(&form.country, &form.region)
    }

    pub fn select_country_and_region(&mut self, country: &str, region: &str) -> Result<(String, String)> {
        self.session.locate(&Self::COUNTRY)?;
        let chosen_country = self.select_option(COUNTRY_SELECT, country)?;

        self.session.locate(&Self::REGION)?;
        if !self.wait_for_region_options(REGION_POPULATE_WAIT) {
            return Err(Error::NotFound {
                target: "REGION options".to_string(),
                waited_ms: REGION_POPULATE_WAIT.as_millis(),
                tried: 1,
            });
        }
        let chosen_region = self.select_option(REGION_SELECT, region)?;
        debug!(%chosen_country, %chosen_region, "address location chosen");
        Ok((chosen_country, chosen_region))
    }

    /// Select the option matching `wanted` in the `<select>` at `css`.
    pub fn select_option(&mut self, css: &str, wanted: &str) -> Result<String> {
        let value = self
            .session
            .driver()
            .execute_script(SELECT_OPTION_SCRIPT, vec![json!(css), json!(wanted)])?;
        let result: SelectResult = serde_json::from_value(value).map_err(|source| Error::Json {
            context: format!("select option in {}", css),
            source,
        })?;
        match (result.ok, result.text) {
            (true, Some(text)) => Ok(text),
            _ => Err(Error::InteractionBlocked {
                target: css.to_string(),
                action: "select".to_string(),
                native: format!("no option matching '{}'", wanted),
                fallback: result.reason.unwrap_or_else(|| "unknown".to_string()),
            }),
        }
    }

    /// Poll until the region list has at least one valid option.
    pub fn wait_for_region_options(&mut self, timeout: Duration) -> bool {
        self.session.poll_until(timeout, |session| {
            session
                .driver()
                .execute_script(VALID_OPTION_COUNT_SCRIPT, vec![json!(REGION_SELECT)])
                .ok()
                .and_then(|v| v.as_u64())
                .is_some_and(|n| n > 0)
        })
    }

    pub fn mark_default(&mut self) -> Result<()> {
        self.session.click(&Self::DEFAULT_YES)?;
        Ok(())
    }

    pub fn save(&mut self) -> Result<()> {
        self.session.click(&Self::SAVE)?;
        Ok(())
    }

    /// Whether the save landed on the address book listing within `timeout`.
    pub fn address_book_reached(&mut self, timeout: Duration) -> bool {
        self.session.poll_until(timeout, |session| {
            let url = session.current_url().unwrap_or_default().to_lowercase();
            let on_listing = url.contains("route=account/address") && !url.contains("address/add");
            on_listing || session.body_text().contains(Self::ADDRESS_ADDED)
        })
    }
}
