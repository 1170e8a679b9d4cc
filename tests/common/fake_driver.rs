#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use ecommerce_playground::browser::driver::{
    Driver, ElementRef, SCRIPT_CLICK, SCRIPT_READY_STATE, SCRIPT_SET_VALUE,
};
use ecommerce_playground::browser::webdriver::{ELEMENT_KEY, KEY_ENTER};
use ecommerce_playground::error::{Error, Result};
use ecommerce_playground::locator::locator_model::Locator;
use serde_json::{Map, Value, json};

/// What happens when an element is clicked (natively or by script).
#[derive(Debug, Clone)]
pub enum OnClick {
    Navigate(String),
    /// Select this radio and deselect the rest of `group`
    SelectRadio { group: String },
    /// Put an alert banner with this text into the page
    ShowAlert(String),
    /// Remove every element registered under the locator key
    Remove(String),
    /// Put an element with this text under `locator`
    Insert { locator: Locator, text: String },
    /// Store the current radio choices; later visits restore them
    SaveSelection,
}

#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    pub text: String,
    pub value: String,
    pub displayed: bool,
    pub selected: bool,
    pub group: Option<String>,
    pub attributes: HashMap<String, String>,
    pub native_click_fails: bool,
    pub script_click_fails: bool,
    pub native_typing_fails: bool,
    pub script_set_value_fails: bool,
    pub on_click: Vec<OnClick>,
    pub clicks: usize,
}

impl FakeElement {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            displayed: true,
            ..Self::default()
        }
    }

    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn radio(mut self, group: &str, selected: bool) -> Self {
        self.group = Some(group.to_string());
        self.selected = selected;
        self.on_click.push(OnClick::SelectRadio {
            group: group.to_string(),
        });
        self
    }

    pub fn on_click(mut self, effect: OnClick) -> Self {
        self.on_click.push(effect);
        self
    }

    /// Native click raises "element click intercepted".
    pub fn intercepted(mut self) -> Self {
        self.native_click_fails = true;
        self
    }

    /// Both native and script clicks fail.
    pub fn unclickable(mut self) -> Self {
        self.native_click_fails = true;
        self.script_click_fails = true;
        self
    }

    pub fn typing_blocked(mut self) -> Self {
        self.native_typing_fails = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.native_typing_fails = true;
        self.script_set_value_fails = true;
        self
    }
}

/// In-memory page the fake driver serves.
#[derive(Debug, Default)]
pub struct FakeState {
    pub url: String,
    pub title: String,
    pub source: String,
    pub ready_state: String,
    pub elements: HashMap<String, FakeElement>,
    /// Locator display string -> element ids, in document order
    pub index: HashMap<String, Vec<String>>,
    /// (parent id, locator display) -> child element ids
    pub children: HashMap<(String, String), Vec<String>>,
    /// Locator display -> number of lookups before the elements show up
    pub appear_after: HashMap<String, usize>,
    pub lookups: HashMap<String, usize>,
    pub failing_lookups: HashSet<String>,
    pub script_responses: Vec<(String, Value)>,
    pub scripts: Vec<String>,
    pub navigations: Vec<String>,
    pub log: Vec<String>,
    pub quit_count: usize,
    pub screenshot_fails: bool,
    /// URL -> elements to register when that URL is visited
    pub pages: HashMap<String, Vec<(Locator, FakeElement)>>,
    /// Radio group -> locator key of the saved choice
    pub saved_radios: HashMap<String, String>,
    /// Element id -> locator key it was registered under
    locator_of: HashMap<String, String>,
    next_id: usize,
}

impl FakeState {
    pub fn add(&mut self, locator: &Locator, element: FakeElement) -> ElementRef {
        self.next_id += 1;
        let id = format!("e{}", self.next_id);
        self.elements.insert(id.clone(), element);
        self.locator_of.insert(id.clone(), locator.to_string());
        self.index.entry(locator.to_string()).or_default().push(id.clone());
        ElementRef::new(id)
    }

    pub fn add_child(&mut self, parent: &ElementRef, locator: &Locator, element: FakeElement) -> ElementRef {
        self.next_id += 1;
        let id = format!("e{}", self.next_id);
        self.elements.insert(id.clone(), element);
        self.children
            .entry((parent.id().to_string(), locator.to_string()))
            .or_default()
            .push(id.clone());
        ElementRef::new(id)
    }

    pub fn element(&self, el: &ElementRef) -> &FakeElement {
        &self.elements[el.id()]
    }

    pub fn clear_page(&mut self) {
        self.index.clear();
        self.children.clear();
    }

    fn get_mut(&mut self, command: &str, el: &ElementRef) -> Result<&mut FakeElement> {
        self.elements
            .get_mut(el.id())
            .ok_or_else(|| Error::webdriver(command, "stale element reference", el.id()))
    }

    fn apply_click(&mut self, el: &ElementRef) -> Result<()> {
        let effects = {
            let element = self.get_mut("click", el)?;
            element.clicks += 1;
            element.on_click.clone()
        };
        for effect in effects {
            match effect {
                OnClick::Navigate(url) => self.visit(&url),
                OnClick::SelectRadio { group } => {
                    for (id, other) in self.elements.iter_mut() {
                        if other.group.as_deref() == Some(group.as_str()) {
                            other.selected = id == el.id();
                        }
                    }
                }
                OnClick::ShowAlert(text) => {
                    self.add(&Locator::css(ALERT_CSS), FakeElement::new(&text));
                }
                OnClick::Remove(key) => {
                    self.index.remove(&key);
                }
                OnClick::Insert { locator, text } => {
                    self.add(&locator, FakeElement::new(&text));
                }
                OnClick::SaveSelection => self.save_selection(),
            }
        }
        Ok(())
    }

    fn visit(&mut self, url: &str) {
        self.url = url.to_string();
        self.navigations.push(url.to_string());
        if let Some(elements) = self.pages.get(url).cloned() {
            self.clear_page();
            for (locator, element) in elements {
                let el = self.add(&locator, element);
                self.restore_selection(&el);
            }
        }
    }

    fn save_selection(&mut self) {
        let on_page: HashSet<&String> = self.index.values().flatten().collect();
        for (id, element) in &self.elements {
            if let (true, Some(group)) = (element.selected, &element.group) {
                if on_page.contains(id) {
                    self.saved_radios
                        .insert(group.clone(), self.locator_of[id].clone());
                }
            }
        }
    }

    fn restore_selection(&mut self, el: &ElementRef) {
        let key = self.locator_of[el.id()].clone();
        let element = self.elements.get_mut(el.id()).expect("element just added");
        if let Some(saved) = element.group.as_ref().and_then(|g| self.saved_radios.get(g)) {
            element.selected = *saved == key;
        }
    }
}

/// Selector the outcome-text helpers query for alert banners.
pub const ALERT_CSS: &str = ".alert, .alert-success, .alert-danger, .alert-warning, .alert-dismissible";

/// Scripted `Driver` over a shared `FakeState`.
///
/// Clone the handle from [`FakeDriver::state`] before boxing the driver to
/// inspect what the code under test did.
pub struct FakeDriver {
    state: Rc<RefCell<FakeState>>,
}

impl FakeDriver {
    pub fn new() -> Self {
        let state = FakeState {
            url: "about:blank".to_string(),
            ready_state: "complete".to_string(),
            ..FakeState::default()
        };
        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    pub fn state(&self) -> Rc<RefCell<FakeState>> {
        Rc::clone(&self.state)
    }

    pub fn add(&self, locator: &Locator, element: FakeElement) -> ElementRef {
        self.state.borrow_mut().add(locator, element)
    }

    /// Register elements that appear when `url` is visited.
    pub fn on_page(&self, url: &str, elements: Vec<(Locator, FakeElement)>) {
        self.state.borrow_mut().pages.insert(url.to_string(), elements);
    }

    pub fn appear_after(&self, locator: &Locator, lookups: usize) {
        self.state
            .borrow_mut()
            .appear_after
            .insert(locator.to_string(), lookups);
    }

    pub fn fail_lookups(&self, locator: &Locator) {
        self.state.borrow_mut().failing_lookups.insert(locator.to_string());
    }

    /// Answer scripts containing `needle` with `value`.
    pub fn respond_to_script(&self, needle: &str, value: Value) {
        self.state
            .borrow_mut()
            .script_responses
            .push((needle.to_string(), value));
    }

    pub fn boxed(self) -> Box<dyn Driver> {
        Box::new(self)
    }
}

impl Default for FakeDriver {
    fn default() -> Self {
        Self::new()
    }
}

fn element_from_arg(value: &Value) -> Option<ElementRef> {
    value.get(ELEMENT_KEY)?.as_str().map(ElementRef::new)
}

impl Driver for FakeDriver {
    fn navigate(&mut self, url: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.log.push(format!("navigate {}", url));
        state.visit(url);
        Ok(())
    }

    fn current_url(&mut self) -> Result<String> {
        let url = self.state.borrow().url.clone();
        Ok(url)
    }

    fn title(&mut self) -> Result<String> {
        let title = self.state.borrow().title.clone();
        Ok(title)
    }

    fn page_source(&mut self) -> Result<String> {
        let source = self.state.borrow().source.clone();
        Ok(source)
    }

    fn find_elements(&mut self, locator: &Locator) -> Result<Vec<ElementRef>> {
        let key = locator.to_string();
        let mut state = self.state.borrow_mut();
        if state.failing_lookups.contains(&key) {
            return Err(Error::webdriver("find_elements", "invalid selector", &key));
        }
        let seen = {
            let count = state.lookups.entry(key.clone()).or_insert(0);
            *count += 1;
            *count
        };
        if let Some(&after) = state.appear_after.get(&key) {
            if seen <= after {
                return Ok(Vec::new());
            }
        }
        let found = state
            .index
            .get(&key)
            .map(|ids| ids.iter().cloned().map(ElementRef::new).collect())
            .unwrap_or_default();
        Ok(found)
    }

    fn find_elements_in(&mut self, parent: &ElementRef, locator: &Locator) -> Result<Vec<ElementRef>> {
        let state = self.state.borrow();
        let found = state
            .children
            .get(&(parent.id().to_string(), locator.to_string()))
            .map(|ids| ids.iter().cloned().map(ElementRef::new).collect())
            .unwrap_or_default();
        Ok(found)
    }

    fn click(&mut self, element: &ElementRef) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.log.push(format!("click {}", element));
        if state.get_mut("click", element)?.native_click_fails {
            return Err(Error::webdriver(
                "click",
                "element click intercepted",
                "another element would receive the click",
            ));
        }
        state.apply_click(element)
    }

    fn clear(&mut self, element: &ElementRef) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.log.push(format!("clear {}", element));
        let el = state.get_mut("clear", element)?;
        if el.native_typing_fails {
            return Err(Error::webdriver("clear", "invalid element state", "element not interactable"));
        }
        el.value.clear();
        Ok(())
    }

    fn send_keys(&mut self, element: &ElementRef, text: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.log.push(format!("send_keys {} {:?}", element, text));
        let el = state.get_mut("send_keys", element)?;
        if el.native_typing_fails {
            return Err(Error::webdriver(
                "send_keys",
                "element not interactable",
                "element not interactable",
            ));
        }
        if text != KEY_ENTER {
            el.value.push_str(text);
        }
        Ok(())
    }

    fn text(&mut self, element: &ElementRef) -> Result<String> {
        let mut state = self.state.borrow_mut();
        let text = state.get_mut("text", element)?.text.clone();
        Ok(text)
    }

    fn attribute(&mut self, element: &ElementRef, name: &str) -> Result<Option<String>> {
        let mut state = self.state.borrow_mut();
        let el = state.get_mut("attribute", element)?;
        let value = if name == "value" {
            Some(el.value.clone())
        } else {
            el.attributes.get(name).cloned()
        };
        Ok(value)
    }

    fn is_selected(&mut self, element: &ElementRef) -> Result<bool> {
        let mut state = self.state.borrow_mut();
        let selected = state.get_mut("is_selected", element)?.selected;
        Ok(selected)
    }

    fn is_displayed(&mut self, element: &ElementRef) -> Result<bool> {
        let mut state = self.state.borrow_mut();
        let displayed = state.get_mut("is_displayed", element)?.displayed;
        Ok(displayed)
    }

    fn hover(&mut self, element: &ElementRef) -> Result<()> {
        self.state.borrow_mut().log.push(format!("hover {}", element));
        Ok(())
    }

    fn execute_script(&mut self, script: &str, args: Vec<Value>) -> Result<Value> {
        let mut state = self.state.borrow_mut();
        state.scripts.push(script.to_string());
        let target = args.first().and_then(element_from_arg);

        if script == SCRIPT_READY_STATE {
            return Ok(json!(state.ready_state));
        }
        if script == SCRIPT_CLICK {
            let Some(el) = target else {
                return Err(Error::webdriver("execute_script", "javascript error", "no element"));
            };
            state.log.push(format!("script_click {}", el));
            if state.get_mut("execute_script", &el)?.script_click_fails {
                return Err(Error::webdriver(
                    "execute_script",
                    "javascript error",
                    "click() blocked",
                ));
            }
            state.apply_click(&el)?;
            return Ok(Value::Null);
        }
        if script == SCRIPT_SET_VALUE {
            let Some(el) = target else {
                return Err(Error::webdriver("execute_script", "javascript error", "no element"));
            };
            let value = args.get(1).and_then(Value::as_str).unwrap_or_default().to_string();
            state.log.push(format!("script_set_value {} {:?}", el, value));
            let element = state.get_mut("execute_script", &el)?;
            if element.script_set_value_fails {
                return Err(Error::webdriver(
                    "execute_script",
                    "javascript error",
                    "value is read-only",
                ));
            }
            element.value = value;
            return Ok(Value::Null);
        }

        let response = state
            .script_responses
            .iter()
            .find(|(needle, _)| script.contains(needle.as_str()))
            .map(|(_, value)| value.clone());
        Ok(response.unwrap_or(Value::Null))
    }

    fn element_arg(&self, element: &ElementRef) -> Value {
        let mut map = Map::new();
        map.insert(ELEMENT_KEY.to_string(), Value::String(element.id().to_string()));
        Value::Object(map)
    }

    fn screenshot_png(&mut self) -> Result<Vec<u8>> {
        let fails = self.state.borrow().screenshot_fails;
        if fails {
            return Err(Error::webdriver("screenshot", "unknown error", "no window"));
        }
        Ok(b"\x89PNG\r\n\x1a\nfake".to_vec())
    }

    fn quit(&mut self) -> Result<()> {
        self.state.borrow_mut().quit_count += 1;
        Ok(())
    }
}
