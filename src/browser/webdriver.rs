use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Method;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::browser::driver::{Driver, ElementRef};
use crate::error::{Error, Result};
use crate::locator::locator_model::Locator;

/// W3C key under which element references travel on the wire.
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// W3C keyboard code point for the Enter key.
pub const KEY_ENTER: &str = "\u{E007}";

const DRIVER_READY_TIMEOUT: Duration = Duration::from_secs(10);
const HTTP_TIMEOUT: Duration = Duration::from_secs(90);

/// How to start the browser for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowserOptions {
    /// Browser name: `chrome` or `firefox`
    pub browser: String,
    pub headless: bool,
    pub window_width: u32,
    pub window_height: u32,
    pub page_load_timeout_ms: u64,
    /// WebDriver endpoint, e.g. `http://localhost:9515`
    pub webdriver_url: String,
    /// Driver binary to spawn on `webdriver_url`'s port; None means an
    /// already-running endpoint is used.
    pub driver_binary: Option<String>,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            browser: "chrome".to_string(),
            headless: true,
            window_width: 1920,
            window_height: 1080,
            page_load_timeout_ms: 60_000,
            webdriver_url: "http://localhost:9515".to_string(),
            driver_binary: None,
        }
    }
}

/// Build the W3C new-session payload for the configured browser.
pub fn capabilities(options: &BrowserOptions) -> Result<Value> {
    let window = format!("--window-size={},{}", options.window_width, options.window_height);
    let timeouts = json!({ "pageLoad": options.page_load_timeout_ms });

    let always_match = match options.browser.as_str() {
        "chrome" | "chromium" => {
            let mut args = vec![
                window,
                "--disable-gpu".to_string(),
                "--no-sandbox".to_string(),
                "--disable-dev-shm-usage".to_string(),
            ];
            if options.headless {
                args.insert(0, "--headless=new".to_string());
            }
            json!({
                "browserName": "chrome",
                "timeouts": timeouts,
                "goog:chromeOptions": { "args": args },
            })
        }
        "firefox" => {
            let mut args = vec![
                format!("--width={}", options.window_width),
                format!("--height={}", options.window_height),
            ];
            if options.headless {
                args.insert(0, "-headless".to_string());
            }
            json!({
                "browserName": "firefox",
                "timeouts": timeouts,
                "moz:firefoxOptions": { "args": args },
            })
        }
        other => {
            return Err(Error::Config(format!("Unsupported browser: {}", other)));
        }
    };

    Ok(json!({ "capabilities": { "alwaysMatch": always_match } }))
}

/// Unwrap a W3C response body. Error bodies become `Error::WebDriver`.
pub fn decode_response(command: &str, success: bool, body: Value) -> Result<Value> {
    let mut body = body;
    let value = body.get_mut("value").map(Value::take).unwrap_or(Value::Null);

    if let Some(kind) = value.get("error").and_then(Value::as_str) {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("no message");
        return Err(Error::webdriver(command, kind, message));
    }

    if !success {
        return Err(Error::WebDriverProtocol {
            command: command.to_string(),
            detail: format!("non-success status without W3C error body: {}", value),
        });
    }

    Ok(value)
}

/// Parse a single element reference object.
pub fn parse_element_ref(command: &str, value: &Value) -> Result<ElementRef> {
    value
        .get(ELEMENT_KEY)
        .and_then(Value::as_str)
        .map(ElementRef::new)
        .ok_or_else(|| Error::WebDriverProtocol {
            command: command.to_string(),
            detail: format!("missing element reference in {}", value),
        })
}

/// Parse the array returned by the find-elements commands.
pub fn parse_element_refs(command: &str, value: &Value) -> Result<Vec<ElementRef>> {
    let items = value.as_array().ok_or_else(|| Error::WebDriverProtocol {
        command: command.to_string(),
        detail: "expected an array of element references".into(),
    })?;
    items.iter().map(|v| parse_element_ref(command, v)).collect()
}

/// A blocking W3C WebDriver client bound to one browser session.
///
/// Optionally owns the driver process (chromedriver, geckodriver) and kills
/// it when the session ends.
pub struct WebDriverClient {
    http: Client,
    endpoint: String,
    session_id: Option<String>,
    child: Option<Child>,
}

impl WebDriverClient {
    /// Start a new browser session, spawning the driver binary first when configured.
    pub fn launch(options: &BrowserOptions) -> Result<Self> {
        let http = Client::builder().timeout(HTTP_TIMEOUT).build()?;
        let endpoint = options.webdriver_url.trim_end_matches('/').to_string();

        let child = match &options.driver_binary {
            Some(binary) => Some(spawn_driver(binary, &endpoint)?),
            None => None,
        };

        let mut client = WebDriverClient {
            http,
            endpoint,
            session_id: None,
            child,
        };

        if client.child.is_some() {
            client.wait_until_ready()?;
        }

        let payload = capabilities(options)?;
        let value = client.raw(Method::POST, "/session", Some(payload), "new_session")?;
        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::WebDriverProtocol {
                command: "new_session".into(),
                detail: "no sessionId in response".into(),
            })?
            .to_string();

        info!(browser = %options.browser, headless = options.headless, session = %session_id, "browser session started");
        client.session_id = Some(session_id);

        client.command(
            Method::POST,
            "/window/rect",
            Some(json!({ "width": options.window_width, "height": options.window_height })),
            "set_window_rect",
        )?;

        Ok(client)
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    fn wait_until_ready(&mut self) -> Result<()> {
        let deadline = Instant::now() + DRIVER_READY_TIMEOUT;
        loop {
            match self.raw(Method::GET, "/status", None, "status") {
                Ok(value) if value.get("ready").and_then(Value::as_bool).unwrap_or(false) => {
                    return Ok(());
                }
                Ok(_) | Err(_) if Instant::now() < deadline => {
                    std::thread::sleep(Duration::from_millis(200));
                }
                Ok(_) => {
                    return Err(Error::WebDriverProtocol {
                        command: "status".into(),
                        detail: "driver never reported ready".into(),
                    });
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Send a request relative to the endpoint root.
    fn raw(&mut self, method: Method, path: &str, body: Option<Value>, command: &str) -> Result<Value> {
        let url = format!("{}{}", self.endpoint, path);
        debug!(%method, %url, command, "webdriver request");

        let mut request = self.http.request(method, &url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send()?;
        let success = response.status().is_success();
        let text = response.text()?;
        let body: Value = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|e| Error::Json {
                context: format!("webdriver response to {}", command),
                source: e,
            })?
        };

        decode_response(command, success, body)
    }

    /// Send a request relative to the current session.
    fn command(&mut self, method: Method, path: &str, body: Option<Value>, command: &str) -> Result<Value> {
        let session = self.session_id.clone().ok_or(Error::SessionReleased)?;
        self.raw(method, &format!("/session/{}{}", session, path), body, command)
    }

    fn element_command(
        &mut self,
        method: Method,
        element: &ElementRef,
        suffix: &str,
        body: Option<Value>,
        command: &str,
    ) -> Result<Value> {
        let path = format!("/element/{}{}", element.id(), suffix);
        self.command(method, &path, body, command)
    }
}

impl Driver for WebDriverClient {
    fn navigate(&mut self, url: &str) -> Result<()> {
        self.command(Method::POST, "/url", Some(json!({ "url": url })), "navigate")?;
        Ok(())
    }

    fn current_url(&mut self) -> Result<String> {
        let value = self.command(Method::GET, "/url", None, "current_url")?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    fn title(&mut self) -> Result<String> {
        let value = self.command(Method::GET, "/title", None, "title")?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    fn page_source(&mut self) -> Result<String> {
        let value = self.command(Method::GET, "/source", None, "page_source")?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    fn find_elements(&mut self, locator: &Locator) -> Result<Vec<ElementRef>> {
        let (using, selector) = locator.to_w3c();
        let value = self.command(
            Method::POST,
            "/elements",
            Some(json!({ "using": using, "value": selector })),
            "find_elements",
        )?;
        parse_element_refs("find_elements", &value)
    }

    fn find_elements_in(&mut self, parent: &ElementRef, locator: &Locator) -> Result<Vec<ElementRef>> {
        let (using, selector) = locator.to_w3c();
        let value = self.element_command(
            Method::POST,
            parent,
            "/elements",
            Some(json!({ "using": using, "value": selector })),
            "find_elements_in",
        )?;
        parse_element_refs("find_elements_in", &value)
    }

    fn click(&mut self, element: &ElementRef) -> Result<()> {
        self.element_command(Method::POST, element, "/click", Some(json!({})), "click")?;
        Ok(())
    }

    fn clear(&mut self, element: &ElementRef) -> Result<()> {
        self.element_command(Method::POST, element, "/clear", Some(json!({})), "clear")?;
        Ok(())
    }

    fn send_keys(&mut self, element: &ElementRef, text: &str) -> Result<()> {
        self.element_command(
            Method::POST,
            element,
            "/value",
            Some(json!({ "text": text })),
            "send_keys",
        )?;
        Ok(())
    }

    fn text(&mut self, element: &ElementRef) -> Result<String> {
        let value = self.element_command(Method::GET, element, "/text", None, "text")?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    fn attribute(&mut self, element: &ElementRef, name: &str) -> Result<Option<String>> {
        let suffix = format!("/attribute/{}", name);
        let value = self.element_command(Method::GET, element, &suffix, None, "attribute")?;
        Ok(value.as_str().map(str::to_string))
    }

    fn is_selected(&mut self, element: &ElementRef) -> Result<bool> {
        let value = self.element_command(Method::GET, element, "/selected", None, "is_selected")?;
        Ok(value.as_bool().unwrap_or(false))
    }

    fn is_displayed(&mut self, element: &ElementRef) -> Result<bool> {
        let value = self.element_command(Method::GET, element, "/displayed", None, "is_displayed")?;
        Ok(value.as_bool().unwrap_or(false))
    }

    fn hover(&mut self, element: &ElementRef) -> Result<()> {
        let origin = self.element_arg(element);
        let actions = json!({
            "actions": [{
                "type": "pointer",
                "id": "mouse",
                "parameters": { "pointerType": "mouse" },
                "actions": [{ "type": "pointerMove", "duration": 100, "origin": origin, "x": 0, "y": 0 }],
            }]
        });
        self.command(Method::POST, "/actions", Some(actions), "hover")?;
        Ok(())
    }

    fn execute_script(&mut self, script: &str, args: Vec<Value>) -> Result<Value> {
        self.command(
            Method::POST,
            "/execute/sync",
            Some(json!({ "script": script, "args": args })),
            "execute_script",
        )
    }

    fn element_arg(&self, element: &ElementRef) -> Value {
        let mut reference = serde_json::Map::new();
        reference.insert(ELEMENT_KEY.to_string(), Value::String(element.id().to_string()));
        Value::Object(reference)
    }

    fn screenshot_png(&mut self) -> Result<Vec<u8>> {
        let value = self.command(Method::GET, "/screenshot", None, "screenshot")?;
        let encoded = value.as_str().ok_or_else(|| Error::WebDriverProtocol {
            command: "screenshot".into(),
            detail: "screenshot value is not a string".into(),
        })?;
        Ok(STANDARD.decode(encoded)?)
    }

    fn quit(&mut self) -> Result<()> {
        let result = match self.session_id.take() {
            Some(session) => self
                .raw(Method::DELETE, &format!("/session/{}", session), None, "delete_session")
                .map(|_| ()),
            None => Ok(()),
        };

        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.kill() {
                warn!(error = %e, "failed to kill driver process");
            }
            let _ = child.wait();
        }

        result
    }
}

impl Drop for WebDriverClient {
    fn drop(&mut self) {
        if self.session_id.is_some() || self.child.is_some() {
            let _ = self.quit();
        }
    }
}

fn spawn_driver(binary: &str, endpoint: &str) -> Result<Child> {
    let port = endpoint
        .rsplit(':')
        .next()
        .and_then(|p| p.trim_end_matches('/').parse::<u16>().ok())
        .ok_or_else(|| Error::Config(format!("cannot derive a port from webdriver url '{}'", endpoint)))?;

    info!(binary, port, "spawning webdriver");
    Command::new(binary)
        .arg(format!("--port={}", port))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| Error::DriverSpawn {
            binary: binary.to_string(),
            source: e,
        })
}
