use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A required target never appeared within its wait budget
    #[error("target '{target}' not found after {waited_ms}ms ({tried} locator candidate(s) tried)")]
    NotFound {
        target: String,
        waited_ms: u128,
        tried: usize,
    },

    /// Element was found but neither the native nor the script-driven action succeeded
    #[error("{action} on '{target}' blocked: native: {native}; script fallback: {fallback}")]
    InteractionBlocked {
        target: String,
        action: String,
        native: String,
        fallback: String,
    },

    /// The action completed but the observed page does not match the expected outcome
    #[error("{check} failed: expected {expected}, observed '{actual}'")]
    OutcomeMismatch {
        check: String,
        expected: String,
        actual: String,
    },

    /// A target was declared without any locator candidates
    #[error("target '{0}' has no locator candidates")]
    EmptyTarget(String),

    /// WebDriver endpoint answered with a W3C error body
    #[error("webdriver command '{command}' failed ({kind}): {message}")]
    WebDriver {
        command: String,
        kind: String,
        message: String,
    },

    /// WebDriver response did not have the expected shape
    #[error("unexpected webdriver response for '{command}': {detail}")]
    WebDriverProtocol { command: String, detail: String },

    #[error("HTTP error talking to webdriver: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error ({context}): {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Driver binary (chromedriver, geckodriver) failed to spawn
    #[error("failed to spawn {binary} (is it installed and on PATH?): {source}")]
    DriverSpawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("screenshot decode failed: {0}")]
    ScreenshotDecode(#[from] base64::DecodeError),

    #[error("configuration error: {0}")]
    Config(String),

    /// Operation attempted on a session that was already released
    #[error("browser session already released")]
    SessionReleased,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    pub fn is_outcome_mismatch(&self) -> bool {
        matches!(self, Error::OutcomeMismatch { .. })
    }

    /// Build a `WebDriver` error from a W3C error code and message.
    pub fn webdriver(command: &str, kind: &str, message: &str) -> Self {
        Error::WebDriver {
            command: command.to_string(),
            kind: kind.to_string(),
            message: message.to_string(),
        }
    }
}
