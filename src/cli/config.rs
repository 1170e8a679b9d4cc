use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::browser::session::SessionConfig;
use crate::browser::webdriver::BrowserOptions;
use crate::scenario::scenario_model::{Credentials, ScenarioData};

pub const DEFAULT_CONFIG_FILE: &str = "ecommerce-playground.yaml";

pub const ENV_BROWSER: &str = "EP_BROWSER";
pub const ENV_HEADLESS: &str = "EP_HEADLESS";
pub const ENV_BASE_URL: &str = "EP_BASE_URL";
pub const ENV_WEBDRIVER_URL: &str = "EP_WEBDRIVER_URL";
pub const ENV_EMAIL: &str = "ECOM_EMAIL";
pub const ENV_PASSWORD: &str = "ECOM_PASSWORD";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "ecommerce-playground",
    version,
    about = "End-to-end scenarios for the LambdaTest e-commerce playground"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: ecommerce-playground.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Browser: chrome or firefox
    #[arg(long, global = true)]
    pub browser: Option<String>,

    /// Run the browser headless
    #[arg(long, global = true, action = clap::ArgAction::Set)]
    pub headless: Option<bool>,

    /// Storefront base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// WebDriver endpoint
    #[arg(long, global = true)]
    pub webdriver_url: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run scenarios against the storefront
    Run {
        /// Scenario to run (repeatable; default: all)
        #[arg(long = "scenario")]
        scenarios: Vec<String>,

        /// Output format
        #[arg(long, value_enum)]
        format: Option<ReportFormat>,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Directory for screenshots
        #[arg(long)]
        screenshots: Option<String>,

        /// Disable screenshots
        #[arg(long, conflicts_with = "screenshots")]
        no_screenshots: bool,
    },

    /// List the available scenarios
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Console,
    Html,
    Junit,
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `ecommerce-playground.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub waits: WaitsConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub artifacts: ArtifactsConfig,
    #[serde(default)]
    pub run: RunConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_browser")]
    pub name: String,

    #[serde(default = "default_true")]
    pub headless: bool,

    #[serde(default = "default_width")]
    pub window_width: u32,

    #[serde(default = "default_height")]
    pub window_height: u32,

    #[serde(default = "default_page_load_ms")]
    pub page_load_timeout_ms: u64,

    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Driver binary to spawn; unset means the endpoint is already running
    pub driver_binary: Option<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            name: default_browser(),
            headless: true,
            window_width: default_width(),
            window_height: default_height(),
            page_load_timeout_ms: default_page_load_ms(),
            webdriver_url: default_webdriver_url(),
            driver_binary: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitsConfig {
    #[serde(default = "default_wait_ms")]
    pub default_ms: u64,

    #[serde(default = "default_poll_ms")]
    pub poll_ms: u64,

    #[serde(default = "default_overlay_ms")]
    pub overlay_ms: u64,
}

impl Default for WaitsConfig {
    fn default() -> Self {
        Self {
            default_ms: default_wait_ms(),
            poll_ms: default_poll_ms(),
            overlay_ms: default_overlay_ms(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    pub email: Option<String>,
    pub password: Option<String>,
    pub existing_email: Option<String>,
    pub unregistered_email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactsConfig {
    #[serde(default = "default_true")]
    pub screenshots: bool,

    #[serde(default = "default_screenshot_dir")]
    pub screenshot_dir: String,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            screenshots: true,
            screenshot_dir: default_screenshot_dir(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub format: ReportFormat,

    pub output: Option<String>,

    /// Scenarios to run when none are given on the command line
    #[serde(default)]
    pub scenarios: Vec<String>,
}

// Serde default helpers
fn default_browser() -> String { "chrome".to_string() }
fn default_true() -> bool { true }
fn default_width() -> u32 { 1920 }
fn default_height() -> u32 { 1080 }
fn default_page_load_ms() -> u64 { 60_000 }
fn default_webdriver_url() -> String { "http://localhost:9515".to_string() }
fn default_base_url() -> String { "https://ecommerce-playground.lambdatest.io/".to_string() }
fn default_wait_ms() -> u64 { 10_000 }
fn default_poll_ms() -> u64 { 250 }
fn default_overlay_ms() -> u64 { 3_000 }
fn default_screenshot_dir() -> String { "screenshots".to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_FILE);
    match std::fs::read_to_string(config_path) {
        Ok(content) => match serde_yaml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = config_path, error = %e, "malformed config file, using defaults");
                AppConfig::default()
            }
        },
        Err(_) => {
            debug!(path = config_path, "no config file, using defaults");
            AppConfig::default()
        }
    }
}

// ============================================================================
// Settings resolution: CLI > environment > config file > default
// ============================================================================

/// Everything a `run` needs, fully resolved.
#[derive(Debug, Clone)]
pub struct Settings {
    pub browser: BrowserOptions,
    pub session: SessionConfig,
    pub data: ScenarioData,
    pub format: ReportFormat,
    pub output: Option<PathBuf>,
    pub scenarios: Vec<String>,
}

/// `0`, `false` and `False` read as false; anything else as true.
pub fn parse_env_bool(value: &str) -> bool {
    !matches!(value.trim(), "0" | "false" | "False")
}

/// Resolve settings from the parsed CLI, the config file, and an environment
/// lookup (normally `std::env::var`).
pub fn resolve_settings(
    cli: &Cli,
    config: &AppConfig,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let browser = BrowserOptions {
        browser: cli
            .browser
            .clone()
            .or_else(|| env(ENV_BROWSER))
            .unwrap_or_else(|| config.browser.name.clone()),
        headless: cli
            .headless
            .or_else(|| env(ENV_HEADLESS).map(|v| parse_env_bool(&v)))
            .unwrap_or(config.browser.headless),
        window_width: config.browser.window_width,
        window_height: config.browser.window_height,
        page_load_timeout_ms: config.browser.page_load_timeout_ms,
        webdriver_url: cli
            .webdriver_url
            .clone()
            .or_else(|| env(ENV_WEBDRIVER_URL))
            .unwrap_or_else(|| config.browser.webdriver_url.clone()),
        driver_binary: config.browser.driver_binary.clone(),
    };

    let (cli_scenarios, cli_format, cli_output, cli_screenshots, no_screenshots) = match &cli.command {
        Commands::Run {
            scenarios,
            format,
            output,
            screenshots,
            no_screenshots,
        } => (
            scenarios.clone(),
            *format,
            output.clone(),
            screenshots.clone(),
            *no_screenshots,
        ),
        Commands::List => (Vec::new(), None, None, None, false),
    };

    let screenshot_dir = if no_screenshots {
        None
    } else if let Some(dir) = cli_screenshots {
        Some(PathBuf::from(dir))
    } else if config.artifacts.screenshots {
        Some(PathBuf::from(&config.artifacts.screenshot_dir))
    } else {
        None
    };

    let session = SessionConfig {
        base_url: cli
            .base_url
            .clone()
            .or_else(|| env(ENV_BASE_URL))
            .unwrap_or_else(|| config.site.base_url.clone()),
        default_wait: Duration::from_millis(config.waits.default_ms),
        poll_interval: Duration::from_millis(config.waits.poll_ms),
        overlay_wait: Duration::from_millis(config.waits.overlay_ms),
        screenshot_dir,
    };

    let defaults = Credentials::default();
    let credentials = Credentials {
        email: env(ENV_EMAIL)
            .or_else(|| config.credentials.email.clone())
            .unwrap_or(defaults.email),
        password: env(ENV_PASSWORD)
            .or_else(|| config.credentials.password.clone())
            .unwrap_or(defaults.password),
    };
    let mut data = ScenarioData::with_credentials(credentials);
    if let Some(email) = &config.credentials.existing_email {
        data.existing_email = email.clone();
    }
    if let Some(email) = &config.credentials.unregistered_email {
        data.unregistered_email = email.clone();
    }

    Settings {
        browser,
        session,
        data,
        format: cli_format.unwrap_or(config.run.format),
        output: cli_output.or_else(|| config.run.output.clone()).map(PathBuf::from),
        scenarios: if cli_scenarios.is_empty() {
            config.run.scenarios.clone()
        } else {
            cli_scenarios
        },
    }
}
