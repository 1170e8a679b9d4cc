#![allow(dead_code)]

pub mod fake_driver;

use std::time::Duration;

use ecommerce_playground::browser::session::{PageSession, SessionConfig};

use fake_driver::FakeDriver;

pub const BASE: &str = "https://shop.test/";

/// Session settings with waits short enough for unit tests.
pub fn fast_config() -> SessionConfig {
    SessionConfig {
        base_url: BASE.to_string(),
        default_wait: Duration::from_millis(200),
        poll_interval: Duration::from_millis(10),
        overlay_wait: Duration::from_millis(50),
        screenshot_dir: None,
    }
}

pub fn session(driver: FakeDriver) -> PageSession {
    PageSession::new(driver.boxed(), fast_config())
}
