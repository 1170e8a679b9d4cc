use tracing_subscriber::EnvFilter;

pub mod browser;
pub mod cli;
pub mod error;
pub mod locator;
pub mod pages;
pub mod report;
pub mod scenario;

pub use error::{Error, Result};

/// Filter used when `RUST_LOG` is unset: warn, then info/debug/trace per `-v`.
pub fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the stderr fmt subscriber. `RUST_LOG` wins over `-v`.
pub fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
