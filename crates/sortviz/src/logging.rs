#![forbid(unsafe_code)]

//! Log subscriber setup for the binary.
//!
//! Logs go to stderr so they never tear the bar display on stdout. The
//! filter comes from `SORTVIZ_LOG` (same syntax as `RUST_LOG`) and defaults
//! to `warn`.

use tracing_subscriber::EnvFilter;

use crate::error::{CliError, Result};

pub const LOG_ENV: &str = "SORTVIZ_LOG";

pub fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| CliError::Logging {
            message: e.to_string(),
        })
}
