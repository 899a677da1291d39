//! Console logging.
//!
//! Log records go to stderr through `env_logger`, leaving stdout to the job
//! summaries. The level defaults to `info` and can be overridden with
//! `RUST_LOG`, e.g. `RUST_LOG=debug tabjobs split`.

use anyhow::{Context as _, Result};
use env_logger::Env;

pub const DEFAULT_FILTER: &str = "info";

/// Installs the global logger. Call once at startup.
///
/// # Errors
///
/// Returns error if a logger was already installed.
pub fn init() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER))
        .format_timestamp(None)
        .format_target(false)
        .try_init()
        .context("Failed to initialize logging")
}
