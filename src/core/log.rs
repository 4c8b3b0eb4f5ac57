//! Tracing setup for the binary.

use anyhow::{Context, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, filter::Targets, fmt, prelude::*};

/// Installs the global subscriber, writing to stderr so tables on stdout stay
/// clean. When `RUST_LOG` is set it decides everything; otherwise only this
/// crate logs, at debug with `verbose` and not at all without.
pub fn init_logging(verbose: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().ok();
    let crate_filter = env_filter.is_none().then(|| {
        let level = if verbose {
            LevelFilter::DEBUG
        } else {
            LevelFilter::OFF
        };
        Targets::new().with_target(env!("CARGO_CRATE_NAME"), level)
    });

    tracing_subscriber::registry()
        .with(fmt::layer().pretty().without_time().with_writer(std::io::stderr))
        .with(crate_filter)
        .with(env_filter)
        .try_init()
        .context("Failed to install tracing subscriber")
}
