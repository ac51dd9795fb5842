use anyhow::{anyhow, Result};
use tracing_subscriber::fmt::Layer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Registry;

/// Environment variable holding a tracing filter directive, e.g. `skill_utils=debug`.
pub const LOG_ENV: &str = "SKILL_UTILS_LOG";

pub fn init(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter_layer = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    // stdout carries command output, so diagnostics go to stderr
    let fmt_layer = Layer::new()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    let subscriber = Registry::default().with(fmt_layer).with(filter_layer);
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow!("Failed to install logger: {}", e))?;

    tracing::debug!("logging initialised");
    Ok(())
}

/// Exit with 130 and a short message on Ctrl-C instead of dying mid-output.
pub fn install_interrupt_handler() -> Result<()> {
    ctrlc::set_handler(|| {
        eprintln!("Interrupted");
        std::process::exit(130);
    })
    .map_err(|e| anyhow!("Failed to install interrupt handler: {}", e))
}
