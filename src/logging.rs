#![forbid(unsafe_code)]

use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Installs a file-backed subscriber when a log path is configured.
///
/// The screen belongs to the UI, so nothing is ever written to stdout or
/// stderr. Returns whether a subscriber was installed.
pub fn init(config: &Config) -> io::Result<bool> {
    let Some(path) = &config.log_path else {
        return Ok(false);
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(io::Error::other)?;
    Ok(true)
}
