#![forbid(unsafe_code)]

use std::path::PathBuf;

use crate::error::ConfigError;

pub const ENV_SHOW_HIDDEN: &str = "TWINPANE_SHOW_HIDDEN";
pub const ENV_PANEL_PERCENT: &str = "TWINPANE_PANEL_PERCENT";
pub const ENV_SCROLLBACK: &str = "TWINPANE_SCROLLBACK";
pub const ENV_LOG: &str = "TWINPANE_LOG";

pub const DEFAULT_PANEL_PERCENT: u16 = 60;
pub const DEFAULT_SCROLLBACK: usize = 1000;
const PANEL_PERCENT_RANGE: (u16, u16) = (20, 90);
const MIN_SCROLLBACK: usize = 10;

/// Runtime settings, read once at start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Whether the panes list dot-files.
    pub show_hidden: bool,
    /// Share of the screen height given to the panes.
    pub panel_percent: u16,
    /// Maximum number of lines kept in the terminal scrollback.
    pub scrollback_limit: usize,
    /// Log destination; logging stays off when unset.
    pub log_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            show_hidden: true,
            panel_percent: DEFAULT_PANEL_PERCENT,
            scrollback_limit: DEFAULT_SCROLLBACK,
            log_path: None,
        }
    }
}

impl Config {
    pub fn from_env() -> (Self, Vec<ConfigError>) {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Values that fail to
    /// parse keep their default and are reported back to the caller.
    pub fn from_lookup<F>(lookup: F) -> (Self, Vec<ConfigError>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let mut rejected = Vec::new();

        if let Some(raw) = lookup(ENV_SHOW_HIDDEN) {
            match parse_bool(&raw) {
                Some(value) => config.show_hidden = value,
                None => rejected.push(invalid(ENV_SHOW_HIDDEN, raw)),
            }
        }

        if let Some(raw) = lookup(ENV_PANEL_PERCENT) {
            match raw.trim().parse::<u16>() {
                Ok(value) => {
                    config.panel_percent = value.clamp(PANEL_PERCENT_RANGE.0, PANEL_PERCENT_RANGE.1)
                }
                Err(_) => rejected.push(invalid(ENV_PANEL_PERCENT, raw)),
            }
        }

        if let Some(raw) = lookup(ENV_SCROLLBACK) {
            match raw.trim().parse::<usize>() {
                Ok(value) if value >= MIN_SCROLLBACK => config.scrollback_limit = value,
                _ => rejected.push(invalid(ENV_SCROLLBACK, raw)),
            }
        }

        if let Some(raw) = lookup(ENV_LOG) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                config.log_path = Some(PathBuf::from(trimmed));
            }
        }

        (config, rejected)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn invalid(key: &'static str, value: String) -> ConfigError {
    ConfigError::InvalidValue { key, value }
}
