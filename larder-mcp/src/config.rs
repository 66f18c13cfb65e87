//! Server configuration from the environment

use larder_plugin::{DEFAULT_LOCALE, DEFAULT_SIGNIFICANT_DIGITS};
use larder_units::find_number_locale;
use std::env;
use tracing::warn;

pub const LOCALE_VAR: &str = "LARDER_LOCALE";
pub const SIGNIFICANT_DIGITS_VAR: &str = "LARDER_SIGNIFICANT_DIGITS";
pub const LOG_FILTER_VAR: &str = "RUST_LOG";

pub const DEFAULT_LOG_FILTER: &str = "info";

/// Settings read once at startup
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub locale: String,
    pub significant_digits: u32,
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            locale: DEFAULT_LOCALE.to_string(),
            significant_digits: DEFAULT_SIGNIFICANT_DIGITS,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset or invalid values keep defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ServerConfig::default();

        if let Some(locale) = non_empty(lookup(LOCALE_VAR)) {
            if find_number_locale(&locale).is_none() {
                warn!(%locale, fallback = DEFAULT_LOCALE, "unrecognised locale, numbers use fallback separators");
            }
            config.locale = locale;
        }

        if let Some(raw) = non_empty(lookup(SIGNIFICANT_DIGITS_VAR)) {
            match raw.parse::<u32>() {
                Ok(digits) => {
                    let clamped = digits.clamp(1, 15);
                    if clamped != digits {
                        warn!(digits, clamped, "{} out of range", SIGNIFICANT_DIGITS_VAR);
                    }
                    config.significant_digits = clamped;
                }
                Err(e) => {
                    warn!(value = %raw, error = %e, "invalid {}, using default", SIGNIFICANT_DIGITS_VAR);
                }
            }
        }

        if let Some(filter) = non_empty(lookup(LOG_FILTER_VAR)) {
            config.log_filter = filter;
        }

        config
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
