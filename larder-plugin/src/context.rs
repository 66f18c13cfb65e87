//! Evaluation Context

use crate::PluginRegistry;
use std::sync::Arc;

/// Default locale for number formatting
pub const DEFAULT_LOCALE: &str = "en-US";

/// Default significant digits for decimal display
pub const DEFAULT_SIGNIFICANT_DIGITS: u32 = 4;

/// Evaluation context passed to plugins
pub struct EvalContext {
    pub locale: String,
    pub significant_digits: u32,
    pub registry: Arc<PluginRegistry>,
}

impl EvalContext {
    pub fn new(registry: Arc<PluginRegistry>) -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_string(),
            significant_digits: DEFAULT_SIGNIFICANT_DIGITS,
            registry,
        }
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn with_significant_digits(mut self, digits: u32) -> Self {
        self.significant_digits = digits;
        self
    }
}
