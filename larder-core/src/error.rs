//! Structured errors for tool consumption
//!
//! Errors never crash the system. They are values that travel back to the
//! caller with a machine-readable code and, where possible, a suggestion.

use serde::{Deserialize, Serialize};

/// Standard error codes (machine-readable)
pub mod codes {
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
    pub const UNDEFINED_FUNC: &str = "UNDEFINED_FUNC";
    pub const TYPE_ERROR: &str = "TYPE_ERROR";
    pub const ARG_COUNT: &str = "ARG_COUNT";
    pub const ARG_TYPE: &str = "ARG_TYPE";
    pub const DOMAIN_ERROR: &str = "DOMAIN_ERROR";
    pub const INTERNAL: &str = "INTERNAL";
    // Unit-specific error codes
    pub const UNKNOWN_UNIT: &str = "UNKNOWN_UNIT";
    pub const INCOMPATIBLE_UNITS: &str = "INCOMPATIBLE_UNITS";
}

/// Severity level of an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Caller can fall back to the unconverted value
    Warning,
    /// The call failed
    Error,
    /// Indicates a bug in the catalog or the server
    Fatal,
}

/// Structured error returned across the plugin and tool boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LarderError {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    /// Notes added while the error travelled outwards
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub notes: Vec<String>,

    /// Severity level
    pub severity: Severity,
}

impl LarderError {
    /// Create a new error
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            suggestion: None,
            notes: Vec::new(),
            severity: Severity::Error,
        }
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Builder: add propagation note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Builder: set severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    // ========== Common Error Constructors ==========

    pub fn parse_error(details: impl Into<String>) -> Self {
        Self::new(codes::PARSE_ERROR, format!("Parse error: {}", details.into()))
            .with_suggestion("Check the request syntax")
    }

    pub fn undefined_func(name: &str) -> Self {
        Self::new(codes::UNDEFINED_FUNC, format!("Unknown function: {}", name))
            .with_suggestion("Use tools/list to see available functions")
    }

    pub fn type_error(expected: &str, got: &str) -> Self {
        Self::new(codes::TYPE_ERROR, format!("Expected {}, got {}", expected, got))
    }

    pub fn arg_count(func: &str, expected: usize, got: usize) -> Self {
        Self::new(codes::ARG_COUNT,
            format!("{}() expects {} arguments, got {}", func, expected, got))
            .with_suggestion(format!("See the '{}' tool schema for usage", func))
    }

    pub fn arg_type(func: &str, arg: &str, expected: &str, got: &str) -> Self {
        Self::new(codes::ARG_TYPE,
            format!("{}() argument '{}': expected {}, got {}", func, arg, expected, got))
    }

    pub fn domain_error(details: impl Into<String>) -> Self {
        Self::new(codes::DOMAIN_ERROR, format!("Domain error: {}", details.into()))
    }

    pub fn internal(details: impl Into<String>) -> Self {
        Self::new(codes::INTERNAL, format!("Internal error: {}", details.into()))
            .with_suggestion("This is a bug, please report it")
            .with_severity(Severity::Fatal)
    }

    // ========== Unit Error Constructors ==========

    pub fn unknown_unit(unit: &str) -> Self {
        Self::new(codes::UNKNOWN_UNIT, format!("Unknown unit: {}", unit))
            .with_suggestion("Use a shorthand such as g, oz, tsp, tbsp, cup or fl oz")
    }

    pub fn incompatible_units(from: &str, to: &str, from_category: &str, to_category: &str) -> Self {
        Self::new(codes::INCOMPATIBLE_UNITS,
            format!("Cannot convert {} ({}) to {} ({})", from, from_category, to, to_category))
            .with_suggestion(format!("Pick a target unit from the {} group", from_category))
            .with_severity(Severity::Warning)
    }
}

impl std::fmt::Display for LarderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for LarderError {}
