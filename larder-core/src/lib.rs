//! Larder Core - Fundamental types
//!
//! This crate provides the core types shared by the Larder crates:
//! - `Value`: Runtime values (numbers, text, objects, errors)
//! - `LarderError`: Structured errors for tool consumption

mod value;
mod error;

pub use value::Value;
pub use error::{LarderError, Severity, codes};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Value, LarderError, Severity};
    pub use crate::error::codes;
}
