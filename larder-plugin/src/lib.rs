//! Larder Plugin System
//!
//! Provides the `FunctionPlugin` trait and the registry that exposes
//! pure unit functions to the tool server.

mod traits;
mod registry;
mod context;

pub use traits::{FunctionPlugin, FunctionMeta, ArgMeta};
pub use registry::PluginRegistry;
pub use context::{EvalContext, DEFAULT_LOCALE, DEFAULT_SIGNIFICANT_DIGITS};

/// Re-export core types for plugin authors
pub mod prelude {
    pub use crate::{FunctionPlugin, FunctionMeta, ArgMeta, PluginRegistry, EvalContext};
    pub use larder_core::prelude::*;
}
