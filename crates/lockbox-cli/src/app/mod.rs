//! Application-level utilities for the Lockbox CLI.
//!
//! This module provides:
//! - Path resolution for config and store files
//! - A context bundling CLI args with lazily loaded config

mod context;
mod resolver;

pub use context::AppContext;
pub use resolver::resolve_config_path;
