//! Parsing and validation of `schemagen.toml` project configuration files.
//!
//! This crate reads the project configuration file and produces a strongly-typed
//! [`ProjectConfig`], and resolves individual build configurations (`main`,
//! `test`, ...) into [`ResolvedConfiguration`] values with concrete paths.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE};
pub use resolve::{configuration_names, resolve_configuration, ResolvedConfiguration};
pub use types::*;
