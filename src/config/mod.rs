//! Configuration for the EVM analyzer.
//!
//! User preferences live in a single KDL file, `config.kdl`:
//!
//! - `output-format` - "json" or "human"
//! - `export-format` - "text", "csv" or "json"
//! - `currency` - symbol used when formatting amounts
//!
//! Use the [`resolver`] module for location lookup and precedence resolution.

pub mod resolver;
pub mod schema;

pub use resolver::{
    ConfigOverrides, EVM_CONFIG_ENV, Resolved, ResolvedConfig, ValueSource, config_path,
    default_config_path, read_config, resolve_config, write_config,
};
pub use schema::{CONFIG_KEYS, EvmConfig, OutputFormat};
