//! Configuration loading and management.
//!
//! - [`types`]: config structs and loading
//! - [`defaults`]: serde default functions
//! - [`validation`]: startup checks that report every problem at once

mod defaults;
mod types;
pub mod validation;

pub use types::{
    Config, ConfigError, FetchConfig, IrcConfig, LinterConfig, ReconnectConfig, RouterConfig,
    SinkBackend, SinkConfig, StagingConfig, CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE,
};
