//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::{Config, SinkBackend};
use thiserror::Error;

/// Longest generated file name: the alphabet has 36 symbols and names are
/// sampled without replacement.
pub const MAX_NAME_LENGTH: usize = 36;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("irc.server is required")]
    MissingServer,
    #[error("irc.nickname is required and must not contain spaces, got '{0}'")]
    InvalidNickname(String),
    #[error("irc.ping_interval_secs must be greater than zero")]
    ZeroPingInterval,
    #[error("irc.registration_timeout_secs must be greater than zero")]
    ZeroRegistrationTimeout,
    #[error("reconnect.multiplier must be a finite number of at least 1.0, got {0}")]
    InvalidMultiplier(f64),
    #[error("reconnect.initial_delay_ms must be greater than zero")]
    ZeroInitialDelay,
    #[error("router.paste_pattern is not a valid regex: {0}")]
    InvalidPastePattern(String),
    #[error("staging.name_length must be between 1 and {MAX_NAME_LENGTH}, got {0}")]
    InvalidNameLength(usize),
    #[error("staging.extension must be empty or start with '.', got '{0}'")]
    InvalidExtension(String),
    #[error("staging.directory is required")]
    MissingStagingDirectory,
    #[error("linter.program is required")]
    MissingLinterProgram,
    #[error("sink.program is required for the command backend")]
    MissingSinkProgram,
    #[error("sink.endpoint must be an http(s) URL, got '{0}'")]
    InvalidSinkEndpoint(String),
    #[error("sink.field is required for the http backend")]
    MissingSinkField,
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    // IRC
    if config.irc.server.is_empty() {
        errors.push(ValidationError::MissingServer);
    }
    let nick = &config.irc.nickname;
    if nick.is_empty() || nick.contains(' ') || nick.contains(':') {
        errors.push(ValidationError::InvalidNickname(nick.clone()));
    }
    if config.irc.ping_interval_secs == 0 {
        errors.push(ValidationError::ZeroPingInterval);
    }
    if config.irc.registration_timeout_secs == 0 {
        errors.push(ValidationError::ZeroRegistrationTimeout);
    }

    // Reconnect
    let multiplier = config.reconnect.multiplier;
    if !multiplier.is_finite() || multiplier < 1.0 {
        errors.push(ValidationError::InvalidMultiplier(multiplier));
    }
    if config.reconnect.initial_delay_ms == 0 {
        errors.push(ValidationError::ZeroInitialDelay);
    }

    // Router
    if let Err(e) = regex::Regex::new(&config.router.paste_pattern) {
        errors.push(ValidationError::InvalidPastePattern(e.to_string()));
    }

    // Staging
    let len = config.staging.name_length;
    if len == 0 || len > MAX_NAME_LENGTH {
        errors.push(ValidationError::InvalidNameLength(len));
    }
    let ext = &config.staging.extension;
    if !ext.is_empty() && (!ext.starts_with('.') || ext.contains('/')) {
        errors.push(ValidationError::InvalidExtension(ext.clone()));
    }
    if config.staging.directory.is_empty() {
        errors.push(ValidationError::MissingStagingDirectory);
    }

    // Linter
    if config.linter.program.trim().is_empty() {
        errors.push(ValidationError::MissingLinterProgram);
    }

    // Sink
    match config.sink.backend {
        SinkBackend::Command => {
            if config.sink.program.trim().is_empty() {
                errors.push(ValidationError::MissingSinkProgram);
            }
        }
        SinkBackend::Http => {
            let endpoint = &config.sink.endpoint;
            if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                errors.push(ValidationError::InvalidSinkEndpoint(endpoint.clone()));
            }
            if config.sink.field.is_empty() {
                errors.push(ValidationError::MissingSinkField);
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
