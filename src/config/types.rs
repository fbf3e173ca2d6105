//! Core configuration types and loading.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use super::defaults::*;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "LINTBOT_CONFIG";

/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "lintbot.toml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Bot configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// IRC connection and identity.
    #[serde(default)]
    pub irc: IrcConfig,
    /// Backoff between reconnect attempts.
    #[serde(default)]
    pub reconnect: ReconnectConfig,
    /// Command recognition.
    #[serde(default)]
    pub router: RouterConfig,
    /// Paste retrieval.
    #[serde(default)]
    pub fetch: FetchConfig,
    /// On-disk staging of pasted source.
    #[serde(default)]
    pub staging: StagingConfig,
    /// External linter invocation.
    #[serde(default)]
    pub linter: LinterConfig,
    /// Where lint output is published.
    #[serde(default)]
    pub sink: SinkConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Find and load the configuration.
    ///
    /// `$LINTBOT_CONFIG` wins; otherwise `lintbot.toml` in the working
    /// directory is used if it exists; otherwise built-in defaults. Returns
    /// the path that was read, if any.
    pub fn discover() -> Result<(Self, Option<PathBuf>), ConfigError> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            let path = PathBuf::from(path);
            return Ok((Self::load(&path)?, Some(path)));
        }

        let local = PathBuf::from(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            return Ok((Self::load(&local)?, Some(local)));
        }

        Ok((Self::default(), None))
    }
}

/// IRC server and identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct IrcConfig {
    /// Server hostname.
    #[serde(default = "default_server")]
    pub server: String,
    /// Server port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Connect with TLS (certificates verified against the system roots).
    #[serde(default)]
    pub tls: bool,
    /// Fixed nickname; also the prefix users address the bot with.
    #[serde(default = "default_nickname")]
    pub nickname: String,
    /// Ident sent in USER.
    #[serde(default = "default_username")]
    pub username: String,
    /// Real name sent in USER.
    #[serde(default = "default_realname")]
    pub realname: String,
    /// Server password (PASS), if the network needs one.
    #[serde(default)]
    pub password: Option<String>,
    /// Reason sent with QUIT on shutdown.
    #[serde(default = "default_quit_message")]
    pub quit_message: String,
    /// Seconds of silence before the bot pings the server; a second silent
    /// interval drops the connection.
    #[serde(default = "default_ping_interval")]
    pub ping_interval_secs: u64,
    /// Seconds allowed between connecting and joining the channel.
    #[serde(default = "default_registration_timeout")]
    pub registration_timeout_secs: u64,
}

impl IrcConfig {
    /// `host:port` for `TcpStream::connect`.
    pub fn address(&self) -> String {
        format!("{}:{}", self.server, self.port)
    }

    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.ping_interval_secs)
    }

    pub fn registration_timeout(&self) -> Duration {
        Duration::from_secs(self.registration_timeout_secs)
    }
}

impl Default for IrcConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            port: default_port(),
            tls: false,
            nickname: default_nickname(),
            username: default_username(),
            realname: default_realname(),
            password: None,
            quit_message: default_quit_message(),
            ping_interval_secs: default_ping_interval(),
            registration_timeout_secs: default_registration_timeout(),
        }
    }
}

/// Reconnect backoff configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReconnectConfig {
    /// Delay before the first reconnect attempt (milliseconds).
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    /// Upper bound for the delay (seconds).
    #[serde(default = "default_max_delay_secs")]
    pub max_delay_secs: u64,
    /// Growth factor per failed attempt.
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_secs: default_max_delay_secs(),
            multiplier: default_multiplier(),
        }
    }
}

/// Command recognition configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RouterConfig {
    /// Regular expression a paste URL must match.
    #[serde(default = "default_paste_pattern")]
    pub paste_pattern: String,
    /// Name of the supported paste service, used in replies.
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            paste_pattern: default_paste_pattern(),
            service_name: default_service_name(),
        }
    }
}

/// Paste retrieval configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Appended to the paste URL to reach the raw text.
    #[serde(default = "default_raw_suffix")]
    pub raw_suffix: String,
    /// Skip TLS certificate validation. Off unless the operator opts in.
    #[serde(default)]
    pub accept_invalid_certs: bool,
    /// Request timeout (seconds); 0 waits forever.
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            raw_suffix: default_raw_suffix(),
            accept_invalid_certs: false,
            timeout_secs: default_fetch_timeout(),
        }
    }
}

/// Staging directory configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StagingConfig {
    /// Directory holding staged pastes; created on first use.
    #[serde(default = "default_staging_directory")]
    pub directory: String,
    /// Length of generated file names (1..=36).
    #[serde(default = "default_name_length")]
    pub name_length: usize,
    /// Extension for the analysed language, including the dot.
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            directory: default_staging_directory(),
            name_length: default_name_length(),
            extension: default_extension(),
        }
    }
}

/// Linter invocation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LinterConfig {
    /// Program to run.
    #[serde(default = "default_linter_program")]
    pub program: String,
    /// Arguments placed before the staged file path.
    #[serde(default = "default_linter_args")]
    pub args: Vec<String>,
    /// Kill the linter after this many seconds; 0 waits forever.
    #[serde(default = "default_linter_timeout")]
    pub timeout_secs: u64,
}

impl Default for LinterConfig {
    fn default() -> Self {
        Self {
            program: default_linter_program(),
            args: default_linter_args(),
            timeout_secs: default_linter_timeout(),
        }
    }
}

/// Which publishing backend to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkBackend {
    /// Pipe the text into an upload program (curl by default).
    #[default]
    Command,
    /// POST the text as a multipart form directly.
    Http,
}

/// Publishing configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SinkConfig {
    #[serde(default)]
    pub backend: SinkBackend,
    /// Upload program for the `command` backend. Receives the text on stdin.
    #[serde(default = "default_sink_program")]
    pub program: String,
    /// Arguments for the upload program.
    #[serde(default = "default_sink_args")]
    pub args: Vec<String>,
    /// Endpoint for the `http` backend.
    #[serde(default = "default_sink_endpoint")]
    pub endpoint: String,
    /// Form field carrying the text for the `http` backend.
    #[serde(default = "default_sink_field")]
    pub field: String,
    /// Timeout for either backend (seconds); 0 waits forever.
    #[serde(default = "default_sink_timeout")]
    pub timeout_secs: u64,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            backend: SinkBackend::default(),
            program: default_sink_program(),
            args: default_sink_args(),
            endpoint: default_sink_endpoint(),
            field: default_sink_field(),
            timeout_secs: default_sink_timeout(),
        }
    }
}
