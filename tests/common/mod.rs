//! Integration test common infrastructure.
//!
//! In-process fakes for the pipeline stages and a scripted IRC server.

#[allow(dead_code)]
pub mod irc;
#[allow(dead_code)]
pub mod mocks;

#[allow(unused_imports)]
pub use irc::{FakeIrcServer, ServerConn};
#[allow(unused_imports)]
pub use mocks::{MockFetcher, MockLinter, MockSink};

use lintbot::Config;

/// Defaults pointed at a local server and a temporary staging directory.
#[allow(dead_code)]
pub fn test_config(port: u16, staging: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.irc.server = "127.0.0.1".into();
    config.irc.port = port;
    config.irc.ping_interval_secs = 60;
    config.irc.registration_timeout_secs = 5;
    config.reconnect.initial_delay_ms = 10;
    config.reconnect.max_delay_secs = 1;
    config.staging.directory = staging.display().to_string();
    config
}
