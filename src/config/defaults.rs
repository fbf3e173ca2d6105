//! Default value functions for configuration.
//!
//! The values reproduce the bot's historical behaviour: dpaste.de input,
//! pylint with the convention/refactor/report categories off, and ix.io
//! output via curl.

// =============================================================================
// IRC Defaults
// =============================================================================

pub fn default_server() -> String {
    "irc.libera.chat".to_string()
}

pub fn default_port() -> u16 {
    6667
}

pub fn default_nickname() -> String {
    "lintbot".to_string()
}

pub fn default_username() -> String {
    "lintbot".to_string()
}

pub fn default_realname() -> String {
    "Code Suggestions IRC bot".to_string()
}

pub fn default_quit_message() -> String {
    "lintbot shutting down".to_string()
}

pub fn default_ping_interval() -> u64 {
    120
}

pub fn default_registration_timeout() -> u64 {
    60
}

// =============================================================================
// Reconnect Defaults
// =============================================================================

pub fn default_initial_delay_ms() -> u64 {
    1_000
}

pub fn default_max_delay_secs() -> u64 {
    300
}

pub fn default_multiplier() -> f64 {
    2.0
}

// =============================================================================
// Router Defaults
// =============================================================================

pub fn default_paste_pattern() -> String {
    r"https?://dpaste\.de/\S+".to_string()
}

pub fn default_service_name() -> String {
    "dpaste.de".to_string()
}

// =============================================================================
// Fetch Defaults
// =============================================================================

pub fn default_raw_suffix() -> String {
    "/raw/".to_string()
}

pub fn default_fetch_timeout() -> u64 {
    15
}

// =============================================================================
// Staging Defaults
// =============================================================================

pub fn default_staging_directory() -> String {
    "pastes".to_string()
}

pub fn default_name_length() -> usize {
    7
}

pub fn default_extension() -> String {
    ".py".to_string()
}

// =============================================================================
// Linter Defaults
// =============================================================================

pub fn default_linter_program() -> String {
    "pylint".to_string()
}

pub fn default_linter_args() -> Vec<String> {
    vec!["--disable=C,R,RP0001,RP0002,RP0003,RP0101,RP0401,RP0701,RP0801".to_string()]
}

pub fn default_linter_timeout() -> u64 {
    60
}

// =============================================================================
// Sink Defaults
// =============================================================================

pub fn default_sink_program() -> String {
    "curl".to_string()
}

pub fn default_sink_args() -> Vec<String> {
    vec![
        "-sS".to_string(),
        "-F".to_string(),
        "f:1=<-".to_string(),
        "ix.io".to_string(),
    ]
}

pub fn default_sink_endpoint() -> String {
    "http://ix.io".to_string()
}

pub fn default_sink_field() -> String {
    "f:1".to_string()
}

pub fn default_sink_timeout() -> u64 {
    30
}
