//! Unified error handling for lintbot.
//!
//! One enum per pipeline stage, wrapped by [`PipelineError`], plus the
//! connection-level [`SessionError`].

use lintbot_proto::{ProtocolError, TransportReadError};
use thiserror::Error;

// ============================================================================
// Pipeline Errors (one per stage)
// ============================================================================

/// Retrieving the raw paste failed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },
}

/// Writing the paste into the staging directory failed.
#[derive(Debug, Error)]
pub enum StagingError {
    #[error("cannot create staging directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot create {path}: {source}")]
    Create {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot lock {path}: {source}")]
    Lock {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("staging task aborted: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Running the linter failed. A non-zero exit status is not a failure.
#[derive(Debug, Error)]
pub enum LintError {
    #[error("cannot run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} did not finish within {secs}s")]
    Timeout { program: String, secs: u64 },
}

/// Publishing the lint output failed.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("cannot run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    Exit {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("upload did not finish within {0}s")]
    Timeout(u64),

    #[error("upload request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("paste service answered with status {0}")]
    Status(u16),

    #[error("paste service returned an empty reference")]
    EmptyReference,
}

/// Failure of one lint request, tagged with the stage that failed.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("staging failed: {0}")]
    Staging(#[from] StagingError),

    #[error("lint failed: {0}")]
    Lint(#[from] LintError),

    #[error("publish failed: {0}")]
    Publish(#[from] PublishError),
}

impl PipelineError {
    /// Short stage label used in logs and in the reply to the requester.
    #[inline]
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Fetch(_) => "fetch",
            Self::Staging(_) => "staging",
            Self::Lint(_) => "lint",
            Self::Publish(_) => "publish",
        }
    }
}

// ============================================================================
// Session Errors (connection lifecycle)
// ============================================================================

/// Reasons a connection attempt or an established connection ended.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("cannot connect to {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("tls setup failed: {0}")]
    Tls(String),

    #[error("registration did not complete within {0}s")]
    RegistrationTimeout(u64),

    #[error("read failed: {0}")]
    Read(#[from] TransportReadError),

    #[error("write failed: {0}")]
    Write(#[from] ProtocolError),

    #[error("server closed the connection")]
    Eof,

    #[error("no traffic from server after ping")]
    PingTimeout,

    #[error("{0}")]
    Closed(String),
}
