//! Error types for the protocol crate.

use thiserror::Error;

/// Convenience alias for results carrying a [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Top-level protocol errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Line exceeded the configured maximum length.
    #[error("message too long: {actual} bytes (limit: {limit})")]
    MessageTooLong {
        /// Observed length.
        actual: usize,
        /// Configured limit.
        limit: usize,
    },

    /// Line contained a control character IRC forbids.
    #[error("illegal control character: {0:?}")]
    IllegalControlChar(char),

    /// The line was framed correctly but is not an IRC message.
    #[error("invalid message: {string}")]
    InvalidMessage {
        /// The rejected line.
        string: String,
        /// Why it was rejected.
        #[source]
        cause: MessageParseError,
    },
}

/// Errors encountered when parsing a single IRC message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum MessageParseError {
    /// Message was empty.
    #[error("empty message")]
    EmptyMessage,

    /// A known command arrived with fewer parameters than it requires.
    #[error("{command} needs at least {expected} parameters, got {actual}")]
    NotEnoughArguments {
        /// Command name.
        command: String,
        /// Minimum parameter count.
        expected: usize,
        /// Parameters present.
        actual: usize,
    },

    /// Prefix contained characters that cannot appear in a source.
    #[error("invalid prefix: {0}")]
    InvalidPrefix(String),

    /// Parser stopped at a given position.
    #[error("parse error at position {position}: {context}")]
    ParseContext {
        /// Byte offset into the line.
        position: usize,
        /// Parser diagnostic.
        context: String,
    },
}
