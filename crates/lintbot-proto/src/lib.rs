//! # lintbot-proto
//!
//! The IRC client protocol pieces lintbot needs: an owned message model,
//! a nom-based line parser, serialization, and (with the `tokio` feature)
//! a line codec plus a framed TCP/TLS transport.
//!
//! ```rust
//! use lintbot_proto::{Command, Message};
//!
//! let msg: Message = ":alice!a@host PRIVMSG #python :lintbot: https://dpaste.de/abc"
//!     .parse()
//!     .expect("valid IRC message");
//! assert_eq!(msg.source_nickname(), Some("alice"));
//! assert!(matches!(msg.command, Command::PRIVMSG(..)));
//!
//! let reply = Message::privmsg("alice", "http://ix.io/xyz");
//! assert_eq!(reply.to_string(), "PRIVMSG alice :http://ix.io/xyz\r\n");
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod casemap;
pub mod chan;
pub mod command;
pub mod error;
#[cfg(feature = "tokio")]
pub mod irc;
#[cfg(feature = "tokio")]
pub mod line;
pub mod message;
pub mod prefix;
pub mod response;
#[cfg(feature = "tokio")]
pub mod transport;

pub use self::casemap::{irc_eq, irc_lower_char, irc_to_lower};
pub use self::chan::ChannelExt;
pub use self::command::Command;
pub use self::error::{MessageParseError, ProtocolError};
#[cfg(feature = "tokio")]
pub use self::irc::IrcCodec;
pub use self::message::Message;
pub use self::prefix::Prefix;
pub use self::response::Response;
#[cfg(feature = "tokio")]
pub use self::transport::{Transport, TransportReadError, MAX_IRC_LINE_LEN};
