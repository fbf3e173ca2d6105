//! lintbot - lints pasted source code for an IRC channel.
//!
//! Users address the bot with a paste URL; the bot fetches the raw paste,
//! stages it on disk, runs the linter over it and answers with a link to
//! the published output.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod router;
pub mod session;
pub mod telemetry;

pub use config::Config;
pub use error::{PipelineError, SessionError};
pub use pipeline::Pipeline;
pub use router::{CommandRouter, Intent, LintRequest};
pub use session::{Bot, Session, SessionAction, SessionState};
