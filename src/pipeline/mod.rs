//! The lint pipeline: fetch, stage, lint, publish.
//!
//! Each stage sits behind a trait so the session can be driven against
//! in-process fakes. [`Pipeline::respond`] turns one [`LintRequest`] into the
//! single message sent back to the requester.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lintbot_proto::Message;
use tracing::{debug, error, info, warn};

use crate::config::{Config, SinkBackend};
use crate::error::{FetchError, LintError, PipelineError, PublishError};
use crate::router::LintRequest;

pub mod fetch;
pub mod lint;
pub mod sink;
pub mod staging;

pub use fetch::HttpFetcher;
pub use lint::CommandLinter;
pub use sink::{CommandSink, HttpSink};
pub use staging::StagingStore;

/// How a staged file came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// This call created the file and wrote the content.
    Created,
    /// The name was taken; the existing file's lock was acquired and
    /// released, so its first writer has finished.
    ExistsAndLockAcquired,
}

/// A paste written to the staging directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub name: String,
    pub directory: PathBuf,
    pub path: PathBuf,
    pub outcome: StageOutcome,
}

/// Captured linter run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintResult {
    /// Exit code; `None` when the process was killed by a signal.
    pub status: Option<i32>,
    /// Standard output followed by standard error.
    pub output: String,
}

/// Retrieval reference handed back by a paste sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedReference(String);

impl PublishedReference {
    /// Trim `raw`; an empty reference is an error.
    pub fn parse(raw: &str) -> Result<Self, PublishError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PublishError::EmptyReference);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PublishedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Retrieves the raw source behind a paste URL.
#[async_trait]
pub trait PasteFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Runs the static-analysis tool over a staged file.
#[async_trait]
pub trait Linter: Send + Sync {
    /// A non-zero exit is a normal result, not an error.
    async fn run(&self, staged: &StagedFile) -> Result<LintResult, LintError>;
}

/// Uploads text somewhere public and returns how to find it.
#[async_trait]
pub trait PasteSink: Send + Sync {
    async fn publish(&self, text: &str) -> Result<PublishedReference, PublishError>;
}

/// Zero means no limit.
pub(crate) fn optional_timeout(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// The four stages wired together.
#[derive(Clone)]
pub struct Pipeline {
    fetcher: Arc<dyn PasteFetcher>,
    staging: StagingStore,
    linter: Arc<dyn Linter>,
    sink: Arc<dyn PasteSink>,
    service_text: String,
}

impl Pipeline {
    pub fn new(
        fetcher: Arc<dyn PasteFetcher>,
        staging: StagingStore,
        linter: Arc<dyn Linter>,
        sink: Arc<dyn PasteSink>,
        service_text: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            staging,
            linter,
            sink,
            service_text: service_text.into(),
        }
    }

    /// Build the production pipeline from configuration.
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        if config.fetch.accept_invalid_certs {
            warn!("certificate validation is disabled for paste fetches");
        }
        let fetcher = HttpFetcher::from_config(&config.fetch)?;
        let linter = CommandLinter::from_config(&config.linter);
        let sink: Arc<dyn PasteSink> = match config.sink.backend {
            SinkBackend::Command => Arc::new(CommandSink::from_config(&config.sink)),
            SinkBackend::Http => Arc::new(HttpSink::from_config(&config.sink)?),
        };

        Ok(Self::new(
            Arc::new(fetcher),
            StagingStore::from_config(&config.staging),
            Arc::new(linter),
            sink,
            format!("I only support {}", config.router.service_name),
        ))
    }

    /// Run every stage for one paste URL.
    pub async fn run(&self, url: &str) -> Result<PublishedReference, PipelineError> {
        let text = self.fetcher.fetch(url).await?;
        debug!(bytes = text.len(), "paste fetched");

        let staged = self.staging.stage(text).await?;
        debug!(path = %staged.path.display(), outcome = ?staged.outcome, "paste staged");

        let result = self.linter.run(&staged).await?;
        debug!(status = ?result.status, bytes = result.output.len(), "linter finished");

        let reference = self.sink.publish(&result.output).await?;
        Ok(reference)
    }

    /// Run the request and build the reply for the requester.
    pub async fn respond(&self, request: &LintRequest) -> Message {
        let text = match self.run(&request.url).await {
            Ok(reference) => {
                info!(reference = %reference, "lint result published");
                reference.to_string()
            }
            Err(PipelineError::Fetch(e)) => {
                warn!(error = %e, "paste fetch failed");
                self.service_text.clone()
            }
            Err(e) => {
                error!(stage = e.stage(), error = %e, "lint request failed");
                format!("sorry, linting that paste failed ({})", e.stage())
            }
        };
        Message::privmsg(request.requester.clone(), text)
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("staging", &self.staging)
            .field("service_text", &self.service_text)
            .finish_non_exhaustive()
    }
}
