//! Recording fakes for the fetch, lint and publish stages.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use lintbot::error::{FetchError, LintError, PublishError};
use lintbot::pipeline::{
    LintResult, Linter, PasteFetcher, PasteSink, PublishedReference, StagedFile,
};

/// Serves canned paste text; URLs containing "missing" answer 404.
#[derive(Clone, Default)]
pub struct MockFetcher {
    pub body: String,
    /// Added before answering URLs containing "slow".
    pub slow_delay: Duration,
    pub urls: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    pub fn new(body: &str) -> Self {
        Self {
            body: body.to_owned(),
            ..Self::default()
        }
    }

    #[allow(dead_code)]
    pub fn calls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PasteFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.urls.lock().unwrap().push(url.to_owned());
        if url.contains("slow") {
            tokio::time::sleep(self.slow_delay).await;
        }
        if url.contains("missing") {
            return Err(FetchError::Status {
                url: format!("{url}/raw/"),
                status: 404,
            });
        }
        Ok(self.body.clone())
    }
}

/// Reads the staged file back and reports it as lint output.
#[derive(Clone, Default)]
pub struct MockLinter {
    pub fail: bool,
    pub staged: Arc<Mutex<Vec<StagedFile>>>,
}

impl MockLinter {
    #[allow(dead_code)]
    pub fn calls(&self) -> Vec<StagedFile> {
        self.staged.lock().unwrap().clone()
    }
}

#[async_trait]
impl Linter for MockLinter {
    async fn run(&self, staged: &StagedFile) -> Result<LintResult, LintError> {
        self.staged.lock().unwrap().push(staged.clone());
        if self.fail {
            return Err(LintError::Spawn {
                program: "pylint".into(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not installed"),
            });
        }
        let content = std::fs::read_to_string(&staged.path).unwrap_or_default();
        Ok(LintResult {
            status: Some(4),
            output: format!("lint of {}:\n{}", staged.name, content),
        })
    }
}

/// Records published text and answers with a numbered reference.
#[derive(Clone, Default)]
pub struct MockSink {
    pub fail: bool,
    pub published: Arc<Mutex<Vec<String>>>,
}

impl MockSink {
    #[allow(dead_code)]
    pub fn calls(&self) -> Vec<String> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl PasteSink for MockSink {
    async fn publish(&self, text: &str) -> Result<PublishedReference, PublishError> {
        if self.fail {
            return Err(PublishError::Status(503));
        }
        let mut published = self.published.lock().unwrap();
        published.push(text.to_owned());
        PublishedReference::parse(&format!("http://ix.io/ref{}\n", published.len()))
    }
}
