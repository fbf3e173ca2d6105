//! Publishing lint output to a public paste service.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use super::{optional_timeout, PasteSink, PublishedReference};
use crate::config::SinkConfig;
use crate::error::PublishError;

/// Pipes the text into an upload program; its stdout is the reference.
///
/// The default is `curl -sS -F f:1=<- ix.io`.
#[derive(Debug, Clone)]
pub struct CommandSink {
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl CommandSink {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    pub fn from_config(config: &SinkConfig) -> Self {
        Self::new(
            config.program.clone(),
            config.args.clone(),
            optional_timeout(config.timeout_secs),
        )
    }

    async fn upload(&self, text: &str) -> Result<std::process::Output, PublishError> {
        let spawn_error = |source| PublishError::Spawn {
            program: self.program.clone(),
            source,
        };

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(spawn_error)?;

        let mut stdin = child.stdin.take();
        let feed = async move {
            if let Some(stdin) = stdin.as_mut() {
                if let Err(e) = stdin.write_all(text.as_bytes()).await {
                    // The program may exit without reading everything.
                    warn!(error = %e, "upload program closed stdin early");
                }
            }
            drop(stdin);
        };

        let (output, ()) = tokio::join!(child.wait_with_output(), feed);
        output.map_err(spawn_error)
    }
}

#[async_trait]
impl PasteSink for CommandSink {
    async fn publish(&self, text: &str) -> Result<PublishedReference, PublishError> {
        debug!(program = %self.program, bytes = text.len(), "publishing lint output");

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.upload(text))
                .await
                .map_err(|_| PublishError::Timeout(limit.as_secs()))??,
            None => self.upload(text).await?,
        };

        if !output.status.success() {
            return Err(PublishError::Exit {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        PublishedReference::parse(&String::from_utf8_lossy(&output.stdout))
    }
}

/// POSTs the text as one multipart form field; the response body is the
/// reference.
#[derive(Debug, Clone)]
pub struct HttpSink {
    client: reqwest::Client,
    endpoint: String,
    field: String,
}

impl HttpSink {
    pub fn new(
        endpoint: impl Into<String>,
        field: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("lintbot/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: endpoint.into(),
            field: field.into(),
        })
    }

    pub fn from_config(config: &SinkConfig) -> Result<Self, reqwest::Error> {
        Self::new(
            config.endpoint.clone(),
            config.field.clone(),
            optional_timeout(config.timeout_secs),
        )
    }
}

#[async_trait]
impl PasteSink for HttpSink {
    async fn publish(&self, text: &str) -> Result<PublishedReference, PublishError> {
        debug!(endpoint = %self.endpoint, bytes = text.len(), "publishing lint output");

        let form = reqwest::multipart::Form::new().text(self.field.clone(), text.to_owned());
        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PublishError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        PublishedReference::parse(&body)
    }
}
