//! External linter invocation.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::{optional_timeout, LintResult, Linter, StagedFile};
use crate::config::LinterConfig;
use crate::error::LintError;

/// Runs `<program> <args..> <path>` and captures stdout then stderr.
#[derive(Debug, Clone)]
pub struct CommandLinter {
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl CommandLinter {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    pub fn from_config(config: &LinterConfig) -> Self {
        Self::new(
            config.program.clone(),
            config.args.clone(),
            optional_timeout(config.timeout_secs),
        )
    }
}

#[async_trait]
impl Linter for CommandLinter {
    async fn run(&self, staged: &StagedFile) -> Result<LintResult, LintError> {
        debug!(program = %self.program, path = %staged.path.display(), "running linter");

        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(&staged.path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| LintError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| LintError::Timeout {
                    program: self.program.clone(),
                    secs: limit.as_secs(),
                })?,
            None => child.wait_with_output().await,
        }
        .map_err(|source| LintError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(LintResult {
            status: output.status.code(),
            output: text,
        })
    }
}
