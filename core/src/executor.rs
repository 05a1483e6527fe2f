//! Process execution boundary.
//!
//! Everything that talks to the operating system goes through
//! `CommandExecutor`, so the rest of the crate can be tested against a
//! scripted executor instead of a real `say`.

use crate::{Result, SayError};
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

/// Pass-through execution settings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExecOptions {
    /// Kill the child and fail with `SayError::Timeout` after this long.
    pub timeout: Option<Duration>,
}

impl ExecOptions {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }
}

/// Captured result of a finished process.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Stdout split into lines, lazily.
    pub fn lines(&self) -> std::str::Lines<'_> {
        self.stdout.lines()
    }

    /// Error text of a failed run: stderr, or the exit code if stderr is empty.
    pub fn error_text(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        match self.code {
            Some(code) => format!("exited with status {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

impl From<std::process::Output> for CommandOutput {
    fn from(output: std::process::Output) -> Self {
        Self {
            code: output.status.code(),
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run `program` with `args` to completion and capture its output.
    ///
    /// A non-zero exit is not an error here; callers inspect `success`.
    async fn run(&self, program: &str, args: &[String], opts: &ExecOptions)
        -> Result<CommandOutput>;
}

/// Executor backed by `tokio::process`.
#[derive(Clone, Debug, Default)]
pub struct SystemExecutor;

impl SystemExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandExecutor for SystemExecutor {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        opts: &ExecOptions,
    ) -> Result<CommandOutput> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(target = "say", command = ?cmd, "Running command");
        let output = match opts.timeout {
            Some(limit) => match timeout(limit, cmd.output()).await {
                Ok(res) => res?,
                Err(_) => {
                    return Err(SayError::Timeout {
                        program: program.to_string(),
                        timeout_ms: limit.as_millis() as u64,
                    })
                }
            },
            None => cmd.output().await?,
        };
        Ok(CommandOutput::from(output))
    }
}
