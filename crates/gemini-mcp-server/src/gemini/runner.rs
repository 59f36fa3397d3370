// crates/gemini-mcp-server/src/gemini/runner.rs
// External CLI invocation with a deadline

use crate::error::{GeminiError, Result};
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, warn};

/// A fully-specified command line for one consultation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliInvocation {
    pub program: String,
    pub args: Vec<String>,
}

impl CliInvocation {
    /// `<cli_command> [-m <model>] -p <prompt>`; the model flag is skipped
    /// when `model` is empty.
    pub fn new(cli_command: &str, model: &str, prompt: &str) -> Self {
        let mut args = Vec::with_capacity(4);
        if !model.trim().is_empty() {
            args.push("-m".to_string());
            args.push(model.to_string());
        }
        args.push("-p".to_string());
        args.push(prompt.to_string());

        Self {
            program: cli_command.to_string(),
            args,
        }
    }
}

/// Buffered result of a finished CLI process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOutput {
    pub success: bool,
    /// None when the process was ended by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Runs a CLI invocation to completion.
///
/// Implementations must give up with [`GeminiError::Timeout`] once
/// `timeout` has passed. A non-zero exit is not an error at this level.
#[async_trait]
pub trait CliRunner: Send + Sync {
    async fn run(&self, invocation: &CliInvocation, timeout: Duration) -> Result<CliOutput>;
}

/// Spawns the CLI as a child process with piped output
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CliRunner for ProcessRunner {
    async fn run(&self, invocation: &CliInvocation, timeout: Duration) -> Result<CliOutput> {
        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| GeminiError::Spawn {
                command: invocation.program.clone(),
                source,
            })?;

        debug!(program = %invocation.program, pid = ?child.id(), "Spawned CLI");

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let outcome = {
            let io = async { tokio::try_join!(child.wait(), drain(stdout), drain(stderr)) };
            tokio::time::timeout(timeout, io).await
        };

        match outcome {
            Ok(Ok((status, stdout, stderr))) => {
                debug!(program = %invocation.program, exit_code = ?status.code(), "CLI exited");
                Ok(CliOutput {
                    success: status.success(),
                    exit_code: status.code(),
                    stdout: String::from_utf8_lossy(&stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&stderr).into_owned(),
                })
            }
            Ok(Err(e)) => Err(GeminiError::Io(e)),
            Err(_) => {
                // Kill and reap so nothing is left running past the deadline
                if let Err(e) = child.kill().await {
                    warn!(program = %invocation.program, error = %e, "Failed to kill timed-out CLI");
                }
                Err(GeminiError::Timeout(timeout.as_secs()))
            }
        }
    }
}

async fn drain<R: AsyncRead + Unpin>(reader: Option<R>) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut reader) = reader {
        reader.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}
