//! Process layer behind the command executor.

use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use coho_mcp_types::ExecOutput;
use coho_mcp_util::redact_secret;
use tokio::process::Command;

/// Fully resolved external command: program, argument vector and working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote_for_display(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", quote_for_display(arg))?;
        }
        Ok(())
    }
}

impl CommandLine {
    /// Display form with `secret` masked in each argument before quoting.
    pub fn redacted_display(&self, secret: Option<&str>) -> String {
        let masked = CommandLine {
            program: redact_secret(&self.program, secret),
            args: self.args.iter().map(|arg| redact_secret(arg, secret)).collect(),
            cwd: None,
        };
        redact_secret(&masked.to_string(), secret)
    }
}

/// Runs a [`CommandLine`] to completion and captures its output.
///
/// Implementations must not interpret arguments through a shell. Timeouts
/// and redaction are the executor's job.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &CommandLine) -> std::io::Result<ExecOutput>;
}

/// [`CommandRunner`] backed by `tokio::process`.
///
/// The child is killed when the returned future is dropped, which is how the
/// executor's timeout terminates it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, command: &CommandLine) -> std::io::Result<ExecOutput> {
        let mut process = Command::new(&command.program);
        process
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(cwd) = &command.cwd {
            process.current_dir(cwd);
        }

        let output = process.output().await?;
        Ok(ExecOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code().unwrap_or(-1),
        })
    }
}

fn quote_for_display(token: &str) -> String {
    if !token.is_empty() && token.chars().all(|ch| !ch.is_whitespace() && ch != '"' && ch != '\'' && ch != '\\') {
        return token.to_string();
    }
    format!("'{}'", token.replace('\'', "'\\''"))
}
