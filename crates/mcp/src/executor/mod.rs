//! Command executor: the single place where the admin token enters an
//! argument vector and the single place where it is redacted again.

mod runner;

pub use runner::{CommandLine, CommandRunner, ProcessRunner};

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use coho_mcp_types::ExecOutput;
use coho_mcp_util::redact_secret;
use tracing::debug;

use crate::config::ServerSettings;
use crate::credentials::CredentialStore;
use crate::types::ExecError;

/// Flag carrying the admin token on authenticated invocations.
pub const TOKEN_FLAG: &str = "--admintoken";

/// Which executable an [`Invocation`] targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Program {
    /// The configured Codehooks CLI.
    Cli,
    /// Any other executable, such as the package manager.
    External(String),
}

/// One external command requested by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: Program,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    /// Append the admin token as the trailing argument pair.
    pub authenticate: bool,
}

impl Invocation {
    /// Authenticated invocation of the Codehooks CLI.
    pub fn cli(args: Vec<String>) -> Self {
        Self {
            program: Program::Cli,
            args,
            cwd: None,
            authenticate: true,
        }
    }

    /// Unauthenticated invocation of another program.
    pub fn external(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: Program::External(program.into()),
            args,
            cwd: None,
            authenticate: false,
        }
    }

    pub fn in_dir(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }
}

/// Runs invocations with a timeout and redacts the current token from
/// everything it returns.
#[derive(Clone)]
pub struct CommandExecutor {
    runner: Arc<dyn CommandRunner>,
    credentials: CredentialStore,
    cli_program: String,
    timeout: Duration,
}

impl std::fmt::Debug for CommandExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandExecutor")
            .field("cli_program", &self.cli_program)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl CommandExecutor {
    pub fn new(runner: Arc<dyn CommandRunner>, credentials: CredentialStore, settings: &ServerSettings) -> Self {
        Self {
            runner,
            credentials,
            cli_program: settings.cli_program.clone(),
            timeout: settings.timeout,
        }
    }

    /// Run one invocation.
    ///
    /// A non-zero exit status, a spawn failure and a timeout are all errors.
    /// Output and error fields never contain the token used for the call.
    pub async fn run(&self, invocation: Invocation) -> Result<ExecOutput, ExecError> {
        let token = self.credentials.token();
        let secret = token.as_deref();
        let command = self.resolve(invocation, secret);
        let shown = command.redacted_display(secret);
        debug!(command = %shown, cwd = ?command.cwd, "running external command");

        let output = match tokio::time::timeout(self.timeout, self.runner.run(&command)).await {
            Err(_elapsed) => {
                return Err(ExecError::TimedOut {
                    command: shown,
                    timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                });
            }
            Ok(Err(error)) => {
                return Err(ExecError::Spawn {
                    command: shown,
                    reason: redact_secret(&error.to_string(), secret),
                });
            }
            Ok(Ok(output)) => output,
        };

        let output = ExecOutput {
            stdout: redact_secret(&output.stdout, secret),
            stderr: redact_secret(&output.stderr, secret),
            exit_code: output.exit_code,
        };
        debug!(command = %shown, exit_code = output.exit_code, "external command finished");

        if output.success() {
            Ok(output)
        } else {
            Err(ExecError::Failed {
                command: shown,
                exit_code: output.exit_code,
                stdout: output.stdout,
                stderr: output.stderr,
            })
        }
    }

    fn resolve(&self, invocation: Invocation, secret: Option<&str>) -> CommandLine {
        let program = match invocation.program {
            Program::Cli => self.cli_program.clone(),
            Program::External(program) => program,
        };
        let mut args = invocation.args;
        if invocation.authenticate
            && let Some(token) = secret
        {
            args.push(TOKEN_FLAG.to_string());
            args.push(token.to_string());
        }
        CommandLine {
            program,
            args,
            cwd: invocation.cwd,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use coho_mcp_types::{Credentials, CredentialsUpdate};
    use std::sync::Mutex;

    /// Echoes the full command line to stderr and fails.
    #[derive(Default)]
    struct EchoingFailure {
        seen: Mutex<Vec<CommandLine>>,
    }

    #[async_trait]
    impl CommandRunner for EchoingFailure {
        async fn run(&self, command: &CommandLine) -> std::io::Result<ExecOutput> {
            self.seen.lock().unwrap().push(command.clone());
            Ok(ExecOutput {
                stdout: format!("tried {}", command.args.join(" ")),
                stderr: format!("invalid token {}", command.args.last().cloned().unwrap_or_default()),
                exit_code: 1,
            })
        }
    }

    struct Sleeper;

    #[async_trait]
    impl CommandRunner for Sleeper {
        async fn run(&self, _command: &CommandLine) -> std::io::Result<ExecOutput> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(ExecOutput::default())
        }
    }

    struct Unspawnable;

    #[async_trait]
    impl CommandRunner for Unspawnable {
        async fn run(&self, command: &CommandLine) -> std::io::Result<ExecOutput> {
            Err(std::io::Error::other(format!("cannot exec with {}", command.args.join(" "))))
        }
    }

    fn store() -> CredentialStore {
        CredentialStore::new(Credentials::new(Some("proj1".into()), None, Some("tkn_$ecret!".into())))
    }

    #[tokio::test]
    async fn appends_token_once_and_redacts_every_error_field() {
        let runner = Arc::new(EchoingFailure::default());
        let executor = CommandExecutor::new(runner.clone(), store(), &ServerSettings::default());

        let error = executor
            .run(Invocation::cli(vec!["query".into(), "users".into()]))
            .await
            .expect_err("runner fails");

        let seen = runner.seen.lock().unwrap();
        let args = &seen[0].args;
        assert_eq!(seen[0].program, "coho");
        assert_eq!(args.iter().filter(|arg| *arg == TOKEN_FLAG).count(), 1);
        assert_eq!(args.last().map(String::as_str), Some("tkn_$ecret!"));

        let ExecError::Failed {
            command, stdout, stderr, ..
        } = &error
        else {
            panic!("expected Failed, got {error:?}");
        };
        for field in [command, stdout, stderr] {
            assert!(!field.contains("tkn_$ecret!"), "{field}");
            assert!(field.contains("[REDACTED]"), "{field}");
        }
        assert!(!error.details().contains("tkn_$ecret!"));
    }

    #[tokio::test]
    async fn quoted_tokens_are_masked_in_the_command_field() {
        let credentials = CredentialStore::new(Credentials::new(Some("proj1".into()), None, Some("tkn'quoted".into())));
        let executor = CommandExecutor::new(Arc::new(EchoingFailure::default()), credentials, &ServerSettings::default());
        let error = executor.run(Invocation::cli(vec!["info".into()])).await.unwrap_err();
        let command = error.command();
        assert!(!command.contains("tkn"), "{command}");
        assert!(!command.contains("quoted"), "{command}");
        assert!(command.ends_with("--admintoken [REDACTED]"), "{command}");
    }

    #[tokio::test]
    async fn external_programs_do_not_receive_the_token() {
        let runner = Arc::new(EchoingFailure::default());
        let executor = CommandExecutor::new(runner.clone(), store(), &ServerSettings::default());
        let _ = executor
            .run(Invocation::external("npm", vec!["install".into()]).in_dir("/tmp"))
            .await;
        let seen = runner.seen.lock().unwrap();
        assert_eq!(seen[0].program, "npm");
        assert_eq!(seen[0].args, vec!["install".to_string()]);
        assert_eq!(seen[0].cwd, Some(PathBuf::from("/tmp")));
    }

    #[tokio::test]
    async fn redacts_the_token_current_at_call_time() {
        let credentials = store();
        let runner = Arc::new(EchoingFailure::default());
        let executor = CommandExecutor::new(runner, credentials.clone(), &ServerSettings::default());
        credentials.configure(CredentialsUpdate {
            token: Some("rotated-token".into()),
            ..Default::default()
        });
        let error = executor.run(Invocation::cli(vec!["info".into()])).await.unwrap_err();
        assert!(!error.details().contains("rotated-token"));
    }

    #[tokio::test]
    async fn timeout_surfaces_as_timed_out() {
        let settings = ServerSettings::default().with_timeout(Duration::from_millis(20));
        let executor = CommandExecutor::new(Arc::new(Sleeper), store(), &settings);
        let error = executor.run(Invocation::cli(vec!["log".into()])).await.unwrap_err();
        assert!(matches!(error, ExecError::TimedOut { timeout_ms: 20, .. }), "{error:?}");
        assert!(!error.command().contains("tkn_$ecret!"));
    }

    #[tokio::test]
    async fn spawn_failures_are_redacted() {
        let executor = CommandExecutor::new(Arc::new(Unspawnable), store(), &ServerSettings::default());
        let error = executor.run(Invocation::cli(vec!["info".into()])).await.unwrap_err();
        let ExecError::Spawn { reason, .. } = &error else {
            panic!("expected Spawn, got {error:?}");
        };
        assert!(!reason.contains("tkn_$ecret!"));
        assert!(reason.contains("[REDACTED]"));
    }
}
