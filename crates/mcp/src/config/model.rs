//! Data model for server settings.

use std::path::PathBuf;
use std::time::Duration;

/// Executable name of the Codehooks CLI.
pub const DEFAULT_CLI_PROGRAM: &str = "coho";
/// Package manager used to install deployment dependencies.
pub const DEFAULT_NPM_PROGRAM: &str = "npm";
/// Upper bound for a single external command.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// How the server invokes external programs and stages files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    /// Program run for every Codehooks tool.
    pub cli_program: String,
    /// Program run to resolve deployment dependencies.
    pub npm_program: String,
    /// Directory under which per-invocation staging resources are created.
    pub scratch_dir: PathBuf,
    /// Timeout applied to each external command.
    pub timeout: Duration,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            cli_program: DEFAULT_CLI_PROGRAM.to_string(),
            npm_program: DEFAULT_NPM_PROGRAM.to_string(),
            scratch_dir: std::env::temp_dir().join("coho-mcp"),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ServerSettings {
    pub fn with_cli_program(mut self, program: impl Into<String>) -> Self {
        self.cli_program = program.into();
        self
    }

    pub fn with_npm_program(mut self, program: impl Into<String>) -> Self {
        self.npm_program = program.into();
        self
    }

    pub fn with_scratch_dir(mut self, scratch_dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = scratch_dir.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_coho_with_two_minute_timeout() {
        let settings = ServerSettings::default();
        assert_eq!(settings.cli_program, "coho");
        assert_eq!(settings.npm_program, "npm");
        assert_eq!(settings.timeout, Duration::from_secs(120));
        assert!(settings.scratch_dir.ends_with("coho-mcp"));
    }
}
