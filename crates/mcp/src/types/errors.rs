//! Error types for tool dispatch and command execution.

use std::path::PathBuf;

use coho_mcp_util::StagedPathError;
use thiserror::Error;

/// Failure of one external command.
///
/// Every field is redacted by the executor before the error is constructed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExecError {
    #[error("failed to start `{command}`: {reason}")]
    Spawn { command: String, reason: String },

    #[error("`{command}` timed out after {timeout_ms}ms")]
    TimedOut { command: String, timeout_ms: u64 },

    #[error("`{command}` exited with status {exit_code}")]
    Failed {
        command: String,
        exit_code: i32,
        stdout: String,
        stderr: String,
    },
}

impl ExecError {
    /// Echoed command line of the failed invocation.
    pub fn command(&self) -> &str {
        match self {
            ExecError::Spawn { command, .. } | ExecError::TimedOut { command, .. } | ExecError::Failed { command, .. } => command,
        }
    }

    /// Message plus any captured output, for error payloads and logs.
    pub fn details(&self) -> String {
        let mut details = self.to_string();
        if let ExecError::Failed { stdout, stderr, .. } = self {
            if !stderr.trim().is_empty() {
                details.push_str("\nstderr:\n");
                details.push_str(stderr.trim_end());
            }
            if !stdout.trim().is_empty() {
                details.push_str("\nstdout:\n");
                details.push_str(stdout.trim_end());
            }
        }
        details
    }
}

/// Failures while materializing caller content on disk.
#[derive(Debug, Error)]
pub enum StagingError {
    #[error(transparent)]
    InvalidPath(#[from] StagedPathError),

    #[error("failed to stage '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to render deployment manifest: {reason}")]
    Manifest { reason: String },

    #[error("command references a staged path but nothing was staged")]
    NothingStaged,
}

impl StagingError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

/// Schema validation failure for a tool's parameter object.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field '{field}'")]
    Missing { field: String },

    #[error("field '{field}' must be a {expected}")]
    WrongType { field: String, expected: &'static str },

    #[error("field '{field}' {reason}")]
    Invalid { field: String, reason: String },
}

impl ValidationError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::Missing { field: field.into() }
    }

    pub fn wrong_type(field: impl Into<String>, expected: &'static str) -> Self {
        Self::WrongType {
            field: field.into(),
            expected,
        }
    }

    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Outcome of a failed tool call.
///
/// [`DispatchError::is_transport_fault`] separates protocol-level faults from
/// failures reported to the caller as error-flagged tool results.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(
        "missing configuration: {}. Call `configure` or set CODEHOOKS_PROJECT_NAME and CODEHOOKS_ADMIN_TOKEN",
        .missing.join(", ")
    )]
    MissingConfiguration { missing: Vec<&'static str> },

    #[error("unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("invalid arguments for {tool}: {source}")]
    InvalidArguments {
        tool: String,
        #[source]
        source: ValidationError,
    },

    #[error("{tool} failed: {source}")]
    CommandFailed {
        tool: String,
        #[source]
        source: ExecError,
        /// Staging directory left on disk for inspection (deploy only).
        preserved: Option<PathBuf>,
    },

    #[error("{tool} could not stage its input: {source}")]
    StagingFailed {
        tool: String,
        #[source]
        source: StagingError,
    },
}

impl DispatchError {
    /// Whether the failure aborts the request at the protocol level.
    pub fn is_transport_fault(&self) -> bool {
        matches!(self, DispatchError::MissingConfiguration { .. } | DispatchError::UnknownTool { .. })
    }

    /// Caller-facing text for error-flagged tool results.
    pub fn details(&self) -> String {
        match self {
            DispatchError::CommandFailed { tool, source, preserved } => {
                let mut details = format!("{tool} failed: {}", source.details());
                if let Some(path) = preserved {
                    details.push_str(&format!("\nStaging directory preserved for inspection at {}", path.display()));
                }
                details
            }
            other => other.to_string(),
        }
    }
}
