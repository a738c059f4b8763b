/// Captured result of one external command.
///
/// Values leaving the executor have already been redacted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,
    /// Process exit code, `-1` when the process was terminated by a signal.
    pub exit_code: i32,
}

impl ExecOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// How a tool's standard output is relayed to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Parse as JSON and pretty-print; fall back to the raw text.
    #[default]
    Json,
    /// Pass through untouched (CSV, JSON lines, log lines, tables).
    Raw,
}
