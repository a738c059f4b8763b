use std::fmt;

/// Space used when neither the environment nor a configuration call names one.
pub const DEFAULT_SPACE: &str = "dev";

/// Target project, space and admin token used for every `coho` invocation.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Codehooks project identifier (for example `myproject-abcd`).
    pub project: Option<String>,
    /// Named sub-environment within the project.
    pub space: String,
    /// Admin token passed to the CLI as `--admintoken`.
    pub token: Option<String>,
}

/// Partial update merged into [`Credentials`] by the configuration tools.
///
/// Absent or blank fields leave the current value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialsUpdate {
    pub token: Option<String>,
    pub project: Option<String>,
    pub space: Option<String>,
}

impl Credentials {
    /// Build credentials, treating blank values as absent.
    pub fn new(project: Option<String>, space: Option<String>, token: Option<String>) -> Self {
        Self {
            project: non_blank(project),
            space: non_blank(space).unwrap_or_else(|| DEFAULT_SPACE.to_string()),
            token: non_blank(token),
        }
    }

    /// Merge the provided fields over the current values.
    pub fn merge(&mut self, update: CredentialsUpdate) {
        if let Some(token) = non_blank(update.token) {
            self.token = Some(token);
        }
        if let Some(project) = non_blank(update.project) {
            self.project = Some(project);
        }
        if let Some(space) = non_blank(update.space) {
            self.space = space;
        }
    }

    /// Names of the settings every non-configuration tool requires but are missing.
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.project.is_none() {
            missing.push("project");
        }
        if self.token.is_none() {
            missing.push("token");
        }
        missing
    }

    pub fn project(&self) -> &str {
        self.project.as_deref().unwrap_or_default()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self::new(None, None, None)
    }
}

// The token must never reach a log line through `{:?}`.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("project", &self.project)
            .field("space", &self.space)
            .field("token", &self.token.as_ref().map(|_| "<set>"))
            .finish()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}
