//! Process-wide credential store shared by the dispatcher and the executor.

use std::sync::{Arc, PoisonError, RwLock};

use coho_mcp_types::{Credentials, CredentialsUpdate};
use tracing::debug;

/// Environment variable holding the target project identifier.
pub const PROJECT_ENV: &str = "CODEHOOKS_PROJECT_NAME";
/// Environment variable holding the target space; defaults to `dev`.
pub const SPACE_ENV: &str = "CODEHOOKS_SPACE";
/// Environment variable holding the admin token.
pub const TOKEN_ENV: &str = "CODEHOOKS_ADMIN_TOKEN";

/// Cloneable handle to the current [`Credentials`].
///
/// Writes replace the whole value under the lock, so readers see either the
/// state before or after a configuration call. Concurrent configuration calls
/// resolve as last writer wins.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    inner: Arc<RwLock<Credentials>>,
}

impl CredentialStore {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            inner: Arc::new(RwLock::new(credentials)),
        }
    }

    /// Seed the store from the process environment.
    pub fn from_env() -> Self {
        let credentials = Credentials::new(
            std::env::var(PROJECT_ENV).ok(),
            std::env::var(SPACE_ENV).ok(),
            std::env::var(TOKEN_ENV).ok(),
        );
        debug!(
            project = ?credentials.project,
            space = %credentials.space,
            token_configured = credentials.has_token(),
            "loaded credentials from environment"
        );
        Self::new(credentials)
    }

    pub fn snapshot(&self) -> Credentials {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn token(&self) -> Option<String> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).token.clone()
    }

    /// Merge the provided fields and return the resulting snapshot.
    pub fn configure(&self, update: CredentialsUpdate) -> Credentials {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        guard.merge(update);
        guard.clone()
    }
}
