//! Read-only view of the authorization file used by the order service.
//!
//! The file is owned and written elsewhere; this module only loads it and
//! produces a summary that is safe to expose on a debug endpoint.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum AuthConfigError {
    #[error("failed to read auth config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse auth config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Contents of the authorization file.
#[derive(Clone, Default, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub owner_email: Option<String>,
    #[serde(default)]
    pub authorized_emails: BTreeSet<String>,
    /// Email -> password. Values are never exposed.
    #[serde(default)]
    pub password_access: BTreeMap<String, serde_json::Value>,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("owner_email", &self.owner_email)
            .field("authorized_emails", &self.authorized_emails)
            .field("password_access", &self.password_access.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Redacted projection of [`AuthConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthConfigSummary {
    pub owner_email: Option<String>,
    pub authorized_emails: BTreeSet<String>,
    pub has_password_access: bool,
    pub password_emails: Vec<String>,
    pub file_exists: bool,
    pub file_path: String,
}

impl AuthConfig {
    pub fn summarize(&self, path: &Path, file_exists: bool) -> AuthConfigSummary {
        AuthConfigSummary {
            owner_email: self.owner_email.clone(),
            authorized_emails: self.authorized_emails.clone(),
            has_password_access: !self.password_access.is_empty(),
            password_emails: self.password_access.keys().cloned().collect(),
            file_exists,
            file_path: path.display().to_string(),
        }
    }
}

/// Location of the authorization file. The file is re-read on every call.
#[derive(Debug, Clone)]
pub struct AuthConfigSource {
    path: PathBuf,
}

impl AuthConfigSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the file. A missing file is not an error and yields defaults.
    pub fn load(&self) -> Result<AuthConfig, AuthConfigError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(AuthConfig::default()),
            Err(e) => {
                return Err(AuthConfigError::Read {
                    path: self.path.display().to_string(),
                    source: e,
                })
            }
        };

        serde_json::from_str(&content).map_err(|e| AuthConfigError::Parse {
            path: self.path.display().to_string(),
            source: e,
        })
    }

    /// Summary for the debug endpoint. Load failures are logged and reported
    /// as an empty config.
    pub fn describe(&self) -> AuthConfigSummary {
        let file_exists = self.path.exists();
        let config = self.load().unwrap_or_else(|e| {
            warn!(error = %e, "Falling back to empty auth config");
            AuthConfig::default()
        });
        config.summarize(&self.path, file_exists)
    }
}
