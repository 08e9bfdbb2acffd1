use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::notify::embed::FIELD_VALUE_MAX;
use crate::notify::Destination;

/// Maximum lengths applied to free-form text before it is wrapped in a code
/// block. Counted in characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldLimits {
    /// Payment transaction details and key delivery errors (default: 200).
    #[serde(default = "default_short_limit")]
    pub short: usize,
    /// GitHub sync errors (default: 300).
    #[serde(default = "default_medium_limit")]
    pub medium: usize,
    /// API errors, API error details and deployment logs (default: 500).
    #[serde(default = "default_long_limit")]
    pub long: usize,
}

fn default_short_limit() -> usize {
    200
}

fn default_medium_limit() -> usize {
    300
}

fn default_long_limit() -> usize {
    500
}

impl FieldLimits {
    /// Largest limit whose code block (three backticks on each side) still
    /// fits in one field value.
    pub const MAX: usize = FIELD_VALUE_MAX - 6;

    /// Rejects limits that are zero or that would push the closing fence
    /// past the field value limit.
    pub fn check(&self) -> Result<(), String> {
        for (name, value) in [
            ("short", self.short),
            ("medium", self.medium),
            ("long", self.long),
        ] {
            if value == 0 || value > Self::MAX {
                return Err(format!(
                    "limits.{} must be between 1 and {} (got {})",
                    name,
                    Self::MAX,
                    value
                ));
            }
        }
        Ok(())
    }
}

impl Default for FieldLimits {
    fn default() -> Self {
        Self {
            short: default_short_limit(),
            medium: default_medium_limit(),
            long: default_long_limit(),
        }
    }
}

/// Configuration for a [`Notifier`](crate::notify::Notifier).
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// Webhook that receives every event except auto-sync summaries.
    pub primary_url: Option<Url>,
    /// Webhook for auto-sync summaries. Falls back to `primary_url` when unset.
    pub sync_url: Option<Url>,
    /// Per-request timeout for webhook POSTs.
    pub timeout: Duration,
    pub limits: FieldLimits,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            primary_url: None,
            sync_url: None,
            timeout: Duration::from_secs(10),
            limits: FieldLimits::default(),
        }
    }
}

impl NotifierConfig {
    pub fn with_primary_url(mut self, url: Url) -> Self {
        self.primary_url = Some(url);
        self
    }

    pub fn with_sync_url(mut self, url: Url) -> Self {
        self.sync_url = Some(url);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_limits(mut self, limits: FieldLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Resolve the webhook URL for a destination.
    pub fn url_for(&self, destination: Destination) -> Option<&Url> {
        match destination {
            Destination::Primary => self.primary_url.as_ref(),
            Destination::Sync => self.sync_url.as_ref().or(self.primary_url.as_ref()),
        }
    }
}
