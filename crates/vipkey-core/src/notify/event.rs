use std::fmt;

use serde::{Deserialize, Serialize};

/// Which webhook a message is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    Primary,
    Sync,
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Sync => write!(f, "sync"),
        }
    }
}

/// Result of an operation reported by an event. A failure carries the error
/// text (or deployment logs) to show in the message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Failure(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Health level reported by [`Event::SystemStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum Health {
    Healthy,
    Warning,
    Critical,
}

impl Health {
    /// Anything other than `healthy` or `warning` is treated as critical.
    pub fn parse(s: &str) -> Self {
        match s {
            "healthy" => Self::Healthy,
            "warning" => Self::Warning,
            _ => Self::Critical,
        }
    }
}

impl From<String> for Health {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

/// A business event that is reported to the team chat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Event {
    OrderCreated {
        uid: String,
        /// Preformatted creation time. Defaults to the render time.
        #[serde(default)]
        timestamp: Option<String>,
    },
    PaymentConfirmed {
        uid: String,
        amount: u64,
        period: String,
        #[serde(default)]
        promo_code: Option<String>,
        #[serde(default)]
        tx_details: Option<String>,
    },
    KeySent {
        uid: String,
        email: String,
        key: String,
        period: String,
        outcome: Outcome,
    },
    ApiError {
        api_name: String,
        error: String,
        #[serde(default)]
        details: Option<String>,
    },
    GithubSync {
        action: String,
        file_path: String,
        outcome: Outcome,
    },
    DeploymentStatus {
        outcome: Outcome,
        #[serde(default)]
        version: Option<String>,
    },
    SystemStatus {
        health: Health,
        #[serde(default)]
        metrics: serde_json::Map<String, serde_json::Value>,
    },
    CouponUsed {
        code: String,
        uid: String,
        discount: u32,
        period: String,
    },
    AutoSyncSummary {
        sync_types: Vec<String>,
        #[serde(default)]
        success_count: u32,
        #[serde(default)]
        failed_count: u32,
        #[serde(default = "default_interval_minutes")]
        interval_minutes: u32,
    },
}

fn default_interval_minutes() -> u32 {
    5
}

impl Event {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::OrderCreated { .. } => "order_created",
            Self::PaymentConfirmed { .. } => "payment_confirmed",
            Self::KeySent { .. } => "key_sent",
            Self::ApiError { .. } => "api_error",
            Self::GithubSync { .. } => "github_sync",
            Self::DeploymentStatus { .. } => "deployment_status",
            Self::SystemStatus { .. } => "system_status",
            Self::CouponUsed { .. } => "coupon_used",
            Self::AutoSyncSummary { .. } => "auto_sync_summary",
        }
    }

    pub fn destination(&self) -> Destination {
        match self {
            Self::AutoSyncSummary { .. } => Destination::Sync,
            _ => Destination::Primary,
        }
    }
}
