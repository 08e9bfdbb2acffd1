#![forbid(unsafe_code)]

pub mod auth;
pub mod config;
pub mod notify;

pub use auth::{AuthConfig, AuthConfigError, AuthConfigSource, AuthConfigSummary};
pub use config::{FieldLimits, NotifierConfig};
pub use notify::{
    colors, DeliveryError, Destination, Embed, EmbedField, Event, Health, Notifier, Outcome,
    WebhookPayload,
};
