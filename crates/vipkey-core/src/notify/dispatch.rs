use std::time::Duration;

use chrono::Local;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::NotifierConfig;

use super::embed::{Embed, WebhookPayload};
use super::event::{Destination, Event};

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("no webhook URL configured for the {0} destination")]
    NoDestination(Destination),
    #[error("webhook responded with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("webhook did not respond within {0:?}")]
    Timeout(Duration),
    #[error("webhook request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("failed to serialize webhook payload: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Best-effort webhook sender.
///
/// Every message is a single POST with no retry. Failures are logged and
/// reported as `false`; they never reach the caller as errors.
#[derive(Debug, Clone)]
pub struct Notifier {
    client: Client,
    config: NotifierConfig,
}

impl Notifier {
    pub fn new(config: NotifierConfig) -> reqwest::Result<Self> {
        let client = Self::build_client(config.timeout)?;
        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: NotifierConfig, client: Client) -> Self {
        Self { client, config }
    }

    pub fn build_client(timeout: Duration) -> reqwest::Result<Client> {
        Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5))
            .user_agent(concat!("vipkey/", env!("CARGO_PKG_VERSION")))
            .build()
    }

    pub fn config(&self) -> &NotifierConfig {
        &self.config
    }

    /// Render `event` and send it to the destination its kind is routed to.
    pub async fn notify(&self, event: &Event) -> bool {
        let embed = event.render(&self.config.limits, Local::now().naive_local());
        debug!(kind = event.kind(), "Rendered notification");
        self.send(&embed, event.destination()).await
    }

    /// Send a prepared embed. Returns `true` iff the webhook answered 200 or 204.
    pub async fn send(&self, embed: &Embed, destination: Destination) -> bool {
        match self.deliver(embed, destination).await {
            Ok(()) => {
                info!(title = %embed.title, %destination, "Notification sent");
                true
            }
            Err(e) => {
                warn!(title = %embed.title, %destination, error = %e, "Notification delivery failed");
                false
            }
        }
    }

    pub async fn deliver(&self, embed: &Embed, destination: Destination) -> Result<(), DeliveryError> {
        let url = self
            .config
            .url_for(destination)
            .ok_or(DeliveryError::NoDestination(destination))?;

        let body = serde_json::to_vec(&WebhookPayload::new(embed))?;

        let resp = self
            .client
            .post(url.clone())
            .header("Content-Type", "application/json")
            .timeout(self.config.timeout)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DeliveryError::Timeout(self.config.timeout)
                } else {
                    DeliveryError::Transport(e)
                }
            })?;

        match resp.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(()),
            status => {
                let body = resp.text().await.unwrap_or_default();
                Err(DeliveryError::Rejected {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }
}
