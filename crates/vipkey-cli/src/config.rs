//! TOML configuration file schema, environment overrides and validation.
//!
//! Example config file:
//!
//! ```toml
//! [server]
//! listen = "0.0.0.0:8080"
//! log_format = "json"
//!
//! [webhook]
//! primary_url = "https://chat.example.com/api/webhooks/orders"
//! sync_url = "https://chat.example.com/api/webhooks/sync"
//! timeout_secs = 10
//!
//! [webhook.limits]
//! short = 200
//! medium = 300
//! long = 500
//!
//! [auth]
//! file = "auth_config.json"
//! ```
//!
//! `WEBHOOK_URL`, `WEBHOOK_SYNC_URL`, `AUTH_FILE` and `LISTEN_ADDR` override
//! the corresponding file values when set.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use vipkey_core::{FieldLimits, NotifierConfig};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub webhook: WebhookConfig,

    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,

    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            log_format: default_log_format(),
        }
    }
}

fn default_listen() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_log_format() -> String {
    "pretty".into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    #[serde(default)]
    pub primary_url: Option<String>,

    #[serde(default)]
    pub sync_url: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub limits: FieldLimits,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            primary_url: None,
            sync_url: None,
            timeout_secs: default_timeout_secs(),
            limits: FieldLimits::default(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_auth_file")]
    pub file: PathBuf,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            file: default_auth_file(),
        }
    }
}

fn default_auth_file() -> PathBuf {
    PathBuf::from("auth_config.json")
}

impl AppConfig {
    /// Read the optional config file, apply environment overrides, validate.
    pub fn load(path: Option<&Path>) -> Result<Self, String> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {}", path.display(), e))?;

        toml::from_str(&content)
            .map_err(|e| format!("Failed to parse config file {}: {}", path.display(), e))
    }

    /// Empty values are treated as unset.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), String> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("WEBHOOK_URL") {
            self.webhook.primary_url = Some(v);
        }
        if let Some(v) = get("WEBHOOK_SYNC_URL") {
            self.webhook.sync_url = Some(v);
        }
        if let Some(v) = get("AUTH_FILE") {
            self.auth.file = PathBuf::from(v);
        }
        if let Some(v) = get("LISTEN_ADDR") {
            self.server.listen = v
                .parse()
                .map_err(|e| format!("Invalid LISTEN_ADDR '{}': {}", v, e))?;
        }
        Ok(())
    }

    pub fn notifier_config(&self) -> Result<NotifierConfig, String> {
        let mut config = NotifierConfig::default()
            .with_timeout(Duration::from_secs(self.webhook.timeout_secs))
            .with_limits(self.webhook.limits);
        if let Some(ref url) = self.webhook.primary_url {
            config = config.with_primary_url(parse_webhook_url("primary_url", url)?);
        }
        if let Some(ref url) = self.webhook.sync_url {
            config = config.with_sync_url(parse_webhook_url("sync_url", url)?);
        }
        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        self.notifier_config()?;

        if self.webhook.timeout_secs == 0 {
            return Err("webhook.timeout_secs must be greater than 0".into());
        }

        self.webhook
            .limits
            .check()
            .map_err(|e| format!("Invalid webhook.{}", e))?;

        match self.server.log_format.as_str() {
            "pretty" | "json" => {}
            other => {
                return Err(format!(
                    "Invalid log_format '{}': must be 'pretty' or 'json'",
                    other
                ));
            }
        }

        Ok(())
    }
}

fn parse_webhook_url(name: &str, raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw).map_err(|e| format!("Invalid webhook {}: {}", name, e))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(format!("Webhook {} must use http or https", name));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn parse_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        config.validate().unwrap();
        assert_eq!(config.server.listen.port(), 8080);
        assert_eq!(config.server.log_format, "pretty");
        assert_eq!(config.webhook.timeout_secs, 10);
        assert_eq!(config.webhook.limits, FieldLimits::default());
        assert_eq!(config.auth.file, PathBuf::from("auth_config.json"));

        let notifier = config.notifier_config().unwrap();
        assert!(notifier.primary_url.is_none());
        assert!(notifier.sync_url.is_none());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[server]
listen = "127.0.0.1:9090"
log_format = "json"

[webhook]
primary_url = "https://chat.example.com/hooks/main"
sync_url = "https://chat.example.com/hooks/sync"
timeout_secs = 3

[webhook.limits]
short = 100

[auth]
file = "/etc/vipkey/auth.json"
"#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        config.validate().unwrap();

        assert_eq!(config.server.listen.port(), 9090);
        assert_eq!(config.server.log_format, "json");
        assert_eq!(config.auth.file, PathBuf::from("/etc/vipkey/auth.json"));

        let notifier = config.notifier_config().unwrap();
        assert_eq!(notifier.timeout, Duration::from_secs(3));
        assert_eq!(notifier.limits.short, 100);
        assert_eq!(notifier.limits.medium, 300);
        assert_eq!(
            notifier.primary_url.unwrap().as_str(),
            "https://chat.example.com/hooks/main"
        );
        assert_eq!(
            notifier.sync_url.unwrap().as_str(),
            "https://chat.example.com/hooks/sync"
        );
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config: AppConfig = toml::from_str(
            r#"
[webhook]
primary_url = "https://chat.example.com/hooks/file"
"#,
        )
        .unwrap();
        config
            .apply_env(env(&[
                ("WEBHOOK_URL", "https://chat.example.com/hooks/env"),
                ("WEBHOOK_SYNC_URL", "https://chat.example.com/hooks/env-sync"),
                ("AUTH_FILE", "/tmp/auth.json"),
                ("LISTEN_ADDR", "127.0.0.1:7000"),
            ]))
            .unwrap();
        config.validate().unwrap();

        assert_eq!(
            config.webhook.primary_url.as_deref(),
            Some("https://chat.example.com/hooks/env")
        );
        assert_eq!(
            config.webhook.sync_url.as_deref(),
            Some("https://chat.example.com/hooks/env-sync")
        );
        assert_eq!(config.auth.file, PathBuf::from("/tmp/auth.json"));
        assert_eq!(config.server.listen.port(), 7000);
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let mut config = AppConfig::default();
        config
            .apply_env(env(&[("WEBHOOK_URL", ""), ("AUTH_FILE", "  ")]))
            .unwrap();
        assert!(config.webhook.primary_url.is_none());
        assert_eq!(config.auth.file, PathBuf::from("auth_config.json"));
    }

    #[test]
    fn invalid_listen_addr_env_is_rejected() {
        let mut config = AppConfig::default();
        let err = config
            .apply_env(env(&[("LISTEN_ADDR", "not-an-addr")]))
            .unwrap_err();
        assert!(err.contains("Invalid LISTEN_ADDR"), "{}", err);
    }

    #[test]
    fn validate_rejects_invalid_webhook_url() {
        let config: AppConfig = toml::from_str(
            r#"
[webhook]
primary_url = "not-valid"
"#,
        )
        .unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.contains("Invalid webhook primary_url"), "{}", err);
    }

    #[test]
    fn validate_rejects_non_http_webhook_url() {
        let config: AppConfig = toml::from_str(
            r#"
[webhook]
sync_url = "ftp://chat.example.com/hooks"
"#,
        )
        .unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.contains("must use http or https"), "{}", err);
    }

    #[test]
    fn validate_rejects_zero_limits_and_timeout() {
        let config: AppConfig = toml::from_str(
            r#"
[webhook.limits]
long = 0
"#,
        )
        .unwrap();
        assert!(config.validate().unwrap_err().contains("limits"));

        let config: AppConfig = toml::from_str(
            r#"
[webhook]
timeout_secs = 0
"#,
        )
        .unwrap();
        assert!(config.validate().unwrap_err().contains("timeout_secs"));
    }

    #[test]
    fn validate_rejects_limit_that_overflows_field_value() {
        let config: AppConfig = toml::from_str(
            r#"
[webhook.limits]
long = 2000
"#,
        )
        .unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.contains("webhook.limits.long"), "{}", err);

        let config: AppConfig = toml::from_str(&format!(
            "[webhook.limits]\nlong = {}\n",
            FieldLimits::MAX
        ))
        .unwrap();
        config.validate().unwrap();
    }

    #[test]
    fn validate_rejects_invalid_log_format() {
        let config: AppConfig = toml::from_str(
            r#"
[server]
log_format = "xml"
"#,
        )
        .unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.contains("Invalid log_format"), "{}", err);
    }
}
