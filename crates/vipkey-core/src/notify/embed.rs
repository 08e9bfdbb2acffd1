//! The chat message envelope and the JSON body POSTed to webhook endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Per-field value limit enforced by the webhook service.
pub const FIELD_VALUE_MAX: usize = 1024;

/// Embed colors, as 0xRRGGBB.
pub mod colors {
    pub const BLUE: u32 = 0x3498db;
    pub const GREEN: u32 = 0x2ecc71;
    pub const DARK_GREEN: u32 = 0x27ae60;
    pub const RED: u32 = 0xe74c3c;
    pub const ORANGE: u32 = 0xe67e22;
    pub const AMBER: u32 = 0xf39c12;
    pub const PURPLE: u32 = 0x9b59b6;
    pub const GOLD: u32 = 0xf1c40f;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    /// Values longer than [`FIELD_VALUE_MAX`] characters are cut at that length.
    pub fn new(name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        let mut value: String = value.into();
        let cut = value.char_indices().nth(FIELD_VALUE_MAX).map(|(idx, _)| idx);
        if let Some(idx) = cut {
            value.truncate(idx);
        }
        Self {
            name: name.into(),
            value,
            inline,
        }
    }

    pub fn inline(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, value, true)
    }

    pub fn block(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, value, false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Footer {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Thumbnail {
    pub url: String,
}

/// A single rendered chat message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub timestamp: DateTime<Utc>,
    pub fields: Vec<EmbedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<Footer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<Thumbnail>,
}

impl Embed {
    pub fn new(title: impl Into<String>, description: impl Into<String>, color: u32) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            color,
            timestamp: Utc::now(),
            fields: Vec::new(),
            footer: None,
            thumbnail: None,
        }
    }

    pub fn with_fields(mut self, fields: Vec<EmbedField>) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_field(mut self, field: EmbedField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_footer(mut self, text: impl Into<String>) -> Self {
        self.footer = Some(Footer { text: text.into() });
        self
    }

    pub fn with_thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail = Some(Thumbnail { url: url.into() });
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Value of the first field with the given name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}

/// The JSON body POSTed to a webhook.
#[derive(Debug, Serialize)]
pub struct WebhookPayload<'a> {
    pub embeds: [&'a Embed; 1],
}

impl<'a> WebhookPayload<'a> {
    pub fn new(embed: &'a Embed) -> Self {
        Self { embeds: [embed] }
    }
}
