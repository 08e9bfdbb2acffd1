//! Chat notifications for order, payment, delivery and sync events.
//!
//! An [`Event`] is rendered into an [`Embed`] by [`Event::render`], then a
//! [`Notifier`] POSTs it as `{"embeds": [...]}` to the webhook for the
//! event's [`Destination`].

mod dispatch;
pub mod embed;
mod event;
pub mod render;

pub use dispatch::{DeliveryError, Notifier};
pub use embed::{colors, Embed, EmbedField, WebhookPayload};
pub use event::{Destination, Event, Health, Outcome};
