//! Dispatch channels, tried in order until one delivers.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::clients::{bounded, encode_component, ChatHost};
use crate::composer::ComposedOrder;
use crate::session_actor::{NetworkError, NetworkStep};

use super::UserAlert;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryChannel {
    DirectSend,
    SharePicker,
    DeepLink,
}

impl DeliveryChannel {
    /// Delivered inside the chat app, i.e. the vendor already has the message.
    pub fn via_host(self) -> bool {
        matches!(self, DeliveryChannel::DirectSend | DeliveryChannel::SharePicker)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeliveryError {
    /// The channel does not apply in this environment; skipped, not failed.
    #[error("channel not available")]
    Unavailable,

    #[error("share picker was dismissed")]
    Cancelled,

    #[error(transparent)]
    Network(#[from] NetworkError),
}

#[async_trait]
pub trait DeliveryStrategy: Send + Sync {
    fn channel(&self) -> DeliveryChannel;

    /// Delivers `order`. A returned alert is shown to the user once.
    async fn deliver(&self, order: &ComposedOrder) -> Result<Option<UserAlert>, DeliveryError>;
}

/// Sends the rich message into the chat the app was opened from.
pub struct DirectSend {
    host: Arc<dyn ChatHost>,
    timeout: Duration,
}

impl DirectSend {
    pub fn new(host: Arc<dyn ChatHost>, timeout: Duration) -> Self {
        Self { host, timeout }
    }
}

#[async_trait]
impl DeliveryStrategy for DirectSend {
    fn channel(&self) -> DeliveryChannel {
        DeliveryChannel::DirectSend
    }

    async fn deliver(&self, order: &ComposedOrder) -> Result<Option<UserAlert>, DeliveryError> {
        if !self.host.is_in_client() {
            return Err(DeliveryError::Unavailable);
        }
        let messages = std::slice::from_ref(&order.message);
        bounded(NetworkStep::Dispatch, self.timeout, self.host.send_messages(messages)).await?;
        close_view(self.host.as_ref(), self.timeout).await;
        Ok(None)
    }
}

/// Lets the user pick the recipient chat.
pub struct SharePicker {
    host: Arc<dyn ChatHost>,
    timeout: Duration,
}

impl SharePicker {
    pub fn new(host: Arc<dyn ChatHost>, timeout: Duration) -> Self {
        Self { host, timeout }
    }
}

#[async_trait]
impl DeliveryStrategy for SharePicker {
    fn channel(&self) -> DeliveryChannel {
        DeliveryChannel::SharePicker
    }

    async fn deliver(&self, order: &ComposedOrder) -> Result<Option<UserAlert>, DeliveryError> {
        if !self.host.is_in_client() || !self.host.share_picker_available() {
            return Err(DeliveryError::Unavailable);
        }
        let messages = std::slice::from_ref(&order.message);
        let picked = bounded(
            NetworkStep::Dispatch,
            self.timeout,
            self.host.share_target_picker(messages),
        )
        .await?;
        if !picked {
            return Err(DeliveryError::Cancelled);
        }
        close_view(self.host.as_ref(), self.timeout).await;
        Ok(None)
    }
}

/// Opens the chat app with the plain-text summary prefilled. Works everywhere,
/// but the user still has to tap send.
pub struct DeepLink {
    host: Arc<dyn ChatHost>,
    base: String,
    timeout: Duration,
}

impl DeepLink {
    pub fn new(host: Arc<dyn ChatHost>, base: impl Into<String>, timeout: Duration) -> Self {
        Self {
            host,
            base: base.into(),
            timeout,
        }
    }

    pub fn url_for(&self, text: &str) -> String {
        deep_link_url(&self.base, text)
    }
}

#[async_trait]
impl DeliveryStrategy for DeepLink {
    fn channel(&self) -> DeliveryChannel {
        DeliveryChannel::DeepLink
    }

    async fn deliver(&self, order: &ComposedOrder) -> Result<Option<UserAlert>, DeliveryError> {
        let url = self.url_for(&order.plain_text);
        bounded(NetworkStep::Dispatch, self.timeout, self.host.open_url(&url)).await?;
        Ok(Some(UserAlert::ManualSendRequired))
    }
}

pub fn deep_link_url(base: &str, text: &str) -> String {
    format!("{base}{}", encode_component(text))
}

/// The order is already out; a view that refuses to close is not a failure.
async fn close_view(host: &dyn ChatHost, timeout: Duration) {
    if let Err(e) = bounded(NetworkStep::Dispatch, timeout, host.close_view()).await {
        debug!(error = %e, "close view failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deep_link_encodes_text_as_uri_component() {
        let url = deep_link_url("https://line.me/R/msg/text/?", "Set A x2 (main:Rice / soup:Soup)\n$220");
        assert_eq!(
            url,
            "https://line.me/R/msg/text/?Set%20A%20x2%20(main%3ARice%20%2F%20soup%3ASoup)%0A%24220"
        );
    }

    #[test]
    fn test_deep_link_encodes_utf8() {
        let url = deep_link_url("base?", "飯 🍱");
        assert_eq!(url, "base?%E9%A3%AF%20%F0%9F%8D%B1");
    }

    #[test]
    fn test_host_channels() {
        assert!(DeliveryChannel::DirectSend.via_host());
        assert!(DeliveryChannel::SharePicker.via_host());
        assert!(!DeliveryChannel::DeepLink.via_host());
    }
}
