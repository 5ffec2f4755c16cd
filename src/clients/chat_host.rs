//! Bridges to the embedding chat application and the system clipboard.

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::composer::FlexMessage;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HostError {
    #[error("not running inside the chat app")]
    NotInClient,

    #[error("host capability unavailable: {0}")]
    Unsupported(&'static str),

    #[error("host call failed: {0}")]
    Call(String),
}

/// What the ordering client may ask of its host application.
#[async_trait]
pub trait ChatHost: Send + Sync {
    /// Whether the session runs inside the chat app (vs. a plain browser).
    fn is_in_client(&self) -> bool;

    /// Sends messages into the chat the app was opened from.
    async fn send_messages(&self, messages: &[FlexMessage]) -> Result<(), HostError>;

    fn share_picker_available(&self) -> bool;

    /// Lets the user pick a recipient. `Ok(false)` means the picker was dismissed.
    async fn share_target_picker(&self, messages: &[FlexMessage]) -> Result<bool, HostError>;

    async fn close_view(&self) -> Result<(), HostError>;

    async fn open_url(&self, url: &str) -> Result<(), HostError>;
}

#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn copy_text(&self, text: &str) -> Result<(), HostError>;
}

/// A host for running outside any chat app: only URLs can be "opened", and they
/// are logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedHost;

#[async_trait]
impl ChatHost for DetachedHost {
    fn is_in_client(&self) -> bool {
        false
    }

    async fn send_messages(&self, _messages: &[FlexMessage]) -> Result<(), HostError> {
        Err(HostError::NotInClient)
    }

    fn share_picker_available(&self) -> bool {
        false
    }

    async fn share_target_picker(&self, _messages: &[FlexMessage]) -> Result<bool, HostError> {
        Err(HostError::NotInClient)
    }

    async fn close_view(&self) -> Result<(), HostError> {
        Ok(())
    }

    async fn open_url(&self, url: &str) -> Result<(), HostError> {
        info!(%url, "Open in chat app");
        Ok(())
    }
}

/// Clipboard that refuses every copy.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoClipboard;

#[async_trait]
impl Clipboard for NoClipboard {
    async fn copy_text(&self, _text: &str) -> Result<(), HostError> {
        Err(HostError::Unsupported("clipboard"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_detached_host_only_opens_urls() {
        let host = DetachedHost;
        assert!(!host.is_in_client());
        assert!(!host.share_picker_available());
        assert_eq!(host.send_messages(&[]).await, Err(HostError::NotInClient));
        assert!(host.open_url("https://example.test").await.is_ok());
        assert_eq!(
            NoClipboard.copy_text("x").await,
            Err(HostError::Unsupported("clipboard"))
        );
    }
}
