//! # Mock Ports
//!
//! Scripted stand-ins for the data service, chat host and clipboard, for
//! testing the pipeline and the ordering client without a network.
//!
//! Each call pops the next scripted response for that operation. A call with
//! nothing scripted panics, so an unscripted side effect fails the test. Every
//! call is recorded for later assertions.
//!
//! # Example
//! ```ignore
//! let data = MockDataService::new();
//! data.expect_append_order().return_ok(());
//!
//! let host = MockChatHost::in_client(true);
//! host.expect_send_messages().return_err(HostError::Call("offline".into()));
//!
//! // ... run a submission ...
//! data.verify(); // every scripted response was consumed
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::catalog::{MenuRow, SettingsRow};
use crate::clients::{ChatHost, Clipboard, DataService, DataServiceError, HostError};
use crate::composer::{FlexMessage, OrderLogRecord};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

struct Scripted<R> {
    delay: Option<Duration>,
    response: R,
}

type Queue<R> = Arc<Mutex<VecDeque<Scripted<R>>>>;

fn queue<R>() -> Queue<R> {
    Arc::new(Mutex::new(VecDeque::new()))
}

/// Builder for one scripted response.
pub struct ExpectationBuilder<T, E> {
    queue: Queue<Result<T, E>>,
    delay: Option<Duration>,
}

impl<T, E> ExpectationBuilder<T, E> {
    fn new(queue: Queue<Result<T, E>>) -> Self {
        Self { queue, delay: None }
    }

    /// Waits `delay` before answering. Use it to trip timeouts.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn return_ok(self, value: T) {
        self.push(Ok(value));
    }

    pub fn return_err(self, error: E) {
        self.push(Err(error));
    }

    fn push(self, response: Result<T, E>) {
        self.queue.lock().unwrap().push_back(Scripted {
            delay: self.delay,
            response,
        });
    }
}

async fn next<R>(queue: &Queue<R>, call: &str) -> R {
    let scripted = {
        let mut queue = queue.lock().unwrap();
        queue.pop_front()
    };
    let Some(scripted) = scripted else {
        panic!("Unexpected call to {call}: nothing scripted");
    };
    if let Some(delay) = scripted.delay {
        tokio::time::sleep(delay).await;
    }
    scripted.response
}

fn remaining<R>(queue: &Queue<R>) -> usize {
    queue.lock().unwrap().len()
}

fn log_call<T>(log: &Arc<Mutex<Vec<T>>>, value: T) {
    log.lock().unwrap().push(value);
}

// =============================================================================
// DATA SERVICE
// =============================================================================

#[derive(Clone)]
pub struct MockDataService {
    menu: Queue<Result<Vec<MenuRow>, DataServiceError>>,
    settings: Queue<Result<Vec<SettingsRow>, DataServiceError>>,
    appends: Queue<Result<(), DataServiceError>>,
    patches: Queue<Result<(), DataServiceError>>,
    appended: Arc<Mutex<Vec<OrderLogRecord>>>,
    patched: Arc<Mutex<Vec<(String, bool)>>>,
}

impl Default for MockDataService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDataService {
    pub fn new() -> Self {
        Self {
            menu: queue(),
            settings: queue(),
            appends: queue(),
            patches: queue(),
            appended: Arc::new(Mutex::new(Vec::new())),
            patched: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn expect_fetch_menu(&self) -> ExpectationBuilder<Vec<MenuRow>, DataServiceError> {
        ExpectationBuilder::new(self.menu.clone())
    }

    pub fn expect_fetch_settings(&self) -> ExpectationBuilder<Vec<SettingsRow>, DataServiceError> {
        ExpectationBuilder::new(self.settings.clone())
    }

    pub fn expect_append_order(&self) -> ExpectationBuilder<(), DataServiceError> {
        ExpectationBuilder::new(self.appends.clone())
    }

    pub fn expect_patch_open_status(&self) -> ExpectationBuilder<(), DataServiceError> {
        ExpectationBuilder::new(self.patches.clone())
    }

    /// Records passed to `append_order`, including failed attempts.
    pub fn appended(&self) -> Vec<OrderLogRecord> {
        self.appended.lock().unwrap().clone()
    }

    /// `(vendor_name, is_open)` pairs passed to `patch_open_status`.
    pub fn patched(&self) -> Vec<(String, bool)> {
        self.patched.lock().unwrap().clone()
    }

    /// Panics if any scripted response was not consumed.
    pub fn verify(&self) {
        let left = remaining(&self.menu)
            + remaining(&self.settings)
            + remaining(&self.appends)
            + remaining(&self.patches);
        if left != 0 {
            panic!("Not all data service expectations were met. {left} remaining");
        }
    }
}

#[async_trait]
impl DataService for MockDataService {
    async fn fetch_menu(&self) -> Result<Vec<MenuRow>, DataServiceError> {
        next(&self.menu, "fetch_menu").await
    }

    async fn fetch_settings(&self) -> Result<Vec<SettingsRow>, DataServiceError> {
        next(&self.settings, "fetch_settings").await
    }

    async fn append_order(&self, record: &OrderLogRecord) -> Result<(), DataServiceError> {
        log_call(&self.appended, record.clone());
        next(&self.appends, "append_order").await
    }

    async fn patch_open_status(
        &self,
        vendor_name: &str,
        is_open: bool,
    ) -> Result<(), DataServiceError> {
        log_call(&self.patched, (vendor_name.to_string(), is_open));
        next(&self.patches, "patch_open_status").await
    }
}

// =============================================================================
// CHAT HOST
// =============================================================================

#[derive(Clone)]
pub struct MockChatHost {
    in_client: bool,
    share_picker: bool,
    sends: Queue<Result<(), HostError>>,
    picks: Queue<Result<bool, HostError>>,
    closes: Queue<Result<(), HostError>>,
    opens: Queue<Result<(), HostError>>,
    sent: Arc<Mutex<Vec<FlexMessage>>>,
    opened: Arc<Mutex<Vec<String>>>,
}

impl MockChatHost {
    /// A host inside (or outside) the chat app, without the share picker.
    pub fn in_client(in_client: bool) -> Self {
        Self {
            in_client,
            share_picker: false,
            sends: queue(),
            picks: queue(),
            closes: queue(),
            opens: queue(),
            sent: Arc::new(Mutex::new(Vec::new())),
            opened: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_share_picker(mut self) -> Self {
        self.share_picker = true;
        self
    }

    pub fn expect_send_messages(&self) -> ExpectationBuilder<(), HostError> {
        ExpectationBuilder::new(self.sends.clone())
    }

    /// `return_ok(false)` scripts a dismissed picker.
    pub fn expect_share_target_picker(&self) -> ExpectationBuilder<bool, HostError> {
        ExpectationBuilder::new(self.picks.clone())
    }

    pub fn expect_close_view(&self) -> ExpectationBuilder<(), HostError> {
        ExpectationBuilder::new(self.closes.clone())
    }

    pub fn expect_open_url(&self) -> ExpectationBuilder<(), HostError> {
        ExpectationBuilder::new(self.opens.clone())
    }

    /// Messages handed to `send_messages` or `share_target_picker`.
    pub fn sent(&self) -> Vec<FlexMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn opened_urls(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }

    pub fn verify(&self) {
        let left = remaining(&self.sends)
            + remaining(&self.picks)
            + remaining(&self.closes)
            + remaining(&self.opens);
        if left != 0 {
            panic!("Not all chat host expectations were met. {left} remaining");
        }
    }
}

#[async_trait]
impl ChatHost for MockChatHost {
    fn is_in_client(&self) -> bool {
        self.in_client
    }

    async fn send_messages(&self, messages: &[FlexMessage]) -> Result<(), HostError> {
        self.sent.lock().unwrap().extend_from_slice(messages);
        next(&self.sends, "send_messages").await
    }

    fn share_picker_available(&self) -> bool {
        self.share_picker
    }

    async fn share_target_picker(&self, messages: &[FlexMessage]) -> Result<bool, HostError> {
        self.sent.lock().unwrap().extend_from_slice(messages);
        next(&self.picks, "share_target_picker").await
    }

    async fn close_view(&self) -> Result<(), HostError> {
        next(&self.closes, "close_view").await
    }

    async fn open_url(&self, url: &str) -> Result<(), HostError> {
        log_call(&self.opened, url.to_string());
        next(&self.opens, "open_url").await
    }
}

// =============================================================================
// CLIPBOARD
// =============================================================================

#[derive(Clone)]
pub struct MockClipboard {
    copies: Queue<Result<(), HostError>>,
    copied: Arc<Mutex<Vec<String>>>,
}

impl Default for MockClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl MockClipboard {
    pub fn new() -> Self {
        Self {
            copies: queue(),
            copied: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn expect_copy_text(&self) -> ExpectationBuilder<(), HostError> {
        ExpectationBuilder::new(self.copies.clone())
    }

    pub fn copied(&self) -> Vec<String> {
        self.copied.lock().unwrap().clone()
    }

    pub fn verify(&self) {
        let left = remaining(&self.copies);
        if left != 0 {
            panic!("Not all clipboard expectations were met. {left} remaining");
        }
    }
}

#[async_trait]
impl Clipboard for MockClipboard {
    async fn copy_text(&self, text: &str) -> Result<(), HostError> {
        log_call(&self.copied, text.to_string());
        next(&self.copies, "copy_text").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_responses_are_served_in_order() {
        let data = MockDataService::new();
        data.expect_patch_open_status().return_ok(());
        data.expect_patch_open_status()
            .return_err(DataServiceError::Unavailable("down".into()));

        assert!(data.patch_open_status("Shop", true).await.is_ok());
        assert!(data.patch_open_status("Shop", false).await.is_err());
        assert_eq!(
            data.patched(),
            vec![("Shop".to_string(), true), ("Shop".to_string(), false)]
        );
        data.verify();
    }

    #[tokio::test]
    #[should_panic(expected = "Unexpected call to copy_text")]
    async fn test_unscripted_call_panics() {
        let clipboard = MockClipboard::new();
        let _ = clipboard.copy_text("x").await;
    }

    #[tokio::test]
    #[should_panic(expected = "1 remaining")]
    async fn test_verify_reports_leftovers() {
        let host = MockChatHost::in_client(true);
        host.expect_close_view().return_ok(());
        host.verify();
    }
}
