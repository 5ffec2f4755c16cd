//! # Submission Pipeline
//!
//! Takes a validated [`OrderRequest`] snapshot and gets it to the vendor:
//!
//! ```text
//! Validating → BuildingRepresentations → CopyingFallbackText → PersistingRecord
//!            → Dispatching → Delivered | DispatchFallback → Cleared | Retained
//! ```
//!
//! Validation and the final clear/retain happen in the session actor
//! ([`OrderingClient::submit`](crate::clients::OrderingClient::submit) brackets
//! [`SubmissionPipeline::run`]); everything in between runs here, strictly in
//! sequence, on the frozen snapshot.
//!
//! Persistence failure never aborts: the order still goes out and the user is
//! told a text fallback is in use. Dispatch walks the strategies in order and
//! stops at the first that delivers.

pub mod delivery;

pub use delivery::*;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use crate::clients::{bounded, ChatHost, Clipboard, DataService};
use crate::composer::compose;
use crate::config::AppConfig;
use crate::model::OrderRequest;
use crate::session_actor::{NetworkError, NetworkStep};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    Validating,
    BuildingRepresentations,
    CopyingFallbackText,
    PersistingRecord,
    Dispatching,
    /// Delivered through the chat host.
    Delivered,
    /// Deep link opened, or nothing delivered at all.
    DispatchFallback,
    Cleared,
    Retained,
}

/// One-time notices for the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAlert {
    PersistFailed,
    ManualSendRequired,
    DeliveryFailed,
}

impl fmt::Display for UserAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            UserAlert::PersistFailed => {
                "The order could not be saved. It will be sent as text instead."
            }
            UserAlert::ManualSendRequired => {
                "The chat opened with your order. Tap send to finish."
            }
            UserAlert::DeliveryFailed => "The order could not be sent. Please try again.",
        };
        f.write_str(text)
    }
}

/// What happened during one submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReport {
    pub phases: Vec<SubmissionPhase>,
    pub total: u32,
    pub persisted: bool,
    pub persist_error: Option<NetworkError>,
    pub delivered: Option<DeliveryChannel>,
    pub dispatch_errors: Vec<(DeliveryChannel, DeliveryError)>,
    pub alerts: Vec<UserAlert>,
    pub cart_cleared: bool,
}

impl SubmissionReport {
    fn new(total: u32) -> Self {
        Self {
            phases: vec![SubmissionPhase::Validating],
            total,
            persisted: false,
            persist_error: None,
            delivered: None,
            dispatch_errors: Vec::new(),
            alerts: Vec::new(),
            cart_cleared: false,
        }
    }

    pub(crate) fn enter(&mut self, phase: SubmissionPhase) {
        info!(?phase, "Submission phase");
        self.phases.push(phase);
    }

    /// The cart goes once the vendor has the order: either the log row was
    /// written, or a host channel delivered it.
    pub fn should_clear_cart(&self) -> bool {
        self.persisted || self.delivered.is_some_and(DeliveryChannel::via_host)
    }

    pub fn last_phase(&self) -> Option<SubmissionPhase> {
        self.phases.last().copied()
    }
}

pub struct SubmissionPipeline {
    data_service: Arc<dyn DataService>,
    clipboard: Arc<dyn Clipboard>,
    strategies: Vec<Box<dyn DeliveryStrategy>>,
    timeout: Duration,
}

impl SubmissionPipeline {
    /// Direct send, then share picker, then deep link.
    pub fn new(
        data_service: Arc<dyn DataService>,
        host: Arc<dyn ChatHost>,
        clipboard: Arc<dyn Clipboard>,
        config: &AppConfig,
    ) -> Self {
        let timeout = config.request_timeout();
        let strategies: Vec<Box<dyn DeliveryStrategy>> = vec![
            Box::new(DirectSend::new(host.clone(), timeout)),
            Box::new(SharePicker::new(host.clone(), timeout)),
            Box::new(DeepLink::new(host, config.deep_link_base.clone(), timeout)),
        ];
        Self::with_strategies(data_service, clipboard, strategies, timeout)
    }

    pub fn with_strategies(
        data_service: Arc<dyn DataService>,
        clipboard: Arc<dyn Clipboard>,
        strategies: Vec<Box<dyn DeliveryStrategy>>,
        timeout: Duration,
    ) -> Self {
        Self {
            data_service,
            clipboard,
            strategies,
            timeout,
        }
    }

    pub fn channels(&self) -> Vec<DeliveryChannel> {
        self.strategies.iter().map(|s| s.channel()).collect()
    }

    #[instrument(skip_all, fields(total = request.total(), lines = request.cart.len()))]
    pub async fn run(&self, request: &OrderRequest) -> SubmissionReport {
        let mut report = SubmissionReport::new(request.total());

        report.enter(SubmissionPhase::BuildingRepresentations);
        let composed = compose(request);
        debug!(text = %composed.plain_text, "Order composed");

        report.enter(SubmissionPhase::CopyingFallbackText);
        let copy = self.clipboard.copy_text(&composed.plain_text);
        match tokio::time::timeout(self.timeout, copy).await {
            Ok(Ok(())) => debug!("order text copied"),
            Ok(Err(e)) => debug!(error = %e, "clipboard copy failed"),
            Err(_) => debug!("clipboard copy timed out"),
        }

        report.enter(SubmissionPhase::PersistingRecord);
        let persist = self.data_service.append_order(&composed.log);
        match bounded(NetworkStep::Persist, self.timeout, persist).await {
            Ok(()) => report.persisted = true,
            Err(e) => {
                warn!(error = %e, "order log write failed, continuing with text fallback");
                report.alerts.push(UserAlert::PersistFailed);
                report.persist_error = Some(e);
            }
        }

        report.enter(SubmissionPhase::Dispatching);
        for strategy in &self.strategies {
            let channel = strategy.channel();
            match strategy.deliver(&composed).await {
                Ok(alert) => {
                    info!(?channel, "Order dispatched");
                    report.delivered = Some(channel);
                    report.alerts.extend(alert);
                    break;
                }
                Err(DeliveryError::Unavailable) => debug!(?channel, "channel skipped"),
                Err(e) => {
                    warn!(?channel, error = %e, "dispatch failed, trying next channel");
                    report.dispatch_errors.push((channel, e));
                }
            }
        }

        match report.delivered {
            Some(channel) if channel.via_host() => report.enter(SubmissionPhase::Delivered),
            Some(_) => report.enter(SubmissionPhase::DispatchFallback),
            None => {
                warn!("every dispatch channel failed");
                report.alerts.push(UserAlert::DeliveryFailed);
                report.enter(SubmissionPhase::DispatchFallback);
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_clears_when_persisted_or_delivered_in_app() {
        let cases = [
            (false, None, false),
            (false, Some(DeliveryChannel::DeepLink), false),
            (false, Some(DeliveryChannel::DirectSend), true),
            (false, Some(DeliveryChannel::SharePicker), true),
            (true, None, true),
            (true, Some(DeliveryChannel::DeepLink), true),
        ];
        for (persisted, delivered, expected) in cases {
            let report = SubmissionReport {
                persisted,
                delivered,
                ..SubmissionReport::new(100)
            };
            assert_eq!(report.should_clear_cart(), expected, "{persisted} {delivered:?}");
        }
    }

    #[test]
    fn test_alerts_render_for_customers() {
        assert!(!UserAlert::PersistFailed.to_string().is_empty());
        assert_ne!(
            UserAlert::ManualSendRequired.to_string(),
            UserAlert::DeliveryFailed.to_string()
        );
    }
}
