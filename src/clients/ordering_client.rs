//! # Ordering Client
//!
//! High-level API for one ordering session. It wraps the session actor's
//! [`SessionClient`] and owns the ports, so network work happens here, outside
//! the actor loop, between two transitions:
//!
//! - submission: `BeginSubmission` → [`SubmissionPipeline::run`] → `FinishSubmission`
//! - admin toggle: `AuthorizeStatusChange` → remote patch → `ApplyOpenStatus`

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use chrono_tz::Tz;
use tracing::{debug, info, instrument, warn, Instrument, Span};

use crate::catalog::Catalog;
use crate::configurator::{ItemSelection, SpiceLevel};
use crate::framework::{FrameworkError, SessionClient};
use crate::model::{CartLine, PickupDetails, RemoveOutcome, ShopStatus};
use crate::session_actor::{
    AdminGate, NetworkStep, OrderError, Password, SessionAction, SessionOutcome, SessionState,
};
use crate::submission::{SubmissionPhase, SubmissionPipeline, SubmissionReport};

use super::{bounded, load_catalog, DataService};

/// Cloneable handle to a running ordering session.
#[derive(Clone)]
pub struct OrderingClient {
    inner: SessionClient<SessionState>,
    pipeline: Arc<SubmissionPipeline>,
    data_service: Arc<dyn DataService>,
    timezone: Tz,
    timeout: Duration,
}

fn unexpected(expected: &'static str, outcome: SessionOutcome) -> OrderError {
    warn!(expected, ?outcome, "Unexpected session outcome");
    FrameworkError::UnexpectedOutcome(expected).into()
}

impl OrderingClient {
    pub fn new(
        inner: SessionClient<SessionState>,
        pipeline: SubmissionPipeline,
        data_service: Arc<dyn DataService>,
        timezone: Tz,
        timeout: Duration,
    ) -> Self {
        Self {
            inner,
            pipeline: Arc::new(pipeline),
            data_service,
            timezone,
            timeout,
        }
    }

    /// Copy of the whole session state.
    pub async fn snapshot(&self) -> Result<SessionState, OrderError> {
        Ok(self.inner.snapshot().await?)
    }

    async fn draft(&self, action: SessionAction) -> Result<ItemSelection, OrderError> {
        match self.inner.apply(action).await? {
            SessionOutcome::Draft(draft) => Ok(draft),
            other => Err(unexpected("Draft", other)),
        }
    }

    // -------------------------------------------------------------------------
    // Item configurator
    // -------------------------------------------------------------------------

    #[instrument(skip(self))]
    pub async fn open_item(&self, id: &str) -> Result<ItemSelection, OrderError> {
        debug!("Opening item");
        self.draft(SessionAction::OpenItem(id.to_string())).await
    }

    #[instrument(skip(self))]
    pub async fn set_main(&self, main: &str) -> Result<ItemSelection, OrderError> {
        self.draft(SessionAction::SetMain(main.to_string())).await
    }

    #[instrument(skip(self))]
    pub async fn set_soup(&self, soup: &str) -> Result<ItemSelection, OrderError> {
        self.draft(SessionAction::SetSoup(soup.to_string())).await
    }

    #[instrument(skip(self))]
    pub async fn set_spice(&self, spice: SpiceLevel) -> Result<ItemSelection, OrderError> {
        self.draft(SessionAction::SetSpice(spice)).await
    }

    /// Returns whether `label` is selected after the toggle.
    #[instrument(skip(self))]
    pub async fn toggle_addon(&self, label: &str) -> Result<bool, OrderError> {
        match self
            .inner
            .apply(SessionAction::ToggleAddon(label.to_string()))
            .await?
        {
            SessionOutcome::AddonToggled { selected, .. } => Ok(selected),
            other => Err(unexpected("AddonToggled", other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn set_quantity(&self, quantity: u32) -> Result<ItemSelection, OrderError> {
        self.draft(SessionAction::SetQuantity(quantity)).await
    }

    pub async fn increment_quantity(&self) -> Result<ItemSelection, OrderError> {
        self.draft(SessionAction::IncrementQuantity).await
    }

    pub async fn decrement_quantity(&self) -> Result<ItemSelection, OrderError> {
        self.draft(SessionAction::DecrementQuantity).await
    }

    #[instrument(skip(self, note))]
    pub async fn set_item_note(&self, note: &str) -> Result<ItemSelection, OrderError> {
        self.draft(SessionAction::SetItemNote(note.to_string())).await
    }

    /// Commits the open draft to the cart.
    #[instrument(skip(self))]
    pub async fn commit_item(&self) -> Result<CartLine, OrderError> {
        match self.inner.apply(SessionAction::CommitItem).await? {
            SessionOutcome::Committed { line, total } => {
                info!(item = line.name(), price = line.display_price(), total, "Added to cart");
                Ok(line)
            }
            other => Err(unexpected("Committed", other)),
        }
    }

    pub async fn cancel_item(&self) -> Result<(), OrderError> {
        match self.inner.apply(SessionAction::CancelItem).await? {
            SessionOutcome::Cancelled => Ok(()),
            other => Err(unexpected("Cancelled", other)),
        }
    }

    // -------------------------------------------------------------------------
    // Cart & checkout
    // -------------------------------------------------------------------------

    #[instrument(skip(self))]
    pub async fn remove_line(&self, index: usize) -> Result<RemoveOutcome, OrderError> {
        match self.inner.apply(SessionAction::RemoveLine(index)).await? {
            SessionOutcome::Removed {
                removed,
                event,
                total,
            } => {
                debug!(?event, total, "Line removed");
                Ok(RemoveOutcome { removed, event })
            }
            other => Err(unexpected("Removed", other)),
        }
    }

    pub async fn open_checkout(&self) -> Result<(), OrderError> {
        self.checkout(SessionAction::OpenCheckout).await
    }

    pub async fn close_checkout(&self) -> Result<(), OrderError> {
        self.checkout(SessionAction::CloseCheckout).await
    }

    async fn checkout(&self, action: SessionAction) -> Result<(), OrderError> {
        match self.inner.apply(action).await? {
            SessionOutcome::Checkout { .. } => Ok(()),
            other => Err(unexpected("Checkout", other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn set_pickup(&self, pickup: PickupDetails) -> Result<(), OrderError> {
        match self.inner.apply(SessionAction::SetPickup(pickup)).await? {
            SessionOutcome::Pickup(_) => Ok(()),
            other => Err(unexpected("Pickup", other)),
        }
    }

    // -------------------------------------------------------------------------
    // Submission
    // -------------------------------------------------------------------------

    /// Submits the cart.
    ///
    /// The pipeline and the closing `FinishSubmission` run on their own task, so
    /// dropping this future (a UI timeout, a closed view) does not leave the
    /// session stuck in flight.
    ///
    /// # Errors
    /// Validation failures and a submission already in flight are returned before
    /// any side effect. Once the pipeline has started, persistence and dispatch
    /// failures are reported in the [`SubmissionReport`] instead.
    #[instrument(skip(self))]
    pub async fn submit(&self) -> Result<SubmissionReport, OrderError> {
        let now = Utc::now().with_timezone(&self.timezone);
        let request = match self
            .inner
            .apply(SessionAction::BeginSubmission { now })
            .await?
        {
            SessionOutcome::SubmissionStarted(request) => request,
            other => return Err(unexpected("SubmissionStarted", other)),
        };
        info!(total = request.total(), lines = request.cart.len(), "Submitting order");

        let session = self.inner.clone();
        let pipeline = self.pipeline.clone();
        let task = tokio::spawn(
            async move {
                let mut report = pipeline.run(&request).await;
                let clear_cart = report.should_clear_cart();
                session
                    .apply(SessionAction::FinishSubmission { clear_cart })
                    .await?;
                report.cart_cleared = clear_cart;
                report.enter(if clear_cart {
                    SubmissionPhase::Cleared
                } else {
                    SubmissionPhase::Retained
                });
                Ok::<_, OrderError>(report)
            }
            .instrument(Span::current()),
        );
        let report = task
            .await
            .map_err(|e| FrameworkError::TaskFailed(e.to_string()))??;

        info!(
            delivered = ?report.delivered,
            persisted = report.persisted,
            cart_cleared = report.cart_cleared,
            "Submission finished"
        );
        Ok(report)
    }

    // -------------------------------------------------------------------------
    // Admin gate
    // -------------------------------------------------------------------------

    pub async fn open_admin(&self) -> Result<AdminGate, OrderError> {
        self.admin(SessionAction::OpenAdmin).await
    }

    #[instrument(skip_all)]
    pub async fn submit_password(&self, password: &str) -> Result<AdminGate, OrderError> {
        self.admin(SessionAction::SubmitPassword(Password(password.to_string())))
            .await
    }

    pub async fn close_admin(&self) -> Result<AdminGate, OrderError> {
        self.admin(SessionAction::CloseAdmin).await
    }

    async fn admin(&self, action: SessionAction) -> Result<AdminGate, OrderError> {
        match self.inner.apply(action).await? {
            SessionOutcome::Admin(gate) => Ok(gate),
            other => Err(unexpected("Admin", other)),
        }
    }

    /// Opens or closes the shop remotely, then locally.
    ///
    /// # Errors
    /// `NotAuthorized` unless the gate is in its action menu. A failed or slow
    /// patch returns a retryable `NetworkError` and changes nothing locally.
    /// Once the patch succeeds the local status follows, even if the gate was
    /// closed meanwhile.
    #[instrument(skip(self))]
    pub async fn set_open_status(&self, is_open: bool) -> Result<(), OrderError> {
        let vendor_name = match self.inner.apply(SessionAction::AuthorizeStatusChange).await? {
            SessionOutcome::StatusChangeAuthorized { vendor_name } => vendor_name,
            other => return Err(unexpected("StatusChangeAuthorized", other)),
        };

        let patch = self.data_service.patch_open_status(&vendor_name, is_open);
        if let Err(e) = bounded(NetworkStep::StatusPatch, self.timeout, patch).await {
            warn!(error = %e, "Status update failed");
            self.inner.apply(SessionAction::AbandonStatusChange).await?;
            return Err(e.into());
        }

        match self.inner.apply(SessionAction::ApplyOpenStatus(is_open)).await? {
            SessionOutcome::StatusApplied { is_open } => {
                info!(vendor = %vendor_name, is_open, "Shop status updated");
                Ok(())
            }
            other => Err(unexpected("StatusApplied", other)),
        }
    }

    // -------------------------------------------------------------------------
    // Catalog
    // -------------------------------------------------------------------------

    /// Reloads menu and settings and swaps them in. Returns the item count.
    #[instrument(skip(self))]
    pub async fn reload(&self) -> Result<usize, OrderError> {
        let (catalog, status) = load_catalog(self.data_service.as_ref(), self.timeout).await?;
        self.replace_catalog(catalog, status).await
    }

    pub async fn replace_catalog(
        &self,
        catalog: Catalog,
        status: ShopStatus,
    ) -> Result<usize, OrderError> {
        match self
            .inner
            .apply(SessionAction::ReplaceCatalog { catalog, status })
            .await?
        {
            SessionOutcome::CatalogReplaced { items } => Ok(items),
            other => Err(unexpected("CatalogReplaced", other)),
        }
    }
}
