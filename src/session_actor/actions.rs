//! Transitions understood by the ordering session.
//!
//! Every user-triggered change to the session is one [`SessionAction`]; the
//! session answers with the matching [`SessionOutcome`]. Async work (network
//! calls) never happens inside a transition: the client brackets it with
//! `BeginSubmission`/`FinishSubmission` or `AuthorizeStatusChange`/`ApplyOpenStatus`.

use std::fmt;

use chrono::DateTime;
use chrono_tz::Tz;

use crate::catalog::Catalog;
use crate::configurator::{ItemSelection, SpiceLevel};
use crate::model::{CartEvent, CartLine, OrderRequest, PickupDetails, ShopStatus};

use super::admin::AdminGate;

/// Password typed into the admin gate. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(pub String);

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

#[derive(Debug, Clone)]
pub enum SessionAction {
    // Item configurator
    /// Opens a fresh draft for the catalog item with this id.
    OpenItem(String),
    SetMain(String),
    SetSoup(String),
    SetSpice(SpiceLevel),
    ToggleAddon(String),
    SetQuantity(u32),
    IncrementQuantity,
    DecrementQuantity,
    SetItemNote(String),
    /// Validates the draft and appends its line to the cart.
    ///
    /// # Errors
    /// `MissingSelection` for an incomplete combo; the cart is untouched and the
    /// draft stays open.
    CommitItem,
    CancelItem,

    // Cart & checkout
    RemoveLine(usize),
    OpenCheckout,
    CloseCheckout,
    SetPickup(PickupDetails),

    // Submission
    /// Validates and freezes the order, raising the in-flight flag.
    BeginSubmission { now: DateTime<Tz> },
    /// Lowers the in-flight flag, clearing the cart when `clear_cart`.
    FinishSubmission { clear_cart: bool },

    // Admin gate
    OpenAdmin,
    SubmitPassword(Password),
    CloseAdmin,
    /// Checks the gate is in its action menu and returns the vendor name to patch.
    /// Grants exactly one `ApplyOpenStatus` or `AbandonStatusChange`.
    AuthorizeStatusChange,
    /// Records a status change the data service has accepted. Closing the gate
    /// while the patch was in flight does not revoke it.
    ApplyOpenStatus(bool),
    /// Drops the grant after a failed patch; the gate stays where it is.
    AbandonStatusChange,

    /// Swaps in a freshly loaded catalog and settings.
    ReplaceCatalog { catalog: Catalog, status: ShopStatus },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    /// Current draft after a configurator transition.
    Draft(ItemSelection),
    /// Whether the toggled addon is now selected, plus the updated draft.
    AddonToggled { selected: bool, draft: ItemSelection },
    Committed { line: CartLine, total: u32 },
    Cancelled,
    Removed {
        removed: Option<CartLine>,
        event: Option<CartEvent>,
        total: u32,
    },
    Checkout { open: bool },
    Pickup(PickupDetails),
    SubmissionStarted(OrderRequest),
    SubmissionFinished { cart_cleared: bool },
    Admin(AdminGate),
    StatusChangeAuthorized { vendor_name: String },
    StatusApplied { is_open: bool },
    CatalogReplaced { items: usize },
}
