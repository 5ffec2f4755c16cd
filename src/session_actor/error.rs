//! Error types for the ordering session.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::framework::FrameworkError;

/// Combo choice that must be made before commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionField {
    Main,
    Soup,
}

impl fmt::Display for SelectionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionField::Main => f.write_str("main dish"),
            SelectionField::Soup => f.write_str("soup/drink"),
        }
    }
}

/// Checkout field that must be filled before submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
    PickupDate,
    PickupTime,
}

impl fmt::Display for OrderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderField::PickupDate => f.write_str("pickup date"),
            OrderField::PickupTime => f.write_str("pickup time"),
        }
    }
}

/// Input rejected before any side effect happened.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A combo was committed without its main or soup.
    #[error("Please choose a {0}")]
    MissingSelection(SelectionField),

    /// Submission attempted without pickup date or time.
    #[error("Please choose a {0}")]
    IncompleteOrder(OrderField),

    #[error("The cart is empty")]
    EmptyCart,

    #[error("The shop is closed")]
    ShopClosed,

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),

    /// Line or cart total does not fit the price type.
    #[error("Order amount is too large")]
    AmountTooLarge,

    #[error("Addon not offered for this item: {0}")]
    AddonUnavailable(String),

    #[error("Spice level is not offered for this item")]
    SpiceUnavailable,

    #[error("Unknown {field} option: {value}")]
    UnknownOption { field: SelectionField, value: String },

    #[error("Menu item not found: {0}")]
    UnknownItem(String),

    #[error("No item is being configured")]
    NoDraft,
}

/// Admin gate failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Wrong password")]
    WrongPassword,

    #[error("Admin actions require a password first")]
    NotAuthorized,
}

/// Which remote call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkStep {
    CatalogLoad,
    SettingsLoad,
    Persist,
    Dispatch,
    StatusPatch,
}

impl fmt::Display for NetworkStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NetworkStep::CatalogLoad => "catalog load",
            NetworkStep::SettingsLoad => "settings load",
            NetworkStep::Persist => "order log write",
            NetworkStep::Dispatch => "order dispatch",
            NetworkStep::StatusPatch => "status update",
        };
        f.write_str(name)
    }
}

/// A remote call failed or did not answer in time.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NetworkError {
    #[error("{step} failed: {message}")]
    Failed { step: NetworkStep, message: String },

    #[error("{step} timed out after {after_ms}ms")]
    TimedOut { step: NetworkStep, after_ms: u64 },
}

impl NetworkError {
    pub fn failed(step: NetworkStep, message: impl fmt::Display) -> Self {
        NetworkError::Failed {
            step,
            message: message.to_string(),
        }
    }

    pub fn timed_out(step: NetworkStep, after: Duration) -> Self {
        NetworkError::TimedOut {
            step,
            after_ms: after.as_millis() as u64,
        }
    }

    pub fn step(&self) -> NetworkStep {
        match self {
            NetworkError::Failed { step, .. } | NetworkError::TimedOut { step, .. } => *step,
        }
    }
}

/// Top-level error for every session operation.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    /// A submission is already running; the trigger is disabled.
    #[error("An order is already being submitted")]
    SubmissionInProgress,

    #[error("No submission is in flight")]
    NoSubmissionInFlight,

    #[error("Session communication error: {0}")]
    Framework(#[from] FrameworkError),
}

impl OrderError {
    /// Whether retrying the same operation may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, OrderError::Network(_) | OrderError::SubmissionInProgress)
    }
}
