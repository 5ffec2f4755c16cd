use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::model::Cart;

/// Pickup date/time and the order-wide note, as entered at checkout.
///
/// Free-form strings: the vendor reads them, nothing parses them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickupDetails {
    pub date: String,
    pub time: String,
    pub note: Option<String>,
}

impl PickupDetails {
    pub fn new(date: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            time: time.into(),
            note: None,
        }
    }

    /// Pickup on `date` with the time still to be chosen.
    pub fn for_date(date: NaiveDate) -> Self {
        Self::new(date.format("%Y-%m-%d").to_string(), "")
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        let note = note.into();
        self.note = (!note.trim().is_empty()).then_some(note);
        self
    }

    pub fn is_complete(&self) -> bool {
        !self.date.trim().is_empty() && !self.time.trim().is_empty()
    }
}

/// Everything a submission needs, frozen at the moment it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub vendor_name: String,
    pub cart: Cart,
    pub pickup: PickupDetails,
    /// Vendor-local time.
    pub created_at: DateTime<Tz>,
}

impl OrderRequest {
    pub fn total(&self) -> u32 {
        self.cart.total()
    }

    pub fn note(&self) -> Option<&str> {
        self.pickup.note.as_deref()
    }

    /// Timestamp as shown to the vendor.
    pub fn timestamp(&self) -> String {
        self.created_at.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pickup_requires_date_and_time() {
        assert!(PickupDetails::new("2024-06-01", "12:30").is_complete());
        assert!(!PickupDetails::new("2024-06-01", "").is_complete());
        assert!(!PickupDetails::new("  ", "12:30").is_complete());
    }

    #[test]
    fn test_blank_note_is_dropped() {
        assert_eq!(PickupDetails::new("d", "t").with_note("   ").note, None);
        assert_eq!(
            PickupDetails::new("d", "t").with_note("no onions").note.as_deref(),
            Some("no onions")
        );
    }

    #[test]
    fn test_for_date_formats_iso() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let pickup = PickupDetails::for_date(date);
        assert_eq!(pickup.date, "2024-06-01");
        assert!(!pickup.is_complete());
    }
}
