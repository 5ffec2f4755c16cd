use serde::{Deserialize, Serialize};

/// Surcharge per selected addon, in whole currency units.
pub const ADDON_PRICE: u32 = 10;

/// Separator between entries of a customs summary.
pub const CUSTOMS_SEPARATOR: &str = " / ";

/// An immutable, priced snapshot of a configured item.
///
/// Prices are computed once in [`CartLine::new`]; later catalog changes never
/// reach an existing line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    name: String,
    quantity: u32,
    unit_base_price: u32,
    addon_surcharge: u32,
    display_price: u32,
    customs_summary: String,
}

impl CartLine {
    /// Prices a line: `(unit_base_price + ADDON_PRICE * addon_count) * quantity`.
    ///
    /// Saturates at `u32::MAX`. Use [`CartLine::try_new`] for user input.
    pub fn new(
        name: impl Into<String>,
        quantity: u32,
        unit_base_price: u32,
        addon_count: usize,
        customs_summary: impl Into<String>,
    ) -> Self {
        let addon_count = u32::try_from(addon_count).unwrap_or(u32::MAX);
        let addon_surcharge = ADDON_PRICE.saturating_mul(addon_count);
        Self {
            name: name.into(),
            quantity,
            unit_base_price,
            addon_surcharge,
            display_price: unit_base_price
                .saturating_add(addon_surcharge)
                .saturating_mul(quantity),
            customs_summary: customs_summary.into(),
        }
    }

    /// Like [`CartLine::new`], but `None` when the price does not fit in a `u32`.
    pub fn try_new(
        name: impl Into<String>,
        quantity: u32,
        unit_base_price: u32,
        addon_count: usize,
        customs_summary: impl Into<String>,
    ) -> Option<Self> {
        let addon_surcharge = ADDON_PRICE.checked_mul(u32::try_from(addon_count).ok()?)?;
        let display_price = unit_base_price
            .checked_add(addon_surcharge)?
            .checked_mul(quantity)?;
        Some(Self {
            name: name.into(),
            quantity,
            unit_base_price,
            addon_surcharge,
            display_price,
            customs_summary: customs_summary.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_base_price(&self) -> u32 {
        self.unit_base_price
    }

    pub fn addon_surcharge(&self) -> u32 {
        self.addon_surcharge
    }

    pub fn display_price(&self) -> u32 {
        self.display_price
    }

    /// Empty when the item has no customizations.
    pub fn customs_summary(&self) -> &str {
        &self.customs_summary
    }
}

/// Boundary events reported by the cart. The caller decides what to do with them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartEvent {
    BecameEmpty,
}

/// Result of [`Cart::remove`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveOutcome {
    pub removed: Option<CartLine>,
    pub event: Option<CartEvent>,
}

/// Ordered collection of committed lines. Insertion order is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, line: CartLine) {
        self.lines.push(line);
    }

    /// Removes the line at `index`. Out of range is a no-op.
    ///
    /// Emits [`CartEvent::BecameEmpty`] only when this call removed the last line.
    pub fn remove(&mut self, index: usize) -> RemoveOutcome {
        if index >= self.lines.len() {
            return RemoveOutcome {
                removed: None,
                event: None,
            };
        }
        let removed = self.lines.remove(index);
        RemoveOutcome {
            removed: Some(removed),
            event: self.lines.is_empty().then_some(CartEvent::BecameEmpty),
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Saturates at `u32::MAX`.
    pub fn total(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |sum, line| sum.saturating_add(line.display_price()))
    }

    /// Total after adding `line`, or `None` if it would not fit in a `u32`.
    pub fn total_with(&self, line: &CartLine) -> Option<u32> {
        self.lines
            .iter()
            .chain(std::iter::once(line))
            .try_fold(0u32, |sum, l| sum.checked_add(l.display_price()))
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
