//! # Item Configurator
//!
//! Builds a mutable draft ([`ItemSelection`]) for one catalog item and turns it
//! into a priced, immutable [`CartLine`] on commit.
//!
//! ## Addon rules
//!
//! Combos and rice/noodle dishes offer a spice selector and two addons:
//! an "extra staple" (labelled for the item's staple) and [`EXTRA_SIDE`].
//! Every addon costs [`ADDON_PRICE`](crate::model::ADDON_PRICE).

use serde::{Deserialize, Serialize};

use crate::model::{CartLine, MenuItem, StapleKind, CUSTOMS_SEPARATOR};
use crate::session_actor::{SelectionField, ValidationError};

pub const EXTRA_RICE: &str = "extra rice";
pub const EXTRA_NOODLE: &str = "extra noodle";
pub const EXTRA_SIDE: &str = "extra side";

/// Largest quantity a single line accepts.
pub const MAX_QUANTITY: u32 = 99;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpiceLevel {
    #[default]
    None,
    Mild,
    Hot,
}

impl SpiceLevel {
    /// Text used in the customs summary. `None` contributes nothing.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            SpiceLevel::None => None,
            SpiceLevel::Mild => Some("mild"),
            SpiceLevel::Hot => Some("hot"),
        }
    }
}

/// Ephemeral draft for one item. Discarded on commit or cancel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSelection {
    item: MenuItem,
    base_price: u32,
    quantity: u32,
    main: Option<String>,
    soup: Option<String>,
    spice: SpiceLevel,
    addons: Vec<String>,
    note: Option<String>,
}

impl ItemSelection {
    /// Opens a fresh draft: quantity 1, no choices, no addons, no spice.
    pub fn open(item: MenuItem) -> Self {
        Self {
            base_price: item.base_price,
            item,
            quantity: 1,
            main: None,
            soup: None,
            spice: SpiceLevel::None,
            addons: Vec::new(),
            note: None,
        }
    }

    pub fn item(&self) -> &MenuItem {
        &self.item
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn main(&self) -> Option<&str> {
        self.main.as_deref()
    }

    pub fn soup(&self) -> Option<&str> {
        self.soup.as_deref()
    }

    pub fn spice(&self) -> SpiceLevel {
        self.spice
    }

    /// Selected addons, in the order they were toggled on.
    pub fn addons(&self) -> &[String] {
        &self.addons
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn offers_spice(&self) -> bool {
        self.item.offers_extras()
    }

    /// Addon labels this item offers, staple first.
    pub fn available_addons(&self) -> Vec<&'static str> {
        if !self.item.offers_extras() {
            return Vec::new();
        }
        let staple = match self.item.staple {
            StapleKind::Noodle => EXTRA_NOODLE,
            StapleKind::Rice | StapleKind::None => EXTRA_RICE,
        };
        vec![staple, EXTRA_SIDE]
    }

    pub fn set_main(&mut self, main: impl Into<String>) -> Result<(), ValidationError> {
        self.main = checked_option(&self.item.main_options, SelectionField::Main, main.into())?;
        Ok(())
    }

    pub fn set_soup(&mut self, soup: impl Into<String>) -> Result<(), ValidationError> {
        self.soup = checked_option(&self.item.soup_options, SelectionField::Soup, soup.into())?;
        Ok(())
    }

    pub fn set_spice(&mut self, spice: SpiceLevel) -> Result<(), ValidationError> {
        if spice != SpiceLevel::None && !self.offers_spice() {
            return Err(ValidationError::SpiceUnavailable);
        }
        self.spice = spice;
        Ok(())
    }

    /// Toggles `label` in or out of the addon set. Returns whether it is now selected.
    pub fn toggle_addon(&mut self, label: &str) -> Result<bool, ValidationError> {
        if !self.available_addons().contains(&label) {
            return Err(ValidationError::AddonUnavailable(label.to_string()));
        }
        if let Some(pos) = self.addons.iter().position(|a| a == label) {
            self.addons.remove(pos);
            Ok(false)
        } else {
            self.addons.push(label.to_string());
            Ok(true)
        }
    }

    pub fn set_quantity(&mut self, quantity: u32) -> Result<(), ValidationError> {
        if quantity == 0 || quantity > MAX_QUANTITY {
            return Err(ValidationError::InvalidQuantity(quantity));
        }
        self.quantity = quantity;
        Ok(())
    }

    /// Stops at [`MAX_QUANTITY`].
    pub fn increment(&mut self) {
        self.quantity = self.quantity.saturating_add(1).min(MAX_QUANTITY);
    }

    /// Floors at 1.
    pub fn decrement(&mut self) {
        self.quantity = self.quantity.saturating_sub(1).max(1);
    }

    /// Blank text clears the note.
    pub fn set_note(&mut self, note: impl Into<String>) {
        let note = note.into();
        self.note = (!note.trim().is_empty()).then_some(note);
    }

    /// `[main, soup, spice, addons…, note]` with empty entries omitted.
    pub fn customs_summary(&self) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(4 + self.addons.len());
        if let Some(main) = &self.main {
            parts.push(format!("main:{main}"));
        }
        if let Some(soup) = &self.soup {
            parts.push(format!("soup:{soup}"));
        }
        if let Some(spice) = self.spice.label() {
            parts.push(spice.to_string());
        }
        parts.extend(self.addons.iter().cloned());
        if let Some(note) = &self.note {
            parts.push(format!("note:{note}"));
        }
        parts.join(CUSTOMS_SEPARATOR)
    }

    /// Price the line would get if committed now.
    pub fn preview_price(&self) -> u32 {
        self.to_line()
            .map_or(u32::MAX, |line| line.display_price())
    }

    /// Validates the draft and produces the priced line.
    ///
    /// # Errors
    /// [`ValidationError::MissingSelection`] when a combo lacks its main or soup,
    /// [`ValidationError::AmountTooLarge`] when the price overflows.
    pub fn commit(&self) -> Result<CartLine, ValidationError> {
        if self.item.is_combo() {
            if self.main.is_none() {
                return Err(ValidationError::MissingSelection(SelectionField::Main));
            }
            if self.soup.is_none() {
                return Err(ValidationError::MissingSelection(SelectionField::Soup));
            }
        }
        self.to_line().ok_or(ValidationError::AmountTooLarge)
    }

    fn to_line(&self) -> Option<CartLine> {
        CartLine::try_new(
            self.item.name.clone(),
            self.quantity,
            self.base_price,
            self.addons.len(),
            self.customs_summary(),
        )
    }
}

/// Blank clears the choice; anything else must be one of `options`.
fn checked_option(
    options: &[String],
    field: SelectionField,
    value: String,
) -> Result<Option<String>, ValidationError> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    if !options.iter().any(|o| *o == value) {
        return Err(ValidationError::UnknownOption { field, value });
    }
    Ok(Some(value))
}
