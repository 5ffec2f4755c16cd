use serde::{Deserialize, Serialize};

/// Whether an item is a set meal needing main/soup choices, or a single dish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Combo,
    Single,
}

/// Staple classification, fixed when the catalog is normalized.
///
/// Drives which "extra staple" addon an item offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StapleKind {
    #[default]
    None,
    Rice,
    Noodle,
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub kind: ItemKind,
    pub name: String,
    /// Price in whole currency units.
    pub base_price: u32,
    pub description: String,
    /// Empty unless `kind` is [`ItemKind::Combo`].
    pub main_options: Vec<String>,
    /// Empty unless `kind` is [`ItemKind::Combo`].
    pub soup_options: Vec<String>,
    pub staple: StapleKind,
}

impl MenuItem {
    /// Creates a single dish with no options.
    pub fn single(
        id: impl Into<String>,
        name: impl Into<String>,
        base_price: u32,
        staple: StapleKind,
    ) -> Self {
        Self {
            id: id.into(),
            kind: ItemKind::Single,
            name: name.into(),
            base_price,
            description: String::new(),
            main_options: Vec::new(),
            soup_options: Vec::new(),
            staple,
        }
    }

    /// Creates a combo with its main and soup choices.
    pub fn combo(
        id: impl Into<String>,
        name: impl Into<String>,
        base_price: u32,
        main_options: Vec<String>,
        soup_options: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: ItemKind::Combo,
            name: name.into(),
            base_price,
            description: String::new(),
            main_options,
            soup_options,
            staple: StapleKind::None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn is_combo(&self) -> bool {
        self.kind == ItemKind::Combo
    }

    /// Combos and rice/noodle dishes get the spice selector and the extra addons.
    pub fn offers_extras(&self) -> bool {
        self.is_combo() || self.staple != StapleKind::None
    }
}

/// Vendor-wide settings loaded at startup.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopStatus {
    pub name: String,
    pub is_open: bool,
    pub notices: Vec<String>,
    /// Compared client-side by the admin gate. Empty means the gate never opens.
    pub admin_secret: String,
}

impl Default for ShopStatus {
    fn default() -> Self {
        Self {
            name: "Ordering".to_string(),
            is_open: false,
            notices: Vec::new(),
            admin_secret: String::new(),
        }
    }
}

// Keep the secret out of logs.
impl std::fmt::Debug for ShopStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopStatus")
            .field("name", &self.name)
            .field("is_open", &self.is_open)
            .field("notices", &self.notices)
            .finish_non_exhaustive()
    }
}
