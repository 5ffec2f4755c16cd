//! # Catalog
//!
//! Loosely-typed rows as returned by the data service, and their normalization
//! into [`MenuItem`] and [`ShopStatus`].
//!
//! Every column arrives as text (sometimes as a bare JSON number or bool), so the
//! row types accept anything scalar and normalization does the parsing:
//!
//! - prices parse like a leading-integer read; garbage becomes 0
//! - flags are true only for a case-insensitive `TRUE`
//! - option lists split on `,` or `|`; notices split on `|`
//! - staple kind is fixed here, so nothing downstream inspects item names

use serde::{Deserialize, Deserializer, Serialize};

use crate::model::{ItemKind, MenuItem, ShopStatus, StapleKind};

/// Type column value marking a combo.
const COMBO_TYPE: &str = "套餐";

/// One row of the `Menu` sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuRow {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub price: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub info: Option<String>,
    #[serde(rename = "mainOptions", default, deserialize_with = "lenient")]
    pub main_options: Option<String>,
    #[serde(rename = "soupOptions", default, deserialize_with = "lenient")]
    pub soup_options: Option<String>,
    /// Optional explicit classification: `rice`, `noodle` or blank.
    #[serde(default, deserialize_with = "lenient")]
    pub staple: Option<String>,
}

/// One row of the `Settings` sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsRow {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(rename = "isOpen", default, deserialize_with = "lenient")]
    pub is_open: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub notices: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub password: Option<String>,
}

impl MenuRow {
    pub fn normalize(self) -> MenuItem {
        let name = self.name.unwrap_or_default().trim().to_string();
        let kind = parse_kind(self.kind.as_deref().unwrap_or_default());
        let staple = parse_staple(self.staple.as_deref(), &name);
        let (main_options, soup_options) = match kind {
            ItemKind::Combo => (
                split_list(self.main_options.as_deref(), &[',', '|']),
                split_list(self.soup_options.as_deref(), &[',', '|']),
            ),
            ItemKind::Single => (Vec::new(), Vec::new()),
        };
        MenuItem {
            id: self.id.unwrap_or_default().trim().to_string(),
            kind,
            base_price: parse_price(self.price.as_deref().unwrap_or_default()),
            description: self.info.unwrap_or_default(),
            main_options,
            soup_options,
            staple,
            name,
        }
    }
}

impl ShopStatus {
    /// Settings come from the first row; an empty sheet yields the defaults.
    pub fn from_rows(rows: Vec<SettingsRow>) -> Self {
        let Some(row) = rows.into_iter().next() else {
            return ShopStatus::default();
        };
        let defaults = ShopStatus::default();
        ShopStatus {
            name: row
                .name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .unwrap_or(defaults.name),
            is_open: parse_flag(row.is_open.as_deref().unwrap_or_default()),
            notices: split_list(row.notices.as_deref(), &['|']),
            admin_secret: row.password.unwrap_or_default(),
        }
    }
}

/// Catalog filter used by the menu view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Category {
    #[default]
    All,
    Combo,
    Single,
}

/// The normalized menu, combos first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    combos: Vec<MenuItem>,
    singles: Vec<MenuItem>,
}

impl Catalog {
    pub fn from_items(items: impl IntoIterator<Item = MenuItem>) -> Self {
        let (combos, singles) = items.into_iter().partition(MenuItem::is_combo);
        Self { combos, singles }
    }

    pub fn from_rows(rows: Vec<MenuRow>) -> Self {
        Self::from_items(rows.into_iter().map(MenuRow::normalize))
    }

    pub fn items(&self, category: Category) -> Vec<&MenuItem> {
        match category {
            Category::All => self.combos.iter().chain(&self.singles).collect(),
            Category::Combo => self.combos.iter().collect(),
            Category::Single => self.singles.iter().collect(),
        }
    }

    pub fn find(&self, id: &str) -> Option<&MenuItem> {
        self.combos.iter().chain(&self.singles).find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.combos.len() + self.singles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn parse_kind(raw: &str) -> ItemKind {
    let raw = raw.trim();
    if raw == COMBO_TYPE || raw.eq_ignore_ascii_case("combo") {
        ItemKind::Combo
    } else {
        ItemKind::Single
    }
}

/// Explicit column wins; otherwise the name decides.
pub fn parse_staple(explicit: Option<&str>, name: &str) -> StapleKind {
    match explicit.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        Some("noodle") => return StapleKind::Noodle,
        Some("rice") => return StapleKind::Rice,
        Some("none") => return StapleKind::None,
        _ => {}
    }
    let lower = name.to_lowercase();
    if name.contains('麵') || lower.contains("noodle") {
        StapleKind::Noodle
    } else if name.contains('飯') || lower.contains("rice") {
        StapleKind::Rice
    } else {
        StapleKind::None
    }
}

/// Leading-integer parse: `"120元"` is 120, `"abc"` and negatives are 0.
pub fn parse_price(raw: &str) -> u32 {
    let raw = raw.trim();
    let raw = raw.strip_prefix('+').unwrap_or(raw);
    let digits: String = raw.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

pub fn parse_flag(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("TRUE")
}

pub fn split_list(raw: Option<&str>, separators: &[char]) -> Vec<String> {
    raw.unwrap_or_default()
        .split(separators)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Accepts strings, numbers and bools; null becomes `None`.
fn lenient<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(if b { "TRUE" } else { "FALSE" }.to_string()),
        Some(other) => Some(other.to_string()),
    })
}
