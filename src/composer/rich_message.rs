//! Structured order summary for the chat host's message surface.
//!
//! The types mirror the host's flex-message JSON schema closely enough that
//! `serde_json::to_value(&message)` is the wire payload. Only the properties the
//! order summary uses are modelled.

use serde::{Deserialize, Serialize};

use crate::model::{CartLine, OrderRequest};

const ACCENT: &str = "#ea580c";
const SUCCESS: &str = "#10b981";
const INK: &str = "#333333";
const MUTED: &str = "#6b7280";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    Vertical,
    Horizontal,
}

/// A node of the layout tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FlexComponent {
    Box(FlexBox),
    Text(FlexText),
    Separator(FlexSeparator),
    Spacer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlexBox {
    pub layout: Layout,
    pub contents: Vec<FlexComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_all: Option<String>,
}

impl FlexBox {
    pub fn new(layout: Layout, contents: Vec<FlexComponent>) -> Self {
        Self {
            layout,
            contents,
            margin: None,
            background_color: None,
            corner_radius: None,
            padding_all: None,
        }
    }

    pub fn margin(mut self, margin: &str) -> Self {
        self.margin = Some(margin.to_string());
        self
    }

    /// Rounded, padded, tinted panel.
    pub fn panel(mut self, background: &str) -> Self {
        self.background_color = Some(background.to_string());
        self.corner_radius = Some("md".to_string());
        self.padding_all = Some("md".to_string());
        self
    }
}

impl From<FlexBox> for FlexComponent {
    fn from(b: FlexBox) -> Self {
        FlexComponent::Box(b)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlexText {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flex: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gravity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrap: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset_start: Option<String>,
}

impl FlexText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn size(mut self, size: &str) -> Self {
        self.size = Some(size.to_string());
        self
    }

    pub fn bold(mut self) -> Self {
        self.weight = Some("bold".to_string());
        self
    }

    pub fn color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    pub fn flex(mut self, flex: u8) -> Self {
        self.flex = Some(flex);
        self
    }

    pub fn align(mut self, align: &str) -> Self {
        self.align = Some(align.to_string());
        self
    }

    pub fn gravity(mut self, gravity: &str) -> Self {
        self.gravity = Some(gravity.to_string());
        self
    }

    pub fn wrap(mut self) -> Self {
        self.wrap = Some(true);
        self
    }

    pub fn margin(mut self, margin: &str) -> Self {
        self.margin = Some(margin.to_string());
        self
    }

    pub fn offset_start(mut self, offset: &str) -> Self {
        self.offset_start = Some(offset.to_string());
        self
    }
}

impl From<FlexText> for FlexComponent {
    fn from(t: FlexText) -> Self {
        FlexComponent::Text(t)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlexSeparator {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "bubble")]
pub struct Bubble {
    pub body: FlexBox,
}

/// The message envelope handed to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "flex", rename_all = "camelCase")]
pub struct FlexMessage {
    pub alt_text: String,
    pub contents: Bubble,
}

/// Builds the order summary document.
pub fn render(request: &OrderRequest) -> FlexMessage {
    let total = request.total();
    let rows: Vec<FlexComponent> = request.cart.lines().iter().map(line_row).collect();

    let pickup = FlexBox::new(
        Layout::Vertical,
        vec![
            FlexText::new("🕒 Pickup time").size("xs").color(ACCENT).bold().into(),
            FlexText::new(format!("{} {}", request.pickup.date, request.pickup.time))
                .size("lg")
                .color(INK)
                .bold()
                .margin("sm")
                .into(),
        ],
    )
    .margin("md")
    .panel("#fff7ed");

    let total_row = FlexBox::new(
        Layout::Horizontal,
        vec![
            FlexText::new("Total").size("md").color(MUTED).bold().gravity("bottom").into(),
            FlexText::new(format!("${total}"))
                .size("2xl")
                .color(ACCENT)
                .align("end")
                .bold()
                .into(),
        ],
    )
    .margin("lg");

    let note = match request.note() {
        Some(note) => FlexBox::new(
            Layout::Vertical,
            vec![
                FlexText::new("Note:").size("xs").color(MUTED).bold().into(),
                FlexText::new(note).size("sm").color("#374151").wrap().margin("xs").into(),
            ],
        )
        .margin("lg")
        .panel("#f3f4f6")
        .into(),
        None => FlexComponent::Spacer,
    };

    let body = FlexBox::new(
        Layout::Vertical,
        vec![
            FlexText::new("Order placed").bold().color(SUCCESS).size("sm").into(),
            FlexText::new(request.vendor_name.clone()).bold().size("xl").margin("md").into(),
            pickup.into(),
            FlexText::new("Status: awaiting vendor confirmation ✅")
                .bold()
                .size("xs")
                .color(SUCCESS)
                .align("center")
                .margin("lg")
                .into(),
            FlexComponent::Separator(FlexSeparator {
                margin: Some("lg".to_string()),
                color: None,
            }),
            FlexBox::new(Layout::Vertical, rows).margin("lg").into(),
            FlexComponent::Separator(FlexSeparator {
                margin: Some("lg".to_string()),
                color: Some("#e5e7eb".to_string()),
            }),
            total_row.into(),
            note,
        ],
    );

    FlexMessage {
        alt_text: format!("🍱 Order ${total}"),
        contents: Bubble { body },
    }
}

/// Name / quantity / price, with the customs summary indented below when present.
fn line_row(line: &CartLine) -> FlexComponent {
    let mut contents: Vec<FlexComponent> = vec![FlexBox::new(
        Layout::Horizontal,
        vec![
            FlexText::new(line.name())
                .size("md")
                .bold()
                .color(INK)
                .flex(6)
                .wrap()
                .into(),
            FlexText::new(format!("x{}", line.quantity()))
                .size("sm")
                .color("#666666")
                .align("center")
                .flex(2)
                .into(),
            FlexText::new(format!("${}", line.display_price()))
                .size("sm")
                .bold()
                .color(ACCENT)
                .align("end")
                .flex(3)
                .into(),
        ],
    )
    .into()];

    if !line.customs_summary().is_empty() {
        contents.push(
            FlexText::new(format!("└ {}", line.customs_summary()))
                .size("xs")
                .color("#9ca3af")
                .wrap()
                .margin("xs")
                .offset_start("md")
                .into(),
        );
    }

    FlexBox::new(Layout::Vertical, contents).margin("md").into()
}
