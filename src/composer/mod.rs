//! # Order Composer
//!
//! Derives the three representations of one order from a single
//! [`OrderRequest`] snapshot:
//!
//! - [`plain_text`]: the human-readable summary (clipboard, deep link)
//! - [`rich_message`]: the structured document sent inside the chat host
//! - [`log_record`]: the compact row persisted to the order log
//!
//! All three iterate the same `cart.lines()` slice, so they always agree on
//! which lines appear, in which order, with which quantity and price.

pub mod log_record;
pub mod plain_text;
pub mod rich_message;

pub use log_record::OrderLogRecord;
pub use rich_message::{FlexComponent, FlexMessage};

use crate::model::OrderRequest;

/// The order in every form the submission pipeline needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedOrder {
    pub plain_text: String,
    pub message: FlexMessage,
    pub log: OrderLogRecord,
    pub total: u32,
}

pub fn compose(request: &OrderRequest) -> ComposedOrder {
    ComposedOrder {
        plain_text: plain_text::render(request),
        message: rich_message::render(request),
        log: log_record::render(request),
        total: request.total(),
    }
}

#[cfg(test)]
mod tests {
    use super::rich_message::{FlexBox, Layout};
    use super::*;
    use crate::model::{Cart, CartLine, PickupDetails};
    use chrono::TimeZone;
    use chrono_tz::Asia::Taipei;

    fn request(lines: Vec<CartLine>, note: Option<&str>) -> OrderRequest {
        let mut cart = Cart::new();
        for line in lines {
            cart.add(line);
        }
        let mut pickup = PickupDetails::new("2024-06-01", "12:30");
        if let Some(note) = note {
            pickup = pickup.with_note(note);
        }
        OrderRequest {
            vendor_name: "Auntie Lin".into(),
            cart,
            pickup,
            created_at: Taipei.with_ymd_and_hms(2024, 6, 1, 11, 5, 0).unwrap(),
        }
    }

    /// (name, quantity text, price text) for every item row, in document order.
    fn document_rows(message: &FlexMessage) -> Vec<(String, String, String)> {
        fn walk(b: &FlexBox, out: &mut Vec<(String, String, String)>) {
            let texts: Vec<&str> = b
                .contents
                .iter()
                .filter_map(|c| match c {
                    FlexComponent::Text(t) => Some(t.text.as_str()),
                    _ => None,
                })
                .collect();
            if b.layout == Layout::Horizontal && texts.len() == 3 {
                out.push((texts[0].into(), texts[1].into(), texts[2].into()));
            }
            for child in &b.contents {
                if let FlexComponent::Box(inner) = child {
                    walk(inner, out);
                }
            }
        }
        let mut out = Vec::new();
        walk(&message.contents.body, &mut out);
        out
    }

    #[test]
    fn test_reference_order() {
        let line = CartLine::new("Set A", 2, 110, 0, "main:Rice / soup:Soup");
        let composed = compose(&request(vec![line], None));

        assert_eq!(composed.total, 220);
        assert!(composed.plain_text.contains("Set A x2 (main:Rice / soup:Soup)"));
        assert!(composed.plain_text.contains("$220"));
        assert!(composed.plain_text.contains("2024-06-01 12:30"));
        assert!(composed.plain_text.starts_with("📋 New order 2024-06-01 11:05:00"));
        assert!(!composed.plain_text.contains("Note:"));
    }

    #[test]
    fn test_plain_text_omits_empty_parenthetical() {
        let line = CartLine::new("Iced tea", 1, 30, 0, "");
        let composed = compose(&request(vec![line], None));
        assert!(composed.plain_text.contains("\nIced tea x1\n"));
        assert!(!composed.plain_text.contains("()"));
    }

    #[test]
    fn test_text_and_document_agree_on_lines() {
        let lines = vec![
            CartLine::new("Set A", 2, 110, 1, "main:Rice / soup:Soup / extra rice"),
            CartLine::new("Iced tea", 1, 30, 0, ""),
            CartLine::new("Beef noodles", 3, 150, 2, "hot / extra noodle / extra side"),
        ];
        let composed = compose(&request(lines.clone(), Some("no cutlery")));

        let rows = document_rows(&composed.message);
        assert_eq!(rows.len(), lines.len());

        let text_lines: Vec<&str> = composed
            .plain_text
            .lines()
            .filter(|l| lines.iter().any(|c| l.starts_with(c.name())))
            .collect();
        assert_eq!(text_lines.len(), lines.len());

        for ((line, row), text) in lines.iter().zip(&rows).zip(&text_lines) {
            assert_eq!(row.0, line.name());
            assert_eq!(row.1, format!("x{}", line.quantity()));
            assert_eq!(row.2, format!("${}", line.display_price()));
            assert_eq!(*text, plain_text::line_text(line));
        }
    }

    #[test]
    fn test_document_note_block_or_spacer() {
        let with_note = compose(&request(vec![CartLine::new("A", 1, 10, 0, "")], Some("call me")));
        let json = serde_json::to_value(&with_note.message).unwrap();
        let body = &json["contents"]["body"]["contents"];
        let last = body.as_array().unwrap().last().unwrap();
        assert_eq!(last["type"], "box");
        assert_eq!(last["contents"][1]["text"], "call me");

        let without = compose(&request(vec![CartLine::new("A", 1, 10, 0, "")], None));
        let json = serde_json::to_value(&without.message).unwrap();
        let last = json["contents"]["body"]["contents"].as_array().unwrap().last().cloned().unwrap();
        assert_eq!(last, serde_json::json!({ "type": "spacer" }));
    }

    #[test]
    fn test_document_wire_shape() {
        let composed = compose(&request(
            vec![CartLine::new("Set A", 2, 110, 0, "main:Rice / soup:Soup")],
            None,
        ));
        let json = serde_json::to_value(&composed.message).unwrap();
        assert_eq!(json["type"], "flex");
        assert_eq!(json["altText"], "🍱 Order $220");
        assert_eq!(json["contents"]["type"], "bubble");
        assert_eq!(json["contents"]["body"]["layout"], "vertical");
        assert_eq!(json["contents"]["body"]["contents"][1]["text"], "Auntie Lin");
        assert_eq!(
            json["contents"]["body"]["contents"][2]["backgroundColor"],
            "#fff7ed"
        );
        // Secondary customs line under the item row
        let item = &json["contents"]["body"]["contents"][5]["contents"][0];
        assert_eq!(item["contents"][1]["text"], "└ main:Rice / soup:Soup");
        assert_eq!(item["contents"][1]["offsetStart"], "md");
    }

    #[test]
    fn test_log_record() {
        let lines = vec![
            CartLine::new("Set A", 2, 110, 0, "main:Rice / soup:Soup"),
            CartLine::new("Iced tea", 1, 30, 0, ""),
        ];
        let composed = compose(&request(lines.clone(), Some("no cutlery")));
        assert_eq!(composed.log.total, 250);
        assert_eq!(composed.log.time, "2024-06-01 11:05:00");
        assert_eq!(
            composed.log.content,
            "Set A(main:Rice / soup:Soup) x2\nIced tea x1"
        );
        assert_eq!(composed.log.note, "[pickup: 2024-06-01 12:30] no cutlery");

        let bare = compose(&request(lines, None));
        assert_eq!(bare.log.note, "[pickup: 2024-06-01 12:30] ");
    }
}
