use std::fmt::Write;

use crate::model::{CartLine, OrderRequest};

const RULE: &str = "----------------";

/// `"<name> x<quantity> (<customs>)"`, parenthetical omitted when empty.
pub fn line_text(line: &CartLine) -> String {
    if line.customs_summary().is_empty() {
        format!("{} x{}", line.name(), line.quantity())
    } else {
        format!("{} x{} ({})", line.name(), line.quantity(), line.customs_summary())
    }
}

/// Human-readable summary: copied to the clipboard and carried by the deep link.
pub fn render(request: &OrderRequest) -> String {
    let mut text = String::new();
    // Writing to a String cannot fail
    let _ = writeln!(text, "📋 New order {}", request.timestamp());
    let _ = writeln!(text, "🕒 Pickup: {} {}", request.pickup.date, request.pickup.time);
    let _ = writeln!(text, "{RULE}");
    for line in request.cart.lines() {
        let _ = writeln!(text, "{}", line_text(line));
    }
    let _ = writeln!(text, "{RULE}");
    let _ = write!(text, "💰 Total: ${}", request.total());
    if let Some(note) = request.note() {
        let _ = write!(text, "\nNote: {note}");
    }
    text
}
