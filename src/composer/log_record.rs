use serde::{Deserialize, Serialize};

use crate::model::{CartLine, OrderRequest};

/// Row appended to the order log, one per submission attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLogRecord {
    pub time: String,
    pub total: u32,
    /// One `"<name>(<customs>) x<quantity>"` line per cart line.
    pub content: String,
    /// `"[pickup: <date> <time>] <note>"`.
    pub note: String,
}

pub fn compact_line(line: &CartLine) -> String {
    if line.customs_summary().is_empty() {
        format!("{} x{}", line.name(), line.quantity())
    } else {
        format!("{}({}) x{}", line.name(), line.customs_summary(), line.quantity())
    }
}

pub fn render(request: &OrderRequest) -> OrderLogRecord {
    let content = request
        .cart
        .lines()
        .iter()
        .map(compact_line)
        .collect::<Vec<_>>()
        .join("\n");
    let note = format!(
        "[pickup: {} {}] {}",
        request.pickup.date,
        request.pickup.time,
        request.note().unwrap_or_default()
    );
    OrderLogRecord {
        time: request.timestamp(),
        total: request.total(),
        content,
        note,
    }
}
