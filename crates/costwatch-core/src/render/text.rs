//! Plain-text summary shared by the chat message and the email headline

use crate::models::{format_amount, CostReport};
use rust_decimal::Decimal;

/// Headline stating the period total
pub fn total_line(total: Decimal) -> String {
    format!("Your Total Cost for this month: ${}", format_amount(total))
}

/// Total line followed by one line per day, each newline-terminated
pub fn format_summary(report: &CostReport) -> String {
    let mut message = total_line(report.total());
    message.push('\n');

    for record in report.records() {
        message.push_str(&format!(
            "Time: {} Cost: ${}\n",
            record.date,
            format_amount(record.cost)
        ));
    }

    message
}
