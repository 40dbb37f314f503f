//! Reply and summary text.
//!
//! Composes the acknowledgment after each utterance and the final
//! per-person breakdown, without requiring an LLM.

use std::sync::Arc;

use whoatewhat_core::allocation::{Reconciliation, SplitSummary};
use whoatewhat_core::config::DisplayConfig;
use whoatewhat_core::ReceiptItem;

/// Shown once every item has someone assigned.
pub const COMPLETE_REPLY: &str = "Great! All items have been assigned. Here's your final breakdown.";

/// Generates replies and breakdowns.
#[derive(Debug, Clone, Default)]
pub struct ResponseGenerator {
    display: DisplayConfig,
}

impl ResponseGenerator {
    pub fn new(display: DisplayConfig) -> Self {
        Self { display }
    }

    /// Acknowledge an utterance given the items still unassigned.
    pub fn acknowledgment(&self, unassigned: &[Arc<ReceiptItem>]) -> String {
        if unassigned.is_empty() {
            return COMPLETE_REPLY.to_string();
        }
        let names: Vec<&str> = unassigned.iter().map(|item| item.name.as_str()).collect();
        format!(
            "I've processed your input. There are still some unassigned items: {}. Please clarify who should pay for these items.",
            names.join(", ")
        )
    }

    /// Render the bill summary as plain text.
    pub fn render_summary(&self, summary: &SplitSummary) -> String {
        let money = |amount: f64| self.display.money(amount, &summary.currency);
        let mut lines = vec![
            "Bill Summary".to_string(),
            format!("Total: {} ({})", money(summary.receipt_total), summary.currency),
            String::new(),
        ];

        for person in &summary.people {
            lines.push(format!("{}: {}", person.name, money(person.total)));
            for line in &person.items {
                let mut label = format!("  {}", line.name);
                if line.quantity > 1 {
                    label.push_str(&format!(" × {}", line.quantity));
                }
                if line.share_percentage < 1.0 {
                    label.push_str(&format!(" ({}%)", (line.share_percentage * 100.0) as i64));
                }
                lines.push(format!("{} {}", label, money(line.amount)));
            }
            lines.push(format!("  Subtotal: {}", money(person.subtotal)));
            lines.push(format!("  Tax: {}", money(person.tax)));
            lines.push(format!("  Tip: {}", money(person.tip)));
            lines.push(String::new());
        }

        lines.push(format!("Calculated Total: {}", money(summary.calculated_total)));
        lines.push(format!("Receipt Total: {}", money(summary.receipt_total)));
        match summary.reconciliation {
            Reconciliation::Match => lines.push("Totals match perfectly!".to_string()),
            Reconciliation::Mismatch { .. } => {
                lines.push(format!(
                    "Difference: {}",
                    money(summary.reconciliation.abs_difference())
                ));
                lines.push(
                    "Note: There's a small discrepancy. Please review your assignments."
                        .to_string(),
                );
            }
        }

        lines.join("\n")
    }
}
