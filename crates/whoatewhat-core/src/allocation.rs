//! Proportional cost allocation.
//!
//! Tax and tip are split in proportion to each person's share of the
//! receipt's item subtotal. All functions are pure.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{Person, Receipt};

/// Default tolerance under which calculated and stated totals are considered equal.
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// Sum of a person's assigned item prices.
pub fn subtotal(person: &Person) -> f64 {
    person.subtotal()
}

/// The merchant's pre-tax/tip basis: `Σ price × quantity` over every item.
pub fn receipt_subtotal(receipt: &Receipt) -> f64 {
    receipt.items.iter().map(|item| item.line_total()).sum()
}

/// Person's share of the receipt tax.
pub fn tax_share(person: &Person, receipt: &Receipt) -> f64 {
    proportional_share(person, receipt, receipt.tax)
}

/// Person's share of the receipt tip.
pub fn tip_share(person: &Person, receipt: &Receipt) -> f64 {
    proportional_share(person, receipt, receipt.tip)
}

/// Subtotal plus tax and tip shares.
pub fn final_total(person: &Person, receipt: &Receipt) -> f64 {
    subtotal(person) + tax_share(person, receipt) + tip_share(person, receipt)
}

/// Sum of every person's final total. Used only for reconciliation.
pub fn calculated_total(people: &[Person], receipt: &Receipt) -> f64 {
    people.iter().map(|p| final_total(p, receipt)).sum()
}

fn proportional_share(person: &Person, receipt: &Receipt, amount: f64) -> f64 {
    let basis = receipt_subtotal(receipt);
    if basis > 0.0 {
        (subtotal(person) / basis) * amount
    } else {
        0.0
    }
}

// =============================================================================
// Reconciliation
// =============================================================================

/// Outcome of comparing the calculated total against the receipt total.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Reconciliation {
    Match,
    /// `difference` is `calculated − stated`.
    Mismatch { difference: f64 },
}

impl Reconciliation {
    /// Classify a calculated total against the stated one.
    ///
    /// Strictly below `tolerance` is a match; equal to or above is a mismatch.
    pub fn classify(calculated: f64, stated: f64, tolerance: f64) -> Self {
        let difference = calculated - stated;
        if difference.abs() < tolerance {
            Reconciliation::Match
        } else {
            Reconciliation::Mismatch { difference }
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, Reconciliation::Match)
    }

    /// Unsigned difference, zero for a match.
    pub fn abs_difference(&self) -> f64 {
        match self {
            Reconciliation::Match => 0.0,
            Reconciliation::Mismatch { difference } => difference.abs(),
        }
    }
}

// =============================================================================
// Summary
// =============================================================================

/// One assigned line in a person's breakdown.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineShare {
    pub name: String,
    pub quantity: u32,
    pub share_percentage: f64,
    pub amount: f64,
}

/// A person's full cost breakdown.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersonBreakdown {
    pub name: String,
    pub items: Vec<LineShare>,
    pub subtotal: f64,
    pub tax: f64,
    pub tip: f64,
    pub total: f64,
}

impl PersonBreakdown {
    pub fn for_person(person: &Person, receipt: &Receipt) -> Self {
        let items = person
            .assignments
            .iter()
            .map(|assigned| LineShare {
                name: assigned.receipt_item.name.clone(),
                quantity: assigned.quantity,
                share_percentage: assigned.share_percentage,
                amount: assigned.total_price(),
            })
            .collect();

        let subtotal = subtotal(person);
        let tax = tax_share(person, receipt);
        let tip = tip_share(person, receipt);

        Self {
            name: person.name.clone(),
            items,
            subtotal,
            tax,
            tip,
            total: subtotal + tax + tip,
        }
    }
}

/// The whole-table view: every person's breakdown plus reconciliation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SplitSummary {
    pub people: Vec<PersonBreakdown>,
    pub calculated_total: f64,
    pub receipt_total: f64,
    pub currency: String,
    pub reconciliation: Reconciliation,
}

/// Build the summary for a roster against a receipt.
pub fn summarize(people: &[Person], receipt: &Receipt, tolerance: f64) -> SplitSummary {
    let breakdowns: Vec<PersonBreakdown> = people
        .iter()
        .map(|p| PersonBreakdown::for_person(p, receipt))
        .collect();
    let calculated = breakdowns.iter().map(|b| b.total).sum();
    let reconciliation = Reconciliation::classify(calculated, receipt.total, tolerance);

    if let Reconciliation::Mismatch { difference } = reconciliation {
        debug!(
            calculated,
            stated = receipt.total,
            difference,
            "Calculated total differs from receipt total"
        );
    }

    SplitSummary {
        people: breakdowns,
        calculated_total: calculated,
        receipt_total: receipt.total,
        currency: receipt.currency.clone(),
        reconciliation,
    }
}
