use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Receipt
// =============================================================================

/// A single printed line on a receipt.
///
/// Produced once by the receipt analyzer and never mutated afterwards.
/// Shared into every [`AssignedItem`] that refers to it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReceiptItem {
    pub id: Uuid,
    pub name: String,
    /// Unit price.
    pub price: f64,
    pub quantity: u32,
}

impl ReceiptItem {
    pub fn new(name: impl Into<String>, price: f64, quantity: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            price,
            quantity,
        }
    }

    /// Price of the whole line (`price × quantity`).
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// A merchant receipt.
///
/// `total` is the merchant-stated total. It is never recomputed from `items`
/// and may disagree with their sum.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: Uuid,
    /// Items in printed order.
    pub items: Vec<Arc<ReceiptItem>>,
    pub tax: f64,
    pub tip: f64,
    pub total: f64,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

impl Receipt {
    pub fn new(items: Vec<ReceiptItem>, tax: f64, tip: f64, total: f64, currency: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            items: items.into_iter().map(Arc::new).collect(),
            tax,
            tip,
            total,
            currency: currency.to_string(),
            created_at: Utc::now(),
        }
    }

    /// Look up an item by identifier.
    pub fn item(&self, item_id: Uuid) -> Option<&Arc<ReceiptItem>> {
        self.items.iter().find(|item| item.id == item_id)
    }
}

// =============================================================================
// People and assignments
// =============================================================================

/// A claim that a person consumed `quantity` units of a receipt item at
/// `share_percentage` of that portion's cost.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssignedItem {
    pub id: Uuid,
    pub receipt_item: Arc<ReceiptItem>,
    pub quantity: u32,
    /// Fraction of the cost carried by this person (0.0 to 1.0).
    pub share_percentage: f64,
}

impl AssignedItem {
    pub fn new(receipt_item: Arc<ReceiptItem>, quantity: u32, share_percentage: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            receipt_item,
            quantity,
            share_percentage,
        }
    }

    /// `price × quantity × share_percentage`.
    pub fn total_price(&self) -> f64 {
        self.receipt_item.price * f64::from(self.quantity) * self.share_percentage
    }
}

/// A person at the table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: Uuid,
    pub name: String,
    pub assignments: Vec<AssignedItem>,
}

impl Person {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            assignments: Vec::new(),
        }
    }

    /// Case-insensitive name comparison.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }

    /// Sum of this person's assigned item prices, before tax and tip.
    pub fn subtotal(&self) -> f64 {
        self.assignments.iter().map(AssignedItem::total_price).sum()
    }

    /// Whether any assignment refers to the given receipt item.
    pub fn has_item(&self, item_id: Uuid) -> bool {
        self.assignments
            .iter()
            .any(|assigned| assigned.receipt_item.id == item_id)
    }
}

// =============================================================================
// Conversation
// =============================================================================

/// One entry in the append-only conversation log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub id: Uuid,
    pub text: String,
    pub is_user: bool,
    pub timestamp: DateTime<Utc>,
}

impl ConversationMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text.into(), true)
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(text.into(), false)
    }

    fn new(text: String, is_user: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            is_user,
            timestamp: Utc::now(),
        }
    }
}

// =============================================================================
// Session state
// =============================================================================

/// Coarse state of a splitting session, derived from the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No receipt loaded yet.
    AwaitingReceipt,
    /// Receipt loaded, some items unassigned or nobody on the roster.
    AwaitingAssignment,
    /// Every item assigned to at least one person.
    Complete,
}
