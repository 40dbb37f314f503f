//! Boundary with the receipt analyzer.
//!
//! The analyzer itself (image capture, vision model call) lives outside this
//! crate. It hands over either a parsed [`Receipt`] or an [`AnalysisError`].

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::types::{Receipt, ReceiptItem};

/// Why receipt analysis failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("Failed to process the image")]
    ImageProcessingFailed,
    #[error("Invalid API URL")]
    InvalidUrl,
    #[error("No data received from server")]
    NoData,
    #[error("Invalid response from server")]
    InvalidResponse,
}

/// Tagged result of one analysis run.
pub type AnalysisResult = std::result::Result<Receipt, AnalysisError>;

#[derive(Debug, Deserialize)]
struct RawReceipt {
    #[serde(default)]
    items: Vec<RawItem>,
    #[serde(default)]
    tax: f64,
    #[serde(default)]
    tip: f64,
    #[serde(default)]
    total: f64,
    #[serde(default = "default_currency")]
    currency: String,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    name: String,
    price: f64,
    #[serde(default = "default_quantity")]
    quantity: u32,
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_quantity() -> u32 {
    1
}

/// Parse a receipt from an analyzer reply.
///
/// The reply may wrap the JSON object in prose or markdown fences; everything
/// between the first `{` and the last `}` is taken as the payload.
pub fn parse_receipt_response(text: &str) -> AnalysisResult {
    let (start, end) = match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => (start, end),
        _ => {
            warn!("Analyzer reply contains no JSON object");
            return Err(AnalysisError::InvalidResponse);
        }
    };

    let raw: RawReceipt = serde_json::from_str(&text[start..=end]).map_err(|e| {
        warn!("Analyzer reply is not a valid receipt: {}", e);
        AnalysisError::InvalidResponse
    })?;

    validate(&raw)?;

    let items: Vec<ReceiptItem> = raw
        .items
        .into_iter()
        .map(|item| ReceiptItem::new(item.name.trim(), item.price, item.quantity))
        .collect();

    debug!(items = items.len(), total = raw.total, "Parsed receipt");
    Ok(Receipt::new(items, raw.tax, raw.tip, raw.total, &raw.currency))
}

fn validate(raw: &RawReceipt) -> Result<(), AnalysisError> {
    let amounts_ok = [raw.tax, raw.tip, raw.total]
        .iter()
        .all(|v| v.is_finite() && *v >= 0.0);
    let items_ok = raw
        .items
        .iter()
        .all(|item| item.price.is_finite() && item.price >= 0.0 && item.quantity > 0);

    if amounts_ok && items_ok {
        Ok(())
    } else {
        warn!("Analyzer returned negative amounts or zero quantities");
        Err(AnalysisError::InvalidResponse)
    }
}

/// The fixed receipt used when no analyzer is available.
pub fn demo_receipt() -> Receipt {
    Receipt::new(
        vec![
            ReceiptItem::new("Burger", 12.99, 1),
            ReceiptItem::new("Fries", 4.99, 1),
            ReceiptItem::new("Coke", 2.99, 2),
            ReceiptItem::new("Salad", 8.99, 1),
            ReceiptItem::new("Wine", 15.99, 1),
        ],
        3.99,
        6.50,
        52.44,
        "USD",
    )
}
