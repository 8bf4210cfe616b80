//! Reorder alert evaluation.
//!
//! Pure function over a snapshot of (product, stock) pairs for one store. No
//! side effects; output order follows input order.

use serde::{Deserialize, Serialize};

use stockline_core::ProductId;

use crate::product::Product;
use crate::stock::StockRecord;

/// Fixed reorder buffer added on top of the threshold gap. Policy constant,
/// not derived from demand.
pub const REORDER_BUFFER: i64 = 10;

/// Alert urgency band.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Urgency {
    High,
    Medium,
}

/// One reorder alert for a below-threshold stock row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAlert {
    pub product_id: ProductId,
    pub product_name: String,
    pub stock_level: i64,
    pub min_threshold: i64,
    pub urgency: Urgency,
    pub suggested_order: i64,
}

/// Classify every below-threshold pair in the snapshot.
///
/// Urgency is `High` when the level has fallen below half the threshold
/// (floating-point half, so an odd threshold of 21 breaks at 10.5), otherwise
/// `Medium`. The suggested order refills to threshold plus [`REORDER_BUFFER`].
pub fn evaluate_alerts(snapshot: &[(Product, StockRecord)]) -> Vec<StockAlert> {
    snapshot
        .iter()
        .filter(|(_, record)| record.is_below_threshold())
        .map(|(product, record)| {
            let level = record.stock_level();
            let threshold = record.min_threshold();
            let urgency = if (level as f64) < (threshold as f64) / 2.0 {
                Urgency::High
            } else {
                Urgency::Medium
            };

            StockAlert {
                product_id: product.id().clone(),
                product_name: product.name().to_string(),
                stock_level: level,
                min_threshold: threshold,
                urgency,
                suggested_order: threshold - level + REORDER_BUFFER,
            }
        })
        .collect()
}
