use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockline_core::{ActorId, LedgerError, LedgerResult, ProductId, StoreId};

/// Composite key of a stock record: one record per (store, product) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordKey {
    pub store_id: StoreId,
    pub product_id: ProductId,
}

impl core::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.store_id, self.product_id)
    }
}

/// Per-(store, product) stock row.
///
/// Invariants: `stock_level >= 0` and `min_threshold >= 0` in every reachable
/// state. The level and the update stamp move together through
/// [`StockRecord::with_delta`], the single transition function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    store_id: StoreId,
    product_id: ProductId,
    stock_level: i64,
    min_threshold: i64,
    last_updated_by: ActorId,
    last_updated_at: DateTime<Utc>,
}

impl StockRecord {
    /// Provision a new stock row.
    pub fn new(
        store_id: StoreId,
        product_id: ProductId,
        stock_level: i64,
        min_threshold: i64,
        actor: &ActorId,
        at: DateTime<Utc>,
    ) -> LedgerResult<Self> {
        if stock_level < 0 {
            return Err(LedgerError::invalid_operation(format!(
                "stock level cannot be negative (got {stock_level})"
            )));
        }
        if min_threshold < 0 {
            return Err(LedgerError::invalid_operation(format!(
                "minimum threshold cannot be negative (got {min_threshold})"
            )));
        }

        Ok(Self {
            store_id,
            product_id,
            stock_level,
            min_threshold,
            last_updated_by: actor.clone(),
            last_updated_at: at,
        })
    }

    /// Reconstruct a row loaded from storage.
    pub fn from_parts(
        store_id: StoreId,
        product_id: ProductId,
        stock_level: i64,
        min_threshold: i64,
        last_updated_by: ActorId,
        last_updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            store_id,
            product_id,
            stock_level,
            min_threshold,
            last_updated_by,
            last_updated_at,
        }
    }

    pub fn key(&self) -> RecordKey {
        RecordKey {
            store_id: self.store_id.clone(),
            product_id: self.product_id.clone(),
        }
    }

    pub fn store_id(&self) -> &StoreId {
        &self.store_id
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn stock_level(&self) -> i64 {
        self.stock_level
    }

    pub fn min_threshold(&self) -> i64 {
        self.min_threshold
    }

    pub fn last_updated_by(&self) -> &ActorId {
        &self.last_updated_by
    }

    pub fn last_updated_at(&self) -> DateTime<Utc> {
        self.last_updated_at
    }

    pub fn is_below_threshold(&self) -> bool {
        self.stock_level < self.min_threshold
    }

    /// Apply a signed delta, returning the updated row.
    ///
    /// A delta that would drive the level below zero (or overflow) is an
    /// `InvalidOperation` and `self` is untouched. A zero delta is legal and a
    /// true no-op: neither the level nor the audit stamp changes.
    pub fn with_delta(
        &self,
        delta: i64,
        actor: &ActorId,
        at: DateTime<Utc>,
    ) -> LedgerResult<StockRecord> {
        if delta == 0 {
            return Ok(self.clone());
        }

        let next = self.stock_level.checked_add(delta).ok_or_else(|| {
            LedgerError::invalid_operation(format!(
                "delta {delta} overflows stock level {}",
                self.stock_level
            ))
        })?;
        if next < 0 {
            return Err(LedgerError::invalid_operation(format!(
                "delta {delta} would drive stock level {} below zero",
                self.stock_level
            )));
        }

        Ok(Self {
            stock_level: next,
            last_updated_by: actor.clone(),
            last_updated_at: at,
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn actor() -> ActorId {
        ActorId::new("casey").unwrap()
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 10, 15, 31, 6).unwrap()
    }

    fn record(level: i64, threshold: i64) -> StockRecord {
        StockRecord::new(
            StoreId::new("store1").unwrap(),
            ProductId::new("P001").unwrap(),
            level,
            threshold,
            &actor(),
            at(),
        )
        .unwrap()
    }

    #[test]
    fn provisioning_rejects_negative_level_and_threshold() {
        assert!(
            StockRecord::new(
                StoreId::new("store1").unwrap(),
                ProductId::new("P001").unwrap(),
                -1,
                20,
                &actor(),
                at(),
            )
            .is_err()
        );
        assert!(
            StockRecord::new(
                StoreId::new("store1").unwrap(),
                ProductId::new("P001").unwrap(),
                5,
                -1,
                &actor(),
                at(),
            )
            .is_err()
        );
    }

    #[test]
    fn positive_delta_moves_level_and_stamp() {
        let rec = record(10, 20);
        let editor = ActorId::new("morgan").unwrap();
        let later = Utc.with_ymd_and_hms(2025, 4, 11, 8, 0, 0).unwrap();

        let next = rec.with_delta(5, &editor, later).unwrap();

        assert_eq!(next.stock_level(), 15);
        assert_eq!(next.last_updated_by(), &editor);
        assert_eq!(next.last_updated_at(), later);
    }

    #[test]
    fn zero_delta_is_a_true_noop() {
        let rec = record(10, 20);
        let editor = ActorId::new("morgan").unwrap();
        let later = Utc.with_ymd_and_hms(2025, 4, 11, 8, 0, 0).unwrap();

        let next = rec.with_delta(0, &editor, later).unwrap();

        assert_eq!(next, rec);
        assert_eq!(next.last_updated_by(), &actor());
        assert_eq!(next.last_updated_at(), at());
    }

    #[test]
    fn draining_below_zero_is_rejected() {
        let rec = record(3, 20);
        let err = rec.with_delta(-4, &actor(), at()).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidOperation(_)));
        // Draining to exactly zero is fine.
        let drained = rec.with_delta(-3, &actor(), at()).unwrap();
        assert_eq!(drained.stock_level(), 0);
    }

    #[test]
    fn overflowing_delta_is_rejected() {
        let rec = record(1, 20);
        let err = rec.with_delta(i64::MAX, &actor(), at()).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidOperation(_)));
    }

    #[test]
    fn below_threshold_is_strict() {
        assert!(record(19, 20).is_below_threshold());
        assert!(!record(20, 20).is_below_threshold());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: no sequence of deltas can drive the level negative —
            /// every accepted transition lands at >= 0, every rejected one
            /// leaves the row exactly as it was.
            #[test]
            fn stock_level_never_goes_negative(
                initial in 0i64..10_000,
                deltas in proptest::collection::vec(-500i64..500, 0..64)
            ) {
                let mut rec = record(initial, 20);
                for delta in deltas {
                    let before = rec.clone();
                    match rec.with_delta(delta, &actor(), at()) {
                        Ok(next) => {
                            prop_assert!(next.stock_level() >= 0);
                            rec = next;
                        }
                        // Rejected transitions leave the row as it was.
                        Err(_) => prop_assert_eq!(&rec, &before),
                    }
                }
            }

            /// Property: with_delta is deterministic — the same row and delta
            /// always produce the same outcome.
            #[test]
            fn with_delta_is_deterministic(
                initial in 0i64..10_000,
                delta in -10_000i64..10_000
            ) {
                let rec = record(initial, 20);
                let a = rec.with_delta(delta, &actor(), at());
                let b = rec.with_delta(delta, &actor(), at());
                prop_assert_eq!(a, b);
            }

            /// Property: accepted deltas sum exactly (no lost or duplicated
            /// units across a sequence of applications).
            #[test]
            fn accepted_deltas_sum_exactly(
                initial in 0i64..1_000,
                deltas in proptest::collection::vec(-100i64..100, 0..32)
            ) {
                let mut rec = record(initial, 20);
                let mut expected = initial;
                for delta in deltas {
                    if let Ok(next) = rec.with_delta(delta, &actor(), at()) {
                        expected += delta;
                        rec = next;
                    }
                }
                prop_assert_eq!(rec.stock_level(), expected);
            }
        }
    }
}
