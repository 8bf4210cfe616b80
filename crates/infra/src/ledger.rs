//! The inventory ledger service: the single writer path for stock records and
//! product prices.
//!
//! Concurrency model: every read-check-write on a stock record is serialized
//! by a per-key lock (same for price updates, per product). Different keys
//! proceed in parallel; the only global section is the short map access that
//! hands out the key's lock. Reads go straight to the store and observe a
//! consistent row via its interior locking.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use stockline_core::{ActorId, LedgerError, LedgerResult, ProductId, StoreId};
use stockline_inventory::{
    evaluate_alerts, Product, RecordKey, SaleEvent, StockAlert, StockRecord,
};

use crate::store::InventoryStore;

type KeyLock = Arc<Mutex<()>>;

/// Lazily-populated lock registry keyed by `K`. Locks are never removed; the
/// key space (provisioned pairs/products) is small and bounded.
#[derive(Debug)]
struct LockRegistry<K> {
    locks: Mutex<HashMap<K, KeyLock>>,
}

impl<K> Default for LockRegistry<K> {
    fn default() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }
}

impl<K: std::hash::Hash + Eq + Clone> LockRegistry<K> {
    fn acquire(&self, key: &K) -> LedgerResult<KeyLock> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| LedgerError::storage_unavailable("lock registry poisoned"))?;
        Ok(locks.entry(key.clone()).or_default().clone())
    }
}

/// Ledger over an [`InventoryStore`].
pub struct LedgerService<S> {
    store: Arc<S>,
    record_locks: LockRegistry<RecordKey>,
    product_locks: LockRegistry<ProductId>,
}

impl<S: InventoryStore> LedgerService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            record_locks: LockRegistry::default(),
            product_locks: LockRegistry::default(),
        }
    }

    /// Apply a signed delta to a stock record, returning the new level.
    ///
    /// The read-check-write is atomic per key: concurrent deltas on the same
    /// pair serialize, so no update is lost. A delta that would drive the
    /// level negative fails with `InvalidOperation` and writes nothing; a
    /// zero delta is validated but writes nothing either (the audit stamp
    /// only moves when the level does).
    pub fn apply_delta(
        &self,
        store_id: &StoreId,
        product_id: &ProductId,
        delta: i64,
        actor: &ActorId,
        timestamp: DateTime<Utc>,
    ) -> LedgerResult<i64> {
        let key = RecordKey {
            store_id: store_id.clone(),
            product_id: product_id.clone(),
        };
        let lock = self.record_locks.acquire(&key)?;
        let _guard = lock
            .lock()
            .map_err(|_| LedgerError::storage_unavailable("record lock poisoned"))?;

        let record = self
            .store
            .get(store_id, product_id)?
            .ok_or_else(LedgerError::not_found)?;
        let updated = record.with_delta(delta, actor, timestamp)?;
        if delta != 0 {
            self.store.upsert(updated.clone())?;
        }

        tracing::debug!(
            store_id = %store_id,
            product_id = %product_id,
            delta,
            stock_level = updated.stock_level(),
            "applied stock delta"
        );
        Ok(updated.stock_level())
    }

    /// Change a product's unit price. Must be strictly positive; price and
    /// update stamp commit together.
    pub fn update_price(
        &self,
        product_id: &ProductId,
        new_price: Decimal,
        actor: &ActorId,
        timestamp: DateTime<Utc>,
    ) -> LedgerResult<()> {
        let lock = self.product_locks.acquire(product_id)?;
        let _guard = lock
            .lock()
            .map_err(|_| LedgerError::storage_unavailable("product lock poisoned"))?;

        let mut product = self
            .store
            .get_product(product_id)?
            .ok_or_else(LedgerError::not_found)?;
        product.reprice(new_price, actor, timestamp)?;
        self.store.upsert_product(product)?;

        tracing::debug!(product_id = %product_id, price = %new_price, "updated price");
        Ok(())
    }

    /// All (product, stock) pairs for a store. A store with zero records is
    /// `NotFound` (the 404-when-empty policy of the read endpoint).
    pub fn read_inventory(&self, store_id: &StoreId) -> LedgerResult<Vec<(Product, StockRecord)>> {
        let rows = self.store.list_by_store(store_id)?;
        if rows.is_empty() {
            return Err(LedgerError::NotFound);
        }
        Ok(rows)
    }

    /// Below-threshold pairs for a store. Empty is a valid answer.
    pub fn low_stock(&self, store_id: &StoreId) -> LedgerResult<Vec<(Product, StockRecord)>> {
        Ok(self.store.list_below_threshold(store_id)?)
    }

    /// Reorder alerts for a store. Empty is a valid answer — deliberately
    /// distinct from `read_inventory`'s not-found policy.
    pub fn alerts(&self, store_id: &StoreId) -> LedgerResult<Vec<StockAlert>> {
        let rows = self.low_stock(store_id)?;
        Ok(evaluate_alerts(&rows))
    }

    /// Record a sale against a provisioned (store, product) pair.
    pub fn record_sale(
        &self,
        store_id: &StoreId,
        product_id: &ProductId,
        quantity: i64,
        actor: &ActorId,
        timestamp: DateTime<Utc>,
    ) -> LedgerResult<SaleEvent> {
        if self.store.get(store_id, product_id)?.is_none() {
            return Err(LedgerError::NotFound);
        }
        let sale = SaleEvent::record(
            store_id.clone(),
            product_id.clone(),
            quantity,
            actor,
            timestamp,
        )?;
        self.store.append_sale(sale.clone())?;
        Ok(sale)
    }

    /// Recorded sales for a store, oldest first.
    pub fn sales_history(&self, store_id: &StoreId) -> LedgerResult<Vec<SaleEvent>> {
        Ok(self.store.list_sales(store_id)?)
    }

    /// First-time creation of a product row.
    pub fn provision_product(&self, product: Product) -> LedgerResult<()> {
        let lock = self.product_locks.acquire(product.id())?;
        let _guard = lock
            .lock()
            .map_err(|_| LedgerError::storage_unavailable("product lock poisoned"))?;

        if self.store.get_product(product.id())?.is_some() {
            return Err(LedgerError::invalid_operation(format!(
                "product {} is already provisioned",
                product.id()
            )));
        }
        self.store.upsert_product(product)?;
        Ok(())
    }

    /// First-time creation of a stock record. The product must exist and the
    /// (store, product) pair must not.
    pub fn provision_stock(&self, record: StockRecord) -> LedgerResult<()> {
        if self.store.get_product(record.product_id())?.is_none() {
            return Err(LedgerError::NotFound);
        }

        let key = record.key();
        let lock = self.record_locks.acquire(&key)?;
        let _guard = lock
            .lock()
            .map_err(|_| LedgerError::storage_unavailable("record lock poisoned"))?;

        if self.store.get(record.store_id(), record.product_id())?.is_some() {
            return Err(LedgerError::invalid_operation(format!(
                "stock record {key} already exists"
            )));
        }
        self.store.upsert(record)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use stockline_core::SupplierId;
    use stockline_inventory::Urgency;

    use crate::store::InMemoryInventoryStore;

    fn actor() -> ActorId {
        ActorId::new("casey").unwrap()
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 10, 15, 31, 6).unwrap()
    }

    fn store_id(s: &str) -> StoreId {
        StoreId::new(s).unwrap()
    }

    fn product_id(p: &str) -> ProductId {
        ProductId::new(p).unwrap()
    }

    fn service() -> LedgerService<InMemoryInventoryStore> {
        let service = LedgerService::new(Arc::new(InMemoryInventoryStore::new()));
        service
            .provision_product(
                Product::new(
                    product_id("P001"),
                    "T-Shirt",
                    "Clothing",
                    Decimal::new(1999, 2),
                    SupplierId::new("S001").unwrap(),
                    &actor(),
                    at(),
                )
                .unwrap(),
            )
            .unwrap();
        service
            .provision_stock(
                StockRecord::new(store_id("store1"), product_id("P001"), 10, 20, &actor(), at())
                    .unwrap(),
            )
            .unwrap();
        service
    }

    #[test]
    fn apply_delta_round_trips_through_read_inventory() {
        let service = service();
        let editor = ActorId::new("morgan").unwrap();
        let later = Utc.with_ymd_and_hms(2025, 4, 11, 9, 0, 0).unwrap();

        let level = service
            .apply_delta(&store_id("store1"), &product_id("P001"), 5, &editor, later)
            .unwrap();
        assert_eq!(level, 15);

        let rows = service.read_inventory(&store_id("store1")).unwrap();
        assert_eq!(rows.len(), 1);
        let record = &rows[0].1;
        assert_eq!(record.stock_level(), 15);
        assert_eq!(record.last_updated_by(), &editor);
        assert_eq!(record.last_updated_at(), later);
    }

    #[test]
    fn zero_delta_changes_nothing_but_succeeds() {
        let service = service();
        let editor = ActorId::new("morgan").unwrap();
        let later = Utc.with_ymd_and_hms(2025, 4, 11, 9, 0, 0).unwrap();

        let level = service
            .apply_delta(&store_id("store1"), &product_id("P001"), 0, &editor, later)
            .unwrap();
        assert_eq!(level, 10);

        let rows = service.read_inventory(&store_id("store1")).unwrap();
        let record = &rows[0].1;
        assert_eq!(record.stock_level(), 10);
        assert_eq!(record.last_updated_by(), &actor());
        assert_eq!(record.last_updated_at(), at());
    }

    #[test]
    fn overdraining_fails_and_leaves_state_unchanged() {
        let service = service();
        let err = service
            .apply_delta(&store_id("store1"), &product_id("P001"), -11, &actor(), at())
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidOperation(_)));

        let rows = service.read_inventory(&store_id("store1")).unwrap();
        assert_eq!(rows[0].1.stock_level(), 10);
        assert_eq!(rows[0].1.last_updated_by(), &actor());
    }

    #[test]
    fn unknown_pair_is_not_found() {
        let service = service();
        let err = service
            .apply_delta(&store_id("storeX"), &product_id("P999"), 5, &actor(), at())
            .unwrap_err();
        assert_eq!(err, LedgerError::NotFound);
    }

    #[test]
    fn read_inventory_of_empty_store_is_not_found() {
        let service = service();
        assert_eq!(
            service.read_inventory(&store_id("store9")).unwrap_err(),
            LedgerError::NotFound
        );
    }

    #[test]
    fn alerts_of_empty_store_are_empty_not_missing() {
        let service = service();
        assert!(service.alerts(&store_id("store9")).unwrap().is_empty());
    }

    #[test]
    fn alerts_classify_from_the_live_ledger() {
        let service = service();
        // 10 vs threshold 20: exactly half, so Medium with a 20-unit order.
        let alerts = service.alerts(&store_id("store1")).unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].urgency, Urgency::Medium);
        assert_eq!(alerts[0].suggested_order, 20);

        // Drain to 5: below half, so High.
        service
            .apply_delta(&store_id("store1"), &product_id("P001"), -5, &actor(), at())
            .unwrap();
        let alerts = service.alerts(&store_id("store1")).unwrap();
        assert_eq!(alerts[0].urgency, Urgency::High);
        assert_eq!(alerts[0].suggested_order, 25);
    }

    #[test]
    fn update_price_validates_and_stamps() {
        let service = service();
        let editor = ActorId::new("morgan").unwrap();
        let later = Utc.with_ymd_and_hms(2025, 4, 11, 9, 0, 0).unwrap();

        service
            .update_price(&product_id("P001"), Decimal::new(2499, 2), &editor, later)
            .unwrap();
        let rows = service.read_inventory(&store_id("store1")).unwrap();
        assert_eq!(rows[0].0.unit_price(), Decimal::new(2499, 2));
        assert_eq!(rows[0].0.last_updated_by(), &editor);

        let err = service
            .update_price(&product_id("P001"), Decimal::ZERO, &editor, later)
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidOperation(_)));

        let err = service
            .update_price(&product_id("P999"), Decimal::ONE, &editor, later)
            .unwrap_err();
        assert_eq!(err, LedgerError::NotFound);
    }

    #[test]
    fn provisioning_rejects_duplicates_and_orphans() {
        let service = service();

        let err = service
            .provision_product(
                Product::new(
                    product_id("P001"),
                    "T-Shirt again",
                    "Clothing",
                    Decimal::ONE,
                    SupplierId::new("S001").unwrap(),
                    &actor(),
                    at(),
                )
                .unwrap(),
            )
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidOperation(_)));

        let err = service
            .provision_stock(
                StockRecord::new(store_id("store1"), product_id("P001"), 5, 20, &actor(), at())
                    .unwrap(),
            )
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidOperation(_)));

        // Stock for a product that was never provisioned.
        let err = service
            .provision_stock(
                StockRecord::new(store_id("store1"), product_id("P999"), 5, 20, &actor(), at())
                    .unwrap(),
            )
            .unwrap_err();
        assert_eq!(err, LedgerError::NotFound);
    }

    #[test]
    fn record_sale_validates_pair_and_quantity() {
        let service = service();

        let sale = service
            .record_sale(&store_id("store1"), &product_id("P001"), 3, &actor(), at())
            .unwrap();
        assert_eq!(sale.quantity(), 3);
        assert_eq!(service.sales_history(&store_id("store1")).unwrap().len(), 1);

        let err = service
            .record_sale(&store_id("store1"), &product_id("P001"), 0, &actor(), at())
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidOperation(_)));

        let err = service
            .record_sale(&store_id("storeX"), &product_id("P001"), 1, &actor(), at())
            .unwrap_err();
        assert_eq!(err, LedgerError::NotFound);
    }

    #[test]
    fn parallel_increments_on_one_key_are_never_lost() {
        let service = LedgerService::new(Arc::new(InMemoryInventoryStore::new()));
        service
            .provision_product(
                Product::new(
                    product_id("P001"),
                    "T-Shirt",
                    "Clothing",
                    Decimal::new(1999, 2),
                    SupplierId::new("S001").unwrap(),
                    &actor(),
                    at(),
                )
                .unwrap(),
            )
            .unwrap();
        service
            .provision_stock(
                StockRecord::new(store_id("store1"), product_id("P001"), 0, 20, &actor(), at())
                    .unwrap(),
            )
            .unwrap();

        let threads: i64 = 8;
        let per_thread: i64 = 50;
        std::thread::scope(|scope| {
            for _ in 0..threads {
                scope.spawn(|| {
                    for _ in 0..per_thread {
                        service
                            .apply_delta(
                                &store_id("store1"),
                                &product_id("P001"),
                                1,
                                &actor(),
                                at(),
                            )
                            .unwrap();
                    }
                });
            }
        });

        let rows = service.read_inventory(&store_id("store1")).unwrap();
        assert_eq!(rows[0].1.stock_level(), threads * per_thread);
    }

    #[test]
    fn parallel_mixed_deltas_respect_the_floor() {
        let service = service();
        // 10 on hand; 4 threads racing to take 3 each. At most 3 can win.
        let successes = std::sync::atomic::AtomicI64::new(0);
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    if service
                        .apply_delta(&store_id("store1"), &product_id("P001"), -3, &actor(), at())
                        .is_ok()
                    {
                        successes.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                    }
                });
            }
        });

        let won = successes.load(std::sync::atomic::Ordering::SeqCst);
        assert_eq!(won, 3);
        let rows = service.read_inventory(&store_id("store1")).unwrap();
        assert_eq!(rows[0].1.stock_level(), 10 - 3 * won);
        assert!(rows[0].1.stock_level() >= 0);
    }
}
