//! Deterministic demo data for dev wiring.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use stockline_core::{ActorId, LedgerResult, ProductId, StoreId, SupplierId};
use stockline_inventory::{Product, StockRecord};

use crate::ledger::LedgerService;
use crate::store::InventoryStore;

/// Provision a small deterministic catalog: three products across three
/// stores, with a short sales trail per store so the forecast path has
/// something to chew on.
pub fn load_demo<S: InventoryStore>(
    ledger: &LedgerService<S>,
    actor: &ActorId,
    now: DateTime<Utc>,
) -> LedgerResult<()> {
    let catalog: [(&str, &str, &str, Decimal, &str); 3] = [
        ("P001", "T-Shirt", "Clothing", Decimal::new(1999, 2), "S001"),
        ("P002", "Jeans", "Clothing", Decimal::new(4999, 2), "S001"),
        ("P003", "Sneakers", "Footwear", Decimal::new(7999, 2), "S002"),
    ];
    let stores = ["store1", "store2", "store3"];
    // Levels chosen to cover all alert bands: deep shortfall, shallow
    // shortfall, healthy.
    let levels: [i64; 3] = [8, 15, 60];

    for (id, name, category, price, supplier) in catalog {
        ledger.provision_product(Product::new(
            ProductId::new(id)?,
            name,
            category,
            price,
            SupplierId::new(supplier)?,
            actor,
            now,
        )?)?;
    }

    for store in stores {
        for (offset, (id, ..)) in catalog.iter().enumerate() {
            ledger.provision_stock(StockRecord::new(
                StoreId::new(store)?,
                ProductId::new(*id)?,
                levels[offset],
                20,
                actor,
                now,
            )?)?;

            let sold_at = now - Duration::days(offset as i64 + 1);
            ledger.record_sale(
                &StoreId::new(store)?,
                &ProductId::new(*id)?,
                (offset as i64 + 1) * 2,
                actor,
                sold_at,
            )?;
        }
    }

    tracing::info!("seeded demo catalog: 3 products x 3 stores");
    Ok(())
}
