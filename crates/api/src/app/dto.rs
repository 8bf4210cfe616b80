use rust_decimal::Decimal;
use serde::Deserialize;

use stockline_core::StoreId;
use stockline_inventory::{Product, SaleEvent, StockRecord};
use stockline_oracle::{InventoryFact, InventorySnapshot, SaleFact, SalesHistory};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct InventoryUpdateRequest {
    pub store_id: String,
    pub product_id: String,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct PriceUpdateRequest {
    pub store_id: String,
    pub product_id: String,
    pub new_price: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub supplier_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateStockRecordRequest {
    pub store_id: String,
    pub product_id: String,
    pub stock_level: i64,
    pub min_threshold: i64,
}

#[derive(Debug, Deserialize)]
pub struct RecordSaleRequest {
    pub store_id: String,
    pub product_id: String,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    pub days: Option<u32>,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn inventory_row_to_json(row: &(Product, StockRecord)) -> serde_json::Value {
    let (product, record) = row;
    serde_json::json!({
        "product_id": product.id(),
        "name": product.name(),
        "category": product.category(),
        "current_stock": record.stock_level(),
        "min_threshold": record.min_threshold(),
        "price": product.unit_price(),
        "last_updated_by": record.last_updated_by(),
        "last_updated_at": record.last_updated_at().to_rfc3339(),
    })
}

pub fn sale_to_json(sale: &SaleEvent) -> serde_json::Value {
    serde_json::json!({
        "id": sale.id().to_string(),
        "store_id": sale.store_id(),
        "product_id": sale.product_id(),
        "quantity": sale.quantity(),
        "sold_at": sale.sold_at().to_rfc3339(),
        "recorded_by": sale.recorded_by(),
    })
}

/// Project ledger rows into the oracle's fact types. The oracle never sees
/// domain entities.
pub fn snapshot_from_rows(store_id: &StoreId, rows: &[(Product, StockRecord)]) -> InventorySnapshot {
    InventorySnapshot {
        store_id: store_id.clone(),
        items: rows
            .iter()
            .map(|(product, record)| InventoryFact {
                product_id: product.id().clone(),
                name: product.name().to_string(),
                stock_level: record.stock_level(),
                min_threshold: record.min_threshold(),
                last_updated_by: record.last_updated_by().to_string(),
                last_updated_at: record.last_updated_at(),
            })
            .collect(),
    }
}

pub fn history_from_sales(store_id: &StoreId, sales: &[SaleEvent]) -> SalesHistory {
    SalesHistory {
        store_id: store_id.clone(),
        sales: sales
            .iter()
            .map(|sale| SaleFact {
                product_id: sale.product_id().clone(),
                quantity: sale.quantity(),
                sold_at: sale.sold_at(),
            })
            .collect(),
    }
}
