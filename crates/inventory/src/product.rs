use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockline_core::{ActorId, LedgerError, LedgerResult, ProductId, SupplierId};

/// Catalog row: a product that can be stocked by any store.
///
/// Immutable after provisioning except for `unit_price` and the update
/// audit stamp, which change only through [`Product::reprice`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    category: String,
    unit_price: Decimal,
    supplier_id: SupplierId,
    created_by: ActorId,
    created_at: DateTime<Utc>,
    last_updated_by: ActorId,
    last_updated_at: DateTime<Utc>,
}

impl Product {
    /// Provision a new product row.
    ///
    /// The unit price may be zero (free/promo items) but never negative.
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        category: impl Into<String>,
        unit_price: Decimal,
        supplier_id: SupplierId,
        actor: &ActorId,
        at: DateTime<Utc>,
    ) -> LedgerResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(LedgerError::invalid_operation("product name cannot be empty"));
        }
        if unit_price < Decimal::ZERO {
            return Err(LedgerError::invalid_operation(format!(
                "unit price cannot be negative (got {unit_price})"
            )));
        }

        Ok(Self {
            id,
            name,
            category: category.into(),
            unit_price,
            supplier_id,
            created_by: actor.clone(),
            created_at: at,
            last_updated_by: actor.clone(),
            last_updated_at: at,
        })
    }

    /// Reconstruct a row loaded from storage. Skips provisioning validation;
    /// storage adapters are trusted to hand back rows that were valid when
    /// written.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: ProductId,
        name: String,
        category: String,
        unit_price: Decimal,
        supplier_id: SupplierId,
        created_by: ActorId,
        created_at: DateTime<Utc>,
        last_updated_by: ActorId,
        last_updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            category,
            unit_price,
            supplier_id,
            created_by,
            created_at,
            last_updated_by,
            last_updated_at,
        }
    }

    pub fn id(&self) -> &ProductId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    pub fn supplier_id(&self) -> &SupplierId {
        &self.supplier_id
    }

    pub fn created_by(&self) -> &ActorId {
        &self.created_by
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_updated_by(&self) -> &ActorId {
        &self.last_updated_by
    }

    pub fn last_updated_at(&self) -> DateTime<Utc> {
        self.last_updated_at
    }

    /// Change the unit price. The new price must be strictly positive; the
    /// price and the update stamp change together or not at all.
    pub fn reprice(
        &mut self,
        new_price: Decimal,
        actor: &ActorId,
        at: DateTime<Utc>,
    ) -> LedgerResult<()> {
        if new_price <= Decimal::ZERO {
            return Err(LedgerError::invalid_operation(format!(
                "price must be positive (got {new_price})"
            )));
        }
        self.unit_price = new_price;
        self.last_updated_by = actor.clone();
        self.last_updated_at = at;
        Ok(())
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

    fn tshirt() -> Product {
        Product::new(
            ProductId::new("P001").unwrap(),
            "T-Shirt",
            "Clothing",
            Decimal::new(1999, 2),
            SupplierId::new("S001").unwrap(),
            &actor(),
            at(),
        )
        .unwrap()
    }

    #[test]
    fn provisioning_stamps_both_audit_fields() {
        let p = tshirt();
        assert_eq!(p.created_by(), &actor());
        assert_eq!(p.last_updated_by(), &actor());
        assert_eq!(p.created_at(), at());
        assert_eq!(p.last_updated_at(), at());
    }

    #[test]
    fn negative_price_is_rejected_at_provisioning() {
        let err = Product::new(
            ProductId::new("P001").unwrap(),
            "T-Shirt",
            "Clothing",
            Decimal::new(-1, 0),
            SupplierId::new("S001").unwrap(),
            &actor(),
            at(),
        )
        .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidOperation(_)));
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = Product::new(
            ProductId::new("P001").unwrap(),
            "   ",
            "Clothing",
            Decimal::ZERO,
            SupplierId::new("S001").unwrap(),
            &actor(),
            at(),
        )
        .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidOperation(_)));
    }

    #[test]
    fn reprice_updates_price_and_stamp_together() {
        let mut p = tshirt();
        let editor = ActorId::new("morgan").unwrap();
        let later = Utc.with_ymd_and_hms(2025, 4, 11, 9, 0, 0).unwrap();

        p.reprice(Decimal::new(2499, 2), &editor, later).unwrap();

        assert_eq!(p.unit_price(), Decimal::new(2499, 2));
        assert_eq!(p.last_updated_by(), &editor);
        assert_eq!(p.last_updated_at(), later);
        // Creation stamp never moves.
        assert_eq!(p.created_by(), &actor());
        assert_eq!(p.created_at(), at());
    }

    #[test]
    fn reprice_rejects_zero_and_negative_and_leaves_row_unchanged() {
        let mut p = tshirt();
        let before = p.clone();

        for bad in [Decimal::ZERO, Decimal::new(-500, 2)] {
            let err = p.reprice(bad, &actor(), at()).unwrap_err();
            assert!(matches!(err, LedgerError::InvalidOperation(_)));
            assert_eq!(p, before);
        }
    }
}
