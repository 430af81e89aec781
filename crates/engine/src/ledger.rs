//! Inventory ledger: read-modify-write stock mutations against the store.

use domain::{ProductId, StockChange, StockError, VariantChoice};
use store::{RecordStore, StoreError};
use thiserror::Error;

/// Errors from inventory ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The product record does not exist.
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    /// The variant selector did not match; no mutation was performed.
    #[error(transparent)]
    Stock(#[from] StockError),

    /// A record store read or write failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result of an applied stock mutation, with enough context for alerting.
#[derive(Debug, Clone)]
pub struct LedgerEntry {
    pub product_id: ProductId,
    pub product_name: String,
    pub change: StockChange,
}

/// Computes and applies stock deltas for simple-stock products and
/// color×size variant matrices.
///
/// Each operation is a defensive re-read of the product followed by a
/// write-back of the full record with only the affected slot changed;
/// sibling variants are never clobbered.
pub struct InventoryLedger<S> {
    store: S,
}

impl<S: RecordStore> InventoryLedger<S> {
    /// Creates a new ledger over the given record store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Deducts `quantity` from the product or its selected variant,
    /// clamped at zero.
    #[tracing::instrument(skip(self))]
    pub async fn deduct(
        &self,
        product_id: &ProductId,
        selector: Option<&VariantChoice>,
        quantity: u32,
    ) -> Result<LedgerEntry, LedgerError> {
        self.mutate(product_id, selector, |product, sel| product.deduct(sel, quantity))
            .await
    }

    /// Restores `quantity` to the product or its selected variant.
    ///
    /// Unclamped: multiple partial restores may exceed the original level.
    #[tracing::instrument(skip(self))]
    pub async fn restore(
        &self,
        product_id: &ProductId,
        selector: Option<&VariantChoice>,
        quantity: u32,
    ) -> Result<LedgerEntry, LedgerError> {
        self.mutate(product_id, selector, |product, sel| product.restore(sel, quantity))
            .await
    }

    /// Returns the product's total availability.
    pub async fn total_stock(&self, product_id: &ProductId) -> Result<u32, LedgerError> {
        let product = self
            .store
            .get_product(product_id)
            .await?
            .ok_or_else(|| LedgerError::ProductNotFound(product_id.clone()))?;
        Ok(product.total_stock())
    }

    async fn mutate(
        &self,
        product_id: &ProductId,
        selector: Option<&VariantChoice>,
        f: impl FnOnce(
            &mut domain::Product,
            Option<&VariantChoice>,
        ) -> Result<StockChange, StockError>,
    ) -> Result<LedgerEntry, LedgerError> {
        let mut product = self
            .store
            .get_product(product_id)
            .await?
            .ok_or_else(|| LedgerError::ProductNotFound(product_id.clone()))?;

        let change = f(&mut product, selector)?;
        let product_name = product.name.clone();
        self.store.update_product(product).await?;

        Ok(LedgerEntry {
            product_id: product_id.clone(),
            product_name,
            change,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{Product, Variant};
    use store::InMemoryRecordStore;

    async fn setup() -> (InventoryLedger<InMemoryRecordStore>, InMemoryRecordStore) {
        let store = InMemoryRecordStore::new();
        store
            .put_product(Product::with_variants(
                "SKU-SHIRT",
                "Shirt",
                vec![Variant::new("Red", "M", 5), Variant::new("Red", "L", 7)],
            ))
            .await
            .unwrap();
        store
            .put_product(Product::with_simple_stock("SKU-MUG", "Mug", 3))
            .await
            .unwrap();
        (InventoryLedger::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_deduct_writes_back_only_the_target_variant() {
        let (ledger, store) = setup().await;
        let id = ProductId::new("SKU-SHIRT");
        let choice = VariantChoice::new("Red", "M");

        let entry = ledger.deduct(&id, Some(&choice), 2).await.unwrap();
        assert_eq!(entry.change.before, 5);
        assert_eq!(entry.change.after, 3);
        assert_eq!(entry.product_name, "Shirt");

        let product = store.get_product(&id).await.unwrap().unwrap();
        assert_eq!(product.total_stock(), 10);
    }

    #[tokio::test]
    async fn test_deduct_unknown_variant_leaves_store_untouched() {
        let (ledger, store) = setup().await;
        let id = ProductId::new("SKU-SHIRT");
        let choice = VariantChoice::new("Green", "XL");

        let err = ledger.deduct(&id, Some(&choice), 1).await.unwrap_err();
        assert!(matches!(err, LedgerError::Stock(StockError::VariantNotFound { .. })));

        let product = store.get_product(&id).await.unwrap().unwrap();
        assert_eq!(product.total_stock(), 12);
    }

    #[tokio::test]
    async fn test_deduct_missing_product() {
        let (ledger, _) = setup().await;
        let err = ledger
            .deduct(&ProductId::new("SKU-GONE"), None, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::ProductNotFound(_)));
    }

    #[tokio::test]
    async fn test_restore_exceeding_baseline() {
        let (ledger, _) = setup().await;
        let id = ProductId::new("SKU-MUG");

        let entry = ledger.restore(&id, None, 10).await.unwrap();
        assert_eq!(entry.change.after, 13);
        assert_eq!(ledger.total_stock(&id).await.unwrap(), 13);
    }
}
