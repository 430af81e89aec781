//! Products, variant matrices, and stock arithmetic.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Product identifier (SKU).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Creates a new product ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the product ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ProductId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A (color, size) selector as it appears on a line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantChoice {
    pub color: String,
    pub size: String,
}

impl VariantChoice {
    /// Creates a new variant selector.
    pub fn new(color: impl Into<String>, size: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            size: size.into(),
        }
    }

    /// Returns the normalized lookup key for this selector.
    pub fn key(&self) -> VariantKey {
        VariantKey::new(&self.color, &self.size)
    }

    /// Returns a human-readable label, e.g. `"Red / M"`.
    pub fn label(&self) -> String {
        format!("{} / {}", self.color, self.size)
    }
}

impl std::fmt::Display for VariantChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {}", self.color, self.size)
    }
}

/// Normalized (color, size) key used for variant lookup.
///
/// Variant matching is case-insensitive; normalizing once into a value-typed
/// key replaces repeated case-folded string comparisons.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariantKey {
    color: String,
    size: String,
}

impl VariantKey {
    /// Creates a key by trimming and lowercasing both components.
    pub fn new(color: &str, size: &str) -> Self {
        Self {
            color: color.trim().to_lowercase(),
            size: size.trim().to_lowercase(),
        }
    }
}

/// A single stock-keeping unit within a product's variant matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub color: String,
    pub size: String,
    pub stock: u32,
}

impl Variant {
    /// Creates a new variant with the given stock level.
    pub fn new(color: impl Into<String>, size: impl Into<String>, stock: u32) -> Self {
        Self {
            color: color.into(),
            size: size.into(),
            stock,
        }
    }

    /// Returns the normalized lookup key for this variant.
    pub fn key(&self) -> VariantKey {
        VariantKey::new(&self.color, &self.size)
    }

    /// Returns a human-readable label, e.g. `"Red / M"`.
    pub fn label(&self) -> String {
        format!("{} / {}", self.color, self.size)
    }
}

/// Stock representation: a flat count or a variant matrix, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stock {
    /// Single stock count for products without variants.
    Simple(u32),

    /// Per-variant stock counts. No two variants share a (color, size) key.
    Variants(Vec<Variant>),
}

impl Stock {
    /// Returns the flat stock if no variants, else the sum of all variant stocks.
    pub fn total(&self) -> u32 {
        match self {
            Stock::Simple(count) => *count,
            Stock::Variants(variants) => {
                variants.iter().fold(0u32, |acc, v| acc.saturating_add(v.stock))
            }
        }
    }
}

/// Result of a single stock mutation: the old and new level of the one
/// affected slot (flat count or a single variant).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockChange {
    /// Stock level before the mutation.
    pub before: u32,

    /// Stock level after the mutation.
    pub after: u32,

    /// Label of the affected variant, `None` for flat-stock products.
    pub variant_label: Option<String>,
}

/// Errors from stock mutations.
#[derive(Debug, Clone, Error)]
pub enum StockError {
    /// The (color, size) selector matched no variant of the product.
    #[error("variant not found on product {product_id}: {color} / {size}")]
    VariantNotFound {
        product_id: ProductId,
        color: String,
        size: String,
    },

    /// The product has a variant matrix but the line item carried no selector.
    #[error("product {product_id} has variants but no selector was given")]
    SelectorRequired { product_id: ProductId },
}

/// A product record: identifier, display name, and stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub stock: Stock,
}

impl Product {
    /// Creates a product with a flat stock count.
    pub fn with_simple_stock(id: impl Into<ProductId>, name: impl Into<String>, stock: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            stock: Stock::Simple(stock),
        }
    }

    /// Creates a product with a variant matrix.
    pub fn with_variants(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        variants: Vec<Variant>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            stock: Stock::Variants(variants),
        }
    }

    /// Returns the total availability across all variants (or the flat count).
    pub fn total_stock(&self) -> u32 {
        self.stock.total()
    }

    /// Deducts `quantity` from the selected slot, clamped at zero.
    ///
    /// Only the matched variant (or the flat count) changes; sibling variants
    /// are untouched. Deduction never drives stock negative: the system does
    /// not hard-reserve stock at checkout, so an approval may race an
    /// already-depleted variant.
    pub fn deduct(
        &mut self,
        selector: Option<&VariantChoice>,
        quantity: u32,
    ) -> Result<StockChange, StockError> {
        self.mutate_slot(selector, |stock| stock.saturating_sub(quantity))
    }

    /// Restores `quantity` to the selected slot.
    ///
    /// Not clamped against any baseline: restoring can legitimately exceed
    /// the original level when multiple partial restores occur.
    pub fn restore(
        &mut self,
        selector: Option<&VariantChoice>,
        quantity: u32,
    ) -> Result<StockChange, StockError> {
        self.mutate_slot(selector, |stock| stock.saturating_add(quantity))
    }

    fn mutate_slot(
        &mut self,
        selector: Option<&VariantChoice>,
        f: impl FnOnce(u32) -> u32,
    ) -> Result<StockChange, StockError> {
        match &mut self.stock {
            Stock::Simple(count) => {
                let before = *count;
                *count = f(before);
                Ok(StockChange {
                    before,
                    after: *count,
                    variant_label: None,
                })
            }
            Stock::Variants(variants) => {
                let choice = selector.ok_or_else(|| StockError::SelectorRequired {
                    product_id: self.id.clone(),
                })?;
                let key = choice.key();
                let variant = variants
                    .iter_mut()
                    .find(|v| v.key() == key)
                    .ok_or_else(|| StockError::VariantNotFound {
                        product_id: self.id.clone(),
                        color: choice.color.clone(),
                        size: choice.size.clone(),
                    })?;
                let before = variant.stock;
                variant.stock = f(before);
                Ok(StockChange {
                    before,
                    after: variant.stock,
                    variant_label: Some(variant.label()),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shirt() -> Product {
        Product::with_variants(
            "SKU-SHIRT",
            "Shirt",
            vec![
                Variant::new("Red", "M", 5),
                Variant::new("Red", "L", 7),
                Variant::new("Blue", "M", 2),
            ],
        )
    }

    #[test]
    fn test_total_stock_sums_variants() {
        assert_eq!(shirt().total_stock(), 14);
        assert_eq!(Product::with_simple_stock("SKU-1", "Mug", 9).total_stock(), 9);
    }

    #[test]
    fn test_simple_deduct_clamps_at_zero() {
        let mut product = Product::with_simple_stock("SKU-1", "Mug", 3);
        let change = product.deduct(None, 5).unwrap();
        assert_eq!(change.before, 3);
        assert_eq!(change.after, 0);
        assert_eq!(product.total_stock(), 0);
    }

    #[test]
    fn test_variant_deduct_leaves_siblings_untouched() {
        let mut product = shirt();
        let choice = VariantChoice::new("Red", "M");
        let change = product.deduct(Some(&choice), 2).unwrap();

        assert_eq!(change.before, 5);
        assert_eq!(change.after, 3);
        assert_eq!(change.variant_label.as_deref(), Some("Red / M"));
        assert_eq!(product.total_stock(), 12);

        let Stock::Variants(variants) = &product.stock else {
            panic!("expected variants")
        };
        assert_eq!(variants[1].stock, 7);
        assert_eq!(variants[2].stock, 2);
    }

    #[test]
    fn test_variant_match_is_case_insensitive() {
        let mut product = shirt();
        let choice = VariantChoice::new("  red ", "m");
        let change = product.deduct(Some(&choice), 1).unwrap();
        assert_eq!(change.after, 4);
    }

    #[test]
    fn test_unknown_variant_mutates_nothing() {
        let mut product = shirt();
        let choice = VariantChoice::new("Green", "XL");
        let err = product.deduct(Some(&choice), 1).unwrap_err();
        assert!(matches!(err, StockError::VariantNotFound { .. }));
        assert_eq!(product.total_stock(), 14);
    }

    #[test]
    fn test_missing_selector_on_variant_product() {
        let mut product = shirt();
        let err = product.deduct(None, 1).unwrap_err();
        assert!(matches!(err, StockError::SelectorRequired { .. }));
        assert_eq!(product.total_stock(), 14);
    }

    #[test]
    fn test_deduct_then_restore_round_trips_without_clamp() {
        let mut product = shirt();
        let choice = VariantChoice::new("Red", "M");
        product.deduct(Some(&choice), 3).unwrap();
        let change = product.restore(Some(&choice), 3).unwrap();
        assert_eq!(change.after, 5);
    }

    #[test]
    fn test_restore_after_clamped_deduct_is_not_a_round_trip() {
        // Deducting 4 from a stock of 2 clamps to 0; restoring 4 yields
        // clamped + 4, not the original level.
        let mut product = shirt();
        let choice = VariantChoice::new("Blue", "M");
        let change = product.deduct(Some(&choice), 4).unwrap();
        assert_eq!(change.after, 0);

        let restored = product.restore(Some(&choice), 4).unwrap();
        assert_eq!(restored.after, 4);
    }

    #[test]
    fn test_restore_is_not_clamped_against_baseline() {
        let mut product = Product::with_simple_stock("SKU-1", "Mug", 1);
        let change = product.restore(None, 10).unwrap();
        assert_eq!(change.after, 11);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let product = shirt();
        let json = serde_json::to_string(&product).unwrap();
        let deserialized: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(product, deserialized);
    }
}
