//! Canonical line items and boundary normalization of loose upstream shapes.

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::product::{ProductId, VariantChoice};

/// A line item on an order.
///
/// The unit price is a snapshot taken at purchase time, never re-read from
/// the live product. Upstream payloads are loosely shaped (`id` vs
/// `productId`, `color` vs `selectedColor`); they are normalized into this
/// one canonical shape at deserialization, so the engine never branches on
/// field-name variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawLineItem")]
pub struct LineItem {
    pub product_id: ProductId,

    /// The (color, size) selector, present only for variant products.
    pub variant: Option<VariantChoice>,

    pub quantity: u32,

    /// Unit price at time of purchase.
    pub unit_price: Money,
}

impl LineItem {
    /// Creates a line item without a variant selector.
    pub fn new(product_id: impl Into<ProductId>, quantity: u32, unit_price: Money) -> Self {
        Self {
            product_id: product_id.into(),
            variant: None,
            quantity,
            unit_price,
        }
    }

    /// Creates a line item targeting a specific variant.
    pub fn with_variant(
        product_id: impl Into<ProductId>,
        color: impl Into<String>,
        size: impl Into<String>,
        quantity: u32,
        unit_price: Money,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            variant: Some(VariantChoice::new(color, size)),
            quantity,
            unit_price,
        }
    }

    /// Returns the total price for this item (quantity × unit price).
    pub fn total_price(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// Deserialization shape absorbing the loose field names seen upstream,
/// as well as the canonical shape itself.
#[derive(Deserialize)]
struct RawLineItem {
    #[serde(alias = "id", alias = "productId")]
    product_id: ProductId,

    #[serde(default)]
    variant: Option<VariantChoice>,

    #[serde(default, alias = "selectedColor")]
    color: Option<String>,

    #[serde(default, alias = "selectedSize")]
    size: Option<String>,

    #[serde(alias = "qty")]
    quantity: u32,

    #[serde(alias = "price", alias = "unitPrice")]
    unit_price: Money,
}

impl From<RawLineItem> for LineItem {
    fn from(raw: RawLineItem) -> Self {
        let variant = raw.variant.or(match (raw.color, raw.size) {
            (Some(color), Some(size)) => Some(VariantChoice::new(color, size)),
            _ => None,
        });
        Self {
            product_id: raw.product_id,
            variant,
            quantity: raw.quantity,
            unit_price: raw.unit_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_price() {
        let item = LineItem::new("SKU-001", 3, Money::from_cents(1000));
        assert_eq!(item.total_price().cents(), 3000);
    }

    #[test]
    fn test_canonical_shape_roundtrip() {
        let item = LineItem::with_variant("SKU-001", "Red", "M", 2, Money::from_cents(999));
        let json = serde_json::to_string(&item).unwrap();
        let deserialized: LineItem = serde_json::from_str(&json).unwrap();
        assert_eq!(item, deserialized);
    }

    #[test]
    fn test_loose_field_names_are_normalized() {
        let json = r#"{
            "id": "SKU-001",
            "selectedColor": "Red",
            "selectedSize": "M",
            "qty": 2,
            "price": 1000
        }"#;
        let item: LineItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.product_id.as_str(), "SKU-001");
        assert_eq!(item.variant, Some(VariantChoice::new("Red", "M")));
        assert_eq!(item.quantity, 2);
        assert_eq!(item.unit_price.cents(), 1000);
    }

    #[test]
    fn test_product_id_alias_variants() {
        for key in ["id", "productId", "product_id"] {
            let json = format!(r#"{{"{key}": "SKU-9", "quantity": 1, "unit_price": 500}}"#);
            let item: LineItem = serde_json::from_str(&json).unwrap();
            assert_eq!(item.product_id.as_str(), "SKU-9");
            assert_eq!(item.variant, None);
        }
    }

    #[test]
    fn test_partial_selector_is_dropped() {
        // A selector needs both color and size to address a variant.
        let json = r#"{"id": "SKU-1", "color": "Red", "quantity": 1, "price": 100}"#;
        let item: LineItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.variant, None);
    }
}
