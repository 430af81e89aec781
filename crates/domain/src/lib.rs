//! Domain layer for the order fulfillment engine.
//!
//! This crate provides the core domain types and pure logic:
//! - Order record with its status state machine
//! - Canonical line items with boundary normalization of loose field names
//! - Products with simple stock or a color×size variant matrix
//! - Clamped/unclamped stock arithmetic
//! - Bonus and referral point math
//! - Low-stock alert classification

pub mod account;
pub mod alert;
pub mod bonus;
pub mod money;
pub mod order;
pub mod product;

pub use account::UserAccount;
pub use alert::{DEFAULT_LOW_STOCK_THRESHOLD, StockAlert, classify};
pub use bonus::{BonusConfig, ReferralPolicy};
pub use money::Money;
pub use order::{LineItem, Order, OrderError, OrderStatus};
pub use product::{
    Product, ProductId, Stock, StockChange, StockError, Variant, VariantChoice, VariantKey,
};
