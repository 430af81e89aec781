use async_trait::async_trait;
use common::{OrderId, UserId};
use domain::{Order, Product, ProductId, UserAccount};

use crate::Result;

/// Guard options for order updates.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateGuard {
    /// Expected version of the order for optimistic concurrency control.
    /// If None, no version check is performed (use with caution).
    pub expected_version: Option<u64>,
}

impl UpdateGuard {
    /// Creates a guard with no version check.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a guard expecting the order to be at a specific version.
    pub fn expect_version(version: u64) -> Self {
        Self {
            expected_version: Some(version),
        }
    }
}

/// Core trait for record store implementations.
///
/// All operations are single-record; the store provides read-your-writes
/// consistency per record but no cross-record transactions. Implementations
/// must be thread-safe (Send + Sync).
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Retrieves an order by ID.
    async fn get_order(&self, id: OrderId) -> Result<Option<Order>>;

    /// Inserts (or replaces) an order record, e.g. from the checkout flow.
    async fn put_order(&self, order: Order) -> Result<()>;

    /// Writes back an order record.
    ///
    /// If `guard.expected_version` is set, the write fails with
    /// `VersionConflict` when the stored version differs. The store stamps
    /// the record with the next version and returns it.
    async fn update_order(&self, order: Order, guard: UpdateGuard) -> Result<u64>;

    /// Removes an order record.
    async fn delete_order(&self, id: OrderId) -> Result<()>;

    /// Lists all order records.
    async fn list_orders(&self) -> Result<Vec<Order>>;

    /// Retrieves a product by ID.
    async fn get_product(&self, id: &ProductId) -> Result<Option<Product>>;

    /// Inserts (or replaces) a product record.
    async fn put_product(&self, product: Product) -> Result<()>;

    /// Writes back an existing product record.
    async fn update_product(&self, product: Product) -> Result<()>;

    /// Retrieves a user account by ID.
    async fn get_user(&self, id: UserId) -> Result<Option<UserAccount>>;

    /// Inserts (or replaces) a user account record.
    async fn put_user(&self, user: UserAccount) -> Result<()>;

    /// Writes back an existing user account record.
    async fn update_user(&self, user: UserAccount) -> Result<()>;

    /// Resolves a referral code to the account that owns it.
    async fn find_user_by_referral_code(&self, code: &str) -> Result<Option<UserAccount>>;
}
