use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{OrderId, UserId};
use domain::{Order, Product, ProductId, UserAccount};
use tokio::sync::RwLock;

use crate::{
    Result, StoreError,
    store::{RecordStore, UpdateGuard},
};

#[derive(Default)]
struct Records {
    orders: HashMap<OrderId, Order>,
    products: HashMap<ProductId, Product>,
    users: HashMap<UserId, UserAccount>,
    fail_on_update_order: bool,
    fail_on_update_product: bool,
    fail_on_update_user: bool,
}

/// In-memory record store implementation.
///
/// Backs the engine tests and the default API wiring, with the same
/// single-record semantics a durable backend would provide. Write failures
/// can be injected per record type to exercise partial-failure paths.
#[derive(Clone, Default)]
pub struct InMemoryRecordStore {
    records: Arc<RwLock<Records>>,
}

impl InMemoryRecordStore {
    /// Creates a new empty in-memory record store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored orders.
    pub async fn order_count(&self) -> usize {
        self.records.read().await.orders.len()
    }

    /// Configures the store to fail order updates.
    pub async fn set_fail_on_update_order(&self, fail: bool) {
        self.records.write().await.fail_on_update_order = fail;
    }

    /// Configures the store to fail product updates.
    pub async fn set_fail_on_update_product(&self, fail: bool) {
        self.records.write().await.fail_on_update_product = fail;
    }

    /// Configures the store to fail user updates.
    pub async fn set_fail_on_update_user(&self, fail: bool) {
        self.records.write().await.fail_on_update_user = fail;
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn get_order(&self, id: OrderId) -> Result<Option<Order>> {
        Ok(self.records.read().await.orders.get(&id).cloned())
    }

    async fn put_order(&self, order: Order) -> Result<()> {
        self.records.write().await.orders.insert(order.id, order);
        Ok(())
    }

    async fn update_order(&self, mut order: Order, guard: UpdateGuard) -> Result<u64> {
        let mut records = self.records.write().await;

        if records.fail_on_update_order {
            return Err(StoreError::Backend("injected order write failure".into()));
        }

        let current = records
            .orders
            .get(&order.id)
            .ok_or_else(|| StoreError::not_found("order", order.id))?;

        if let Some(expected) = guard.expected_version
            && current.version != expected
        {
            return Err(StoreError::VersionConflict {
                order_id: order.id,
                expected,
                actual: current.version,
            });
        }

        order.version = current.version + 1;
        let new_version = order.version;
        records.orders.insert(order.id, order);
        Ok(new_version)
    }

    async fn delete_order(&self, id: OrderId) -> Result<()> {
        let mut records = self.records.write().await;
        records
            .orders
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("order", id))
    }

    async fn list_orders(&self) -> Result<Vec<Order>> {
        let records = self.records.read().await;
        let mut orders: Vec<_> = records.orders.values().cloned().collect();
        orders.sort_by_key(|o| o.created_at);
        Ok(orders)
    }

    async fn get_product(&self, id: &ProductId) -> Result<Option<Product>> {
        Ok(self.records.read().await.products.get(id).cloned())
    }

    async fn put_product(&self, product: Product) -> Result<()> {
        self.records
            .write()
            .await
            .products
            .insert(product.id.clone(), product);
        Ok(())
    }

    async fn update_product(&self, product: Product) -> Result<()> {
        let mut records = self.records.write().await;

        if records.fail_on_update_product {
            return Err(StoreError::Backend("injected product write failure".into()));
        }

        if !records.products.contains_key(&product.id) {
            return Err(StoreError::not_found("product", &product.id));
        }
        records.products.insert(product.id.clone(), product);
        Ok(())
    }

    async fn get_user(&self, id: UserId) -> Result<Option<UserAccount>> {
        Ok(self.records.read().await.users.get(&id).cloned())
    }

    async fn put_user(&self, user: UserAccount) -> Result<()> {
        self.records.write().await.users.insert(user.id, user);
        Ok(())
    }

    async fn update_user(&self, user: UserAccount) -> Result<()> {
        let mut records = self.records.write().await;

        if records.fail_on_update_user {
            return Err(StoreError::Backend("injected user write failure".into()));
        }

        if !records.users.contains_key(&user.id) {
            return Err(StoreError::not_found("user", user.id));
        }
        records.users.insert(user.id, user);
        Ok(())
    }

    async fn find_user_by_referral_code(&self, code: &str) -> Result<Option<UserAccount>> {
        let records = self.records.read().await;
        Ok(records
            .users
            .values()
            .find(|u| u.referral_code == code)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{LineItem, Money, OrderStatus};

    fn order() -> Order {
        Order::new(
            UserId::new(),
            vec![LineItem::new("SKU-001", 2, Money::from_cents(1000))],
        )
    }

    #[tokio::test]
    async fn test_put_and_get_order() {
        let store = InMemoryRecordStore::new();
        let order = order();
        let id = order.id;

        store.put_order(order.clone()).await.unwrap();
        let loaded = store.get_order(id).await.unwrap().unwrap();
        assert_eq!(loaded, order);
        assert_eq!(store.order_count().await, 1);
    }

    #[tokio::test]
    async fn test_update_stamps_next_version() {
        let store = InMemoryRecordStore::new();
        let mut order = order();
        let id = order.id;
        store.put_order(order.clone()).await.unwrap();

        order.status = OrderStatus::Approved;
        let v1 = store.update_order(order.clone(), UpdateGuard::new()).await.unwrap();
        assert_eq!(v1, 1);

        let v2 = store.update_order(order, UpdateGuard::new()).await.unwrap();
        assert_eq!(v2, 2);

        let loaded = store.get_order(id).await.unwrap().unwrap();
        assert_eq!(loaded.version, 2);
    }

    #[tokio::test]
    async fn test_expected_version_mismatch_is_a_conflict() {
        let store = InMemoryRecordStore::new();
        let order = order();
        store.put_order(order.clone()).await.unwrap();

        // First writer wins.
        store
            .update_order(order.clone(), UpdateGuard::expect_version(0))
            .await
            .unwrap();

        // Second writer carrying the stale version loses.
        let err = store
            .update_order(order, UpdateGuard::expect_version(0))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::VersionConflict {
                expected: 0,
                actual: 1,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_update_missing_order_fails() {
        let store = InMemoryRecordStore::new();
        let err = store
            .update_order(order(), UpdateGuard::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::RecordNotFound { kind: "order", .. }));
    }

    #[tokio::test]
    async fn test_delete_order() {
        let store = InMemoryRecordStore::new();
        let order = order();
        let id = order.id;
        store.put_order(order).await.unwrap();

        store.delete_order(id).await.unwrap();
        assert!(store.get_order(id).await.unwrap().is_none());
        assert!(store.delete_order(id).await.is_err());
    }

    #[tokio::test]
    async fn test_find_user_by_referral_code() {
        let store = InMemoryRecordStore::new();
        let user = UserAccount::new("Alice", "ALICE-1");
        store.put_user(user.clone()).await.unwrap();

        let found = store.find_user_by_referral_code("ALICE-1").await.unwrap();
        assert_eq!(found, Some(user));

        let missing = store.find_user_by_referral_code("NOBODY").await.unwrap();
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn test_injected_product_write_failure() {
        let store = InMemoryRecordStore::new();
        let product = Product::with_simple_stock("SKU-1", "Mug", 5);
        store.put_product(product.clone()).await.unwrap();

        store.set_fail_on_update_product(true).await;
        let err = store.update_product(product.clone()).await.unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));

        store.set_fail_on_update_product(false).await;
        store.update_product(product).await.unwrap();
    }
}
