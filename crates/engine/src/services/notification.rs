//! Notification gateway trait and in-memory implementation.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::{OrderId, UserId};
use domain::{Order, OrderStatus, ProductId, StockAlert, UserAccount};
use thiserror::Error;

/// Error from the notification gateway.
///
/// Delivery is fire-and-forget: the engine logs these and records a warning,
/// never rolling back a state transition.
#[derive(Debug, Clone, Error)]
#[error("notification gateway error: {0}")]
pub struct NotifyError(pub String);

/// Trait for the outbound notification gateway.
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    /// Tells the buyer their order changed status.
    async fn notify_order_status(
        &self,
        order: &Order,
        status: OrderStatus,
    ) -> Result<(), NotifyError>;

    /// Tells a referrer they earned a commission.
    async fn notify_referral_reward(
        &self,
        referrer: &UserAccount,
        amount: i64,
        total_referrals: u32,
    ) -> Result<(), NotifyError>;

    /// Tells the operators a stock level crossed an alerting boundary.
    async fn notify_low_stock(
        &self,
        product_id: &ProductId,
        product_name: &str,
        alert: StockAlert,
        variant_label: Option<&str>,
    ) -> Result<(), NotifyError>;
}

/// A notification recorded by the in-memory gateway.
#[derive(Debug, Clone, PartialEq)]
pub enum SentNotification {
    OrderStatus {
        order_id: OrderId,
        user_id: UserId,
        status: OrderStatus,
    },
    ReferralReward {
        referrer_id: UserId,
        amount: i64,
        total_referrals: u32,
    },
    LowStock {
        product_id: ProductId,
        alert: StockAlert,
        variant_label: Option<String>,
    },
}

#[derive(Debug, Default)]
struct InMemoryGatewayState {
    sent: Vec<SentNotification>,
    fail_on_send: bool,
}

/// In-memory notification gateway for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotificationGateway {
    state: Arc<RwLock<InMemoryGatewayState>>,
}

impl InMemoryNotificationGateway {
    /// Creates a new in-memory notification gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the gateway to fail every send.
    pub fn set_fail_on_send(&self, fail: bool) {
        self.state.write().unwrap().fail_on_send = fail;
    }

    /// Returns all recorded notifications in send order.
    pub fn sent(&self) -> Vec<SentNotification> {
        self.state.read().unwrap().sent.clone()
    }

    /// Returns the number of recorded notifications.
    pub fn sent_count(&self) -> usize {
        self.state.read().unwrap().sent.len()
    }

    /// Returns only the recorded low-stock notifications.
    pub fn low_stock_alerts(&self) -> Vec<SentNotification> {
        self.state
            .read()
            .unwrap()
            .sent
            .iter()
            .filter(|n| matches!(n, SentNotification::LowStock { .. }))
            .cloned()
            .collect()
    }

    fn record(&self, notification: SentNotification) -> Result<(), NotifyError> {
        let mut state = self.state.write().unwrap();
        if state.fail_on_send {
            return Err(NotifyError("gateway unavailable".to_string()));
        }
        state.sent.push(notification);
        Ok(())
    }
}

#[async_trait]
impl NotificationGateway for InMemoryNotificationGateway {
    async fn notify_order_status(
        &self,
        order: &Order,
        status: OrderStatus,
    ) -> Result<(), NotifyError> {
        self.record(SentNotification::OrderStatus {
            order_id: order.id,
            user_id: order.user_id,
            status,
        })
    }

    async fn notify_referral_reward(
        &self,
        referrer: &UserAccount,
        amount: i64,
        total_referrals: u32,
    ) -> Result<(), NotifyError> {
        self.record(SentNotification::ReferralReward {
            referrer_id: referrer.id,
            amount,
            total_referrals,
        })
    }

    async fn notify_low_stock(
        &self,
        product_id: &ProductId,
        _product_name: &str,
        alert: StockAlert,
        variant_label: Option<&str>,
    ) -> Result<(), NotifyError> {
        self.record(SentNotification::LowStock {
            product_id: product_id.clone(),
            alert,
            variant_label: variant_label.map(str::to_string),
        })
    }
}
