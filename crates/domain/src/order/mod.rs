//! Order records and the status state machine.

mod item;
mod status;

pub use item::LineItem;
pub use status::OrderStatus;

use chrono::{DateTime, Utc};
use common::{OrderId, UserId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::money::Money;

/// Errors that can occur during order status operations.
#[derive(Debug, Clone, Error)]
pub enum OrderError {
    /// The requested status change is not a legal edge of the state machine.
    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// Orders are deletable only in a terminal status.
    #[error("order in {status} status cannot be deleted")]
    NotDeletable { status: OrderStatus },
}

/// An order record.
///
/// Created externally by the checkout flow; mutated only through the
/// fulfillment engine. `version` is the optimistic-concurrency stamp
/// incremented by the record store on every update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,

    /// The buyer.
    pub user_id: UserId,

    pub items: Vec<LineItem>,

    pub status: OrderStatus,

    /// Monetary total, a snapshot from checkout time.
    pub total: Money,

    pub created_at: DateTime<Utc>,

    /// Optimistic-concurrency stamp, incremented by the store on update.
    #[serde(default)]
    pub version: u64,

    /// The purchase-bonus amount actually credited at approval time.
    ///
    /// Persisted so a reversal debits exactly what was credited, even if
    /// rates changed in between. `None` until approval credits the buyer.
    #[serde(default)]
    pub bonus_credited: Option<i64>,

    /// Set once stock deductions for this order have been applied, so a
    /// re-run of an interrupted approval never double-deducts.
    #[serde(default)]
    pub inventory_applied: bool,
}

impl Order {
    /// Creates a pending order for a buyer, totalling the given items.
    pub fn new(user_id: UserId, items: Vec<LineItem>) -> Self {
        let total = items
            .iter()
            .fold(Money::zero(), |acc, item| acc + item.total_price());
        Self {
            id: OrderId::new(),
            user_id,
            items,
            status: OrderStatus::Pending,
            total,
            created_at: Utc::now(),
            version: 0,
            bonus_credited: None,
            inventory_applied: false,
        }
    }

    /// Checks that `next` is a legal transition from the current status.
    pub fn validate_transition(&self, next: OrderStatus) -> Result<(), OrderError> {
        if self.status.can_transition_to(next) {
            Ok(())
        } else {
            Err(OrderError::InvalidTransition {
                from: self.status,
                to: next,
            })
        }
    }

    /// Checks that the order may be deleted in its current status.
    pub fn validate_delete(&self) -> Result<(), OrderError> {
        if self.status.is_deletable() {
            Ok(())
        } else {
            Err(OrderError::NotDeletable {
                status: self.status,
            })
        }
    }
}
