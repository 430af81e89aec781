//! Engine error and warning taxonomy.

use common::{OrderId, UserId};
use domain::{OrderError, ProductId};
use store::StoreError;
use thiserror::Error;

/// Fatal errors that abort a single engine operation.
///
/// Everything else that can go wrong mid-transition (a missing variant, an
/// unresolvable referrer, a failed notification) is captured as a
/// [`Warning`] on the operation's outcome instead.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The order record does not exist.
    #[error("order not found: {0}")]
    OrderNotFound(OrderId),

    /// The requested status change is not a legal edge, or the order is not
    /// deletable in its current status. No mutation was performed.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// A record store read or the final status write failed. The status
    /// write is attempted last, so a failure here means the transition did
    /// not complete; earlier side effects are reconciled on the next
    /// attempt via the order's idempotence fields.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Non-fatal sub-step failures, attached to a transition outcome.
#[derive(Debug, Clone, Error)]
pub enum Warning {
    /// A line item's stock update was skipped; the transition proceeded.
    #[error("stock update skipped for product {product_id}: {reason}")]
    StockUpdateSkipped { product_id: ProductId, reason: String },

    /// The buyer's referral code did not resolve to an account.
    #[error("referrer not found for code {code}")]
    ReferrerNotFound { code: String },

    /// The purchase-bonus credit could not be applied.
    #[error("bonus credit failed for user {user_id}: {reason}")]
    BonusCreditFailed { user_id: UserId, reason: String },

    /// The compensating bonus debit could not be applied.
    #[error("bonus debit failed for user {user_id}: {reason}")]
    BonusDebitFailed { user_id: UserId, reason: String },

    /// The referral commission could not be paid.
    #[error("referral commission failed for code {code}: {reason}")]
    CommissionFailed { code: String, reason: String },

    /// The notification gateway call failed; the transition stands.
    #[error("notification failed: {reason}")]
    NotificationFailed { reason: String },
}

/// Convenience type alias for engine results.
pub type Result<T> = std::result::Result<T, EngineError>;
