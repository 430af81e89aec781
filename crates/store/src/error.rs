use common::OrderId;
use thiserror::Error;

/// Errors that can occur when interacting with the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested record does not exist.
    #[error("{kind} not found: {id}")]
    RecordNotFound { kind: &'static str, id: String },

    /// An order update carried an expected version that did not match the
    /// stored one; a concurrent writer got there first.
    #[error("version conflict for order {order_id}: expected version {expected}, found {actual}")]
    VersionConflict {
        order_id: OrderId,
        expected: u64,
        actual: u64,
    },

    /// The underlying backend failed.
    #[error("record store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Convenience constructor for a missing record.
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        StoreError::RecordNotFound {
            kind,
            id: id.to_string(),
        }
    }
}

/// Result type for record store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
