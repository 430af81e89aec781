//! Bulk operation runner: per-item isolation over a list of orders.

use common::OrderId;
use domain::OrderStatus;
use serde::{Deserialize, Serialize};

use crate::fulfillment::FulfillmentEngine;
use crate::services::notification::NotificationGateway;
use crate::services::settings::SettingsProvider;
use store::RecordStore;

/// The state machine operation a bulk run applies to every order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkOperation {
    Approve,
    Reject,
    MarkShipped,
    MarkDelivered,
    Delete,
}

impl BulkOperation {
    /// Returns the operation name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            BulkOperation::Approve => "approve",
            BulkOperation::Reject => "reject",
            BulkOperation::MarkShipped => "mark_shipped",
            BulkOperation::MarkDelivered => "mark_delivered",
            BulkOperation::Delete => "delete",
        }
    }
}

impl std::fmt::Display for BulkOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single failed item in a bulk run.
#[derive(Debug, Clone, Serialize)]
pub struct BulkFailure {
    pub order_id: OrderId,
    pub error: String,
}

/// Per-item tally of a bulk run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BulkSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub failures: Vec<BulkFailure>,
}

impl<S, N, C> FulfillmentEngine<S, N, C>
where
    S: RecordStore + Clone,
    N: NotificationGateway,
    C: SettingsProvider,
{
    /// Applies `operation` to each order independently.
    ///
    /// One item's failure never aborts the remaining items: a bulk approval
    /// of fifty orders where three were deleted concurrently still
    /// processes the other forty-seven. Per-item errors are collected into
    /// the summary.
    #[tracing::instrument(skip(self, order_ids), fields(items = order_ids.len()))]
    pub async fn run_bulk(&self, order_ids: &[OrderId], operation: BulkOperation) -> BulkSummary {
        let mut summary = BulkSummary::default();

        for &order_id in order_ids {
            metrics::counter!("fulfillment_bulk_items_total").increment(1);
            let result = match operation {
                BulkOperation::Approve => self.approve(order_id).await.map(|_| ()),
                BulkOperation::Reject => self.reject(order_id).await.map(|_| ()),
                BulkOperation::MarkShipped => self
                    .update_status(order_id, OrderStatus::Shipped)
                    .await
                    .map(|_| ()),
                BulkOperation::MarkDelivered => self
                    .update_status(order_id, OrderStatus::Delivered)
                    .await
                    .map(|_| ()),
                BulkOperation::Delete => self.delete(order_id).await,
            };

            match result {
                Ok(()) => summary.succeeded += 1,
                Err(e) => {
                    tracing::warn!(%order_id, %operation, error = %e, "bulk item failed");
                    summary.failed += 1;
                    summary.failures.push(BulkFailure {
                        order_id,
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            %operation,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "bulk run finished"
        );
        summary
    }
}
