//! Order fulfillment and inventory reconciliation engine.
//!
//! This crate moves a customer order through its lifecycle
//! (pending → approved → shipped → delivered, or rejected) while keeping
//! three dependent ledgers consistent: per-variant stock, buyer bonus-point
//! balances, and referrer commission payouts. Approval and rejection are
//! compensating pairs; sub-step failures are captured as warnings rather
//! than aborting the transition, and bulk operations report per-item
//! outcomes instead of failing atomically.

pub mod accountant;
pub mod bulk;
pub mod error;
pub mod fulfillment;
pub mod ledger;
pub mod services;

pub use accountant::{Accountant, AccountingError, CommissionReceipt};
pub use bulk::{BulkFailure, BulkOperation, BulkSummary};
pub use error::{EngineError, Result, Warning};
pub use fulfillment::{FulfillmentEngine, TransitionOutcome};
pub use ledger::{InventoryLedger, LedgerEntry, LedgerError};
pub use services::{
    InMemoryNotificationGateway, InMemorySettings, NotificationGateway, NotifyError,
    SentNotification, SettingsProvider,
};
