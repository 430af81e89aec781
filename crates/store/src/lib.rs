//! Record store abstraction for the fulfillment engine.
//!
//! The engine consumes a simple per-record CRUD surface: get/update/delete
//! for orders, products, and user accounts, with no cross-record
//! transactions. Order updates carry an optional expected-version guard so
//! callers can detect concurrent status transitions.
//!
//! The durable backend lives outside this system; this crate provides the
//! [`RecordStore`] trait and an in-memory implementation used by the engine
//! tests and the default API wiring.

pub mod error;
pub mod memory;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::InMemoryRecordStore;
pub use store::{RecordStore, UpdateGuard};
