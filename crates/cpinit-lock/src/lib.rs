//! Control-plane initialization lock
//!
//! This crate provides:
//! - The `InitLocker` capability (acquire / release)
//! - `ControlPlaneInitLocker`, backed by any create-if-absent record store
//! - The `LockRecordStore` collaborator trait and an in-memory store
//!
//! Mutual exclusion across processes comes only from the store's atomic
//! create-if-absent. The locker keeps no state of its own.

pub mod metrics;
mod service;
mod store;

pub use service::*;
pub use store::*;

pub use cpinit_common::{ClusterIdentity, LockRecord, StoreError};
