//! cpinit Common - Shared types and errors
//!
//! This crate provides the foundational types used by every cpinit component:
//! - Cluster identity and owner references
//! - The lock record model and its naming rule
//! - Error types for the record store and for bootstrap code

pub mod error;
pub mod model;

// Re-exports for convenience
pub use error::{CpInitError, StoreError};
pub use model::{ClusterIdentity, LockRecord, OwnerReference, lock_record_name};

/// Suffix appended to the cluster UID to form the lock record name
pub const CONTROL_PLANE_LOCK_SUFFIX: &str = "-controlplane";
