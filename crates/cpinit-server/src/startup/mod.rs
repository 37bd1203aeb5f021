//! Application startup utilities module.

mod client;
mod logging;

pub use client::kube_client;
pub use logging::{LogRotation, LoggingConfig, LoggingGuard, init_logging};
