//! Error types for cpinit
//!
//! This module defines:
//! - `StoreError`: classified outcome of a failed record store call
//! - `CpInitError`: errors raised while building identities and clients

/// Failure of a record store operation, classified by kind.
///
/// `NotFound` and `AlreadyExists` are expected outcomes that drive the
/// lock's idempotent-release and lost-race branches. Every other variant is
/// a transient or unknown failure.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("record '{namespace}/{name}' not found")]
    NotFound { namespace: String, name: String },

    #[error("record '{namespace}/{name}' already exists")]
    AlreadyExists { namespace: String, name: String },

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("request rejected ({code} {reason}): {message}")]
    Rejected {
        code: u16,
        reason: String,
        message: String,
    },

    #[error("store error: {0}")]
    Other(String),
}

impl StoreError {
    pub fn not_found(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NotFound {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    pub fn already_exists(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::AlreadyExists {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }
}

/// Errors outside the lock protocol itself
#[derive(thiserror::Error, Debug)]
pub enum CpInitError {
    #[error("invalid cluster identity: {0}")]
    InvalidIdentity(String),

    #[error("client error: {0}")]
    ClientError(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_classification() {
        assert!(StoreError::not_found("ns1", "a").is_not_found());
        assert!(!StoreError::not_found("ns1", "a").is_already_exists());
        assert!(StoreError::already_exists("ns1", "a").is_already_exists());
        assert!(!StoreError::Unavailable("connection refused".to_string()).is_not_found());
        assert!(
            !StoreError::Rejected {
                code: 403,
                reason: "Forbidden".to_string(),
                message: "configmaps is forbidden".to_string(),
            }
            .is_already_exists()
        );
    }

    #[test]
    fn test_store_error_display() {
        assert_eq!(
            StoreError::already_exists("ns1", "abc-123-controlplane").to_string(),
            "record 'ns1/abc-123-controlplane' already exists"
        );
        assert_eq!(
            StoreError::Rejected {
                code: 422,
                reason: "Invalid".to_string(),
                message: "bad name".to_string(),
            }
            .to_string(),
            "request rejected (422 Invalid): bad name"
        );
    }

    #[test]
    fn test_cpinit_error_from_store_error() {
        let err: CpInitError = StoreError::Other("boom".to_string()).into();
        assert!(matches!(err, CpInitError::Store(StoreError::Other(_))));
        assert_eq!(err.to_string(), "store error: boom");
    }
}
