//! Lock data model
//!
//! A cluster is protected by a single namespaced record whose presence is the
//! lock. The record carries no payload, only an owner reference back to the
//! cluster so the store can garbage-collect it when the cluster goes away.

use serde::{Deserialize, Serialize};

use crate::CONTROL_PLANE_LOCK_SUFFIX;
use crate::error::CpInitError;

/// Identity of the cluster being initialized
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterIdentity {
    pub namespace: String,
    pub name: String,
    pub uid: String,
    pub api_version: String,
    pub kind: String,
}

impl ClusterIdentity {
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        uid: impl Into<String>,
        api_version: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            uid: uid.into(),
            api_version: api_version.into(),
            kind: kind.into(),
        }
    }

    /// Reject identities that cannot address a record or back-reference
    pub fn validate(&self) -> Result<(), CpInitError> {
        let missing = [
            ("namespace", &self.namespace),
            ("name", &self.name),
            ("uid", &self.uid),
            ("apiVersion", &self.api_version),
            ("kind", &self.kind),
        ]
        .into_iter()
        .filter(|(_, v)| v.is_empty())
        .map(|(k, _)| k)
        .collect::<Vec<_>>();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(CpInitError::InvalidIdentity(format!(
                "missing {}",
                missing.join(", ")
            )))
        }
    }

    /// Name of the lock record guarding this cluster
    pub fn lock_record_name(&self) -> String {
        lock_record_name(&self.uid)
    }

    pub fn owner_reference(&self) -> OwnerReference {
        OwnerReference {
            api_version: self.api_version.clone(),
            kind: self.kind.clone(),
            name: self.name.clone(),
            uid: self.uid.clone(),
        }
    }
}

/// Derive the lock record name from a cluster UID.
///
/// The result is `<uid>-controlplane`; external readers rely on this exact form.
pub fn lock_record_name(uid: &str) -> String {
    format!("{}{}", uid, CONTROL_PLANE_LOCK_SUFFIX)
}

/// Back-reference from a lock record to its cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerReference {
    pub api_version: String,
    pub kind: String,
    pub name: String,
    pub uid: String,
}

/// A lock record as held by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockRecord {
    pub namespace: String,
    pub name: String,
    #[serde(default)]
    pub owner_references: Vec<OwnerReference>,
}

impl LockRecord {
    /// Build the record that locks `cluster`
    pub fn for_cluster(cluster: &ClusterIdentity) -> Self {
        Self {
            namespace: cluster.namespace.clone(),
            name: cluster.lock_record_name(),
            owner_references: vec![cluster.owner_reference()],
        }
    }

    /// Check if the record is owned by the cluster with the given UID
    pub fn is_owned_by(&self, uid: &str) -> bool {
        self.owner_references.iter().any(|o| o.uid == uid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cluster(namespace: &str, name: &str, uid: &str) -> ClusterIdentity {
        ClusterIdentity::new(namespace, name, uid, "cluster.x-k8s.io/v1beta1", "Cluster")
    }

    #[test]
    fn test_lock_record_name() {
        assert_eq!(lock_record_name("abc-123"), "abc-123-controlplane");
        assert_eq!(
            cluster("ns1", "cl1", "abc-123").lock_record_name(),
            "abc-123-controlplane"
        );
    }

    #[test]
    fn test_record_for_cluster() {
        let c = cluster("ns1", "cl1", "abc-123");
        let record = LockRecord::for_cluster(&c);

        assert_eq!(record.namespace, "ns1");
        assert_eq!(record.name, "abc-123-controlplane");
        assert_eq!(record.owner_references.len(), 1);

        let owner = &record.owner_references[0];
        assert_eq!(owner.api_version, "cluster.x-k8s.io/v1beta1");
        assert_eq!(owner.kind, "Cluster");
        assert_eq!(owner.name, "cl1");
        assert_eq!(owner.uid, "abc-123");
        assert!(record.is_owned_by("abc-123"));
        assert!(!record.is_owned_by("other"));
    }

    #[test]
    fn test_validate() {
        assert!(cluster("ns1", "cl1", "abc-123").validate().is_ok());

        let err = cluster("ns1", "", "").validate().unwrap_err();
        assert_eq!(err.to_string(), "invalid cluster identity: missing name, uid");
    }

    #[test]
    fn test_identity_serde_uses_camel_case() {
        let json = serde_json::to_value(cluster("ns1", "cl1", "abc-123")).unwrap();
        assert_eq!(json["apiVersion"], "cluster.x-k8s.io/v1beta1");
        assert_eq!(json["uid"], "abc-123");
    }

    proptest! {
        #[test]
        fn prop_same_uid_same_record(uid in "[a-f0-9-]{1,36}", a in "[a-z]{1,8}", b in "[a-z]{1,8}") {
            prop_assert_eq!(
                cluster("ns", &a, &uid).lock_record_name(),
                cluster("ns", &b, &uid).lock_record_name()
            );
        }

        #[test]
        fn prop_distinct_uids_never_collide(u1 in "[a-f0-9-]{1,36}", u2 in "[a-f0-9-]{1,36}") {
            prop_assume!(u1 != u2);
            prop_assert_ne!(lock_record_name(&u1), lock_record_name(&u2));
        }
    }
}
