//! Record store collaborator
//!
//! The lock needs three operations from its backing store. `create` must be
//! atomic create-if-absent: when two callers race on the same name exactly one
//! succeeds and the other gets `StoreError::AlreadyExists`.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use cpinit_common::{LockRecord, StoreError};

/// Namespaced record store with create-if-absent semantics
#[async_trait]
pub trait LockRecordStore: Send + Sync {
    /// Fetch a record; `StoreError::NotFound` when absent
    async fn get(&self, namespace: &str, name: &str) -> Result<LockRecord, StoreError>;

    /// Atomically create a record; `StoreError::AlreadyExists` when the name is taken
    async fn create(&self, record: LockRecord) -> Result<LockRecord, StoreError>;

    /// Delete a record; may return `StoreError::NotFound` if it is already gone
    async fn delete(&self, namespace: &str, name: &str) -> Result<(), StoreError>;
}

#[async_trait]
impl<S: LockRecordStore + ?Sized> LockRecordStore for Arc<S> {
    async fn get(&self, namespace: &str, name: &str) -> Result<LockRecord, StoreError> {
        (**self).get(namespace, name).await
    }

    async fn create(&self, record: LockRecord) -> Result<LockRecord, StoreError> {
        (**self).create(record).await
    }

    async fn delete(&self, namespace: &str, name: &str) -> Result<(), StoreError> {
        (**self).delete(namespace, name).await
    }
}

/// In-process record store using DashMap.
///
/// Only gives mutual exclusion between lockers sharing the same instance.
/// Useful for tests and single-process embedding.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: DashMap<String, LockRecord>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(namespace: &str, name: &str) -> String {
        format!("{}/{}", namespace, name)
    }

    pub fn contains(&self, namespace: &str, name: &str) -> bool {
        self.records.contains_key(&Self::key(namespace, name))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl LockRecordStore for MemoryRecordStore {
    async fn get(&self, namespace: &str, name: &str) -> Result<LockRecord, StoreError> {
        self.records
            .get(&Self::key(namespace, name))
            .map(|r| r.clone())
            .ok_or_else(|| StoreError::not_found(namespace, name))
    }

    async fn create(&self, record: LockRecord) -> Result<LockRecord, StoreError> {
        // The entry guard holds the shard lock, so check-and-insert is atomic
        match self
            .records
            .entry(Self::key(&record.namespace, &record.name))
        {
            Entry::Occupied(_) => Err(StoreError::already_exists(
                &record.namespace,
                &record.name,
            )),
            Entry::Vacant(slot) => Ok(slot.insert(record).clone()),
        }
    }

    async fn delete(&self, namespace: &str, name: &str) -> Result<(), StoreError> {
        self.records
            .remove(&Self::key(namespace, name))
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(namespace, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(namespace: &str, name: &str) -> LockRecord {
        LockRecord {
            namespace: namespace.to_string(),
            name: name.to_string(),
            owner_references: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_create_get_delete() {
        let store = MemoryRecordStore::new();
        assert!(store.is_empty());

        store.create(record("ns1", "a")).await.unwrap();
        assert_eq!(store.get("ns1", "a").await.unwrap().name, "a");
        assert_eq!(store.len(), 1);

        store.delete("ns1", "a").await.unwrap();
        assert!(store.get("ns1", "a").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_create_conflict() {
        let store = MemoryRecordStore::new();
        store.create(record("ns1", "a")).await.unwrap();

        let err = store.create(record("ns1", "a")).await.unwrap_err();
        assert!(err.is_already_exists());
    }

    #[tokio::test]
    async fn test_records_are_namespaced() {
        let store = MemoryRecordStore::new();
        store.create(record("ns1", "a")).await.unwrap();
        store.create(record("ns2", "a")).await.unwrap();

        assert!(store.contains("ns1", "a"));
        assert!(store.contains("ns2", "a"));
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let store = MemoryRecordStore::new();
        assert!(store.delete("ns1", "a").await.unwrap_err().is_not_found());
    }
}
