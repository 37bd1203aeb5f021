//! Control-plane init lock service
//!
//! `ControlPlaneInitLocker` claims a cluster by creating the record
//! `<uid>-controlplane` in the cluster's namespace. Whoever creates it holds
//! the lock; everyone else sees `false`. Store failures never escape: they are
//! logged and collapse to `false`.

use async_trait::async_trait;
use tracing::{Instrument, Span, debug, error, info, info_span};

use cpinit_common::{ClusterIdentity, LockRecord, StoreError};

use crate::metrics::{self, outcome};
use crate::store::LockRecordStore;

/// Locking mechanism for cluster initialization
#[async_trait]
pub trait InitLocker: Send + Sync {
    /// Returns true if it acquires the lock for the cluster
    async fn acquire(&self, cluster: &ClusterIdentity) -> bool;

    /// Returns true once no lock record remains for the cluster
    async fn release(&self, cluster: &ClusterIdentity) -> bool;
}

/// Init lock backed by a create-if-absent record store
pub struct ControlPlaneInitLocker<S> {
    store: S,
    span: Option<Span>,
}

impl<S: LockRecordStore> ControlPlaneInitLocker<S> {
    /// Create a locker whose log events nest under the caller's current span
    pub fn new(store: S) -> Self {
        Self { store, span: None }
    }

    /// Create a locker whose log events are nested under `span`
    pub fn with_span(store: S, span: Span) -> Self {
        Self {
            store,
            span: Some(span),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Existence probe for the cluster's lock record
    pub async fn is_locked(&self, cluster: &ClusterIdentity) -> Result<bool, StoreError> {
        self.record_exists(&cluster.namespace, &cluster.lock_record_name())
            .await
    }

    async fn record_exists(&self, namespace: &str, name: &str) -> Result<bool, StoreError> {
        match self.store.get(namespace, name).await {
            Ok(_) => Ok(true),
            Err(StoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn lock_span(&self, cluster: &ClusterIdentity, record_name: &str) -> Span {
        let parent = self.span.clone().unwrap_or_else(Span::current);
        info_span!(
            parent: &parent,
            "control_plane_init_lock",
            namespace = %cluster.namespace,
            cluster_name = %cluster.name,
            record_name = %record_name,
        )
    }

    async fn try_acquire(&self, cluster: &ClusterIdentity, record_name: &str) -> bool {
        if let Err(e) = cluster.validate() {
            error!(error = %e, "Refusing to lock cluster with incomplete identity");
            metrics::record_acquire(outcome::ERROR);
            return false;
        }

        // The probe only saves a create call; the create below is what decides
        match self.record_exists(&cluster.namespace, record_name).await {
            Ok(false) => {}
            Ok(true) => {
                debug!("Control plane lock record already exists");
                metrics::record_acquire(outcome::HELD);
                return false;
            }
            Err(e) => {
                error!(error = %e, "Error checking for control plane lock record existence");
                metrics::record_acquire(outcome::ERROR);
                return false;
            }
        }

        info!("Attempting to create control plane lock record");
        match self.store.create(LockRecord::for_cluster(cluster)).await {
            Ok(_) => {
                info!("Acquired control plane lock");
                metrics::record_acquire(outcome::ACQUIRED);
                true
            }
            Err(StoreError::AlreadyExists { .. }) => {
                // Someone else beat us to it
                info!("Control plane lock record already exists");
                metrics::record_acquire(outcome::LOST_RACE);
                false
            }
            Err(e) => {
                error!(error = %e, "Error creating control plane lock record");
                metrics::record_acquire(outcome::ERROR);
                false
            }
        }
    }

    async fn try_release(&self, cluster: &ClusterIdentity, record_name: &str) -> bool {
        if let Err(e) = cluster.validate() {
            error!(error = %e, "Refusing to unlock cluster with incomplete identity");
            metrics::record_release(outcome::ERROR);
            return false;
        }

        debug!("Checking for existence of control plane lock record");
        match self.store.get(&cluster.namespace, record_name).await {
            Ok(_) => {}
            Err(StoreError::NotFound { .. }) => {
                info!("Control plane lock record not found, it may have been released already");
                metrics::record_release(outcome::ABSENT);
                return true;
            }
            Err(e) => {
                error!(error = %e, "Error retrieving control plane lock record");
                metrics::record_release(outcome::ERROR);
                return false;
            }
        }

        match self.store.delete(&cluster.namespace, record_name).await {
            Ok(()) => {
                info!("Released control plane lock");
                metrics::record_release(outcome::RELEASED);
                true
            }
            Err(StoreError::NotFound { .. }) => {
                info!("Control plane lock record was removed concurrently");
                metrics::record_release(outcome::ABSENT);
                true
            }
            Err(e) => {
                error!(error = %e, "Error deleting control plane lock record");
                metrics::record_release(outcome::ERROR);
                false
            }
        }
    }
}

#[async_trait]
impl<S: LockRecordStore> InitLocker for ControlPlaneInitLocker<S> {
    async fn acquire(&self, cluster: &ClusterIdentity) -> bool {
        let record_name = cluster.lock_record_name();
        let span = self.lock_span(cluster, &record_name);
        self.try_acquire(cluster, &record_name)
            .instrument(span)
            .await
    }

    async fn release(&self, cluster: &ClusterIdentity) -> bool {
        let record_name = cluster.lock_record_name();
        let span = self.lock_span(cluster, &record_name);
        self.try_release(cluster, &record_name)
            .instrument(span)
            .await
    }
}
