// ConfigMap-backed lock record store
// The API server's create is atomic per name, which is what the lock relies on

use async_trait::async_trait;
use k8s_openapi::api::core::v1::ConfigMap;
use k8s_openapi::apimachinery::pkg::apis::meta::v1 as metav1;
use kube::api::{DeleteParams, PostParams};
use kube::{Api, Client};
use tracing::debug;

use cpinit_common::{LockRecord, OwnerReference, StoreError};
use cpinit_lock::LockRecordStore;

/// Record store that keeps lock records as ConfigMaps
#[derive(Clone)]
pub struct ConfigMapStore {
    client: Client,
}

impl ConfigMapStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn api(&self, namespace: &str) -> Api<ConfigMap> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

#[async_trait]
impl LockRecordStore for ConfigMapStore {
    async fn get(&self, namespace: &str, name: &str) -> Result<LockRecord, StoreError> {
        self.api(namespace)
            .get(name)
            .await
            .map(|cm| lock_record_from_config_map(cm, namespace))
            .map_err(|e| classify_error(e, namespace, name))
    }

    async fn create(&self, record: LockRecord) -> Result<LockRecord, StoreError> {
        let namespace = record.namespace.clone();
        let cm = config_map_from_lock_record(&record);

        debug!(namespace = %namespace, name = %record.name, "Creating lock configmap");
        self.api(&namespace)
            .create(&PostParams::default(), &cm)
            .await
            .map(|cm| lock_record_from_config_map(cm, &namespace))
            .map_err(|e| classify_error(e, &namespace, &record.name))
    }

    async fn delete(&self, namespace: &str, name: &str) -> Result<(), StoreError> {
        debug!(namespace = %namespace, name = %name, "Deleting lock configmap");
        self.api(namespace)
            .delete(name, &DeleteParams::default())
            .await
            .map(|_| ())
            .map_err(|e| classify_error(e, namespace, name))
    }
}

/// Map a Kubernetes client error onto the store error kinds.
///
/// Only the API status code and reason are inspected; messages are carried
/// along for diagnostics.
pub fn classify_error(err: kube::Error, namespace: &str, name: &str) -> StoreError {
    match err {
        kube::Error::Api(resp) if resp.code == 404 => StoreError::not_found(namespace, name),
        kube::Error::Api(resp) if resp.code == 409 && resp.reason == "AlreadyExists" => {
            StoreError::already_exists(namespace, name)
        }
        kube::Error::Api(resp) => StoreError::Rejected {
            code: resp.code,
            reason: resp.reason,
            message: resp.message,
        },
        err @ (kube::Error::HyperError(_) | kube::Error::Service(_)) => {
            StoreError::Unavailable(err.to_string())
        }
        other => StoreError::Other(other.to_string()),
    }
}

/// Build the ConfigMap representing a lock record
pub fn config_map_from_lock_record(record: &LockRecord) -> ConfigMap {
    ConfigMap {
        metadata: metav1::ObjectMeta {
            namespace: Some(record.namespace.clone()),
            name: Some(record.name.clone()),
            owner_references: Some(
                record
                    .owner_references
                    .iter()
                    .map(|o| metav1::OwnerReference {
                        api_version: o.api_version.clone(),
                        kind: o.kind.clone(),
                        name: o.name.clone(),
                        uid: o.uid.clone(),
                        ..Default::default()
                    })
                    .collect(),
            ),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Read a lock record back out of a ConfigMap
pub fn lock_record_from_config_map(cm: ConfigMap, namespace: &str) -> LockRecord {
    let meta = cm.metadata;
    LockRecord {
        namespace: meta.namespace.unwrap_or_else(|| namespace.to_string()),
        name: meta.name.unwrap_or_default(),
        owner_references: meta
            .owner_references
            .unwrap_or_default()
            .into_iter()
            .map(|o| OwnerReference {
                api_version: o.api_version,
                kind: o.kind,
                name: o.name,
                uid: o.uid,
            })
            .collect(),
    }
}
