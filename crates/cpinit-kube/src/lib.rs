//! Kubernetes backend for the control-plane init lock
//!
//! Lock records are ConfigMaps named `<cluster-uid>-controlplane` in the
//! cluster's namespace, owned by the Cluster object so the garbage collector
//! removes them together with it.

mod cluster;
mod store;

pub use cluster::*;
pub use store::*;

use cpinit_lock::ControlPlaneInitLocker;

/// Init locker backed by ConfigMaps
pub type ConfigMapInitLocker = ControlPlaneInitLocker<ConfigMapStore>;

/// Create a ConfigMap-backed init locker from a Kubernetes client
pub fn config_map_locker(client: kube::Client) -> ConfigMapInitLocker {
    ControlPlaneInitLocker::new(ConfigMapStore::new(client))
}
