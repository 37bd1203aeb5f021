//! Cluster identity extraction
//!
//! Reads the namespace, name, UID and type metadata the lock needs from a
//! Kubernetes object, either a typed resource or a dynamically fetched one.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::{ApiResource, DynamicObject, GroupVersionKind};
use kube::{Api, Client, Resource, ResourceExt};
use tracing::debug;

use cpinit_common::{ClusterIdentity, CpInitError};

/// Identity of a statically typed resource
pub fn cluster_identity<K>(obj: &K) -> Result<ClusterIdentity, CpInitError>
where
    K: Resource<DynamicType = ()>,
{
    identity_from_meta(
        obj.meta(),
        K::api_version(&()).into_owned(),
        K::kind(&()).into_owned(),
    )
}

/// Identity of a dynamic object.
///
/// Type metadata embedded in the object wins over the `ApiResource` it was
/// fetched with.
pub fn dynamic_cluster_identity(
    obj: &DynamicObject,
    resource: &ApiResource,
) -> Result<ClusterIdentity, CpInitError> {
    let (api_version, kind) = match &obj.types {
        Some(types) => (types.api_version.clone(), types.kind.clone()),
        None => (resource.api_version.clone(), resource.kind.clone()),
    };
    identity_from_meta(obj.meta(), api_version, kind)
}

fn identity_from_meta(
    meta: &ObjectMeta,
    api_version: String,
    kind: String,
) -> Result<ClusterIdentity, CpInitError> {
    let identity = ClusterIdentity {
        namespace: meta.namespace.clone().unwrap_or_default(),
        name: meta.name.clone().unwrap_or_default(),
        uid: meta.uid.clone().unwrap_or_default(),
        api_version,
        kind,
    };
    identity.validate()?;
    Ok(identity)
}

/// Describe the Cluster resource type from its group/version/kind and plural
pub fn cluster_api_resource(group: &str, version: &str, kind: &str, plural: &str) -> ApiResource {
    ApiResource::from_gvk_with_plural(&GroupVersionKind::gvk(group, version, kind), plural)
}

/// Fetch a Cluster object and read its identity
pub async fn fetch_cluster_identity(
    client: Client,
    resource: &ApiResource,
    namespace: &str,
    name: &str,
) -> Result<ClusterIdentity, CpInitError> {
    let api: Api<DynamicObject> = Api::namespaced_with(client, namespace, resource);
    let obj = api.get(name).await.map_err(|e| {
        CpInitError::ClientError(format!(
            "failed to get {} {}/{}: {}",
            resource.kind, namespace, name, e
        ))
    })?;

    debug!(
        namespace = %namespace,
        cluster_name = %obj.name_any(),
        uid = ?obj.uid(),
        "Fetched cluster"
    );
    dynamic_cluster_identity(&obj, resource)
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::Namespace;
    use kube::core::TypeMeta;

    fn meta(namespace: Option<&str>, name: &str, uid: Option<&str>) -> ObjectMeta {
        ObjectMeta {
            namespace: namespace.map(str::to_string),
            name: Some(name.to_string()),
            uid: uid.map(str::to_string),
            ..Default::default()
        }
    }

    fn cluster_resource() -> ApiResource {
        cluster_api_resource("cluster.x-k8s.io", "v1beta1", "Cluster", "clusters")
    }

    #[test]
    fn test_cluster_api_resource() {
        let ar = cluster_resource();
        assert_eq!(ar.api_version, "cluster.x-k8s.io/v1beta1");
        assert_eq!(ar.kind, "Cluster");
        assert_eq!(ar.plural, "clusters");
    }

    #[test]
    fn test_dynamic_identity_prefers_embedded_types() {
        let mut obj = DynamicObject::new("cl1", &cluster_resource());
        obj.metadata = meta(Some("ns1"), "cl1", Some("abc-123"));
        obj.types = Some(TypeMeta {
            api_version: "cluster.x-k8s.io/v1alpha2".to_string(),
            kind: "Cluster".to_string(),
        });

        let identity = dynamic_cluster_identity(&obj, &cluster_resource()).unwrap();
        assert_eq!(
            identity,
            ClusterIdentity::new(
                "ns1",
                "cl1",
                "abc-123",
                "cluster.x-k8s.io/v1alpha2",
                "Cluster"
            )
        );
        assert_eq!(identity.lock_record_name(), "abc-123-controlplane");
    }

    #[test]
    fn test_dynamic_identity_falls_back_to_resource() {
        let mut obj = DynamicObject::new("cl1", &cluster_resource());
        obj.metadata = meta(Some("ns1"), "cl1", Some("abc-123"));
        obj.types = None;

        let identity = dynamic_cluster_identity(&obj, &cluster_resource()).unwrap();
        assert_eq!(identity.api_version, "cluster.x-k8s.io/v1beta1");
        assert_eq!(identity.kind, "Cluster");
    }

    #[test]
    fn test_identity_requires_uid() {
        let mut obj = DynamicObject::new("cl1", &cluster_resource());
        obj.metadata = meta(Some("ns1"), "cl1", None);

        let err = dynamic_cluster_identity(&obj, &cluster_resource()).unwrap_err();
        assert!(matches!(err, CpInitError::InvalidIdentity(_)));
    }

    #[test]
    fn test_typed_identity_requires_namespace() {
        // Cluster-scoped objects cannot hold a namespaced lock record
        let ns = Namespace {
            metadata: meta(None, "ns1", Some("uid-1")),
            ..Default::default()
        };

        let err = cluster_identity(&ns).unwrap_err();
        assert_eq!(err.to_string(), "invalid cluster identity: missing namespace");
    }
}
