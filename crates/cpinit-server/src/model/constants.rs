//! Configuration keys and defaults

pub const LOG_LEVEL: &str = "log.level";
pub const LOG_DIR: &str = "log.dir";
pub const LOG_CONSOLE: &str = "log.console";
pub const LOG_FILE: &str = "log.file";
pub const LOG_ROTATION: &str = "log.rotation";

pub const KUBE_CONTEXT: &str = "kube.context";

pub const CLUSTER_GROUP: &str = "cluster.group";
pub const CLUSTER_VERSION: &str = "cluster.version";
pub const CLUSTER_KIND: &str = "cluster.kind";
pub const CLUSTER_PLURAL: &str = "cluster.plural";

pub const DEFAULT_CONFIG_FILE: &str = "conf/cpinit.yml";
pub const ENV_PREFIX: &str = "CPINIT";

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_LOG_ROTATION: &str = "daily";

/// Cluster API defaults
pub const DEFAULT_CLUSTER_GROUP: &str = "cluster.x-k8s.io";
pub const DEFAULT_CLUSTER_VERSION: &str = "v1beta1";
pub const DEFAULT_CLUSTER_KIND: &str = "Cluster";
pub const DEFAULT_CLUSTER_PLURAL: &str = "clusters";
