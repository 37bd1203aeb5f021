//! Command execution
//!
//! Each command runs one lock operation and reports its boolean outcome.
//! Retrying is left to whatever invokes the binary.

use kube::Client;
use tracing::{Instrument, info, info_span};

use cpinit_common::ClusterIdentity;
use cpinit_kube::{ConfigMapStore, fetch_cluster_identity};
use cpinit_lock::{ControlPlaneInitLocker, InitLocker, LockRecordStore};

use crate::model::{ClusterArgs, Command, Configuration};

/// Printed result of a command
pub fn outcome_label(command: &Command, outcome: bool) -> &'static str {
    match (command, outcome) {
        (Command::Acquire(_), true) => "acquired",
        (Command::Acquire(_), false) => "not acquired",
        (Command::Release(_), true) => "released",
        (Command::Release(_), false) => "not released",
        (Command::Status(_), true) => "locked",
        (Command::Status(_), false) => "unlocked",
    }
}

/// Resolve the cluster identity, fetching the cluster object if asked to
pub async fn resolve_identity(
    client: &Client,
    configuration: &Configuration,
    args: &ClusterArgs,
) -> anyhow::Result<ClusterIdentity> {
    match configuration.explicit_identity(args) {
        Some(identity) => Ok(identity),
        None => {
            let resource = configuration.cluster_api_resource();
            let identity =
                fetch_cluster_identity(client.clone(), &resource, &args.namespace, &args.name)
                    .await?;
            Ok(identity)
        }
    }
}

/// Run a lock command against any record store.
///
/// `status` is the only command that can fail outright: a store error while
/// probing is reported instead of being folded into "unlocked".
pub async fn execute<S: LockRecordStore>(
    locker: &ControlPlaneInitLocker<S>,
    command: &Command,
    cluster: &ClusterIdentity,
) -> anyhow::Result<bool> {
    let outcome = match command {
        Command::Acquire(_) => locker.acquire(cluster).await,
        Command::Release(_) => locker.release(cluster).await,
        Command::Status(_) => locker.is_locked(cluster).await?,
    };
    Ok(outcome)
}

/// Run the command line's command against the Kubernetes API
pub async fn run(
    command: &Command,
    configuration: &Configuration,
    client: Client,
) -> anyhow::Result<bool> {
    let cluster = resolve_identity(&client, configuration, command.cluster_args()).await?;

    let span = info_span!("cpinit", command = command.name());
    let locker = ControlPlaneInitLocker::with_span(ConfigMapStore::new(client), span.clone());

    let outcome = execute(&locker, command, &cluster).instrument(span).await?;
    info!(
        namespace = %cluster.namespace,
        cluster_name = %cluster.name,
        record_name = %cluster.lock_record_name(),
        outcome = outcome_label(command, outcome),
        "Command finished"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use cpinit_lock::MemoryRecordStore;

    use super::*;
    use crate::model::Cli;

    fn command(args: &[&str]) -> Command {
        let mut argv = vec!["cpinit"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["-n", "ns1", "--name", "cl1", "--uid", "abc-123"]);
        Cli::try_parse_from(argv).unwrap().command
    }

    fn cluster() -> ClusterIdentity {
        ClusterIdentity::new("ns1", "cl1", "abc-123", "cluster.x-k8s.io/v1beta1", "Cluster")
    }

    #[tokio::test]
    async fn test_execute_sequence() {
        let locker = ControlPlaneInitLocker::new(MemoryRecordStore::new());
        let (acquire, release, status) = (
            command(&["acquire"]),
            command(&["release"]),
            command(&["status"]),
        );

        assert!(!execute(&locker, &status, &cluster()).await.unwrap());
        assert!(execute(&locker, &acquire, &cluster()).await.unwrap());
        assert!(execute(&locker, &status, &cluster()).await.unwrap());
        assert!(!execute(&locker, &acquire, &cluster()).await.unwrap());
        assert!(execute(&locker, &release, &cluster()).await.unwrap());
        assert!(execute(&locker, &release, &cluster()).await.unwrap());
        assert!(!execute(&locker, &status, &cluster()).await.unwrap());
    }

    #[test]
    fn test_outcome_label() {
        assert_eq!(outcome_label(&command(&["acquire"]), true), "acquired");
        assert_eq!(outcome_label(&command(&["acquire"]), false), "not acquired");
        assert_eq!(outcome_label(&command(&["release"]), false), "not released");
        assert_eq!(outcome_label(&command(&["status"]), true), "locked");
    }
}
