// Kubernetes client bootstrap

use anyhow::Context;
use kube::config::KubeConfigOptions;
use kube::{Client, Config};
use tracing::{debug, info};

/// Build a client from an explicit kubeconfig context, or infer one
/// (in-cluster service account first, then the default kubeconfig).
pub async fn kube_client(context: Option<&str>) -> anyhow::Result<Client> {
    let config = match context {
        Some(ctx) => {
            info!(context = %ctx, "Loading kubeconfig context");
            let options = KubeConfigOptions {
                context: Some(ctx.to_string()),
                ..Default::default()
            };
            Config::from_kubeconfig(&options)
                .await
                .with_context(|| format!("Failed to load kubeconfig context '{}'", ctx))?
        }
        None => Config::infer()
            .await
            .context("Failed to infer Kubernetes configuration")?,
    };

    debug!(cluster_url = %config.cluster_url, "Creating Kubernetes client");
    Client::try_from(config).context("Failed to create Kubernetes client")
}
