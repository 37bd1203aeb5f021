//! Configuration management
//!
//! Sources, lowest precedence first: the optional config file, `CPINIT_*`
//! environment variables (`__` separates nested keys, e.g.
//! `CPINIT_LOG__LEVEL`), then command line overrides.

use anyhow::Context;
use config::{Config, Environment, File};

use cpinit_common::ClusterIdentity;
use cpinit_kube::cluster_api_resource;
use kube::api::ApiResource;

use crate::startup::LoggingConfig;

use super::cli::{Cli, ClusterArgs};
use super::constants::*;

/// Application configuration loaded from config files and environment
#[derive(Clone, Debug, Default)]
pub struct Configuration {
    pub config: Config,
}

impl Configuration {
    pub fn new(cli: &Cli) -> anyhow::Result<Self> {
        let env = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true);
        Self::build(cli, Some(env))
    }

    /// Build from the config file and CLI overrides only
    pub fn without_env(cli: &Cli) -> anyhow::Result<Self> {
        Self::build(cli, None)
    }

    fn build(cli: &Cli, env: Option<Environment>) -> anyhow::Result<Self> {
        let mut builder =
            Config::builder().add_source(File::with_name(&cli.config_file).required(false));
        if let Some(env) = env {
            builder = builder.add_source(env);
        }

        if let Some(v) = &cli.context {
            builder = builder
                .set_override(KUBE_CONTEXT, v.as_str())
                .context("Failed to set kube context override")?;
        }
        if let Some(v) = &cli.log_level {
            builder = builder
                .set_override(LOG_LEVEL, v.as_str())
                .context("Failed to set log level override")?;
        }

        let config = builder
            .build()
            .with_context(|| format!("Failed to build configuration from {}", cli.config_file))?;

        Ok(Configuration { config })
    }

    // ========================================================================
    // Logging Configuration
    // ========================================================================

    pub fn log_level(&self) -> String {
        self.config
            .get_string(LOG_LEVEL)
            .unwrap_or(DEFAULT_LOG_LEVEL.to_string())
    }

    pub fn log_dir(&self) -> Option<String> {
        self.config.get_string(LOG_DIR).ok()
    }

    pub fn log_console(&self) -> bool {
        self.config.get_bool(LOG_CONSOLE).unwrap_or(true)
    }

    pub fn log_file(&self) -> bool {
        self.config.get_bool(LOG_FILE).unwrap_or(false)
    }

    pub fn log_rotation(&self) -> String {
        self.config
            .get_string(LOG_ROTATION)
            .unwrap_or(DEFAULT_LOG_ROTATION.to_string())
    }

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig::from_config(
            self.log_dir(),
            self.log_console(),
            self.log_file(),
            &self.log_level(),
            &self.log_rotation(),
        )
    }

    // ========================================================================
    // Kubernetes Configuration
    // ========================================================================

    pub fn kube_context(&self) -> Option<String> {
        self.config
            .get_string(KUBE_CONTEXT)
            .ok()
            .filter(|c| !c.is_empty())
    }

    pub fn cluster_group(&self) -> String {
        self.config
            .get_string(CLUSTER_GROUP)
            .unwrap_or(DEFAULT_CLUSTER_GROUP.to_string())
    }

    pub fn cluster_version(&self) -> String {
        self.config
            .get_string(CLUSTER_VERSION)
            .unwrap_or(DEFAULT_CLUSTER_VERSION.to_string())
    }

    pub fn cluster_kind(&self) -> String {
        self.config
            .get_string(CLUSTER_KIND)
            .unwrap_or(DEFAULT_CLUSTER_KIND.to_string())
    }

    pub fn cluster_plural(&self) -> String {
        self.config
            .get_string(CLUSTER_PLURAL)
            .unwrap_or(DEFAULT_CLUSTER_PLURAL.to_string())
    }

    pub fn cluster_api_version(&self) -> String {
        format!("{}/{}", self.cluster_group(), self.cluster_version())
    }

    pub fn cluster_api_resource(&self) -> ApiResource {
        cluster_api_resource(
            &self.cluster_group(),
            &self.cluster_version(),
            &self.cluster_kind(),
            &self.cluster_plural(),
        )
    }

    /// Identity from explicit arguments, filling type metadata from config.
    ///
    /// Returns `None` when the arguments ask for the cluster to be fetched.
    pub fn explicit_identity(&self, args: &ClusterArgs) -> Option<ClusterIdentity> {
        if args.fetch {
            return None;
        }
        Some(ClusterIdentity::new(
            &args.namespace,
            &args.name,
            args.uid.clone().unwrap_or_default(),
            args.api_version
                .clone()
                .unwrap_or_else(|| self.cluster_api_version()),
            args.kind.clone().unwrap_or_else(|| self.cluster_kind()),
        ))
    }
}
