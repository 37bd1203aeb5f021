//! Command line arguments

use clap::{Args, Parser, Subcommand};

use super::constants::DEFAULT_CONFIG_FILE;

/// Control-plane initialization lock for Cluster API clusters
#[derive(Debug, Parser)]
#[command(name = "cpinit", version, about)]
pub struct Cli {
    /// Configuration file (optional; missing file is ignored)
    #[arg(short = 'c', long = "config", env = "CPINIT_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config_file: String,

    /// Kubeconfig context to use instead of the inferred one
    #[arg(long = "context")]
    pub context: Option<String>,

    /// Log level override (trace, debug, info, warn, error)
    #[arg(long = "log-level")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Try to take the init lock; exits 0 only if this call acquired it
    Acquire(ClusterArgs),
    /// Release the init lock; exits 0 when no lock record remains
    Release(ClusterArgs),
    /// Report whether the init lock is held; exits 0 when locked
    Status(ClusterArgs),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Acquire(_) => "acquire",
            Command::Release(_) => "release",
            Command::Status(_) => "status",
        }
    }

    pub fn cluster_args(&self) -> &ClusterArgs {
        match self {
            Command::Acquire(args) | Command::Release(args) | Command::Status(args) => args,
        }
    }
}

/// Identifies the cluster, either explicitly or by fetching it
#[derive(Debug, Clone, Args)]
pub struct ClusterArgs {
    /// Namespace of the cluster
    #[arg(short = 'n', long = "namespace")]
    pub namespace: String,

    /// Name of the cluster
    #[arg(long = "name")]
    pub name: String,

    /// UID of the cluster
    #[arg(long = "uid", required_unless_present = "fetch")]
    pub uid: Option<String>,

    /// API version for the owner reference (defaults to the configured group/version)
    #[arg(long = "api-version")]
    pub api_version: Option<String>,

    /// Kind for the owner reference (defaults to the configured kind)
    #[arg(long = "kind")]
    pub kind: Option<String>,

    /// Read UID and type metadata from the cluster object itself
    #[arg(long = "fetch", conflicts_with_all = ["uid", "api_version", "kind"])]
    pub fetch: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_explicit_identity() {
        let cli = Cli::try_parse_from([
            "cpinit", "acquire", "-n", "ns1", "--name", "cl1", "--uid", "abc-123",
        ])
        .unwrap();

        assert_eq!(cli.config_file, DEFAULT_CONFIG_FILE);
        assert_eq!(cli.command.name(), "acquire");
        let args = cli.command.cluster_args();
        assert_eq!(args.namespace, "ns1");
        assert_eq!(args.uid.as_deref(), Some("abc-123"));
        assert!(!args.fetch);
    }

    #[test]
    fn test_parse_fetch() {
        let cli = Cli::try_parse_from([
            "cpinit",
            "--context",
            "mgmt",
            "release",
            "-n",
            "ns1",
            "--name",
            "cl1",
            "--fetch",
        ])
        .unwrap();

        assert_eq!(cli.context.as_deref(), Some("mgmt"));
        assert!(matches!(cli.command, Command::Release(ref a) if a.fetch));
    }

    #[test]
    fn test_uid_required_without_fetch() {
        assert!(Cli::try_parse_from(["cpinit", "status", "-n", "ns1", "--name", "cl1"]).is_err());
    }

    #[test]
    fn test_fetch_conflicts_with_uid() {
        assert!(
            Cli::try_parse_from([
                "cpinit", "status", "-n", "ns1", "--name", "cl1", "--uid", "abc", "--fetch",
            ])
            .is_err()
        );
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
