pub mod cli;
pub mod config;
pub mod constants;

pub use cli::{Cli, ClusterArgs, Command};
pub use config::Configuration;
