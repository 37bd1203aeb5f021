// cpinit command line front end
// Wires configuration, logging and a Kubernetes client around the init lock

pub mod command; // Command execution
pub mod model; // Configuration and CLI arguments
pub mod startup; // Logging and client bootstrap

pub use model::{Cli, Configuration};
