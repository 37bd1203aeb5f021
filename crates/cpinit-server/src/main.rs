//! Main entry point for the cpinit command line tool.
//!
//! Exit status: 0 when the command's outcome is true (acquired, released,
//! locked), 1 when it is false, 2 when setup fails.

use std::process::ExitCode;

use clap::Parser;
use cpinit_server::{Cli, Configuration, command, startup};
use tracing::error;

const EXIT_FALSE: u8 = 1;
const EXIT_ERROR: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let configuration = match Configuration::new(&cli) {
        Ok(configuration) => configuration,
        Err(e) => {
            eprintln!("{:#}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let _logging_guard = match startup::init_logging(&configuration.logging_config()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{:#}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    cpinit_lock::metrics::describe_metrics();

    let result = async {
        let client = startup::kube_client(configuration.kube_context().as_deref()).await?;
        command::run(&cli.command, &configuration, client).await
    }
    .await;

    match result {
        Ok(outcome) => {
            println!("{}", command::outcome_label(&cli.command, outcome));
            if outcome {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(EXIT_FALSE)
            }
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
