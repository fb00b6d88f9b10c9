use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

use callmatch::api::ApiResponse;
use callmatch::cli::{Cli, Commands};
use callmatch::commands::{self, format_body, GlobalOptions};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    callmatch::observability::init_tracing(cli.verbosity);

    let options = GlobalOptions {
        config: cli.config,
        data_dir: cli.data_dir,
    };

    match cli.command {
        Commands::Ingest { input } => {
            let response = commands::run_ingest_command(&options, &input)?;
            Ok(finish(&response, format_body(&response)))
        }
        Commands::Trigger { event, print } => {
            let (response, table) = commands::run_trigger_command(&options, &event, print)?;
            let code = finish(&response, format_body(&response));
            if let Some(table) = table {
                println!("{table}");
            }
            Ok(code)
        }
        Commands::Invoke { route, input } => {
            let response = commands::run_invoke_command(&options, route.into(), &input)?;
            let envelope = serde_json::to_string_pretty(&response)?;
            Ok(finish(&response, envelope))
        }
        Commands::Init { force } => {
            commands::init_config(&std::env::current_dir()?, force)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

// Print the response and map its status to the process exit code.
fn finish(response: &ApiResponse, output: String) -> ExitCode {
    println!("{output}");
    if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
