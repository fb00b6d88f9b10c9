use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::api::{Route, MATCH_TRIGGER_EVENT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RouteArg {
    /// Submission batches
    Ingest,
    /// Report trigger events
    Trigger,
}

impl From<RouteArg> for Route {
    fn from(arg: RouteArg) -> Self {
        match arg {
            RouteArg::Ingest => Route::Ingest,
            RouteArg::Trigger => Route::Trigger,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "callmatch")]
#[command(about = "Match call events to operators and publish risk reports", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file (defaults to the nearest .callmatch.toml)
    #[arg(long, global = true, env = "CALLMATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Data directory for tables and reports (overrides storage.data_dir)
    #[arg(long, global = true, env = "CALLMATCH_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Increase verbosity level (can be repeated: -v, -vv)
    #[arg(short = 'v', long = "verbose", global = true, action = clap::ArgAction::Count)]
    pub verbosity: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate and store a submission batch
    Ingest {
        /// Batch file, or - for stdin
        input: PathBuf,
    },

    /// Generate and publish the match report
    Trigger {
        /// Event text sent to the trigger route
        #[arg(long, default_value = MATCH_TRIGGER_EVENT)]
        event: String,

        /// Read the published report back and print it as a table
        #[arg(long)]
        print: bool,
    },

    /// Run a raw gateway event through method routing
    Invoke {
        /// Route to dispatch to
        #[arg(long, value_enum)]
        route: RouteArg,

        /// Event file, or - for stdin
        input: PathBuf,
    },

    /// Initialize a callmatch configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}
