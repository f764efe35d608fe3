//! Command-line interface for conhub.
//!
//! Two subcommands cover the pipeline end to end:
//! - `conhub list <DIR>` — scan a connector library and show every loadable
//!   template, flagging the ones deferred to variable resolution.
//! - `conhub resolve <DIR> [--config <FILE>]` — scan, build the eager
//!   store, then run the deferred pass with instance overrides from a
//!   configuration file, printing the resulting instances and resource
//!   refs.
//!
//! Both support `--format text|json`; verbosity flags feed the tracing
//! filter unless `RUST_LOG` is set explicitly.

mod list;
mod resolve;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Top-level CLI definition.
#[derive(Parser)]
#[command(name = "conhub", version, about = "Resolve declarative monitoring connector libraries")]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Suppress all logging.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the loadable connectors of a library directory.
    List(list::ListCommand),
    /// Fully resolve a library, including deferred variable resolution.
    Resolve(resolve::ResolveCommand),
}

/// Output rendering selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table output.
    Text,
    /// Machine-readable JSON.
    Json,
}

impl Cli {
    /// Initialize the tracing subscriber according to the global flags.
    /// `RUST_LOG` wins when set; `--quiet` disables logging entirely.
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            let level = match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            };
            EnvFilter::new(level)
        };
        let _ = tracing_subscriber::fmt().with_env_filter(filter).with_target(false).try_init();
    }

    /// Run the selected subcommand.
    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::List(cmd) => cmd.execute(),
            Commands::Resolve(cmd) => cmd.execute(),
        }
    }
}
