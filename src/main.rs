//! conhub CLI entry point.

use clap::Parser;
use colored::Colorize;

use conhub::cli::Cli;

fn main() {
    let cli = Cli::parse();
    cli.init_logging();

    if let Err(e) = cli.execute() {
        eprintln!("{} {e:#}", "error:".red().bold());
        std::process::exit(1);
    }
}
