//! Entry point: parses the CLI, installs tracing, then either probes for a
//! GPU or resolves the configuration and opens the demo window.

mod cli;
mod config;
mod run;

use anyhow::Result;
use cli::Command;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    match cli.command {
        Some(Command::Probe) => run::probe(&cli.run),
        None => run::run(&cli.run),
    }
}
