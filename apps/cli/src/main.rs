//! docsite CLI — assembles and edits the configuration of a documentation
//! site generator.
//!
//! Reads `metadata.json` from the site directory, applies command-line
//! overrides, and prints the validated, linked config as JSON.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
