//! Bookforge CLI: turn word-processor documents into LaTeX book chapters.
//!
//! Four independent passes (extract, chapters, escape, renumber), each run
//! on demand against a configurable book directory layout.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
