// src/bin/cli.rs
use nfl_sync::cli;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    cli::run()
}
