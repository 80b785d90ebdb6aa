//! hashedassets - copy files to content-hashed names and write a map of them.

mod cli;
mod config;
mod hasher;
mod logger;
mod map;
mod rewrite;
mod serializer;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, CommandFactory, Parser, error::ErrorKind};
use cli::Cli;
use config::Config;
use logger::{Logger, Sink};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = match Config::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => Cli::command().error(ErrorKind::ValueValidation, e).exit(),
    };

    // Keep stdout clean when the map itself goes there
    let sink = if config.map_to_stdout() { Sink::Stderr } else { Sink::Stdout };
    let log = Logger::new(config.verbosity, sink);

    cli::run(&config, log)?;
    Ok(())
}
