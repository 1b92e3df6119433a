//! Bindery - embed files into generated Rust source.

#![allow(dead_code)]

mod cli;
mod codec;
mod config;
mod emit;
mod logger;
mod registry;
mod scan;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    logger::set_verbose(cli.verbose);

    let config = Config::load(&cli)?;

    match &cli.command {
        Commands::Init { path } => cli::init::init_project(path.as_deref()),
        Commands::Generate { .. } => cli::generate::run(&config),
        Commands::List { args } => cli::list::run(args, &config),
        Commands::Extract { args } => cli::extract::run(args, &config),
    }
}
