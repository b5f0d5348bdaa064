//! minweb - combine, minify and link JavaScript/CSS assets.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use minweb::cli::{Cli, Commands, build::run_build, link::run_link};
use minweb::config::MinwebConfig;
use minweb::logger;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = MinwebConfig::load(&cli)?;

    match &cli.command {
        Commands::Link { args } => run_link(&config, args),
        Commands::Build { names, json } => run_build(&config, names, *json),
    }
}
