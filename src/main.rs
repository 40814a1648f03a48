//! catalog-routes - route, slug and static artifact consistency engine for
//! multi-locale statically exported catalog sites.

mod cli;
mod config;
mod content;
mod core;
mod embed;
mod logger;
mod router;
mod slug;
mod synth;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::SiteConfig;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = SiteConfig::load(&cli)?;

    match &cli.command {
        Commands::Validate { args } => cli::validate::validate_site(&config, args),
        Commands::Synthesize { args } => cli::synthesize::synthesize_site(&config, args),
        Commands::Build { args } => cli::build::build_site(&config, args),
        Commands::Repair { args } => cli::repair::repair_content(&config, args),
        Commands::Route { args } => cli::route::route_paths(&config, args),
        Commands::Compose {
            locale,
            content_type,
            slug,
            brand,
        } => cli::route::compose(&config, locale, *content_type, slug, brand.as_deref()),
        Commands::Serve { .. } => cli::serve::serve_site(&config),
    }
}
