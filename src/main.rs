//! prerender - A post-build SEO pipeline for single-page apps.

mod catalog;
mod cli;
mod config;
mod core;
mod generator;
mod logger;
mod pipeline;
mod route;
mod seo;
mod snapshot;
mod utils;

use anyhow::{Context, Result};
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

    let config = SiteConfig::load(&cli)?;

    // Verify never touches the network or spawns anything
    if let Commands::Verify { .. } = cli.command {
        return cli::snapshot::verify_site(&config);
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(async {
        match &cli.command {
            Commands::Generate { .. } => cli::generate::generate_site(&config).await.map(|_| ()),
            Commands::Snapshot { .. } => cli::snapshot::snapshot_site(&config).await.map(|_| ()),
            Commands::Build { .. } => cli::build::build_site(&config).await,
            Commands::Verify { .. } => cli::snapshot::verify_site(&config),
        }
    })
}
