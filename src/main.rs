//! Folio - markdown renderer for a personal blog.
//!
//! Renders fenced code blocks three ways: ordinary code is highlighted,
//! `mermaid` blocks become SVG diagrams and JSON infographic blocks become
//! cards, progress bars, tables and timelines.

mod cli;
mod config;
mod content;
mod logger;
mod markdown;
mod utils;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::SiteConfig;

fn main() -> Result<()> {
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
        Commands::Render { file, output, .. } => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("Failed to start async runtime")?;
            runtime.block_on(cli::render::render_file(file, output.as_deref(), &config))
        }
        Commands::Check { paths } => cli::check::check_content(paths, &config),
    }
}
