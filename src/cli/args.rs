//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Folio markdown renderer CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: folio.toml)
    #[arg(short = 'C', long, default_value = "folio.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Render a markdown file to an HTML fragment
    #[command(visible_alias = "r")]
    Render {
        /// Markdown file with optional frontmatter
        #[arg(value_hint = clap::ValueHint::FilePath)]
        file: PathBuf,

        /// Write HTML here instead of stdout
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        output: Option<PathBuf>,

        #[command(flatten)]
        render_args: RenderArgs,
    },

    /// Report malformed infographic and diagram blocks
    #[command(visible_alias = "c")]
    Check {
        /// Files or directories to check. If omitted, checks the content directory.
        #[arg(value_name = "PATH")]
        paths: Vec<PathBuf>,
    },
}

/// Render options overriding `[render]` and `[diagram]`.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct RenderArgs {
    /// Start diagrams with the dark palette
    #[arg(long)]
    pub dark: bool,

    /// Disable syntax highlighting for ordinary code blocks
    #[arg(long)]
    pub no_highlight: bool,

    /// Leave mermaid blocks as code instead of compiling them
    #[arg(long)]
    pub no_diagrams: bool,
}

impl Cli {
    pub const fn render_args(&self) -> Option<&RenderArgs> {
        match &self.command {
            Commands::Render { render_args, .. } => Some(render_args),
            Commands::Check { .. } => None,
        }
    }
}
