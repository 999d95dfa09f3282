//! Configuration management for `folio.toml`.
//!
//! # Sections
//!
//! | Section      | Purpose                                   |
//! |--------------|-------------------------------------------|
//! | `[content]`  | Markdown source directory                 |
//! | `[render]`   | Initial dark flag, code highlighting      |
//! | `[diagram]`  | Mermaid compiler command and timeout      |
//!
//! The file is optional. Without one every section takes its defaults and
//! the project root is the working directory.

mod error;
pub mod section;
mod util;

pub use error::{ConfigDiagnostics, ConfigError};
pub use section::{ContentConfig, DiagramConfig, RenderConfig};

use util::find_config_file;

use crate::cli::{Cli, RenderArgs};
use crate::debug;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing folio.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute path to the config file, if one was found (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub content: ContentConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub diagram: DiagramConfig,
}

impl SiteConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd for the config file. The project root is the
    /// config file's parent directory, or cwd when there is no file.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cli.config) {
            Some(path) => {
                debug!("config"; "using {}", path.display());
                let mut config = Self::from_path(&path)?;
                config.config_path = Some(path);
                config
            }
            None => {
                debug!("config"; "no {} found, using defaults", cli.config.display());
                Self::default()
            }
        };

        let root = config
            .config_path
            .as_deref()
            .and_then(Path::parent)
            .map_or(cwd, Path::to_path_buf);
        config.finalize(&root, cli.render_args());
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content).with_context(|| format!("in {}", path.display()))
    }

    /// Resolve paths against `root` and apply command line overrides.
    fn finalize(&mut self, root: &Path, args: Option<&RenderArgs>) {
        self.root = root.to_path_buf();
        self.normalize_paths();
        if let Some(args) = args {
            self.apply_render_args(args);
        }
    }

    fn normalize_paths(&mut self) {
        if self.content.dir.is_relative() {
            self.content.dir = self.root.join(&self.content.dir);
        }
    }

    fn apply_render_args(&mut self, args: &RenderArgs) {
        // Flags only ever switch away from the config value
        Self::update_option(&mut self.render.dark, args.dark.then_some(&true));
        Self::update_option(&mut self.render.highlight, args.no_highlight.then_some(&false));
        Self::update_option(&mut self.diagram.enabled, args.no_diagrams.then_some(&false));
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Validate configuration.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.content.validate(&mut diag);
        self.diagram.validate(&mut diag);

        diag.into_result()?;
        Ok(())
    }

    /// Content directory (absolute after [`SiteConfig::load`]).
    pub fn content_dir(&self) -> &Path {
        &self.content.dir
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config from a TOML snippet.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> SiteConfig {
    SiteConfig::from_str(content).unwrap()
}

// ============================================================================
// tests
// ============================================================================
