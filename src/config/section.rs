//! `folio.toml` sections.
//!
//! # Example
//!
//! ```toml
//! [content]
//! dir = "content"             # Markdown sources, relative to folio.toml
//!
//! [render]
//! dark = false                # Initial light/dark flag for diagrams
//! highlight = true            # Syntax highlighting for ordinary code blocks
//!
//! [diagram]
//! enabled = true              # Compile mermaid blocks
//! command = "mmdc"            # mermaid-cli executable
//! timeout = 30                # Seconds per compilation attempt
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::error::{ConfigDiagnostics, FieldPath};

// ============================================================================
// [content]
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentConfig {
    /// Content directory, resolved against the project root after loading.
    pub dir: PathBuf,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("content"),
        }
    }
}

impl ContentConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.dir.as_os_str().is_empty() {
            diag.error(FieldPath::new("content.dir"), "must not be empty");
        }
    }
}

// ============================================================================
// [render]
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub dark: bool,
    pub highlight: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            dark: false,
            highlight: true,
        }
    }
}

// ============================================================================
// [diagram]
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiagramConfig {
    pub enabled: bool,
    /// Executable name or path.
    pub command: String,
    /// Seconds.
    pub timeout: u64,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: "mmdc".into(),
            timeout: 30,
        }
    }
}

impl DiagramConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.timeout == 0 {
            diag.error(FieldPath::new("diagram.timeout"), "must be greater than 0");
        }
        if self.enabled && self.command.trim().is_empty() {
            diag.error_with_hint(
                FieldPath::new("diagram.command"),
                "must not be empty",
                "set `enabled = false` to render mermaid blocks as code",
            );
        }
    }
}
