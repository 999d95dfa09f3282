//! Structured infographic blocks.
//!
//! Every infographic goes through the same entry contract:
//!
//! 1. empty payload -> `No data provided`
//! 2. JSON parse -> `Invalid JSON: <detail>`
//! 3. strategy lookup by tag -> `Unknown infographic type: <tag>`
//! 4. the strategy's own shape validation
//!
//! Any failure is returned as an [`ErrorPresentation`] carrying the raw text
//! exactly as written, so the caller can substitute an error card and move on.

mod glyph;
pub mod progress;
pub mod stat;
pub mod table;
pub mod timeline;
mod value;

use serde_json::Value;
use thiserror::Error;

use super::error::ErrorPresentation;
use super::node::Node;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InfographicError {
    #[error("No data provided")]
    Empty,
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),
    /// Payload parsed but lacks a required field.
    #[error("{0}")]
    Shape(String),
    #[error("Unknown infographic type: {0}")]
    UnknownType(String),
}

/// A strategy turns a parsed payload into a card or rejects its shape.
pub type Strategy = fn(&Value) -> Result<Node, InfographicError>;

/// Tag to strategy table.
pub const STRATEGIES: [(&str, Strategy); 4] = [
    ("stat-block", stat::render),
    ("timeline", timeline::render),
    ("comparison-table", table::render),
    ("progress-bar", progress::render),
];

/// Look up the strategy registered for `tag`.
pub fn strategy(tag: &str) -> Option<Strategy> {
    STRATEGIES
        .iter()
        .find(|(name, _)| *name == tag)
        .map(|(_, render)| *render)
}

/// Render one infographic block.
pub fn render(tag: &str, raw: &str) -> Result<Node, ErrorPresentation> {
    try_render(tag, raw).map_err(|err| ErrorPresentation::new(err.to_string(), raw, tag))
}

fn try_render(tag: &str, raw: &str) -> Result<Node, InfographicError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(InfographicError::Empty);
    }

    let data: Value =
        serde_json::from_str(text).map_err(|e| InfographicError::InvalidJson(e.to_string()))?;

    let render = strategy(tag).ok_or_else(|| InfographicError::UnknownType(tag.to_string()))?;
    render(&data)
}
