//! Error cards for blocks that failed to render.
//!
//! A failing block is replaced by a card showing what went wrong plus the
//! untouched source in a `<details>` disclosure. Building a card cannot fail.

use super::node::{Element, Node};

/// A block-level render failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPresentation {
    /// Human-readable failure message.
    pub message: String,
    /// Block source exactly as written (never re-serialized).
    pub raw_text: String,
    /// Fence language of the failing block.
    pub language_tag: String,
}

impl ErrorPresentation {
    pub fn new(
        message: impl Into<String>,
        raw_text: impl Into<String>,
        language_tag: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            raw_text: raw_text.into(),
            language_tag: language_tag.into(),
        }
    }

    /// Card for a failed infographic block.
    pub fn to_node(&self) -> Node {
        let heading = format!("Infographic Error ({}):", self.language_tag);
        error_card("infographic-error", &heading, &self.message, &self.raw_text)
    }
}

/// Shared card layout for infographic and diagram failures.
pub(crate) fn error_card(class: &str, heading: &str, message: &str, raw_text: &str) -> Node {
    let summary = Element::new("p")
        .attr("class", "block-error-message")
        .child(Element::new("strong").text(heading))
        .text(format!(" {message}"));

    let source = Element::new("details")
        .attr("class", "block-error-source")
        .child(Element::new("summary").text("View source"))
        .child(Element::new("pre").text(raw_text));

    Element::with_class("div", format!("block-error {class}"))
        .attr("role", "alert")
        .child(summary)
        .child(source)
        .into()
}
