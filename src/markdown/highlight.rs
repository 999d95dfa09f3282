//! Syntax highlighting for ordinary code blocks.
//!
//! Output is class-based (`<span class="source rust">`), so the page stylesheet
//! decides the colors and the same markup works in light and dark mode.

use std::sync::LazyLock;

use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use super::node::Node;
use crate::debug;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);

/// Generic code highlighter.
pub trait Highlighter: Send + Sync {
    /// Highlight `text` as `language`.
    ///
    /// Returns `None` when the language is not registered, in which case the
    /// caller shows the code unstyled.
    fn highlight(&self, text: &str, language: &str) -> Option<Node>;
}

/// Highlighter that never recognizes a language.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainText;

impl Highlighter for PlainText {
    fn highlight(&self, _text: &str, _language: &str) -> Option<Node> {
        None
    }
}

/// syntect-backed highlighter using the bundled default grammars.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntectHighlighter;

#[cfg(test)]
impl SyntectHighlighter {
    pub fn supports(&self, language: &str) -> bool {
        SYNTAX_SET.find_syntax_by_token(language).is_some()
    }
}

impl Highlighter for SyntectHighlighter {
    fn highlight(&self, text: &str, language: &str) -> Option<Node> {
        let syntax = SYNTAX_SET.find_syntax_by_token(language)?;
        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &SYNTAX_SET, ClassStyle::Spaced);

        for line in LinesWithEndings::from(text) {
            if let Err(e) = generator.parse_html_for_line_which_includes_newline(line) {
                debug!("highlight"; "{} highlighting failed: {}", language, e);
                return None;
            }
        }

        Some(Node::raw(generator.finalize()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_language_produces_spans() {
        let node = SyntectHighlighter
            .highlight("fn main() {}\n", "rust")
            .unwrap();
        let html = node.to_html();
        assert!(html.contains("<span class=\""));
        assert!(html.contains("main"));
    }

    #[test]
    fn test_extension_token_is_accepted() {
        assert!(SyntectHighlighter.supports("rs"));
        assert!(SyntectHighlighter.supports("python"));
    }

    #[test]
    fn test_unknown_language() {
        assert!(SyntectHighlighter.highlight("x", "not-a-language").is_none());
        assert!(!SyntectHighlighter.supports("not-a-language"));
    }

    #[test]
    fn test_output_is_escaped() {
        let node = SyntectHighlighter
            .highlight("if a < b { }\n", "rust")
            .unwrap();
        assert!(node.to_html().contains("&lt;"));
    }

    #[test]
    fn test_plain_text_never_highlights() {
        assert!(PlainText.highlight("fn main() {}", "rust").is_none());
    }
}
