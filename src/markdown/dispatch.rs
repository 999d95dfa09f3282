//! Block dispatcher: the hook the converter calls for every code node.
//!
//! - inline code is always inline code
//! - `mermaid` becomes a diagram slot, resolved later by the document pipeline
//! - infographic tags go through [`infographic::render`]
//! - everything else is highlighted when the highlighter knows the language
//!
//! Diagram and infographic blocks are self-contained cards, so the `<pre>`
//! the converter wraps around them is dropped.

use super::error::ErrorPresentation;
use super::highlight::Highlighter;
use super::infographic;
use super::language::{LanguageTag, classify};
use super::node::{Element, Node, flatten_text};

/// A code node as produced by the markdown parser.
#[derive(Debug, Clone, PartialEq)]
pub struct FencedBlock {
    pub language: Option<String>,
    pub content: Vec<Node>,
    pub inline: bool,
}

impl FencedBlock {
    pub fn inline(code: impl Into<String>) -> Self {
        Self {
            language: None,
            content: vec![Node::text(code)],
            inline: true,
        }
    }

    /// Flattened and trimmed text content.
    pub fn text(&self) -> String {
        flatten_text(&self.content).trim().to_string()
    }
}

/// Diagram waiting for compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDiagram {
    /// Trimmed diagram source.
    pub source: String,
}

/// Per-document state threaded through the converter.
pub struct RenderContext<'a> {
    highlighter: &'a dyn Highlighter,
    diagrams: Vec<PendingDiagram>,
    errors: Vec<ErrorPresentation>,
}

impl<'a> RenderContext<'a> {
    pub fn new(highlighter: &'a dyn Highlighter) -> Self {
        Self {
            highlighter,
            diagrams: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Diagrams in document order; a slot id is an index into this list.
    #[cfg(test)]
    pub fn diagrams(&self) -> &[PendingDiagram] {
        &self.diagrams
    }

    /// Infographic failures in document order.
    #[cfg(test)]
    pub fn errors(&self) -> &[ErrorPresentation] {
        &self.errors
    }

    pub fn into_parts(self) -> (Vec<PendingDiagram>, Vec<ErrorPresentation>) {
        (self.diagrams, self.errors)
    }
}

// =============================================================================
// Dispatch
// =============================================================================

/// Render one code node.
pub fn dispatch(block: FencedBlock, ctx: &mut RenderContext<'_>) -> Node {
    if block.inline {
        return Element::new("code").children(block.content).into();
    }

    let tag = block.language.as_deref().map(LanguageTag::from_tag);
    match tag {
        Some(LanguageTag::Mermaid) => {
            let id = ctx.diagrams.len();
            ctx.diagrams.push(PendingDiagram {
                source: block.text(),
            });
            Node::Slot(id)
        }
        Some(tag) if tag.is_infographic() => {
            let text = block.text();
            infographic::render(tag.as_str(), &text).unwrap_or_else(|err| {
                crate::debug!("render"; "{} block failed: {}", err.language_tag, err.message);
                let node = err.to_node();
                ctx.errors.push(err);
                node
            })
        }
        _ => render_code(block, ctx.highlighter).into(),
    }
}

/// Generic code: highlighted when the language is known, plain otherwise.
fn render_code(block: FencedBlock, highlighter: &dyn Highlighter) -> Element {
    let Some(language) = block.language else {
        return Element::new("code").children(block.content);
    };

    let code = Element::with_class("code", format!("language-{language}"));
    let text = flatten_text(&block.content);
    match highlighter.highlight(&text, &language) {
        Some(highlighted) => code.child(highlighted),
        None => code.children(block.content),
    }
}

/// Render a `<pre>` element, dispatching its code child.
///
/// The `<pre>` is dropped when its single child is a diagram or infographic;
/// every other code block keeps it.
pub fn render_pre(pre: Element, ctx: &mut RenderContext<'_>) -> Node {
    let code = match pre.children.as_slice() {
        [Node::Element(code)] if code.tag == "code" => code,
        _ => return pre.into(),
    };

    let block = FencedBlock {
        language: code.class().and_then(classify),
        content: code.children.clone(),
        inline: false,
    };
    let custom = block
        .language
        .as_deref()
        .is_some_and(|tag| LanguageTag::from_tag(tag).is_custom());

    let rendered = dispatch(block, ctx);
    if custom {
        rendered
    } else {
        Element {
            children: vec![rendered],
            ..pre
        }
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::highlight::{PlainText, SyntectHighlighter};

    fn pre(language: Option<&str>, text: &str) -> Element {
        let code = match language {
            Some(lang) => Element::with_class("code", format!("language-{lang}")),
            None => Element::new("code"),
        };
        Element::new("pre").child(code.text(text))
    }

    #[test]
    fn test_inline_is_never_a_card() {
        let mut ctx = RenderContext::new(&PlainText);
        let block = FencedBlock {
            language: Some("mermaid".into()),
            content: vec![Node::text("graph TD")],
            inline: true,
        };
        let node = dispatch(block, &mut ctx);
        assert_eq!(node.to_html(), "<code>graph TD</code>");
        assert!(ctx.diagrams().is_empty());
    }

    #[test]
    fn test_mermaid_pre_is_unwrapped_to_slot() {
        let mut ctx = RenderContext::new(&PlainText);
        let node = render_pre(pre(Some("mermaid"), "\n graph TD; A-->B \n"), &mut ctx);
        assert_eq!(node, Node::Slot(0));
        assert_eq!(ctx.diagrams()[0].source, "graph TD; A-->B");
    }

    #[test]
    fn test_infographic_pre_is_unwrapped() {
        let mut ctx = RenderContext::new(&PlainText);
        let node = render_pre(pre(Some("progress-bar"), r#"{"progress": 5}"#), &mut ctx);
        let root = node.as_element().unwrap();
        assert_eq!(root.tag, "div");
        assert_eq!(root.class(), Some("progress-group"));
        assert!(ctx.errors().is_empty());
    }

    #[test]
    fn test_failed_infographic_is_recorded() {
        let mut ctx = RenderContext::new(&PlainText);
        let node = render_pre(pre(Some("timeline"), "{}"), &mut ctx);
        assert!(node.to_html().contains("Infographic Error (timeline):"));
        assert_eq!(ctx.errors().len(), 1);
        assert_eq!(ctx.errors()[0].raw_text, "{}");
    }

    #[test]
    fn test_unknown_language_is_plain_code() {
        let mut ctx = RenderContext::new(&SyntectHighlighter);
        let node = render_pre(pre(Some("klingon"), "nuqneH"), &mut ctx);
        assert_eq!(
            node.to_html(),
            r#"<pre><code class="language-klingon">nuqneH</code></pre>"#
        );
        assert!(ctx.errors().is_empty());
    }

    #[test]
    fn test_known_language_is_highlighted_inside_pre() {
        let mut ctx = RenderContext::new(&SyntectHighlighter);
        let node = render_pre(pre(Some("rust"), "fn main() {}\n"), &mut ctx);
        let html = node.to_html();
        assert!(html.starts_with(r#"<pre><code class="language-rust"><span"#));
    }

    #[test]
    fn test_no_language() {
        let mut ctx = RenderContext::new(&SyntectHighlighter);
        let node = render_pre(pre(None, "a < b"), &mut ctx);
        assert_eq!(node.to_html(), "<pre><code>a &lt; b</code></pre>");
    }

    #[test]
    fn test_nested_content_is_flattened() {
        let mut ctx = RenderContext::new(&PlainText);
        let code = Element::with_class("code", "hljs language-mermaid")
            .child(Element::new("span").text("graph "))
            .child(Element::new("em").child(Element::new("b").text("LR")));
        let node = render_pre(Element::new("pre").child(code), &mut ctx);
        assert_eq!(node, Node::Slot(0));
        assert_eq!(ctx.diagrams()[0].source, "graph LR");
    }

    #[test]
    fn test_pre_without_single_code_child_is_kept() {
        let mut ctx = RenderContext::new(&PlainText);
        let original = Element::new("pre").text("plain");
        let node = render_pre(original.clone(), &mut ctx);
        assert_eq!(node, Node::from(original));
    }
}
