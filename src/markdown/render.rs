//! Document pipeline: markdown in, HTML fragment out.
//!
//! Conversion is synchronous. Diagrams come out of it as slots; [`Renderer::render`]
//! mounts one [`DiagramView`] per slot, waits for each to settle, fills the
//! slots in document order and tears the views down again.

use std::sync::Arc;
use std::time::Duration;

use super::convert::{MarkdownOptions, from_markdown};
use super::diagram::{
    ColorMode, DiagramCompiler, DiagramError, DiagramState, DiagramView, MermaidCli, ThemeSignal,
};
use super::dispatch::{PendingDiagram, RenderContext};
use super::error::ErrorPresentation;
use super::highlight::{Highlighter, PlainText, SyntectHighlighter};
use super::node::{Element, Node};
use crate::config::SiteConfig;

/// Output of the synchronous conversion step.
#[derive(Debug)]
pub struct Converted {
    pub nodes: Vec<Node>,
    /// Diagram sources, indexed by slot id.
    pub diagrams: Vec<PendingDiagram>,
    /// Infographic failures.
    pub errors: Vec<ErrorPresentation>,
}

impl Converted {
    /// Every failure detectable without compiling diagrams.
    pub fn failures(&self) -> Vec<ErrorPresentation> {
        let empty_diagrams = self
            .diagrams
            .iter()
            .filter(|diagram| diagram.source.is_empty())
            .map(|diagram| {
                ErrorPresentation::new(DiagramError::Empty.to_string(), &diagram.source, "mermaid")
            });
        self.errors.iter().cloned().chain(empty_diagrams).collect()
    }
}

/// A fully rendered document.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub html: String,
    /// Block-level failures (infographics first, then diagrams).
    pub errors: Vec<ErrorPresentation>,
}

pub struct Renderer<C> {
    compiler: Arc<C>,
    theme: ThemeSignal,
    highlighter: Box<dyn Highlighter>,
    options: MarkdownOptions,
    diagrams: bool,
    timeout: Duration,
}

impl<C: DiagramCompiler> Renderer<C> {
    pub fn new(compiler: C) -> Self {
        Self {
            compiler: Arc::new(compiler),
            theme: ThemeSignal::default(),
            highlighter: Box::new(SyntectHighlighter),
            options: MarkdownOptions::all(),
            diagrams: true,
            timeout: Duration::from_secs(30),
        }
    }

    /// Toggle syntax highlighting of ordinary code blocks.
    pub fn highlight(mut self, enabled: bool) -> Self {
        self.highlighter = if enabled {
            Box::new(SyntectHighlighter)
        } else {
            Box::new(PlainText)
        };
        self
    }

    /// When disabled, `mermaid` blocks render as plain code.
    pub fn diagrams(mut self, enabled: bool) -> Self {
        self.diagrams = enabled;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn mode(self, mode: ColorMode) -> Self {
        self.theme.set(mode);
        self
    }

    /// The document-wide dark mode flag seen by mounted diagrams.
    #[cfg(test)]
    pub fn theme(&self) -> &ThemeSignal {
        &self.theme
    }

    /// Convert without touching diagrams.
    pub fn convert(&self, markdown: &str) -> Converted {
        let mut ctx = RenderContext::new(self.highlighter.as_ref());
        let nodes = from_markdown(markdown, &self.options, &mut ctx);
        let (diagrams, errors) = ctx.into_parts();
        Converted {
            nodes,
            diagrams,
            errors,
        }
    }

    /// Convert and resolve every diagram.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn render(&self, markdown: &str) -> RenderedDocument {
        let Converted {
            mut nodes,
            diagrams,
            mut errors,
        } = self.convert(markdown);

        let filled = if self.diagrams {
            self.resolve(&diagrams, &mut errors).await
        } else {
            diagrams.iter().map(plain_diagram).collect()
        };

        let mut html = String::new();
        for node in &mut nodes {
            node.fill_slots(&mut |id| filled.get(id).cloned());
            node.write_html(&mut html);
        }

        RenderedDocument { html, errors }
    }

    async fn resolve(
        &self,
        diagrams: &[PendingDiagram],
        errors: &mut Vec<ErrorPresentation>,
    ) -> Vec<Node> {
        // Mount everything first so compilations overlap.
        let mut views: Vec<DiagramView> = diagrams
            .iter()
            .map(|diagram| {
                DiagramView::mount(
                    diagram.source.clone(),
                    Arc::clone(&self.compiler),
                    self.theme.subscribe(),
                    self.timeout,
                )
            })
            .collect();

        let mut filled = Vec::with_capacity(views.len());
        for view in &mut views {
            if let DiagramState::Failed(message) = view.settled().await {
                errors.push(ErrorPresentation::new(message, view.source(), "mermaid"));
            }
            filled.push(view.to_node());
        }
        filled
    }
}

impl Renderer<MermaidCli> {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(MermaidCli::new(config.diagram.command.as_str()))
            .highlight(config.render.highlight)
            .diagrams(config.diagram.enabled)
            .timeout(Duration::from_secs(config.diagram.timeout))
            .mode(ColorMode::from_dark(config.render.dark))
    }
}

/// `mermaid` block shown as code when diagrams are disabled.
fn plain_diagram(diagram: &PendingDiagram) -> Node {
    Element::new("pre")
        .child(Element::with_class("code", "language-mermaid").text(&diagram.source))
        .into()
}
