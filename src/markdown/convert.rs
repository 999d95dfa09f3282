//! Markdown to node tree conversion using pulldown-cmark.
//!
//! Code nodes are handed to the block dispatcher as soon as they close, so the
//! returned tree already contains highlighted code, infographic cards and
//! diagram slots.

use pulldown_cmark::{Alignment, CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag};

use super::dispatch::{FencedBlock, RenderContext, dispatch, render_pre};
use super::node::{Element, Node, flatten_text};

/// Options for markdown conversion
#[derive(Debug, Clone, Default)]
pub struct MarkdownOptions {
    /// Enable tables extension
    pub tables: bool,
    /// Enable footnotes extension
    pub footnotes: bool,
    /// Enable strikethrough extension
    pub strikethrough: bool,
    /// Enable task lists extension
    pub task_lists: bool,
    /// Enable heading attributes extension (e.g., `# Heading {#custom-id}`)
    pub heading_attributes: bool,
}

impl MarkdownOptions {
    /// Create options with all extensions enabled
    pub fn all() -> Self {
        Self {
            tables: true,
            footnotes: true,
            strikethrough: true,
            task_lists: true,
            heading_attributes: true,
        }
    }

    /// Convert to pulldown-cmark Options
    fn to_pulldown_options(&self) -> Options {
        let mut opts = Options::empty();
        if self.tables {
            opts.insert(Options::ENABLE_TABLES);
        }
        if self.footnotes {
            opts.insert(Options::ENABLE_FOOTNOTES);
        }
        if self.strikethrough {
            opts.insert(Options::ENABLE_STRIKETHROUGH);
        }
        if self.task_lists {
            opts.insert(Options::ENABLE_TASKLISTS);
        }
        if self.heading_attributes {
            opts.insert(Options::ENABLE_HEADING_ATTRIBUTES);
        }
        opts
    }
}

/// How a closed frame is attached to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Element,
    /// `pre > code`, handed to the dispatcher on close.
    CodeBlock,
    /// `img`; children become the `alt` attribute.
    Image,
    /// Children are spliced into the parent (HTML blocks).
    Transparent,
    /// Dropped entirely (metadata blocks).
    Discard,
}

/// Stack frame for tracking nested elements
struct StackFrame {
    element: Element,
    kind: FrameKind,
}

/// Table layout state for the table being converted.
#[derive(Default)]
struct TableState {
    alignments: Vec<Alignment>,
    in_head: bool,
    cell: usize,
}

/// Markdown to node tree converter
struct MarkdownConverter<'c, 'h> {
    ctx: &'c mut RenderContext<'h>,
    /// Stack of open elements (for nested structures)
    stack: Vec<StackFrame>,
    /// Root children (collected when stack is empty)
    root_children: Vec<Node>,
    table: TableState,
}

impl<'c, 'h> MarkdownConverter<'c, 'h> {
    fn new(ctx: &'c mut RenderContext<'h>) -> Self {
        Self {
            ctx,
            stack: Vec::new(),
            root_children: Vec::new(),
            table: TableState::default(),
        }
    }

    fn convert(mut self, markdown: &str, options: &MarkdownOptions) -> Vec<Node> {
        let parser = Parser::new_ext(markdown, options.to_pulldown_options());

        for event in parser {
            self.handle_event(event);
        }

        // Unbalanced input cannot come out of pulldown-cmark, but never lose content.
        while !self.stack.is_empty() {
            self.end_tag();
        }
        self.root_children
    }

    /// Handle a single pulldown-cmark event
    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(_) => self.end_tag(),
            Event::Text(text) => self.add_text(text.as_ref()),
            Event::Code(code) => {
                let node = dispatch(FencedBlock::inline(code.as_ref()), self.ctx);
                self.add_node(node);
            }
            Event::Html(html) | Event::InlineHtml(html) => self.add_node(Node::raw(html.as_ref())),
            Event::SoftBreak => self.add_text("\n"),
            Event::HardBreak => self.add_node(Element::new("br").into()),
            Event::Rule => self.add_node(Element::new("hr").into()),
            Event::FootnoteReference(name) => self.add_footnote_ref(name.as_ref()),
            Event::TaskListMarker(checked) => self.add_task_marker(checked),
            Event::InlineMath(math) => {
                let span = Element::with_class("span", "math math-inline").text(math.as_ref());
                self.add_node(span.into());
            }
            Event::DisplayMath(math) => {
                let div = Element::with_class("div", "math math-display").text(math.as_ref());
                self.add_node(div.into());
            }
        }
    }

    /// Start a new tag (push onto stack)
    fn start_tag(&mut self, tag: Tag) {
        let (element, kind) = match tag {
            Tag::CodeBlock(kind) => (code_element(&kind), FrameKind::CodeBlock),
            Tag::Image {
                dest_url, title, ..
            } => {
                let mut img = Element::new("img").attr("src", dest_url.as_ref());
                if !title.is_empty() {
                    img.set_attr("title", title.as_ref());
                }
                (img, FrameKind::Image)
            }
            Tag::HtmlBlock => (Element::default(), FrameKind::Transparent),
            Tag::MetadataBlock(_) => (Element::default(), FrameKind::Discard),
            Tag::Table(alignments) => {
                self.table = TableState {
                    alignments,
                    ..TableState::default()
                };
                (Element::new("table"), FrameKind::Element)
            }
            Tag::TableHead => {
                self.table.in_head = true;
                self.table.cell = 0;
                (Element::new("thead"), FrameKind::Element)
            }
            Tag::TableRow => {
                self.table.cell = 0;
                (Element::new("tr"), FrameKind::Element)
            }
            Tag::TableCell => (self.table_cell(), FrameKind::Element),
            other => (tag_to_element(other), FrameKind::Element),
        };

        self.stack.push(StackFrame { element, kind });
    }

    /// End a tag (pop from stack)
    fn end_tag(&mut self) {
        let Some(StackFrame { element, kind }) = self.stack.pop() else {
            return;
        };

        match kind {
            FrameKind::Element => {
                if element.tag == "thead" {
                    self.table.in_head = false;
                }
                self.add_node(element.into());
            }
            FrameKind::CodeBlock => {
                let pre = Element::new("pre").child(element);
                let node = render_pre(pre, self.ctx);
                self.add_node(node);
            }
            FrameKind::Image => {
                let alt = flatten_text(&element.children);
                let img = Element {
                    children: Vec::new(),
                    ..element
                }
                .attr("alt", alt);
                self.add_node(img.into());
            }
            FrameKind::Transparent => {
                for child in element.children {
                    self.add_node(child);
                }
            }
            FrameKind::Discard => {}
        }
    }

    /// `th` inside the head row, `td` elsewhere, aligned per column.
    fn table_cell(&mut self) -> Element {
        let tag = if self.table.in_head { "th" } else { "td" };
        let mut cell = Element::new(tag);
        let align = match self.table.alignments.get(self.table.cell) {
            Some(Alignment::Left) => Some("left"),
            Some(Alignment::Center) => Some("center"),
            Some(Alignment::Right) => Some("right"),
            Some(Alignment::None) | None => None,
        };
        if let Some(align) = align {
            cell.set_attr("style", format!("text-align: {align}"));
        }
        self.table.cell += 1;
        cell
    }

    /// Add text content
    fn add_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.add_node(Node::text(text));
    }

    /// Add footnote reference
    fn add_footnote_ref(&mut self, name: &str) {
        let link = Element::new("a")
            .attr("href", format!("#fn-{name}"))
            .attr("id", format!("fnref-{name}"))
            .text(format!("[{name}]"));
        self.add_node(Element::with_class("sup", "footnote-ref").child(link).into());
    }

    /// Add task list marker
    fn add_task_marker(&mut self, checked: bool) {
        let mut input = Element::new("input")
            .attr("type", "checkbox")
            .attr("disabled", "");
        if checked {
            input.set_attr("checked", "");
        }
        self.add_node(input.into());
    }

    /// Add a node to current context (top of stack or root)
    fn add_node(&mut self, node: Node) {
        if let Some(frame) = self.stack.last_mut() {
            frame.element.children.push(node);
        } else {
            self.root_children.push(node);
        }
    }
}

/// `code` element carrying the fence language as `language-xxx`.
///
/// Only the first word of the info string is the language
/// (```` ```rust ignore ```` is `rust`).
fn code_element(kind: &CodeBlockKind) -> Element {
    let language = match kind {
        CodeBlockKind::Indented => None,
        CodeBlockKind::Fenced(info) => info
            .split(|c: char| c.is_whitespace() || c == ',')
            .next()
            .filter(|lang| !lang.is_empty()),
    };
    match language {
        Some(lang) => Element::with_class("code", format!("language-{lang}")),
        None => Element::new("code"),
    }
}

/// Convert the remaining pulldown-cmark tags to elements
fn tag_to_element(tag: Tag) -> Element {
    match tag {
        // Block elements
        Tag::Paragraph => Element::new("p"),
        Tag::Heading {
            level, id, classes, ..
        } => {
            let mut heading = Element::new(heading_level_to_tag(level));
            if let Some(id) = id {
                heading.set_attr("id", id.as_ref());
            }
            if !classes.is_empty() {
                let classes: Vec<String> = classes.iter().map(|c| c.to_string()).collect();
                heading.set_attr("class", classes.join(" "));
            }
            heading
        }
        Tag::BlockQuote(_) => Element::new("blockquote"),
        Tag::List(Some(start)) => {
            let list = Element::new("ol");
            if start != 1 {
                list.attr("start", start.to_string())
            } else {
                list
            }
        }
        Tag::List(None) => Element::new("ul"),
        Tag::Item => Element::new("li"),
        Tag::FootnoteDefinition(name) => {
            Element::with_class("div", "footnote").attr("id", format!("fn-{name}"))
        }

        // Inline elements
        Tag::Emphasis => Element::new("em"),
        Tag::Strong => Element::new("strong"),
        Tag::Strikethrough => Element::new("del"),
        Tag::Superscript => Element::new("sup"),
        Tag::Subscript => Element::new("sub"),
        Tag::Link {
            dest_url, title, ..
        } => {
            let mut link = Element::new("a").attr("href", dest_url.as_ref());
            if !title.is_empty() {
                link.set_attr("title", title.as_ref());
            }
            link
        }

        // Definition list (extended syntax)
        Tag::DefinitionList => Element::new("dl"),
        Tag::DefinitionListTitle => Element::new("dt"),
        Tag::DefinitionListDefinition => Element::new("dd"),

        // Handled by the converter itself
        Tag::CodeBlock(_)
        | Tag::Image { .. }
        | Tag::HtmlBlock
        | Tag::MetadataBlock(_)
        | Tag::Table(_)
        | Tag::TableHead
        | Tag::TableRow
        | Tag::TableCell => Element::new("div"),
    }
}

/// Convert heading level to tag name
fn heading_level_to_tag(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "h1",
        HeadingLevel::H2 => "h2",
        HeadingLevel::H3 => "h3",
        HeadingLevel::H4 => "h4",
        HeadingLevel::H5 => "h5",
        HeadingLevel::H6 => "h6",
    }
}

/// Convert markdown to a node list, dispatching code nodes through `ctx`.
pub fn from_markdown(
    markdown: &str,
    options: &MarkdownOptions,
    ctx: &mut RenderContext<'_>,
) -> Vec<Node> {
    MarkdownConverter::new(ctx).convert(markdown, options)
}
