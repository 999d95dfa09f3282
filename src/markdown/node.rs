//! Render tree shared by the converter, the block renderers and the HTML writer.
//!
//! The tree is deliberately small:
//!
//! - [`Node::Text`] - text content, escaped on output
//! - [`Node::Raw`] - pre-rendered markup (highlighter output, SVG, raw HTML)
//! - [`Node::Element`] - a tag with attributes and children
//! - [`Node::Slot`] - placeholder for a diagram that is still compiling

use crate::utils::html::{escape, escape_attr, is_void_element};

// =============================================================================
// Node
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    Raw(String),
    Element(Box<Element>),
    /// Diagram placeholder, filled in by the document pipeline.
    Slot(usize),
}

impl Node {
    /// Create a text node.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create a raw markup node.
    pub fn raw(html: impl Into<String>) -> Self {
        Self::Raw(html.into())
    }

    /// Serialize to an HTML string.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    /// Serialize into an existing buffer.
    pub fn write_html(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(&escape(text)),
            Self::Raw(html) => out.push_str(html),
            Self::Element(elem) => elem.write_html(out),
            Self::Slot(_) => {}
        }
    }

    /// Replace every [`Node::Slot`] with the node returned by `fill`.
    ///
    /// Slots for which `fill` returns `None` are left in place.
    pub fn fill_slots(&mut self, fill: &mut impl FnMut(usize) -> Option<Node>) {
        match self {
            Self::Slot(id) => {
                if let Some(node) = fill(*id) {
                    *self = node;
                }
            }
            Self::Element(elem) => {
                for child in &mut elem.children {
                    child.fill_slots(fill);
                }
            }
            Self::Text(_) | Self::Raw(_) => {}
        }
    }
}

impl From<Element> for Node {
    fn from(elem: Element) -> Self {
        Self::Element(Box::new(elem))
    }
}

// =============================================================================
// Element
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Shorthand for `Element::new(tag).attr("class", class)`.
    pub fn with_class(tag: impl Into<String>, class: impl Into<String>) -> Self {
        Self::new(tag).attr("class", class)
    }

    /// Set an attribute, replacing any previous value.
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((key, value)),
        }
    }

    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn class(&self) -> Option<&str> {
        self.get_attr("class")
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    /// Append a text child.
    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (key, value) in &self.attrs {
            out.push(' ');
            out.push_str(key);
            if !value.is_empty() {
                out.push_str("=\"");
                out.push_str(&escape_attr(value));
                out.push('"');
            }
        }
        out.push('>');

        if is_void_element(&self.tag) {
            return;
        }

        for child in &self.children {
            child.write_html(out);
        }

        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

// =============================================================================
// Text Flattening
// =============================================================================

/// Concatenate the text content of a node list, descending into elements.
///
/// Code block content can arrive split across several text nodes or wrapped
/// in formatting elements, so every level is visited in order.
pub fn flatten_text(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        collect_text(node, &mut out);
    }
    out
}

fn collect_text(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) | Node::Raw(text) => out.push_str(text),
        Node::Element(elem) => {
            for child in &elem.children {
                collect_text(child, out);
            }
        }
        Node::Slot(_) => {}
    }
}

// =============================================================================
// Test helpers
// =============================================================================

#[cfg(test)]
impl Node {
    /// Borrow the element, if this node is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(elem) => Some(elem),
            _ => None,
        }
    }

    /// All elements (self included) in document order.
    pub fn elements(&self) -> Vec<&Element> {
        fn walk<'a>(node: &'a Node, acc: &mut Vec<&'a Element>) {
            if let Node::Element(elem) = node {
                acc.push(elem);
                for child in &elem.children {
                    walk(child, acc);
                }
            }
        }
        let mut acc = Vec::new();
        walk(self, &mut acc);
        acc
    }

    /// Elements whose class list contains `class`.
    pub fn find_class(&self, class: &str) -> Vec<&Element> {
        self.elements()
            .into_iter()
            .filter(|e| e.class().is_some_and(|c| c.split_whitespace().any(|t| t == class)))
            .collect()
    }

    /// Flattened text of this node.
    pub fn text_content(&self) -> String {
        flatten_text(std::slice::from_ref(self))
    }
}
