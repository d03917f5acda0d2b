//! Render tree and HTML serialization
//!
//! The renderer produces a small element tree rather than a string so that
//! callers can inspect decisions (which segments were emitted, with which
//! classes) before turning it into markup with [`RenderTree::to_html`].

use std::fmt::Write;

/// Attribute carrying the segment id on rendered segment wrappers
pub const DATA_SEGMENT_ID: &str = "data-segment-id";

/// Attribute carrying the merge group id on rendered segment wrappers
pub const DATA_MERGE_GROUP: &str = "data-merge-group";

/// Elements serialized without a closing tag
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img"];

/// A node of the render tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderNode {
    Element(RenderElement),
    Text(String),
}

/// A rendered element
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderElement {
    /// HTML tag name
    pub tag: String,
    /// Attributes in emission order (class excluded)
    pub attrs: Vec<(String, String)>,
    /// CSS classes
    pub classes: Vec<String>,
    /// Children
    pub children: Vec<RenderNode>,
}

impl RenderElement {
    /// Create an element with a tag only
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Builder: add an attribute
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// Builder: add a class
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Builder: set the children
    pub fn with_children(mut self, children: Vec<RenderNode>) -> Self {
        self.children = children;
        self
    }

    /// Look up an attribute value
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Check for a class
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Segment id this element wraps, if any
    pub fn segment_id(&self) -> Option<&str> {
        self.attr(DATA_SEGMENT_ID)
    }

    /// Concatenated text of the subtree
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }
}

impl From<RenderElement> for RenderNode {
    fn from(el: RenderElement) -> Self {
        RenderNode::Element(el)
    }
}

/// Output of one render call
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderTree {
    /// Top-level rendered nodes
    pub nodes: Vec<RenderNode>,
    /// Segment ids elided because the tree and segment list disagreed
    pub misaligned: Vec<String>,
}

impl RenderTree {
    /// Serialize to an HTML fragment
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            write_node(node, &mut out);
        }
        out
    }

    /// All elements carrying a segment id, in document order
    pub fn segment_elements(&self) -> Vec<&RenderElement> {
        let mut out = Vec::new();
        collect_segments(&self.nodes, &mut out);
        out
    }

    /// Ids of the rendered segments, in document order
    pub fn segment_ids(&self) -> Vec<&str> {
        self.segment_elements()
            .into_iter()
            .filter_map(RenderElement::segment_id)
            .collect()
    }

    /// Find the element rendered for a segment
    pub fn find_segment(&self, id: &str) -> Option<&RenderElement> {
        self.segment_elements()
            .into_iter()
            .find(|el| el.segment_id() == Some(id))
    }

    /// Check whether nothing was rendered
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn collect_segments<'a>(nodes: &'a [RenderNode], out: &mut Vec<&'a RenderElement>) {
    for node in nodes {
        if let RenderNode::Element(el) = node {
            if el.segment_id().is_some() {
                out.push(el);
            }
            collect_segments(&el.children, out);
        }
    }
}

fn collect_text(nodes: &[RenderNode], out: &mut String) {
    for node in nodes {
        match node {
            RenderNode::Text(text) => out.push_str(text),
            RenderNode::Element(el) => collect_text(&el.children, out),
        }
    }
}

fn write_node(node: &RenderNode, out: &mut String) {
    match node {
        RenderNode::Text(text) => out.push_str(&escape_text(text)),
        RenderNode::Element(el) => {
            out.push('<');
            out.push_str(&el.tag);
            if !el.classes.is_empty() {
                let _ = write!(out, " class=\"{}\"", escape_attr(&el.classes.join(" ")));
            }
            for (name, value) in &el.attrs {
                let _ = write!(out, " {}=\"{}\"", name, escape_attr(value));
            }
            out.push('>');

            if VOID_ELEMENTS.contains(&el.tag.as_str()) {
                return;
            }
            for child in &el.children {
                write_node(child, out);
            }
            let _ = write!(out, "</{}>", el.tag);
        }
    }
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
