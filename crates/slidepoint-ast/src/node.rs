//! Content tree nodes
//!
//! A presentation document is a tree rooted at a [`ContentNode::Fragment`].
//! Elements carry a closed [`NodeKind`], an attribute map and ordered
//! children; text lives in [`TextNode`]s made of formatted runs.

use crate::attrs::{AttrValue, Attributes, MERGE_GROUP_ID, SEGMENT_ID};
use crate::inline::TextNode;

/// Kind of an element node
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Paragraph,
    Heading,
    BulletList,
    OrderedList,
    ListItem,
    Image,
    SlideDivider,
    Blockquote,
    Attribution,
    HardBreak,
    /// Pre-split sentence written by older editor versions
    Sentence,
    /// Any tag this crate does not know about
    Unknown(String),
}

impl NodeKind {
    /// Resolve a node kind from its editor tag name
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "paragraph" => NodeKind::Paragraph,
            "heading" => NodeKind::Heading,
            "bullet_list" | "bulletList" => NodeKind::BulletList,
            "ordered_list" | "orderedList" => NodeKind::OrderedList,
            "list_item" | "listItem" => NodeKind::ListItem,
            "image" => NodeKind::Image,
            "slide_divider" | "slideDivider" => NodeKind::SlideDivider,
            "blockquote" => NodeKind::Blockquote,
            "attribution" => NodeKind::Attribution,
            "hard_break" | "hardBreak" => NodeKind::HardBreak,
            "sentence" => NodeKind::Sentence,
            other => NodeKind::Unknown(other.to_string()),
        }
    }

    /// Editor tag name of this kind
    pub fn tag(&self) -> &str {
        match self {
            NodeKind::Paragraph => "paragraph",
            NodeKind::Heading => "heading",
            NodeKind::BulletList => "bullet_list",
            NodeKind::OrderedList => "ordered_list",
            NodeKind::ListItem => "list_item",
            NodeKind::Image => "image",
            NodeKind::SlideDivider => "slide_divider",
            NodeKind::Blockquote => "blockquote",
            NodeKind::Attribution => "attribution",
            NodeKind::HardBreak => "hard_break",
            NodeKind::Sentence => "sentence",
            NodeKind::Unknown(tag) => tag,
        }
    }

    /// Kinds that become a navigable segment when they carry a segment id
    pub fn is_segment_kind(&self) -> bool {
        matches!(
            self,
            NodeKind::Paragraph
                | NodeKind::Heading
                | NodeKind::ListItem
                | NodeKind::Image
                | NodeKind::Blockquote
        )
    }

    /// Kinds whose children are inline content (text, breaks, inline images)
    pub fn is_textblock(&self) -> bool {
        matches!(
            self,
            NodeKind::Paragraph | NodeKind::Heading | NodeKind::Attribution | NodeKind::Sentence
        )
    }
}

/// An element node
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Element kind
    pub kind: NodeKind,
    /// Attributes (segment ids, heading level, image source, ...)
    pub attrs: Attributes,
    /// Ordered children, possibly empty
    pub children: Vec<ContentNode>,
}

impl Element {
    /// Create an element without attributes or children
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            attrs: Attributes::new(),
            children: Vec::new(),
        }
    }

    /// Builder: set an attribute
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Builder: append a child
    pub fn with_child(mut self, child: impl Into<ContentNode>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Builder: append several children
    pub fn with_children(mut self, children: impl IntoIterator<Item = ContentNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Get a non-null attribute
    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.get(name).filter(|value| !value.is_null())
    }

    /// Get an attribute as a string
    pub fn attr_str(&self, name: &str) -> Option<&str> {
        self.attr(name).and_then(AttrValue::as_str)
    }

    /// Get an attribute as an integer
    pub fn attr_i64(&self, name: &str) -> Option<i64> {
        self.attr(name).and_then(AttrValue::as_i64)
    }

    /// Set an attribute, replacing any previous value
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        self.attrs.insert(name.into(), value.into());
    }

    /// Remove an attribute, returning its previous value
    pub fn remove_attr(&mut self, name: &str) -> Option<AttrValue> {
        self.attrs.remove(name)
    }

    /// Stable segment id, if present and non-blank
    pub fn segment_id(&self) -> Option<&str> {
        self.attr_str(SEGMENT_ID).filter(|id| !id.trim().is_empty())
    }

    /// Merge group id, if present and non-blank
    pub fn merge_group_id(&self) -> Option<&str> {
        self.attr_str(MERGE_GROUP_ID).filter(|id| !id.trim().is_empty())
    }

    /// Heading depth in `1..=3`; levels 4 to 6 fold into 3, malformed or missing ones become 1
    pub fn heading_level(&self) -> u8 {
        match self.attr_i64("level") {
            Some(level @ 1..=3) => level as u8,
            Some(4..=6) => 3,
            _ => 1,
        }
    }

    /// First ordinal of an ordered list (`start`, or legacy `order`), default 1
    pub fn list_start(&self) -> i64 {
        self.attr_i64("start")
            .or_else(|| self.attr_i64("order"))
            .unwrap_or(1)
    }

    /// Concatenated plain text of the subtree
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    /// Whether the subtree holds anything worth presenting
    pub fn has_content(&self) -> bool {
        match self.kind {
            NodeKind::Image => self.attr_str("src").is_some_and(|src| !src.trim().is_empty()),
            _ => self.children.iter().any(ContentNode::has_content),
        }
    }
}

/// A node of the content tree
#[derive(Debug, Clone, PartialEq)]
pub enum ContentNode {
    /// Root (or nested) fragment: ordered children only
    Fragment(Vec<ContentNode>),
    /// Element with kind, attributes and children
    Element(Element),
    /// Text made of formatted runs
    Text(TextNode),
}

impl ContentNode {
    /// Create an empty root fragment
    pub fn fragment(children: Vec<ContentNode>) -> Self {
        ContentNode::Fragment(children)
    }

    /// Ordered children of the node (text has none)
    pub fn children(&self) -> &[ContentNode] {
        match self {
            ContentNode::Fragment(children) => children,
            ContentNode::Element(el) => &el.children,
            ContentNode::Text(_) => &[],
        }
    }

    /// Mutable children of the node (text has none)
    pub fn children_mut(&mut self) -> Option<&mut Vec<ContentNode>> {
        match self {
            ContentNode::Fragment(children) => Some(children),
            ContentNode::Element(el) => Some(&mut el.children),
            ContentNode::Text(_) => None,
        }
    }

    /// Borrow as an element
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            ContentNode::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Concatenated plain text of the subtree.
    ///
    /// Hard breaks contribute a newline so that sentences and labels on
    /// either side of them stay apart.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(std::slice::from_ref(self), &mut out);
        out
    }

    /// Whether the subtree contains non-whitespace text or an image
    pub fn has_content(&self) -> bool {
        match self {
            ContentNode::Text(text) => text.runs.iter().any(|run| !run.text.trim().is_empty()),
            ContentNode::Element(el) => el.has_content(),
            ContentNode::Fragment(children) => children.iter().any(ContentNode::has_content),
        }
    }

    /// Check whether this is an empty root fragment
    pub fn is_empty(&self) -> bool {
        self.children().is_empty()
    }
}

impl From<Element> for ContentNode {
    fn from(el: Element) -> Self {
        ContentNode::Element(el)
    }
}

impl From<TextNode> for ContentNode {
    fn from(text: TextNode) -> Self {
        ContentNode::Text(text)
    }
}

impl Default for ContentNode {
    fn default() -> Self {
        ContentNode::Fragment(Vec::new())
    }
}

fn collect_text(nodes: &[ContentNode], out: &mut String) {
    for node in nodes {
        match node {
            ContentNode::Text(text) => {
                for run in &text.runs {
                    out.push_str(&run.text);
                }
            }
            ContentNode::Element(el) if el.kind == NodeKind::HardBreak => out.push('\n'),
            ContentNode::Element(el) => collect_text(&el.children, out),
            ContentNode::Fragment(children) => collect_text(children, out),
        }
    }
}
