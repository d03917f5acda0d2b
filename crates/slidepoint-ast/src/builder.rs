//! Shorthand constructors for content trees
//!
//! Used by tests and tooling that need to assemble documents in code.

use crate::attrs::{MERGE_GROUP_ID, SEGMENT_ID};
use crate::inline::TextNode;
use crate::node::{ContentNode, Element, NodeKind};

/// Root fragment
pub fn doc(children: Vec<ContentNode>) -> ContentNode {
    ContentNode::Fragment(children)
}

/// Plain text node
pub fn text(text: &str) -> ContentNode {
    ContentNode::Text(TextNode::plain(text))
}

fn with_text(el: Element, body: &str) -> Element {
    if body.is_empty() {
        el
    } else {
        el.with_child(TextNode::plain(body))
    }
}

/// Paragraph with a segment id
pub fn paragraph(id: &str, body: &str) -> ContentNode {
    with_text(Element::new(NodeKind::Paragraph), body)
        .with_attr(SEGMENT_ID, id)
        .into()
}

/// Paragraph without a segment id (empty or not yet annotated)
pub fn bare_paragraph(body: &str) -> ContentNode {
    with_text(Element::new(NodeKind::Paragraph), body).into()
}

/// Heading with a segment id
pub fn heading(id: &str, level: i64, body: &str) -> ContentNode {
    with_text(Element::new(NodeKind::Heading), body)
        .with_attr("level", level)
        .with_attr(SEGMENT_ID, id)
        .into()
}

/// List item with a segment id wrapping one paragraph
pub fn list_item(id: &str, body: &str) -> ContentNode {
    Element::new(NodeKind::ListItem)
        .with_attr(SEGMENT_ID, id)
        .with_child(bare_paragraph(body))
        .into()
}

/// Bullet list
pub fn bullet_list(items: Vec<ContentNode>) -> ContentNode {
    Element::new(NodeKind::BulletList)
        .with_children(items)
        .into()
}

/// Ordered list starting at `start`
pub fn ordered_list(start: i64, items: Vec<ContentNode>) -> ContentNode {
    Element::new(NodeKind::OrderedList)
        .with_attr("start", start)
        .with_children(items)
        .into()
}

/// Block image with a segment id
pub fn image(id: &str, src: &str, alt: Option<&str>) -> ContentNode {
    let mut el = Element::new(NodeKind::Image)
        .with_attr("src", src)
        .with_attr(SEGMENT_ID, id);
    if let Some(alt) = alt {
        el.set_attr("alt", alt);
    }
    el.into()
}

/// Blockquote with a segment id
pub fn blockquote(id: &str, children: Vec<ContentNode>) -> ContentNode {
    Element::new(NodeKind::Blockquote)
        .with_attr(SEGMENT_ID, id)
        .with_children(children)
        .into()
}

/// Slide divider
pub fn slide_divider() -> ContentNode {
    Element::new(NodeKind::SlideDivider).into()
}

/// Hard line break
pub fn hard_break() -> ContentNode {
    Element::new(NodeKind::HardBreak).into()
}

/// Pre-split sentence element
pub fn sentence(id: &str, body: &str) -> ContentNode {
    with_text(Element::new(NodeKind::Sentence), body)
        .with_attr(SEGMENT_ID, id)
        .into()
}

/// Put an element into a merge group
pub fn merged(node: ContentNode, group: &str) -> ContentNode {
    match node {
        ContentNode::Element(el) => el.with_attr(MERGE_GROUP_ID, group).into(),
        other => other,
    }
}
