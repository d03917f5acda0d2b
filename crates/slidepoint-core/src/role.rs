//! Node classification shared by every tree walk
//!
//! The extractor, the block planner and the renderer must visit segment
//! nodes in exactly the same order. They all ask [`segment_role`] how to
//! treat an element instead of deciding on their own.

use slidepoint_ast::{ContentNode, Element, NodeKind};

/// How a tree walk treats an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SegmentRole<'a> {
    /// Slide divider: bumps the slide counter, never a segment
    Divider,
    /// Identified eligible node: one segment (or its virtual sentences).
    /// Descendants never contribute segments of their own.
    Segment(&'a str),
    /// Paragraph or list item whose children are stored sentence elements
    SentenceParent,
    /// Block container: walk the children
    Container,
    /// Anything else: inline content, unidentified textblocks, breaks
    Leaf,
}

/// Classify an element for segment walks
pub(crate) fn segment_role(el: &Element) -> SegmentRole<'_> {
    match &el.kind {
        NodeKind::SlideDivider => SegmentRole::Divider,
        NodeKind::Paragraph | NodeKind::ListItem if has_sentence_children(el) => {
            SegmentRole::SentenceParent
        }
        kind if kind.is_segment_kind() => match el.segment_id() {
            Some(id) => SegmentRole::Segment(id),
            None if matches!(kind, NodeKind::ListItem | NodeKind::Blockquote) => {
                SegmentRole::Container
            }
            None => SegmentRole::Leaf,
        },
        NodeKind::BulletList | NodeKind::OrderedList | NodeKind::Unknown(_) => {
            SegmentRole::Container
        }
        _ => SegmentRole::Leaf,
    }
}

/// Whether an element holds pre-split sentence elements
pub(crate) fn has_sentence_children(el: &Element) -> bool {
    el.children
        .iter()
        .filter_map(ContentNode::as_element)
        .any(|child| child.kind == NodeKind::Sentence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use slidepoint_ast::builder::*;

    fn role_of(node: &ContentNode) -> SegmentRole<'_> {
        segment_role(node.as_element().unwrap())
    }

    #[test]
    fn test_identified_nodes_are_segments() {
        assert_eq!(role_of(&paragraph("p", "x")), SegmentRole::Segment("p"));
        assert_eq!(role_of(&heading("h", 1, "x")), SegmentRole::Segment("h"));
        assert_eq!(role_of(&image("i", "a.png", None)), SegmentRole::Segment("i"));
    }

    #[test]
    fn test_unidentified_containers_are_walked() {
        let item = Element::new(NodeKind::ListItem).with_child(paragraph("p", "x"));
        assert_eq!(segment_role(&item), SegmentRole::Container);
        assert_eq!(role_of(&bullet_list(vec![])), SegmentRole::Container);
        assert_eq!(role_of(&bare_paragraph("x")), SegmentRole::Leaf);
    }

    #[test]
    fn test_sentence_parent_wins_over_id() {
        let para = Element::new(NodeKind::Paragraph)
            .with_attr(slidepoint_ast::SEGMENT_ID, "p")
            .with_child(sentence("s1", "One."));
        assert_eq!(segment_role(&para), SegmentRole::SentenceParent);
    }

    #[test]
    fn test_divider_and_inline_nodes() {
        assert_eq!(role_of(&slide_divider()), SegmentRole::Divider);
        assert_eq!(role_of(&hard_break()), SegmentRole::Leaf);
    }
}
