//! Segment extraction from the content tree.
//!
//! The extractor walks the tree once in document order and produces the
//! navigable segment list:
//!
//! - **Slides**: every `slide_divider` bumps the slide index of the segments
//!   that follow it; dividers are never segments themselves
//! - **Segments**: paragraphs, headings, list items, images and blockquotes
//!   carrying a `segmentId` attribute contribute one segment each
//! - **Sentences**: long paragraphs with several sentences are replaced by
//!   one virtual segment per sentence (`{id}:s{n}`); paragraphs written with
//!   stored `sentence` children contribute those instead
//! - **Fallback**: a tree without any segment yields the single
//!   `seg-default` segment so navigation always has something to point at

use slidepoint_ast::{ContentNode, Element, NodeKind};
use tracing::debug;

use crate::config::SegmentSettings;
use crate::error::Result;
use crate::label::create_label_with_max;
use crate::role::{segment_role, SegmentRole};
use crate::segment::{Segment, SegmentType};
use crate::sentence::{SentenceSpan, SentenceSplitter};

/// Extract segments with the default settings
pub fn extract(tree: &ContentNode) -> Vec<Segment> {
    SegmentExtractor::new().extract(tree)
}

/// Id of the `n`-th virtual sentence of a paragraph
pub fn sentence_segment_id(parent_id: &str, n: usize) -> String {
    format!("{}:s{}", parent_id, n)
}

/// Walks a content tree into an ordered segment list
#[derive(Debug, Clone)]
pub struct SegmentExtractor {
    settings: SegmentSettings,
    splitter: SentenceSplitter,
}

impl SegmentExtractor {
    /// Create an extractor with default settings
    pub fn new() -> Self {
        Self {
            settings: SegmentSettings::default(),
            splitter: SentenceSplitter::default(),
        }
    }

    /// Create an extractor with custom settings
    pub fn with_settings(settings: &SegmentSettings) -> Result<Self> {
        Ok(Self {
            settings: settings.clone(),
            splitter: SentenceSplitter::new(&settings.abbreviations)?,
        })
    }

    /// Extract segments from a tree.
    ///
    /// Deterministic and side-effect free: extracting the same tree twice
    /// yields identical lists.
    pub fn extract(&self, tree: &ContentNode) -> Vec<Segment> {
        let mut state = Extraction::default();
        self.walk(tree.children(), &mut state);

        if state.segments.is_empty() {
            debug!("no segments found, using fallback segment");
            return vec![Segment::fallback()];
        }

        debug!(
            segments = state.segments.len(),
            slides = state.slide_index + 1,
            "extracted segments"
        );
        state.segments
    }

    /// Sentences a paragraph would be split into, if it qualifies.
    ///
    /// A paragraph qualifies when splitting is enabled, its text is longer
    /// than the threshold and it holds at least two sentences.
    pub fn split_sentences<'a>(&self, text: &'a str) -> Option<Vec<SentenceSpan<'a>>> {
        if !self.settings.split_sentences
            || text.chars().count() <= self.settings.sentence_threshold
        {
            return None;
        }
        let sentences = self.splitter.split(text);
        (sentences.len() >= 2).then_some(sentences)
    }

    fn walk(&self, nodes: &[ContentNode], state: &mut Extraction) {
        for node in nodes {
            match node {
                ContentNode::Fragment(children) => self.walk(children, state),
                ContentNode::Text(_) => {}
                ContentNode::Element(el) => match segment_role(el) {
                    SegmentRole::Divider => state.slide_index += 1,
                    SegmentRole::Segment(id) => self.emit_segment(el, id, state),
                    SegmentRole::SentenceParent => self.emit_stored_sentences(el, state),
                    SegmentRole::Container => self.walk(&el.children, state),
                    SegmentRole::Leaf => {}
                },
            }
        }
    }

    fn emit_segment(&self, el: &Element, id: &str, state: &mut Extraction) {
        let merge_group_id = el.merge_group_id().map(str::to_string);

        if el.kind == NodeKind::Paragraph {
            let text = el.text_content();
            if let Some(sentences) = self.split_sentences(&text) {
                for (n, sentence) in sentences.iter().enumerate() {
                    state.push(self.sentence(
                        sentence_segment_id(id, n),
                        sentence.text,
                        Some(id),
                        merge_group_id.clone(),
                    ));
                }
                return;
            }
        }

        let segment_type = segment_type_of(&el.kind);
        let text = match segment_type {
            SegmentType::Image => el
                .attr_str("alt")
                .filter(|alt| !alt.trim().is_empty())
                .unwrap_or("Image")
                .to_string(),
            _ => el.text_content(),
        };
        let level = (segment_type == SegmentType::Heading).then(|| el.heading_level());

        state.push(Segment {
            id: id.to_string(),
            index: 0,
            label: create_label_with_max(&text, segment_type, self.settings.label_max_len),
            segment_type,
            level,
            slide_index: 0,
            merge_group_id,
            parent_segment_id: None,
            sentence_text: None,
        });
    }

    fn emit_stored_sentences(&self, el: &Element, state: &mut Extraction) {
        let parent_id = el.segment_id();
        for child in el.children.iter().filter_map(ContentNode::as_element) {
            if child.kind != NodeKind::Sentence {
                continue;
            }
            let Some(id) = child.segment_id() else {
                continue;
            };
            let merge_group_id = child
                .merge_group_id()
                .or_else(|| el.merge_group_id())
                .map(str::to_string);
            let text = child.text_content();
            state.push(self.sentence(id.to_string(), text.trim(), parent_id, merge_group_id));
        }
    }

    fn sentence(
        &self,
        id: String,
        text: &str,
        parent_id: Option<&str>,
        merge_group_id: Option<String>,
    ) -> Segment {
        Segment {
            id,
            index: 0,
            label: create_label_with_max(text, SegmentType::Sentence, self.settings.label_max_len),
            segment_type: SegmentType::Sentence,
            level: None,
            slide_index: 0,
            merge_group_id,
            parent_segment_id: parent_id.map(str::to_string),
            sentence_text: Some(text.to_string()),
        }
    }
}

impl Default for SegmentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Map an eligible node kind to its segment type
fn segment_type_of(kind: &NodeKind) -> SegmentType {
    match kind {
        NodeKind::Heading => SegmentType::Heading,
        NodeKind::ListItem => SegmentType::ListItem,
        NodeKind::Image => SegmentType::Image,
        NodeKind::Blockquote => SegmentType::Blockquote,
        NodeKind::Sentence => SegmentType::Sentence,
        _ => SegmentType::Paragraph,
    }
}

#[derive(Default)]
struct Extraction {
    segments: Vec<Segment>,
    slide_index: usize,
}

impl Extraction {
    fn push(&mut self, mut segment: Segment) {
        segment.index = self.segments.len();
        segment.slide_index = self.slide_index;
        self.segments.push(segment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slidepoint_ast::builder::*;

    const LONG_PARAGRAPH: &str = "The first sentence is here and it is fairly long. \
        The second sentence follows right after it! \
        Does the third one ask a question?";

    fn ids(segments: &[Segment]) -> Vec<&str> {
        segments.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn test_empty_document_yields_fallback() {
        let segments = extract(&doc(vec![]));
        assert_eq!(segments, vec![Segment::fallback()]);
    }

    #[test]
    fn test_unidentified_nodes_are_skipped() {
        let tree = doc(vec![bare_paragraph(""), bare_paragraph("not annotated")]);
        assert_eq!(extract(&tree), vec![Segment::fallback()]);
    }

    #[test]
    fn test_segment_types_and_levels() {
        let tree = doc(vec![
            heading("h", 2, "Title"),
            paragraph("p", "Body"),
            bullet_list(vec![list_item("li", "Item")]),
            image("img", "a.png", Some("A chart")),
            blockquote("q", vec![bare_paragraph("Quoted")]),
        ]);
        let segments = extract(&tree);

        assert_eq!(ids(&segments), vec!["h", "p", "li", "img", "q"]);
        assert_eq!(segments[0].segment_type, SegmentType::Heading);
        assert_eq!(segments[0].level, Some(2));
        assert_eq!(segments[1].level, None);
        assert_eq!(segments[2].segment_type, SegmentType::ListItem);
        assert_eq!(segments[2].label, "Item");
        assert_eq!(segments[3].label, "A chart");
        assert_eq!(segments[4].segment_type, SegmentType::Blockquote);
        assert_eq!(
            segments.iter().map(|s| s.index).collect::<Vec<_>>(),
            vec![0, 1, 2, 3, 4]
        );
    }

    #[test]
    fn test_image_without_alt_uses_default_label() {
        let segments = extract(&doc(vec![image("img", "a.png", Some("  "))]));
        assert_eq!(segments[0].label, "Image");
    }

    #[test]
    fn test_slide_indexing() {
        let tree = doc(vec![
            paragraph("a", "A"),
            slide_divider(),
            paragraph("b", "B"),
            slide_divider(),
            paragraph("c", "C"),
        ]);
        let slides: Vec<usize> = extract(&tree).iter().map(|s| s.slide_index).collect();
        assert_eq!(slides, vec![0, 1, 2]);
    }

    #[test]
    fn test_nested_items_in_unidentified_containers() {
        let inner_item = Element::new(NodeKind::ListItem).with_child(paragraph("inner", "x"));
        let tree = doc(vec![
            ordered_list(1, vec![list_item("a", "A"), inner_item.into()]),
            Element::new(NodeKind::Blockquote)
                .with_child(paragraph("quoted", "Q"))
                .into(),
        ]);
        assert_eq!(ids(&extract(&tree)), vec!["a", "inner", "quoted"]);
    }

    #[test]
    fn test_identified_segment_hides_descendants() {
        let tree = doc(vec![blockquote(
            "q",
            vec![paragraph("nested", "Quoted text")],
        )]);
        assert_eq!(ids(&extract(&tree)), vec!["q"]);
    }

    #[test]
    fn test_long_paragraph_split_into_sentences() {
        assert!(LONG_PARAGRAPH.len() > 100);
        let tree = doc(vec![merged(paragraph("p", LONG_PARAGRAPH), "m1")]);
        let segments = extract(&tree);

        assert_eq!(ids(&segments), vec!["p:s0", "p:s1", "p:s2"]);
        for seg in &segments {
            assert_eq!(seg.segment_type, SegmentType::Sentence);
            assert_eq!(seg.parent_segment_id.as_deref(), Some("p"));
            assert_eq!(seg.merge_group_id.as_deref(), Some("m1"));
        }
        assert_eq!(
            segments[1].sentence_text.as_deref(),
            Some("The second sentence follows right after it!")
        );
    }

    #[test]
    fn test_short_paragraph_never_split() {
        let text = "One. Two. Three. Four.";
        let segments = extract(&doc(vec![paragraph("p", text)]));
        assert_eq!(ids(&segments), vec!["p"]);
        assert_eq!(segments[0].segment_type, SegmentType::Paragraph);
    }

    #[test]
    fn test_threshold_counts_surrounding_whitespace() {
        let text = format!("{}. {}.", "a".repeat(48), "b".repeat(49));
        assert_eq!(ids(&extract(&doc(vec![paragraph("p", &text)]))), vec!["p"]);

        let padded = format!(" {}", text);
        assert_eq!(
            ids(&extract(&doc(vec![paragraph("p", &padded)]))),
            vec!["p:s0", "p:s1"]
        );
    }

    #[test]
    fn test_long_single_sentence_not_split() {
        let text = "word ".repeat(40);
        let segments = extract(&doc(vec![paragraph("p", &text)]));
        assert_eq!(ids(&segments), vec!["p"]);
    }

    #[test]
    fn test_splitting_can_be_disabled() {
        let settings = SegmentSettings {
            split_sentences: false,
            ..Default::default()
        };
        let extractor = SegmentExtractor::with_settings(&settings).unwrap();
        let segments = extractor.extract(&doc(vec![paragraph("p", LONG_PARAGRAPH)]));
        assert_eq!(ids(&segments), vec!["p"]);
    }

    #[test]
    fn test_headings_are_never_split() {
        let segments = extract(&doc(vec![heading("h", 1, LONG_PARAGRAPH)]));
        assert_eq!(ids(&segments), vec!["h"]);
    }

    #[test]
    fn test_stored_sentences_read_directly() {
        let para = Element::new(NodeKind::Paragraph)
            .with_attr(slidepoint_ast::SEGMENT_ID, "p")
            .with_attr(slidepoint_ast::MERGE_GROUP_ID, "m")
            .with_child(sentence("x1", "Hello there."))
            .with_child(sentence("x2", "General Kenobi."));
        let segments = extract(&doc(vec![para.into()]));

        assert_eq!(ids(&segments), vec!["x1", "x2"]);
        assert_eq!(segments[0].parent_segment_id.as_deref(), Some("p"));
        assert_eq!(segments[1].sentence_text.as_deref(), Some("General Kenobi."));
        assert_eq!(segments[1].merge_group_id.as_deref(), Some("m"));
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let tree = doc(vec![
            heading("h", 1, "Title"),
            paragraph("p", LONG_PARAGRAPH),
            slide_divider(),
            image("i", "x.png", None),
        ]);
        assert_eq!(extract(&tree), extract(&tree));
    }
}
