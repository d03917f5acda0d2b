//! Segment types
//!
//! A segment is one navigable presentation point. Segments are produced by
//! the extractor in document order and consumed by navigation, the planner,
//! the renderer and the presenter outline.

use serde::{Deserialize, Serialize};

/// Id of the synthetic segment used when a document has no content
pub const FALLBACK_SEGMENT_ID: &str = "seg-default";

/// Label of the synthetic fallback segment
pub const FALLBACK_SEGMENT_LABEL: &str = "Slide 1";

/// Kind of content a segment stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SegmentType {
    Heading,
    Paragraph,
    ListItem,
    Image,
    Blockquote,
    Sentence,
}

impl SegmentType {
    /// Human-readable name, used as a label of last resort
    pub fn display_name(self) -> &'static str {
        match self {
            SegmentType::Heading => "Heading",
            SegmentType::Paragraph => "Paragraph",
            SegmentType::ListItem => "List item",
            SegmentType::Image => "Image",
            SegmentType::Blockquote => "Quote",
            SegmentType::Sentence => "Sentence",
        }
    }
}

/// One navigable unit of presentation content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    /// Stable id; `{parentId}:s{n}` for virtual sentences
    pub id: String,
    /// Dense 0-based position in extraction order
    pub index: usize,
    /// Display text, whitespace-collapsed and truncated
    pub label: String,
    /// Segment kind
    #[serde(rename = "type")]
    pub segment_type: SegmentType,
    /// Heading depth for headings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    /// Number of slide dividers preceding the segment
    pub slide_index: usize,
    /// Shared by segments presented as one unit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_group_id: Option<String>,
    /// Paragraph (or list item) a sentence was split from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_segment_id: Option<String>,
    /// Full untruncated sentence text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentence_text: Option<String>,
}

impl Segment {
    /// The segment navigation falls back to for content-less documents
    pub fn fallback() -> Self {
        Self {
            id: FALLBACK_SEGMENT_ID.to_string(),
            index: 0,
            label: FALLBACK_SEGMENT_LABEL.to_string(),
            segment_type: SegmentType::Paragraph,
            level: None,
            slide_index: 0,
            merge_group_id: None,
            parent_segment_id: None,
            sentence_text: None,
        }
    }

    /// Check if this is a sentence split from a parent segment
    pub fn is_sentence(&self) -> bool {
        self.segment_type == SegmentType::Sentence
    }

    /// Check whether the segment shares a merge group with `other`
    pub fn shares_merge_group(&self, other: &Segment) -> bool {
        matches!(
            (&self.merge_group_id, &other.merge_group_id),
            (Some(a), Some(b)) if a == b
        )
    }
}

/// A segment folded together with its consecutive merge-group members
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollapsedSegment {
    /// Representative (first) segment of the run, re-indexed
    #[serde(flatten)]
    pub segment: Segment,
    /// Ids of every segment folded into this entry, in order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merged_segment_ids: Option<Vec<String>>,
    /// Number of folded segments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merged_count: Option<usize>,
}

impl CollapsedSegment {
    /// Check if this entry stands for the segment with `id`
    pub fn contains(&self, id: &str) -> bool {
        self.segment.id == id
            || self
                .merged_segment_ids
                .as_ref()
                .is_some_and(|ids| ids.iter().any(|merged| merged == id))
    }
}
