//! Merge-group collapsing and outline navigation
//!
//! The presenter outline shows one entry per logical unit: consecutive
//! segments sharing a merge group fold into a single entry. Navigation steps
//! over that outline, so a merge group is entered and left as one step.

use tracing::debug;

use crate::segment::{CollapsedSegment, Segment};

/// Fold consecutive runs of segments sharing a merge group.
///
/// Runs of two or more become one entry carrying the run's ids and count;
/// every other segment passes through unchanged. Entries are re-indexed
/// densely from 0. Non-adjacent members of the same group stay separate.
pub fn collapse(segments: &[Segment]) -> Vec<CollapsedSegment> {
    let mut out: Vec<CollapsedSegment> = Vec::with_capacity(segments.len());
    let mut start = 0;

    while start < segments.len() {
        let first = &segments[start];
        let run = segments[start..]
            .iter()
            .take_while(|seg| seg.shares_merge_group(first))
            .count()
            .max(1);

        let mut segment = first.clone();
        segment.index = out.len();
        let entry = if run > 1 {
            let ids: Vec<String> = segments[start..start + run]
                .iter()
                .map(|seg| seg.id.clone())
                .collect();
            CollapsedSegment {
                segment,
                merged_count: Some(ids.len()),
                merged_segment_ids: Some(ids),
            }
        } else {
            CollapsedSegment {
                segment,
                merged_segment_ids: None,
                merged_count: None,
            }
        };
        out.push(entry);
        start += run;
    }

    debug!(
        segments = segments.len(),
        entries = out.len(),
        "collapsed merge groups"
    );
    out
}

/// Clamp a raw index into `[0, len - 1]`, or 0 for an empty list
pub fn clamp_index(index: usize, len: usize) -> usize {
    index.min(len.saturating_sub(1))
}

/// A navigation position within a segment list
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Position {
    /// The first segment
    #[default]
    Start,
    /// A segment by id; unknown ids fall back to the first segment
    Id(String),
    /// A segment by raw index, clamped into range
    Index(usize),
}

impl Position {
    /// Resolve to a segment; `None` only for an empty list
    pub fn resolve<'a>(&self, segments: &'a [Segment]) -> Option<&'a Segment> {
        match self {
            Position::Start => segments.first(),
            Position::Id(id) => segments
                .iter()
                .find(|seg| &seg.id == id)
                .or_else(|| segments.first()),
            Position::Index(index) => segments.get(clamp_index(*index, segments.len())),
        }
    }
}

/// Steps through the collapsed outline one logical unit at a time
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    outline: Vec<CollapsedSegment>,
}

impl Navigator {
    pub fn new(segments: &[Segment]) -> Self {
        Self {
            outline: collapse(segments),
        }
    }

    /// The collapsed outline
    pub fn outline(&self) -> &[CollapsedSegment] {
        &self.outline
    }

    /// Outline position of the entry containing the segment `id`
    pub fn locate(&self, id: &str) -> Option<usize> {
        self.outline.iter().position(|entry| entry.contains(id))
    }

    /// Outline position of the entry containing the raw segment index
    pub fn locate_index(&self, segments: &[Segment], index: usize) -> Option<usize> {
        if segments.is_empty() {
            return None;
        }
        self.locate(&segments[clamp_index(index, segments.len())].id)
    }

    /// Entry after the one containing `id`; `None` at the end or for an
    /// unknown id
    pub fn next(&self, id: &str) -> Option<&CollapsedSegment> {
        self.locate(id).and_then(|pos| self.outline.get(pos + 1))
    }

    /// Entry before the one containing `id`; `None` at the start or for an
    /// unknown id
    pub fn previous(&self, id: &str) -> Option<&CollapsedSegment> {
        self.locate(id)
            .and_then(|pos| pos.checked_sub(1))
            .and_then(|pos| self.outline.get(pos))
    }
}
