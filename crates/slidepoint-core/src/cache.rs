//! Segment list cache keyed by content version
//!
//! Navigation and rendering both need the segment list for the current
//! snapshot. The cache keeps the last extraction and only redoes it when
//! the caller reports a new content version.

use slidepoint_ast::ContentNode;
use tracing::trace;

use crate::extractor::SegmentExtractor;
use crate::segment::Segment;

/// Last extracted segment list and the version it belongs to
#[derive(Debug, Clone, Default)]
pub struct SegmentCache {
    version: Option<u64>,
    segments: Vec<Segment>,
    hits: usize,
    misses: usize,
}

impl SegmentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Segments for `version`, extracting from `tree` on a version change
    pub fn get_or_extract(
        &mut self,
        version: u64,
        tree: &ContentNode,
        extractor: &SegmentExtractor,
    ) -> &[Segment] {
        if self.version == Some(version) {
            self.hits += 1;
            trace!(version, "segment cache hit");
        } else {
            self.misses += 1;
            trace!(version, previous = ?self.version, "segment cache miss");
            self.segments = extractor.extract(tree);
            self.version = Some(version);
        }
        &self.segments
    }

    /// Cached segments, if any version has been extracted
    pub fn get(&self, version: u64) -> Option<&[Segment]> {
        (self.version == Some(version)).then_some(self.segments.as_slice())
    }

    /// Forget the cached list
    pub fn invalidate(&mut self) {
        self.version = None;
        self.segments.clear();
    }

    /// Version of the cached list
    pub fn version(&self) -> Option<u64> {
        self.version
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
}
