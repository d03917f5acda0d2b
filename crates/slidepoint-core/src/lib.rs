//! slidepoint-core - Segmentation and follow-mode rendering
//!
//! Turns a collaborative document tree into navigable presentation points
//! and renders the tree filtered to what the presenter is showing.
//!
//! # Example
//!
//! ```
//! use slidepoint_ast::builder::{doc, paragraph, slide_divider};
//! use slidepoint_core::{extract, plan_visibility, render, DisplayMode, Format};
//!
//! let tree = doc(vec![
//!     paragraph("a", "Hello"),
//!     slide_divider(),
//!     paragraph("b", "World"),
//! ]);
//!
//! let segments = extract(&tree);
//! assert_eq!(segments[1].slide_index, 1);
//!
//! let plan = plan_visibility(&segments, Some("b"), Format::Single, DisplayMode::Follow, &tree);
//! let html = render(&tree, &segments, &plan).to_html();
//! assert_eq!(html, r#"<p class="segment active" data-segment-id="b">World</p>"#);
//! ```

pub mod annotator;
pub mod cache;
pub mod collapse;
pub mod config;
pub mod engine;
pub mod error;
pub mod extractor;
pub mod html;
pub mod label;
pub mod planner;
pub mod renderer;
mod role;
pub mod segment;
pub mod sentence;

// Re-export main types and functions
pub use annotator::{AnnotationReport, IdGenerator, SegmentAnnotator, SequentialIds, UuidGenerator};
pub use cache::SegmentCache;
pub use collapse::{clamp_index, collapse, Navigator, Position};
pub use config::{EngineConfig, SegmentSettings, ViewSettings};
pub use engine::{load_tree, parse_tree, Engine, View, ViewRequest};
pub use error::{Result, SlidepointError};
pub use extractor::{extract, sentence_segment_id, SegmentExtractor};
pub use html::{RenderElement, RenderNode, RenderTree};
pub use label::create_label;
pub use planner::{block_indices, plan_visibility, DisplayMode, Format, VisibilitySet};
pub use renderer::{render, TreeRenderer};
pub use segment::{CollapsedSegment, Segment, SegmentType};
pub use sentence::SentenceSplitter;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, "0.1.0");
    }
}
