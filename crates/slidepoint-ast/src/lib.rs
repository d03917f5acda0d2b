//! slidepoint-ast - Content tree definitions
//!
//! This crate provides the read-only document tree consumed by the
//! slidepoint segmentation and rendering engine: a closed set of node kinds,
//! loosely-typed attributes and formatted text runs, plus the JSON shape the
//! collaborative editor stores documents in.

pub mod attrs;
pub mod builder;
pub mod inline;
pub mod node;
mod raw;

pub use attrs::{AttrValue, Attributes, MERGE_GROUP_ID, SEGMENT_ID};
pub use inline::{Mark, TextNode, TextRun};
pub use node::{ContentNode, Element, NodeKind};

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
