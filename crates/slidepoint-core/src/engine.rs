//! Engine façade
//!
//! Ties the passes together for one content snapshot:
//! extract (cached per version) → plan visibility → render.

use std::fs;
use std::path::Path;

use slidepoint_ast::ContentNode;
use tracing::{debug, info};

use crate::cache::SegmentCache;
use crate::collapse::{collapse, Navigator, Position};
use crate::config::{EngineConfig, ViewSettings};
use crate::error::{Result, SlidepointError};
use crate::extractor::SegmentExtractor;
use crate::html::RenderTree;
use crate::planner::{plan_visibility, DisplayMode, Format, VisibilitySet};
use crate::renderer::render;
use crate::segment::{CollapsedSegment, Segment};

/// Parse a content tree from the editor's JSON
pub fn parse_tree(json: &str) -> Result<ContentNode> {
    Ok(serde_json::from_str(json)?)
}

/// Load a content tree from a JSON file
pub fn load_tree(path: impl AsRef<Path>) -> Result<ContentNode> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)?;
    parse_tree(&json).map_err(|e| match e {
        SlidepointError::JsonError(err) => {
            SlidepointError::invalid_document(format!("{}: {}", path.display(), err))
        }
        other => other,
    })
}

/// What to show
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewRequest {
    pub mode: DisplayMode,
    pub format: Format,
    pub position: Position,
}

impl ViewRequest {
    /// Request using the configured mode and format, at `position`
    pub fn from_settings(settings: &ViewSettings, position: Position) -> Self {
        Self {
            mode: settings.mode,
            format: settings.format,
            position,
        }
    }
}

/// Result of one extract, plan and render cycle
#[derive(Debug, Clone)]
pub struct View {
    /// Visibility decisions
    pub visibility: VisibilitySet,
    /// Rendered tree
    pub tree: RenderTree,
}

impl View {
    pub fn to_html(&self) -> String {
        self.tree.to_html()
    }
}

/// Runs the segmentation pipeline over successive content snapshots
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    extractor: SegmentExtractor,
    cache: SegmentCache,
}

impl Engine {
    /// Create an engine; fails only on invalid configuration
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let extractor = SegmentExtractor::with_settings(&config.segments)?;
        info!(
            mode = %config.view.mode,
            format = %config.view.format,
            "engine ready"
        );
        Ok(Self {
            config,
            extractor,
            cache: SegmentCache::new(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Segments of the snapshot `version`
    pub fn segments(&mut self, version: u64, tree: &ContentNode) -> &[Segment] {
        self.cache.get_or_extract(version, tree, &self.extractor)
    }

    /// Presenter outline with merge groups folded
    pub fn outline(&mut self, version: u64, tree: &ContentNode) -> Vec<CollapsedSegment> {
        collapse(self.segments(version, tree))
    }

    /// Navigator over the presenter outline
    pub fn navigator(&mut self, version: u64, tree: &ContentNode) -> Navigator {
        Navigator::new(self.segments(version, tree))
    }

    /// Request for `position` with the configured mode and format
    pub fn request_at(&self, position: Position) -> ViewRequest {
        ViewRequest::from_settings(&self.config.view, position)
    }

    /// Plan and render the snapshot `version`
    pub fn view(&mut self, version: u64, tree: &ContentNode, request: &ViewRequest) -> View {
        let segments = self.cache.get_or_extract(version, tree, &self.extractor);
        let current = request.position.resolve(segments).map(|seg| seg.id.as_str());
        let visibility = plan_visibility(segments, current, request.format, request.mode, tree);
        let rendered = render(tree, segments, &visibility);

        debug!(
            version,
            current = ?visibility.current_id,
            visible = visibility.visible.len(),
            "rendered view"
        );
        View {
            visibility,
            tree: rendered,
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            extractor: SegmentExtractor::default(),
            cache: SegmentCache::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SegmentSettings;
    use slidepoint_ast::builder::*;

    fn deck() -> ContentNode {
        doc(vec![
            heading("t", 1, "Title"),
            paragraph("a", "Alpha"),
            slide_divider(),
            paragraph("b", "Beta"),
            paragraph("c", "Gamma"),
        ])
    }

    #[test]
    fn test_view_follows_position() {
        let mut engine = Engine::default();
        let tree = deck();
        let request = ViewRequest {
            mode: DisplayMode::Follow,
            format: Format::Single,
            position: Position::Id("b".into()),
        };
        let view = engine.view(1, &tree, &request);
        assert_eq!(view.visibility.current_id.as_deref(), Some("b"));
        assert_eq!(view.tree.segment_ids(), vec!["b"]);
    }

    #[test]
    fn test_view_clamps_index() {
        let mut engine = Engine::default();
        let tree = deck();
        let request = ViewRequest {
            mode: DisplayMode::Follow,
            format: Format::Maximal,
            position: Position::Index(99),
        };
        let view = engine.view(1, &tree, &request);
        assert_eq!(view.visibility.current_id.as_deref(), Some("c"));
        assert_eq!(view.tree.segment_ids(), vec!["b", "c"]);
    }

    #[test]
    fn test_configured_request() {
        let engine = Engine::default();
        let request = engine.request_at(Position::Start);
        assert_eq!(request.mode, DisplayMode::Follow);
        assert_eq!(request.format, Format::Scrolling);
    }

    #[test]
    fn test_segments_are_cached_per_version() {
        let mut engine = Engine::default();
        let tree = deck();
        let first = engine.segments(3, &tree).to_vec();
        let second = engine.segments(3, &tree).to_vec();
        assert_eq!(first, second);
        assert_eq!(engine.cache.hits(), 1);
    }

    #[test]
    fn test_disabled_splitting_from_config() {
        let config = EngineConfig {
            segments: SegmentSettings {
                split_sentences: false,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut engine = Engine::new(config).unwrap();
        let long = "First sentence is here and it is fairly long. \
            Second sentence follows with even more words. \
            Third sentence closes it all off nicely.";
        let tree = doc(vec![paragraph("p", long)]);
        assert_eq!(engine.segments(1, &tree).len(), 1);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = EngineConfig {
            segments: SegmentSettings {
                label_max_len: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        let err = Engine::new(config).unwrap_err();
        assert_eq!(err.code(), "SP002");
    }

    #[test]
    fn test_parse_tree() {
        let tree = parse_tree(
            r#"{"type":"doc","content":[{"type":"paragraph","attrs":{"segmentId":"p"},"content":[{"type":"text","text":"Hi"}]}]}"#,
        )
        .unwrap();
        assert_eq!(engine_segment_ids(&tree), vec!["p"]);
        assert_eq!(parse_tree("not json").unwrap_err().code(), "SP005");
    }

    #[test]
    fn test_load_tree_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{").unwrap();
        let err = load_tree(&path).unwrap_err();
        assert_eq!(err.code(), "SP003");
        assert!(err.to_string().contains("broken.json"));

        let missing = load_tree(dir.path().join("missing.json")).unwrap_err();
        assert_eq!(missing.code(), "SP007");
    }

    fn engine_segment_ids(tree: &ContentNode) -> Vec<String> {
        Engine::default()
            .segments(0, tree)
            .iter()
            .map(|s| s.id.clone())
            .collect()
    }
}
