//! Visibility planning
//!
//! Given the segment list, the current position and a format, decide which
//! segments are visible, which are highlighted as active and which are faded.
//! Formats only filter in [`DisplayMode::Follow`]; `view` and `present` show
//! every segment and keep only the active highlight.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use slidepoint_ast::{ContentNode, NodeKind};
use tracing::debug;

use crate::segment::Segment;

/// How much content a follower sees around the current segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Only the current logical unit
    Single,
    /// The pair of logical units containing the current one
    Minimal,
    /// The run of content between empty paragraphs or dividers
    Block,
    /// The whole current slide
    Maximal,
    /// The whole current slide, earlier segments faded
    #[default]
    Scrolling,
}

/// Which surface the content is displayed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Editing view
    View,
    /// Presenter screen
    Present,
    /// Audience following the presenter
    #[default]
    Follow,
}

impl DisplayMode {
    /// Whether format filtering and fading apply in this mode
    pub fn applies_format(self) -> bool {
        self == DisplayMode::Follow
    }
}

impl Format {
    /// All formats, in order of increasing scope
    pub const ALL: [Format; 5] = [
        Format::Single,
        Format::Minimal,
        Format::Block,
        Format::Maximal,
        Format::Scrolling,
    ];

    /// Lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Single => "single",
            Format::Minimal => "minimal",
            Format::Block => "block",
            Format::Maximal => "maximal",
            Format::Scrolling => "scrolling",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Format::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown format: {}", s))
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DisplayMode::View => "view",
            DisplayMode::Present => "present",
            DisplayMode::Follow => "follow",
        })
    }
}

impl FromStr for DisplayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "view" => Ok(DisplayMode::View),
            "present" => Ok(DisplayMode::Present),
            "follow" => Ok(DisplayMode::Follow),
            other => Err(format!("unknown display mode: {}", other)),
        }
    }
}

/// Outcome of visibility planning for one position
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilitySet {
    /// Resolved current segment id
    pub current_id: Option<String>,
    /// Raw index of the current segment
    pub current_index: Option<usize>,
    /// Ids of segments to render
    pub visible: HashSet<String>,
    /// Ids of segments highlighted as current (current + its merge group)
    pub active: HashSet<String>,
    /// Ids of segments rendered faded
    pub faded: HashSet<String>,
    /// Whether format filtering was applied (follow mode)
    pub format_applied: bool,
}

impl VisibilitySet {
    pub fn is_visible(&self, id: &str) -> bool {
        self.visible.contains(id)
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active.contains(id)
    }

    pub fn is_faded(&self, id: &str) -> bool {
        self.faded.contains(id)
    }

    /// Visible segment ids in document order
    pub fn visible_in_order<'a>(&self, segments: &'a [Segment]) -> Vec<&'a str> {
        segments
            .iter()
            .filter(|seg| self.visible.contains(&seg.id))
            .map(|seg| seg.id.as_str())
            .collect()
    }
}

/// Plan visibility for the segment `current_id`.
///
/// An unknown or missing `current_id` falls back to the first segment. The
/// tree is only consulted for [`Format::Block`].
pub fn plan_visibility(
    segments: &[Segment],
    current_id: Option<&str>,
    format: Format,
    mode: DisplayMode,
    tree: &ContentNode,
) -> VisibilitySet {
    let Some(current) = current_id
        .and_then(|id| segments.iter().find(|seg| seg.id == id))
        .or_else(|| segments.first())
    else {
        return VisibilitySet::default();
    };

    let active = merge_group_members(segments, current);

    if !mode.applies_format() {
        return VisibilitySet {
            current_id: Some(current.id.clone()),
            current_index: Some(current.index),
            visible: segments.iter().map(|seg| seg.id.clone()).collect(),
            active,
            faded: HashSet::new(),
            format_applied: false,
        };
    }

    let visible = match format {
        Format::Single => single_visible(segments, current),
        Format::Minimal => minimal_visible(segments, current),
        Format::Block => block_visible(segments, current, tree),
        Format::Maximal | Format::Scrolling => segments
            .iter()
            .filter(|seg| seg.slide_index == current.slide_index)
            .map(|seg| seg.id.clone())
            .collect(),
    };

    let faded = if format == Format::Scrolling {
        segments
            .iter()
            .filter(|seg| seg.slide_index == current.slide_index && seg.index < current.index)
            .map(|seg| seg.id.clone())
            .collect()
    } else {
        HashSet::new()
    };

    debug!(
        current = %current.id,
        %format,
        visible = visible.len(),
        faded = faded.len(),
        "planned visibility"
    );

    VisibilitySet {
        current_id: Some(current.id.clone()),
        current_index: Some(current.index),
        visible,
        active,
        faded,
        format_applied: true,
    }
}

/// The segment itself plus every segment sharing its merge group
fn merge_group_members(segments: &[Segment], current: &Segment) -> HashSet<String> {
    let mut ids: HashSet<String> = segments
        .iter()
        .filter(|seg| seg.shares_merge_group(current))
        .map(|seg| seg.id.clone())
        .collect();
    ids.insert(current.id.clone());
    ids
}

/// The segment plus all sentences split from the same parent
fn with_sibling_sentences(segments: &[Segment], seg: &Segment) -> Vec<String> {
    match (&seg.parent_segment_id, seg.is_sentence()) {
        (Some(parent), true) => segments
            .iter()
            .filter(|other| other.parent_segment_id.as_ref() == Some(parent))
            .map(|other| other.id.clone())
            .collect(),
        _ => vec![seg.id.clone()],
    }
}

fn single_visible(segments: &[Segment], current: &Segment) -> HashSet<String> {
    let mut visible: HashSet<String> = with_sibling_sentences(segments, current)
        .into_iter()
        .collect();
    visible.extend(merge_group_members(segments, current));
    visible
}

/// Logical units: a split paragraph is represented by its first sentence
fn logical_segments(segments: &[Segment]) -> Vec<&Segment> {
    let mut seen_parents: HashSet<&str> = HashSet::new();
    segments
        .iter()
        .filter(|seg| match (&seg.parent_segment_id, seg.is_sentence()) {
            (Some(parent), true) => seen_parents.insert(parent.as_str()),
            _ => true,
        })
        .collect()
}

fn minimal_visible(segments: &[Segment], current: &Segment) -> HashSet<String> {
    let logical = logical_segments(segments);
    let logical_index = logical
        .iter()
        .position(|seg| match (&current.parent_segment_id, current.is_sentence()) {
            (Some(parent), true) => seg.parent_segment_id.as_ref() == Some(parent),
            _ => seg.id == current.id,
        })
        .unwrap_or(0);

    let pair_start = (logical_index / 2) * 2;
    logical
        .iter()
        .skip(pair_start)
        .take(2)
        .flat_map(|seg| with_sibling_sentences(segments, seg))
        .collect()
}

fn block_visible(segments: &[Segment], current: &Segment, tree: &ContentNode) -> HashSet<String> {
    let blocks = block_indices(tree);
    let block_of = |seg: &Segment| {
        blocks.get(seg.id.as_str()).copied().or_else(|| {
            seg.parent_segment_id
                .as_deref()
                .and_then(|parent| blocks.get(parent).copied())
        })
    };

    match block_of(current) {
        Some(block) => segments
            .iter()
            .filter(|seg| block_of(seg) == Some(block))
            .map(|seg| seg.id.clone())
            .collect(),
        None => HashSet::from([current.id.clone()]),
    }
}

/// Map every segment id found under a top-level node to its block index.
///
/// Blocks are delimited by slide dividers and by empty top-level nodes
/// (no segment id, no text, no image) that follow content.
pub fn block_indices(tree: &ContentNode) -> HashMap<&str, usize> {
    let mut blocks = HashMap::new();
    let mut block = 0;
    let mut block_has_content = false;

    for node in tree.children() {
        let boundary = match node {
            ContentNode::Element(el) if el.kind == NodeKind::SlideDivider => true,
            ContentNode::Element(el) => el.segment_id().is_none() && !el.has_content(),
            other => !other.has_content(),
        };

        if boundary {
            if block_has_content {
                block += 1;
                block_has_content = false;
            }
            continue;
        }

        collect_segment_ids(node, block, &mut blocks);
        block_has_content = true;
    }

    blocks
}

fn collect_segment_ids<'a>(node: &'a ContentNode, block: usize, out: &mut HashMap<&'a str, usize>) {
    if let ContentNode::Element(el) = node {
        if let Some(id) = el.segment_id() {
            out.insert(id, block);
        }
    }
    for child in node.children() {
        collect_segment_ids(child, block, out);
    }
}
