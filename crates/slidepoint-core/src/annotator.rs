//! Segment id reconciliation
//!
//! Segment ids live on the tree itself. After every edit the annotator
//! brings them back in line with the content:
//!
//! - non-empty outermost eligible nodes and sentence elements get an id
//! - empty nodes lose their id and merge group
//! - duplicated ids (copy and paste) are regenerated on the later node
//! - eligible nodes nested inside an identified node lose their id
//! - merge groups left with a single member are dissolved
//!
//! The pass is idempotent: running it on its own output changes nothing.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use slidepoint_ast::{ContentNode, Element, NodeKind, MERGE_GROUP_ID, SEGMENT_ID};
use tracing::debug;
use uuid::Uuid;

use crate::role::has_sentence_children;

/// Source of fresh segment ids
pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

/// Random v4 UUIDs, the editor's id scheme
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic `{prefix}-{n}` ids, counting from 1
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: usize,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("seg")
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

/// What a reconciliation pass changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationReport {
    /// Ids given to nodes that had none
    pub assigned: usize,
    /// Duplicate ids replaced
    pub regenerated: usize,
    /// Ids removed from empty nodes
    pub cleared: usize,
    /// Ids removed from nodes nested in another segment or not eligible
    pub stripped: usize,
    /// Merge groups dissolved for having a single member
    pub dissolved_groups: usize,
}

impl AnnotationReport {
    /// Check whether the pass left the tree untouched
    pub fn is_unchanged(&self) -> bool {
        *self == Self::default()
    }
}

/// Reconciles segment ids on a content tree
#[derive(Debug, Clone, Default)]
pub struct SegmentAnnotator<G = UuidGenerator> {
    ids: G,
}

impl SegmentAnnotator<UuidGenerator> {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Walk state for one pass
#[derive(Default)]
struct Pass {
    seen: HashSet<String>,
    groups: HashMap<String, usize>,
    report: AnnotationReport,
}

impl<G: IdGenerator> SegmentAnnotator<G> {
    pub fn with_generator(ids: G) -> Self {
        Self { ids }
    }

    /// Reconcile ids in place
    pub fn reconcile(&mut self, tree: &mut ContentNode) -> AnnotationReport {
        let mut pass = Pass::default();
        self.walk(std::slice::from_mut(tree), false, &mut pass);

        let lonely: HashSet<String> = pass
            .groups
            .iter()
            .filter(|(_, members)| **members < 2)
            .map(|(group, _)| group.clone())
            .collect();
        if !lonely.is_empty() {
            for_each_element(std::slice::from_mut(tree), &mut |el| {
                if el.merge_group_id().is_some_and(|group| lonely.contains(group)) {
                    el.remove_attr(MERGE_GROUP_ID);
                }
            });
        }
        pass.report.dissolved_groups = lonely.len();

        debug!(
            assigned = pass.report.assigned,
            regenerated = pass.report.regenerated,
            cleared = pass.report.cleared,
            stripped = pass.report.stripped,
            dissolved = pass.report.dissolved_groups,
            "reconciled segment ids"
        );
        pass.report
    }

    fn walk(&mut self, nodes: &mut [ContentNode], inside_segment: bool, pass: &mut Pass) {
        for node in nodes {
            match node {
                ContentNode::Element(el) => self.visit(el, inside_segment, pass),
                ContentNode::Fragment(children) => self.walk(children, inside_segment, pass),
                ContentNode::Text(_) => {}
            }
        }
    }

    fn visit(&mut self, el: &mut Element, inside_segment: bool, pass: &mut Pass) {
        let eligible = el.kind.is_segment_kind() || el.kind == NodeKind::Sentence;

        if !eligible || inside_segment {
            if remove_id(el) {
                pass.report.stripped += 1;
            }
            self.walk(&mut el.children, inside_segment, pass);
            return;
        }

        if !el.has_content() {
            if remove_id(el) {
                pass.report.cleared += 1;
            }
            self.walk(&mut el.children, false, pass);
            return;
        }

        let sentence_parent = matches!(el.kind, NodeKind::Paragraph | NodeKind::ListItem)
            && has_sentence_children(el);
        let wrapper_of_segments = el.segment_id().is_none()
            && matches!(el.kind, NodeKind::ListItem | NodeKind::Blockquote)
            && has_identified_descendant(el);

        if wrapper_of_segments {
            remove_merge_group(el);
            self.walk(&mut el.children, false, pass);
            return;
        }

        self.ensure_id(el, pass);
        if let Some(group) = el.merge_group_id() {
            *pass.groups.entry(group.to_string()).or_default() += 1;
        }
        // sentence elements under a split paragraph are segments of their own
        self.walk(&mut el.children, !sentence_parent, pass);
    }

    fn ensure_id(&mut self, el: &mut Element, pass: &mut Pass) {
        match el.segment_id().map(str::to_string) {
            Some(id) if pass.seen.insert(id.clone()) => {}
            Some(_) => {
                let id = self.fresh_id(pass);
                el.set_attr(SEGMENT_ID, id);
                pass.report.regenerated += 1;
            }
            None => {
                let id = self.fresh_id(pass);
                el.set_attr(SEGMENT_ID, id);
                pass.report.assigned += 1;
            }
        }
    }

    fn fresh_id(&mut self, pass: &mut Pass) -> String {
        loop {
            let id = self.ids.next_id();
            if pass.seen.insert(id.clone()) {
                return id;
            }
        }
    }
}

/// Drop segment and merge ids; returns whether a segment id was present
fn remove_id(el: &mut Element) -> bool {
    remove_merge_group(el);
    el.remove_attr(SEGMENT_ID).is_some_and(|id| !id.is_null())
}

fn remove_merge_group(el: &mut Element) {
    el.remove_attr(MERGE_GROUP_ID);
}

fn has_identified_descendant(el: &Element) -> bool {
    el.children.iter().any(holds_identified)
}

fn holds_identified(node: &ContentNode) -> bool {
    match node {
        ContentNode::Element(el) => {
            (el.kind.is_segment_kind() && el.segment_id().is_some()) || has_identified_descendant(el)
        }
        ContentNode::Fragment(children) => children.iter().any(holds_identified),
        ContentNode::Text(_) => false,
    }
}

fn for_each_element(nodes: &mut [ContentNode], f: &mut impl FnMut(&mut Element)) {
    for node in nodes {
        match node {
            ContentNode::Element(el) => {
                f(el);
                for_each_element(&mut el.children, f);
            }
            ContentNode::Fragment(children) => for_each_element(children, f),
            ContentNode::Text(_) => {}
        }
    }
}
