//! Tree rendering in lockstep with the segment list
//!
//! The renderer walks the content tree in the same order as the extractor,
//! keeping a cursor into the segment list that advances once per segment
//! consumed. Each segment node is checked against the segment at the cursor
//! before it is rendered; on mismatch the node is elided instead of being
//! rendered with another segment's visibility.
//!
//! In follow mode nodes without a segment id are dropped before the first
//! visible segment and after the last one, which trims empty paragraphs and
//! stray structure around the visible range.

use std::ops::Range;

use slidepoint_ast::{ContentNode, Element, Mark, NodeKind, TextNode, TextRun};
use tracing::{trace, warn};

use crate::html::{RenderElement, RenderNode, RenderTree, DATA_MERGE_GROUP, DATA_SEGMENT_ID};
use crate::planner::VisibilitySet;
use crate::role::{segment_role, SegmentRole};
use crate::segment::Segment;

/// Class on every rendered segment wrapper
pub const CLASS_SEGMENT: &str = "segment";
/// Class on the current segment and its merge group
pub const CLASS_ACTIVE: &str = "active";
/// Class on already-presented segments in scrolling format
pub const CLASS_FADED: &str = "faded";
/// Class on sentence spans
pub const CLASS_SENTENCE: &str = "sentence";
/// Class on slide divider rules
pub const CLASS_SLIDE_DIVIDER: &str = "slide-divider";
/// Attribute naming the paragraph a group of sentence spans belongs to
pub const DATA_SENTENCE_PARENT: &str = "data-sentence-parent";

/// Render a tree for the given visibility plan
pub fn render(tree: &ContentNode, segments: &[Segment], visibility: &VisibilitySet) -> RenderTree {
    TreeRenderer::new(segments, visibility).render(tree)
}

/// Renders a content tree against a segment list and a visibility plan
pub struct TreeRenderer<'a> {
    segments: &'a [Segment],
    visibility: &'a VisibilitySet,
}

/// Walk state for one render call
struct RenderContext {
    cursor: usize,
    has_rendered_visible: bool,
    has_finished_visible: bool,
    remaining_visible: usize,
    misaligned: Vec<String>,
}

impl<'a> TreeRenderer<'a> {
    pub fn new(segments: &'a [Segment], visibility: &'a VisibilitySet) -> Self {
        Self {
            segments,
            visibility,
        }
    }

    /// Render the tree. Each call owns a fresh walk context.
    pub fn render(&self, tree: &ContentNode) -> RenderTree {
        let mut ctx = RenderContext {
            cursor: 0,
            has_rendered_visible: false,
            has_finished_visible: false,
            remaining_visible: self
                .segments
                .iter()
                .filter(|seg| self.visibility.is_visible(&seg.id))
                .count(),
            misaligned: Vec::new(),
        };

        let mut nodes = Vec::new();
        for node in tree.children() {
            self.walk_node(node, None, &mut ctx, &mut nodes);
        }

        if !ctx.misaligned.is_empty() {
            warn!(
                elided = ctx.misaligned.len(),
                "rendered with a stale segment list"
            );
        }

        RenderTree {
            nodes,
            misaligned: ctx.misaligned,
        }
    }

    fn walk_node(
        &self,
        node: &ContentNode,
        list_value: Option<i64>,
        ctx: &mut RenderContext,
        out: &mut Vec<RenderNode>,
    ) {
        match node {
            ContentNode::Fragment(children) => {
                for child in children {
                    self.walk_node(child, None, ctx, out);
                }
            }
            ContentNode::Text(text) => {
                if !self.outside_visible(ctx) {
                    out.extend(render_text(text));
                }
            }
            ContentNode::Element(el) => match segment_role(el) {
                SegmentRole::Divider => {
                    if !self.visibility.format_applied {
                        out.push(render_plain(el, None));
                    }
                }
                SegmentRole::Segment(id) => self.render_segment(el, id, list_value, ctx, out),
                SegmentRole::SentenceParent => {
                    self.render_stored_sentences(el, list_value, ctx, out)
                }
                SegmentRole::Container => {
                    let mut children = Vec::new();
                    for (child, value) in numbered_children(el) {
                        self.walk_node(child, value, ctx, &mut children);
                    }
                    if !children.is_empty() {
                        out.push(shell(el, list_value).with_children(children).into());
                    }
                }
                SegmentRole::Leaf => {
                    if self.outside_visible(ctx) {
                        trace!(tag = el.kind.tag(), "eliding node outside visible range");
                        return;
                    }
                    out.push(render_plain(el, list_value));
                }
            },
        }
    }

    fn outside_visible(&self, ctx: &RenderContext) -> bool {
        self.visibility.format_applied && (!ctx.has_rendered_visible || ctx.has_finished_visible)
    }

    fn render_segment(
        &self,
        el: &Element,
        id: &str,
        list_value: Option<i64>,
        ctx: &mut RenderContext,
        out: &mut Vec<RenderNode>,
    ) {
        let Some(seg) = self.segments.get(ctx.cursor) else {
            return self.misaligned(id, ctx);
        };

        if seg.id == id {
            ctx.cursor += 1;
            if self.consume(seg, ctx) {
                let wrapper = self
                    .decorate(shell(el, list_value), seg)
                    .with_children(render_plain_children(el));
                out.push(wrapper.into());
            }
        } else if seg.is_sentence() && seg.parent_segment_id.as_deref() == Some(id) {
            let count = self.segments[ctx.cursor..]
                .iter()
                .take_while(|s| s.is_sentence() && s.parent_segment_id.as_deref() == Some(id))
                .count();
            let sentences = &self.segments[ctx.cursor..ctx.cursor + count];
            ctx.cursor += count;
            self.render_virtual_sentences(el, id, sentences, list_value, ctx, out);
        } else {
            self.misaligned(id, ctx);
        }
    }

    /// Render a paragraph split at extraction time, one span per sentence
    fn render_virtual_sentences(
        &self,
        el: &Element,
        id: &str,
        sentences: &[Segment],
        list_value: Option<i64>,
        ctx: &mut RenderContext,
        out: &mut Vec<RenderNode>,
    ) {
        let inline = InlineText::collect(&el.children);
        let ranges = inline.locate(sentences);

        let mut children = Vec::new();
        for (n, seg) in sentences.iter().enumerate() {
            if !self.consume(seg, ctx) {
                continue;
            }
            if !children.is_empty() {
                children.push(RenderNode::Text(" ".to_string()));
            }
            let content = match &ranges[n] {
                Some(range) => inline.slice(range, |pos| owner_of(pos, &ranges) == Some(n)),
                None => vec![RenderNode::Text(sentence_text(seg).to_string())],
            };
            let span = self
                .decorate(RenderElement::new("span").with_class(CLASS_SENTENCE), seg)
                .with_children(content);
            children.push(span.into());
        }

        if children.is_empty() {
            return;
        }
        out.push(
            shell(el, list_value)
                .with_attr(DATA_SENTENCE_PARENT, id)
                .with_children(children)
                .into(),
        );
    }

    /// Render a paragraph whose sentences are stored as child elements
    fn render_stored_sentences(
        &self,
        el: &Element,
        list_value: Option<i64>,
        ctx: &mut RenderContext,
        out: &mut Vec<RenderNode>,
    ) {
        let mut children = Vec::new();
        let mut any_visible = false;

        for child in &el.children {
            let sentence = match child {
                ContentNode::Element(sentence) if sentence.kind == NodeKind::Sentence => sentence,
                other => {
                    children.extend(render_plain_node(other));
                    continue;
                }
            };
            let Some(id) = sentence.segment_id() else {
                continue;
            };
            match self.segments.get(ctx.cursor) {
                Some(seg) if seg.id == id => {
                    ctx.cursor += 1;
                    if self.consume(seg, ctx) {
                        any_visible = true;
                        let span = self
                            .decorate(RenderElement::new("span").with_class(CLASS_SENTENCE), seg)
                            .with_children(render_plain_children(sentence));
                        children.push(span.into());
                    }
                }
                _ => self.misaligned(id, ctx),
            }
        }

        if !any_visible {
            return;
        }
        let mut wrapper = shell(el, list_value);
        if let Some(id) = el.segment_id() {
            wrapper = wrapper.with_attr(DATA_SENTENCE_PARENT, id);
        }
        out.push(wrapper.with_children(children).into());
    }

    /// Record a consumed segment; returns whether it is visible
    fn consume(&self, seg: &Segment, ctx: &mut RenderContext) -> bool {
        if !self.visibility.is_visible(&seg.id) {
            return false;
        }
        ctx.has_rendered_visible = true;
        self.retire_visible(ctx);
        true
    }

    fn retire_visible(&self, ctx: &mut RenderContext) {
        ctx.remaining_visible = ctx.remaining_visible.saturating_sub(1);
        if ctx.remaining_visible == 0 {
            ctx.has_finished_visible = true;
        }
    }

    fn decorate(&self, mut el: RenderElement, seg: &Segment) -> RenderElement {
        el.classes.push(CLASS_SEGMENT.to_string());
        if self.visibility.is_active(&seg.id) {
            el.classes.push(CLASS_ACTIVE.to_string());
        }
        if self.visibility.is_faded(&seg.id) {
            el.classes.push(CLASS_FADED.to_string());
        }
        el.attrs.push((DATA_SEGMENT_ID.to_string(), seg.id.clone()));
        if let Some(group) = &seg.merge_group_id {
            el.attrs.push((DATA_MERGE_GROUP.to_string(), group.clone()));
        }
        el
    }

    fn misaligned(&self, id: &str, ctx: &mut RenderContext) {
        warn!(
            segment_id = id,
            cursor = ctx.cursor,
            expected = self.segments.get(ctx.cursor).map(|s| s.id.as_str()),
            "segment list out of step with tree, eliding node"
        );
        ctx.misaligned.push(id.to_string());
        if self.visibility.is_visible(id) {
            self.retire_visible(ctx);
        }
    }
}

fn sentence_text(seg: &Segment) -> &str {
    seg.sentence_text.as_deref().unwrap_or(&seg.label)
}

/// Inline content of a paragraph flattened to text with offsets
struct InlineText<'a> {
    text: String,
    pieces: Vec<Piece<'a>>,
}

enum Piece<'a> {
    /// A text run starting at a byte offset
    Run { start: usize, run: &'a TextRun },
    /// A non-text inline node (break, image) at a byte offset
    Node { pos: usize, node: &'a ContentNode },
}

impl<'a> InlineText<'a> {
    /// Flatten children the same way `Element::text_content` does
    fn collect(children: &'a [ContentNode]) -> Self {
        let mut text = String::new();
        let mut pieces = Vec::new();
        for child in children {
            match child {
                ContentNode::Text(node) => {
                    for run in &node.runs {
                        pieces.push(Piece::Run {
                            start: text.len(),
                            run,
                        });
                        text.push_str(&run.text);
                    }
                }
                other => {
                    pieces.push(Piece::Node {
                        pos: text.len(),
                        node: other,
                    });
                    text.push_str(&other.text_content());
                }
            }
        }
        Self { text, pieces }
    }

    /// Find each sentence in order; `None` when the text no longer matches
    fn locate(&self, sentences: &[Segment]) -> Vec<Option<Range<usize>>> {
        let mut from = 0;
        sentences
            .iter()
            .map(|seg| {
                let needle = sentence_text(seg);
                let start = from + self.text.get(from..)?.find(needle)?;
                from = start + needle.len();
                Some(start..from)
            })
            .collect()
    }

    /// Render the slice of inline content covered by `range`
    fn slice(&self, range: &Range<usize>, owns_node: impl Fn(usize) -> bool) -> Vec<RenderNode> {
        let mut out = Vec::new();
        for piece in &self.pieces {
            match piece {
                Piece::Run { start, run } => {
                    let end = start + run.text.len();
                    let from = range.start.max(*start);
                    let to = range.end.min(end);
                    if from < to {
                        out.push(render_run(&TextRun {
                            text: run.text[from - start..to - start].to_string(),
                            marks: run.marks.clone(),
                        }));
                    }
                }
                Piece::Node { pos, node } => {
                    if owns_node(*pos) {
                        out.extend(render_plain_node(node));
                    }
                }
            }
        }
        out
    }
}

/// Sentence owning an inline node at `pos`: the last one starting at or
/// before it, or the first located sentence
fn owner_of(pos: usize, ranges: &[Option<Range<usize>>]) -> Option<usize> {
    let mut owner = ranges.iter().position(Option::is_some);
    for (n, range) in ranges.iter().enumerate() {
        if range.as_ref().is_some_and(|r| r.start <= pos) {
            owner = Some(n);
        }
    }
    owner
}

/// Children paired with the ordinal they display when inside an ordered list.
///
/// The ordinal is `start + position` in the original list, so items keep
/// their true number when earlier items are hidden.
fn numbered_children(el: &Element) -> Vec<(&ContentNode, Option<i64>)> {
    let ordered = el.kind == NodeKind::OrderedList;
    let start = el.list_start();
    let mut position = 0;
    el.children
        .iter()
        .map(|child| {
            let is_item = ordered
                && matches!(child, ContentNode::Element(item) if item.kind == NodeKind::ListItem);
            let value = is_item.then(|| {
                let value = start.saturating_add(position);
                position += 1;
                value
            });
            (child, value)
        })
        .collect()
}

/// Element without children, tag and attributes resolved
fn shell(el: &Element, list_value: Option<i64>) -> RenderElement {
    let out = match &el.kind {
        NodeKind::Paragraph => RenderElement::new("p"),
        NodeKind::Heading => RenderElement::new(format!("h{}", el.heading_level())),
        NodeKind::BulletList => RenderElement::new("ul"),
        NodeKind::OrderedList => {
            RenderElement::new("ol").with_attr("start", el.list_start().to_string())
        }
        NodeKind::ListItem => RenderElement::new("li"),
        NodeKind::Image => RenderElement::new("img")
            .with_attr("src", el.attr_str("src").unwrap_or_default())
            .with_attr("alt", el.attr_str("alt").unwrap_or_default()),
        NodeKind::SlideDivider => RenderElement::new("hr").with_class(CLASS_SLIDE_DIVIDER),
        NodeKind::Blockquote => RenderElement::new("blockquote"),
        NodeKind::Attribution => RenderElement::new("cite"),
        NodeKind::HardBreak => RenderElement::new("br"),
        NodeKind::Sentence => RenderElement::new("span").with_class(CLASS_SENTENCE),
        NodeKind::Unknown(tag) => RenderElement::new("div").with_attr("data-node-type", tag.as_str()),
    };
    match list_value {
        Some(value) => out.with_attr("value", value.to_string()),
        None => out,
    }
}

fn render_plain(el: &Element, list_value: Option<i64>) -> RenderNode {
    shell(el, list_value)
        .with_children(render_plain_children(el))
        .into()
}

fn render_plain_children(el: &Element) -> Vec<RenderNode> {
    let mut out = Vec::new();
    for (child, value) in numbered_children(el) {
        match child {
            ContentNode::Element(child_el) => out.push(render_plain(child_el, value)),
            other => out.extend(render_plain_node(other)),
        }
    }
    out
}

fn render_plain_node(node: &ContentNode) -> Vec<RenderNode> {
    match node {
        ContentNode::Text(text) => render_text(text),
        ContentNode::Element(el) => vec![render_plain(el, None)],
        ContentNode::Fragment(children) => children.iter().flat_map(render_plain_node).collect(),
    }
}

fn render_text(text: &TextNode) -> Vec<RenderNode> {
    text.runs.iter().map(render_run).collect()
}

/// Render a run with its marks nested, first mark outermost
fn render_run(run: &TextRun) -> RenderNode {
    let mut node = RenderNode::Text(run.text.clone());
    for mark in run.marks.iter().rev() {
        node = mark_element(mark).with_children(vec![node]).into();
    }
    node
}

fn mark_element(mark: &Mark) -> RenderElement {
    match mark {
        Mark::Bold => RenderElement::new("strong"),
        Mark::Italic => RenderElement::new("em"),
        Mark::Underline => RenderElement::new("u"),
        Mark::Strike => RenderElement::new("s"),
        Mark::Code => RenderElement::new("code"),
        Mark::Link { href } => RenderElement::new("a").with_attr("href", href.as_str()),
        Mark::Other(name) => RenderElement::new("span").with_class(format!("mark-{}", name)),
    }
}
