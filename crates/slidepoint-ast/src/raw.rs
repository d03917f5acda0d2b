//! JSON shape of the content tree
//!
//! The collaborative editor exchanges documents as nested JSON objects:
//!
//! ```json
//! {"type": "doc", "content": [
//!   {"type": "paragraph", "attrs": {"segmentId": "a1"}, "content": [
//!     {"type": "text", "text": "Hello ", "marks": []},
//!     {"type": "text", "text": "world", "marks": [{"type": "bold"}]}
//!   ]}
//! ]}
//! ```
//!
//! Adjacent `text` objects are grouped into one [`TextNode`] on the way in
//! and expanded back into one object per run on the way out.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::attrs::{AttrValue, Attributes};
use crate::inline::{Mark, TextNode, TextRun};
use crate::node::{ContentNode, Element, NodeKind};

const ROOT_TYPE: &str = "doc";
const TEXT_TYPE: &str = "text";

#[derive(Debug, Serialize, Deserialize)]
struct RawNode {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attrs: Option<Attributes>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    content: Vec<RawNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    marks: Vec<RawMark>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawMark {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attrs: Option<Attributes>,
}

impl RawNode {
    fn container(kind: &str, attrs: &Attributes, content: Vec<RawNode>) -> Self {
        Self {
            kind: kind.to_string(),
            attrs: (!attrs.is_empty()).then(|| attrs.clone()),
            content,
            text: None,
            marks: Vec::new(),
        }
    }

    fn from_run(run: &TextRun) -> Self {
        Self {
            kind: TEXT_TYPE.to_string(),
            attrs: None,
            content: Vec::new(),
            text: Some(run.text.clone()),
            marks: run.marks.iter().map(RawMark::from_mark).collect(),
        }
    }

    fn into_run(self) -> TextRun {
        TextRun {
            text: self.text.unwrap_or_default(),
            marks: self.marks.into_iter().map(RawMark::into_mark).collect(),
        }
    }
}

impl RawMark {
    fn from_mark(mark: &Mark) -> Self {
        let attrs = match mark {
            Mark::Link { href } => {
                let mut attrs = Attributes::new();
                attrs.insert("href".to_string(), AttrValue::from(href.as_str()));
                Some(attrs)
            }
            _ => None,
        };
        Self {
            kind: mark.name().to_string(),
            attrs,
        }
    }

    fn into_mark(self) -> Mark {
        let href = self
            .attrs
            .as_ref()
            .and_then(|attrs| attrs.get("href"))
            .and_then(AttrValue::as_str);
        Mark::from_name(&self.kind, href)
    }
}

fn node_from_raw(raw: RawNode) -> ContentNode {
    match raw.kind.as_str() {
        ROOT_TYPE | "fragment" => ContentNode::Fragment(children_from_raw(raw.content)),
        TEXT_TYPE => ContentNode::Text(TextNode {
            runs: vec![raw.into_run()],
        }),
        tag => ContentNode::Element(Element {
            kind: NodeKind::from_tag(tag),
            attrs: raw.attrs.unwrap_or_default(),
            children: children_from_raw(raw.content),
        }),
    }
}

fn children_from_raw(content: Vec<RawNode>) -> Vec<ContentNode> {
    let mut children: Vec<ContentNode> = Vec::with_capacity(content.len());
    for raw in content {
        if raw.kind == TEXT_TYPE {
            if let Some(ContentNode::Text(text)) = children.last_mut() {
                text.runs.push(raw.into_run());
                continue;
            }
        }
        children.push(node_from_raw(raw));
    }
    children
}

fn node_to_raw(node: &ContentNode) -> RawNode {
    match node {
        ContentNode::Fragment(children) => {
            RawNode::container(ROOT_TYPE, &Attributes::new(), children_to_raw(children))
        }
        ContentNode::Element(el) => {
            RawNode::container(el.kind.tag(), &el.attrs, children_to_raw(&el.children))
        }
        // A lone multi-run text node has no single-object form; wrap it.
        ContentNode::Text(text) => match text.runs.as_slice() {
            [run] => RawNode::from_run(run),
            runs => RawNode::container(
                ROOT_TYPE,
                &Attributes::new(),
                runs.iter().map(RawNode::from_run).collect(),
            ),
        },
    }
}

fn children_to_raw(children: &[ContentNode]) -> Vec<RawNode> {
    let mut out = Vec::with_capacity(children.len());
    for child in children {
        match child {
            ContentNode::Text(text) => out.extend(text.runs.iter().map(RawNode::from_run)),
            other => out.push(node_to_raw(other)),
        }
    }
    out
}

impl<'de> Deserialize<'de> for ContentNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawNode::deserialize(deserializer).map(node_from_raw)
    }
}

impl Serialize for ContentNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        node_to_raw(self).serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs::SEGMENT_ID;

    const SAMPLE: &str = r#"{
        "type": "doc",
        "content": [
            {"type": "heading", "attrs": {"level": 2, "segmentId": "h1"}, "content": [
                {"type": "text", "text": "Title"}
            ]},
            {"type": "paragraph", "attrs": {"segmentId": "p1", "mergeGroupId": null}, "content": [
                {"type": "text", "text": "Hello "},
                {"type": "text", "text": "world", "marks": [{"type": "bold"}]},
                {"type": "hard_break"},
                {"type": "text", "text": "site", "marks": [{"type": "link", "attrs": {"href": "https://x.test"}}]}
            ]},
            {"type": "slide_divider"}
        ]
    }"#;

    #[test]
    fn test_parse_document() {
        let doc: ContentNode = serde_json::from_str(SAMPLE).unwrap();
        let children = doc.children();
        assert_eq!(children.len(), 3);

        let heading = children[0].as_element().unwrap();
        assert_eq!(heading.kind, NodeKind::Heading);
        assert_eq!(heading.heading_level(), 2);
        assert_eq!(heading.segment_id(), Some("h1"));

        let para = children[1].as_element().unwrap();
        assert_eq!(para.merge_group_id(), None);
        // "Hello " + "world" grouped, then hard break, then link run
        assert_eq!(para.children.len(), 3);
        match &para.children[0] {
            ContentNode::Text(text) => {
                assert_eq!(text.runs.len(), 2);
                assert_eq!(text.runs[1].marks, vec![Mark::Bold]);
            }
            other => panic!("expected text, got {:?}", other),
        }
        assert_eq!(para.text_content(), "Hello world\nsite");

        assert_eq!(
            children[2].as_element().map(|el| el.kind.clone()),
            Some(NodeKind::SlideDivider)
        );
    }

    #[test]
    fn test_serialize_expands_runs() {
        let doc: ContentNode = serde_json::from_str(SAMPLE).unwrap();
        let value = serde_json::to_value(&doc).unwrap();

        assert_eq!(value["type"], "doc");
        let para = &value["content"][1];
        assert_eq!(para["attrs"][SEGMENT_ID], "p1");
        assert_eq!(para["content"].as_array().unwrap().len(), 4);
        assert_eq!(para["content"][3]["marks"][0]["attrs"]["href"], "https://x.test");

        let reparsed: ContentNode = serde_json::from_value(value).unwrap();
        assert_eq!(reparsed, doc);
    }

    #[test]
    fn test_missing_attrs_and_content() {
        let doc: ContentNode =
            serde_json::from_str(r#"{"type":"doc","content":[{"type":"paragraph"}]}"#).unwrap();
        let para = doc.children()[0].as_element().unwrap();
        assert!(para.attrs.is_empty());
        assert!(para.children.is_empty());
    }

    #[test]
    fn test_unknown_node_kind_survives() {
        let doc: ContentNode =
            serde_json::from_str(r#"{"type":"doc","content":[{"type":"table","content":[]}]}"#)
                .unwrap();
        let el = doc.children()[0].as_element().unwrap();
        assert_eq!(el.kind, NodeKind::Unknown("table".to_string()));

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["content"][0]["type"], "table");
    }
}
