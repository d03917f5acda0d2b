//! Integration tests for the slidepoint CLI
//!
//! Commands are driven through the library functions against documents
//! written to a scratch directory.

use std::fs;
use std::path::PathBuf;

use slidepoint_cli::{
    annotate_command, format_outline, format_segments, load_config, render_command,
    segments_command, OutputFormat,
};
use slidepoint_core::{collapse, extract, load_tree, DisplayMode, Format, Position};
use tempfile::TempDir;

const DECK: &str = r#"{
  "type": "doc",
  "content": [
    { "type": "heading", "attrs": { "level": 2, "segmentId": "title" },
      "content": [{ "type": "text", "text": "Roadmap" }] },
    { "type": "paragraph", "attrs": { "segmentId": "a", "mergeGroupId": "g" },
      "content": [{ "type": "text", "text": "Plan" }] },
    { "type": "paragraph", "attrs": { "segmentId": "b", "mergeGroupId": "g" },
      "content": [{ "type": "text", "text": "Build" }] },
    { "type": "slideDivider" },
    { "type": "paragraph", "attrs": { "segmentId": "c" },
      "content": [{ "type": "text", "text": "Launch" }] }
  ]
}"#;

const UNANNOTATED: &str = r#"{
  "type": "doc",
  "content": [
    { "type": "paragraph", "content": [{ "type": "text", "text": "First" }] },
    { "type": "paragraph" },
    { "type": "paragraph", "content": [{ "type": "text", "text": "Second" }] }
  ]
}"#;

fn write_doc(dir: &TempDir, name: &str, json: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, json).unwrap();
    path
}

#[test]
fn test_render_to_file() {
    let dir = TempDir::new().unwrap();
    let input = write_doc(&dir, "deck.json", DECK);
    let output = dir.path().join("out.html");

    render_command(
        &input,
        Position::Id("c".into()),
        Some(DisplayMode::Follow),
        Some(Format::Single),
        Some(output.as_path()),
        None,
    )
    .unwrap();

    let html = fs::read_to_string(&output).unwrap();
    assert_eq!(html, r#"<p class="segment active" data-segment-id="c">Launch</p>"#);
}

#[test]
fn test_render_uses_config_defaults() {
    let dir = TempDir::new().unwrap();
    let input = write_doc(&dir, "deck.json", DECK);
    let config = dir.path().join("slidepoint.toml");
    fs::write(&config, "[view]\nmode = \"view\"\n").unwrap();
    let output = dir.path().join("out.html");

    render_command(
        &input,
        Position::Start,
        None,
        None,
        Some(output.as_path()),
        Some(config.as_path()),
    )
    .unwrap();

    let html = fs::read_to_string(&output).unwrap();
    assert!(html.contains("<hr class=\"slide-divider\">"));
    assert!(html.contains("Launch"));
    assert!(html.contains(r#"data-merge-group="g""#));
}

#[test]
fn test_annotate_sequential() {
    let dir = TempDir::new().unwrap();
    let input = write_doc(&dir, "raw.json", UNANNOTATED);
    let output = dir.path().join("annotated.json");

    annotate_command(&input, Some(output.as_path()), Some("p")).unwrap();

    let tree = load_tree(&output).unwrap();
    let ids: Vec<String> = extract(&tree).into_iter().map(|s| s.id).collect();
    assert_eq!(ids, vec!["p-1", "p-2"]);
}

#[test]
fn test_annotate_in_place_is_stable() {
    let dir = TempDir::new().unwrap();
    let input = write_doc(&dir, "raw.json", UNANNOTATED);

    annotate_command(&input, Some(input.as_path()), None).unwrap();
    let first = fs::read_to_string(&input).unwrap();
    annotate_command(&input, Some(input.as_path()), None).unwrap();
    let second = fs::read_to_string(&input).unwrap();

    assert_eq!(first, second);
    let json: serde_json::Value = serde_json::from_str(&second).unwrap();
    assert_eq!(json["type"], "doc");
}

#[test]
fn test_missing_input_fails() {
    let dir = TempDir::new().unwrap();
    let err = segments_command(&dir.path().join("nope.json"), OutputFormat::Text, None).unwrap_err();
    assert!(err.to_string().contains("Input file not found"));
}

#[test]
fn test_invalid_document_fails() {
    let dir = TempDir::new().unwrap();
    let input = write_doc(&dir, "bad.json", "{ not json");
    let err = segments_command(&input, OutputFormat::Json, None).unwrap_err();
    assert!(err.to_string().contains("Failed to read document"));
}

#[test]
fn test_load_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.toml");
    fs::write(&path, "[segments]\nsentence_threshold = 40\n").unwrap();

    let config = load_config(Some(path.as_path())).unwrap();
    assert_eq!(config.segments.sentence_threshold, 40);

    let err = load_config(Some(dir.path().join("missing.toml").as_path())).unwrap_err();
    assert!(err.to_string().contains("Failed to load config"));
}

#[test]
fn test_format_segments() {
    let dir = TempDir::new().unwrap();
    let tree = load_tree(write_doc(&dir, "deck.json", DECK)).unwrap();
    let segments = extract(&tree);

    let text = format_segments(&segments, OutputFormat::Text).unwrap();
    assert_eq!(text.lines().count(), 4);
    assert!(text.lines().next().unwrap().contains("Roadmap"));
    assert!(text.contains("[g]"));

    let json = format_segments(&segments, OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value[0]["type"], "heading");
    assert_eq!(value[0]["level"], 2);
    assert_eq!(value[3]["slideIndex"], 1);
}

#[test]
fn test_format_outline() {
    let dir = TempDir::new().unwrap();
    let tree = load_tree(write_doc(&dir, "deck.json", DECK)).unwrap();
    let outline = collapse(&extract(&tree));

    let text = format_outline(&outline, OutputFormat::Text).unwrap();
    assert_eq!(text, "1. Roadmap\n2. Plan (+1 merged)\n3. Launch");

    let json = format_outline(&outline, OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value[1]["mergedCount"], 2);
    assert_eq!(value[1]["mergedSegmentIds"][1], "b");
}
