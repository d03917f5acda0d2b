//! Inline text content
//!
//! Text inside the content tree is stored as runs: a piece of text plus the
//! set of marks (bold, italic, links, ...) active over it.

/// Inline formatting mark
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Mark {
    /// Bold text
    Bold,
    /// Italic text
    Italic,
    /// Underlined text
    Underline,
    /// Struck-through text
    Strike,
    /// Inline code
    Code,
    /// Hyperlink
    Link { href: String },
    /// A mark this crate does not know about, kept by name
    Other(String),
}

impl Mark {
    /// Resolve a mark from its editor name
    pub fn from_name(name: &str, href: Option<&str>) -> Self {
        match name {
            "bold" | "strong" => Mark::Bold,
            "italic" | "em" => Mark::Italic,
            "underline" => Mark::Underline,
            "strike" | "strikethrough" => Mark::Strike,
            "code" => Mark::Code,
            "link" => Mark::Link {
                href: href.unwrap_or_default().to_string(),
            },
            other => Mark::Other(other.to_string()),
        }
    }

    /// Editor name of the mark
    pub fn name(&self) -> &str {
        match self {
            Mark::Bold => "bold",
            Mark::Italic => "italic",
            Mark::Underline => "underline",
            Mark::Strike => "strike",
            Mark::Code => "code",
            Mark::Link { .. } => "link",
            Mark::Other(name) => name,
        }
    }
}

/// A run of text sharing one set of marks
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextRun {
    /// The text content
    pub text: String,
    /// Marks active over the whole run
    pub marks: Vec<Mark>,
}

impl TextRun {
    /// Create an unformatted run
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marks: Vec::new(),
        }
    }

    /// Create a run with marks
    pub fn marked(text: impl Into<String>, marks: Vec<Mark>) -> Self {
        Self {
            text: text.into(),
            marks,
        }
    }
}

/// A text node: consecutive runs between two non-text siblings
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextNode {
    pub runs: Vec<TextRun>,
}

impl TextNode {
    /// Create a text node with a single plain run
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            runs: vec![TextRun::plain(text)],
        }
    }

    /// Concatenated text of all runs
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_names_roundtrip() {
        for name in ["bold", "italic", "underline", "strike", "code"] {
            assert_eq!(Mark::from_name(name, None).name(), name);
        }
    }

    #[test]
    fn test_link_keeps_href() {
        let mark = Mark::from_name("link", Some("https://example.com"));
        assert_eq!(
            mark,
            Mark::Link {
                href: "https://example.com".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_mark_is_preserved() {
        let mark = Mark::from_name("highlight", None);
        assert_eq!(mark, Mark::Other("highlight".to_string()));
        assert_eq!(mark.name(), "highlight");
    }

    #[test]
    fn test_text_node_concatenates_runs() {
        let node = TextNode {
            runs: vec![
                TextRun::plain("Hello "),
                TextRun::marked("world", vec![Mark::Bold]),
            ],
        };
        assert_eq!(node.text(), "Hello world");
    }
}
