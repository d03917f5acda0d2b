//! Segment labels

use crate::config::DEFAULT_LABEL_MAX_LEN;
use crate::segment::SegmentType;

/// Marker appended to truncated labels
pub const ELLIPSIS: char = '…';

/// Collapse every whitespace run to a single space and trim
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Build a display label with the default maximum length
pub fn create_label(text: &str, segment_type: SegmentType) -> String {
    create_label_with_max(text, segment_type, DEFAULT_LABEL_MAX_LEN)
}

/// Build a display label of at most `max_len` characters.
///
/// Whitespace is collapsed first. Longer labels keep their first
/// `max_len - 1` characters (trailing space trimmed) followed by an ellipsis.
/// Blank text falls back to the segment type's name.
pub fn create_label_with_max(text: &str, segment_type: SegmentType, max_len: usize) -> String {
    let collapsed = collapse_whitespace(text);
    if collapsed.is_empty() {
        return segment_type.display_name().to_string();
    }
    if collapsed.chars().count() <= max_len {
        return collapsed;
    }

    let keep = max_len.saturating_sub(1);
    let mut label: String = collapsed.chars().take(keep).collect();
    label.truncate(label.trim_end().len());
    label.push(ELLIPSIS);
    label
}
