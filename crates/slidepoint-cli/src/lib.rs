//! slidepoint CLI - Command-line interface library
//!
//! This library provides the CLI functionality for slidepoint:
//! - Segments: list the presentation points of a document
//! - Outline: presenter outline with merge groups folded
//! - Render: HTML for a position, display mode and format
//! - Annotate: reconcile segment ids on a document
//!
//! # Binary Usage
//!
//! ```bash
//! # List presentation points
//! slidepoint segments deck.json --format json
//!
//! # Render what the audience sees on the third point
//! slidepoint render deck.json --index 2 --mode follow --format block
//!
//! # Give every non-empty block a stable id
//! slidepoint annotate deck.json --in-place
//! ```

pub mod app;

// Re-export main entry point and types
pub use app::{
    annotate_command, format_outline, format_segments, load_config, outline_command,
    render_command, segments_command,
};
pub use app::{run_cli, FormatArg, ModeArg, OutputFormat, DEFAULT_CONFIG_FILE};
