//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};

use slidepoint_ast::ContentNode;
use slidepoint_core::{
    load_tree, CollapsedSegment, DisplayMode, Engine, EngineConfig, Format, Position,
    Segment, SegmentAnnotator, SequentialIds, UuidGenerator,
};

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "slidepoint.toml";

/// Output format for listings
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for tool consumption
    Json,
}

/// Display mode argument
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    /// Show everything, no filtering
    View,
    /// Presenter view: everything, current highlighted
    Present,
    /// Audience view: filtered by format
    Follow,
}

impl From<ModeArg> for DisplayMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::View => DisplayMode::View,
            ModeArg::Present => DisplayMode::Present,
            ModeArg::Follow => DisplayMode::Follow,
        }
    }
}

/// Follow-mode format argument
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Single,
    Minimal,
    Block,
    Maximal,
    Scrolling,
}

impl From<FormatArg> for Format {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Single => Format::Single,
            FormatArg::Minimal => Format::Minimal,
            FormatArg::Block => Format::Block,
            FormatArg::Maximal => Format::Maximal,
            FormatArg::Scrolling => Format::Scrolling,
        }
    }
}

#[derive(Parser)]
#[command(name = "slidepoint")]
#[command(author, version, about = "Presentation points for collaborative documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the presentation points of a document
    Segments {
        /// Input document (editor JSON)
        input: PathBuf,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show the presenter outline with merge groups folded
    Outline {
        /// Input document (editor JSON)
        input: PathBuf,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Render the document as HTML for a position
    Render {
        /// Input document (editor JSON)
        input: PathBuf,

        /// Current segment id
        #[arg(long)]
        at: Option<String>,

        /// Current segment by raw index (clamped)
        #[arg(long, conflicts_with = "at")]
        index: Option<usize>,

        /// Display mode (defaults to the configured one)
        #[arg(short, long, value_enum)]
        mode: Option<ModeArg>,

        /// Follow-mode format (defaults to the configured one)
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,

        /// Output HTML file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Reconcile segment ids and write the annotated document
    Annotate {
        /// Input document (editor JSON)
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long, conflicts_with = "in_place")]
        output: Option<PathBuf>,

        /// Rewrite the input file
        #[arg(long)]
        in_place: bool,

        /// Deterministic ids `{prefix}-{n}` instead of UUIDs
        #[arg(long, value_name = "PREFIX")]
        sequential: Option<String>,
    },
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and dispatches to the appropriate command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Segments {
            input,
            format,
            config,
        } => {
            segments_command(&input, format, config.as_deref())?;
        }
        Commands::Outline {
            input,
            format,
            config,
        } => {
            outline_command(&input, format, config.as_deref())?;
        }
        Commands::Render {
            input,
            at,
            index,
            mode,
            format,
            output,
            config,
        } => {
            let position = match (at, index) {
                (Some(id), _) => Position::Id(id),
                (None, Some(index)) => Position::Index(index),
                (None, None) => Position::Start,
            };
            render_command(
                &input,
                position,
                mode.map(Into::into),
                format.map(Into::into),
                output.as_deref(),
                config.as_deref(),
            )?;
        }
        Commands::Annotate {
            input,
            output,
            in_place,
            sequential,
        } => {
            let output = if in_place { Some(input.clone()) } else { output };
            annotate_command(&input, output.as_deref(), sequential.as_deref())?;
        }
    }

    Ok(())
}

/// Load the engine configuration.
///
/// An explicit path must exist; otherwise `slidepoint.toml` in the working
/// directory is used when present, then the built-in defaults.
pub fn load_config(config: Option<&Path>) -> Result<EngineConfig> {
    let path = match config {
        Some(path) => path,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => Path::new(DEFAULT_CONFIG_FILE),
        None => return Ok(EngineConfig::default()),
    };
    debug!(path = %path.display(), "loading config");
    EngineConfig::from_file(path)
        .with_context(|| format!("Failed to load config: {}", path.display()))
}

fn read_tree(input: &Path) -> Result<ContentNode> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }
    load_tree(input).with_context(|| format!("Failed to read document: {}", input.display()))
}

fn engine_for(config: Option<&Path>) -> Result<Engine> {
    let config = load_config(config)?;
    Engine::new(config).context("Invalid engine configuration")
}

fn write_output(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content)
                .with_context(|| format!("Failed to write output: {}", path.display()))?;
            info!(path = %path.display(), "written");
        }
        None => println!("{}", content),
    }
    Ok(())
}

/// Execute the segments command
pub fn segments_command(input: &Path, format: OutputFormat, config: Option<&Path>) -> Result<()> {
    let tree = read_tree(input)?;
    let mut engine = engine_for(config)?;
    let segments = engine.segments(0, &tree);
    info!(count = segments.len(), "extracted segments");
    println!("{}", format_segments(segments, format)?);
    Ok(())
}

/// Execute the outline command
pub fn outline_command(input: &Path, format: OutputFormat, config: Option<&Path>) -> Result<()> {
    let tree = read_tree(input)?;
    let mut engine = engine_for(config)?;
    let outline = engine.outline(0, &tree);
    info!(entries = outline.len(), "built outline");
    println!("{}", format_outline(&outline, format)?);
    Ok(())
}

/// Execute the render command
pub fn render_command(
    input: &Path,
    position: Position,
    mode: Option<DisplayMode>,
    format: Option<Format>,
    output: Option<&Path>,
    config: Option<&Path>,
) -> Result<()> {
    let tree = read_tree(input)?;
    let mut engine = engine_for(config)?;

    let mut request = engine.request_at(position);
    if let Some(mode) = mode {
        request.mode = mode;
    }
    if let Some(format) = format {
        request.format = format;
    }

    let view = engine.view(0, &tree, &request);
    info!(
        current = view.visibility.current_id.as_deref().unwrap_or("-"),
        mode = %request.mode,
        format = %request.format,
        "rendered"
    );
    write_output(output, &view.to_html())
}

/// Execute the annotate command
pub fn annotate_command(input: &Path, output: Option<&Path>, sequential: Option<&str>) -> Result<()> {
    let mut tree = read_tree(input)?;

    let report = match sequential {
        Some(prefix) => {
            SegmentAnnotator::with_generator(SequentialIds::new(prefix)).reconcile(&mut tree)
        }
        None => SegmentAnnotator::with_generator(UuidGenerator).reconcile(&mut tree),
    };
    info!(
        assigned = report.assigned,
        regenerated = report.regenerated,
        cleared = report.cleared,
        stripped = report.stripped,
        dissolved = report.dissolved_groups,
        "annotated"
    );

    let json = serde_json::to_string_pretty(&tree).context("Failed to serialize document")?;
    write_output(output, &json)
}

/// Format a segment listing
pub fn format_segments(segments: &[Segment], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(segments).context("Failed to serialize segments to JSON")
        }
        OutputFormat::Text => {
            let mut out = String::new();
            for seg in segments {
                let _ = write!(
                    out,
                    "{:>3}  slide {:<2} {:<10} {:<24} {}",
                    seg.index,
                    seg.slide_index,
                    seg.segment_type.display_name(),
                    seg.id,
                    seg.label
                );
                if let Some(group) = &seg.merge_group_id {
                    let _ = write!(out, "  [{}]", group);
                }
                out.push('\n');
            }
            Ok(out.trim_end().to_string())
        }
    }
}

/// Format the presenter outline
pub fn format_outline(outline: &[CollapsedSegment], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(outline).context("Failed to serialize outline to JSON")
        }
        OutputFormat::Text => {
            let mut out = String::new();
            for entry in outline {
                let _ = write!(out, "{}. {}", entry.segment.index + 1, entry.segment.label);
                if let Some(count) = entry.merged_count {
                    let _ = write!(out, " (+{} merged)", count - 1);
                }
                out.push('\n');
            }
            Ok(out.trim_end().to_string())
        }
    }
}
