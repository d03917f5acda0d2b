//! Engine configuration
//!
//! Settings are loaded from a `slidepoint.toml`:
//!
//! ```toml
//! [segments]
//! split_sentences = true
//! sentence_threshold = 100
//! label_max_len = 50
//! abbreviations = ["Mr", "Mrs", "Dr"]
//!
//! [view]
//! mode = "follow"
//! format = "block"
//! ```
//!
//! Every field is optional; missing values fall back to the defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SlidepointError};
use crate::planner::{DisplayMode, Format};

/// Default minimum paragraph length (in characters) before sentence splitting
pub const DEFAULT_SENTENCE_THRESHOLD: usize = 100;

/// Default maximum label length, ellipsis included
pub const DEFAULT_LABEL_MAX_LEN: usize = 50;

/// Abbreviations whose trailing period never ends a sentence
pub const DEFAULT_ABBREVIATIONS: &[&str] = &[
    "Mr", "Mrs", "Ms", "Dr", "Prof", "Sr", "Jr", "vs", "etc", "e.g", "i.e",
];

/// Top-level engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Segment extraction settings
    pub segments: SegmentSettings,
    /// Default view settings
    pub view: ViewSettings,
}

impl EngineConfig {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load settings from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SlidepointError::config_not_found(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.segments.label_max_len < 2 {
            return Err(SlidepointError::invalid_config(format!(
                "segments.label_max_len must be at least 2, got {}",
                self.segments.label_max_len
            )));
        }
        if let Some(abbr) = self
            .segments
            .abbreviations
            .iter()
            .find(|abbr| abbr.trim().is_empty())
        {
            return Err(SlidepointError::invalid_config(format!(
                "segments.abbreviations contains a blank entry: {:?}",
                abbr
            )));
        }
        Ok(())
    }
}

/// Segment extraction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentSettings {
    /// Split long paragraphs into sentence segments
    pub split_sentences: bool,
    /// Paragraphs must be strictly longer than this to be split
    pub sentence_threshold: usize,
    /// Maximum label length, ellipsis included
    pub label_max_len: usize,
    /// Abbreviations protected from sentence splitting
    pub abbreviations: Vec<String>,
}

impl Default for SegmentSettings {
    fn default() -> Self {
        Self {
            split_sentences: true,
            sentence_threshold: DEFAULT_SENTENCE_THRESHOLD,
            label_max_len: DEFAULT_LABEL_MAX_LEN,
            abbreviations: DEFAULT_ABBREVIATIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Default display settings for a view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ViewSettings {
    /// Display mode
    pub mode: DisplayMode,
    /// Format used when following
    pub format: Format,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let config = EngineConfig::default();
        assert!(config.segments.split_sentences);
        assert_eq!(config.segments.sentence_threshold, 100);
        assert_eq!(config.segments.label_max_len, 50);
        assert_eq!(config.segments.abbreviations.len(), 11);
        assert_eq!(config.view.mode, DisplayMode::Follow);
        assert_eq!(config.view.format, Format::Scrolling);
    }

    #[test]
    fn test_load_config_from_toml() {
        let toml = r#"
[segments]
split_sentences = false
sentence_threshold = 80

[view]
mode = "present"
format = "block"
"#;
        let config = EngineConfig::from_toml_str(toml).unwrap();
        assert!(!config.segments.split_sentences);
        assert_eq!(config.segments.sentence_threshold, 80);
        // Missing field uses default
        assert_eq!(config.segments.label_max_len, 50);
        assert_eq!(config.view.mode, DisplayMode::Present);
        assert_eq!(config.view.format, Format::Block);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let toml = r#"
[view]
format = "carousel"
"#;
        let err = EngineConfig::from_toml_str(toml).unwrap_err();
        assert_eq!(err.code(), "SP006");
    }

    #[test]
    fn test_label_len_validation() {
        let toml = r#"
[segments]
label_max_len = 1
"#;
        let err = EngineConfig::from_toml_str(toml).unwrap_err();
        assert_eq!(err.code(), "SP002");
    }

    #[test]
    fn test_blank_abbreviation_is_rejected() {
        let toml = r#"
[segments]
abbreviations = ["Dr", " "]
"#;
        assert!(EngineConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slidepoint.toml");
        std::fs::write(&path, "[segments]\nlabel_max_len = 30\n").unwrap();

        let config = EngineConfig::from_file(&path).unwrap();
        assert_eq!(config.segments.label_max_len, 30);

        let missing = EngineConfig::from_file(dir.path().join("missing.toml")).unwrap_err();
        assert_eq!(missing.code(), "SP001");
    }
}
