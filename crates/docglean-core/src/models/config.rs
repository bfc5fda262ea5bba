//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

use crate::error::DocgleanError;
use crate::fields::FieldRule;

/// Main configuration for the docglean pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocgleanConfig {
    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Field rule override. When present, these rules replace the built-in
    /// set entirely; `None` means use the defaults.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldRule>>,
}

impl Default for DocgleanConfig {
    fn default() -> Self {
        Self {
            pdf: PdfConfig::default(),
            extraction: ExtractionConfig::default(),
            fields: None,
        }
    }
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Maximum pages to feed into matching (0 = unlimited).
    pub max_pages: usize,

    /// Minimum text length to consider the PDF as having a text layer.
    /// Shorter extractions are processed anyway but flagged to the user.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_pages: 0,
            min_text_length: 50,
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Enable the label-proximity pass.
    pub label_pass: bool,

    /// Enable the whole-document fallback pass.
    pub fallback_pass: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            label_pass: true,
            fallback_pass: true,
        }
    }
}

impl DocgleanConfig {
    /// Load configuration from a JSON file. A file that does not parse as
    /// configuration is a [`DocgleanError::Config`], distinct from I/O
    /// failures reading it.
    pub fn from_file(path: &std::path::Path) -> Result<Self, DocgleanError> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| DocgleanError::Config(e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), DocgleanError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| DocgleanError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config_round_trips() {
        let config = DocgleanConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: DocgleanConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.pdf.min_text_length, config.pdf.min_text_length);
        assert!(parsed.extraction.label_pass);
        assert!(parsed.extraction.fallback_pass);
        assert!(parsed.fields.is_none());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: DocgleanConfig =
            serde_json::from_str(r#"{"extraction": {"fallback_pass": false}}"#).unwrap();

        assert!(parsed.extraction.label_pass);
        assert!(!parsed.extraction.fallback_pass);
        assert_eq!(parsed.pdf.min_text_length, 50);
        assert_eq!(parsed.pdf.max_pages, 0);
    }

    #[test]
    fn test_malformed_config_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docglean.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            DocgleanConfig::from_file(&path),
            Err(DocgleanError::Config(_))
        ));
    }

    #[test]
    fn test_missing_config_file_is_an_io_error() {
        let path = std::path::Path::new("no-such-docglean-config.json");

        assert!(matches!(
            DocgleanConfig::from_file(path),
            Err(DocgleanError::Io(_))
        ));
    }
}
