// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document configuration.
//
// Built once per run (from defaults, an optional JSON file, and command-line
// overrides) and then passed by reference to every stage of the pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanLayerError};
use crate::types::{FontSpec, Orientation, OutputFormat, PaperSize, ScalingMode};

/// Descriptive metadata written to the PDF /Info dictionary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub subject: Option<String>,
    pub author: Option<String>,
    pub keywords: Vec<String>,
    pub creator: String,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        Self {
            title: None,
            subject: None,
            author: None,
            keywords: Vec::new(),
            creator: "scanlayer".into(),
        }
    }
}

impl DocumentMetadata {
    /// Split a space-separated keyword string into individual keywords.
    pub fn set_keywords(&mut self, keywords: &str) {
        self.keywords = keywords.split_whitespace().map(str::to_owned).collect();
    }
}

/// Settings for one document build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Base page size; the final page is shrunk to the image's aspect ratio.
    pub paper_size: PaperSize,
    pub orientation: Orientation,
    pub scaling: ScalingMode,
    /// Embedding format for page images.
    pub format: OutputFormat,
    pub font: FontSpec,
    /// Draw the scan translucent beneath an outlined text layer.
    pub debug: bool,
    /// Compress content streams in the output file.
    pub compress: bool,
    /// Contrast enhancement applied before recognition, `0.0..=1.0`.
    pub contrast: f32,
    /// Downscale images to this resolution on the base page (0 disables).
    pub dpi: u32,
    pub metadata: DocumentMetadata,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            orientation: Orientation::Auto,
            scaling: ScalingMode::Match,
            format: OutputFormat::Auto,
            font: FontSpec::default(),
            debug: false,
            compress: true,
            contrast: 0.5,
            dpi: 0,
            metadata: DocumentMetadata::default(),
        }
    }
}

impl DocumentConfig {
    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no stage could act on.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.contrast) {
            return Err(ScanLayerError::Configuration(format!(
                "contrast must be between 0 and 1, got {}",
                self.contrast
            )));
        }
        if !(self.font.size_pt.is_finite() && self.font.size_pt > 0.0) {
            return Err(ScanLayerError::Configuration(format!(
                "font size must be positive, got {}",
                self.font.size_pt
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = DocumentConfig::default();
        config.validate().unwrap();
        assert_eq!(config.scaling, ScalingMode::Match);
        assert_eq!(config.orientation, Orientation::Auto);
        assert!(!config.debug);
        assert_eq!(config.metadata.creator, "scanlayer");
    }

    #[test]
    fn contrast_out_of_range_rejected() {
        let config = DocumentConfig {
            contrast: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ScanLayerError::Configuration(_))
        ));
    }

    #[test]
    fn keywords_split_on_whitespace() {
        let mut meta = DocumentMetadata::default();
        meta.set_keywords("  invoice  2024 tax ");
        assert_eq!(meta.keywords, vec!["invoice", "2024", "tax"]);
    }

    #[test]
    fn partial_json_file_fills_in_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "paper_size": "letter", "scaling": "contain", "debug": true }}"#
        )
        .unwrap();

        let config = DocumentConfig::load_json(file.path()).unwrap();
        assert_eq!(config.paper_size, PaperSize::Letter);
        assert_eq!(config.scaling, ScalingMode::Contain);
        assert!(config.debug);
        assert_eq!(config.format, OutputFormat::Auto);
        assert!(config.compress);
    }

    #[test]
    fn json_with_unknown_token_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "orientation": "diagonal" }}"#).unwrap();
        assert!(matches!(
            DocumentConfig::load_json(file.path()),
            Err(ScanLayerError::Serialization(_))
        ));
    }
}
