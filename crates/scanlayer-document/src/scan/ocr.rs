// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OCR (Optical Character Recognition) module for Scanlayer.
//
// Recognises positioned words in scanned page images using the `ocrs` crate,
// a pure-Rust OCR engine backed by neural network models executed via `rten`.
//
// # Feature Gate
//
// This module is only available when the `ocr` feature is enabled:
//
// ```toml
// scanlayer-document = { path = "crates/scanlayer-document", features = ["ocr"] }
// ```
//
// # Model Setup
//
// The OCR engine requires two model files:
//
// - **Detection model** (`text-detection.rten`) — locates words in the image.
// - **Recognition model** (`text-recognition.rten`) — decodes characters from
//   detected lines.
//
// Both are downloaded to `$XDG_CACHE_HOME/ocrs` (typically `~/.cache/ocrs`)
// the first time `ocrs-cli` runs.

use std::path::{Path, PathBuf};

use ocrs::{ImageSource, OcrEngine as OcrsEngine, OcrEngineParams, TextItem};
use rten::Model;
use scanlayer_core::error::{Result, ScanLayerError};
use tracing::{debug, info, instrument};

use super::Recognizer;
use crate::image::ScanImage;
use crate::layout::Word;

/// Default directory for cached OCR model files.
///
/// Follows the XDG Base Directory specification: `$XDG_CACHE_HOME/ocrs`, falling
/// back to `~/.cache/ocrs` when `XDG_CACHE_HOME` is unset.
fn default_model_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
        PathBuf::from(xdg).join("ocrs")
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".cache").join("ocrs")
    } else {
        PathBuf::from("ocrs-models")
    }
}

/// Well-known filenames for the detection and recognition models.
const DETECTION_MODEL_FILENAME: &str = "text-detection.rten";
const RECOGNITION_MODEL_FILENAME: &str = "text-recognition.rten";

/// Where to find the model files for an [`OcrEngine`].
#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Path to the text-detection model file (`.rten`).
    pub detection_model_path: PathBuf,
    /// Path to the text-recognition model file (`.rten`).
    pub recognition_model_path: PathBuf,
}

impl Default for OcrConfig {
    /// Returns a config pointing at the default model cache directory.
    fn default() -> Self {
        Self::from_dir(default_model_dir())
    }
}

impl OcrConfig {
    /// Create a config for a directory holding both model files.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            detection_model_path: dir.join(DETECTION_MODEL_FILENAME),
            recognition_model_path: dir.join(RECOGNITION_MODEL_FILENAME),
        }
    }

    /// Verify that both model files exist.
    pub fn validate(&self) -> Result<()> {
        for (kind, path) in [
            ("detection", &self.detection_model_path),
            ("recognition", &self.recognition_model_path),
        ] {
            if !path.exists() {
                return Err(ScanLayerError::EngineInit(format!(
                    "{kind} model not found at {}; run `ocrs-cli` once to download models",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

/// Scanlayer OCR engine.
///
/// Model loading is the expensive step, so one engine is built per run and
/// reused for every page. Dropping the engine releases the models.
pub struct OcrEngine {
    engine: OcrsEngine,
}

impl OcrEngine {
    /// Load the detection and recognition models named by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ScanLayerError::EngineInit`] if model files are missing or
    /// corrupt.
    #[instrument(skip_all, fields(
        detection = %config.detection_model_path.display(),
        recognition = %config.recognition_model_path.display(),
    ))]
    pub fn new(config: &OcrConfig) -> Result<Self> {
        config.validate()?;

        info!("Loading OCR detection model");
        let detection_model = load_model(&config.detection_model_path, "detection")?;

        info!("Loading OCR recognition model");
        let recognition_model = load_model(&config.recognition_model_path, "recognition")?;

        let engine = OcrsEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            ..Default::default()
        })
        .map_err(|err| ScanLayerError::EngineInit(format!("failed to initialise engine: {err}")))?;

        info!("OCR engine initialised");
        Ok(Self { engine })
    }

    /// Create an engine using the default model cache directory.
    pub fn with_defaults() -> Result<Self> {
        Self::new(&OcrConfig::default())
    }
}

impl Recognizer for OcrEngine {
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    fn recognize(&mut self, image: &ScanImage) -> Result<Vec<Word>> {
        let rgb = image.as_dynamic().to_rgb8();
        let (width, height) = rgb.dimensions();

        let source = ImageSource::from_bytes(rgb.as_raw(), (width, height)).map_err(|err| {
            ScanLayerError::Recognition(format!(
                "failed to create image source ({width}x{height}): {err}"
            ))
        })?;
        let input = self
            .engine
            .prepare_input(source)
            .map_err(|err| ScanLayerError::Recognition(format!("preprocessing failed: {err}")))?;

        let word_rects = self
            .engine
            .detect_words(&input)
            .map_err(|err| ScanLayerError::Recognition(format!("word detection failed: {err}")))?;
        debug!(word_count = word_rects.len(), "Words detected");

        let line_rects = self.engine.find_text_lines(&input, &word_rects);
        debug!(line_count = line_rects.len(), "Text lines found");

        let lines = self
            .engine
            .recognize_text(&input, &line_rects)
            .map_err(|err| ScanLayerError::Recognition(format!("line recognition failed: {err}")))?;

        let mut words = Vec::new();
        for line in lines.iter().flatten() {
            for word in line.words() {
                let text = word.to_string();
                if text.trim().is_empty() {
                    continue;
                }
                let rect = word.bounding_rect();
                words.push(Word::new(
                    text,
                    rect.left() as i32,
                    rect.top() as i32,
                    rect.right() as i32,
                    rect.bottom() as i32,
                ));
            }
        }

        info!(words = words.len(), "Recognition complete");
        Ok(words)
    }
}

fn load_model(path: &Path, kind: &str) -> Result<Model> {
    Model::load_file(path).map_err(|err| {
        ScanLayerError::EngineInit(format!(
            "failed to load {kind} model from {}: {err}",
            path.display()
        ))
    })
}

/// Return the default model directory path (for diagnostics).
pub fn model_directory() -> PathBuf {
    default_model_dir()
}
