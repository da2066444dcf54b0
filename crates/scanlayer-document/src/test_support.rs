// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Test doubles shared by the unit tests in this crate.

use std::io::Write;

use image::{DynamicImage, GrayImage, Luma};
use scanlayer_core::error::{Result, ScanLayerError};
use scanlayer_core::{DocumentMetadata, EmbedFormat, FontSpec, ImageEncoding, PageOrientation};

use crate::image::ScanImage;
use crate::layout::{PageBox, Word};
use crate::pdf::traits::{BlendMode, DocumentWriter, LayerId, RgbColor};
use crate::scan::Recognizer;

/// One call made against a `RecordingWriter`.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    BeginPage {
        width: f64,
        height: f64,
        orientation: PageOrientation,
    },
    BeginLayer(LayerId),
    EndLayer(LayerId),
    SaveState,
    RestoreState,
    Scale {
        sx: f64,
        sy: f64,
        x: f64,
        y: f64,
    },
    Alpha {
        alpha: f64,
        blend: BlendMode,
    },
    StrokeColor(RgbColor),
    FillColor(RgbColor),
    StrokeRect(PageBox),
    FillRect(PageBox),
    Text {
        x: f64,
        y: f64,
        height: f64,
        text: String,
    },
    RegisterImage {
        name: String,
        format: EmbedFormat,
    },
    PlaceImage {
        name: String,
        rect: PageBox,
    },
}

/// A `DocumentWriter` that records every call instead of producing output.
#[derive(Debug, Default)]
pub struct RecordingWriter {
    pub calls: Vec<Call>,
    pub layers: Vec<String>,
    pub font: Option<FontSpec>,
    pub metadata: Option<DocumentMetadata>,
    pub compression: Option<bool>,
    /// Fail `text_cell` for this exact text.
    pub fail_on_text: Option<String>,
    images: Vec<String>,
    depth: usize,
    page_open: bool,
}

impl RecordingWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A writer with one A4 page already open.
    pub fn with_page() -> Self {
        let mut writer = Self::new();
        writer
            .begin_page(210.0, 297.0, PageOrientation::Portrait)
            .unwrap();
        writer.calls.clear();
        writer
    }

    /// Calls made since the most recent `begin_page`.
    pub fn drawing_calls(&self) -> &[Call] {
        let start = self
            .calls
            .iter()
            .rposition(|c| matches!(c, Call::BeginPage { .. }))
            .map_or(0, |i| i + 1);
        &self.calls[start..]
    }

    /// Layers in the order they were opened, across all pages.
    pub fn layer_sequence(&self) -> Vec<LayerId> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::BeginLayer(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn page_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::BeginPage { .. }))
            .count()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Current save/restore nesting depth.
    pub fn state_depth(&self) -> usize {
        self.depth
    }

    fn draw(&mut self, call: Call) -> Result<()> {
        if !self.page_open {
            return Err(ScanLayerError::Composition("no page is open".into()));
        }
        self.calls.push(call);
        Ok(())
    }
}

impl DocumentWriter for RecordingWriter {
    fn set_font(&mut self, font: &FontSpec) {
        self.font = Some(*font);
    }

    fn set_metadata(&mut self, metadata: &DocumentMetadata) {
        self.metadata = Some(metadata.clone());
    }

    fn set_compression(&mut self, enabled: bool) {
        self.compression = Some(enabled);
    }

    fn add_layer(&mut self, name: &str) -> LayerId {
        self.layers.push(name.to_owned());
        LayerId(self.layers.len() - 1)
    }

    fn begin_page(
        &mut self,
        width: f64,
        height: f64,
        orientation: PageOrientation,
    ) -> Result<()> {
        self.page_open = true;
        self.calls.push(Call::BeginPage {
            width,
            height,
            orientation,
        });
        Ok(())
    }

    fn begin_layer(&mut self, layer: LayerId) -> Result<()> {
        self.draw(Call::BeginLayer(layer))
    }

    fn end_layer(&mut self, layer: LayerId) -> Result<()> {
        self.draw(Call::EndLayer(layer))
    }

    fn save_state(&mut self) -> Result<()> {
        self.draw(Call::SaveState)?;
        self.depth += 1;
        Ok(())
    }

    fn restore_state(&mut self) -> Result<()> {
        self.draw(Call::RestoreState)?;
        self.depth = self.depth.saturating_sub(1);
        Ok(())
    }

    fn scale_about(&mut self, sx: f64, sy: f64, x: f64, y: f64) -> Result<()> {
        self.draw(Call::Scale { sx, sy, x, y })
    }

    fn set_alpha(&mut self, alpha: f64, blend: BlendMode) -> Result<()> {
        self.draw(Call::Alpha { alpha, blend })
    }

    fn set_stroke_color(&mut self, color: RgbColor) -> Result<()> {
        self.draw(Call::StrokeColor(color))
    }

    fn set_fill_color(&mut self, color: RgbColor) -> Result<()> {
        self.draw(Call::FillColor(color))
    }

    fn stroke_rect(&mut self, rect: &PageBox) -> Result<()> {
        self.draw(Call::StrokeRect(*rect))
    }

    fn fill_rect(&mut self, rect: &PageBox) -> Result<()> {
        self.draw(Call::FillRect(*rect))
    }

    fn text_cell(&mut self, x: f64, y: f64, height: f64, text: &str) -> Result<()> {
        if self.fail_on_text.as_deref() == Some(text) {
            return Err(ScanLayerError::Composition(format!("cannot draw '{text}'")));
        }
        self.draw(Call::Text {
            x,
            y,
            height,
            text: text.to_owned(),
        })
    }

    fn register_image(&mut self, name: &str, data: &[u8], format: EmbedFormat) -> Result<()> {
        if data.is_empty() {
            return Err(ScanLayerError::Composition(format!("image '{name}' is empty")));
        }
        if self.images.iter().any(|n| n == name) {
            return Err(ScanLayerError::Composition(format!(
                "image '{name}' registered twice"
            )));
        }
        self.images.push(name.to_owned());
        self.draw(Call::RegisterImage {
            name: name.to_owned(),
            format,
        })
    }

    fn place_image(&mut self, name: &str, rect: &PageBox) -> Result<()> {
        if !self.images.iter().any(|n| n == name) {
            return Err(ScanLayerError::Composition(format!(
                "image '{name}' was never registered"
            )));
        }
        self.draw(Call::PlaceImage {
            name: name.to_owned(),
            rect: *rect,
        })
    }

    fn finish(self, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "recorded {} calls", self.calls.len())?;
        Ok(())
    }
}

/// A recogniser that returns the same words for every page.
pub struct FixedRecognizer {
    pub words: Vec<Word>,
    pub calls: usize,
}

impl FixedRecognizer {
    pub fn new(words: Vec<Word>) -> Self {
        Self { words, calls: 0 }
    }
}

impl Recognizer for FixedRecognizer {
    fn recognize(&mut self, _image: &ScanImage) -> Result<Vec<Word>> {
        self.calls += 1;
        Ok(self.words.clone())
    }
}

/// A small grey test image with a darker band across the middle.
pub fn sample_image(width: u32, height: u32, encoding: ImageEncoding) -> ScanImage {
    let img = GrayImage::from_fn(width, height, |_, y| {
        if y > height / 3 && y < 2 * height / 3 {
            Luma([40u8])
        } else {
            Luma([220u8])
        }
    });
    ScanImage::from_dynamic(DynamicImage::ImageLuma8(img), encoding)
}
