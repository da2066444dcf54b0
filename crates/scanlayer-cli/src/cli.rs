// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line options and how they combine with an optional JSON config.

use std::path::PathBuf;

use clap::Parser;
use scanlayer_core::error::Result;
use scanlayer_core::{
    DocumentConfig, FontFamily, Orientation, OutputFormat, PaperSize, ScalingMode,
};

#[derive(Debug, Parser)]
#[command(name = "scanlayer")]
#[command(version)]
#[command(about = "Turn scanned page images into a searchable PDF", long_about = None)]
pub struct Cli {
    /// Page images, in page order. A single `.pdf` among them names the output.
    #[arg(value_name = "IMAGE", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output PDF (default: first input with a .pdf extension)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Overwrite the output file if it exists
    #[arg(short, long)]
    pub force: bool,

    /// JSON file with document settings; flags given here override it
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding text-detection.rten and text-recognition.rten
    #[arg(long, value_name = "DIR", env = "SCANLAYER_MODEL_DIR")]
    pub model_dir: Option<PathBuf>,

    // -- Page -----------------------------------------------------------------
    /// Base paper size: a3, a4, pa4, a5, c4, letter, legal, tabloid, or WxH in mm
    #[arg(short = 's', long = "size", alias = "paper-size", value_name = "SIZE")]
    pub paper_size: Option<PaperSize>,

    /// Page orientation: auto, portrait, landscape
    #[arg(short = 'r', long)]
    pub orientation: Option<Orientation>,

    /// How text is stretched onto word boxes: off, contain, match
    #[arg(long)]
    pub scaling: Option<ScalingMode>,

    /// Embedded image format: auto, jpg, png
    #[arg(long)]
    pub format: Option<OutputFormat>,

    /// Compress content streams (on by default; `--compress=false` turns it off)
    #[arg(
        short,
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub compress: Option<bool>,

    /// Leave content streams uncompressed
    #[arg(long, conflicts_with = "compress")]
    pub no_compress: bool,

    // -- Image ----------------------------------------------------------------
    /// Contrast boost before recognition, 0 (off) to 1
    #[arg(long, value_name = "AMOUNT")]
    pub contrast: Option<f32>,

    /// Shrink images to this resolution on the paper size (0 = keep)
    #[arg(long)]
    pub dpi: Option<u32>,

    // -- Font -----------------------------------------------------------------
    /// Text layer font: helvetica (arial), times, courier
    #[arg(long, value_name = "NAME")]
    pub font_name: Option<FontFamily>,

    /// Font style: B, I, or BI
    #[arg(long, value_name = "STYLE")]
    pub font_style: Option<String>,

    /// Font size in points
    #[arg(long, value_name = "PT")]
    pub font_size: Option<f64>,

    // -- Metadata -------------------------------------------------------------
    #[arg(short, long)]
    pub title: Option<String>,

    #[arg(short = 'j', long)]
    pub subject: Option<String>,

    #[arg(short, long)]
    pub author: Option<String>,

    /// Space-separated keywords
    #[arg(short, long)]
    pub keywords: Option<String>,

    #[arg(long)]
    pub creator: Option<String>,

    // -- Diagnostics ----------------------------------------------------------
    /// Log progress
    #[arg(short, long)]
    pub verbose: bool,

    /// Show the scan translucent over an outlined text layer, and log in detail
    #[arg(short, long)]
    pub debug: bool,
}

impl Cli {
    /// Build the document settings: the `--config` file (or defaults), then
    /// every flag that was given.
    pub fn document_config(&self) -> Result<DocumentConfig> {
        let base = match &self.config {
            Some(path) => DocumentConfig::load_json(path)?,
            None => DocumentConfig::default(),
        };
        let config = self.apply(base)?;
        config.validate()?;
        Ok(config)
    }

    fn apply(&self, mut config: DocumentConfig) -> Result<DocumentConfig> {
        if let Some(paper_size) = self.paper_size {
            config.paper_size = paper_size;
        }
        if let Some(orientation) = self.orientation {
            config.orientation = orientation;
        }
        if let Some(scaling) = self.scaling {
            config.scaling = scaling;
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        if let Some(compress) = self.compress {
            config.compress = compress;
        }
        if self.no_compress {
            config.compress = false;
        }
        if let Some(contrast) = self.contrast {
            config.contrast = contrast;
        }
        if let Some(dpi) = self.dpi {
            config.dpi = dpi;
        }
        if self.debug {
            config.debug = true;
        }

        if let Some(family) = self.font_name {
            config.font.family = family;
        }
        if let Some(style) = &self.font_style {
            config.font = config.font.with_style(style)?;
        }
        if let Some(size) = self.font_size {
            config.font.size_pt = size;
        }

        let metadata = &mut config.metadata;
        if let Some(title) = &self.title {
            metadata.title = Some(title.clone());
        }
        if let Some(subject) = &self.subject {
            metadata.subject = Some(subject.clone());
        }
        if let Some(author) = &self.author {
            metadata.author = Some(author.clone());
        }
        if let Some(keywords) = &self.keywords {
            metadata.set_keywords(keywords);
        }
        if let Some(creator) = &self.creator {
            metadata.creator = creator.clone();
        }
        Ok(config)
    }
}
