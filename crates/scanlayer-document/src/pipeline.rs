// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan-to-PDF pipeline — read each page image, prepare it, recognise its
// words, and add it to the document. Pages are processed strictly in order
// and the first failure aborts the run.

use std::io::Write;
use std::path::{Path, PathBuf};

use scanlayer_core::DocumentConfig;
use scanlayer_core::error::Result;
use tracing::{info, instrument};

use crate::compose::Document;
use crate::image::ScanImage;
use crate::pdf::traits::DocumentWriter;
use crate::scan::Recognizer;

const MM_PER_INCH: f64 = 25.4;

/// Pixel box an image should fit in for the configured `dpi`, or `None`
/// when downscaling is off.
///
/// The box is the base paper size at `dpi`, turned to match the image's
/// orientation.
pub fn dpi_target(config: &DocumentConfig, width: u32, height: u32) -> Option<(u32, u32)> {
    if config.dpi == 0 {
        return None;
    }
    let dots_per_mm = f64::from(config.dpi) / MM_PER_INCH;
    let (pw, ph) = config.paper_size.size_mm();
    let (short, long) = (pw.min(ph), pw.max(ph));
    let (tw, th) = if width > height {
        (long, short)
    } else {
        (short, long)
    };
    Some(((tw * dots_per_mm) as u32, (th * dots_per_mm) as u32))
}

/// Convert `inputs` into one document, written to `out`.
///
/// Returns the number of pages written. Errors from a page are tagged with
/// its 1-based number and input path.
#[instrument(skip_all, fields(pages = inputs.len(), debug = config.debug))]
pub fn run<R, W>(
    inputs: &[PathBuf],
    config: DocumentConfig,
    recognizer: &mut R,
    writer: W,
    out: &mut dyn Write,
) -> Result<usize>
where
    R: Recognizer + ?Sized,
    W: DocumentWriter,
{
    let mut document = Document::new(writer, config)?;

    for (index, path) in inputs.iter().enumerate() {
        let page_no = index + 1;
        process_page(&mut document, recognizer, page_no, path)
            .map_err(|err| err.in_page(page_no, path))?;
    }

    let pages = document.page_count();
    document.finish(out)?;
    info!(pages, "Conversion complete");
    Ok(pages)
}

#[instrument(skip(document, recognizer))]
fn process_page<R, W>(
    document: &mut Document<W>,
    recognizer: &mut R,
    page_no: usize,
    path: &Path,
) -> Result<()>
where
    R: Recognizer + ?Sized,
    W: DocumentWriter,
{
    let config = document.config();
    let mut image = ScanImage::open(path)?;

    if let Some((max_w, max_h)) = dpi_target(config, image.width(), image.height()) {
        image = image.scale_down(max_w, max_h);
    }
    let image = image.adjust_contrast(config.contrast);

    let words = recognizer.recognize(&image)?;
    info!(words = words.len(), "Words recognised");

    let geometry = document.add_page(&image, &words)?;
    info!(
        width = geometry.width,
        height = geometry.height,
        orientation = ?geometry.orientation,
        "Page added"
    );
    Ok(())
}
