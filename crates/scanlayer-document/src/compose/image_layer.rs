// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image layer — embed the scanned page so it covers the whole page.

use scanlayer_core::error::Result;
use scanlayer_core::{EmbedFormat, OutputFormat};
use tracing::debug;

use crate::image::ScanImage;
use crate::layout::PageGeometry;
use crate::pdf::traits::{BlendMode, DocumentWriter, with_alpha};

/// Opacity of the scan in debug mode, so the text beneath shows through.
const DEBUG_SCAN_ALPHA: f64 = 0.5;

/// A page image encoded for embedding, under its document-unique name.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub name: String,
    pub data: Vec<u8>,
    pub format: EmbedFormat,
}

impl EncodedImage {
    /// Encode `image` for page `page_no` (1-based) in the requested format.
    pub fn from_scan(page_no: usize, image: &ScanImage, requested: OutputFormat) -> Result<Self> {
        let format = requested.resolve(image.encoding());
        let data = image.encode(format)?;
        debug!(page_no, %format, bytes = data.len(), "Page image encoded");
        Ok(Self {
            name: format!("page-{page_no}"),
            data,
            format,
        })
    }
}

/// Register `image` and draw it over the page footprint.
pub fn compose_image<W>(
    writer: &mut W,
    geometry: &PageGeometry,
    image: &EncodedImage,
    debug: bool,
) -> Result<()>
where
    W: DocumentWriter + ?Sized,
{
    writer.register_image(&image.name, &image.data, image.format)?;
    let footprint = geometry.footprint();
    if debug {
        with_alpha(writer, DEBUG_SCAN_ALPHA, BlendMode::Normal, |w| {
            w.place_image(&image.name, &footprint)
        })
    } else {
        writer.place_image(&image.name, &footprint)
    }
}
