// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page assembly — resolve a page's geometry once, then draw the text and scan
// layers in the order the visibility mode calls for.

use scanlayer_core::DocumentConfig;
use scanlayer_core::error::Result;
use tracing::{debug, instrument};

use super::image_layer::{EncodedImage, compose_image};
use super::text_layer::TextCompositor;
use crate::image::ScanImage;
use crate::layout::{FontMetrics, PageGeometry, Word};
use crate::pdf::traits::{DocumentWriter, LayerId, with_layer};

/// Name of the layer holding the recognised text.
pub const TEXT_LAYER: &str = "text";
/// Name of the layer holding the scanned image.
pub const SCAN_LAYER: &str = "scan";

/// The two layers every page draws into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayers {
    pub text: LayerId,
    pub scan: LayerId,
}

impl PageLayers {
    /// Declare both layers on `writer`.
    pub fn declare<W>(writer: &mut W) -> Self
    where
        W: DocumentWriter + ?Sized,
    {
        Self {
            text: writer.add_layer(TEXT_LAYER),
            scan: writer.add_layer(SCAN_LAYER),
        }
    }
}

/// Lays out single pages for a document.
///
/// In production the text goes down first and the opaque scan covers it, so
/// the page looks like the scan while the text stays selectable. Debug mode
/// reverses the order and makes the scan translucent.
#[derive(Debug, Clone)]
pub struct PageAssembler {
    layers: PageLayers,
    metrics: FontMetrics,
}

impl PageAssembler {
    pub fn new(layers: PageLayers, config: &DocumentConfig) -> Self {
        Self {
            layers,
            metrics: FontMetrics::new(&config.font),
        }
    }

    pub fn layers(&self) -> PageLayers {
        self.layers
    }

    /// Add page `page_no` (1-based) showing `image` with `words` over it.
    #[instrument(skip_all, fields(page_no = page_no, words = words.len()))]
    pub fn assemble<W>(
        &self,
        writer: &mut W,
        config: &DocumentConfig,
        page_no: usize,
        image: &ScanImage,
        words: &[Word],
    ) -> Result<PageGeometry>
    where
        W: DocumentWriter + ?Sized,
    {
        let geometry = PageGeometry::resolve(
            image.width(),
            image.height(),
            config.orientation,
            config.paper_size,
        )?;
        let encoded = EncodedImage::from_scan(page_no, image, config.format)?;
        let words: Vec<Word> = words
            .iter()
            .map(|word| word.clamped(image.width(), image.height()))
            .collect();

        debug!(
            width = geometry.width,
            height = geometry.height,
            orientation = ?geometry.orientation,
            "Page geometry resolved"
        );
        writer.begin_page(geometry.width, geometry.height, geometry.orientation)?;

        let text = TextCompositor::new(&self.metrics, config.scaling, config.debug);
        let draw_text = |w: &mut W| {
            with_layer(w, self.layers.text, |w| text.compose(w, &geometry, &words)).map(|_| ())
        };
        let draw_scan = |w: &mut W| {
            with_layer(w, self.layers.scan, |w| {
                compose_image(w, &geometry, &encoded, config.debug)
            })
        };

        if config.debug {
            draw_scan(writer)?;
            draw_text(writer)?;
        } else {
            draw_text(writer)?;
            draw_scan(writer)?;
        }
        Ok(geometry)
    }
}
