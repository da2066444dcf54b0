// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page geometry — choose the page orientation and size for a scanned image and
// derive the pixel-to-millimetre scale factors.

use scanlayer_core::error::{Result, ScanLayerError};
use scanlayer_core::{Orientation, PageOrientation, PaperSize};

use super::word::{PageBox, Word};

/// Final geometry of one output page. All lengths are millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// Base paper width before any landscape swap.
    pub base_width: f64,
    /// Base paper height before any landscape swap.
    pub base_height: f64,
    pub orientation: PageOrientation,
    /// Final page width.
    pub width: f64,
    /// Final page height.
    pub height: f64,
    /// Millimetres per horizontal pixel.
    pub mx: f64,
    /// Millimetres per vertical pixel.
    pub my: f64,
}

impl PageGeometry {
    /// Resolve the page for an `image_width` x `image_height` pixel image.
    ///
    /// The page keeps the image's aspect ratio exactly: one side of the
    /// (possibly swapped) paper box is kept and the other is shrunk, so the
    /// page never exceeds the paper in either dimension.
    pub fn resolve(
        image_width: u32,
        image_height: u32,
        orientation: Orientation,
        paper: PaperSize,
    ) -> Result<Self> {
        if image_width == 0 || image_height == 0 {
            return Err(ScanLayerError::Composition(format!(
                "image has no area ({image_width}x{image_height} pixels)"
            )));
        }

        let (base_width, base_height) = paper.size_mm();
        let (iw, ih) = (f64::from(image_width), f64::from(image_height));

        let (orientation, mut w, mut h) = match orientation {
            Orientation::Auto if image_width > image_height => {
                (PageOrientation::Landscape, base_height, base_width)
            }
            Orientation::Auto => (PageOrientation::Portrait, base_width, base_height),
            Orientation::Portrait => (PageOrientation::Portrait, base_width, base_height),
            Orientation::Landscape => (PageOrientation::Landscape, base_width, base_height),
        };

        if iw * h < ih * w {
            w = h * iw / ih;
        } else {
            h = w * ih / iw;
        }

        Ok(Self {
            base_width,
            base_height,
            orientation,
            width: w,
            height: h,
            mx: w / iw,
            my: h / ih,
        })
    }

    /// Map a word's pixel box onto the page.
    pub fn to_page(&self, word: &Word) -> PageBox {
        PageBox::new(
            f64::from(word.left()) * self.mx,
            f64::from(word.top()) * self.my,
            f64::from(word.width()) * self.mx,
            f64::from(word.height()) * self.my,
        )
    }

    /// The whole page, which is also the footprint of the scanned image.
    pub fn footprint(&self) -> PageBox {
        PageBox::new(0.0, 0.0, self.width, self.height)
    }
}
