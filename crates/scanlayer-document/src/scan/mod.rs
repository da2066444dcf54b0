// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanning — optical character recognition of page images.

#[cfg(feature = "ocr")]
pub mod ocr;

#[cfg(feature = "ocr")]
pub use ocr::OcrEngine;

use scanlayer_core::error::Result;

use crate::image::ScanImage;
use crate::layout::Word;

/// Turns a page image into positioned words.
///
/// Recognition takes `&mut self`: engines keep per-image state and one
/// instance is reused, page after page, for the whole run.
pub trait Recognizer {
    /// Recognise the words on `image`, in reading order, with pixel boxes.
    fn recognize(&mut self, image: &ScanImage) -> Result<Vec<Word>>;
}
