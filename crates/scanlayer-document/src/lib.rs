// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// scanlayer-document — Page layout and layer compositing for Scanlayer.
//
// Turns scanned page images plus recognised words into a layered PDF: page
// geometry and text scaling (layout), the text and scan compositors
// (compose), the document writer seam with its printpdf backend (pdf), image
// preparation (image), and OCR (scan, behind the `ocr` feature).

pub mod compose;
pub mod image;
pub mod layout;
pub mod pdf;
pub mod pipeline;
pub mod scan;

#[cfg(test)]
mod test_support;

// Re-export the primary types so callers can use `scanlayer_document::Document` etc.
pub use compose::{Document, PageAssembler};
pub use image::ScanImage;
pub use layout::{PageGeometry, Word};
pub use pdf::{DocumentWriter, PdfWriter};
pub use scan::Recognizer;

#[cfg(feature = "ocr")]
pub use scan::ocr::{OcrConfig, OcrEngine};
