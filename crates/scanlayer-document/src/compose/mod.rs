// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Compositing — the text and scan layers, page assembly, and the document
// that collects the pages.

pub mod document;
pub mod image_layer;
pub mod page;
pub mod text_layer;

pub use document::Document;
pub use image_layer::{EncodedImage, compose_image};
pub use page::{PageAssembler, PageLayers, SCAN_LAYER, TEXT_LAYER};
pub use text_layer::TextCompositor;
