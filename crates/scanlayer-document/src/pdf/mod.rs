// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — the document writer seam and its printpdf backend.

pub mod traits;
pub mod writer;

pub use traits::{BlendMode, DocumentWriter, LayerId, RgbColor};
pub use writer::PdfWriter;
