// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Layout module — page geometry, pixel-to-page mapping, font metrics, and the
// text scaling policies. Everything here is pure maths with no I/O.

pub mod geometry;
pub mod metrics;
pub mod scaling;
pub mod word;

pub use geometry::PageGeometry;
pub use metrics::FontMetrics;
pub use scaling::{TextScale, text_scale};
pub use word::{PageBox, Word};
