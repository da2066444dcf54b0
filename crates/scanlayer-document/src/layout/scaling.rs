// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text scaling — how far to stretch a word's rendered text so it lines up with
// the box the recogniser detected.

use scanlayer_core::ScalingMode;

use super::word::PageBox;

/// Horizontal and vertical scale factors applied about the word's anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextScale {
    pub sx: f64,
    pub sy: f64,
}

impl TextScale {
    pub const IDENTITY: Self = Self { sx: 1.0, sy: 1.0 };

    pub fn uniform(s: f64) -> Self {
        Self { sx: s, sy: s }
    }

    /// True when either factor would flatten the text to nothing.
    pub fn is_degenerate(&self) -> bool {
        !(self.sx > 0.0 && self.sy > 0.0)
    }
}

/// Compute scale factors for text of natural size `text_width` x `line_height`
/// placed in `target`.
///
/// A zero `text_width` (an empty glyph run) is treated as already matching
/// the box width. A zero-sized `target` yields a degenerate scale under
/// `contain` and `match`; callers check [`TextScale::is_degenerate`].
pub fn text_scale(
    mode: ScalingMode,
    target: &PageBox,
    text_width: f64,
    line_height: f64,
) -> TextScale {
    let (w, h) = (target.width, target.height);
    let sw = if text_width > 0.0 { text_width } else { w };
    let sh = line_height;

    match mode {
        ScalingMode::Off => TextScale::IDENTITY,
        ScalingMode::Contain => {
            if sw * h > sh * w {
                TextScale::uniform(ratio(w, sw))
            } else {
                TextScale::uniform(ratio(h, sh))
            }
        }
        ScalingMode::Match => TextScale {
            sx: ratio(w, sw),
            sy: ratio(h, sh),
        },
    }
}

/// `num / den`, or 1 when the denominator is degenerate.
fn ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 { num / den } else { 1.0 }
}
