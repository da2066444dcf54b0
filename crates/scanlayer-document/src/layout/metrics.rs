// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Font metrics for the standard PDF core fonts.
//
// Advance widths are in 1/1000 em for printable ASCII (0x20..=0x7E), taken
// from the Adobe Font Metrics files that ship with every PDF reader. Oblique
// and italic faces reuse the upright widths of the same weight.

use scanlayer_core::{FontFamily, FontSpec};

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

#[rustfmt::skip]
const TIMES_ROMAN: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

#[rustfmt::skip]
const TIMES_BOLD: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
    930, 722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778,
    611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, 333, 278, 333, 581, 500,
    333, 500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500,
    556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520,
];

/// Every Courier glyph is 600 units wide.
const COURIER_WIDTH: u16 = 600;

/// Measures text set in the document's configured font.
///
/// Results are in millimetres, the page-space unit.
#[derive(Debug, Clone)]
pub struct FontMetrics {
    widths: Option<&'static [u16; 95]>,
    /// Width used for characters outside printable ASCII.
    fallback: u16,
    size_mm: f64,
}

impl FontMetrics {
    pub fn new(font: &FontSpec) -> Self {
        let (widths, fallback) = match (font.family, font.bold) {
            (FontFamily::Helvetica, false) => (Some(&HELVETICA), 556),
            (FontFamily::Helvetica, true) => (Some(&HELVETICA_BOLD), 611),
            (FontFamily::Times, false) => (Some(&TIMES_ROMAN), 500),
            (FontFamily::Times, true) => (Some(&TIMES_BOLD), 556),
            (FontFamily::Courier, _) => (None, COURIER_WIDTH),
        };
        Self {
            widths,
            fallback,
            size_mm: font.size_mm(),
        }
    }

    /// Natural width of `text` at the configured size.
    pub fn string_width(&self, text: &str) -> f64 {
        let units: u32 = text.chars().map(|c| u32::from(self.advance(c))).sum();
        f64::from(units) * self.size_mm / 1000.0
    }

    /// Natural line height, equal to the font size.
    pub fn line_height(&self) -> f64 {
        self.size_mm
    }

    fn advance(&self, c: char) -> u16 {
        match (self.widths, u32::from(c)) {
            (Some(table), code @ 0x20..=0x7E) => table[(code - 0x20) as usize],
            (Some(_), _) => self.fallback,
            (None, _) => COURIER_WIDTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(family: FontFamily, bold: bool) -> FontSpec {
        FontSpec {
            family,
            bold,
            italic: false,
            size_pt: 10.0,
        }
    }

    #[test]
    fn empty_string_has_zero_width() {
        let metrics = FontMetrics::new(&FontSpec::default());
        assert_eq!(metrics.string_width(""), 0.0);
    }

    #[test]
    fn helvetica_widths() {
        let metrics = FontMetrics::new(&spec(FontFamily::Helvetica, false));
        // H(722) + i(222) = 944 units at 10pt.
        let expected = 944.0 * FontSpec::default().size_mm() / 1000.0;
        assert!((metrics.string_width("Hi") - expected).abs() < 1e-12);
    }

    #[test]
    fn bold_is_wider() {
        let regular = FontMetrics::new(&spec(FontFamily::Times, false));
        let bold = FontMetrics::new(&spec(FontFamily::Times, true));
        assert!(bold.string_width("scanned page") > regular.string_width("scanned page"));
    }

    #[test]
    fn courier_is_monospaced() {
        let metrics = FontMetrics::new(&spec(FontFamily::Courier, false));
        assert_eq!(metrics.string_width("iiii"), metrics.string_width("MMMM"));
        assert_eq!(metrics.string_width("é"), metrics.string_width("e"));
    }

    #[test]
    fn non_ascii_uses_fallback_width() {
        let metrics = FontMetrics::new(&spec(FontFamily::Helvetica, false));
        assert!(metrics.string_width("ß") > 0.0);
    }

    #[test]
    fn line_height_is_font_size() {
        let metrics = FontMetrics::new(&FontSpec::default());
        assert!((metrics.line_height() - 10.0 * 25.4 / 72.0).abs() < 1e-12);
    }
}
