// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text layer — place every recognised word over its detected box, stretched
// according to the scaling mode.

use scanlayer_core::ScalingMode;
use scanlayer_core::error::Result;
use tracing::trace;

use crate::layout::{FontMetrics, PageBox, PageGeometry, Word, text_scale};
use crate::pdf::traits::{
    BlendMode, DocumentWriter, RgbColor, with_alpha, with_saved_state, with_scale,
};

/// Opacity of the debug fill drawn behind each word.
const DEBUG_FILL_ALPHA: f64 = 0.5;

/// Draws the words of one page onto the current layer.
pub struct TextCompositor<'a> {
    metrics: &'a FontMetrics,
    scaling: ScalingMode,
    debug: bool,
}

impl<'a> TextCompositor<'a> {
    pub fn new(metrics: &'a FontMetrics, scaling: ScalingMode, debug: bool) -> Self {
        Self {
            metrics,
            scaling,
            debug,
        }
    }

    /// Draw `words` in order. Returns the number of text cells drawn.
    pub fn compose<W>(
        &self,
        writer: &mut W,
        geometry: &PageGeometry,
        words: &[Word],
    ) -> Result<usize>
    where
        W: DocumentWriter + ?Sized,
    {
        let mut drawn = 0;
        for word in words {
            if self.compose_word(writer, &geometry.to_page(word), word.text())? {
                drawn += 1;
            }
        }
        Ok(drawn)
    }

    fn compose_word<W>(&self, writer: &mut W, target: &PageBox, text: &str) -> Result<bool>
    where
        W: DocumentWriter + ?Sized,
    {
        let blank = text.trim().is_empty();
        if blank && !self.debug {
            return Ok(false);
        }

        let natural = self.metrics.string_width(text);
        let sw = if natural > 0.0 { natural } else { target.width };
        let sh = self.metrics.line_height();
        let scale = text_scale(self.scaling, target, natural, sh);
        if scale.is_degenerate() {
            // Box collapsed by clamping; a zero factor would make the matrix singular.
            trace!(text, "Skipping word outside the image");
            return Ok(false);
        }
        trace!(text, sx = scale.sx, sy = scale.sy, "Placing word");

        if self.debug {
            with_saved_state(writer, |w| {
                w.set_stroke_color(RgbColor::RED)?;
                w.stroke_rect(target)
            })?;
        }

        with_scale(writer, scale.sx, scale.sy, target.x, target.y, |w| {
            if self.debug {
                with_alpha(w, DEBUG_FILL_ALPHA, BlendMode::Multiply, |w| {
                    w.set_fill_color(RgbColor::GREEN)?;
                    w.fill_rect(&PageBox::new(target.x, target.y, sw, sh))
                })?;
            }
            if blank {
                return Ok(false);
            }
            w.text_cell(target.x, target.y, sh, text)?;
            Ok(true)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Call, RecordingWriter};
    use scanlayer_core::{FontSpec, Orientation, PaperSize, ScanLayerError};

    fn geometry() -> PageGeometry {
        PageGeometry::resolve(2000, 1000, Orientation::Auto, PaperSize::A4).unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn metrics() -> FontMetrics {
        FontMetrics::new(&FontSpec::default())
    }

    fn scales(w: &RecordingWriter) -> Vec<(f64, f64)> {
        w.drawing_calls()
            .iter()
            .filter_map(|c| match c {
                Call::Scale { sx, sy, .. } => Some((*sx, *sy)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn production_draws_only_text() {
        let metrics = metrics();
        let compositor = TextCompositor::new(&metrics, ScalingMode::Match, false);
        let mut w = RecordingWriter::with_page();
        let words = vec![
            Word::new("hello", 100, 50, 300, 150),
            Word::new("world", 320, 50, 500, 150),
        ];

        let drawn = compositor.compose(&mut w, &geometry(), &words).unwrap();
        assert_eq!(drawn, 2);
        assert_eq!(w.texts(), vec!["hello", "world"]);
        assert!(!w.drawing_calls().iter().any(|c| matches!(
            c,
            Call::StrokeRect(_) | Call::FillRect(_) | Call::Alpha { .. }
        )));
        assert_eq!(w.state_depth(), 0);
    }

    #[test]
    fn text_is_anchored_at_mapped_box() {
        let metrics = metrics();
        let compositor = TextCompositor::new(&metrics, ScalingMode::Off, false);
        let mut w = RecordingWriter::with_page();
        compositor
            .compose(&mut w, &geometry(), &[Word::new("hello", 100, 50, 300, 150)])
            .unwrap();

        let calls = w.drawing_calls();
        let Some(Call::Scale { sx, sy, x, y }) =
            calls.iter().find(|c| matches!(c, Call::Scale { .. }))
        else {
            panic!("no scale applied");
        };
        assert_eq!((*sx, *sy), (1.0, 1.0));
        assert!(close(*x, 14.85) && close(*y, 7.425));
        let Some(Call::Text { x, y, height, .. }) =
            calls.iter().find(|c| matches!(c, Call::Text { .. }))
        else {
            panic!("no text drawn");
        };
        assert!(close(*x, 14.85) && close(*y, 7.425));
        assert!(close(*height, metrics.line_height()));
    }

    #[test]
    fn match_mode_stretches_text_onto_box() {
        let metrics = metrics();
        let compositor = TextCompositor::new(&metrics, ScalingMode::Match, false);
        let mut w = RecordingWriter::with_page();
        compositor
            .compose(&mut w, &geometry(), &[Word::new("hello", 100, 50, 300, 150)])
            .unwrap();

        let (sx, sy) = scales(&w)[0];
        assert!(close(sx * metrics.string_width("hello"), 29.7));
        assert!(close(sy * metrics.line_height(), 14.85));
    }

    #[test]
    fn debug_adds_outline_and_fill_without_changing_text() {
        let metrics = metrics();
        let words = vec![Word::new("hello", 100, 50, 300, 150)];

        let mut plain = RecordingWriter::with_page();
        TextCompositor::new(&metrics, ScalingMode::Match, false)
            .compose(&mut plain, &geometry(), &words)
            .unwrap();
        let mut debug = RecordingWriter::with_page();
        TextCompositor::new(&metrics, ScalingMode::Match, true)
            .compose(&mut debug, &geometry(), &words)
            .unwrap();

        assert_eq!(plain.texts(), debug.texts());
        let calls = debug.drawing_calls();
        let outline = calls
            .iter()
            .position(|c| matches!(c, Call::StrokeRect(_)))
            .unwrap();
        let Call::StrokeRect(rect) = &calls[outline] else {
            unreachable!()
        };
        assert!(close(rect.x, 14.85) && close(rect.y, 7.425));
        assert!(close(rect.width, 29.7) && close(rect.height, 14.85));
        let fill = calls
            .iter()
            .position(|c| matches!(c, Call::FillRect(_)))
            .unwrap();
        let text = calls
            .iter()
            .position(|c| matches!(c, Call::Text { .. }))
            .unwrap();
        assert!(outline < fill && fill < text);
        assert!(calls.contains(&Call::StrokeColor(RgbColor::RED)));
        assert!(calls.contains(&Call::FillColor(RgbColor::GREEN)));
        assert!(calls.contains(&Call::Alpha {
            alpha: 0.5,
            blend: BlendMode::Multiply
        }));
        assert_eq!(debug.state_depth(), 0);
    }

    #[test]
    fn debug_fill_covers_natural_text_cell() {
        let metrics = metrics();
        let mut w = RecordingWriter::with_page();
        TextCompositor::new(&metrics, ScalingMode::Match, true)
            .compose(&mut w, &geometry(), &[Word::new("hello", 100, 50, 300, 150)])
            .unwrap();
        let Some(Call::FillRect(fill)) = w
            .drawing_calls()
            .iter()
            .find(|c| matches!(c, Call::FillRect(_)))
        else {
            panic!("no debug fill");
        };
        assert!(close(fill.x, 14.85) && close(fill.y, 7.425));
        assert!(close(fill.width, metrics.string_width("hello")));
        assert!(close(fill.height, metrics.line_height()));
    }

    #[test]
    fn blank_words_are_skipped_in_production() {
        let metrics = metrics();
        let mut w = RecordingWriter::with_page();
        let drawn = TextCompositor::new(&metrics, ScalingMode::Match, false)
            .compose(&mut w, &geometry(), &[Word::new("  ", 0, 0, 10, 10)])
            .unwrap();
        assert_eq!(drawn, 0);
        assert!(w.drawing_calls().is_empty());
    }

    #[test]
    fn blank_words_keep_debug_outline() {
        let metrics = metrics();
        let mut w = RecordingWriter::with_page();
        let drawn = TextCompositor::new(&metrics, ScalingMode::Match, true)
            .compose(&mut w, &geometry(), &[Word::new("", 0, 0, 10, 10)])
            .unwrap();
        assert_eq!(drawn, 0);
        assert!(w.texts().is_empty());
        assert!(w.drawing_calls().iter().any(|c| matches!(c, Call::StrokeRect(_))));
        // An empty run is measured as the box width.
        assert!(close(scales(&w)[0].0, 1.0));
    }

    #[test]
    fn words_outside_the_image_are_skipped() {
        let metrics = metrics();
        let geometry = geometry();
        let outside = Word::new("ghost", 2100, 50, 2300, 150).clamped(2000, 1000);
        let inside = Word::new("kept", 100, 50, 300, 150);
        for (mode, debug) in [
            (ScalingMode::Match, false),
            (ScalingMode::Contain, false),
            (ScalingMode::Match, true),
        ] {
            let mut w = RecordingWriter::with_page();
            let drawn = TextCompositor::new(&metrics, mode, debug)
                .compose(&mut w, &geometry, &[outside.clone(), inside.clone()])
                .unwrap();
            assert_eq!(drawn, 1, "{mode} debug={debug}");
            assert_eq!(w.texts(), vec!["kept"]);
            assert!(scales(&w).iter().all(|&(sx, sy)| sx > 0.0 && sy > 0.0));
        }
    }

    #[test]
    fn off_mode_still_draws_collapsed_boxes() {
        let metrics = metrics();
        let outside = Word::new("edge", 2100, 50, 2300, 150).clamped(2000, 1000);
        let mut w = RecordingWriter::with_page();
        let drawn = TextCompositor::new(&metrics, ScalingMode::Off, false)
            .compose(&mut w, &geometry(), &[outside])
            .unwrap();
        assert_eq!(drawn, 1);
    }

    #[test]
    fn failure_stops_at_word_and_restores_state() {
        let metrics = metrics();
        let mut w = RecordingWriter::with_page();
        w.fail_on_text = Some("bad".into());
        let words = vec![
            Word::new("good", 0, 0, 100, 20),
            Word::new("bad", 0, 30, 100, 50),
            Word::new("never", 0, 60, 100, 80),
        ];
        let err = TextCompositor::new(&metrics, ScalingMode::Match, false)
            .compose(&mut w, &geometry(), &words)
            .unwrap_err();
        assert!(matches!(err, ScanLayerError::Composition(_)));
        assert_eq!(w.texts(), vec!["good"]);
        assert_eq!(w.state_depth(), 0);
    }
}
