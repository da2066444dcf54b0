// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document writer abstraction.
//
// The compositors only ever talk to a `DocumentWriter`. Coordinates are page
// space: millimetres with the origin at the page's top-left corner, y growing
// downwards. Backends convert to their own coordinate system.

use std::io::Write;

use scanlayer_core::error::Result;
use scanlayer_core::{DocumentMetadata, EmbedFormat, FontSpec, PageOrientation};

use crate::layout::PageBox;

/// Handle to a named layer, assigned once when the document is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(pub usize);

/// An sRGB colour with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const RED: Self = Self { r: 255, g: 0, b: 0 };
    pub const GREEN: Self = Self { r: 0, g: 255, b: 0 };
}

/// How newly painted content combines with what is already on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendMode {
    Normal,
    Multiply,
}

/// Low-level drawing surface for building a multi-page document.
///
/// Graphics state (transforms, alpha, colours) set between `save_state` and
/// the matching `restore_state` must not outlive the restore. Prefer the
/// scoped helpers in this module over calling the pairs by hand.
pub trait DocumentWriter {
    /// Select the font used by every subsequent `text_cell`.
    fn set_font(&mut self, font: &FontSpec);

    fn set_metadata(&mut self, metadata: &DocumentMetadata);

    /// Enable or disable stream compression in the final output.
    fn set_compression(&mut self, enabled: bool);

    /// Declare a named layer. Call before the first page.
    fn add_layer(&mut self, name: &str) -> LayerId;

    /// Start a new page; the previous page, if any, is complete.
    fn begin_page(&mut self, width: f64, height: f64, orientation: PageOrientation)
    -> Result<()>;

    fn begin_layer(&mut self, layer: LayerId) -> Result<()>;

    fn end_layer(&mut self, layer: LayerId) -> Result<()>;

    fn save_state(&mut self) -> Result<()>;

    fn restore_state(&mut self) -> Result<()>;

    /// Scale by `(sx, sy)` about the point `(x, y)`.
    fn scale_about(&mut self, sx: f64, sy: f64, x: f64, y: f64) -> Result<()>;

    /// Set fill and stroke opacity together with the blend mode.
    fn set_alpha(&mut self, alpha: f64, blend: BlendMode) -> Result<()>;

    fn set_stroke_color(&mut self, color: RgbColor) -> Result<()>;

    fn set_fill_color(&mut self, color: RgbColor) -> Result<()>;

    fn stroke_rect(&mut self, rect: &PageBox) -> Result<()>;

    fn fill_rect(&mut self, rect: &PageBox) -> Result<()>;

    /// Draw `text` in a cell whose top-left corner is `(x, y)` and whose
    /// height is `height`, at the font's natural size.
    fn text_cell(&mut self, x: f64, y: f64, height: f64, text: &str) -> Result<()>;

    /// Register an encoded image under a document-unique `name`.
    fn register_image(&mut self, name: &str, data: &[u8], format: EmbedFormat) -> Result<()>;

    /// Draw a registered image stretched over `rect`.
    fn place_image(&mut self, name: &str, rect: &PageBox) -> Result<()>;

    /// Serialise the whole document to `out`. Called exactly once.
    fn finish(self, out: &mut dyn Write) -> Result<()>
    where
        Self: Sized;
}

/// Run `body` inside `layer`. The layer is closed on every exit path.
pub fn with_layer<W, T, F>(writer: &mut W, layer: LayerId, body: F) -> Result<T>
where
    W: DocumentWriter + ?Sized,
    F: FnOnce(&mut W) -> Result<T>,
{
    writer.begin_layer(layer)?;
    let result = body(writer);
    let closed = writer.end_layer(layer);
    let value = result?;
    closed?;
    Ok(value)
}

/// Run `body` with its own copy of the graphics state.
pub fn with_saved_state<W, T, F>(writer: &mut W, body: F) -> Result<T>
where
    W: DocumentWriter + ?Sized,
    F: FnOnce(&mut W) -> Result<T>,
{
    writer.save_state()?;
    let result = body(writer);
    let restored = writer.restore_state();
    let value = result?;
    restored?;
    Ok(value)
}

/// Run `body` scaled by `(sx, sy)` about `(x, y)`.
pub fn with_scale<W, T, F>(writer: &mut W, sx: f64, sy: f64, x: f64, y: f64, body: F) -> Result<T>
where
    W: DocumentWriter + ?Sized,
    F: FnOnce(&mut W) -> Result<T>,
{
    with_saved_state(writer, |w| {
        w.scale_about(sx, sy, x, y)?;
        body(w)
    })
}

/// Run `body` with the given opacity and blend mode.
pub fn with_alpha<W, T, F>(writer: &mut W, alpha: f64, blend: BlendMode, body: F) -> Result<T>
where
    W: DocumentWriter + ?Sized,
    F: FnOnce(&mut W) -> Result<T>,
{
    with_saved_state(writer, |w| {
        w.set_alpha(alpha, blend)?;
        body(w)
    })
}
