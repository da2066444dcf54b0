// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — `DocumentWriter` backend built on `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: each page is a `Vec<Op>` operation
// list, pages are attached to the `PdfDocument` at the end, and the whole
// document is serialised once via `PdfDocument::save()`.
//
// Page space (millimetres, top-left origin) is converted here to PDF user
// space (points, bottom-left origin).

use std::collections::HashMap;
use std::io::Write;

use image::{DynamicImage, ImageFormat};
use printpdf::{
    BlendMode as PdfBlendMode, BuiltinFont, Color, CurTransMat, ExtendedGraphicsState,
    ExtendedGraphicsStateId, Layer, LayerInternalId, LinePoint, Mm, Op, PaintMode, PdfDocument,
    PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Polygon, PolygonRing, Pt, RawImage, RawImageData,
    RawImageFormat, Rgb, SeperableBlendMode, TextItem, WindingOrder, XObjectId, XObjectTransform,
};
use scanlayer_core::error::{Result, ScanLayerError};
use scanlayer_core::{
    DocumentMetadata, EmbedFormat, FontFamily, FontSpec, MM_PER_PT, PageOrientation,
};
use tracing::{debug, info, instrument, warn};

use super::traits::{BlendMode, DocumentWriter, LayerId, RgbColor};
use crate::layout::PageBox;

/// Width of debug outlines, in millimetres.
const LINE_WIDTH_MM: f64 = 0.2;

/// Images are placed at 72 dpi so that one pixel is one point before scaling.
const PLACEMENT_DPI: f32 = 72.0;

fn mm_to_pt(mm: f64) -> f32 {
    (mm / MM_PER_PT) as f32
}

/// Pick the core font matching a font spec.
fn builtin_font(font: &FontSpec) -> BuiltinFont {
    match (font.family, font.bold, font.italic) {
        (FontFamily::Helvetica, false, false) => BuiltinFont::Helvetica,
        (FontFamily::Helvetica, true, false) => BuiltinFont::HelveticaBold,
        (FontFamily::Helvetica, false, true) => BuiltinFont::HelveticaOblique,
        (FontFamily::Helvetica, true, true) => BuiltinFont::HelveticaBoldOblique,
        (FontFamily::Times, false, false) => BuiltinFont::TimesRoman,
        (FontFamily::Times, true, false) => BuiltinFont::TimesBold,
        (FontFamily::Times, false, true) => BuiltinFont::TimesItalic,
        (FontFamily::Times, true, true) => BuiltinFont::TimesBoldItalic,
        (FontFamily::Courier, false, false) => BuiltinFont::Courier,
        (FontFamily::Courier, true, false) => BuiltinFont::CourierBold,
        (FontFamily::Courier, false, true) => BuiltinFont::CourierOblique,
        (FontFamily::Courier, true, true) => BuiltinFont::CourierBoldOblique,
    }
}

fn pdf_color(color: RgbColor) -> Color {
    Color::Rgb(Rgb {
        r: f32::from(color.r) / 255.0,
        g: f32::from(color.g) / 255.0,
        b: f32::from(color.b) / 255.0,
        icc_profile: None,
    })
}

/// A page whose operations are still being collected.
struct OpenPage {
    width: f64,
    height: f64,
    ops: Vec<Op>,
}

impl OpenPage {
    /// Page-space point to PDF user space, in points.
    fn point(&self, x: f64, y: f64) -> (f32, f32) {
        (mm_to_pt(x), mm_to_pt(self.height - y))
    }

    fn pdf_point(&self, x: f64, y: f64) -> Point {
        let (x, y) = self.point(x, y);
        Point { x: Pt(x), y: Pt(y) }
    }

    fn rect_polygon(&self, rect: &PageBox, mode: PaintMode) -> Polygon {
        let corners = [
            (rect.x, rect.y),
            (rect.right(), rect.y),
            (rect.right(), rect.bottom()),
            (rect.x, rect.bottom()),
        ];
        Polygon {
            rings: vec![PolygonRing {
                points: corners
                    .iter()
                    .map(|&(x, y)| LinePoint {
                        p: self.pdf_point(x, y),
                        bezier: false,
                    })
                    .collect(),
            }],
            mode,
            winding_order: WindingOrder::NonZero,
        }
    }
}

/// An image registered with the document, ready to be placed.
struct RegisteredImage {
    id: XObjectId,
    width_px: u32,
    height_px: u32,
}

/// Builds a layered PDF in memory and serialises it once on `finish`.
pub struct PdfWriter {
    doc: PdfDocument,
    font: BuiltinFont,
    /// Font size in millimetres.
    font_size: f64,
    compress: bool,
    layers: Vec<LayerInternalId>,
    images: HashMap<String, RegisteredImage>,
    /// One graphics state per distinct (alpha, blend) pair.
    graphics_states: HashMap<(u32, BlendMode), ExtendedGraphicsStateId>,
    pages: Vec<PdfPage>,
    current: Option<OpenPage>,
}

impl PdfWriter {
    pub fn new() -> Self {
        let font = FontSpec::default();
        Self {
            doc: PdfDocument::new("scanlayer"),
            font: builtin_font(&font),
            font_size: font.size_mm(),
            compress: true,
            layers: Vec::new(),
            images: HashMap::new(),
            graphics_states: HashMap::new(),
            pages: Vec::new(),
            current: None,
        }
    }

    /// Number of pages begun so far.
    pub fn page_count(&self) -> usize {
        self.pages.len() + usize::from(self.current.is_some())
    }

    fn page(&mut self) -> Result<&mut OpenPage> {
        self.current
            .as_mut()
            .ok_or_else(|| ScanLayerError::Composition("no page has been started".into()))
    }

    fn push(&mut self, op: Op) -> Result<()> {
        self.page()?.ops.push(op);
        Ok(())
    }

    fn layer(&self, layer: LayerId) -> Result<LayerInternalId> {
        self.layers
            .get(layer.0)
            .cloned()
            .ok_or_else(|| ScanLayerError::Composition(format!("unknown layer {}", layer.0)))
    }

    fn close_page(&mut self) {
        if let Some(page) = self.current.take() {
            debug!(ops = page.ops.len(), "Page closed");
            self.pages.push(PdfPage::new(
                Mm(page.width as f32),
                Mm(page.height as f32),
                page.ops,
            ));
        }
    }

    fn graphics_state(&mut self, alpha: f64, blend: BlendMode) -> ExtendedGraphicsStateId {
        let alpha = alpha.clamp(0.0, 1.0) as f32;
        let key = (alpha.to_bits(), blend);
        if let Some(id) = self.graphics_states.get(&key) {
            return id.clone();
        }
        let mode = match blend {
            BlendMode::Normal => SeperableBlendMode::Normal,
            BlendMode::Multiply => SeperableBlendMode::Multiply,
        };
        let state = ExtendedGraphicsState::default()
            .with_current_fill_alpha(alpha)
            .with_current_stroke_alpha(alpha)
            .with_blend_mode(PdfBlendMode::Seperable(mode));
        let id = self.doc.add_graphics_state(state);
        self.graphics_states.insert(key, id.clone());
        id
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentWriter for PdfWriter {
    fn set_font(&mut self, font: &FontSpec) {
        self.font = builtin_font(font);
        self.font_size = font.size_mm();
    }

    fn set_metadata(&mut self, metadata: &DocumentMetadata) {
        let info = &mut self.doc.metadata.info;
        if let Some(title) = &metadata.title {
            info.document_title = title.clone();
        }
        if let Some(subject) = &metadata.subject {
            info.subject = subject.clone();
        }
        if let Some(author) = &metadata.author {
            info.author = author.clone();
        }
        info.keywords = metadata.keywords.clone();
        info.creator = metadata.creator.clone();
    }

    fn set_compression(&mut self, enabled: bool) {
        self.compress = enabled;
    }

    fn add_layer(&mut self, name: &str) -> LayerId {
        let id = self.doc.add_layer(&Layer::new(name));
        self.layers.push(id);
        LayerId(self.layers.len() - 1)
    }

    fn begin_page(
        &mut self,
        width: f64,
        height: f64,
        orientation: PageOrientation,
    ) -> Result<()> {
        if !(width > 0.0 && height > 0.0) {
            return Err(ScanLayerError::Composition(format!(
                "invalid page size {width}x{height} mm"
            )));
        }
        self.close_page();
        debug!(width, height, ?orientation, "Page started");
        self.current = Some(OpenPage {
            width,
            height,
            ops: Vec::new(),
        });
        Ok(())
    }

    fn begin_layer(&mut self, layer: LayerId) -> Result<()> {
        let layer_id = self.layer(layer)?;
        self.push(Op::BeginLayer { layer_id })
    }

    fn end_layer(&mut self, layer: LayerId) -> Result<()> {
        let layer_id = self.layer(layer)?;
        self.push(Op::EndLayer { layer_id })
    }

    fn save_state(&mut self) -> Result<()> {
        self.push(Op::SaveGraphicsState)
    }

    fn restore_state(&mut self) -> Result<()> {
        self.push(Op::RestoreGraphicsState)
    }

    fn scale_about(&mut self, sx: f64, sy: f64, x: f64, y: f64) -> Result<()> {
        let page = self.page()?;
        let (px, py) = page.point(x, y);
        let matrix = scale_matrix(sx as f32, sy as f32, px, py);
        page.ops.push(Op::SetTransformationMatrix {
            matrix: CurTransMat::Raw(matrix),
        });
        Ok(())
    }

    fn set_alpha(&mut self, alpha: f64, blend: BlendMode) -> Result<()> {
        self.page()?;
        let gs = self.graphics_state(alpha, blend);
        self.push(Op::LoadGraphicsState { gs })
    }

    fn set_stroke_color(&mut self, color: RgbColor) -> Result<()> {
        self.push(Op::SetOutlineColor {
            col: pdf_color(color),
        })
    }

    fn set_fill_color(&mut self, color: RgbColor) -> Result<()> {
        self.push(Op::SetFillColor {
            col: pdf_color(color),
        })
    }

    fn stroke_rect(&mut self, rect: &PageBox) -> Result<()> {
        let page = self.page()?;
        let polygon = page.rect_polygon(rect, PaintMode::Stroke);
        page.ops.push(Op::SetOutlineThickness {
            pt: Pt(mm_to_pt(LINE_WIDTH_MM)),
        });
        page.ops.push(Op::DrawPolygon { polygon });
        Ok(())
    }

    fn fill_rect(&mut self, rect: &PageBox) -> Result<()> {
        let page = self.page()?;
        let polygon = page.rect_polygon(rect, PaintMode::Fill);
        page.ops.push(Op::DrawPolygon { polygon });
        Ok(())
    }

    fn text_cell(&mut self, x: f64, y: f64, height: f64, text: &str) -> Result<()> {
        let (font, font_size) = (self.font, self.font_size);
        let page = self.page()?;
        let pos = page.pdf_point(x, baseline(y, height, font_size));
        page.ops.extend([
            Op::StartTextSection,
            Op::SetTextCursor { pos },
            Op::SetFontSizeBuiltinFont {
                size: Pt(mm_to_pt(font_size)),
                font,
            },
            Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text(text.to_owned())],
                font,
            },
            Op::EndTextSection,
        ]);
        Ok(())
    }

    /// The buffer is decoded and embedded as raw 8-bit pixels (grey or RGB).
    /// `format` only selects the decoder; a JPEG page does not reach the PDF
    /// as a DCT stream, so choosing `jpg` does not shrink the output.
    #[instrument(skip(self, data), fields(bytes = data.len()))]
    fn register_image(&mut self, name: &str, data: &[u8], format: EmbedFormat) -> Result<()> {
        if self.images.contains_key(name) {
            return Err(ScanLayerError::Composition(format!(
                "image '{name}' is already registered"
            )));
        }
        let decoder_format = match format {
            EmbedFormat::Jpg => ImageFormat::Jpeg,
            EmbedFormat::Png => ImageFormat::Png,
        };
        let decoded = image::load_from_memory_with_format(data, decoder_format).map_err(|err| {
            ScanLayerError::Image(format!("failed to decode {format} image '{name}': {err}"))
        })?;

        let (width_px, height_px) = (decoded.width(), decoded.height());
        let (pixels, data_format) = match decoded {
            DynamicImage::ImageLuma8(gray) => (gray.into_raw(), RawImageFormat::R8),
            other => (other.to_rgb8().into_raw(), RawImageFormat::RGB8),
        };
        let raw = RawImage {
            pixels: RawImageData::U8(pixels),
            width: width_px as usize,
            height: height_px as usize,
            data_format,
            tag: Vec::new(),
        };
        let id = self.doc.add_image(&raw);
        debug!(name, width_px, height_px, "Image registered");

        self.images.insert(
            name.to_owned(),
            RegisteredImage {
                id,
                width_px,
                height_px,
            },
        );
        Ok(())
    }

    fn place_image(&mut self, name: &str, rect: &PageBox) -> Result<()> {
        let (id, width_px, height_px) = match self.images.get(name) {
            Some(image) => (image.id.clone(), image.width_px, image.height_px),
            None => {
                return Err(ScanLayerError::Composition(format!(
                    "image '{name}' was never registered"
                )));
            }
        };
        let page = self.page()?;
        let (left, bottom) = page.point(rect.x, rect.bottom());
        page.ops.push(Op::UseXobject {
            id,
            transform: XObjectTransform {
                translate_x: Some(Pt(left)),
                translate_y: Some(Pt(bottom)),
                scale_x: Some(mm_to_pt(rect.width) / width_px as f32),
                scale_y: Some(mm_to_pt(rect.height) / height_px as f32),
                dpi: Some(PLACEMENT_DPI),
                rotate: None,
            },
        });
        Ok(())
    }

    #[instrument(skip_all, fields(pages = self.page_count(), compress = self.compress))]
    fn finish(mut self, out: &mut dyn Write) -> Result<()> {
        self.close_page();
        if self.pages.is_empty() {
            return Err(ScanLayerError::Composition(
                "document has no pages".into(),
            ));
        }

        let pages = std::mem::take(&mut self.pages);
        self.doc.with_pages(pages);

        let options = PdfSaveOptions {
            optimize: self.compress,
            ..Default::default()
        };
        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let bytes = self.doc.save(&options, &mut warnings);
        for warning in &warnings {
            warn!(?warning, "PDF serialisation warning");
        }

        out.write_all(&bytes)?;
        out.flush()?;
        info!(bytes = bytes.len(), "PDF written");
        Ok(())
    }
}

/// Baseline of a text cell of `height` whose top edge is at `y`, for a font
/// of `font_size` millimetres: vertically centred on the cell.
fn baseline(y: f64, height: f64, font_size: f64) -> f64 {
    y + 0.5 * height + 0.3 * font_size
}

/// Matrix scaling by `(sx, sy)` about the PDF-space point `(x, y)`.
fn scale_matrix(sx: f32, sy: f32, x: f32, y: f32) -> [f32; 6] {
    [sx, 0.0, 0.0, sy, x * (1.0 - sx), y * (1.0 - sy)]
}
