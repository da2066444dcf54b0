// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan image — decode a page image, boost its contrast for recognition,
// shrink it to a target resolution, and re-encode it for embedding.

use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, ImageReader};
use scanlayer_core::error::{Result, ScanLayerError};
use scanlayer_core::{EmbedFormat, ImageEncoding};
use tracing::{debug, info, instrument};

/// JPEG quality used when a page is embedded as JPEG.
const JPEG_QUALITY: u8 = 90;

/// Steepness of the contrast curve at `factor == 1.0`.
const CONTRAST_STEEPNESS: f64 = 5.0;

/// A decoded page image together with the encoding it was stored in.
///
/// Transformations consume `self` and return the transformed image, so a
/// page's pixels have exactly one owner at any time.
pub struct ScanImage {
    image: DynamicImage,
    encoding: ImageEncoding,
}

impl ScanImage {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file, detecting its format from the content.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let read_error = |reason: String| ScanLayerError::ImageRead {
            path: path.to_path_buf(),
            reason,
        };

        let reader = ImageReader::open(path)
            .and_then(|r| r.with_guessed_format())
            .map_err(|err| read_error(err.to_string()))?;
        let encoding = match reader.format() {
            Some(format) => encoding_of(format),
            None => return Err(read_error("unrecognised image format".into())),
        };
        let image = reader.decode().map_err(|err| read_error(err.to_string()))?;

        info!(
            width = image.width(),
            height = image.height(),
            %encoding,
            "Image loaded"
        );
        Ok(Self { image, encoding })
    }

    /// Wrap an already-decoded image.
    pub fn from_dynamic(image: DynamicImage, encoding: ImageEncoding) -> Self {
        Self { image, encoding }
    }

    // -- Accessors ------------------------------------------------------------

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// The encoding the image was read from.
    pub fn encoding(&self) -> &ImageEncoding {
        &self.encoding
    }

    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    // -- Transformations ------------------------------------------------------

    /// Increase contrast with a sigmoid tone curve.
    ///
    /// `factor` runs from 0.0 (no change) to 1.0 (strong). Mid-grey is kept
    /// and both ends are pushed outwards, which suppresses paper texture and
    /// darkens faint strokes.
    #[instrument(skip(self))]
    pub fn adjust_contrast(self, factor: f32) -> Self {
        let Some(curve) = contrast_curve(factor) else {
            return self;
        };
        debug!("Applying contrast curve");

        let image = match self.image {
            DynamicImage::ImageLuma8(mut gray) => {
                for p in gray.pixels_mut() {
                    p.0[0] = curve[usize::from(p.0[0])];
                }
                DynamicImage::ImageLuma8(gray)
            }
            other => {
                let mut rgb = other.to_rgb8();
                for p in rgb.pixels_mut() {
                    p.0 = p.0.map(|c| curve[usize::from(c)]);
                }
                DynamicImage::ImageRgb8(rgb)
            }
        };
        Self {
            image,
            encoding: self.encoding,
        }
    }

    /// Shrink the image to fit within `max_width` x `max_height`, preserving
    /// aspect ratio. Images that already fit are returned unchanged.
    #[instrument(skip(self))]
    pub fn scale_down(self, max_width: u32, max_height: u32) -> Self {
        if max_width == 0
            || max_height == 0
            || (self.width() <= max_width && self.height() <= max_height)
        {
            return self;
        }
        info!(
            from_w = self.width(),
            from_h = self.height(),
            max_width,
            max_height,
            "Scaling image down"
        );
        let image = self
            .image
            .resize(max_width, max_height, image::imageops::FilterType::Lanczos3);
        Self {
            image,
            encoding: self.encoding,
        }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the image for embedding.
    pub fn encode(&self, format: EmbedFormat) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        match format {
            EmbedFormat::Png => {
                self.image
                    .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
                    .map_err(|err| {
                        ScanLayerError::Image(format!("PNG encoding failed: {err}"))
                    })?;
            }
            EmbedFormat::Jpg => {
                let encoder = JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY);
                let result = match &self.image {
                    DynamicImage::ImageLuma8(gray) => gray.write_with_encoder(encoder),
                    other => other.to_rgb8().write_with_encoder(encoder),
                };
                result.map_err(|err| {
                    ScanLayerError::Image(format!("JPEG encoding failed: {err}"))
                })?;
            }
        }
        debug!(%format, bytes = buffer.len(), "Image encoded");
        Ok(buffer)
    }
}

/// Map a decoder format onto the encodings the rest of the pipeline knows.
fn encoding_of(format: ImageFormat) -> ImageEncoding {
    match format {
        ImageFormat::Jpeg => ImageEncoding::Jpeg,
        ImageFormat::Png => ImageEncoding::Png,
        other => ImageEncoding::Other(
            other
                .extensions_str()
                .first()
                .map_or_else(|| format!("{other:?}").to_lowercase(), |ext| (*ext).to_owned()),
        ),
    }
}

/// Build the 256-entry lookup table for the contrast curve.
///
/// Returns `None` when `factor` is too small to change any value.
fn contrast_curve(factor: f32) -> Option<[u8; 256]> {
    if factor < 0.001 {
        return None;
    }
    let k = f64::from(factor.min(1.0)) * CONTRAST_STEEPNESS;
    let ymax = k.atan();
    let ymin = (-127.0 * k / 128.0).atan();
    let span = ymax - ymin;

    let mut curve = [0u8; 256];
    for (i, out) in curve.iter_mut().enumerate() {
        let x = i as f64;
        let y = (255.0 / span) * (-ymin + (k * (x - 127.0) / 128.0).atan()) + 0.5;
        *out = y.clamp(0.0, 255.0) as u8;
    }
    Some(curve)
}
