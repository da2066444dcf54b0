// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Scanlayer.
//
// Every user-facing token type implements `FromStr` and `Display` so the same
// spelling is accepted on the command line, in JSON config files, and in log
// output.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScanLayerError;

/// Standard paper sizes, in portrait orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PaperSize {
    A3,
    #[default]
    A4,
    /// A4 trimmed to 280mm, common on older sheet-fed scanners.
    PA4,
    A5,
    C4,
    Letter,
    Legal,
    Tabloid,
    Custom { width_mm: u32, height_mm: u32 },
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A3 => (297, 420),
            Self::A4 => (210, 297),
            Self::PA4 => (210, 280),
            Self::A5 => (148, 210),
            Self::C4 => (229, 324),
            Self::Letter => (216, 279),
            Self::Legal => (216, 356),
            Self::Tabloid => (279, 432),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }

    /// Dimensions in millimetres as floats, ready for geometry maths.
    pub fn size_mm(&self) -> (f64, f64) {
        let (w, h) = self.dimensions_mm();
        (f64::from(w), f64::from(h))
    }
}

impl fmt::Display for PaperSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A3 => f.write_str("a3"),
            Self::A4 => f.write_str("a4"),
            Self::PA4 => f.write_str("pa4"),
            Self::A5 => f.write_str("a5"),
            Self::C4 => f.write_str("c4"),
            Self::Letter => f.write_str("letter"),
            Self::Legal => f.write_str("legal"),
            Self::Tabloid => f.write_str("tabloid"),
            Self::Custom {
                width_mm,
                height_mm,
            } => write!(f, "{width_mm}x{height_mm}"),
        }
    }
}

impl FromStr for PaperSize {
    type Err = ScanLayerError;

    /// Accepts a named size (`a4`, `letter`, ...) or `WIDTHxHEIGHT` in mm.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let named = match lower.as_str() {
            "a3" => Some(Self::A3),
            "a4" => Some(Self::A4),
            "pa4" => Some(Self::PA4),
            "a5" => Some(Self::A5),
            "c4" => Some(Self::C4),
            "letter" => Some(Self::Letter),
            "legal" => Some(Self::Legal),
            "tabloid" => Some(Self::Tabloid),
            _ => None,
        };
        if let Some(size) = named {
            return Ok(size);
        }

        let invalid = || {
            ScanLayerError::Configuration(format!(
                "unknown paper size '{s}' (expected a3, a4, pa4, a5, c4, letter, legal, \
                 tabloid, or WIDTHxHEIGHT in mm)"
            ))
        };
        let (w, h) = lower.split_once('x').ok_or_else(invalid)?;
        let width_mm: u32 = w.trim().parse().map_err(|_| invalid())?;
        let height_mm: u32 = h.trim().parse().map_err(|_| invalid())?;
        if width_mm == 0 || height_mm == 0 {
            return Err(invalid());
        }
        Ok(Self::Custom {
            width_mm,
            height_mm,
        })
    }
}

impl TryFrom<String> for PaperSize {
    type Error = ScanLayerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PaperSize> for String {
    fn from(size: PaperSize) -> Self {
        size.to_string()
    }
}

/// Requested page orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Pick per page from the image's aspect ratio.
    #[default]
    Auto,
    Portrait,
    Landscape,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Portrait => "portrait",
            Self::Landscape => "landscape",
        })
    }
}

impl FromStr for Orientation {
    type Err = ScanLayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "portrait" => Ok(Self::Portrait),
            "landscape" => Ok(Self::Landscape),
            _ => Err(ScanLayerError::Configuration(format!(
                "unknown orientation '{s}' (expected auto, portrait, or landscape)"
            ))),
        }
    }
}

/// Orientation of a page once `Orientation::Auto` has been resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageOrientation {
    Portrait,
    Landscape,
}

impl fmt::Display for PageOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Portrait => "portrait",
            Self::Landscape => "landscape",
        })
    }
}

/// How recognised text is stretched to line up with its detected word box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalingMode {
    /// Natural font size, anchored at the box's top-left corner.
    Off,
    /// Uniform scale until the text fits inside the box.
    Contain,
    /// Independent horizontal and vertical scale so the text fills the box.
    #[default]
    Match,
}

impl fmt::Display for ScalingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Off => "off",
            Self::Contain => "contain",
            Self::Match => "match",
        })
    }
}

impl FromStr for ScalingMode {
    type Err = ScanLayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "contain" => Ok(Self::Contain),
            "match" => Ok(Self::Match),
            _ => Err(ScanLayerError::Configuration(format!(
                "unknown text scaling '{s}' (expected off, contain, or match)"
            ))),
        }
    }
}

/// Encoding an input image was stored in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageEncoding {
    Jpeg,
    Png,
    /// Anything else the decoder understood (TIFF, BMP, ...), by name.
    Other(String),
}

impl fmt::Display for ImageEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jpeg => f.write_str("jpg"),
            Self::Png => f.write_str("png"),
            Self::Other(name) => f.write_str(name),
        }
    }
}

/// Encoding used when embedding a page image in the output document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedFormat {
    Jpg,
    Png,
}

impl fmt::Display for EmbedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Jpg => "jpg",
            Self::Png => "png",
        })
    }
}

/// Requested embedding format for page images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Keep the source encoding when it can be embedded, PNG otherwise.
    #[default]
    Auto,
    Jpg,
    Png,
}

impl OutputFormat {
    /// Decide the embedding format for an image stored as `native`.
    pub fn resolve(self, native: &ImageEncoding) -> EmbedFormat {
        match (self, native) {
            (Self::Jpg, _) => EmbedFormat::Jpg,
            (Self::Png, _) => EmbedFormat::Png,
            (Self::Auto, ImageEncoding::Jpeg) => EmbedFormat::Jpg,
            (Self::Auto, ImageEncoding::Png) => EmbedFormat::Png,
            (Self::Auto, ImageEncoding::Other(_)) => EmbedFormat::Png,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Jpg => "jpg",
            Self::Png => "png",
        })
    }
}

impl FromStr for OutputFormat {
    type Err = ScanLayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "jpg" | "jpeg" => Ok(Self::Jpg),
            "png" => Ok(Self::Png),
            _ => Err(ScanLayerError::Configuration(format!(
                "unknown image format '{s}' (expected auto, jpg, or png)"
            ))),
        }
    }
}

/// Font families available for the text layer.
///
/// These map onto the standard PDF core fonts, so nothing is embedded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    #[default]
    Helvetica,
    Times,
    Courier,
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Helvetica => "helvetica",
            Self::Times => "times",
            Self::Courier => "courier",
        })
    }
}

impl FromStr for FontFamily {
    type Err = ScanLayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "helvetica" | "arial" | "sans" | "sans-serif" => Ok(Self::Helvetica),
            "times" | "times-roman" | "times new roman" | "serif" => Ok(Self::Times),
            "courier" | "courier new" | "mono" | "monospace" => Ok(Self::Courier),
            _ => Err(ScanLayerError::Configuration(format!(
                "unknown font '{s}' (expected helvetica, times, or courier)"
            ))),
        }
    }
}

/// The single font used for every word in the document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSpec {
    pub family: FontFamily,
    pub bold: bool,
    pub italic: bool,
    /// Size in points.
    pub size_pt: f64,
}

impl FontSpec {
    /// Apply a style string made of `B` (bold) and `I` (italic) letters.
    pub fn with_style(mut self, style: &str) -> Result<Self, ScanLayerError> {
        self.bold = false;
        self.italic = false;
        for c in style.trim().chars() {
            match c.to_ascii_uppercase() {
                'B' => self.bold = true,
                'I' => self.italic = true,
                _ => {
                    return Err(ScanLayerError::Configuration(format!(
                        "unknown font style '{style}' (expected a combination of B and I)"
                    )));
                }
            }
        }
        Ok(self)
    }

    /// Font size converted to millimetres, the document's page unit.
    pub fn size_mm(&self) -> f64 {
        self.size_pt * MM_PER_PT
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: FontFamily::Helvetica,
            bold: false,
            italic: false,
            size_pt: 10.0,
        }
    }
}

/// Millimetres per PostScript point.
pub const MM_PER_PT: f64 = 25.4 / 72.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paper_sizes_parse_by_name() {
        assert_eq!("A4".parse::<PaperSize>().unwrap(), PaperSize::A4);
        assert_eq!("pa4".parse::<PaperSize>().unwrap().dimensions_mm(), (210, 280));
        assert_eq!("c4".parse::<PaperSize>().unwrap().dimensions_mm(), (229, 324));
    }

    #[test]
    fn paper_sizes_parse_custom() {
        let size: PaperSize = "100x150".parse().unwrap();
        assert_eq!(size.dimensions_mm(), (100, 150));
        assert_eq!(size.to_string(), "100x150");
        assert!("0x150".parse::<PaperSize>().is_err());
        assert!("b7".parse::<PaperSize>().is_err());
    }

    #[test]
    fn paper_size_round_trips_through_json_as_string() {
        let json = serde_json::to_string(&PaperSize::Letter).unwrap();
        assert_eq!(json, "\"letter\"");
        let back: PaperSize = serde_json::from_str("\"legal\"").unwrap();
        assert_eq!(back, PaperSize::Legal);
    }

    #[test]
    fn unknown_tokens_are_configuration_errors() {
        assert!(matches!(
            "sideways".parse::<Orientation>(),
            Err(ScanLayerError::Configuration(_))
        ));
        assert!(matches!(
            "stretch".parse::<ScalingMode>(),
            Err(ScanLayerError::Configuration(_))
        ));
        assert!(matches!(
            "tiff".parse::<OutputFormat>(),
            Err(ScanLayerError::Configuration(_))
        ));
    }

    #[test]
    fn auto_format_keeps_embeddable_native_encoding() {
        assert_eq!(OutputFormat::Auto.resolve(&ImageEncoding::Jpeg), EmbedFormat::Jpg);
        assert_eq!(OutputFormat::Auto.resolve(&ImageEncoding::Png), EmbedFormat::Png);
    }

    #[test]
    fn auto_format_falls_back_to_png() {
        let tiff = ImageEncoding::Other("tiff".into());
        assert_eq!(OutputFormat::Auto.resolve(&tiff), EmbedFormat::Png);
    }

    #[test]
    fn explicit_format_overrides_native_encoding() {
        for native in [
            ImageEncoding::Jpeg,
            ImageEncoding::Png,
            ImageEncoding::Other("bmp".into()),
        ] {
            assert_eq!(OutputFormat::Png.resolve(&native), EmbedFormat::Png);
            assert_eq!(OutputFormat::Jpg.resolve(&native), EmbedFormat::Jpg);
        }
    }

    #[test]
    fn font_style_letters() {
        let spec = FontSpec::default().with_style("BI").unwrap();
        assert!(spec.bold && spec.italic);
        let spec = FontSpec::default().with_style("").unwrap();
        assert!(!spec.bold && !spec.italic);
        assert!(FontSpec::default().with_style("U").is_err());
    }

    #[test]
    fn font_family_aliases() {
        assert_eq!("Arial".parse::<FontFamily>().unwrap(), FontFamily::Helvetica);
        assert_eq!("Courier New".parse::<FontFamily>().unwrap(), FontFamily::Courier);
    }

    #[test]
    fn ten_point_font_in_millimetres() {
        let spec = FontSpec::default();
        assert!((spec.size_mm() - 3.527_777).abs() < 1e-4);
    }
}
