// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the command line.
//
// Every error is mapped to a one-line summary plus a concrete suggestion, so
// a failed run tells the user what to change before trying again.

use crate::error::ScanLayerError;

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// One-line summary.
    pub message: String,
    /// What the user should try next.
    pub suggestion: String,
}

/// Convert a `ScanLayerError` into a `HumanError`.
///
/// Page context is looked through; the message names the page when present.
pub fn humanize_error(err: &ScanLayerError) -> HumanError {
    let location = match err {
        ScanLayerError::Page { page, path, .. } => {
            format!(" (page {page}, {})", path.display())
        }
        _ => String::new(),
    };

    match err.root() {
        ScanLayerError::Configuration(detail) => HumanError {
            message: format!("The options given don't make sense: {detail}"),
            suggestion: "Run with --help to see the accepted values.".into(),
        },

        ScanLayerError::ImageRead { path, reason } => HumanError {
            message: format!("Couldn't read the image {}.", path.display()),
            suggestion: format!(
                "Check the file exists and is a JPEG, PNG, TIFF or BMP image. ({reason})"
            ),
        },

        ScanLayerError::Image(detail) => HumanError {
            message: format!("Couldn't process the image{location}."),
            suggestion: format!("The image may be corrupt or unusually large. ({detail})"),
        },

        ScanLayerError::EngineInit(detail) => {
            if detail.contains("not found") {
                HumanError {
                    message: "The OCR models are missing.".into(),
                    suggestion: "Download text-detection.rten and text-recognition.rten \
                                 and pass their directory with --model-dir."
                        .into(),
                }
            } else {
                HumanError {
                    message: "The OCR engine couldn't start.".into(),
                    suggestion: format!("The model files may be damaged. ({detail})"),
                }
            }
        }

        ScanLayerError::Recognition(detail) => HumanError {
            message: format!("Text recognition failed{location}."),
            suggestion: format!(
                "Try a cleaner scan, or a different --contrast value. ({detail})"
            ),
        },

        ScanLayerError::Composition(detail) => HumanError {
            message: format!("Couldn't build the PDF{location}."),
            suggestion: format!("Try --format png. ({detail})"),
        },

        ScanLayerError::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::AlreadyExists => HumanError {
                message: "The output file already exists.".into(),
                suggestion: "Pick another name with --output, or pass --force to overwrite it."
                    .into(),
            },
            std::io::ErrorKind::PermissionDenied => HumanError {
                message: "Permission denied.".into(),
                suggestion: "Check you can write to the output folder.".into(),
            },
            _ => HumanError {
                message: format!("A file couldn't be read or written{location}."),
                suggestion: format!("Check the disk isn't full. ({io_err})"),
            },
        },

        ScanLayerError::Serialization(detail) => HumanError {
            message: "The config file couldn't be parsed.".into(),
            suggestion: format!("Check the JSON syntax and option names. ({detail})"),
        },

        // `root()` never returns page context.
        ScanLayerError::Page { source, .. } => humanize_error(source),
    }
}
