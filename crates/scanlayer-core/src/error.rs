// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Scanlayer.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all Scanlayer operations.
///
/// There is no retry or partial-success path: the first error raised by any
/// stage aborts the run.
#[derive(Debug, Error)]
pub enum ScanLayerError {
    // -- Configuration --
    #[error("invalid configuration: {0}")]
    Configuration(String),

    // -- Input --
    #[error("could not read image {}: {reason}", path.display())]
    ImageRead { path: PathBuf, reason: String },

    #[error("image processing failed: {0}")]
    Image(String),

    // -- Recognition --
    #[error("OCR engine failed to initialise: {0}")]
    EngineInit(String),

    #[error("OCR recognition failed: {0}")]
    Recognition(String),

    // -- Output --
    #[error("document composition failed: {0}")]
    Composition(String),

    /// Wraps an error raised while processing one input page.
    #[error("page {page} ({}): {source}", path.display())]
    Page {
        /// 1-based page number.
        page: usize,
        path: PathBuf,
        #[source]
        source: Box<ScanLayerError>,
    },

    // -- Storage --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ScanLayerError {
    /// Attach the page number and input path to this error.
    ///
    /// Errors that already carry page context are returned unchanged.
    pub fn in_page(self, page: usize, path: impl Into<PathBuf>) -> Self {
        match self {
            err @ Self::Page { .. } => err,
            err => Self::Page {
                page,
                path: path.into(),
                source: Box::new(err),
            },
        }
    }

    /// The innermost error, looking through page context.
    pub fn root(&self) -> &ScanLayerError {
        match self {
            Self::Page { source, .. } => source.root(),
            err => err,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ScanLayerError>;
