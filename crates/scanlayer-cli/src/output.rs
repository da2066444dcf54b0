// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output file selection and creation.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use scanlayer_core::error::{Result, ScanLayerError};

/// The output path and the page images left once it is chosen.
#[derive(Debug, PartialEq)]
pub struct Plan {
    pub output: PathBuf,
    pub pages: Vec<PathBuf>,
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Decide where the document goes.
///
/// An explicit `output` wins. Otherwise a single `.pdf` among the inputs is
/// taken as the output, and failing that the first input with its extension
/// replaced by `.pdf`.
pub fn plan(inputs: &[PathBuf], output: Option<&Path>) -> Result<Plan> {
    let (named, pages): (Vec<PathBuf>, Vec<PathBuf>) =
        inputs.iter().cloned().partition(|path| is_pdf(path));

    let output = match (output, named.as_slice()) {
        (Some(explicit), []) => explicit.to_path_buf(),
        (Some(_), _) => {
            return Err(ScanLayerError::Configuration(
                "a .pdf input can't be combined with --output".into(),
            ));
        }
        (None, [single]) => single.clone(),
        (None, []) => match pages.first() {
            Some(first) => first.with_extension("pdf"),
            None => {
                return Err(ScanLayerError::Configuration(
                    "no input images given".into(),
                ));
            }
        },
        (None, _) => {
            return Err(ScanLayerError::Configuration(format!(
                "{} output files given, expected one",
                named.len()
            )));
        }
    };

    if pages.is_empty() {
        return Err(ScanLayerError::Configuration("no input images given".into()));
    }
    Ok(Plan { output, pages })
}

/// Open `path` for writing. Unless `force` is set an existing file is left
/// untouched and reported as `AlreadyExists`.
pub fn create(path: &Path, force: bool) -> Result<File> {
    let mut options = OpenOptions::new();
    options.write(true);
    if force {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }
    Ok(options.open(path)?)
}
