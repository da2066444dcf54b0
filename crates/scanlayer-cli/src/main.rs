// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanlayer — turn scanned page images into a searchable PDF.
//
// Entry point. Parses options, initialises logging, loads the OCR engine, and
// runs the page pipeline into the output file.

mod cli;
mod output;

use std::io::BufWriter;
use std::process::ExitCode;

use clap::Parser;
use scanlayer_core::error::Result;
use scanlayer_core::human_errors::humanize_error;
use scanlayer_document::pipeline;
use scanlayer_document::{OcrConfig, OcrEngine, PdfWriter};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cli::Cli;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_logging(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "scanlayer failed");
            let human = humanize_error(&err);
            eprintln!("error: {}", human.message);
            eprintln!("  {}", human.suggestion);
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` when set; otherwise `--debug`, then `--verbose`, pick the level.
fn init_logging(cli: &Cli) {
    let default_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.document_config()?;
    let plan = output::plan(&cli.inputs, cli.output.as_deref())?;

    let ocr_config = match &cli.model_dir {
        Some(dir) => OcrConfig::from_dir(dir),
        None => OcrConfig::default(),
    };
    let mut engine = OcrEngine::new(&ocr_config)?;

    let file = output::create(&plan.output, cli.force)?;
    let mut out = BufWriter::new(file);

    info!(
        pages = plan.pages.len(),
        output = %plan.output.display(),
        "Converting"
    );
    let pages = pipeline::run(&plan.pages, config, &mut engine, PdfWriter::new(), &mut out)?;
    info!(pages, output = %plan.output.display(), "Wrote searchable PDF");
    Ok(())
}
