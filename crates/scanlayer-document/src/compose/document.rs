// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document — a multi-page layered document, built page by page and flushed
// exactly once.

use std::io::Write;

use scanlayer_core::DocumentConfig;
use scanlayer_core::error::Result;
use tracing::{info, instrument};

use super::page::{PageAssembler, PageLayers};
use crate::image::ScanImage;
use crate::layout::{PageGeometry, Word};
use crate::pdf::traits::DocumentWriter;

/// A document under construction.
///
/// Creating the document applies the configuration to the writer (font,
/// metadata, compression) and declares the layers. `finish` consumes the
/// document, so it cannot be flushed twice or extended afterwards.
pub struct Document<W: DocumentWriter> {
    writer: W,
    config: DocumentConfig,
    assembler: PageAssembler,
    pages: usize,
}

impl<W: DocumentWriter> Document<W> {
    pub fn new(mut writer: W, config: DocumentConfig) -> Result<Self> {
        config.validate()?;
        writer.set_font(&config.font);
        writer.set_metadata(&config.metadata);
        writer.set_compression(config.compress);
        let layers = PageLayers::declare(&mut writer);
        let assembler = PageAssembler::new(layers, &config);
        Ok(Self {
            writer,
            config,
            assembler,
            pages: 0,
        })
    }

    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    pub fn page_count(&self) -> usize {
        self.pages
    }

    /// Append a page showing `image` with `words` laid over it.
    pub fn add_page(&mut self, image: &ScanImage, words: &[Word]) -> Result<PageGeometry> {
        let page_no = self.pages + 1;
        let geometry =
            self.assembler
                .assemble(&mut self.writer, &self.config, page_no, image, words)?;
        self.pages = page_no;
        Ok(geometry)
    }

    /// Serialise the document to `out`.
    #[instrument(skip_all, fields(pages = self.pages))]
    pub fn finish(self, out: &mut dyn Write) -> Result<()> {
        self.writer.finish(out)?;
        info!("Document finished");
        Ok(())
    }

    /// The underlying writer.
    pub fn writer(&self) -> &W {
        &self.writer
    }
}
