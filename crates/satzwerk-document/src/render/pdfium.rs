// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDFium rasteriser (requires the "pdfium" feature and a PDFium shared library
// at runtime).
//
// Binding happens in `open`, at the start of the raster strategy. A missing
// library is therefore an ordinary strategy failure. The bound library is
// dropped together with the session.

use std::path::{Path, PathBuf};

use pdfium_render::prelude::*;
use satzwerk_core::DocumentFormat;
use tracing::{debug, info, instrument};

use crate::adapters::{BackendError, RasterPage, RasterRenderer, RenderSession};
use crate::render::encode_png;

/// Renders PDF pages through PDFium.
#[derive(Debug, Clone, Default)]
pub struct PdfiumRenderer {
    /// Directory holding the PDFium library; system search path when `None`.
    library_dir: Option<PathBuf>,
}

impl PdfiumRenderer {
    pub fn with_library_dir(library_dir: impl Into<PathBuf>) -> Self {
        Self {
            library_dir: Some(library_dir.into()),
        }
    }

    fn bind(&self) -> Result<Pdfium, BackendError> {
        let bindings = match &self.library_dir {
            Some(dir) => {
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
            }
            None => Pdfium::bind_to_system_library(),
        }
        .map_err(|err| BackendError(format!("PDFium library unavailable: {err}")))?;
        Ok(Pdfium::new(bindings))
    }
}

impl RasterRenderer for PdfiumRenderer {
    fn name(&self) -> &str {
        "pdfium"
    }

    fn supports(&self, format: DocumentFormat) -> bool {
        format == DocumentFormat::Pdf
    }

    #[instrument(skip_all, fields(path = %source.display()))]
    fn open(&self, source: &Path) -> Result<Box<dyn RenderSession>, BackendError> {
        let pdfium = self.bind()?;
        let bytes = std::fs::read(source)
            .map_err(|err| BackendError(format!("cannot read {}: {err}", source.display())))?;

        let page_count = pdfium
            .load_pdf_from_byte_slice(&bytes, None)
            .map_err(|err| BackendError(format!("PDFium could not load document: {err}")))?
            .pages()
            .len() as usize;

        info!(page_count, "PDFium session opened");
        Ok(Box::new(PdfiumSession {
            pdfium,
            bytes,
            page_count,
        }))
    }
}

/// Bound library plus the source bytes.
///
/// `PdfDocument` borrows from `Pdfium`, so the document is reloaded per page
/// instead of being stored next to the library it borrows.
struct PdfiumSession {
    pdfium: Pdfium,
    bytes: Vec<u8>,
    page_count: usize,
}

impl RenderSession for PdfiumSession {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn render_page(&mut self, page_index: usize, scale: f32) -> Result<RasterPage, BackendError> {
        let document = self
            .pdfium
            .load_pdf_from_byte_slice(&self.bytes, None)
            .map_err(|err| BackendError(format!("PDFium could not load document: {err}")))?;

        let index = page_index
            .try_into()
            .map_err(|_| BackendError(format!("page index {page_index} out of range")))?;
        let page = document
            .pages()
            .get(index)
            .map_err(|err| BackendError(format!("page {}: {err}", page_index + 1)))?;

        let target_width = (page.width().value * scale).round().max(1.0) as i32;
        let target_height = (page.height().value * scale).round().max(1.0) as i32;
        let config = PdfRenderConfig::new()
            .set_target_width(target_width)
            .set_maximum_height(target_height);

        let image = page
            .render_with_config(&config)
            .map_err(|err| BackendError(format!("page {}: {err}", page_index + 1)))?
            .as_image();

        debug!(page = page_index + 1, target_width, target_height, "Page rendered");
        encode_png(&image)
    }
}
