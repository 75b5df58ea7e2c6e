// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Collaborator traits at the edges of the layout pipeline.
//
// Extraction of source containers and serialisation of target containers live
// behind these traits; the engine only ever sees `TextBlock`s coming in and
// `Page`s or `Slide`s going out.

use std::path::Path;

use satzwerk_core::error::Result;
use satzwerk_core::{DocumentFormat, ExtractedText, Page, PageGeometry, Slide, TextBlock};
use thiserror::Error;

/// Pull flowed paragraphs (and a page count, if known) out of a source file.
///
/// Failures are reported as `ConvertError::Extraction`.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, source: &Path) -> Result<ExtractedText>;
}

/// Pull one text block per slide out of a slide deck, in slide order.
pub trait SlideTextExtractor: Send + Sync {
    fn extract_slides(&self, source: &Path) -> Result<Vec<TextBlock>>;
}

/// Write pages into a paginated target container.
pub trait PageSerializer: Send + Sync {
    fn serialize(
        &self,
        pages: &[Page],
        geometry: &PageGeometry,
        title: Option<&str>,
    ) -> Result<Vec<u8>>;
}

/// Write slides into a slide deck container.
pub trait SlideSerializer: Send + Sync {
    fn serialize(&self, slides: &[Slide]) -> Result<Vec<u8>>;
}

// ---------------------------------------------------------------------------
// Raster rendering
// ---------------------------------------------------------------------------

/// Failure inside a rendering backend. Only ever seen by the raster strategy,
/// which turns it into a fallback.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct BackendError(pub String);

/// One rendered source page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterPage {
    /// PNG-encoded pixels.
    pub png_bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// A rasterising backend, which may be missing at runtime.
pub trait RasterRenderer: Send + Sync {
    /// Backend name for logs.
    fn name(&self) -> &str;

    /// Whether this backend can render pages of `format`.
    fn supports(&self, format: DocumentFormat) -> bool;

    /// Acquire a backend handle for `source`.
    ///
    /// The handle is released when the returned session is dropped, so every
    /// exit path of the caller releases it.
    fn open(&self, source: &Path) -> std::result::Result<Box<dyn RenderSession>, BackendError>;
}

/// An open rendering handle for one source document.
pub trait RenderSession {
    fn page_count(&self) -> usize;

    /// Render the 0-indexed page at `scale` × its natural size.
    fn render_page(
        &mut self,
        page_index: usize,
        scale: f32,
    ) -> std::result::Result<RasterPage, BackendError>;
}
