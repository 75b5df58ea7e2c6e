// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// satzwerk-document — Layout and slide generation for the Satzwerk converter.
//
// Flows extracted text onto fixed-size pages (sanitise, measured word wrap,
// pagination) and turns source documents into slide decks, rasterising pages
// when a rendering backend is available and falling back to text slides when
// it is not. Format adapters for PDF, DOCX, PPTX and plain text sit behind the
// traits in `adapters`.

pub mod adapters;
pub mod cancel;
pub mod convert;
pub mod docx;
pub mod metrics;
pub(crate) mod ooxml;
pub mod paginate;
pub mod pdf;
pub mod plain;
pub mod pptx;
pub mod render;
pub mod sanitize;
pub mod slides;
pub mod wrap;

// Re-export the primary types so callers can use `satzwerk_document::Converter` etc.
pub use adapters::{
    PageSerializer, RasterRenderer, RenderSession, SlideSerializer, SlideTextExtractor,
    TextExtractor,
};
pub use cancel::CancelFlag;
pub use convert::Converter;
pub use docx::DocxTextExtractor;
pub use metrics::{BuiltinMetrics, MetricsProvider};
pub use paginate::{Paginator, Section};
pub use pdf::{PdfReader, PdfTextExtractor, PdfWriter};
pub use plain::PlainTextExtractor;
pub use pptx::{PptxReader, PptxWriter};
pub use render::{UnavailableRenderer, default_renderer};
pub use sanitize::Sanitizer;
pub use slides::text::PageEstimator;
pub use slides::{SlideGenerator, SlideSet, SlideSource, StrategyFailure};
pub use wrap::WordWrapper;

#[cfg(feature = "pdfium")]
pub use render::pdfium::PdfiumRenderer;
