// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — page count and per-page text of existing PDF documents using
// the `lopdf` crate.

use std::fmt;
use std::path::Path;

use lopdf::Document;
use satzwerk_core::error::{ConvertError, Result};
use satzwerk_core::{ExtractedText, TextBlock};
use tracing::{debug, info, instrument, warn};

use crate::adapters::TextExtractor;

/// Wraps `lopdf::Document` for text extraction.
pub struct PdfReader {
    document: Document,
    /// Source path, if opened from a file (useful for diagnostics).
    source_path: Option<String>,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_ref = path.as_ref();
        info!("Opening PDF: {}", path_ref.display());

        let document = Document::load(path_ref).map_err(|err| {
            ConvertError::Extraction(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");

        Ok(Self {
            document,
            source_path: Some(path_ref.display().to_string()),
        })
    }

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data).map_err(|err| {
            ConvertError::Extraction(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self {
            document,
            source_path: None,
        })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Return the source path if the reader was created via [`PdfReader::open`].
    pub fn source_path(&self) -> Option<&str> {
        self.source_path.as_deref()
    }

    // -- Extraction -----------------------------------------------------------

    /// One block per page, in page order, tagged with the 1-indexed page.
    ///
    /// A page whose content streams cannot be decoded yields an empty block
    /// and is listed in `unreadable_pages` rather than failing the document.
    pub fn extract_pages(&self) -> ExtractedText {
        let mut page_numbers: Vec<u32> = self.document.get_pages().keys().copied().collect();
        page_numbers.sort_unstable();

        let pages = page_numbers.into_iter().map(|page_number| {
            (
                page_number as usize,
                self.document.extract_text(&[page_number]),
            )
        });
        let mut extracted = collect_pages(self.source_path().unwrap_or("<memory>"), pages);
        extracted.page_count = Some(self.page_count());
        extracted
    }
}

/// Assemble per-page extraction results, blanking and recording failed pages.
fn collect_pages<E: fmt::Display>(
    source: &str,
    pages: impl IntoIterator<Item = (usize, std::result::Result<String, E>)>,
) -> ExtractedText {
    let mut extracted = ExtractedText::default();
    for (page, text) in pages {
        let text = text.unwrap_or_else(|err| {
            warn!(page, source, %err, "Cannot extract page text, leaving it blank");
            extracted.unreadable_pages.push(page);
            String::new()
        });
        extracted.blocks.push(TextBlock::with_source_index(text, page));
    }
    extracted
}

/// [`TextExtractor`] for PDF sources.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, source: &Path) -> Result<ExtractedText> {
        Ok(PdfReader::open(source)?.extract_pages())
    }
}
