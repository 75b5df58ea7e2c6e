// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Plain-text sources.

use std::path::Path;

use satzwerk_core::error::{ConvertError, Result};
use satzwerk_core::{ExtractedText, TextBlock};
use tracing::debug;

use crate::adapters::TextExtractor;

/// Reads a text file and splits it into paragraphs at blank lines.
///
/// Invalid UTF-8 is replaced rather than rejected; plain text has no page
/// count.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub fn blocks_from_str(text: &str) -> Vec<TextBlock> {
        let normalized = text.replace("\r\n", "\n");
        let mut blocks = Vec::new();
        let mut current: Vec<&str> = Vec::new();

        for line in normalized.split('\n') {
            if line.trim().is_empty() {
                if !current.is_empty() {
                    blocks.push(TextBlock::new(current.join("\n")));
                    current.clear();
                }
            } else {
                current.push(line);
            }
        }
        if !current.is_empty() {
            blocks.push(TextBlock::new(current.join("\n")));
        }
        blocks
    }
}

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, source: &Path) -> Result<ExtractedText> {
        let bytes = std::fs::read(source).map_err(|err| {
            ConvertError::Extraction(format!("cannot read {}: {err}", source.display()))
        })?;
        let text = String::from_utf8_lossy(&bytes);
        let blocks = Self::blocks_from_str(&text);
        debug!(paragraphs = blocks.len(), path = %source.display(), "Plain text read");
        Ok(ExtractedText {
            blocks,
            page_count: None,
            ..ExtractedText::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn splits_paragraphs_on_blank_lines() {
        let blocks = PlainTextExtractor::blocks_from_str("one\ntwo\r\n\r\n  \nthree\n\n");
        let texts: Vec<&str> = blocks.iter().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, vec!["one\ntwo", "three"]);
        assert!(blocks.iter().all(|b| b.source_index.is_none()));
    }

    #[test]
    fn empty_file_has_no_blocks() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"").unwrap();
        let extracted = PlainTextExtractor.extract(file.path()).unwrap();
        assert!(extracted.blocks.is_empty());
        assert_eq!(extracted.page_count, None);
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"caf\xe9 au lait").unwrap();
        let extracted = PlainTextExtractor.extract(file.path()).unwrap();
        assert_eq!(extracted.blocks.len(), 1);
        assert!(extracted.blocks[0].text.starts_with("caf"));
    }

    #[test]
    fn missing_file_is_an_extraction_error() {
        let result = PlainTextExtractor.extract(Path::new("/nonexistent/notes.txt"));
        assert!(matches!(result, Err(ConvertError::Extraction(_))));
    }
}
