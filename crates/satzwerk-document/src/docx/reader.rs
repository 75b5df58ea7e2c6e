// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// DOCX reader — paragraph text from `word/document.xml`, page count from the
// extended properties part when the authoring application recorded one.

use std::path::Path;

use satzwerk_core::error::{ConvertError, Result};
use satzwerk_core::{ExtractedText, TextBlock};
use tracing::{debug, instrument};

use crate::adapters::TextExtractor;
use crate::ooxml::{self, OoxmlPackage};

const DOCUMENT_PART: &str = "word/document.xml";
const APP_PROPERTIES_PART: &str = "docProps/app.xml";

#[derive(Debug, Clone, Copy, Default)]
pub struct DocxTextExtractor;

impl DocxTextExtractor {
    /// Blocks for every paragraph of a `document.xml` body, empty ones
    /// included so paragraph spacing survives.
    pub fn blocks_from_xml(xml: &str) -> Result<Vec<TextBlock>> {
        Ok(ooxml::paragraphs(xml)?
            .into_iter()
            .map(TextBlock::new)
            .collect())
    }
}

impl TextExtractor for DocxTextExtractor {
    #[instrument(skip_all, fields(path = %source.display()))]
    fn extract(&self, source: &Path) -> Result<ExtractedText> {
        let mut package = OoxmlPackage::open(source)?;
        if !package.has_part(DOCUMENT_PART) {
            return Err(ConvertError::Extraction(format!(
                "{} has no {DOCUMENT_PART}; not a Word document",
                source.display()
            )));
        }

        let blocks = Self::blocks_from_xml(&package.read_part(DOCUMENT_PART)?)?;

        // Extended properties are optional; a missing or stale value only
        // means the caller estimates instead.
        let page_count = if package.has_part(APP_PROPERTIES_PART) {
            package
                .read_part(APP_PROPERTIES_PART)
                .ok()
                .and_then(|xml| ooxml::element_text(&xml, b"Pages"))
                .and_then(|pages| pages.trim().parse::<usize>().ok())
                .filter(|pages| *pages > 0)
        } else {
            None
        };

        debug!(paragraphs = blocks.len(), ?page_count, "DOCX text extracted");
        Ok(ExtractedText {
            blocks,
            page_count,
            ..ExtractedText::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn write_docx(parts: &[(&str, &str)]) -> tempfile::NamedTempFile {
        let file = tempfile::Builder::new().suffix(".docx").tempfile().unwrap();
        let mut zip = zip::ZipWriter::new(file.reopen().unwrap());
        for (name, body) in parts {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
        file
    }

    const BODY: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>
<w:p><w:r><w:t>Quarterly report</w:t></w:r></w:p>
<w:p/>
<w:p><w:r><w:t xml:space="preserve">Revenue </w:t></w:r><w:r><w:t>grew.</w:t></w:r></w:p>
</w:body></w:document>"#;

    #[test]
    fn extracts_paragraphs_and_page_count() {
        let docx = write_docx(&[
            ("word/document.xml", BODY),
            ("docProps/app.xml", "<Properties><Pages>3</Pages></Properties>"),
        ]);
        let extracted = DocxTextExtractor.extract(docx.path()).unwrap();
        let texts: Vec<&str> = extracted.blocks.iter().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, vec!["Quarterly report", "", "Revenue grew."]);
        assert_eq!(extracted.page_count, Some(3));
    }

    #[test]
    fn page_count_is_optional() {
        let docx = write_docx(&[("word/document.xml", BODY)]);
        let extracted = DocxTextExtractor.extract(docx.path()).unwrap();
        assert_eq!(extracted.page_count, None);
    }

    #[test]
    fn zip_without_document_part_is_rejected() {
        let docx = write_docx(&[("other.xml", "<x/>")]);
        let result = DocxTextExtractor.extract(docx.path());
        assert!(matches!(result, Err(ConvertError::Extraction(_))));
    }

    #[test]
    fn non_zip_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"plain words").unwrap();
        let result = DocxTextExtractor.extract(file.path());
        assert!(matches!(result, Err(ConvertError::Extraction(_))));
    }
}
