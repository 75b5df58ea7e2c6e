// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PPTX reader — per-slide text of PresentationML decks.

use std::path::Path;

use satzwerk_core::error::{ConvertError, Result};
use satzwerk_core::{ExtractedText, TextBlock};
use tracing::{debug, instrument};

use crate::adapters::{SlideTextExtractor, TextExtractor};
use crate::ooxml::{self, OoxmlPackage};

const SLIDE_PREFIX: &str = "ppt/slides/slide";

/// Slide number of a `ppt/slides/slideN.xml` part name.
fn slide_number(part: &str) -> Option<usize> {
    part.strip_prefix(SLIDE_PREFIX)?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}

/// Reads the text of every slide, one block per slide, in slide-number order.
///
/// Part names sort as strings (`slide10` before `slide2`), so ordering is by
/// the parsed number.
#[derive(Debug, Clone, Copy, Default)]
pub struct PptxReader;

impl PptxReader {
    /// One line per non-empty `a:p` of a slide part.
    pub fn slide_text(xml: &str) -> Result<String> {
        let lines: Vec<String> = ooxml::paragraphs(xml)?
            .into_iter()
            .filter(|p| !p.trim().is_empty())
            .collect();
        Ok(lines.join("\n"))
    }
}

impl SlideTextExtractor for PptxReader {
    #[instrument(skip_all, fields(path = %source.display()))]
    fn extract_slides(&self, source: &Path) -> Result<Vec<TextBlock>> {
        let mut package = OoxmlPackage::open(source)?;

        let mut slides: Vec<(usize, String)> = package
            .part_names()
            .into_iter()
            .filter_map(|name| slide_number(&name).map(|n| (n, name)))
            .collect();
        if slides.is_empty() && !package.has_part("ppt/presentation.xml") {
            return Err(ConvertError::Extraction(format!(
                "{} is not a PowerPoint presentation",
                source.display()
            )));
        }
        slides.sort_by_key(|(number, _)| *number);

        let mut blocks = Vec::with_capacity(slides.len());
        for (number, part) in slides {
            let text = Self::slide_text(&package.read_part(&part)?)?;
            blocks.push(TextBlock::with_source_index(text, number));
        }

        debug!(slides = blocks.len(), "PPTX slide text extracted");
        Ok(blocks)
    }
}

impl TextExtractor for PptxReader {
    fn extract(&self, source: &Path) -> Result<ExtractedText> {
        let blocks = self.extract_slides(source)?;
        Ok(ExtractedText {
            page_count: Some(blocks.len()).filter(|n| *n > 0),
            blocks,
            ..ExtractedText::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn slide_xml(paragraphs: &[&str]) -> String {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<a:p><a:r><a:t>{p}</a:t></a:r></a:p>"))
            .collect();
        format!(
            r#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree><p:sp><p:txBody>{body}</p:txBody></p:sp></p:spTree></p:cSld></p:sld>"#
        )
    }

    fn write_pptx(slides: &[(&str, String)]) -> tempfile::NamedTempFile {
        let file = tempfile::Builder::new().suffix(".pptx").tempfile().unwrap();
        let mut zip = zip::ZipWriter::new(file.reopen().unwrap());
        zip.start_file("ppt/presentation.xml", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"<p:presentation/>").unwrap();
        for (name, body) in slides {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
        file
    }

    #[test]
    fn parses_slide_numbers() {
        assert_eq!(slide_number("ppt/slides/slide12.xml"), Some(12));
        assert_eq!(slide_number("ppt/slides/_rels/slide1.xml.rels"), None);
        assert_eq!(slide_number("ppt/slideLayouts/slideLayout1.xml"), None);
    }

    #[test]
    fn orders_slides_numerically() {
        let pptx = write_pptx(&[
            ("ppt/slides/slide10.xml", slide_xml(&["ten"])),
            ("ppt/slides/slide2.xml", slide_xml(&["two", "", "more"])),
            ("ppt/slides/slide1.xml", slide_xml(&["one"])),
        ]);
        let blocks = PptxReader.extract_slides(pptx.path()).unwrap();
        let texts: Vec<&str> = blocks.iter().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two\nmore", "ten"]);
        assert_eq!(blocks[2].source_index, Some(10));
    }

    #[test]
    fn flowed_extraction_counts_slides_as_pages() {
        let pptx = write_pptx(&[
            ("ppt/slides/slide1.xml", slide_xml(&["a"])),
            ("ppt/slides/slide2.xml", slide_xml(&[])),
        ]);
        let extracted = PptxReader.extract(pptx.path()).unwrap();
        assert_eq!(extracted.page_count, Some(2));
        assert_eq!(extracted.blocks[1].text, "");
    }

    #[test]
    fn empty_deck_has_no_page_count() {
        let pptx = write_pptx(&[]);
        let extracted = PptxReader.extract(pptx.path()).unwrap();
        assert!(extracted.blocks.is_empty());
        assert_eq!(extracted.page_count, None);
    }
}
