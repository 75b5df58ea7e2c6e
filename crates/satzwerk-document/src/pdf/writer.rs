// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — serialises laid-out pages using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`. Every placed line becomes one text section at the
// position the paginator chose; no layout decisions are made here.

use printpdf::{
    BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt, TextItem,
};
use satzwerk_core::error::{ConvertError, Result};
use satzwerk_core::{FontFamily, LineRole, PT_PER_MM, Page, PageGeometry};
use tracing::{debug, info, instrument, warn};

use crate::adapters::PageSerializer;

/// Writes pages with one of the PDF base-14 fonts.
///
/// The font must match the metrics the lines were wrapped with, or measured
/// widths will not match what is drawn.
#[derive(Debug, Clone, Copy)]
pub struct PdfWriter {
    font: FontFamily,
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new(FontFamily::Helvetica)
    }
}

impl PdfWriter {
    pub fn new(font: FontFamily) -> Self {
        Self { font }
    }

    fn builtin_font(&self) -> BuiltinFont {
        match self.font {
            FontFamily::Helvetica => BuiltinFont::Helvetica,
            FontFamily::Courier => BuiltinFont::Courier,
        }
    }

    /// Operations drawing every line of one page.
    fn page_ops(&self, page: &Page, geometry: &PageGeometry) -> Vec<Op> {
        let font = self.builtin_font();
        let mut ops: Vec<Op> = Vec::with_capacity(page.lines.len() * 5);

        for placed in page.lines.iter().filter(|l| l.role != LineRole::Gap) {
            let size = match placed.role {
                LineRole::Title => geometry.title_font_size,
                _ => geometry.font_size,
            };

            ops.push(Op::StartTextSection);
            ops.push(Op::SetTextCursor {
                pos: Point {
                    x: Pt(placed.x),
                    y: Pt(placed.y),
                },
            });
            ops.push(Op::SetFontSizeBuiltinFont {
                size: Pt(size),
                font,
            });
            ops.push(Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text(placed.line.text.clone())],
                font,
            });
            ops.push(Op::EndTextSection);
        }

        ops
    }
}

impl PageSerializer for PdfWriter {
    #[instrument(skip_all, fields(pages = pages.len()))]
    fn serialize(
        &self,
        pages: &[Page],
        geometry: &PageGeometry,
        title: Option<&str>,
    ) -> Result<Vec<u8>> {
        if pages.is_empty() {
            return Err(ConvertError::Serialization(
                "a PDF needs at least one page".into(),
            ));
        }

        let title = title.unwrap_or("Satzwerk Document");
        info!(font = ?self.font, title, "Writing PDF");

        let page_w = Mm(geometry.width / PT_PER_MM);
        let page_h = Mm(geometry.height / PT_PER_MM);

        let mut doc = PdfDocument::new(title);
        let pdf_pages: Vec<PdfPage> = pages
            .iter()
            .map(|page| PdfPage::new(page_w, page_h, self.page_ops(page, geometry)))
            .collect();
        doc.with_pages(pdf_pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            warn!(count = warnings.len(), "printpdf reported warnings while saving");
        }

        debug!(pages = pages.len(), bytes = output.len(), "PDF serialised");
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use satzwerk_core::{LayoutLine, PlacedLine};

    fn geometry() -> PageGeometry {
        satzwerk_core::ConversionOptions::default().geometry()
    }

    fn page(index: usize, lines: &[&str]) -> Page {
        let geometry = geometry();
        Page {
            index,
            lines: lines
                .iter()
                .enumerate()
                .map(|(i, text)| PlacedLine {
                    line: LayoutLine::new(*text, 10.0),
                    x: geometry.margin_left,
                    y: geometry.height - geometry.margin_top - i as f32 * geometry.line_height,
                    advance: geometry.line_height,
                    role: if i == 0 { LineRole::Title } else { LineRole::Body },
                })
                .collect(),
        }
    }

    #[test]
    fn writes_one_pdf_page_per_page() {
        let pages = vec![page(0, &["Title", "body"]), page(1, &["more"])];
        let bytes = PdfWriter::default()
            .serialize(&pages, &geometry(), Some("Doc"))
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));

        let reloaded = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(reloaded.get_pages().len(), 2);
    }

    #[test]
    fn empty_page_list_is_a_serialization_error() {
        let result = PdfWriter::default().serialize(&[], &geometry(), None);
        assert!(matches!(result, Err(ConvertError::Serialization(_))));
    }

    #[test]
    fn gaps_emit_no_text_ops() {
        let geometry = geometry();
        let mut blank = page(0, &["x"]);
        blank.lines.push(PlacedLine {
            line: LayoutLine::blank(),
            x: geometry.margin_left,
            y: 500.0,
            advance: geometry.line_height / 2.0,
            role: LineRole::Gap,
        });
        let ops = PdfWriter::default().page_ops(&blank, &geometry);
        assert_eq!(ops.len(), 5);
    }
}
