// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Satzwerk layout pipeline.
//
// Every value here lives inside a single conversion run: created by one stage,
// handed by value to the next, and dropped when the run returns.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Points per millimetre (1 in = 25.4 mm = 72 pt).
pub const PT_PER_MM: f32 = 72.0 / 25.4;

/// Document container formats the engine converts between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Pptx,
    PlainText,
}

impl DocumentFormat {
    /// Canonical file extension (without the dot).
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Pptx => "pptx",
            Self::PlainText => "txt",
        }
    }

    /// Infer the format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "pptx" => Some(Self::Pptx),
            "txt" | "text" => Some(Self::PlainText),
            _ => None,
        }
    }

    /// Whether the format is a slide deck rather than flowed pages.
    pub fn is_slide_deck(&self) -> bool {
        matches!(self, Self::Pptx)
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Standard paper size presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom { width_mm: u32, height_mm: u32 },
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::A3 => (297, 420),
            Self::A5 => (148, 210),
            Self::Letter => (216, 279),
            Self::Legal => (216, 356),
            Self::Tabloid => (279, 432),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }

    /// Dimensions in PDF points (width, height).
    pub fn dimensions_pt(&self) -> (f32, f32) {
        let (w, h) = self.dimensions_mm();
        (w as f32 * PT_PER_MM, h as f32 * PT_PER_MM)
    }
}

// -- Extraction ---------------------------------------------------------------

/// One paragraph or slide text run pulled out of a source container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlock {
    pub text: String,
    /// Originating page or slide (1-indexed) when the source is paginated.
    pub source_index: Option<usize>,
}

impl TextBlock {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_index: None,
        }
    }

    pub fn with_source_index(text: impl Into<String>, source_index: usize) -> Self {
        Self {
            text: text.into(),
            source_index: Some(source_index),
        }
    }
}

/// Everything a flowed-text extractor returns for one source file.
#[derive(Debug, Clone, Default)]
pub struct ExtractedText {
    pub blocks: Vec<TextBlock>,
    /// Page count reported by the source container, when it knows one.
    pub page_count: Option<usize>,
    /// Pages (1-indexed) whose text could not be read; their blocks are empty.
    pub unreadable_pages: Vec<usize>,
}

/// A [`TextBlock`] whose text is restricted to the output encoding.
///
/// Line breaks inside the block survive as `'\n'`; blocks are never merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedBlock {
    pub text: String,
    pub source_index: Option<usize>,
}

impl SanitizedBlock {
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

// -- Layout -------------------------------------------------------------------

/// One wrapped line with its measured width in points.
///
/// `measured_width <= content_width` unless the line is a single word that
/// cannot fit on any line. An empty `text` marks a paragraph gap.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutLine {
    pub text: String,
    pub measured_width: f32,
}

impl LayoutLine {
    pub fn new(text: impl Into<String>, measured_width: f32) -> Self {
        Self {
            text: text.into(),
            measured_width,
        }
    }

    /// A paragraph gap; paginated at half the body line height.
    pub fn blank() -> Self {
        Self {
            text: String::new(),
            measured_width: 0.0,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }
}

/// Page geometry in PDF points. Fixed for the duration of one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub font_size: f32,
    pub line_height: f32,
    pub title_font_size: f32,
    pub title_line_height: f32,
}

impl PageGeometry {
    /// Horizontal room between the left and right margins.
    pub fn content_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }

    /// Vertical room between the top and bottom margins.
    pub fn usable_height(&self) -> f32 {
        self.height - self.margin_top - self.margin_bottom
    }

    /// Reject geometry on which the paginator could never place a line.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConvertError;

        let values = [
            self.width,
            self.height,
            self.margin_top,
            self.margin_bottom,
            self.margin_left,
            self.margin_right,
            self.font_size,
            self.line_height,
            self.title_font_size,
            self.title_line_height,
        ];
        if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(ConvertError::InvalidGeometry(
                "dimensions must be finite and non-negative".into(),
            ));
        }
        if self.line_height <= 0.0 || self.font_size <= 0.0 {
            return Err(ConvertError::InvalidGeometry(
                "font size and line height must be positive".into(),
            ));
        }
        if self.content_width() <= 0.0 {
            return Err(ConvertError::InvalidGeometry(format!(
                "margins leave no content width on a {}pt wide page",
                self.width
            )));
        }
        let tallest = self.line_height.max(self.title_line_height);
        if self.usable_height() < tallest {
            return Err(ConvertError::InvalidGeometry(format!(
                "usable height {:.1}pt cannot hold a {:.1}pt line",
                self.usable_height(),
                tallest
            )));
        }
        Ok(())
    }
}

/// What a placed line represents on its page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineRole {
    Title,
    Body,
    /// Paragraph gap: no glyphs, half a body line of vertical space.
    Gap,
}

/// A line positioned on a page. `y` is the baseline, measured from the page
/// bottom as PDF does.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub line: LayoutLine,
    pub x: f32,
    pub y: f32,
    /// Vertical space this line consumed.
    pub advance: f32,
    pub role: LineRole,
}

/// A sealed page of placed lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// 0-indexed position in the output document.
    pub index: usize,
    pub lines: Vec<PlacedLine>,
}

impl Page {
    /// Total vertical space consumed by this page's lines.
    pub fn consumed_height(&self) -> f32 {
        self.lines.iter().map(|l| l.advance).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// -- Slides -------------------------------------------------------------------

/// Slide canvas in points (13.333 in × 7.5 in, 16:9).
pub const SLIDE_WIDTH_PT: f32 = 960.0;
pub const SLIDE_HEIGHT_PT: f32 = 540.0;

/// Placement of an image on the slide canvas, in points from the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlideFrame {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Which slide generation strategy produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    Raster,
    Text,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raster => f.write_str("Raster"),
            Self::Text => f.write_str("Text"),
        }
    }
}

/// One output slide. A single run only ever produces one variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Slide {
    Image {
        index: usize,
        /// PNG-encoded page raster.
        raster_bytes: Vec<u8>,
        /// Raster dimensions in pixels.
        width: u32,
        height: u32,
        frame: SlideFrame,
    },
    Text {
        index: usize,
        title: Option<String>,
        body_lines: Vec<String>,
    },
}

impl Slide {
    pub fn index(&self) -> usize {
        match self {
            Self::Image { index, .. } | Self::Text { index, .. } => *index,
        }
    }

    /// The strategy that produces this variant.
    pub fn strategy(&self) -> Strategy {
        match self {
            Self::Image { .. } => Strategy::Raster,
            Self::Text { .. } => Strategy::Text,
        }
    }
}

// -- Results ------------------------------------------------------------------

/// Non-fatal conditions reported alongside a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversionWarning {
    /// The raster strategy failed and the whole run degraded to text slides.
    RasterFallback { reason: String },
    /// A slide had no extractable text; an informational line was used.
    PartialContent { slide: usize },
    /// The source yielded no text at all.
    EmptySource,
    /// The source reported no page count; the paginator's count was used.
    PageCountEstimated { pages: usize },
    /// A source page's text could not be extracted and was left blank.
    UnreadablePage { page: usize },
}

impl fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RasterFallback { reason } => {
                write!(f, "Text Strategy used: {reason}")
            }
            Self::PartialContent { slide } => {
                write!(f, "slide {slide} had no extractable text")
            }
            Self::EmptySource => f.write_str("source document contains no extractable text"),
            Self::PageCountEstimated { pages } => {
                write!(f, "source page count unknown; estimated {pages} from layout")
            }
            Self::UnreadablePage { page } => {
                write!(f, "page {page}: text could not be extracted; left blank")
            }
        }
    }
}

/// Outcome of one conversion run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionResult {
    pub output_path: PathBuf,
    /// Pages or slides written to the target.
    pub unit_count: usize,
    /// `None` for page targets, which never go through the slide generator.
    pub strategy_used: Option<Strategy>,
    pub warnings: Vec<ConversionWarning>,
}

impl ConversionResult {
    /// Warnings rendered as plain strings, in the order they were raised.
    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }

    /// JSON body for the REST layer.
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a4_geometry() -> PageGeometry {
        let (width, height) = PaperSize::A4.dimensions_pt();
        PageGeometry {
            width,
            height,
            margin_top: 56.7,
            margin_bottom: 56.7,
            margin_left: 56.7,
            margin_right: 56.7,
            font_size: 11.0,
            line_height: 14.0,
            title_font_size: 18.0,
            title_line_height: 24.0,
        }
    }

    #[test]
    fn format_round_trips_through_extension() {
        for format in [
            DocumentFormat::Pdf,
            DocumentFormat::Docx,
            DocumentFormat::Pptx,
            DocumentFormat::PlainText,
        ] {
            assert_eq!(DocumentFormat::from_extension(format.extension()), Some(format));
        }
        assert_eq!(DocumentFormat::from_extension("PDF"), Some(DocumentFormat::Pdf));
        assert_eq!(DocumentFormat::from_extension("odt"), None);
    }

    #[test]
    fn a4_points_are_close_to_595_by_842() {
        let (w, h) = PaperSize::A4.dimensions_pt();
        assert!((w - 595.3).abs() < 0.5);
        assert!((h - 841.9).abs() < 0.5);
    }

    #[test]
    fn valid_geometry_passes() {
        assert!(a4_geometry().validate().is_ok());
    }

    #[test]
    fn margins_swallowing_the_page_are_rejected() {
        let mut geometry = a4_geometry();
        geometry.margin_top = 420.0;
        geometry.margin_bottom = 420.0;
        assert!(geometry.validate().is_err());

        let mut geometry = a4_geometry();
        geometry.margin_left = 300.0;
        geometry.margin_right = 300.0;
        assert!(geometry.validate().is_err());
    }

    #[test]
    fn zero_line_height_is_rejected() {
        let mut geometry = a4_geometry();
        geometry.line_height = 0.0;
        assert!(geometry.validate().is_err());
    }

    #[test]
    fn slide_reports_its_strategy() {
        let slide = Slide::Text {
            index: 0,
            title: Some("Deck".into()),
            body_lines: Vec::new(),
        };
        assert_eq!(slide.strategy(), Strategy::Text);
        assert_eq!(slide.index(), 0);
    }

    #[test]
    fn fallback_warning_mentions_text_strategy() {
        let warning = ConversionWarning::RasterFallback {
            reason: "rendering backend unavailable".into(),
        };
        assert_eq!(
            warning.to_string(),
            "Text Strategy used: rendering backend unavailable"
        );
    }

    #[test]
    fn unreadable_page_warning_names_the_page() {
        let warning = ConversionWarning::UnreadablePage { page: 3 };
        assert_eq!(
            warning.to_string(),
            "page 3: text could not be extracted; left blank"
        );
        let result = ConversionResult {
            output_path: PathBuf::from("/tmp/out.pdf"),
            unit_count: 1,
            strategy_used: None,
            warnings: vec![warning],
        };
        assert!(result.to_json().unwrap().contains("UnreadablePage"));
        assert_eq!(result.warning_messages().len(), 1);
    }
}
