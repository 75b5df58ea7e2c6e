// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversion orchestration — one call per request from the command handlers.
//
// Paginated targets go through sanitise → wrap → paginate → serialise. Slide
// deck targets go through the slide generator. The output lands next to the
// source (or in `output_dir`) as `<stem>.<target extension>` and never
// replaces the source itself.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use satzwerk_core::error::{ConvertError, Result};
use satzwerk_core::{
    ConversionOptions, ConversionResult, ConversionWarning, DocumentFormat, SanitizedBlock,
};
use tracing::{debug, info, instrument, warn};

use crate::adapters::{
    PageSerializer, RasterRenderer, SlideSerializer, SlideTextExtractor, TextExtractor,
};
use crate::cancel::CancelFlag;
use crate::docx::DocxTextExtractor;
use crate::metrics::{BuiltinMetrics, MetricsProvider};
use crate::paginate::{Paginator, Section};
use crate::pdf::{PdfTextExtractor, PdfWriter};
use crate::plain::PlainTextExtractor;
use crate::pptx::{PptxReader, PptxWriter};
use crate::render::default_renderer;
use crate::sanitize::Sanitizer;
use crate::slides::text::PageEstimator;
use crate::slides::{SlideGenerator, SlideSource};
use crate::wrap::WordWrapper;

/// Drives one source document to one target format.
pub struct Converter {
    renderer: Option<Arc<dyn RasterRenderer>>,
    /// Overrides the builtin metrics for the configured font.
    metrics: Option<Arc<dyn MetricsProvider>>,
    cancel: CancelFlag,
}

impl std::fmt::Debug for Converter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Converter")
            .field("renderer", &self.renderer.as_ref().map(|r| r.name().to_string()))
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self {
            renderer: Some(default_renderer()),
            metrics: None,
            cancel: CancelFlag::new(),
        }
    }
}

impl Converter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn RasterRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Never attempt rasterisation; slide targets always use text slides.
    pub fn without_renderer(mut self) -> Self {
        self.renderer = None;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsProvider>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Handle for cancelling conversions run by this converter.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Convert `source` and write the target file.
    #[instrument(skip(self, source, options), fields(source = %source.display()))]
    pub fn convert(
        &self,
        source: &Path,
        from: DocumentFormat,
        to: DocumentFormat,
        options: &ConversionOptions,
    ) -> Result<ConversionResult> {
        self.cancel.check()?;

        let route = Route::for_pair(from, to)
            .ok_or(ConvertError::UnsupportedConversion { from, to })?;
        let output_path = output_path(source, to, options);
        if is_same_file(source, &output_path) {
            warn!(output = %output_path.display(), "Output would replace the source");
            return Err(ConvertError::Serialization(format!(
                "refusing to overwrite the source document {}; set an output directory",
                source.display()
            )));
        }

        let sanitizer = Sanitizer::new(options.layout.tab_width);
        let title = document_title(source, options, &sanitizer);
        let (bytes, unit_count, strategy_used, warnings) = match route {
            Route::Flow => {
                let (bytes, pages, warnings) = self.flow_to_pdf(source, from, &title, options)?;
                (bytes, pages, None, warnings)
            }
            Route::Deck => {
                let (bytes, pages, warnings) = self.deck_to_pdf(source, &title, options)?;
                (bytes, pages, None, warnings)
            }
            Route::Slides => {
                let set = self.slide_generator(options)?.generate(&SlideSource {
                    path: source,
                    format: from,
                    title: &title,
                    extractor: extractor_for(from).as_ref(),
                })?;
                let bytes = PptxWriter.serialize(&set.slides)?;
                (bytes, set.slides.len(), Some(set.strategy), set.warnings)
            }
        };

        // Nothing is written for a cancelled run.
        self.cancel.check()?;
        write_output(&output_path, &bytes)?;

        info!(
            output = %output_path.display(),
            unit_count,
            warnings = warnings.len(),
            "Conversion complete"
        );
        Ok(ConversionResult {
            output_path,
            unit_count,
            strategy_used,
            warnings,
        })
    }

    fn metrics(&self, options: &ConversionOptions) -> Arc<dyn MetricsProvider> {
        self.metrics
            .clone()
            .unwrap_or_else(|| Arc::new(BuiltinMetrics::new(options.layout.font)))
    }

    fn paginator(&self, options: &ConversionOptions) -> Result<(Paginator, WordWrapper)> {
        let metrics = self.metrics(options);
        let geometry = options.geometry();
        let wrapper = WordWrapper::new(Arc::clone(&metrics), geometry.font_size);
        let paginator = Paginator::new(geometry, metrics)?.with_cancel(self.cancel.clone());
        Ok((paginator, wrapper))
    }

    fn slide_generator(&self, options: &ConversionOptions) -> Result<SlideGenerator> {
        let (paginator, wrapper) = self.paginator(options)?;
        let mut generator = SlideGenerator::new(Sanitizer::new(options.layout.tab_width))
            .with_raster_scale(options.raster_scale)
            .with_page_estimator(PageEstimator { wrapper, paginator })
            .with_cancel(self.cancel.clone());
        if let Some(renderer) = &self.renderer {
            generator = generator.with_renderer(Arc::clone(renderer));
        }
        Ok(generator)
    }

    /// Flowed source → paginated PDF, with the title at the top of page one.
    fn flow_to_pdf(
        &self,
        source: &Path,
        from: DocumentFormat,
        title: &str,
        options: &ConversionOptions,
    ) -> Result<(Vec<u8>, usize, Vec<ConversionWarning>)> {
        let extracted = extractor_for(from).extract(source)?;
        let mut warnings: Vec<ConversionWarning> = extracted
            .unreadable_pages
            .iter()
            .map(|&page| ConversionWarning::UnreadablePage { page })
            .collect();

        let sanitizer = Sanitizer::new(options.layout.tab_width);
        let blocks: Vec<SanitizedBlock> = extracted
            .blocks
            .into_iter()
            .map(|block| sanitizer.sanitize_block(block))
            .collect();
        if blocks.iter().all(SanitizedBlock::is_blank) {
            warnings.push(ConversionWarning::EmptySource);
        }

        let (paginator, wrapper) = self.paginator(options)?;
        let lines = wrapper.wrap_blocks(&blocks, paginator.geometry().content_width());
        let pages = paginator.paginate(Some(title), &lines)?;
        debug!(lines = lines.len(), pages = pages.len(), "Flow layout complete");

        let bytes = PdfWriter::new(options.layout.font).serialize(
            &pages,
            paginator.geometry(),
            Some(title),
        )?;
        Ok((bytes, pages.len(), warnings))
    }

    /// Slide deck → PDF with every slide's text starting a new page.
    fn deck_to_pdf(
        &self,
        source: &Path,
        title: &str,
        options: &ConversionOptions,
    ) -> Result<(Vec<u8>, usize, Vec<ConversionWarning>)> {
        let slides = PptxReader.extract_slides(source)?;
        let sanitizer = Sanitizer::new(options.layout.tab_width);
        let (paginator, wrapper) = self.paginator(options)?;
        let width = paginator.geometry().content_width();

        let mut warnings = Vec::new();
        let mut sections: Vec<Section> = slides
            .into_iter()
            .enumerate()
            .map(|(position, block)| {
                let number = block.source_index.unwrap_or(position + 1);
                let sanitized = sanitizer.sanitize_block(block);
                Section {
                    heading: Some(format!("Slide {number}")),
                    lines: wrapper.wrap_blocks(std::slice::from_ref(&sanitized), width),
                }
            })
            .collect();

        if sections.iter().all(|s| s.lines.is_empty()) {
            warnings.push(ConversionWarning::EmptySource);
        }
        if sections.is_empty() {
            sections.push(Section {
                heading: Some(title.to_string()),
                lines: Vec::new(),
            });
        }

        let pages = paginator.paginate_sections(&sections)?;
        let bytes = PdfWriter::new(options.layout.font).serialize(
            &pages,
            paginator.geometry(),
            Some(title),
        )?;
        Ok((bytes, pages.len(), warnings))
    }
}

/// Which pipeline a (source, target) pair runs through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    /// Flowed text onto PDF pages.
    Flow,
    /// Slide deck onto PDF pages, one section per slide.
    Deck,
    /// Anything onto a slide deck.
    Slides,
}

impl Route {
    fn for_pair(from: DocumentFormat, to: DocumentFormat) -> Option<Self> {
        match (from, to) {
            (from, DocumentFormat::Pdf) if from.is_slide_deck() => Some(Self::Deck),
            (
                DocumentFormat::PlainText | DocumentFormat::Docx | DocumentFormat::Pdf,
                DocumentFormat::Pdf,
            ) => Some(Self::Flow),
            (_, to) if to.is_slide_deck() => Some(Self::Slides),
            _ => None,
        }
    }
}

/// Text extractor for a source format.
pub fn extractor_for(format: DocumentFormat) -> Box<dyn TextExtractor> {
    match format {
        DocumentFormat::Pdf => Box::new(PdfTextExtractor),
        DocumentFormat::Docx => Box::new(DocxTextExtractor),
        DocumentFormat::Pptx => Box::new(PptxReader),
        DocumentFormat::PlainText => Box::new(PlainTextExtractor),
    }
}

/// `options.title`, else the source file stem, restricted to the output
/// character set. Falls back to "Untitled" when nothing printable is left.
fn document_title(source: &Path, options: &ConversionOptions, sanitizer: &Sanitizer) -> String {
    let stem = source
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned());
    options
        .title
        .iter()
        .cloned()
        .chain(stem)
        .map(|candidate| sanitizer.sanitize(&candidate).trim().to_string())
        .find(|candidate| !candidate.is_empty())
        .unwrap_or_else(|| "Untitled".to_string())
}

/// `<output_dir or source dir>/<source stem>.<target extension>`.
pub fn output_path(source: &Path, to: DocumentFormat, options: &ConversionOptions) -> PathBuf {
    let dir = options
        .output_dir
        .clone()
        .or_else(|| source.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    dir.join(format!("{stem}.{}", to.extension()))
}

/// Whether `target` names the same file as `source`, following links when
/// both exist.
fn is_same_file(source: &Path, target: &Path) -> bool {
    if source == target {
        return true;
    }
    match (std::fs::canonicalize(source), std::fs::canonicalize(target)) {
        (Ok(source), Ok(target)) => source == target,
        _ => false,
    }
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    let fail = |err: std::io::Error| {
        ConvertError::Serialization(format!("cannot write {}: {err}", path.display()))
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(fail)?;
    }
    std::fs::write(path, bytes).map_err(fail)
}
