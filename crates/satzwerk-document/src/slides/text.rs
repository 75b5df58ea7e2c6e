// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text strategy — title slide plus one content slide per source page, built by
// dealing the source's text lines out in equal-count chunks.
//
// Chunks are sized by line count, not rendered height, so a chunk of very long
// lines can run past the bottom of its slide.

use satzwerk_core::error::{ConvertError, Result};
use satzwerk_core::{ConversionWarning, SanitizedBlock, Slide, Strategy};
use tracing::{info, instrument, warn};

use crate::cancel::CancelFlag;
use crate::paginate::Paginator;
use crate::sanitize::Sanitizer;
use crate::slides::{SlideSet, SlideSource};
use crate::wrap::WordWrapper;

/// Body line shown on a slide whose chunk has no usable text.
pub const NO_TEXT_LINE: &str = "(No extractable text for this slide)";

/// Counts how many pages a flowed source would occupy.
///
/// Used for sources whose container records no page count.
#[derive(Debug)]
pub struct PageEstimator {
    pub wrapper: WordWrapper,
    pub paginator: Paginator,
}

impl PageEstimator {
    pub fn estimate(&self, blocks: &[SanitizedBlock]) -> Result<usize> {
        let width = self.paginator.geometry().content_width();
        let lines = self.wrapper.wrap_blocks(blocks, width);
        Ok(self.paginator.paginate(None, &lines)?.len())
    }
}

pub(crate) struct TextStrategy<'a> {
    pub sanitizer: &'a Sanitizer,
    pub estimator: Option<&'a PageEstimator>,
    pub cancel: &'a CancelFlag,
}

impl TextStrategy<'_> {
    #[instrument(skip_all, fields(path = %source.path.display()))]
    pub fn generate(&self, source: &SlideSource<'_>) -> Result<SlideSet> {
        let extracted = source.extractor.extract(source.path)?;
        let mut warnings: Vec<ConversionWarning> = extracted
            .unreadable_pages
            .iter()
            .map(|&page| ConversionWarning::UnreadablePage { page })
            .collect();

        let blocks: Vec<SanitizedBlock> = extracted
            .blocks
            .into_iter()
            .map(|block| self.sanitizer.sanitize_block(block))
            .collect();
        let lines: Vec<String> = blocks
            .iter()
            .flat_map(|block| block.text.split('\n'))
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        if lines.is_empty() {
            warn!("Source yielded no text lines");
            warnings.push(ConversionWarning::EmptySource);
        }

        let page_count = match extracted.page_count.filter(|&count| count > 0) {
            Some(count) => count,
            None => {
                let estimated = match self.estimator {
                    Some(estimator) => estimator.estimate(&blocks)?,
                    None => 1,
                };
                warnings.push(ConversionWarning::PageCountEstimated { pages: estimated });
                estimated
            }
        };

        let lines_per_slide = lines.len().div_ceil(page_count).max(1);
        info!(
            total_lines = lines.len(),
            page_count, lines_per_slide, "Chunking text across slides"
        );

        let mut slides = Vec::with_capacity(page_count + 1);
        let title = self.sanitizer.sanitize(source.title).trim().to_string();
        slides.push(Slide::Text {
            index: 0,
            title: Some(title),
            body_lines: Vec::new(),
        });

        let mut chunks = lines.chunks(lines_per_slide);
        for slide_number in 1..=page_count {
            self.cancel.check()?;
            let chunk = chunks.next().unwrap_or_default();
            let mut body_lines = chunk.to_vec();
            if body_lines.is_empty() {
                warnings.push(ConversionWarning::PartialContent {
                    slide: slide_number,
                });
                body_lines.push(NO_TEXT_LINE.to_string());
            }
            slides.push(Slide::Text {
                index: slide_number,
                title: None,
                body_lines,
            });
        }

        Ok(SlideSet {
            strategy: Strategy::Text,
            slides,
            warnings,
        })
    }
}

/// Whether a text-strategy error should abort the run rather than be folded
/// into a `Render` error.
///
/// An unreadable source is reported as such; re-rendering cannot help it.
pub(crate) fn is_fatal(err: &ConvertError) -> bool {
    matches!(
        err,
        ConvertError::Cancelled | ConvertError::InvalidGeometry(_) | ConvertError::Extraction(_)
    )
}
