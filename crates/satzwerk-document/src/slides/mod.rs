// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Slide generator — picks between the raster and text strategies.
//
// Raster is always attempted first. Any raster failure (no backend, backend
// refuses the format, a single page fails to render) throws away the partial
// raster output and the whole run switches to the text strategy, so one result
// never mixes slide variants. The degradation is logged and reported as a
// warning; it is the only local recovery in the pipeline.

pub mod raster;
pub mod text;

use std::path::Path;
use std::sync::Arc;

use satzwerk_core::error::{ConvertError, Result};
use satzwerk_core::{ConversionWarning, DocumentFormat, Slide, Strategy};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::adapters::{RasterRenderer, TextExtractor};
use crate::cancel::CancelFlag;
use crate::sanitize::Sanitizer;
use raster::RasterStrategy;
use text::{PageEstimator, TextStrategy};

/// Why the raster strategy gave up.
#[derive(Debug, Error)]
pub enum StrategyFailure {
    #[error("rendering backend unavailable: {0}")]
    Unavailable(String),

    #[error("rendering backend cannot render {0} sources")]
    Unsupported(DocumentFormat),

    #[error("rendering failed on page {page}: {reason}")]
    Backend { page: usize, reason: String },

    #[error("cancelled")]
    Cancelled,
}

/// Slides of a single variant, plus how they were made.
#[derive(Debug, Clone)]
pub struct SlideSet {
    pub strategy: Strategy,
    pub slides: Vec<Slide>,
    pub warnings: Vec<ConversionWarning>,
}

/// The source document handed to the generator.
pub struct SlideSource<'a> {
    pub path: &'a Path,
    pub format: DocumentFormat,
    /// Document name, used as the title slide in the text strategy.
    pub title: &'a str,
    /// Only consulted if the text strategy runs.
    pub extractor: &'a dyn TextExtractor,
}

/// Produces a slide sequence from a source document.
pub struct SlideGenerator {
    renderer: Option<Arc<dyn RasterRenderer>>,
    raster_scale: f32,
    sanitizer: Sanitizer,
    estimator: Option<PageEstimator>,
    cancel: CancelFlag,
}

impl std::fmt::Debug for SlideGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlideGenerator")
            .field("renderer", &self.renderer.as_ref().map(|r| r.name().to_string()))
            .field("raster_scale", &self.raster_scale)
            .finish_non_exhaustive()
    }
}

impl Default for SlideGenerator {
    fn default() -> Self {
        Self::new(Sanitizer::default())
    }
}

impl SlideGenerator {
    pub fn new(sanitizer: Sanitizer) -> Self {
        Self {
            renderer: None,
            raster_scale: 2.0,
            sanitizer,
            estimator: None,
            cancel: CancelFlag::new(),
        }
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn RasterRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn with_raster_scale(mut self, scale: f32) -> Self {
        self.raster_scale = scale;
        self
    }

    /// Estimate page counts for sources that don't record one.
    pub fn with_page_estimator(mut self, estimator: PageEstimator) -> Self {
        self.estimator = Some(estimator);
        self
    }

    /// Poll `cancel` once per page or slide.
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Generate slides, raster first and text on any raster failure.
    ///
    /// Fails with `Render` only when the text strategy fails too; an
    /// unreadable source stays an `Extraction` error.
    #[instrument(skip_all, fields(path = %source.path.display(), format = %source.format))]
    pub fn generate(&self, source: &SlideSource<'_>) -> Result<SlideSet> {
        let raster = RasterStrategy {
            renderer: self.renderer.as_ref(),
            scale: self.raster_scale,
            cancel: &self.cancel,
        };

        let failure = match raster.generate(source) {
            Ok(slides) => {
                info!(slides = slides.len(), "Raster strategy succeeded");
                return Ok(SlideSet {
                    strategy: Strategy::Raster,
                    slides,
                    warnings: Vec::new(),
                });
            }
            Err(StrategyFailure::Cancelled) => return Err(ConvertError::Cancelled),
            Err(failure) => failure,
        };

        warn!(%failure, "Raster strategy failed — falling back to text strategy");
        let text = TextStrategy {
            sanitizer: &self.sanitizer,
            estimator: self.estimator.as_ref(),
            cancel: &self.cancel,
        };

        match text.generate(source) {
            Ok(mut set) => {
                set.warnings.insert(
                    0,
                    ConversionWarning::RasterFallback {
                        reason: failure.to_string(),
                    },
                );
                info!(slides = set.slides.len(), "Text strategy succeeded");
                Ok(set)
            }
            Err(err) if text::is_fatal(&err) => Err(err),
            Err(err) => Err(ConvertError::Render {
                raster: failure.to_string(),
                text: err.to_string(),
            }),
        }
    }
}
