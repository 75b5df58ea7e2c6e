// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster strategy — one image slide per rendered source page.

use std::sync::Arc;

use satzwerk_core::{SLIDE_HEIGHT_PT, SLIDE_WIDTH_PT, Slide, SlideFrame};
use tracing::{debug, info, instrument};

use crate::adapters::{RasterPage, RasterRenderer};
use crate::cancel::CancelFlag;
use crate::slides::{SlideSource, StrategyFailure};

/// Renders every source page and wraps each as an `Image` slide.
pub(crate) struct RasterStrategy<'a> {
    pub renderer: Option<&'a Arc<dyn RasterRenderer>>,
    pub scale: f32,
    pub cancel: &'a CancelFlag,
}

impl RasterStrategy<'_> {
    /// All pages or nothing: any failure discards the slides rendered so far.
    #[instrument(skip_all, fields(path = %source.path.display()))]
    pub fn generate(&self, source: &SlideSource<'_>) -> Result<Vec<Slide>, StrategyFailure> {
        let renderer = self
            .renderer
            .ok_or_else(|| StrategyFailure::Unavailable("rendering backend unavailable".into()))?;
        if !renderer.supports(source.format) {
            return Err(StrategyFailure::Unsupported(source.format));
        }

        // The session is dropped, releasing the backend, on every return below.
        let mut session = renderer
            .open(source.path)
            .map_err(|err| StrategyFailure::Unavailable(err.to_string()))?;

        let page_count = session.page_count();
        if page_count == 0 {
            return Err(StrategyFailure::Backend {
                page: 0,
                reason: "source has no pages to render".into(),
            });
        }
        info!(renderer = renderer.name(), page_count, "Rendering source pages");

        let mut slides = Vec::with_capacity(page_count);
        for page_index in 0..page_count {
            if self.cancel.is_cancelled() {
                return Err(StrategyFailure::Cancelled);
            }
            let page = session
                .render_page(page_index, self.scale)
                .map_err(|err| StrategyFailure::Backend {
                    page: page_index + 1,
                    reason: err.to_string(),
                })?;
            debug!(page = page_index + 1, width = page.width, height = page.height, "Page rasterised");
            slides.push(image_slide(page_index, page));
        }

        Ok(slides)
    }
}

fn image_slide(index: usize, page: RasterPage) -> Slide {
    Slide::Image {
        index,
        frame: fit_centered(page.width, page.height, SLIDE_WIDTH_PT, SLIDE_HEIGHT_PT),
        raster_bytes: page.png_bytes,
        width: page.width,
        height: page.height,
    }
}

/// Largest frame with the image's aspect ratio that fits the canvas, centred.
///
/// The shorter axis is letterboxed; images are scaled up as well as down.
pub fn fit_centered(width: u32, height: u32, canvas_width: f32, canvas_height: f32) -> SlideFrame {
    if width == 0 || height == 0 {
        return SlideFrame {
            x: 0.0,
            y: 0.0,
            width: canvas_width,
            height: canvas_height,
        };
    }

    let scale = (canvas_width / width as f32).min(canvas_height / height as f32);
    let frame_width = width as f32 * scale;
    let frame_height = height as f32 * scale;
    SlideFrame {
        x: (canvas_width - frame_width) / 2.0,
        y: (canvas_height - frame_height) / 2.0,
        width: frame_width,
        height: frame_height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn portrait_page_is_pillarboxed() {
        // A4 portrait raster on a 16:9 canvas: full height, centred horizontally.
        let frame = fit_centered(1190, 1684, 960.0, 540.0);
        assert!((frame.height - 540.0).abs() < 1e-3);
        assert!((frame.width - 381.6).abs() < 0.1);
        assert!((frame.x - (960.0 - frame.width) / 2.0).abs() < 1e-3);
        assert_eq!(frame.y, 0.0);
    }

    #[test]
    fn wide_image_is_letterboxed() {
        let frame = fit_centered(2000, 500, 960.0, 540.0);
        assert!((frame.width - 960.0).abs() < 1e-3);
        assert!((frame.height - 240.0).abs() < 1e-3);
        assert!((frame.y - 150.0).abs() < 1e-3);
        assert_eq!(frame.x, 0.0);
    }

    #[test]
    fn exact_aspect_fills_canvas() {
        let frame = fit_centered(1920, 1080, 960.0, 540.0);
        assert!((frame.width - 960.0).abs() < 1e-3);
        assert!((frame.height - 540.0).abs() < 1e-3);
    }

    #[test]
    fn degenerate_image_takes_whole_canvas() {
        let frame = fit_centered(0, 10, 960.0, 540.0);
        assert_eq!(frame.width, 960.0);
    }
}
