// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster rendering backends for the slide generator.
//
// PDFium is the only real backend and sits behind the "pdfium" feature gate.
// Without it, `default_renderer` hands out `UnavailableRenderer`, whose every
// `open` fails, so slide generation always degrades to the text strategy.

#[cfg(feature = "pdfium")]
pub mod pdfium;

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use image::{DynamicImage, ImageFormat};
use satzwerk_core::DocumentFormat;
use tracing::debug;

use crate::adapters::{BackendError, RasterPage, RasterRenderer, RenderSession};

/// Renderer used when no backend is compiled in.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableRenderer;

impl RasterRenderer for UnavailableRenderer {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn supports(&self, _format: DocumentFormat) -> bool {
        false
    }

    fn open(&self, _source: &Path) -> Result<Box<dyn RenderSession>, BackendError> {
        tracing::warn!("RasterRenderer::open called without a rendering backend");
        Err(BackendError("rendering backend unavailable".into()))
    }
}

/// The best renderer this build carries.
pub fn default_renderer() -> Arc<dyn RasterRenderer> {
    #[cfg(feature = "pdfium")]
    {
        Arc::new(pdfium::PdfiumRenderer::default())
    }
    #[cfg(not(feature = "pdfium"))]
    {
        Arc::new(UnavailableRenderer)
    }
}

/// Encode a rendered page as PNG.
pub fn encode_png(image: &DynamicImage) -> Result<RasterPage, BackendError> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|err| BackendError(format!("PNG encoding failed: {err}")))?;
    let png_bytes = buffer.into_inner();
    debug!(
        width = image.width(),
        height = image.height(),
        bytes = png_bytes.len(),
        "Page raster encoded"
    );
    Ok(RasterPage {
        png_bytes,
        width: image.width(),
        height: image.height(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn unavailable_renderer_refuses_to_open() {
        let renderer = UnavailableRenderer;
        assert!(!renderer.supports(DocumentFormat::Pdf));
        let err = renderer.open(Path::new("/tmp/any.pdf")).err().unwrap();
        assert!(err.to_string().contains("unavailable"));
    }

    #[test]
    fn png_encoding_keeps_dimensions() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 30, Rgb([200, 10, 10])));
        let page = encode_png(&image).unwrap();
        assert_eq!((page.width, page.height), (40, 30));
        assert_eq!(&page.png_bytes[1..4], b"PNG");

        let decoded = image::load_from_memory(&page.png_bytes).unwrap();
        assert_eq!(decoded.width(), 40);
    }
}
