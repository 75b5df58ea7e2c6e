// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversion options, as received from the command handlers.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::{PT_PER_MM, PageGeometry, PaperSize};

/// Built-in font families the engine can measure and emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontFamily {
    Helvetica,
    Courier,
}

/// Typography and margins used to derive [`PageGeometry`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub font: FontFamily,
    pub font_size_pt: f32,
    pub line_height_pt: f32,
    pub title_font_size_pt: f32,
    pub title_line_height_pt: f32,
    /// Same margin on all four sides.
    pub margin_mm: f32,
    /// Spaces substituted for each tab during sanitisation.
    pub tab_width: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            font: FontFamily::Helvetica,
            font_size_pt: 11.0,
            line_height_pt: 14.0,
            title_font_size_pt: 18.0,
            title_line_height_pt: 24.0,
            margin_mm: 20.0,
            tab_width: 4,
        }
    }
}

impl LayoutConfig {
    /// Point geometry for the given paper preset.
    pub fn geometry(&self, paper_size: PaperSize) -> PageGeometry {
        let (width, height) = paper_size.dimensions_pt();
        let margin = self.margin_mm * PT_PER_MM;
        PageGeometry {
            width,
            height,
            margin_top: margin,
            margin_bottom: margin,
            margin_left: margin,
            margin_right: margin,
            font_size: self.font_size_pt,
            line_height: self.line_height_pt,
            title_font_size: self.title_font_size_pt,
            title_line_height: self.title_line_height_pt,
        }
    }
}

/// Per-run options record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionOptions {
    pub paper_size: PaperSize,
    /// Display name of the source document; used as the document title.
    pub title: Option<String>,
    /// Where to write the target. Defaults to the source file's directory.
    pub output_dir: Option<PathBuf>,
    /// Scale factor applied when rasterising source pages.
    pub raster_scale: f32,
    pub layout: LayoutConfig,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            title: None,
            output_dir: None,
            raster_scale: 2.0,
            layout: LayoutConfig::default(),
        }
    }
}

impl ConversionOptions {
    /// Parse an options record sent by the REST layer. Missing fields take
    /// their defaults.
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn geometry(&self) -> PageGeometry {
        self.layout.geometry(self.paper_size)
    }
}
