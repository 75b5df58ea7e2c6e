// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Glyph metrics for the PDF base-14 fonts the writer emits.
//
// Widths are the standard Adobe AFM advance widths in 1/1000 em for the
// WinAnsi range the sanitiser admits. Tables are static, so one provider can
// be shared by any number of concurrent conversions.

use satzwerk_core::FontFamily;

/// Reports the rendered width of a text run.
///
/// Injected into the word wrapper and paginator; there is no global font
/// state. Implementations must be safe to read from several threads.
pub trait MetricsProvider: Send + Sync {
    /// Width of `text` in points at `font_size`.
    fn width_of(&self, text: &str, font_size: f32) -> f32;
}

/// Advance width used for characters outside the tables.
const FALLBACK_UNITS: u16 = 556;

/// Helvetica, 0x20–0x7E.
#[rustfmt::skip]
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica, 0xA0–0xFF.
#[rustfmt::skip]
const HELVETICA_LATIN1: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

/// Courier is monospaced: every glyph advances 600 units.
const COURIER_UNITS: u16 = 600;

/// Metrics for the built-in PDF fonts.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinMetrics {
    family: FontFamily,
}

impl BuiltinMetrics {
    pub fn new(family: FontFamily) -> Self {
        Self { family }
    }

    pub fn helvetica() -> Self {
        Self::new(FontFamily::Helvetica)
    }

    fn units(&self, c: char) -> u16 {
        match self.family {
            FontFamily::Courier => COURIER_UNITS,
            FontFamily::Helvetica => match c as u32 {
                code @ 0x20..=0x7E => HELVETICA_ASCII[(code - 0x20) as usize],
                code @ 0xA0..=0xFF => HELVETICA_LATIN1[(code - 0xA0) as usize],
                _ => FALLBACK_UNITS,
            },
        }
    }
}

impl MetricsProvider for BuiltinMetrics {
    fn width_of(&self, text: &str, font_size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| u32::from(self.units(c))).sum();
        units as f32 * font_size / 1000.0
    }
}

/// Every character advances by the same fixed amount, regardless of size.
///
/// Deterministic stand-in for real font metrics in fixtures and estimates.
#[derive(Debug, Clone, Copy)]
pub struct FixedAdvanceMetrics {
    pub advance: f32,
}

impl MetricsProvider for FixedAdvanceMetrics {
    fn width_of(&self, text: &str, _font_size: f32) -> f32 {
        text.chars().count() as f32 * self.advance
    }
}
