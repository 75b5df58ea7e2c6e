// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Satzwerk conversions.

use thiserror::Error;

use crate::types::DocumentFormat;

/// Top-level error type for every conversion stage.
///
/// Only the raster → text slide fallback recovers locally; everything listed
/// here propagates unchanged to the caller of the orchestrator.
#[derive(Debug, Error)]
pub enum ConvertError {
    // -- Source side --
    #[error("could not extract content from source: {0}")]
    Extraction(String),

    #[error("no conversion path from {from} to {to}")]
    UnsupportedConversion {
        from: DocumentFormat,
        to: DocumentFormat,
    },

    // -- Layout --
    #[error("invalid page geometry: {0}")]
    InvalidGeometry(String),

    #[error("slide rendering failed (raster: {raster}; text: {text})")]
    Render { raster: String, text: String },

    #[error("conversion cancelled")]
    Cancelled,

    // -- Target side --
    #[error("could not write target document: {0}")]
    Serialization(String),

    // -- Plumbing --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ConvertError>;
