// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — text extraction from existing PDFs and page serialisation.

pub mod reader;
pub mod writer;

pub use reader::{PdfReader, PdfTextExtractor};
pub use writer::PdfWriter;
