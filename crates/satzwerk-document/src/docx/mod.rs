// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// DOCX (WordprocessingML) text extraction.

pub mod reader;

pub use reader::DocxTextExtractor;
