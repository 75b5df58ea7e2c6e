// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PPTX module — slide text extraction and slide deck serialisation.

pub mod reader;
pub mod writer;

pub use reader::PptxReader;
pub use writer::PptxWriter;
