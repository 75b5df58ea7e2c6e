// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Office Open XML package access shared by the DOCX and PPTX readers.
//
// Both formats are ZIP archives of XML parts whose text lives in `p`
// (paragraph) / `r` (run) / `t` (text) elements; only the namespace prefix
// differs (`w:` vs `a:`), so matching is done on local names.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;
use satzwerk_core::error::{ConvertError, Result};
use tracing::debug;
use zip::ZipArchive;

/// An opened OOXML container.
pub(crate) struct OoxmlPackage {
    archive: ZipArchive<File>,
    label: String,
}

impl OoxmlPackage {
    pub fn open(path: &Path) -> Result<Self> {
        let label = path.display().to_string();
        let file = File::open(path)
            .map_err(|err| ConvertError::Extraction(format!("cannot open {label}: {err}")))?;
        let archive = ZipArchive::new(file).map_err(|err| {
            ConvertError::Extraction(format!("{label} is not an Office document: {err}"))
        })?;
        debug!(entries = archive.len(), path = %label, "OOXML package opened");
        Ok(Self { archive, label })
    }

    pub fn part_names(&self) -> Vec<String> {
        self.archive.file_names().map(str::to_string).collect()
    }

    pub fn has_part(&self, name: &str) -> bool {
        self.archive.file_names().any(|n| n == name)
    }

    /// Read a part as UTF-8 text.
    pub fn read_part(&mut self, name: &str) -> Result<String> {
        let mut entry = self.archive.by_name(name).map_err(|err| {
            ConvertError::Extraction(format!("{}: missing part {name}: {err}", self.label))
        })?;
        let mut xml = String::new();
        entry.read_to_string(&mut xml).map_err(|err| {
            ConvertError::Extraction(format!("{}: unreadable part {name}: {err}", self.label))
        })?;
        Ok(xml)
    }
}

/// Plain text of every paragraph in an XML part, in document order.
///
/// Tabs inside runs become `'\t'`, line breaks become `'\n'`. Paragraphs
/// nested in text boxes are emitted when they close, before their parent.
pub(crate) fn paragraphs(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut open: Vec<String> = Vec::new();
    let mut done: Vec<String> = Vec::new();
    let mut run_depth = 0usize;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"p" => open.push(String::new()),
                b"r" => run_depth += 1,
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => {
                if let Some(current) = open.last_mut() {
                    match e.local_name().as_ref() {
                        b"tab" if run_depth > 0 => current.push('\t'),
                        b"br" | b"cr" => current.push('\n'),
                        b"p" => done.push(String::new()),
                        _ => {}
                    }
                } else if e.local_name().as_ref() == b"p" {
                    done.push(String::new());
                }
            }
            Ok(Event::Text(t)) if in_text => {
                let text = t
                    .unescape()
                    .map_err(|err| ConvertError::Extraction(format!("bad XML text: {err}")))?;
                if let Some(current) = open.last_mut() {
                    current.push_str(&text);
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"p" => {
                    if let Some(finished) = open.pop() {
                        done.push(finished);
                    }
                }
                b"r" => run_depth = run_depth.saturating_sub(1),
                b"t" => in_text = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(err) => {
                return Err(ConvertError::Extraction(format!(
                    "malformed XML at byte {}: {err}",
                    reader.buffer_position()
                )));
            }
            _ => {}
        }
    }

    Ok(done)
}

/// Text content of the first `<name>` element, if any.
pub(crate) fn element_text(xml: &str, name: &[u8]) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    let mut inside = false;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == name => inside = true,
            Ok(Event::Text(t)) if inside => return t.unescape().ok().map(|s| s.into_owned()),
            Ok(Event::End(_)) if inside => return None,
            Ok(Event::Eof) | Err(_) => return None,
            _ => {}
        }
    }
}
