// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Greedy word wrap driven by measured glyph widths.

use std::sync::Arc;

use satzwerk_core::{LayoutLine, SanitizedBlock};

use crate::metrics::MetricsProvider;

/// Splits paragraphs into lines no wider than a content width.
#[derive(Clone)]
pub struct WordWrapper {
    metrics: Arc<dyn MetricsProvider>,
    font_size: f32,
}

impl std::fmt::Debug for WordWrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordWrapper")
            .field("font_size", &self.font_size)
            .finish_non_exhaustive()
    }
}

impl WordWrapper {
    pub fn new(metrics: Arc<dyn MetricsProvider>, font_size: f32) -> Self {
        Self { metrics, font_size }
    }

    /// Wrap one block of text.
    ///
    /// Each `\n`-separated segment is wrapped on its own; an empty segment
    /// yields a blank line. A word wider than `content_width` gets a line to
    /// itself and is never split.
    pub fn wrap(&self, text: &str, content_width: f32) -> Vec<LayoutLine> {
        wrap(text, content_width, self.metrics.as_ref(), self.font_size)
    }

    /// Wrap a sequence of paragraphs, with one blank line between paragraphs.
    ///
    /// Blank paragraphs contribute nothing, so runs of empty source paragraphs
    /// collapse into a single gap.
    pub fn wrap_blocks(&self, blocks: &[SanitizedBlock], content_width: f32) -> Vec<LayoutLine> {
        let mut lines = Vec::new();
        for block in blocks.iter().filter(|b| !b.is_blank()) {
            if !lines.is_empty() {
                lines.push(LayoutLine::blank());
            }
            lines.extend(self.wrap(&block.text, content_width));
        }
        lines
    }
}

/// Wrap `text` to `content_width` points using `metrics` at `font_size`.
pub fn wrap(
    text: &str,
    content_width: f32,
    metrics: &dyn MetricsProvider,
    font_size: f32,
) -> Vec<LayoutLine> {
    let mut lines = Vec::new();

    for segment in text.split('\n') {
        let mut words = segment.split_whitespace().peekable();
        if words.peek().is_none() {
            lines.push(LayoutLine::blank());
            continue;
        }

        let mut current = String::new();
        for word in words {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }

            let candidate = format!("{current} {word}");
            if metrics.width_of(&candidate, font_size) > content_width {
                let width = metrics.width_of(&current, font_size);
                lines.push(LayoutLine::new(std::mem::take(&mut current), width));
                current.push_str(word);
            } else {
                current = candidate;
            }
        }

        let width = metrics.width_of(&current, font_size);
        lines.push(LayoutLine::new(current, width));
    }

    lines
}
