// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text sanitiser — restricts extracted text to the characters the built-in PDF
// fonts can encode (printable ASCII plus the Latin-1 supplement).
//
// Unencodable characters fault deep inside serialisation, so every block goes
// through here before layout. Sanitisation never fails.

use satzwerk_core::{SanitizedBlock, TextBlock};

/// Default number of spaces substituted for a tab.
pub const DEFAULT_TAB_WIDTH: usize = 4;

/// Character filter applied to every extracted block.
#[derive(Debug, Clone, Copy)]
pub struct Sanitizer {
    tab_width: usize,
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new(DEFAULT_TAB_WIDTH)
    }
}

impl Sanitizer {
    pub fn new(tab_width: usize) -> Self {
        Self { tab_width }
    }

    /// Filter `raw` down to the output character set.
    ///
    /// Line breaks are kept (`\r\n` and lone `\r` become `\n`), tabs expand to
    /// `tab_width` spaces, and everything else outside the printable range is
    /// dropped. Retained characters keep their relative order.
    pub fn sanitize(&self, raw: &str) -> String {
        let mut out = String::with_capacity(raw.len());
        let mut chars = raw.chars().peekable();

        while let Some(ch) = chars.next() {
            match ch {
                '\n' => out.push('\n'),
                '\r' => {
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    out.push('\n');
                }
                '\t' => out.extend(std::iter::repeat_n(' ', self.tab_width)),
                c if is_printable(c) => out.push(c),
                _ => {}
            }
        }

        out
    }

    /// Sanitise a whole block, keeping its source index.
    pub fn sanitize_block(&self, block: TextBlock) -> SanitizedBlock {
        SanitizedBlock {
            text: self.sanitize(&block.text),
            source_index: block.source_index,
        }
    }
}

/// Sanitise with the default tab width.
pub fn sanitize(raw: &str) -> String {
    Sanitizer::default().sanitize(raw)
}

/// Printable ASCII (0x20–0x7E) or Latin-1 supplement (0xA0–0xFF).
fn is_printable(c: char) -> bool {
    matches!(c, '\u{20}'..='\u{7E}' | '\u{A0}'..='\u{FF}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_expands_and_control_byte_is_dropped() {
        assert_eq!(sanitize("A\tB\x01C"), "A    BC");
    }

    #[test]
    fn newlines_survive_and_carriage_returns_normalise() {
        assert_eq!(sanitize("one\r\ntwo\rthree\nfour"), "one\ntwo\nthree\nfour");
    }

    #[test]
    fn c1_controls_and_delete_are_removed() {
        assert_eq!(sanitize("a\u{7F}b\u{85}c\u{9F}d"), "abcd");
    }

    #[test]
    fn latin1_is_kept_and_wider_unicode_dropped() {
        assert_eq!(sanitize("Café – naïve “quote” 日本"), "Café  naïve quote ");
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize("\u{1}\u{2}\u{3}"), "");
    }

    #[test]
    fn custom_tab_width() {
        assert_eq!(Sanitizer::new(2).sanitize("\tx"), "  x");
        assert_eq!(Sanitizer::new(0).sanitize("\tx"), "x");
    }

    #[test]
    fn retained_characters_are_an_ordered_subsequence() {
        let inputs = [
            "plain ascii",
            "mixed \u{0}\u{1F}ctrl\u{80}and ünïcödé ✓ ok",
            "lines\nand\r\nbreaks",
            "\u{2028}\u{FEFF}zero-width\u{200B}marks",
        ];
        for input in inputs {
            let output = sanitize(input);
            assert!(output.chars().count() <= input.chars().count());
            let mut source = input.chars();
            for kept in output.chars() {
                assert!(
                    source.any(|c| c == kept || (c == '\r' && kept == '\n')),
                    "{kept:?} out of order for {input:?}"
                );
            }
        }
    }

    #[test]
    fn block_keeps_source_index() {
        let block = TextBlock::with_source_index("x\u{7}y", 3);
        let sanitized = Sanitizer::default().sanitize_block(block);
        assert_eq!(sanitized.text, "xy");
        assert_eq!(sanitized.source_index, Some(3));
    }
}
