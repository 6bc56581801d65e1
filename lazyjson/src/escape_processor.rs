// SPDX-License-Identifier: Apache-2.0

use crate::parse_error::ParseError;

/// Shared utilities for decoding JSON string escapes and UTF-16 surrogates.
pub struct EscapeProcessor;

impl EscapeProcessor {
    /// Process a simple escape sequence character and return the unescaped character.
    ///
    /// `u` is not a simple escape; `\uXXXX` goes through [`UnicodeCollector`].
    ///
    /// # Examples
    /// ```ignore
    /// // Internal API - see unit tests for usage examples
    /// assert_eq!(EscapeProcessor::process_simple_escape('n').unwrap(), '\n');
    /// ```
    pub fn process_simple_escape(escape_char: char) -> Result<char, ParseError> {
        match escape_char {
            'n' => Ok('\n'),
            't' => Ok('\t'),
            'r' => Ok('\r'),
            '\\' => Ok('\\'),
            '"' => Ok('"'),
            '/' => Ok('/'),
            'b' => Ok('\u{08}'), // Backspace
            'f' => Ok('\u{0C}'), // Form feed
            _ => Err(ParseError::InvalidEscapeSequence),
        }
    }

    /// Validate that a code point is a hexadecimal digit.
    ///
    /// # Returns
    /// The numeric value (0-15) of the hex digit, or an error if invalid.
    pub fn validate_hex_digit(cp: u32) -> Result<u32, ParseError> {
        char::from_u32(cp)
            .and_then(|c| c.to_digit(16))
            .ok_or(ParseError::InvalidUnicodeHex)
    }

    /// Check if a Unicode codepoint is a high surrogate (0xD800-0xDBFF)
    pub fn is_high_surrogate(codepoint: u32) -> bool {
        (0xD800..=0xDBFF).contains(&codepoint)
    }

    /// Check if a Unicode codepoint is a low surrogate (0xDC00-0xDFFF)
    pub fn is_low_surrogate(codepoint: u32) -> bool {
        (0xDC00..=0xDFFF).contains(&codepoint)
    }

    /// Combine a high and low surrogate pair into a single Unicode codepoint
    pub fn combine_surrogate_pair(high: u32, low: u32) -> Result<u32, ParseError> {
        if !Self::is_high_surrogate(high) || !Self::is_low_surrogate(low) {
            return Err(ParseError::InvalidUnicodeCodepoint);
        }

        // Combine surrogates according to UTF-16 specification
        let codepoint = 0x10000 + ((high & 0x3FF) << 10) + (low & 0x3FF);
        Ok(codepoint)
    }
}

/// Collects the hex digits of `\uXXXX` escapes and pairs UTF-16 surrogates.
///
/// Surrogates reach a string either from escapes or, in UTF-16 input, as raw
/// code units. Both are paired here, so a high surrogate must be followed
/// directly by a low one. Raw surrogates from other encodings go through
/// [`accept_raw`](Self::accept_raw) and are rejected.
#[derive(Debug, Default)]
pub struct UnicodeCollector {
    /// Value of the hex digits collected so far
    hex_value: u32,
    /// Number of hex digits collected (0-4)
    hex_pos: usize,
    /// Pending high surrogate waiting for low surrogate
    pending_high_surrogate: Option<u32>,
}

impl UnicodeCollector {
    /// Create a new collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the collector completely, including any pending surrogate state
    pub fn reset_all(&mut self) {
        self.hex_value = 0;
        self.hex_pos = 0;
        self.pending_high_surrogate = None;
    }

    /// Add a hex digit to the current escape.
    /// Returns the escaped code point once the fourth digit arrives.
    pub fn add_hex_digit(&mut self, cp: u32) -> Result<Option<u32>, ParseError> {
        let digit = EscapeProcessor::validate_hex_digit(cp)?;
        self.hex_value = (self.hex_value << 4) | digit;
        self.hex_pos += 1;

        if self.hex_pos < 4 {
            return Ok(None);
        }
        let value = self.hex_value;
        self.hex_value = 0;
        self.hex_pos = 0;
        Ok(Some(value))
    }

    /// Feed one code point of string content.
    ///
    /// Returns `None` while a high surrogate waits for its partner.
    pub fn accept(&mut self, codepoint: u32) -> Result<Option<char>, ParseError> {
        let codepoint = match self.pending_high_surrogate.take() {
            Some(high) => EscapeProcessor::combine_surrogate_pair(high, codepoint)?,
            None if EscapeProcessor::is_high_surrogate(codepoint) => {
                self.pending_high_surrogate = Some(codepoint);
                return Ok(None);
            }
            None if EscapeProcessor::is_low_surrogate(codepoint) => {
                return Err(ParseError::InvalidUnicodeCodepoint);
            }
            None => codepoint,
        };
        char::from_u32(codepoint)
            .map(Some)
            .ok_or(ParseError::InvalidCodepoint(codepoint))
    }

    /// Feed one unescaped code point decoded from the input.
    ///
    /// Only UTF-16 input carries surrogate halves as separate units.
    pub fn accept_raw(&mut self, codepoint: u32, utf16: bool) -> Result<Option<char>, ParseError> {
        if !utf16 && (0xD800..=0xDFFF).contains(&codepoint) {
            return Err(ParseError::InvalidCodepoint(codepoint));
        }
        self.accept(codepoint)
    }

    /// Check that no high surrogate is left unpaired at the end of a string.
    pub fn finish(&mut self) -> Result<(), ParseError> {
        match self.pending_high_surrogate.take() {
            Some(_) => Err(ParseError::InvalidUnicodeCodepoint),
            None => Ok(()),
        }
    }
}
