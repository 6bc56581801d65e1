// SPDX-License-Identifier: Apache-2.0

use crate::token::Token;

/// Errors that can occur while decoding a JSON stream
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Error from the underlying reader (I/O error, not end-of-stream)
    ReaderError,
    /// The first bytes of the stream match no supported Unicode encoding.
    UnknownEncoding,
    /// A malformed multi-byte sequence: bad lead byte or bad continuation byte.
    InvalidEncoding,
    /// A decoded code point that is not a Unicode scalar value.
    InvalidCodepoint(u32),
    /// Input ended in the middle of a character or a value.
    EndOfFile,
    /// A token that cannot appear at this position.
    UnexpectedToken(Token),
    /// A character that cannot start any token.
    UnexpectedCharacter(u32),
    /// Invalid escape sequence character.
    InvalidEscapeSequence,
    /// Invalid hex digits in Unicode escape sequence.
    InvalidUnicodeHex,
    /// Lone or mis-ordered UTF-16 surrogate.
    InvalidUnicodeCodepoint,
    /// `true`, `false` or `null` misspelled or cut short.
    InvalidKeyword,
    /// A number literal that does not follow JSON number grammar.
    InvalidNumber,
    /// End of input before the closing quote of a string.
    UnterminatedString,
    /// A raw control character (below U+0020) inside a string.
    UnescapedControlCharacter,
    /// Integer does not fit the configured integer type
    NumericOverflow,
    /// Float encountered but float support is disabled and float-error is configured
    FloatNotAllowed,
    /// A token buffer could not grow.
    OutOfMemory,
    /// A container was advanced while a child container it produced was left
    /// partially consumed.
    SiblingNotDrained,
}

/// Coarse classification of a [`ParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input source reported a failure.
    InputStream,
    /// The stream encoding could not be detected.
    UnknownEncoding,
    /// The byte stream is not valid in its detected encoding.
    Encoding,
    /// Input ended where more was required.
    EndOfFile,
    /// Malformed JSON text.
    Parse,
    /// Buffer growth failed.
    OutOfMemory,
    /// The value tree was consumed out of order.
    Usage,
}

impl ParseError {
    /// Map this error onto its [`ErrorKind`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::ReaderError => ErrorKind::InputStream,
            ParseError::UnknownEncoding => ErrorKind::UnknownEncoding,
            ParseError::InvalidEncoding | ParseError::InvalidCodepoint(_) => ErrorKind::Encoding,
            ParseError::EndOfFile => ErrorKind::EndOfFile,
            ParseError::UnexpectedToken(_)
            | ParseError::UnexpectedCharacter(_)
            | ParseError::InvalidEscapeSequence
            | ParseError::InvalidUnicodeHex
            | ParseError::InvalidUnicodeCodepoint
            | ParseError::InvalidKeyword
            | ParseError::InvalidNumber
            | ParseError::UnterminatedString
            | ParseError::UnescapedControlCharacter
            | ParseError::NumericOverflow
            | ParseError::FloatNotAllowed => ErrorKind::Parse,
            ParseError::OutOfMemory => ErrorKind::OutOfMemory,
            ParseError::SiblingNotDrained => ErrorKind::Usage,
        }
    }
}

impl From<alloc::collections::TryReserveError> for ParseError {
    fn from(_: alloc::collections::TryReserveError) -> Self {
        ParseError::OutOfMemory
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParseError::InvalidCodepoint(cp) => write!(f, "Invalid code point U+{cp:04X}"),
            ParseError::UnexpectedCharacter(cp) => match char::from_u32(*cp) {
                Some(c) => write!(f, "Unexpected character {c:?}"),
                None => write!(f, "Unexpected character U+{cp:04X}"),
            },
            ParseError::UnexpectedToken(token) => write!(f, "Unexpected token {token}"),
            _ => write!(f, "{self:?}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseError {}
