// SPDX-License-Identifier: Apache-2.0

//! Detection of the Unicode transformation format of a JSON stream.

use crate::ParseError;

/// Unicode encodings the reader can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Utf16Le,
    Utf16Be,
    Utf32Le,
    Utf32Be,
}

/// Byte order marks, UTF-32 first since `FF FE` also prefixes the UTF-32LE mark.
const BYTE_ORDER_MARKS: [(&[u8], Encoding); 5] = [
    (&[0xEF, 0xBB, 0xBF], Encoding::Utf8),
    (&[0x00, 0x00, 0xFE, 0xFF], Encoding::Utf32Be),
    (&[0xFF, 0xFE, 0x00, 0x00], Encoding::Utf32Le),
    (&[0xFE, 0xFF], Encoding::Utf16Be),
    (&[0xFF, 0xFE], Encoding::Utf16Le),
];

impl Encoding {
    /// Detect the encoding from the start of the stream.
    ///
    /// A JSON text starts with two ASCII characters, so the position of the
    /// zero bytes among the first four identifies the encoding. Returns the
    /// encoding and the length of a byte order mark to skip.
    ///
    /// Fewer than four bytes are always treated as UTF-8.
    pub fn detect(prefix: &[u8]) -> Result<(Encoding, usize), ParseError> {
        if let Some((bom, encoding)) = BYTE_ORDER_MARKS
            .iter()
            .find(|(bom, _)| prefix.starts_with(bom))
        {
            return Ok((*encoding, bom.len()));
        }

        let zeros = match prefix {
            [b0, b1, b2, b3, ..] => [*b0 == 0, *b1 == 0, *b2 == 0, *b3 == 0],
            _ => return Ok((Encoding::Utf8, 0)),
        };

        let encoding = match zeros {
            [false, false, false, false] => Encoding::Utf8,
            [true, false, true, false] => Encoding::Utf16Be,
            [false, true, false, true] => Encoding::Utf16Le,
            [true, true, true, false] => Encoding::Utf32Be,
            [false, true, true, true] => Encoding::Utf32Le,
            _ => return Err(ParseError::UnknownEncoding),
        };
        Ok((encoding, 0))
    }

    /// Width of a code unit in bytes.
    pub fn unit_size(&self) -> usize {
        match self {
            Encoding::Utf8 => 1,
            Encoding::Utf16Le | Encoding::Utf16Be => 2,
            Encoding::Utf32Le | Encoding::Utf32Be => 4,
        }
    }
}
