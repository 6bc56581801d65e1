// SPDX-License-Identifier: Apache-2.0

//! Buffered decoding of a byte [`Reader`] into Unicode code points.
//!
//! The first fill of the buffer decides the encoding: a byte order mark if
//! present, otherwise the pattern of zero bytes among the first four bytes.
//! Characters are decoded lazily after that, refilling the buffer one
//! `read()` call at a time, so a multi-byte character may straddle refills.

use alloc::boxed::Box;
use alloc::vec;

use log::{debug, trace};

use crate::encoding::Encoding;
use crate::{utf8, ParseError, Reader};

/// Default size of the byte buffer between the [`Reader`] and the decoder.
pub const DEFAULT_BUFFER_SIZE: usize = 256;

/// Smallest buffer that still holds the bytes needed for encoding detection.
const MIN_BUFFER_SIZE: usize = 4;

/// Decodes code points from a [`Reader`] in one of the supported encodings.
///
/// Code points are returned as raw `u32` values. UTF-16 input yields
/// surrogate code units unpaired, pairing happens in the lexer.
pub struct CharReader<R: Reader> {
    source: R,
    buffer: Box<[u8]>,
    /// Number of valid bytes in `buffer`
    len: usize,
    /// Next unread byte in `buffer`
    pos: usize,
    /// The source returned 0
    source_eof: bool,
    encoding: Option<Encoding>,
    pushback: Option<u32>,
    /// First failure, returned again by every later read
    error: Option<ParseError>,
}

impl<R: Reader> CharReader<R> {
    /// Create a reader with a [`DEFAULT_BUFFER_SIZE`] byte buffer.
    pub fn new(source: R) -> Self {
        Self::with_capacity(source, DEFAULT_BUFFER_SIZE)
    }

    /// Create a reader with a `capacity` byte buffer (at least 4 bytes).
    pub fn with_capacity(source: R, capacity: usize) -> Self {
        Self {
            source,
            buffer: vec![0u8; capacity.max(MIN_BUFFER_SIZE)].into_boxed_slice(),
            len: 0,
            pos: 0,
            source_eof: false,
            encoding: None,
            pushback: None,
            error: None,
        }
    }

    /// The detected encoding, `None` until the first character was requested.
    pub fn encoding(&self) -> Option<Encoding> {
        self.encoding
    }

    /// True once the source reported end of stream and every buffered
    /// character was consumed.
    pub fn is_eof(&self) -> bool {
        self.source_eof && self.pos >= self.len && self.pushback.is_none()
    }

    /// Read the next code point.
    ///
    /// Returns `Ok(None)` at end of input, and keeps doing so on further calls.
    /// Input that ends inside a multi-byte character is
    /// [`ParseError::EndOfFile`]. After an error the source is not read
    /// again; the same error is returned instead.
    pub fn read_char(&mut self) -> Result<Option<u32>, ParseError> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        if let Some(cp) = self.pushback.take() {
            return Ok(Some(cp));
        }

        let result = self.decode_next();
        if let Err(error) = &result {
            self.error = Some(error.clone());
        }
        result
    }

    fn decode_next(&mut self) -> Result<Option<u32>, ParseError> {
        let encoding = match self.encoding {
            Some(encoding) => encoding,
            None => self.detect_encoding()?,
        };

        match encoding {
            Encoding::Utf8 => self.read_utf8(),
            Encoding::Utf16Le | Encoding::Utf32Le => self.read_unit(encoding.unit_size(), true),
            Encoding::Utf16Be | Encoding::Utf32Be => self.read_unit(encoding.unit_size(), false),
        }
    }

    /// Push one code point back, to be returned by the next [`read_char`](Self::read_char).
    ///
    /// Only a single code point can be pending; a second call replaces it.
    pub fn unread_char(&mut self, cp: u32) {
        self.pushback = Some(cp);
    }

    /// Fill the whole buffer, then detect the encoding from its start.
    fn detect_encoding(&mut self) -> Result<Encoding, ParseError> {
        while self.len < self.buffer.len() && !self.source_eof {
            let fill = self.buffer.get_mut(self.len..).unwrap_or_default();
            let bytes_read = self
                .source
                .read(fill)
                .map_err(|_| ParseError::ReaderError)?;
            if bytes_read == 0 {
                self.source_eof = true;
            } else {
                self.mark_filled(bytes_read)?;
            }
        }

        let prefix = self.buffer.get(..self.len).unwrap_or_default();
        let (encoding, bom_len) = Encoding::detect(prefix)?;
        debug!(
            "Detected {:?} input, skipping {} byte order mark bytes",
            encoding, bom_len
        );
        self.pos = bom_len;
        self.encoding = Some(encoding);
        Ok(encoding)
    }

    fn mark_filled(&mut self, bytes_read: usize) -> Result<(), ParseError> {
        let filled = self.len.saturating_add(bytes_read);
        if filled > self.buffer.len() {
            // Source claimed more bytes than fit in the slice it was given
            return Err(ParseError::ReaderError);
        }
        self.len = filled;
        Ok(())
    }

    /// Replace the consumed buffer with one `read()` worth of new bytes.
    fn refill(&mut self) -> Result<(), ParseError> {
        self.pos = 0;
        self.len = 0;
        let bytes_read = self
            .source
            .read(&mut self.buffer)
            .map_err(|_| ParseError::ReaderError)?;
        trace!("Refilled {} bytes", bytes_read);
        if bytes_read == 0 {
            self.source_eof = true;
            return Ok(());
        }
        self.mark_filled(bytes_read)
    }

    fn read_byte(&mut self) -> Result<Option<u8>, ParseError> {
        if self.pos >= self.len {
            if self.source_eof {
                return Ok(None);
            }
            self.refill()?;
        }
        // An empty refill leaves `len` at 0
        let byte = self
            .buffer
            .get(..self.len)
            .and_then(|filled| filled.get(self.pos))
            .copied();
        if byte.is_some() {
            self.pos += 1;
        }
        Ok(byte)
    }

    /// Read a byte that continues a character already started.
    fn read_continuation(&mut self) -> Result<u8, ParseError> {
        self.read_byte()?.ok_or(ParseError::EndOfFile)
    }

    fn read_utf8(&mut self) -> Result<Option<u32>, ParseError> {
        let Some(lead) = self.read_byte()? else {
            return Ok(None);
        };
        let len = utf8::seq_length(lead).ok_or(ParseError::InvalidEncoding)?;

        let mut seq = [lead, 0, 0, 0];
        for slot in seq.iter_mut().take(len).skip(1) {
            *slot = self.read_continuation()?;
        }
        utf8::decode(seq.get(..len).unwrap_or_default()).map(Some)
    }

    /// Read one fixed-width UTF-16 or UTF-32 code unit.
    fn read_unit(&mut self, width: usize, little_endian: bool) -> Result<Option<u32>, ParseError> {
        let Some(first) = self.read_byte()? else {
            return Ok(None);
        };

        let mut value = u32::from(first);
        for i in 1..width {
            let byte = u32::from(self.read_continuation()?);
            value = if little_endian {
                value | (byte << (8 * i))
            } else {
                (value << 8) | byte
            };
        }
        Ok(Some(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChunkReader;

    /// Source that hands out one byte per read, like a slow stream.
    fn byte_stream(data: &[u8]) -> ChunkReader<'_> {
        ChunkReader::new(data, 1)
    }

    fn assert_decodes(data: &[u8], encoding: Encoding, expected: &[u32]) {
        let mut reader = CharReader::new(byte_stream(data));
        for &cp in expected {
            assert!(!reader.is_eof());
            assert_eq!(reader.read_char(), Ok(Some(cp)));
        }
        assert_eq!(reader.encoding(), Some(encoding));
        assert!(reader.is_eof());
        assert_eq!(reader.read_char(), Ok(None));
        // End of input is sticky
        assert_eq!(reader.read_char(), Ok(None));
    }

    macro_rules! encoding_tests {
        ($($name:ident: $encoding:expr, $data:expr, $expected:expr;)*) => {
            paste::paste! {
                $(
                    #[test_log::test]
                    fn [<test_decode_ $name>]() {
                        assert_decodes(&$data, $encoding, &$expected);
                    }
                )*
            }
        };
    }

    encoding_tests! {
        utf8: Encoding::Utf8,
            [0x61, 0xC2, 0xA3, 0xE2, 0xA0, 0x81, 0xF0, 0x90, 0x90, 0x81],
            [0x61, 0xA3, 0x2801, 0x10401];
        utf16le: Encoding::Utf16Le,
            [0x61, 0x00, 0xA3, 0x00, 0x01, 0x28, 0xAF, 0x7C],
            [0x61, 0xA3, 0x2801, 0x7CAF];
        utf16be: Encoding::Utf16Be,
            [0x00, 0x61, 0x00, 0xA3, 0x28, 0x01, 0x7C, 0xAF],
            [0x61, 0xA3, 0x2801, 0x7CAF];
        utf32le: Encoding::Utf32Le,
            [
                0x61, 0x00, 0x00, 0x00, 0xA3, 0x00, 0x00, 0x00, 0x01, 0x28, 0x00, 0x00,
                0x01, 0x04, 0x01, 0x00, 0x89, 0xAB, 0xCD, 0x0F,
            ],
            [0x61, 0xA3, 0x2801, 0x10401, 0xFCDAB89];
        utf32be: Encoding::Utf32Be,
            [
                0x00, 0x00, 0x00, 0x61, 0x00, 0x00, 0x00, 0xA3, 0x00, 0x00, 0x28, 0x01,
                0x00, 0x01, 0x04, 0x01, 0x0F, 0xCD, 0xAB, 0x89,
            ],
            [0x61, 0xA3, 0x2801, 0x10401, 0xFCDAB89];
    }

    #[test_log::test]
    fn test_empty_input() {
        let mut reader = CharReader::new(byte_stream(b""));
        assert_eq!(reader.read_char(), Ok(None));
        assert_eq!(reader.encoding(), Some(Encoding::Utf8));
        assert!(reader.is_eof());
    }

    #[test_log::test]
    fn test_byte_order_mark_skipped() {
        let mut reader = CharReader::new(byte_stream(&[0xEF, 0xBB, 0xBF, b'1']));
        assert_eq!(reader.read_char(), Ok(Some('1' as u32)));
        assert_eq!(reader.read_char(), Ok(None));

        let mut reader = CharReader::new(byte_stream(&[0xFF, 0xFE, b'[', 0, b']', 0]));
        assert_eq!(reader.read_char(), Ok(Some('[' as u32)));
        assert_eq!(reader.read_char(), Ok(Some(']' as u32)));
        assert_eq!(reader.encoding(), Some(Encoding::Utf16Le));
    }

    #[test_log::test]
    fn test_unknown_encoding() {
        let mut reader = CharReader::new(byte_stream(&[0, 0, 0, 0, b'1']));
        assert_eq!(reader.read_char(), Err(ParseError::UnknownEncoding));
    }

    #[test_log::test]
    fn test_truncated_sequence_is_end_of_file() {
        let mut reader = CharReader::new(byte_stream(&[b'a', b'b', b'c', 0xE2, 0xA0]));
        for c in "abc".chars() {
            assert_eq!(reader.read_char(), Ok(Some(c as u32)));
        }
        assert_eq!(reader.read_char(), Err(ParseError::EndOfFile));
    }

    #[test_log::test]
    fn test_invalid_utf8() {
        // Stray continuation byte
        let mut reader = CharReader::new(byte_stream(&[b'a', b'b', b'c', 0x80]));
        reader.read_char().unwrap();
        reader.read_char().unwrap();
        reader.read_char().unwrap();
        assert_eq!(reader.read_char(), Err(ParseError::InvalidEncoding));

        // Lead byte followed by ASCII
        let mut reader = CharReader::new(byte_stream(&[b'a', b'b', b'c', 0xC2, b'd']));
        reader.read_char().unwrap();
        reader.read_char().unwrap();
        reader.read_char().unwrap();
        assert_eq!(reader.read_char(), Err(ParseError::InvalidEncoding));
    }

    #[test_log::test]
    fn test_sequences_straddle_refills() {
        let text = "[\"日本語 😀 ü\"]";
        for capacity in [4, 5, 7, 256] {
            for chunk in [1, 3, 64] {
                let mut reader =
                    CharReader::with_capacity(ChunkReader::new(text.as_bytes(), chunk), capacity);
                for c in text.chars() {
                    assert_eq!(reader.read_char(), Ok(Some(c as u32)));
                }
                assert_eq!(reader.read_char(), Ok(None));
            }
        }
    }

    #[test_log::test]
    fn test_end_of_input_after_empty_refill() {
        // The last refill returns 0 bytes after the buffer was drained
        for (chunk, capacity) in [(2, 4), (1, 4), (3, 5), (4, 4)] {
            let mut reader =
                CharReader::with_capacity(ChunkReader::new(b"[10,2]", chunk), capacity);
            for c in "[10,2]".chars() {
                assert_eq!(reader.read_char(), Ok(Some(c as u32)));
            }
            assert_eq!(reader.read_char(), Ok(None), "chunk={chunk} capacity={capacity}");
            assert!(reader.is_eof());
            assert_eq!(reader.read_char(), Ok(None));
        }
    }

    #[test_log::test]
    fn test_reader_error_is_sticky() {
        struct Counting {
            calls: usize,
        }
        impl Reader for Counting {
            type Error = ();
            fn read(&mut self, _buf: &mut [u8]) -> Result<usize, ()> {
                self.calls += 1;
                Err(())
            }
        }
        let mut source = Counting { calls: 0 };
        let mut reader = CharReader::new(&mut source);
        assert_eq!(reader.read_char(), Err(ParseError::ReaderError));
        assert_eq!(reader.read_char(), Err(ParseError::ReaderError));
        drop(reader);
        assert_eq!(source.calls, 1);
    }

    #[test_log::test]
    fn test_invalid_sequence_is_sticky() {
        let mut reader = CharReader::new(byte_stream(&[b'a', b'b', b'c', 0xFF, b'd']));
        for c in "abc".chars() {
            assert_eq!(reader.read_char(), Ok(Some(c as u32)));
        }
        assert_eq!(reader.read_char(), Err(ParseError::InvalidEncoding));
        assert_eq!(reader.read_char(), Err(ParseError::InvalidEncoding));
    }

    #[test_log::test]
    fn test_unread_char() {
        let mut reader = CharReader::new(byte_stream(b"12"));
        let first = reader.read_char().unwrap().unwrap();
        reader.unread_char(first);
        assert_eq!(reader.read_char(), Ok(Some('1' as u32)));
        assert_eq!(reader.read_char(), Ok(Some('2' as u32)));

        // A pushed back character keeps the reader from being at EOF
        reader.unread_char('2' as u32);
        assert!(!reader.is_eof());
        assert_eq!(reader.read_char(), Ok(Some('2' as u32)));
        assert!(reader.is_eof());
    }

    #[test_log::test]
    fn test_reader_error() {
        struct Broken;
        impl Reader for Broken {
            type Error = ();
            fn read(&mut self, _buf: &mut [u8]) -> Result<usize, ()> {
                Err(())
            }
        }
        let mut reader = CharReader::new(Broken);
        assert_eq!(reader.read_char(), Err(ParseError::ReaderError));
    }
}
