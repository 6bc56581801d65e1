// SPDX-License-Identifier: Apache-2.0

//! A convenience Reader implementation for in-memory input.
//!
//! [`ChunkReader`] serves a byte slice either in one go or in fixed-size
//! chunks. The chunked mode simulates network or file reads and forces the
//! decoder through many buffer refills, including refills that split a
//! multi-byte character.
//!
//! For real I/O, implement [`Reader`] for your source, or enable the `std`
//! feature and wrap any `std::io::Read` in [`IoReader`](crate::IoReader).
//!
//! # Examples
//!
//! ```rust
//! use lazyjson::{ChunkReader, Parser, Value};
//!
//! let json = br#"[1, 2, 3]"#;
//! let mut parser = Parser::new(ChunkReader::full_slice(json));
//!
//! let mut sum = 0;
//! if let Some(Value::Array(mut items)) = parser.read_value().unwrap() {
//!     while let Some(item) = items.read_next().unwrap() {
//!         sum += item.as_int().unwrap();
//!     }
//! }
//! assert_eq!(sum, 6);
//! ```

use crate::Reader;

/// A [`Reader`] over a byte slice, optionally limited to fixed-size chunks.
///
/// # Example: Chunked Reading
///
/// ```rust
/// use lazyjson::{ChunkReader, Parser};
///
/// let json = br#"{"large": "document with lots of data..."}"#;
/// // Hand out at most 4 bytes per read
/// let reader = ChunkReader::new(json, 4);
/// let mut parser = Parser::new(reader);
/// assert!(parser.read_value().unwrap().is_some());
/// ```
#[derive(Debug)]
pub struct ChunkReader<'a> {
    data: &'a [u8],
    pos: usize,
    chunk_size: usize,
}

impl<'a> ChunkReader<'a> {
    /// Create a reader returning at most `chunk_size` bytes per `read()`.
    ///
    /// # Arguments
    ///
    /// * `data` - The byte slice containing JSON data
    /// * `chunk_size` - Maximum bytes to return per read() call (minimum 1)
    pub fn new(data: &'a [u8], chunk_size: usize) -> Self {
        Self {
            data,
            pos: 0,
            chunk_size: chunk_size.max(1),
        }
    }

    /// Create a reader that hands out as much of the slice as each buffer can hold.
    pub fn full_slice(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            chunk_size: usize::MAX,
        }
    }

    /// Number of bytes not yet handed out.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }
}

impl Reader for ChunkReader<'_> {
    type Error = ();

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let to_copy = self.remaining().min(buf.len()).min(self.chunk_size);
        if to_copy == 0 {
            return Ok(0);
        }

        let end = self.pos.saturating_add(to_copy);
        match (buf.get_mut(..to_copy), self.data.get(self.pos..end)) {
            (Some(dest), Some(src)) => dest.copy_from_slice(src),
            // Unreachable given the `to_copy` bound
            _ => return Err(()),
        }
        self.pos = end;

        Ok(to_copy)
    }
}
