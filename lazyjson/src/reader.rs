// SPDX-License-Identifier: Apache-2.0

/// Trait for input sources that feed bytes to the decoder.
///
/// This is the only point where the decoder touches I/O; it never retries a
/// failed read.
pub trait Reader {
    /// The error type returned by read operations
    type Error;

    /// Read data into the provided buffer.
    /// Returns the number of bytes stored, or an error.
    ///
    /// # Contract
    /// - A return value of 0 **MUST** indicate true end of stream
    /// - Implementations **MUST NOT** return 0 unless no more data will ever be available
    /// - An `Err` is reported to the caller as [`ParseError::ReaderError`](crate::ParseError::ReaderError)
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

impl<R: Reader + ?Sized> Reader for &mut R {
    type Error = R::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        (**self).read(buf)
    }
}
