// SPDX-License-Identifier: Apache-2.0

//! [`Reader`] adapter for `std::io::Read` sources.

use crate::Reader;

/// Wraps any [`std::io::Read`] (files, sockets, stdin) as a [`Reader`].
///
/// `Interrupted` reads are retried by the adapter; every other I/O error is
/// passed through and surfaces as [`ParseError::ReaderError`](crate::ParseError::ReaderError).
#[derive(Debug)]
pub struct IoReader<R> {
    inner: R,
}

impl<R: std::io::Read> IoReader<R> {
    /// Wrap an `std::io::Read` source.
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Unwrap the underlying source.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: std::io::Read> Reader for IoReader<R> {
    type Error = std::io::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        loop {
            match self.inner.read(buf) {
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                other => return other,
            }
        }
    }
}
