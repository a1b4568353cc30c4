// Mov Atom
// Copyright (c) 2026 The Project Mov Atom Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::cmp;
use std::io;

use super::{FiniteStream, ReadBytes};

#[inline(always)]
fn out_of_bounds_error<T>() -> io::Result<T> {
    Err(io::Error::new(io::ErrorKind::UnexpectedEof, "out of bounds"))
}

/// A `ScopedStream` restricts the number of bytes that may be read to an upper limit.
///
/// A read that would cross the limit fails with [`io::ErrorKind::UnexpectedEof`] without
/// consuming anything, so the parent can always skip to exactly the end of the scope.
pub struct ScopedStream<B: ReadBytes> {
    inner: B,
    start: u64,
    len: u64,
    read: u64,
}

impl<B: ReadBytes> ScopedStream<B> {
    /// Instantiates a new `ScopedStream` with an upper limit on the number of bytes that can be
    /// read from the inner source.
    pub fn new(inner: B, len: u64) -> Self {
        ScopedStream { start: inner.pos(), inner, len, read: 0 }
    }

    /// Returns the position of the inner stream at which the scope begins.
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Returns an immutable reference to the inner stream.
    pub fn inner(&self) -> &B {
        &self.inner
    }

    /// Returns a mutable reference to the inner stream.
    pub fn inner_mut(&mut self) -> &mut B {
        &mut self.inner
    }

    /// Ignores the remainder of the `ScopedStream`.
    pub fn ignore(&mut self) -> io::Result<()> {
        let remaining = self.len - self.read;
        self.read = self.len;
        self.inner.ignore_bytes(remaining)
    }

    /// Convert the `ScopedStream` to the inner stream.
    pub fn into_inner(self) -> B {
        self.inner
    }
}

impl<B: ReadBytes> FiniteStream for ScopedStream<B> {
    /// Returns the length of the the `ScopedStream`.
    fn byte_len(&self) -> u64 {
        self.len
    }

    /// Returns the number of bytes read.
    fn bytes_read(&self) -> u64 {
        self.read
    }

    /// Returns the number of bytes available to read.
    fn bytes_available(&self) -> u64 {
        self.len - self.read
    }
}

impl<B: ReadBytes> ReadBytes for ScopedStream<B> {
    #[inline(always)]
    fn read_byte(&mut self) -> io::Result<u8> {
        if self.len - self.read < 1 {
            return out_of_bounds_error();
        }

        self.read += 1;
        self.inner.read_byte()
    }

    #[inline(always)]
    fn read_double_bytes(&mut self) -> io::Result<[u8; 2]> {
        if self.len - self.read < 2 {
            return out_of_bounds_error();
        }

        self.read += 2;
        self.inner.read_double_bytes()
    }

    #[inline(always)]
    fn read_triple_bytes(&mut self) -> io::Result<[u8; 3]> {
        if self.len - self.read < 3 {
            return out_of_bounds_error();
        }

        self.read += 3;
        self.inner.read_triple_bytes()
    }

    #[inline(always)]
    fn read_quad_bytes(&mut self) -> io::Result<[u8; 4]> {
        if self.len - self.read < 4 {
            return out_of_bounds_error();
        }

        self.read += 4;
        self.inner.read_quad_bytes()
    }

    fn read_buf(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        // Limit read_buf() to the remainder of the scoped bytes if buf has a greater length.
        let scoped_len = cmp::min(self.len - self.read, buf.len() as u64) as usize;
        let result = self.inner.read_buf(&mut buf[0..scoped_len])?;
        self.read += result as u64;
        Ok(result)
    }

    fn read_buf_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        if self.len - self.read < buf.len() as u64 {
            return out_of_bounds_error();
        }

        self.read += buf.len() as u64;
        self.inner.read_buf_exact(buf)
    }

    fn read_boxed_slice_exact(&mut self, len: usize) -> io::Result<Box<[u8]>> {
        if self.len - self.read < len as u64 {
            return out_of_bounds_error();
        }

        self.read += len as u64;
        self.inner.read_boxed_slice_exact(len)
    }

    #[inline(always)]
    fn ignore_bytes(&mut self, count: u64) -> io::Result<()> {
        if self.len - self.read < count {
            return out_of_bounds_error();
        }

        self.read += count;
        self.inner.ignore_bytes(count)
    }

    #[inline(always)]
    fn pos(&self) -> u64 {
        self.inner.pos()
    }
}

#[cfg(test)]
mod tests {
    use super::ScopedStream;
    use crate::io::{BufReader, FiniteStream, ReadBytes};

    #[test]
    fn verify_scoped_stream_bounds() {
        let buf = [1u8, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        let mut reader = BufReader::new(&buf);
        reader.ignore_bytes(2).unwrap();

        let mut scoped = ScopedStream::new(&mut reader, 4);
        assert_eq!(scoped.start(), 2);
        assert_eq!(scoped.read_be_u16().unwrap(), 0x0304);
        assert_eq!(scoped.bytes_available(), 2);

        // Over-reading fails without consuming anything.
        assert!(scoped.read_quad_bytes().is_err());
        assert_eq!(scoped.bytes_read(), 2);
        assert_eq!(scoped.pos(), 4);

        scoped.ignore().unwrap();
        assert_eq!(scoped.bytes_available(), 0);
        assert!(scoped.read_byte().is_err());

        assert_eq!(reader.read_byte().unwrap(), 7);
    }

    #[test]
    fn verify_nested_scoped_streams() {
        let buf = [0u8; 32];
        let mut reader = BufReader::new(&buf);

        let mut outer = ScopedStream::new(&mut reader, 16);
        outer.ignore_bytes(4).unwrap();
        {
            // The inner scope cannot read past the outer scope even if it was given more.
            let mut inner = ScopedStream::new(&mut outer, 20);
            let mut tmp = [0u8; 16];
            assert!(inner.read_buf_exact(&mut tmp).is_err());
            assert_eq!(inner.read_buf(&mut tmp).unwrap(), 12);
        }
        assert_eq!(outer.bytes_available(), 0);
        assert_eq!(reader.pos(), 16);
    }

    #[test]
    fn verify_scoped_boxed_slice() {
        let buf = [1u8, 2, 3, 4, 5, 6];
        let mut reader = BufReader::new(&buf);

        let mut scoped = ScopedStream::new(&mut reader, 4);
        assert!(scoped.read_boxed_slice_exact(5).is_err());
        assert_eq!(scoped.bytes_read(), 0);
        assert_eq!(&*scoped.read_boxed_slice_exact(3).unwrap(), &[1, 2, 3]);

        // The bound may claim more than the inner stream holds.
        let mut reader = BufReader::new(&buf);
        let mut scoped = ScopedStream::new(&mut reader, u64::MAX);
        assert!(scoped.read_boxed_slice_exact(1 << 20).is_err());
        assert_eq!(reader.pos(), 0);
    }
}
