// Mov Atom
// Copyright (c) 2026 The Project Mov Atom Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io;
use std::io::Read;

use super::ReadBytes;

/// A `SourceStream` adapts any [`std::io::Read`] into a forward-only [`ReadBytes`] stream.
///
/// Reads are buffered. The stream keeps its own count of consumed bytes, so the source does not
/// need to be seekable.
pub struct SourceStream<R: io::Read> {
    inner: io::BufReader<R>,
    pos: u64,
}

impl<R: io::Read> SourceStream<R> {
    /// The default capacity of the read-ahead buffer.
    const DEFAULT_BUFFER_LEN: usize = 64 * 1024;

    /// Instantiates a new `SourceStream` reading from `source`.
    pub fn new(source: R) -> Self {
        let inner = io::BufReader::with_capacity(Self::DEFAULT_BUFFER_LEN, source);
        SourceStream { inner, pos: 0 }
    }

    /// Gets a reference to the underlying source.
    pub fn get_ref(&self) -> &R {
        self.inner.get_ref()
    }

    /// Unwraps this `SourceStream`, returning the underlying source. Buffered data is lost.
    pub fn into_inner(self) -> R {
        self.inner.into_inner()
    }
}

impl<R: io::Read> ReadBytes for SourceStream<R> {
    #[inline(always)]
    fn read_byte(&mut self) -> io::Result<u8> {
        let mut byte = [0u8; 1];
        self.read_buf_exact(&mut byte)?;
        Ok(byte[0])
    }

    #[inline(always)]
    fn read_double_bytes(&mut self) -> io::Result<[u8; 2]> {
        let mut bytes = [0u8; 2];
        self.read_buf_exact(&mut bytes)?;
        Ok(bytes)
    }

    #[inline(always)]
    fn read_triple_bytes(&mut self) -> io::Result<[u8; 3]> {
        let mut bytes = [0u8; 3];
        self.read_buf_exact(&mut bytes)?;
        Ok(bytes)
    }

    #[inline(always)]
    fn read_quad_bytes(&mut self) -> io::Result<[u8; 4]> {
        let mut bytes = [0u8; 4];
        self.read_buf_exact(&mut bytes)?;
        Ok(bytes)
    }

    fn read_buf(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let len = self.inner.read(buf)?;
        self.pos += len as u64;
        Ok(len)
    }

    fn read_buf_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.inner.read_exact(buf)?;
        self.pos += buf.len() as u64;
        Ok(())
    }

    fn read_boxed_slice_exact(&mut self, len: usize) -> io::Result<Box<[u8]>> {
        let mut buf = Vec::new();

        let read = (&mut self.inner).take(len as u64).read_to_end(&mut buf)?;
        self.pos += read as u64;

        if read < len {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "end of stream"));
        }
        Ok(buf.into_boxed_slice())
    }

    fn ignore_bytes(&mut self, count: u64) -> io::Result<()> {
        let skipped = io::copy(&mut (&mut self.inner).take(count), &mut io::sink())?;
        self.pos += skipped;

        if skipped < count {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "end of stream"));
        }
        Ok(())
    }

    #[inline(always)]
    fn pos(&self) -> u64 {
        self.pos
    }
}
