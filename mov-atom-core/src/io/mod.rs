// Mov Atom
// Copyright (c) 2026 The Project Mov Atom Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `io` module implements byte-level big-endian I/O for atom trees.
//!
//! The following nomenclature is used to denote where the data being read is sourced from:
//!  * A `Stream` consumes any source implementing [`ReadBytes`], or wraps a [`std::io::Read`].
//!  * A `Reader` consumes a `&[u8]`.
//!
//! Every atom body is read through a [`ScopedStream`] so that a decoder may never consume bytes
//! beyond the size its header declared. Recursion through nested atoms happens on
//! `&mut dyn ReadBytes`, so both [`ReadBytes`] and [`WriteBytes`] are object-safe.

use std::cmp;
use std::io;

mod buf_reader;
mod scoped_stream;
mod source_stream;
mod stream_writer;

pub use buf_reader::BufReader;
pub use scoped_stream::ScopedStream;
pub use source_stream::SourceStream;
pub use stream_writer::StreamWriter;

/// The most bytes allocated at once while reading a variable-length buffer.
const READ_CHUNK_LEN: usize = 64 * 1024;

/// `ReadBytes` provides methods to read bytes and interpret them as big-endian integers of
/// standard widths.
pub trait ReadBytes {
    /// Reads a single byte from the stream and returns it or an error.
    fn read_byte(&mut self) -> io::Result<u8>;

    /// Reads two bytes from the stream and returns them in read-order or an error.
    fn read_double_bytes(&mut self) -> io::Result<[u8; 2]>;

    /// Reads three bytes from the stream and returns them in read-order or an error.
    fn read_triple_bytes(&mut self) -> io::Result<[u8; 3]>;

    /// Reads four bytes from the stream and returns them in read-order or an error.
    fn read_quad_bytes(&mut self) -> io::Result<[u8; 4]>;

    /// Reads up-to the number of bytes required to fill buf or returns an error.
    fn read_buf(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Reads exactly the number of bytes required to fill be provided buffer or returns an error.
    fn read_buf_exact(&mut self, buf: &mut [u8]) -> io::Result<()>;

    /// Reads a single unsigned byte from the stream and returns it or an error.
    #[inline(always)]
    fn read_u8(&mut self) -> io::Result<u8> {
        self.read_byte()
    }

    /// Reads two bytes from the stream and interprets them as an unsigned 16-bit big-endian
    /// integer or returns an error.
    #[inline(always)]
    fn read_be_u16(&mut self) -> io::Result<u16> {
        Ok(u16::from_be_bytes(self.read_double_bytes()?))
    }

    /// Reads two bytes from the stream and interprets them as an signed 16-bit big-endian
    /// integer or returns an error.
    #[inline(always)]
    fn read_be_i16(&mut self) -> io::Result<i16> {
        Ok(i16::from_be_bytes(self.read_double_bytes()?))
    }

    /// Reads three bytes from the stream and interprets them as an unsigned 24-bit big-endian
    /// integer or returns an error.
    #[inline(always)]
    fn read_be_u24(&mut self) -> io::Result<u32> {
        let [a, b, c] = self.read_triple_bytes()?;
        Ok(u32::from_be_bytes([0, a, b, c]))
    }

    /// Reads four bytes from the stream and interprets them as an unsigned 32-bit big-endian
    /// integer or returns an error.
    #[inline(always)]
    fn read_be_u32(&mut self) -> io::Result<u32> {
        Ok(u32::from_be_bytes(self.read_quad_bytes()?))
    }

    /// Reads four bytes from the stream and interprets them as a signed 32-bit big-endian
    /// integer or returns an error.
    #[inline(always)]
    fn read_be_i32(&mut self) -> io::Result<i32> {
        Ok(i32::from_be_bytes(self.read_quad_bytes()?))
    }

    /// Reads eight bytes from the stream and interprets them as an unsigned 64-bit big-endian
    /// integer or returns an error.
    #[inline(always)]
    fn read_be_u64(&mut self) -> io::Result<u64> {
        let mut buf = [0u8; 8];
        self.read_buf_exact(&mut buf)?;
        Ok(u64::from_be_bytes(buf))
    }

    /// Reads eight bytes from the stream and interprets them as an signed 64-bit big-endian
    /// integer or returns an error.
    #[inline(always)]
    fn read_be_i64(&mut self) -> io::Result<i64> {
        let mut buf = [0u8; 8];
        self.read_buf_exact(&mut buf)?;
        Ok(i64::from_be_bytes(buf))
    }

    /// Reads exactly the number of bytes requested, and returns a boxed slice of the data or an
    /// error.
    ///
    /// The buffer grows as data arrives, so a corrupt length never causes a large allocation up
    /// front.
    fn read_boxed_slice_exact(&mut self, len: usize) -> io::Result<Box<[u8]>> {
        let mut buf = Vec::new();

        while buf.len() < len {
            let start = buf.len();
            buf.resize(start + cmp::min(len - start, READ_CHUNK_LEN), 0);

            let read = self.read_buf(&mut buf[start..])?;

            if read == 0 {
                return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "end of stream"));
            }

            buf.truncate(start + read);
        }

        Ok(buf.into_boxed_slice())
    }

    /// Ignores the specified number of bytes from the stream or returns an error.
    fn ignore_bytes(&mut self, count: u64) -> io::Result<()>;

    /// Gets the position of the stream.
    fn pos(&self) -> u64;
}

impl<R: ReadBytes + ?Sized> ReadBytes for &mut R {
    #[inline(always)]
    fn read_byte(&mut self) -> io::Result<u8> {
        (**self).read_byte()
    }

    #[inline(always)]
    fn read_double_bytes(&mut self) -> io::Result<[u8; 2]> {
        (**self).read_double_bytes()
    }

    #[inline(always)]
    fn read_triple_bytes(&mut self) -> io::Result<[u8; 3]> {
        (**self).read_triple_bytes()
    }

    #[inline(always)]
    fn read_quad_bytes(&mut self) -> io::Result<[u8; 4]> {
        (**self).read_quad_bytes()
    }

    #[inline(always)]
    fn read_buf(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read_buf(buf)
    }

    #[inline(always)]
    fn read_buf_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        (**self).read_buf_exact(buf)
    }

    #[inline(always)]
    fn read_boxed_slice_exact(&mut self, len: usize) -> io::Result<Box<[u8]>> {
        (**self).read_boxed_slice_exact(len)
    }

    #[inline(always)]
    fn ignore_bytes(&mut self, count: u64) -> io::Result<()> {
        (**self).ignore_bytes(count)
    }

    #[inline(always)]
    fn pos(&self) -> u64 {
        (**self).pos()
    }
}

/// A `FiniteStream` is a stream that has a known length in bytes.
pub trait FiniteStream {
    /// Returns the length of the the stream in bytes.
    fn byte_len(&self) -> u64;

    /// Returns the number of bytes that have been read.
    fn bytes_read(&self) -> u64;

    /// Returns the number of bytes available for reading.
    fn bytes_available(&self) -> u64;
}

impl<F: FiniteStream + ?Sized> FiniteStream for &mut F {
    fn byte_len(&self) -> u64 {
        (**self).byte_len()
    }

    fn bytes_read(&self) -> u64 {
        (**self).bytes_read()
    }

    fn bytes_available(&self) -> u64 {
        (**self).bytes_available()
    }
}

/// `WriteBytes` provides methods to write big-endian integers of standard widths and raw byte
/// buffers to a sink.
pub trait WriteBytes {
    /// Writes a single byte to the sink.
    fn write_byte(&mut self, byte: u8) -> io::Result<()>;

    /// Writes the entire buffer to the sink.
    fn write_buf(&mut self, buf: &[u8]) -> io::Result<()>;

    /// Gets the number of bytes written to the sink so far.
    fn pos(&self) -> u64;

    #[inline(always)]
    fn write_u8(&mut self, val: u8) -> io::Result<()> {
        self.write_byte(val)
    }

    #[inline(always)]
    fn write_quad_bytes(&mut self, bytes: [u8; 4]) -> io::Result<()> {
        self.write_buf(&bytes)
    }

    #[inline(always)]
    fn write_be_u16(&mut self, val: u16) -> io::Result<()> {
        self.write_buf(&val.to_be_bytes())
    }

    #[inline(always)]
    fn write_be_i16(&mut self, val: i16) -> io::Result<()> {
        self.write_buf(&val.to_be_bytes())
    }

    /// Writes the low 24 bits of `val` in big-endian order.
    #[inline(always)]
    fn write_be_u24(&mut self, val: u32) -> io::Result<()> {
        self.write_buf(&val.to_be_bytes()[1..])
    }

    #[inline(always)]
    fn write_be_u32(&mut self, val: u32) -> io::Result<()> {
        self.write_buf(&val.to_be_bytes())
    }

    #[inline(always)]
    fn write_be_i32(&mut self, val: i32) -> io::Result<()> {
        self.write_buf(&val.to_be_bytes())
    }

    #[inline(always)]
    fn write_be_u64(&mut self, val: u64) -> io::Result<()> {
        self.write_buf(&val.to_be_bytes())
    }

    #[inline(always)]
    fn write_be_i64(&mut self, val: i64) -> io::Result<()> {
        self.write_buf(&val.to_be_bytes())
    }
}

impl<W: WriteBytes + ?Sized> WriteBytes for &mut W {
    #[inline(always)]
    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        (**self).write_byte(byte)
    }

    #[inline(always)]
    fn write_buf(&mut self, buf: &[u8]) -> io::Result<()> {
        (**self).write_buf(buf)
    }

    #[inline(always)]
    fn pos(&self) -> u64 {
        (**self).pos()
    }
}

impl WriteBytes for Vec<u8> {
    #[inline(always)]
    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.push(byte);
        Ok(())
    }

    #[inline(always)]
    fn write_buf(&mut self, buf: &[u8]) -> io::Result<()> {
        self.extend_from_slice(buf);
        Ok(())
    }

    #[inline(always)]
    fn pos(&self) -> u64 {
        self.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::{BufReader, ReadBytes, WriteBytes};

    #[test]
    fn verify_write_then_read_integers() {
        let mut out = Vec::new();
        out.write_be_u16(0x0102).unwrap();
        out.write_be_u24(0xaa030405).unwrap();
        out.write_be_i32(-2).unwrap();
        out.write_be_u64(0x0001_0000_0000_0010).unwrap();
        out.write_quad_bytes(*b"moov").unwrap();

        assert_eq!(out.pos(), 2 + 3 + 4 + 8 + 4);
        assert_eq!(&out[..5], &[0x01, 0x02, 0x03, 0x04, 0x05]);

        let mut reader = BufReader::new(&out);
        assert_eq!(reader.read_be_u16().unwrap(), 0x0102);
        assert_eq!(reader.read_be_u24().unwrap(), 0x030405);
        assert_eq!(reader.read_be_i32().unwrap(), -2);
        assert_eq!(reader.read_be_u64().unwrap(), 0x0001_0000_0000_0010);
        assert_eq!(&reader.read_quad_bytes().unwrap(), b"moov");
        assert!(reader.read_byte().is_err());
    }

    #[test]
    fn verify_dyn_read_bytes() {
        let buf = [0u8, 0, 0, 8, b'f', b'r', b'e', b'e'];
        let mut reader = BufReader::new(&buf);
        let dyn_reader: &mut dyn ReadBytes = &mut reader;

        assert_eq!(dyn_reader.read_be_u32().unwrap(), 8);
        assert_eq!(dyn_reader.pos(), 4);
    }
}
