// Mov Atom
// Copyright (c) 2026 The Project Mov Atom Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io;

use super::WriteBytes;

/// A `StreamWriter` adapts any [`std::io::Write`] into a [`WriteBytes`] sink and counts the
/// bytes written through it.
pub struct StreamWriter<W: io::Write> {
    inner: W,
    pos: u64,
}

impl<W: io::Write> StreamWriter<W> {
    pub fn new(inner: W) -> Self {
        StreamWriter { inner, pos: 0 }
    }

    /// Flushes the underlying sink.
    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: io::Write> WriteBytes for StreamWriter<W> {
    #[inline(always)]
    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.write_buf(&[byte])
    }

    fn write_buf(&mut self, buf: &[u8]) -> io::Result<()> {
        self.inner.write_all(buf)?;
        self.pos += buf.len() as u64;
        Ok(())
    }

    #[inline(always)]
    fn pos(&self) -> u64 {
        self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::StreamWriter;
    use crate::io::WriteBytes;

    #[test]
    fn verify_stream_writer_counts_bytes() {
        let mut writer = StreamWriter::new(Vec::new());
        writer.write_be_u32(16).unwrap();
        writer.write_quad_bytes(*b"wide").unwrap();
        writer.write_be_u64(0).unwrap();
        writer.flush().unwrap();

        assert_eq!(writer.pos(), 16);
        assert_eq!(&writer.into_inner()[..8], b"\x00\x00\x00\x10wide");
    }
}
