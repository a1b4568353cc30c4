// Mov Atom
// Copyright (c) 2026 The Project Mov Atom Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use mov_atom_core::errors::{decode_error, Result};
use mov_atom_core::fourcc::FourCc;
use mov_atom_core::io::{FiniteStream, ReadBytes, WriteBytes};

use crate::atoms::{read_remainder, AtomHeader, LeafBody};
use crate::registry::codes;

/// Well-known type indicators of a `data` atom.
pub mod data_type {
    /// Binary data.
    pub const BINARY: u32 = 0;
    /// UTF-8 text.
    pub const UTF8: u32 = 1;
    /// UTF-16BE text.
    pub const UTF16: u32 = 2;
    /// JPEG image.
    pub const JPEG: u32 = 13;
    /// PNG image.
    pub const PNG: u32 = 14;
    /// Big-endian signed integer.
    pub const SIGNED_INT: u32 = 21;
}

/// A metadata value atom as found in an iTunes-style item list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataAtom {
    /// Reserved, always zero.
    pub version: u8,
    /// Well-known type indicator of the payload, see [`data_type`].
    pub data_type: u32,
    /// Country and language of the value.
    pub locale: u32,
    pub payload: Box<[u8]>,
}

impl DataAtom {
    pub fn new(data_type: u32, payload: impl Into<Box<[u8]>>) -> Self {
        DataAtom { data_type, payload: payload.into(), ..Default::default() }
    }

    pub fn utf8(text: &str) -> Self {
        DataAtom::new(data_type::UTF8, text.as_bytes())
    }

    /// The payload as a string if it holds UTF-8 or UTF-16 text.
    pub fn text(&self) -> Option<String> {
        match self.data_type {
            data_type::UTF8 => Some(String::from_utf8_lossy(&self.payload).to_string()),
            data_type::UTF16 => {
                let units = self.payload.chunks_exact(2).map(|c| u16::from_be_bytes([c[0], c[1]]));
                Some(
                    char::decode_utf16(units)
                        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
                        .collect(),
                )
            }
            _ => None,
        }
    }

    /// The payload as an integer if it holds a signed integer of 1, 2, 3, 4 or 8 bytes.
    pub fn integer(&self) -> Option<i64> {
        if self.data_type != data_type::SIGNED_INT {
            return None;
        }

        let value = match *self.payload {
            [a] => i64::from(a as i8),
            [a, b] => i64::from(i16::from_be_bytes([a, b])),
            [a, b, c] => i64::from(i32::from_be_bytes([a, b, c, 0]) >> 8),
            [a, b, c, d] => i64::from(i32::from_be_bytes([a, b, c, d])),
            [a, b, c, d, e, f, g, h] => i64::from_be_bytes([a, b, c, d, e, f, g, h]),
            _ => return None,
        };

        Some(value)
    }

    /// The image format of the payload, if it holds cover art.
    pub fn image_format(&self) -> Option<&'static str> {
        match self.data_type {
            data_type::JPEG => Some("jpeg"),
            data_type::PNG => Some("png"),
            _ => None,
        }
    }
}

impl LeafBody for DataAtom {
    fn read<B: ReadBytes + FiniteStream>(reader: &mut B, _: &AtomHeader) -> Result<Self> {
        if reader.bytes_available() < 8 {
            return decode_error("data: atom too small");
        }

        let version = reader.read_u8()?;
        let data_type = reader.read_be_u24()?;

        if version != 0 {
            return decode_error("data: invalid type set");
        }

        let locale = reader.read_be_u32()?;

        let payload = read_remainder(reader)?;

        Ok(DataAtom { version, data_type, locale, payload })
    }

    fn code(&self) -> FourCc {
        codes::DATA
    }

    fn body_len(&self) -> u64 {
        8 + self.payload.len() as u64
    }

    fn write<W: WriteBytes + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_u8(self.version)?;
        writer.write_be_u24(self.data_type)?;
        writer.write_be_u32(self.locale)?;
        writer.write_buf(&self.payload)?;
        Ok(())
    }
}
