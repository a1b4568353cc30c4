// Mov Atom
// Copyright (c) 2026 The Project Mov Atom Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use mov_atom_core::errors::{decode_error, encode_error, Result};
use mov_atom_core::fourcc::FourCc;
use mov_atom_core::io::{FiniteStream, ReadBytes, WriteBytes};

use crate::atoms::mvhd::narrow_time;
use crate::atoms::{read_version_flags, write_version_flags, AtomHeader, LeafBody};
use crate::registry::codes;

fn parse_language(code: u16) -> Option<String> {
    // An ISO language code outside of these bounds is not valid. Smaller values are Macintosh
    // language codes.
    if code < 0x400 || code > 0x7fff {
        None
    }
    else {
        let chars = [
            ((code >> 10) & 0x1f) as u8 + 0x60,
            ((code >> 5) & 0x1f) as u8 + 0x60,
            ((code >> 0) & 0x1f) as u8 + 0x60,
        ];

        Some(String::from_utf8_lossy(&chars).to_string())
    }
}

fn pack_language(lang: &str) -> Option<u16> {
    let bytes = lang.as_bytes();

    if bytes.len() != 3 || !bytes.iter().all(|b| b.is_ascii_lowercase()) {
        return None;
    }

    Some(bytes.iter().fold(0, |code, &b| (code << 5) | u16::from(b - 0x60)))
}

/// Media header atom.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MdhdAtom {
    pub version: u8,
    pub flags: u32,
    /// Creation time.
    pub ctime: u64,
    /// Modification time.
    pub mtime: u64,
    /// Timescale.
    pub timescale: u32,
    /// Duration of the media in timescale units.
    pub duration: u64,
    /// Packed ISO-639-2/T language code, or a Macintosh language code.
    pub language: u16,
    /// Playback quality.
    pub quality: u16,
}

impl MdhdAtom {
    pub fn new(timescale: u32, duration: u64) -> Self {
        MdhdAtom { timescale, duration, ..Default::default() }
    }

    /// Get the ISO-639-2/T language, if the language is not a Macintosh language code.
    pub fn iso_language(&self) -> Option<String> {
        parse_language(self.language)
    }

    /// Set a three letter ISO-639-2/T language. Returns `false` if `lang` is not valid.
    pub fn set_iso_language(&mut self, lang: &str) -> bool {
        match pack_language(lang) {
            Some(code) => {
                self.language = code;
                true
            }
            None => false,
        }
    }
}

impl LeafBody for MdhdAtom {
    fn read<B: ReadBytes + FiniteStream>(reader: &mut B, _: &AtomHeader) -> Result<Self> {
        let (version, flags) = read_version_flags(reader)?;

        let mut mdhd = MdhdAtom { version, flags, ..Default::default() };

        match version {
            0 => {
                mdhd.ctime = u64::from(reader.read_be_u32()?);
                mdhd.mtime = u64::from(reader.read_be_u32()?);
                mdhd.timescale = reader.read_be_u32()?;
                mdhd.duration = u64::from(reader.read_be_u32()?);
            }
            1 => {
                mdhd.ctime = reader.read_be_u64()?;
                mdhd.mtime = reader.read_be_u64()?;
                mdhd.timescale = reader.read_be_u32()?;
                mdhd.duration = reader.read_be_u64()?;
            }
            _ => {
                return decode_error("mdhd: invalid version");
            }
        }

        mdhd.language = reader.read_be_u16()?;
        mdhd.quality = reader.read_be_u16()?;

        Ok(mdhd)
    }

    fn code(&self) -> FourCc {
        codes::MDHD
    }

    fn body_len(&self) -> u64 {
        if self.version == 1 {
            36
        }
        else {
            24
        }
    }

    fn write<W: WriteBytes + ?Sized>(&self, writer: &mut W) -> Result<()> {
        write_version_flags(writer, self.version, self.flags)?;

        match self.version {
            0 => {
                writer.write_be_u32(narrow_time(self.ctime, "mdhd: ctime overflow")?)?;
                writer.write_be_u32(narrow_time(self.mtime, "mdhd: mtime overflow")?)?;
                writer.write_be_u32(self.timescale)?;
                writer.write_be_u32(narrow_time(self.duration, "mdhd: duration overflow")?)?;
            }
            1 => {
                writer.write_be_u64(self.ctime)?;
                writer.write_be_u64(self.mtime)?;
                writer.write_be_u32(self.timescale)?;
                writer.write_be_u64(self.duration)?;
            }
            _ => return encode_error("mdhd: invalid version"),
        }

        writer.write_be_u16(self.language)?;
        writer.write_be_u16(self.quality)?;
        Ok(())
    }
}
