// Mov Atom
// Copyright (c) 2026 The Project Mov Atom Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use bitflags::bitflags;

use mov_atom_core::errors::{decode_error, encode_error, Result};
use mov_atom_core::fourcc::FourCc;
use mov_atom_core::fp::{FpU16, FpU8};
use mov_atom_core::io::{FiniteStream, ReadBytes, WriteBytes};

use crate::atoms::mvhd::{narrow_time, read_matrix, write_matrix, IDENTITY_MATRIX};
use crate::atoms::{read_version_flags, write_version_flags, AtomHeader, LeafBody};
use crate::registry::codes;

bitflags! {
    /// Track header flags.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct TrackFlags: u32 {
        const ENABLED    = 0x1;
        const IN_MOVIE   = 0x2;
        const IN_PREVIEW = 0x4;
        const IN_POSTER  = 0x8;
    }
}

impl Default for TrackFlags {
    fn default() -> Self {
        TrackFlags::all()
    }
}

/// Track header atom.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TkhdAtom {
    pub version: u8,
    /// Track header flags. Undefined bits are preserved.
    pub flags: TrackFlags,
    /// Creation time.
    pub ctime: u64,
    /// Modification time.
    pub mtime: u64,
    /// Track identifier.
    pub id: u32,
    /// Track duration in the timescale units specified in the movie header. This value is equal to
    /// the sum of the durations of all the track's edits.
    pub duration: u64,
    /// Layer.
    pub layer: i16,
    /// Grouping identifier.
    pub alternate_group: i16,
    /// Preferred volume for track playback.
    pub volume: FpU8,
    pub matrix: [u32; 9],
    /// Width of the track in pixels.
    pub width: FpU16,
    /// Height of the track in pixels.
    pub height: FpU16,
}

impl TkhdAtom {
    /// Instantiate the header of a visual track. Visual tracks are silent.
    pub fn new_video(id: u32, duration: u64, width: u16, height: u16) -> Self {
        TkhdAtom {
            id,
            duration,
            volume: FpU8::default(),
            width: FpU16::new(width),
            height: FpU16::new(height),
            ..Default::default()
        }
    }

    /// Instantiate the header of an audio track.
    pub fn new_sound(id: u32, duration: u64) -> Self {
        TkhdAtom { id, duration, ..Default::default() }
    }
}

impl Default for TkhdAtom {
    fn default() -> Self {
        TkhdAtom {
            version: 0,
            flags: TrackFlags::default(),
            ctime: 0,
            mtime: 0,
            id: 1,
            duration: 0,
            layer: 0,
            alternate_group: 0,
            volume: FpU8::new(1),
            matrix: IDENTITY_MATRIX,
            width: FpU16::default(),
            height: FpU16::default(),
        }
    }
}

impl LeafBody for TkhdAtom {
    fn read<B: ReadBytes + FiniteStream>(reader: &mut B, _: &AtomHeader) -> Result<Self> {
        let (version, flags) = read_version_flags(reader)?;

        let mut tkhd =
            TkhdAtom { version, flags: TrackFlags::from_bits_retain(flags), ..Default::default() };

        // Version 0 uses 32-bit time values, verion 1 used 64-bit values.
        match version {
            0 => {
                tkhd.ctime = u64::from(reader.read_be_u32()?);
                tkhd.mtime = u64::from(reader.read_be_u32()?);
                tkhd.id = reader.read_be_u32()?;
                let _ = reader.read_be_u32()?; // Reserved
                tkhd.duration = u64::from(reader.read_be_u32()?);
            }
            1 => {
                tkhd.ctime = reader.read_be_u64()?;
                tkhd.mtime = reader.read_be_u64()?;
                tkhd.id = reader.read_be_u32()?;
                let _ = reader.read_be_u32()?; // Reserved
                tkhd.duration = reader.read_be_u64()?;
            }
            _ => return decode_error("tkhd: invalid version"),
        }

        // Reserved
        let _ = reader.read_be_u64()?;

        tkhd.layer = reader.read_be_i16()?;
        tkhd.alternate_group = reader.read_be_i16()?;
        tkhd.volume = FpU8::parse_raw(reader.read_be_u16()?);

        // Reserved
        let _ = reader.read_be_u16()?;

        tkhd.matrix = read_matrix(reader)?;
        tkhd.width = FpU16::parse_raw(reader.read_be_u32()?);
        tkhd.height = FpU16::parse_raw(reader.read_be_u32()?);

        Ok(tkhd)
    }

    fn code(&self) -> FourCc {
        codes::TKHD
    }

    fn body_len(&self) -> u64 {
        if self.version == 1 {
            96
        }
        else {
            84
        }
    }

    fn write<W: WriteBytes + ?Sized>(&self, writer: &mut W) -> Result<()> {
        write_version_flags(writer, self.version, self.flags.bits())?;

        match self.version {
            0 => {
                writer.write_be_u32(narrow_time(self.ctime, "tkhd: ctime overflow")?)?;
                writer.write_be_u32(narrow_time(self.mtime, "tkhd: mtime overflow")?)?;
                writer.write_be_u32(self.id)?;
                writer.write_be_u32(0)?;
                writer.write_be_u32(narrow_time(self.duration, "tkhd: duration overflow")?)?;
            }
            1 => {
                writer.write_be_u64(self.ctime)?;
                writer.write_be_u64(self.mtime)?;
                writer.write_be_u32(self.id)?;
                writer.write_be_u32(0)?;
                writer.write_be_u64(self.duration)?;
            }
            _ => return encode_error("tkhd: invalid version"),
        }

        writer.write_be_u64(0)?;
        writer.write_be_i16(self.layer)?;
        writer.write_be_i16(self.alternate_group)?;
        writer.write_be_u16(self.volume.to_raw())?;
        writer.write_be_u16(0)?;
        write_matrix(writer, &self.matrix)?;
        writer.write_be_u32(self.width.to_raw())?;
        writer.write_be_u32(self.height.to_raw())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mov_atom_core::io::BufReader;

    use super::*;

    #[test]
    fn verify_tkhd_preserves_flags() {
        let mut tkhd = TkhdAtom::new_video(2, 1200, 640, 480);
        tkhd.flags = TrackFlags::ENABLED | TrackFlags::from_bits_retain(0x100);

        let mut buf = Vec::new();
        tkhd.write(&mut buf).unwrap();
        assert_eq!(buf.len(), 84);
        assert_eq!(&buf[0..4], &[0, 0, 1, 1]);

        let header = AtomHeader {
            code: codes::TKHD,
            pos: 0,
            header_len: AtomHeader::HEADER_SIZE,
            atom_len: 92,
            clamped: false,
        };
        let read = TkhdAtom::read(&mut BufReader::new(&buf), &header).unwrap();
        assert_eq!(read, tkhd);
        assert_eq!(f64::from(read.width), 640.0);
        assert!(!read.flags.contains(TrackFlags::IN_MOVIE));
    }
}
