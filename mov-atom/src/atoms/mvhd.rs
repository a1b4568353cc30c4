// Mov Atom
// Copyright (c) 2026 The Project Mov Atom Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use mov_atom_core::errors::{decode_error, encode_error, Result};
use mov_atom_core::fourcc::FourCc;
use mov_atom_core::fp::{FpU16, FpU8};
use mov_atom_core::io::{FiniteStream, ReadBytes, WriteBytes};

use crate::atoms::{read_version_flags, write_version_flags, AtomHeader, LeafBody};
use crate::registry::codes;

/// The identity transformation matrix.
pub(crate) const IDENTITY_MATRIX: [u32; 9] =
    [0x0001_0000, 0, 0, 0, 0x0001_0000, 0, 0, 0, 0x4000_0000];

pub(crate) fn read_matrix<B: ReadBytes>(reader: &mut B) -> Result<[u32; 9]> {
    let mut matrix = [0; 9];
    for value in matrix.iter_mut() {
        *value = reader.read_be_u32()?;
    }
    Ok(matrix)
}

pub(crate) fn write_matrix<W>(writer: &mut W, matrix: &[u32; 9]) -> Result<()>
where
    W: WriteBytes + ?Sized,
{
    for &value in matrix {
        writer.write_be_u32(value)?;
    }
    Ok(())
}

/// Narrow a time value for a version 0 atom.
pub(crate) fn narrow_time(value: u64, msg: &'static str) -> Result<u32> {
    match u32::try_from(value) {
        Ok(value) => Ok(value),
        Err(_) => encode_error(msg),
    }
}

/// Movie header atom.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MvhdAtom {
    /// Version 0 stores times in 32 bits, version 1 in 64 bits.
    pub version: u8,
    pub flags: u32,
    /// The creation time.
    pub ctime: u64,
    /// The modification time.
    pub mtime: u64,
    /// Timescale for the movie expressed as the number of units per second.
    pub timescale: u32,
    /// The duration of the movie in `timescale` units.
    pub duration: u64,
    /// The preferred rate to play the movie.
    pub rate: FpU16,
    /// The preferred volume to play the movie.
    pub volume: FpU8,
    /// Transformation matrix.
    pub matrix: [u32; 9],
    pub preview_time: u32,
    pub preview_duration: u32,
    pub poster_time: u32,
    pub selection_time: u32,
    pub selection_duration: u32,
    pub current_time: u32,
    /// The track identifier to assign to the next track added to the movie.
    pub next_track_id: u32,
}

impl MvhdAtom {
    pub fn new(timescale: u32, duration: u64) -> Self {
        MvhdAtom { timescale, duration, ..Default::default() }
    }
}

impl Default for MvhdAtom {
    fn default() -> Self {
        MvhdAtom {
            version: 0,
            flags: 0,
            ctime: 0,
            mtime: 0,
            timescale: 600,
            duration: 0,
            rate: FpU16::new(1),
            volume: FpU8::new(1),
            matrix: IDENTITY_MATRIX,
            preview_time: 0,
            preview_duration: 0,
            poster_time: 0,
            selection_time: 0,
            selection_duration: 0,
            current_time: 0,
            next_track_id: 1,
        }
    }
}

impl LeafBody for MvhdAtom {
    fn read<B: ReadBytes + FiniteStream>(reader: &mut B, _: &AtomHeader) -> Result<Self> {
        let (version, flags) = read_version_flags(reader)?;

        let mut mvhd = MvhdAtom { version, flags, ..Default::default() };

        // Version 0 uses 32-bit time values, verion 1 used 64-bit values.
        match version {
            0 => {
                mvhd.ctime = u64::from(reader.read_be_u32()?);
                mvhd.mtime = u64::from(reader.read_be_u32()?);
                mvhd.timescale = reader.read_be_u32()?;
                mvhd.duration = u64::from(reader.read_be_u32()?);
            }
            1 => {
                mvhd.ctime = reader.read_be_u64()?;
                mvhd.mtime = reader.read_be_u64()?;
                mvhd.timescale = reader.read_be_u32()?;
                mvhd.duration = reader.read_be_u64()?;
            }
            _ => return decode_error("mvhd: invalid version"),
        }

        mvhd.rate = FpU16::parse_raw(reader.read_be_u32()?);
        mvhd.volume = FpU8::parse_raw(reader.read_be_u16()?);

        // Reserved
        reader.ignore_bytes(10)?;

        mvhd.matrix = read_matrix(reader)?;
        mvhd.preview_time = reader.read_be_u32()?;
        mvhd.preview_duration = reader.read_be_u32()?;
        mvhd.poster_time = reader.read_be_u32()?;
        mvhd.selection_time = reader.read_be_u32()?;
        mvhd.selection_duration = reader.read_be_u32()?;
        mvhd.current_time = reader.read_be_u32()?;
        mvhd.next_track_id = reader.read_be_u32()?;

        Ok(mvhd)
    }

    fn code(&self) -> FourCc {
        codes::MVHD
    }

    fn body_len(&self) -> u64 {
        if self.version == 1 {
            112
        }
        else {
            100
        }
    }

    fn write<W: WriteBytes + ?Sized>(&self, writer: &mut W) -> Result<()> {
        write_version_flags(writer, self.version, self.flags)?;

        match self.version {
            0 => {
                writer.write_be_u32(narrow_time(self.ctime, "mvhd: ctime overflow")?)?;
                writer.write_be_u32(narrow_time(self.mtime, "mvhd: mtime overflow")?)?;
                writer.write_be_u32(self.timescale)?;
                writer.write_be_u32(narrow_time(self.duration, "mvhd: duration overflow")?)?;
            }
            1 => {
                writer.write_be_u64(self.ctime)?;
                writer.write_be_u64(self.mtime)?;
                writer.write_be_u32(self.timescale)?;
                writer.write_be_u64(self.duration)?;
            }
            _ => return encode_error("mvhd: invalid version"),
        }

        writer.write_be_u32(self.rate.to_raw())?;
        writer.write_be_u16(self.volume.to_raw())?;
        writer.write_buf(&[0; 10])?;
        write_matrix(writer, &self.matrix)?;
        writer.write_be_u32(self.preview_time)?;
        writer.write_be_u32(self.preview_duration)?;
        writer.write_be_u32(self.poster_time)?;
        writer.write_be_u32(self.selection_time)?;
        writer.write_be_u32(self.selection_duration)?;
        writer.write_be_u32(self.current_time)?;
        writer.write_be_u32(self.next_track_id)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mov_atom_core::io::{BufReader, FiniteStream};

    use super::*;

    fn header(len: u64) -> AtomHeader {
        AtomHeader {
            code: codes::MVHD,
            pos: 0,
            header_len: AtomHeader::HEADER_SIZE,
            atom_len: len + 8,
            clamped: false,
        }
    }

    #[test]
    fn verify_mvhd_versions() {
        for version in [0, 1] {
            let mvhd = MvhdAtom {
                version,
                ctime: 3_000_000_000,
                duration: 90_000,
                next_track_id: 3,
                ..Default::default()
            };

            let mut buf = Vec::new();
            mvhd.write(&mut buf).unwrap();
            assert_eq!(buf.len() as u64, mvhd.body_len());

            let mut reader = BufReader::new(&buf);
            let read = MvhdAtom::read(&mut reader, &header(buf.len() as u64)).unwrap();
            assert_eq!(reader.bytes_available(), 0);
            assert_eq!(read, mvhd);
        }
    }

    #[test]
    fn verify_mvhd_rejects_bad_version() {
        let mut buf = vec![0u8; 100];
        buf[0] = 2;
        assert!(MvhdAtom::read(&mut BufReader::new(&buf), &header(100)).is_err());

        let mvhd = MvhdAtom { duration: u64::from(u32::MAX) + 1, ..Default::default() };
        assert!(mvhd.write(&mut Vec::new()).is_err());
    }
}
