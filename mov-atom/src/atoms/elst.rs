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
use crate::atoms::{
    check_entry_count, entry_capacity, read_version_flags, write_version_flags, AtomHeader,
    LeafBody,
};
use crate::registry::codes;

/// Edit list entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EditListEntry {
    /// Duration of the edit in movie timescale units.
    pub segment_duration: u64,
    /// Start time within the media, or -1 for an empty edit.
    pub media_time: i64,
    pub media_rate_int: i16,
    pub media_rate_frac: i16,
}

impl EditListEntry {
    /// An edit that plays the media from `media_time` at normal rate.
    pub fn new(segment_duration: u64, media_time: i64) -> Self {
        EditListEntry { segment_duration, media_time, media_rate_int: 1, media_rate_frac: 0 }
    }
}

/// Edit list atom.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ElstAtom {
    pub version: u8,
    pub flags: u32,
    pub entries: Vec<EditListEntry>,
}

impl ElstAtom {
    fn entry_len(&self) -> u64 {
        if self.version == 1 {
            20
        }
        else {
            12
        }
    }
}

impl LeafBody for ElstAtom {
    fn read<B: ReadBytes + FiniteStream>(reader: &mut B, _: &AtomHeader) -> Result<Self> {
        let (version, flags) = read_version_flags(reader)?;

        let entry_len = match version {
            0 => 12,
            1 => 20,
            _ => return decode_error("elst: invalid version"),
        };

        let entry_count = reader.read_be_u32()?;
        check_entry_count(reader, entry_count, entry_len, "elst: invalid entry count")?;

        let mut entries = Vec::with_capacity(entry_capacity(entry_count));

        for _ in 0..entry_count {
            let (segment_duration, media_time) = if version == 0 {
                (u64::from(reader.read_be_u32()?), i64::from(reader.read_be_i32()?))
            }
            else {
                (reader.read_be_u64()?, reader.read_be_i64()?)
            };

            let media_rate_int = reader.read_be_i16()?;
            let media_rate_frac = reader.read_be_i16()?;

            entries.push(EditListEntry {
                segment_duration,
                media_time,
                media_rate_int,
                media_rate_frac,
            });
        }

        Ok(ElstAtom { version, flags, entries })
    }

    fn code(&self) -> FourCc {
        codes::ELST
    }

    fn body_len(&self) -> u64 {
        8 + self.entry_len() * self.entries.len() as u64
    }

    fn write<W: WriteBytes + ?Sized>(&self, writer: &mut W) -> Result<()> {
        write_version_flags(writer, self.version, self.flags)?;
        writer.write_be_u32(self.entries.len() as u32)?;

        for entry in &self.entries {
            match self.version {
                0 => {
                    let media_time = match i32::try_from(entry.media_time) {
                        Ok(media_time) => media_time,
                        Err(_) => return encode_error("elst: media time overflow"),
                    };
                    writer.write_be_u32(narrow_time(
                        entry.segment_duration,
                        "elst: segment duration overflow",
                    )?)?;
                    writer.write_be_i32(media_time)?;
                }
                1 => {
                    writer.write_be_u64(entry.segment_duration)?;
                    writer.write_be_i64(entry.media_time)?;
                }
                _ => return encode_error("elst: invalid version"),
            }
            writer.write_be_i16(entry.media_rate_int)?;
            writer.write_be_i16(entry.media_rate_frac)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mov_atom_core::io::BufReader;

    use super::*;

    #[test]
    fn verify_elst_versions() {
        let header = AtomHeader {
            code: codes::ELST,
            pos: 0,
            header_len: AtomHeader::HEADER_SIZE,
            atom_len: 0,
            clamped: false,
        };

        for version in [0, 1] {
            let elst = ElstAtom {
                version,
                flags: 0,
                entries: vec![EditListEntry::new(1000, -1), EditListEntry::new(600, 0)],
            };

            let mut buf = Vec::new();
            elst.write(&mut buf).unwrap();
            assert_eq!(buf.len() as u64, elst.body_len());
            assert_eq!(ElstAtom::read(&mut BufReader::new(&buf), &header).unwrap(), elst);
        }
    }
}
