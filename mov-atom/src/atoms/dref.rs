// Mov Atom
// Copyright (c) 2026 The Project Mov Atom Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use mov_atom_core::errors::{decode_error, Result};
use mov_atom_core::fourcc::FourCc;
use mov_atom_core::io::{FiniteStream, ReadBytes, WriteBytes};

use crate::atoms::{
    check_entry_count, entry_capacity, read_version_flags, write_version_flags, AtomHeader,
    LeafBody,
};
use crate::registry::codes;

/// The size of a data reference with no data.
const MIN_ENTRY_LEN: u64 = 12;

/// A data reference. Tells the media handler where the media data is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataReference {
    /// Reference type, such as `alis` or `url `.
    pub kind: FourCc,
    pub version: u8,
    /// A flags value of 1 means the media data is in the same file as the movie.
    pub flags: u32,
    pub data: Box<[u8]>,
}

impl DataReference {
    fn encoded_len(&self) -> u64 {
        MIN_ENTRY_LEN + self.data.len() as u64
    }
}

/// Data reference atom.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DrefAtom {
    pub version: u8,
    pub flags: u32,
    pub entries: Vec<DataReference>,
}

impl DrefAtom {
    pub fn add_entry(&mut self, kind: FourCc, version: u8, flags: u32, data: impl Into<Box<[u8]>>) {
        self.entries.push(DataReference { kind, version, flags, data: data.into() });
    }
}

impl LeafBody for DrefAtom {
    fn read<B: ReadBytes + FiniteStream>(reader: &mut B, _: &AtomHeader) -> Result<Self> {
        let (version, flags) = read_version_flags(reader)?;

        let entry_count = reader.read_be_u32()?;
        check_entry_count(reader, entry_count, MIN_ENTRY_LEN, "dref: invalid entry count")?;

        let mut entries = Vec::with_capacity(entry_capacity(entry_count));

        for _ in 0..entry_count {
            let size = u64::from(reader.read_be_u32()?);

            if size < MIN_ENTRY_LEN || size - 4 > reader.bytes_available() {
                return decode_error("dref: invalid entry size");
            }

            let kind = FourCc::new(reader.read_quad_bytes()?);
            let (version, flags) = read_version_flags(reader)?;
            let data = reader.read_boxed_slice_exact((size - MIN_ENTRY_LEN) as usize)?;

            entries.push(DataReference { kind, version, flags, data });
        }

        Ok(DrefAtom { version, flags, entries })
    }

    fn code(&self) -> FourCc {
        codes::DREF
    }

    fn body_len(&self) -> u64 {
        8 + self.entries.iter().map(DataReference::encoded_len).sum::<u64>()
    }

    fn write<W: WriteBytes + ?Sized>(&self, writer: &mut W) -> Result<()> {
        write_version_flags(writer, self.version, self.flags)?;
        writer.write_be_u32(self.entries.len() as u32)?;

        for entry in &self.entries {
            writer.write_be_u32(entry.encoded_len() as u32)?;
            writer.write_quad_bytes(entry.kind.get())?;
            write_version_flags(writer, entry.version, entry.flags)?;
            writer.write_buf(&entry.data)?;
        }
        Ok(())
    }
}
