// Mov Atom
// Copyright (c) 2026 The Project Mov Atom Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use mov_atom_core::errors::Result;
use mov_atom_core::fourcc::FourCc;
use mov_atom_core::io::{FiniteStream, ReadBytes, WriteBytes};

use crate::atoms::{
    check_entry_count, entry_capacity, read_version_flags, write_version_flags, AtomHeader,
    LeafBody,
};
use crate::registry::codes;

/// Chunk offset atom (32-bit version).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StcoAtom {
    pub version: u8,
    pub flags: u32,
    pub chunk_offsets: Vec<u32>,
}

impl StcoAtom {
    pub fn add_chunk_offset(&mut self, offset: u32) {
        self.chunk_offsets.push(offset);
    }
}

impl LeafBody for StcoAtom {
    fn read<B: ReadBytes + FiniteStream>(reader: &mut B, _: &AtomHeader) -> Result<Self> {
        let (version, flags) = read_version_flags(reader)?;

        let entry_count = reader.read_be_u32()?;
        check_entry_count(reader, entry_count, 4, "stco: invalid entry count")?;

        let mut chunk_offsets = Vec::with_capacity(entry_capacity(entry_count));

        for _ in 0..entry_count {
            chunk_offsets.push(reader.read_be_u32()?);
        }

        Ok(StcoAtom { version, flags, chunk_offsets })
    }

    fn code(&self) -> FourCc {
        codes::STCO
    }

    fn body_len(&self) -> u64 {
        8 + 4 * self.chunk_offsets.len() as u64
    }

    fn write<W: WriteBytes + ?Sized>(&self, writer: &mut W) -> Result<()> {
        write_version_flags(writer, self.version, self.flags)?;
        writer.write_be_u32(self.chunk_offsets.len() as u32)?;

        for &offset in &self.chunk_offsets {
            writer.write_be_u32(offset)?;
        }
        Ok(())
    }
}
