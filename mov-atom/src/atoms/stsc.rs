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

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StscEntry {
    /// The 1-based index of the first chunk of the run.
    pub first_chunk: u32,
    pub samples_per_chunk: u32,
    pub sample_desc_index: u32,
}

/// Sample to Chunk Atom
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StscAtom {
    pub version: u8,
    pub flags: u32,
    /// Entries.
    pub entries: Vec<StscEntry>,
}

impl StscAtom {
    /// Record a chunk. A new entry is only added if the number of samples per chunk or the sample
    /// description differs from the previous run.
    pub fn add_chunk(&mut self, first_chunk: u32, samples_per_chunk: u32, sample_desc_index: u32) {
        if let Some(last) = self.entries.last() {
            if last.samples_per_chunk == samples_per_chunk
                && last.sample_desc_index == sample_desc_index
            {
                return;
            }
        }

        self.entries.push(StscEntry { first_chunk, samples_per_chunk, sample_desc_index });
    }
}

impl LeafBody for StscAtom {
    fn read<B: ReadBytes + FiniteStream>(reader: &mut B, _: &AtomHeader) -> Result<Self> {
        let (version, flags) = read_version_flags(reader)?;

        let entry_count = reader.read_be_u32()?;
        check_entry_count(reader, entry_count, 12, "stsc: invalid entry count")?;

        let mut entries = Vec::with_capacity(entry_capacity(entry_count));

        for _ in 0..entry_count {
            entries.push(StscEntry {
                first_chunk: reader.read_be_u32()?,
                samples_per_chunk: reader.read_be_u32()?,
                sample_desc_index: reader.read_be_u32()?,
            });
        }

        Ok(StscAtom { version, flags, entries })
    }

    fn code(&self) -> FourCc {
        codes::STSC
    }

    fn body_len(&self) -> u64 {
        8 + 12 * self.entries.len() as u64
    }

    fn write<W: WriteBytes + ?Sized>(&self, writer: &mut W) -> Result<()> {
        write_version_flags(writer, self.version, self.flags)?;
        writer.write_be_u32(self.entries.len() as u32)?;

        for entry in &self.entries {
            writer.write_be_u32(entry.first_chunk)?;
            writer.write_be_u32(entry.samples_per_chunk)?;
            writer.write_be_u32(entry.sample_desc_index)?;
        }
        Ok(())
    }
}
