// Mov Atom
// Copyright (c) 2026 The Project Mov Atom Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use mov_atom_core::errors::{encode_error, limit_error, Result};
use mov_atom_core::fourcc::FourCc;
use mov_atom_core::io::{FiniteStream, ReadBytes, WriteBytes};

use crate::atoms::{
    check_entry_count, entry_capacity, read_version_flags, write_version_flags, AtomHeader,
    LeafBody,
};
use crate::registry::codes;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SampleSize {
    /// Every one of `count` samples has the same non-zero size.
    Constant { size: u32, count: u32 },
    /// The size of each sample.
    Table(Vec<u32>),
}

impl Default for SampleSize {
    fn default() -> Self {
        SampleSize::Table(Vec::new())
    }
}

/// Sample Size Atom
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StszAtom {
    pub version: u8,
    pub flags: u32,
    pub sample_sizes: SampleSize,
}

impl StszAtom {
    /// Append the size of the next sample. Fails if the atom already describes as many samples
    /// as its count field can hold.
    pub fn add_sample_size(&mut self, sample_size: u32) -> Result<()> {
        if self.sample_count() == u32::MAX {
            return limit_error("stsz: too many samples");
        }

        match &mut self.sample_sizes {
            SampleSize::Table(sizes) => sizes.push(sample_size),
            SampleSize::Constant { size, count } if *size == sample_size => *count += 1,
            SampleSize::Constant { size, count } => {
                let mut sizes = vec![*size; *count as usize];
                sizes.push(sample_size);
                self.sample_sizes = SampleSize::Table(sizes);
            }
        }
        Ok(())
    }

    /// Declare that all `count` samples are `size` bytes long.
    pub fn set_constant(&mut self, size: u32, count: u32) {
        // A constant size of zero is the marker for a table, so it must be stored as one.
        self.sample_sizes = if size == 0 {
            SampleSize::Table(vec![0; count as usize])
        }
        else {
            SampleSize::Constant { size, count }
        };
    }

    /// The number of samples described.
    pub fn sample_count(&self) -> u32 {
        match &self.sample_sizes {
            SampleSize::Constant { count, .. } => *count,
            SampleSize::Table(sizes) => u32::try_from(sizes.len()).unwrap_or(u32::MAX),
        }
    }
}

impl LeafBody for StszAtom {
    fn read<B: ReadBytes + FiniteStream>(reader: &mut B, _: &AtomHeader) -> Result<Self> {
        let (version, flags) = read_version_flags(reader)?;

        let sample_size = reader.read_be_u32()?;
        let sample_count = reader.read_be_u32()?;

        let sample_sizes = if sample_size == 0 {
            check_entry_count(reader, sample_count, 4, "stsz: invalid sample count")?;

            let mut entries = Vec::with_capacity(entry_capacity(sample_count));

            for _ in 0..sample_count {
                entries.push(reader.read_be_u32()?);
            }

            SampleSize::Table(entries)
        }
        else {
            SampleSize::Constant { size: sample_size, count: sample_count }
        };

        Ok(StszAtom { version, flags, sample_sizes })
    }

    fn code(&self) -> FourCc {
        codes::STSZ
    }

    fn body_len(&self) -> u64 {
        match &self.sample_sizes {
            SampleSize::Constant { .. } => 12,
            SampleSize::Table(sizes) => 12 + 4 * sizes.len() as u64,
        }
    }

    fn write<W: WriteBytes + ?Sized>(&self, writer: &mut W) -> Result<()> {
        write_version_flags(writer, self.version, self.flags)?;

        match &self.sample_sizes {
            SampleSize::Constant { size, count } => {
                writer.write_be_u32(*size)?;
                writer.write_be_u32(*count)?;
            }
            SampleSize::Table(sizes) => {
                writer.write_be_u32(0)?;
                let count = match u32::try_from(sizes.len()) {
                    Ok(count) => count,
                    Err(_) => return encode_error("stsz: too many samples"),
                };
                writer.write_be_u32(count)?;
                for &size in sizes {
                    writer.write_be_u32(size)?;
                }
            }
        }
        Ok(())
    }
}
