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
pub struct SampleDurationEntry {
    pub sample_count: u32,
    pub sample_delta: u32,
}

/// Time-to-sample atom.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SttsAtom {
    pub version: u8,
    pub flags: u32,
    pub entries: Vec<SampleDurationEntry>,
}

impl SttsAtom {
    /// Append a sample of the given duration. Consecutive samples of equal duration share an
    /// entry.
    pub fn add_sample_time(&mut self, duration: u32) {
        self.add_sample_times(1, duration)
    }

    /// Append `count` samples of the given duration. A run that is full continues in a new entry.
    pub fn add_sample_times(&mut self, mut count: u32, duration: u32) {
        if let Some(last) = self.entries.last_mut() {
            if last.sample_delta == duration {
                let merged = count.min(u32::MAX - last.sample_count);
                last.sample_count += merged;
                count -= merged;
            }
        }

        if count > 0 {
            self.entries.push(SampleDurationEntry { sample_count: count, sample_delta: duration });
        }
    }

    /// The sum of all sample durations.
    pub fn total_duration(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.sample_count) * u64::from(e.sample_delta)).sum()
    }
}

impl LeafBody for SttsAtom {
    fn read<B: ReadBytes + FiniteStream>(reader: &mut B, _: &AtomHeader) -> Result<Self> {
        let (version, flags) = read_version_flags(reader)?;

        let entry_count = reader.read_be_u32()?;
        check_entry_count(reader, entry_count, 8, "stts: invalid entry count")?;

        let mut entries = Vec::with_capacity(entry_capacity(entry_count));

        for _ in 0..entry_count {
            let sample_count = reader.read_be_u32()?;
            let sample_delta = reader.read_be_u32()?;

            entries.push(SampleDurationEntry { sample_count, sample_delta });
        }

        Ok(SttsAtom { version, flags, entries })
    }

    fn code(&self) -> FourCc {
        codes::STTS
    }

    fn body_len(&self) -> u64 {
        8 + 8 * self.entries.len() as u64
    }

    fn write<W: WriteBytes + ?Sized>(&self, writer: &mut W) -> Result<()> {
        write_version_flags(writer, self.version, self.flags)?;
        writer.write_be_u32(self.entries.len() as u32)?;

        for entry in &self.entries {
            writer.write_be_u32(entry.sample_count)?;
            writer.write_be_u32(entry.sample_delta)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_stts_merges_equal_durations() {
        let mut stts = SttsAtom::default();
        stts.add_sample_time(100);
        stts.add_sample_time(100);
        stts.add_sample_time(50);
        stts.add_sample_times(3, 50);
        stts.add_sample_time(100);

        assert_eq!(
            stts.entries,
            vec![
                SampleDurationEntry { sample_count: 2, sample_delta: 100 },
                SampleDurationEntry { sample_count: 4, sample_delta: 50 },
                SampleDurationEntry { sample_count: 1, sample_delta: 100 },
            ]
        );
        assert_eq!(stts.total_duration(), 500);
        assert_eq!(stts.body_len(), 8 + 24);
    }

    #[test]
    fn verify_stts_full_run() {
        let mut stts = SttsAtom::default();
        stts.add_sample_times(u32::MAX - 1, 10);
        stts.add_sample_times(3, 10);

        assert_eq!(
            stts.entries,
            vec![
                SampleDurationEntry { sample_count: u32::MAX, sample_delta: 10 },
                SampleDurationEntry { sample_count: 2, sample_delta: 10 },
            ]
        );
    }
}
