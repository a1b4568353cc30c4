// Mov Atom
// Copyright (c) 2026 The Project Mov Atom Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use mov_atom_core::errors::Result;
use mov_atom_core::fourcc::FourCc;
use mov_atom_core::fp::FpI8;
use mov_atom_core::io::{FiniteStream, ReadBytes, WriteBytes};

use crate::atoms::{read_version_flags, write_version_flags, AtomHeader, LeafBody};
use crate::registry::codes;

/// Sound media information header atom.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SmhdAtom {
    pub version: u8,
    pub flags: u32,
    /// Stereo balance.
    pub balance: FpI8,
}

impl LeafBody for SmhdAtom {
    fn read<B: ReadBytes + FiniteStream>(reader: &mut B, _: &AtomHeader) -> Result<Self> {
        let (version, flags) = read_version_flags(reader)?;

        // Stereo balance
        let balance = FpI8::parse_raw(reader.read_be_i16()?);

        // Reserved.
        let _ = reader.read_be_u16()?;

        Ok(SmhdAtom { version, flags, balance })
    }

    fn code(&self) -> FourCc {
        codes::SMHD
    }

    fn body_len(&self) -> u64 {
        8
    }

    fn write<W: WriteBytes + ?Sized>(&self, writer: &mut W) -> Result<()> {
        write_version_flags(writer, self.version, self.flags)?;
        writer.write_be_i16(self.balance.to_raw())?;
        writer.write_be_u16(0)?;
        Ok(())
    }
}
