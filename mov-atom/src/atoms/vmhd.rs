// Mov Atom
// Copyright (c) 2026 The Project Mov Atom Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use mov_atom_core::errors::Result;
use mov_atom_core::fourcc::FourCc;
use mov_atom_core::io::{FiniteStream, ReadBytes, WriteBytes};

use crate::atoms::{read_version_flags, write_version_flags, AtomHeader, LeafBody};
use crate::registry::codes;

/// Video media information header atom.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VmhdAtom {
    pub version: u8,
    pub flags: u32,
    /// Transfer mode used when drawing.
    pub graphics_mode: u16,
    /// Red, green, and blue operand colors of the transfer mode.
    pub opcolor: [u16; 3],
}

impl Default for VmhdAtom {
    fn default() -> Self {
        // Dither copy with a flags value of 1, which older players require.
        VmhdAtom { version: 0, flags: 1, graphics_mode: 0x40, opcolor: [0x8000; 3] }
    }
}

impl LeafBody for VmhdAtom {
    fn read<B: ReadBytes + FiniteStream>(reader: &mut B, _: &AtomHeader) -> Result<Self> {
        let (version, flags) = read_version_flags(reader)?;

        let graphics_mode = reader.read_be_u16()?;

        let mut opcolor = [0; 3];
        for color in opcolor.iter_mut() {
            *color = reader.read_be_u16()?;
        }

        Ok(VmhdAtom { version, flags, graphics_mode, opcolor })
    }

    fn code(&self) -> FourCc {
        codes::VMHD
    }

    fn body_len(&self) -> u64 {
        12
    }

    fn write<W: WriteBytes + ?Sized>(&self, writer: &mut W) -> Result<()> {
        write_version_flags(writer, self.version, self.flags)?;
        writer.write_be_u16(self.graphics_mode)?;
        for &color in &self.opcolor {
            writer.write_be_u16(color)?;
        }
        Ok(())
    }
}
