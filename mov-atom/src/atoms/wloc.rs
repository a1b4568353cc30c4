// Mov Atom
// Copyright (c) 2026 The Project Mov Atom Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use mov_atom_core::errors::Result;
use mov_atom_core::fourcc::FourCc;
use mov_atom_core::io::{FiniteStream, ReadBytes, WriteBytes};

use crate::atoms::{AtomHeader, LeafBody};
use crate::registry::codes;

/// Window location atom. The default position of the movie window on screen.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WlocAtom {
    pub x: u16,
    pub y: u16,
}

impl LeafBody for WlocAtom {
    fn read<B: ReadBytes + FiniteStream>(reader: &mut B, _: &AtomHeader) -> Result<Self> {
        Ok(WlocAtom { x: reader.read_be_u16()?, y: reader.read_be_u16()? })
    }

    fn code(&self) -> FourCc {
        codes::WLOC
    }

    fn body_len(&self) -> u64 {
        4
    }

    fn write<W: WriteBytes + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_be_u16(self.x)?;
        writer.write_be_u16(self.y)?;
        Ok(())
    }
}
