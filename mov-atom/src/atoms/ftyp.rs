// Mov Atom
// Copyright (c) 2026 The Project Mov Atom Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use mov_atom_core::errors::{decode_error, Result};
use mov_atom_core::fourcc::FourCc;
use mov_atom_core::io::{FiniteStream, ReadBytes, WriteBytes};

use crate::atoms::{entry_capacity, AtomHeader, LeafBody};
use crate::registry::codes;

/// File type atom.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FtypAtom {
    pub major: FourCc,
    pub minor: u32,
    pub compatible: Vec<FourCc>,
}

impl FtypAtom {
    /// Instantiate the file type of a QuickTime movie.
    pub fn quicktime() -> Self {
        FtypAtom { major: codes::BRAND_QT, minor: 0x2005_0300, compatible: vec![codes::BRAND_QT] }
    }

    /// Returns `true` if the major brand is the QuickTime brand.
    pub fn is_quicktime(&self) -> bool {
        self.major == codes::BRAND_QT
    }
}

impl LeafBody for FtypAtom {
    fn read<B: ReadBytes + FiniteStream>(reader: &mut B, _: &AtomHeader) -> Result<Self> {
        // The ftyp atom only stores brand codes, so its length must be a multiple of 4.
        let data_len = reader.bytes_available();

        if data_len < 8 || data_len & 0x3 != 0 {
            return decode_error("ftyp: invalid data length");
        }

        // Major
        let major = FourCc::new(reader.read_quad_bytes()?);

        // Minor
        let minor = reader.read_be_u32()?;

        // The remainder of the ftyp atom contains the codes of compatible brands.
        let n_brands = (data_len - 8) / 4;

        let mut compatible = Vec::with_capacity(entry_capacity(n_brands));

        for _ in 0..n_brands {
            compatible.push(FourCc::new(reader.read_quad_bytes()?));
        }

        Ok(FtypAtom { major, minor, compatible })
    }

    fn code(&self) -> FourCc {
        codes::FTYP
    }

    fn body_len(&self) -> u64 {
        8 + 4 * self.compatible.len() as u64
    }

    fn write<W: WriteBytes + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_quad_bytes(self.major.get())?;
        writer.write_be_u32(self.minor)?;
        for brand in &self.compatible {
            writer.write_quad_bytes(brand.get())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mov_atom_core::io::BufReader;

    use super::*;

    #[test]
    fn verify_ftyp_length_checks() {
        let header = AtomHeader {
            code: codes::FTYP,
            pos: 0,
            header_len: AtomHeader::HEADER_SIZE,
            atom_len: 0,
            clamped: false,
        };

        let buf = *b"isom\x00\x00\x02\x00isomiso2mp41";
        let ftyp = FtypAtom::read(&mut BufReader::new(&buf), &header).unwrap();
        assert_eq!(ftyp.major, FourCc::new(*b"isom"));
        assert_eq!(ftyp.minor, 0x200);
        assert_eq!(ftyp.compatible.len(), 3);
        assert!(!ftyp.is_quicktime());

        assert!(FtypAtom::read(&mut BufReader::new(&buf[..10]), &header).is_err());
        assert!(FtypAtom::read(&mut BufReader::new(&buf[..4]), &header).is_err());
    }
}
