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
    read_remainder, read_version_flags, write_version_flags, AtomHeader, LeafBody,
};
use crate::registry::codes;

use log::warn;

/// Handler subtypes with a known meaning.
const KNOWN_SUBTYPES: [&[u8; 4]; 8] =
    [b"vide", b"soun", b"meta", b"subt", b"text", b"alis", b"url ", b"tmcd"];

/// Handler reference atom.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HdlrAtom {
    pub version: u8,
    pub flags: u32,
    /// Component type. `mhlr` for media handlers and `dhlr` for data handlers in QuickTime,
    /// always zero in MP4.
    pub component_type: FourCc,
    /// Component subtype, the handler type (`vide`, `soun`, `alis`, ...).
    pub component_subtype: FourCc,
    pub component_manufacturer: FourCc,
    pub component_flags: u32,
    pub component_flags_mask: u32,
    /// The raw component name. QuickTime stores a Pascal string, MP4 a null-terminated one.
    pub name: Box<[u8]>,
}

impl HdlrAtom {
    /// Instantiate a handler with a Pascal string name, as QuickTime movies use.
    pub fn new(component_type: FourCc, component_subtype: FourCc, name: &str) -> Self {
        let name = name.as_bytes();
        let len = name.len().min(255);

        let mut raw = Vec::with_capacity(len + 1);
        raw.push(len as u8);
        raw.extend_from_slice(&name[..len]);

        HdlrAtom {
            component_type,
            component_subtype,
            name: raw.into_boxed_slice(),
            ..Default::default()
        }
    }

    /// Decode the human-readable component name.
    pub fn name(&self) -> String {
        let is_quicktime = self.component_type != FourCc::NULL;

        let text = match self.name.split_first() {
            Some((&len, rest)) if is_quicktime && usize::from(len) <= rest.len() => {
                &rest[..usize::from(len)]
            }
            _ => self.name.split(|&b| b == 0).next().unwrap_or(&[]),
        };
        String::from_utf8_lossy(text).to_string()
    }
}

impl LeafBody for HdlrAtom {
    fn read<B: ReadBytes + FiniteStream>(reader: &mut B, _: &AtomHeader) -> Result<Self> {
        let (version, flags) = read_version_flags(reader)?;

        if reader.bytes_available() < 20 {
            return decode_error("hdlr: atom too small");
        }

        let component_type = FourCc::new(reader.read_quad_bytes()?);
        let component_subtype = FourCc::new(reader.read_quad_bytes()?);

        if !KNOWN_SUBTYPES.iter().any(|&subtype| subtype == &component_subtype.get()) {
            warn!("unknown handler type {:?}", component_subtype);
        }

        let component_manufacturer = FourCc::new(reader.read_quad_bytes()?);
        let component_flags = reader.read_be_u32()?;
        let component_flags_mask = reader.read_be_u32()?;

        let name = read_remainder(reader)?;

        Ok(HdlrAtom {
            version,
            flags,
            component_type,
            component_subtype,
            component_manufacturer,
            component_flags,
            component_flags_mask,
            name,
        })
    }

    fn code(&self) -> FourCc {
        codes::HDLR
    }

    fn body_len(&self) -> u64 {
        24 + self.name.len() as u64
    }

    fn write<W: WriteBytes + ?Sized>(&self, writer: &mut W) -> Result<()> {
        write_version_flags(writer, self.version, self.flags)?;
        writer.write_quad_bytes(self.component_type.get())?;
        writer.write_quad_bytes(self.component_subtype.get())?;
        writer.write_quad_bytes(self.component_manufacturer.get())?;
        writer.write_be_u32(self.component_flags)?;
        writer.write_be_u32(self.component_flags_mask)?;
        writer.write_buf(&self.name)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mov_atom_core::io::BufReader;

    use super::*;

    #[test]
    fn verify_hdlr_names() {
        let hdlr = HdlrAtom::new(FourCc::new(*b"mhlr"), FourCc::new(*b"vide"), "Video Handler");
        assert_eq!(hdlr.name[0], 13);
        assert_eq!(hdlr.name(), "Video Handler");
        assert_eq!(hdlr.body_len(), 24 + 14);

        // MP4 handlers have no component type and a C string name.
        let mp4 = HdlrAtom {
            component_subtype: FourCc::new(*b"soun"),
            name: b"SoundHandler\0".to_vec().into_boxed_slice(),
            ..Default::default()
        };
        assert_eq!(mp4.name(), "SoundHandler");
    }

    #[test]
    fn verify_hdlr_read() {
        let hdlr = HdlrAtom::new(FourCc::new(*b"dhlr"), FourCc::new(*b"alis"), "Alias");
        let mut buf = Vec::new();
        hdlr.write(&mut buf).unwrap();

        let header = AtomHeader {
            code: codes::HDLR,
            pos: 0,
            header_len: AtomHeader::HEADER_SIZE,
            atom_len: 8 + buf.len() as u64,
            clamped: false,
        };
        assert_eq!(HdlrAtom::read(&mut BufReader::new(&buf), &header).unwrap(), hdlr);
        assert!(HdlrAtom::read(&mut BufReader::new(&buf[..20]), &header).is_err());
    }
}
