// Mov Atom
// Copyright (c) 2026 The Project Mov Atom Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use mov_atom_core::errors::{decode_error, encode_error, Result};
use mov_atom_core::fourcc::FourCc;
use mov_atom_core::io::{FiniteStream, ReadBytes, WriteBytes};

use crate::atoms::{AtomHeader, LeafBody};

/// One localized string of a user data text atom.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextEntry {
    /// Macintosh language code.
    pub language: u16,
    pub text: Box<[u8]>,
}

impl TextEntry {
    pub fn new(language: u16, text: &str) -> Self {
        TextEntry { language, text: text.as_bytes().into() }
    }
}

/// A QuickTime user data text atom, such as `©nam` or `©cpy`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserDataTextAtom {
    code: FourCc,
    pub entries: Vec<TextEntry>,
}

impl UserDataTextAtom {
    pub fn new(code: FourCc) -> Self {
        UserDataTextAtom { code, entries: Vec::new() }
    }

    /// Instantiate an atom holding a single English string.
    pub fn with_text(code: FourCc, text: &str) -> Self {
        UserDataTextAtom { code, entries: vec![TextEntry::new(0, text)] }
    }

    /// The text of the first entry.
    pub fn text(&self) -> Option<String> {
        self.entries.first().map(|entry| String::from_utf8_lossy(&entry.text).to_string())
    }
}

impl LeafBody for UserDataTextAtom {
    fn read<B: ReadBytes + FiniteStream>(reader: &mut B, header: &AtomHeader) -> Result<Self> {
        let mut entries = Vec::new();

        while reader.bytes_available() > 0 {
            if reader.bytes_available() < 4 {
                return decode_error("udta: truncated text entry");
            }

            let len = reader.read_be_u16()?;
            let language = reader.read_be_u16()?;
            let text = reader.read_boxed_slice_exact(usize::from(len))?;

            entries.push(TextEntry { language, text });
        }

        Ok(UserDataTextAtom { code: header.code, entries })
    }

    fn code(&self) -> FourCc {
        self.code
    }

    fn body_len(&self) -> u64 {
        self.entries.iter().map(|entry| 4 + entry.text.len() as u64).sum()
    }

    fn write<W: WriteBytes + ?Sized>(&self, writer: &mut W) -> Result<()> {
        for entry in &self.entries {
            let len = match u16::try_from(entry.text.len()) {
                Ok(len) => len,
                Err(_) => return encode_error("udta: text entry too long"),
            };

            writer.write_be_u16(len)?;
            writer.write_be_u16(entry.language)?;
            writer.write_buf(&entry.text)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mov_atom_core::io::BufReader;

    use super::*;

    fn header() -> AtomHeader {
        AtomHeader {
            code: FourCc::new(*b"\xa9nam"),
            pos: 0,
            header_len: AtomHeader::HEADER_SIZE,
            atom_len: 0,
            clamped: false,
        }
    }

    #[test]
    fn verify_text_entries() {
        let buf = b"\x00\x05\x00\x00Hello\x00\x02\x00\x01Hi";
        let atom = UserDataTextAtom::read(&mut BufReader::new(buf), &header()).unwrap();

        assert_eq!(atom.code(), FourCc::new(*b"\xa9nam"));
        assert_eq!(atom.entries.len(), 2);
        assert_eq!(atom.text().as_deref(), Some("Hello"));
        assert_eq!(atom.entries[1].language, 1);
        assert_eq!(atom.body_len(), buf.len() as u64);

        let mut out = Vec::new();
        atom.write(&mut out).unwrap();
        assert_eq!(&out[..], &buf[..]);
    }

    #[test]
    fn verify_text_overrun() {
        // The entry claims 16 bytes of text but only 3 follow.
        let buf = b"\x00\x10\x00\x00abc";
        assert!(UserDataTextAtom::read(&mut BufReader::new(buf), &header()).is_err());

        let buf = b"\x00\x01\x00\x00a\x00";
        assert!(UserDataTextAtom::read(&mut BufReader::new(buf), &header()).is_err());
    }
}
