// Mov Atom
// Copyright (c) 2026 The Project Mov Atom Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Serialization of atom trees.
//!
//! Sizes stored in headers are never trusted when writing. Every container's size is recomputed
//! from its children before anything is emitted.

use std::fs::File;
use std::io;
use std::path::Path;
use std::slice;

use log::{debug, trace};

use mov_atom_core::errors::{encode_error, limit_error, Result};
use mov_atom_core::io::{StreamWriter, WriteBytes};

use crate::atoms::{Atom, AtomHeader, AtomKind};

/// Measure `atom` and its descendants. Sizes are stored in pre-order, the order in which atoms
/// are emitted.
fn measure(atom: &Atom, sizes: &mut Vec<u64>) -> u64 {
    let idx = sizes.len();
    sizes.push(0);

    let header_len = u64::from(AtomHeader::HEADER_SIZE);

    let size = match atom.kind() {
        AtomKind::Container(container) => {
            header_len + container.children().iter().map(|child| measure(child, sizes)).sum::<u64>()
        }
        AtomKind::Leaf(leaf) => header_len + leaf.body_len(),
        AtomKind::Unknown(unknown) => header_len + unknown.data().len() as u64,
        AtomKind::Empty => 0,
    };

    sizes[idx] = size;
    size
}

/// An `AtomWriter` writes atom trees to a sink.
pub struct AtomWriter<W: WriteBytes> {
    writer: W,
}

impl<W: WriteBytes> AtomWriter<W> {
    pub fn new(writer: W) -> Self {
        AtomWriter { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Write a sequence of root atoms. Every atom is measured before anything is written, so an
    /// atom too large for its size field leaves the sink untouched.
    pub fn write_all(&mut self, atoms: &[Atom]) -> Result<()> {
        let mut sizes = Vec::new();

        for atom in atoms {
            measure(atom, &mut sizes);
        }

        if sizes.iter().any(|&size| size > u64::from(u32::MAX)) {
            return limit_error("mov-atom: atom too large for a 32-bit size");
        }

        let mut sizes = sizes.into_iter();

        for atom in atoms {
            self.emit(atom, &mut sizes)?;
        }
        Ok(())
    }

    /// Write one atom and its descendants.
    pub fn write_atom(&mut self, atom: &Atom) -> Result<()> {
        self.write_all(slice::from_ref(atom))
    }

    fn emit(&mut self, atom: &Atom, sizes: &mut impl Iterator<Item = u64>) -> Result<()> {
        let size = sizes.next().unwrap_or_default();

        if atom.is_empty_placeholder() {
            debug!("skipping typeless atom at {}", self.writer.pos());
            return Ok(());
        }

        let size32 = match u32::try_from(size) {
            Ok(size32) => size32,
            Err(_) => return limit_error("mov-atom: atom too large for a 32-bit size"),
        };

        trace!("write atom {} at {} len {}", atom.code(), self.writer.pos(), size);

        let start = self.writer.pos();

        self.writer.write_be_u32(size32)?;
        self.writer.write_quad_bytes(atom.code().get())?;

        match atom.kind() {
            AtomKind::Container(container) => {
                for child in container.children() {
                    self.emit(child, sizes)?;
                }
            }
            AtomKind::Leaf(leaf) => leaf.write(&mut self.writer)?,
            AtomKind::Unknown(unknown) => self.writer.write_buf(unknown.data())?,
            AtomKind::Empty => (),
        }

        if self.writer.pos() - start != size {
            return encode_error("mov-atom: atom wrote a different length than it measured");
        }

        Ok(())
    }
}

/// Write a sequence of root atoms to a new buffer.
pub fn write_to_vec(atoms: &[Atom]) -> Result<Vec<u8>> {
    let mut writer = AtomWriter::new(Vec::new());
    writer.write_all(atoms)?;
    Ok(writer.into_inner())
}

/// Write a sequence of root atoms to a file, replacing it if it exists.
pub fn write_file<P: AsRef<Path>>(path: P, atoms: &[Atom]) -> Result<()> {
    let file = File::create(path)?;

    let mut writer = AtomWriter::new(StreamWriter::new(io::BufWriter::new(file)));
    writer.write_all(atoms)?;

    let mut stream = writer.into_inner();
    stream.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use mov_atom_core::errors::Error;
    use mov_atom_core::fourcc::FourCc;

    use super::*;
    use crate::atoms::{StcoAtom, WlocAtom};
    use crate::registry::codes;

    #[test]
    fn verify_container_layout() {
        let wloc = WlocAtom { x: 2, y: 3 };
        let moov = Atom::container(
            codes::MOOV,
            vec![Atom::unknown(codes::FREE, vec![1]), Atom::empty(), wloc.into()],
        );

        let buf = write_to_vec(&[moov.clone()]).unwrap();

        let mut expected = Vec::new();
        expected.extend_from_slice(b"\x00\x00\x00\x1dmoov");
        expected.extend_from_slice(b"\x00\x00\x00\x09free\x01");
        expected.extend_from_slice(b"\x00\x00\x00\x0cWLOC\x00\x02\x00\x03");

        assert_eq!(buf, expected);
        assert_eq!(buf.len() as u64, moov.size());
    }

    #[test]
    fn verify_sizes_are_recomputed() {
        let mut stco = StcoAtom::default();
        let mut stbl = Atom::container(codes::STBL, vec![]);
        let empty_len = write_to_vec(&[stbl.clone()]).unwrap().len();

        for offset in 0..10 {
            stco.add_chunk_offset(offset * 1024);
        }

        if let Some(container) = stbl.as_container_mut() {
            container.push(stco);
        }

        let buf = write_to_vec(&[stbl.clone()]).unwrap();
        assert_eq!(empty_len, 8);
        assert_eq!(buf.len(), 8 + 8 + 8 + 40);
        assert_eq!(&buf[..4], &(buf.len() as u32).to_be_bytes());
        assert_eq!(&buf[12..16], b"stco");
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn verify_oversized_root_writes_nothing() {
        // The zeroed payload is never touched, so it is not backed by real memory.
        let huge = Atom::unknown(codes::MDAT, vec![0u8; 1 << 32]);
        let atoms = [Atom::unknown(codes::FREE, vec![1, 2]), huge];

        let mut writer = AtomWriter::new(Vec::new());
        assert!(matches!(writer.write_all(&atoms), Err(Error::LimitError(_))));
        assert!(writer.into_inner().is_empty());
    }

    #[test]
    fn verify_stream_writer_sink() {
        let atoms = [Atom::unknown(FourCc::new(*b"abcd"), vec![0; 3]), Atom::empty()];

        let mut writer = AtomWriter::new(StreamWriter::new(Vec::new()));
        writer.write_all(&atoms).unwrap();

        let out = writer.into_inner().into_inner();
        assert_eq!(out, write_to_vec(&atoms).unwrap());
        assert_eq!(out.len(), 11);
    }
}
