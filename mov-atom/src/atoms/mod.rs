// Mov Atom
// Copyright (c) 2026 The Project Mov Atom Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The atom tree model.
//!
//! An [`Atom`] is a container of child atoms, a typed leaf, an unknown leaf holding its body
//! verbatim, or the typeless placeholder the reader substitutes for a truncated header.

use mov_atom_core::errors::{decode_error, limit_error, Result};
use mov_atom_core::fourcc::FourCc;
use mov_atom_core::io::{FiniteStream, ReadBytes, WriteBytes};

mod container;
mod data;
mod dref;
mod elst;
mod ftyp;
mod hdlr;
mod mdhd;
mod mvhd;
mod smhd;
mod stco;
mod stsc;
mod stsd;
mod stsz;
mod stts;
mod text;
mod tkhd;
mod unknown;
mod vmhd;
mod wloc;

pub use container::ContainerAtom;
pub use data::{data_type, DataAtom};
pub use dref::{DataReference, DrefAtom};
pub use elst::{EditListEntry, ElstAtom};
pub use ftyp::FtypAtom;
pub use hdlr::HdlrAtom;
pub use mdhd::MdhdAtom;
pub use mvhd::MvhdAtom;
pub use smhd::SmhdAtom;
pub use stco::StcoAtom;
pub use stsc::{StscAtom, StscEntry};
pub use stsd::{
    GenericSampleEntry, MediaKind, SampleEntry, SoundSampleEntry, StsdAtom, VideoSampleEntry,
};
pub use stsz::{SampleSize, StszAtom};
pub use stts::{SampleDurationEntry, SttsAtom};
pub use text::{TextEntry, UserDataTextAtom};
pub use tkhd::{TkhdAtom, TrackFlags};
pub use unknown::UnknownLeafAtom;
pub use vmhd::VmhdAtom;
pub use wloc::WlocAtom;

/// The header of an atom as it was read from a stream.
///
/// Constructed atoms have no header; their size is only known once the writer measures them.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AtomHeader {
    /// The atom type.
    pub code: FourCc,
    /// The stream position of the first byte of the atom's size field.
    pub pos: u64,
    /// The number of bytes used by the size, type, and extended size fields.
    pub header_len: u8,
    /// The total size of the atom, after clamping to the enclosing atom.
    pub atom_len: u64,
    /// `true` if the declared size overran the enclosing atom and was reduced.
    pub clamped: bool,
}

impl AtomHeader {
    /// Size of a standard atom header.
    pub const HEADER_SIZE: u8 = 8;
    /// Size of a standard atom header with a 64-bit size.
    pub const LARGE_HEADER_SIZE: u8 = AtomHeader::HEADER_SIZE + 8;

    /// Get the size of the atom body.
    pub fn data_len(&self) -> u64 {
        self.atom_len.saturating_sub(u64::from(self.header_len))
    }
}

/// A `LeafBody` is the typed payload of a leaf atom.
pub trait LeafBody: Sized {
    /// Decode the body from a stream bounded to exactly the atom body.
    fn read<B: ReadBytes + FiniteStream>(reader: &mut B, header: &AtomHeader) -> Result<Self>;

    /// The type code written for this atom.
    fn code(&self) -> FourCc;

    /// The number of bytes `write` produces.
    fn body_len(&self) -> u64;

    /// Encode the body.
    fn write<W: WriteBytes + ?Sized>(&self, writer: &mut W) -> Result<()>;
}

/// Read the version and flags fields common to most leaf atoms.
pub(crate) fn read_version_flags<B: ReadBytes>(reader: &mut B) -> Result<(u8, u32)> {
    Ok((reader.read_u8()?, reader.read_be_u24()?))
}

pub(crate) fn write_version_flags<W: WriteBytes + ?Sized>(
    writer: &mut W,
    version: u8,
    flags: u32,
) -> Result<()> {
    writer.write_u8(version)?;
    writer.write_be_u24(flags)?;
    Ok(())
}

/// The most table entries reserved before any of them have been read.
const MAX_RESERVED_ENTRIES: u64 = 4096;

/// The initial capacity of a table of `count` entries. Tables grow as their entries are read.
pub(crate) fn entry_capacity(count: impl Into<u64>) -> usize {
    count.into().min(MAX_RESERVED_ENTRIES) as usize
}

/// Read the rest of a bounded body.
pub(crate) fn read_remainder<B: ReadBytes + FiniteStream>(reader: &mut B) -> Result<Box<[u8]>> {
    let len = match usize::try_from(reader.bytes_available()) {
        Ok(len) => len,
        Err(_) => return limit_error("mov-atom: atom body too large for memory"),
    };
    Ok(reader.read_boxed_slice_exact(len)?)
}

/// Fails with `msg` if `count` entries of `entry_len` bytes cannot fit in the rest of the body.
pub(crate) fn check_entry_count<B: FiniteStream>(
    reader: &B,
    count: u32,
    entry_len: u64,
    msg: &'static str,
) -> Result<()> {
    if u64::from(count) * entry_len > reader.bytes_available() {
        return decode_error(msg);
    }
    Ok(())
}

macro_rules! leaf_atoms {
    ($($variant:ident($atom:ty)),* $(,)?) => {
        /// A leaf atom with a typed body.
        #[derive(Clone, Debug, PartialEq, Eq)]
        pub enum LeafAtom {
            $($variant($atom),)*
        }

        impl LeafAtom {
            /// The type code of the atom.
            pub fn code(&self) -> FourCc {
                match self {
                    $(LeafAtom::$variant(atom) => atom.code(),)*
                }
            }

            /// The size of the encoded body.
            pub fn body_len(&self) -> u64 {
                match self {
                    $(LeafAtom::$variant(atom) => atom.body_len(),)*
                }
            }

            /// Encode the body.
            pub fn write<W: WriteBytes + ?Sized>(&self, writer: &mut W) -> Result<()> {
                match self {
                    $(LeafAtom::$variant(atom) => atom.write(writer),)*
                }
            }
        }

        $(
            impl From<$atom> for LeafAtom {
                fn from(atom: $atom) -> Self {
                    LeafAtom::$variant(atom)
                }
            }

            impl From<$atom> for Atom {
                fn from(atom: $atom) -> Self {
                    Atom::new(AtomKind::Leaf(LeafAtom::$variant(atom)))
                }
            }
        )*
    };
}

leaf_atoms! {
    Mvhd(MvhdAtom),
    Tkhd(TkhdAtom),
    Mdhd(MdhdAtom),
    Hdlr(HdlrAtom),
    Vmhd(VmhdAtom),
    Smhd(SmhdAtom),
    Dref(DrefAtom),
    Elst(ElstAtom),
    Stsd(StsdAtom),
    Stts(SttsAtom),
    Stsc(StscAtom),
    Stsz(StszAtom),
    Stco(StcoAtom),
    Wloc(WlocAtom),
    Ftyp(FtypAtom),
    UserDataText(UserDataTextAtom),
    Data(DataAtom),
}

/// The variant of an atom.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AtomKind {
    Container(ContainerAtom),
    Leaf(LeafAtom),
    Unknown(UnknownLeafAtom),
    /// The typeless placeholder for an atom whose type code could not be read. It has no size and
    /// is never written.
    Empty,
}

/// A node of an atom tree.
///
/// Equality is structural: two atoms are equal if their kinds are equal, regardless of where (or
/// whether) they were read from a stream.
#[derive(Clone, Debug)]
pub struct Atom {
    header: Option<AtomHeader>,
    kind: AtomKind,
}

impl Atom {
    /// Instantiate a constructed atom.
    pub fn new(kind: AtomKind) -> Self {
        Atom { header: None, kind }
    }

    pub(crate) fn with_header(header: AtomHeader, kind: AtomKind) -> Self {
        Atom { header: Some(header), kind }
    }

    /// Instantiate a container atom.
    pub fn container(code: FourCc, children: Vec<Atom>) -> Self {
        Atom::new(AtomKind::Container(ContainerAtom::with_children(code, children)))
    }

    /// Instantiate an unknown leaf atom holding `data` verbatim.
    pub fn unknown(code: FourCc, data: impl Into<Box<[u8]>>) -> Self {
        Atom::new(AtomKind::Unknown(UnknownLeafAtom::new(code, data)))
    }

    /// Instantiate the typeless placeholder atom.
    pub fn empty() -> Self {
        Atom::new(AtomKind::Empty)
    }

    /// The header the atom was read with, if it was read from a stream.
    pub fn header(&self) -> Option<&AtomHeader> {
        self.header.as_ref()
    }

    pub fn kind(&self) -> &AtomKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut AtomKind {
        &mut self.kind
    }

    pub fn into_kind(self) -> AtomKind {
        self.kind
    }

    /// The type code of the atom. The placeholder atom has the all-zero code.
    pub fn code(&self) -> FourCc {
        match &self.kind {
            AtomKind::Container(container) => container.code(),
            AtomKind::Leaf(leaf) => leaf.code(),
            AtomKind::Unknown(unknown) => unknown.code(),
            AtomKind::Empty => FourCc::NULL,
        }
    }

    /// The number of bytes the atom occupies when written, including its header.
    pub fn size(&self) -> u64 {
        let header_len = u64::from(AtomHeader::HEADER_SIZE);

        match &self.kind {
            AtomKind::Container(container) => {
                header_len + container.children().iter().map(Atom::size).sum::<u64>()
            }
            AtomKind::Leaf(leaf) => header_len + leaf.body_len(),
            AtomKind::Unknown(unknown) => header_len + unknown.data().len() as u64,
            AtomKind::Empty => 0,
        }
    }

    /// The children of a container atom. Other atoms have no children.
    pub fn children(&self) -> &[Atom] {
        match &self.kind {
            AtomKind::Container(container) => container.children(),
            _ => &[],
        }
    }

    pub fn as_container(&self) -> Option<&ContainerAtom> {
        match &self.kind {
            AtomKind::Container(container) => Some(container),
            _ => None,
        }
    }

    pub fn as_container_mut(&mut self) -> Option<&mut ContainerAtom> {
        match &mut self.kind {
            AtomKind::Container(container) => Some(container),
            _ => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&LeafAtom> {
        match &self.kind {
            AtomKind::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }

    pub fn as_unknown(&self) -> Option<&UnknownLeafAtom> {
        match &self.kind {
            AtomKind::Unknown(unknown) => Some(unknown),
            _ => None,
        }
    }

    /// Returns `true` if this is the placeholder for an unreadable atom.
    pub fn is_empty_placeholder(&self) -> bool {
        matches!(self.kind, AtomKind::Empty)
    }
}

impl PartialEq for Atom {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for Atom {}

impl From<ContainerAtom> for Atom {
    fn from(container: ContainerAtom) -> Self {
        Atom::new(AtomKind::Container(container))
    }
}

impl From<LeafAtom> for Atom {
    fn from(leaf: LeafAtom) -> Self {
        Atom::new(AtomKind::Leaf(leaf))
    }
}

impl From<UnknownLeafAtom> for Atom {
    fn from(unknown: UnknownLeafAtom) -> Self {
        Atom::new(AtomKind::Unknown(unknown))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::codes;

    #[test]
    fn verify_atom_sizes() {
        let stbl = Atom::container(
            codes::STBL,
            vec![SttsAtom::default().into(), Atom::unknown(FourCc::new(*b"sdtp"), vec![0; 5])],
        );
        let minf = Atom::container(codes::MINF, vec![VmhdAtom::default().into(), stbl]);

        // stts: 8 + version/flags + count, sdtp: 8 + 5.
        assert_eq!(minf.children()[1].size(), 8 + 16 + 13);
        assert_eq!(minf.size(), 8 + (8 + 12) + (8 + 16 + 13));
        assert_eq!(Atom::empty().size(), 0);
        assert_eq!(Atom::empty().code(), FourCc::NULL);
    }

    #[test]
    fn verify_structural_equality_ignores_header() {
        let header = AtomHeader {
            code: codes::FREE,
            pos: 64,
            header_len: AtomHeader::HEADER_SIZE,
            atom_len: 12,
            clamped: false,
        };
        let read = Atom::with_header(
            header,
            AtomKind::Unknown(UnknownLeafAtom::new(codes::FREE, vec![1, 2, 3, 4])),
        );
        let built = Atom::unknown(codes::FREE, vec![1, 2, 3, 4]);

        assert_eq!(read, built);
        assert_ne!(built, Atom::unknown(codes::SKIP, vec![1, 2, 3, 4]));
        assert_eq!(read.header().map(|h| h.data_len()), Some(4));
    }
}
