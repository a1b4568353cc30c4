// Mov Atom
// Copyright (c) 2026 The Project Mov Atom Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Static classification of atom type codes.

use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;
use mov_atom_core::fourcc::FourCc;

/// Well-known atom type codes.
pub mod codes {
    use mov_atom_core::fourcc::FourCc;

    pub const MOOV: FourCc = FourCc::new(*b"moov");
    pub const CLIP: FourCc = FourCc::new(*b"clip");
    pub const UDTA: FourCc = FourCc::new(*b"udta");
    pub const MATT: FourCc = FourCc::new(*b"matt");
    pub const TRAK: FourCc = FourCc::new(*b"trak");
    pub const EDTS: FourCc = FourCc::new(*b"edts");
    pub const MDIA: FourCc = FourCc::new(*b"mdia");
    pub const MINF: FourCc = FourCc::new(*b"minf");
    pub const GMHD: FourCc = FourCc::new(*b"gmhd");
    pub const DINF: FourCc = FourCc::new(*b"dinf");
    pub const STBL: FourCc = FourCc::new(*b"stbl");
    pub const TREF: FourCc = FourCc::new(*b"tref");
    pub const IMAP: FourCc = FourCc::new(*b"imap");
    pub const TAPT: FourCc = FourCc::new(*b"tapt");
    pub const RMRA: FourCc = FourCc::new(*b"rmra");
    pub const RMDA: FourCc = FourCc::new(*b"rmda");
    pub const META: FourCc = FourCc::new(*b"meta");
    pub const ILST: FourCc = FourCc::new(*b"ilst");

    pub const MVHD: FourCc = FourCc::new(*b"mvhd");
    pub const MDHD: FourCc = FourCc::new(*b"mdhd");
    pub const TKHD: FourCc = FourCc::new(*b"tkhd");
    pub const HDLR: FourCc = FourCc::new(*b"hdlr");
    pub const VMHD: FourCc = FourCc::new(*b"vmhd");
    pub const SMHD: FourCc = FourCc::new(*b"smhd");
    pub const DREF: FourCc = FourCc::new(*b"dref");
    pub const ELST: FourCc = FourCc::new(*b"elst");
    pub const STSD: FourCc = FourCc::new(*b"stsd");
    pub const STTS: FourCc = FourCc::new(*b"stts");
    pub const STSC: FourCc = FourCc::new(*b"stsc");
    pub const STSZ: FourCc = FourCc::new(*b"stsz");
    pub const STCO: FourCc = FourCc::new(*b"stco");
    pub const WLOC: FourCc = FourCc::new(*b"WLOC");
    pub const FTYP: FourCc = FourCc::new(*b"ftyp");

    pub const DATA: FourCc = FourCc::new(*b"data");
    pub const MDAT: FourCc = FourCc::new(*b"mdat");
    pub const FREE: FourCc = FourCc::new(*b"free");
    pub const WIDE: FourCc = FourCc::new(*b"wide");
    pub const PNOT: FourCc = FourCc::new(*b"pnot");
    pub const SKIP: FourCc = FourCc::new(*b"skip");
    pub const PICT: FourCc = FourCc::new(*b"PICT");

    /// The `ftyp` major brand of QuickTime movies.
    pub const BRAND_QT: FourCc = FourCc::new(*b"qt  ");
}

/// The typed decoder selected for a leaf atom.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LeafKind {
    Mvhd,
    Mdhd,
    Tkhd,
    Hdlr,
    Vmhd,
    Smhd,
    Dref,
    Elst,
    Stsd,
    Stts,
    Stsc,
    Stsz,
    Stco,
    Wloc,
    Ftyp,
}

/// How the reader treats an atom with a given type code.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AtomClass {
    /// The body is a sequence of child atoms.
    Container,
    /// The body is decoded by a typed leaf decoder.
    Leaf(LeafKind),
    /// The body is preserved verbatim.
    Unknown,
}

const CONTAINERS: [FourCc; 18] = [
    codes::MOOV,
    codes::CLIP,
    codes::UDTA,
    codes::MATT,
    codes::TRAK,
    codes::EDTS,
    codes::MDIA,
    codes::MINF,
    codes::GMHD,
    codes::DINF,
    codes::STBL,
    codes::TREF,
    codes::IMAP,
    codes::TAPT,
    codes::RMRA,
    codes::RMDA,
    codes::META,
    codes::ILST,
];

lazy_static! {
    static ref ATOM_CLASSES: HashMap<FourCc, AtomClass> = {
        let mut classes = HashMap::new();

        for code in CONTAINERS {
            classes.insert(code, AtomClass::Container);
        }

        classes.insert(codes::MVHD, AtomClass::Leaf(LeafKind::Mvhd));
        classes.insert(codes::MDHD, AtomClass::Leaf(LeafKind::Mdhd));
        classes.insert(codes::TKHD, AtomClass::Leaf(LeafKind::Tkhd));
        classes.insert(codes::HDLR, AtomClass::Leaf(LeafKind::Hdlr));
        classes.insert(codes::VMHD, AtomClass::Leaf(LeafKind::Vmhd));
        classes.insert(codes::SMHD, AtomClass::Leaf(LeafKind::Smhd));
        classes.insert(codes::DREF, AtomClass::Leaf(LeafKind::Dref));
        classes.insert(codes::ELST, AtomClass::Leaf(LeafKind::Elst));
        classes.insert(codes::STSD, AtomClass::Leaf(LeafKind::Stsd));
        classes.insert(codes::STTS, AtomClass::Leaf(LeafKind::Stts));
        classes.insert(codes::STSC, AtomClass::Leaf(LeafKind::Stsc));
        classes.insert(codes::STSZ, AtomClass::Leaf(LeafKind::Stsz));
        classes.insert(codes::STCO, AtomClass::Leaf(LeafKind::Stco));
        classes.insert(codes::WLOC, AtomClass::Leaf(LeafKind::Wloc));
        classes.insert(codes::FTYP, AtomClass::Leaf(LeafKind::Ftyp));

        classes
    };

    /// Type codes that may plausibly begin a QuickTime or MP4 file.
    static ref LEADING_ATOMS: HashSet<FourCc> = {
        let mut leading: HashSet<FourCc> = CONTAINERS.iter().copied().collect();

        leading.extend([
            codes::MVHD,
            codes::MDHD,
            codes::TKHD,
            codes::DREF,
            codes::MDAT,
            codes::FTYP,
            codes::FREE,
            codes::WIDE,
            codes::PNOT,
            codes::SKIP,
            codes::PICT,
        ]);

        leading
    };
}

/// Classify a type code. Codes whose meaning depends on the file flavor or the parent atom
/// (`©xxx`, `data`) classify as [`AtomClass::Unknown`] here.
pub fn classify(code: FourCc) -> AtomClass {
    ATOM_CLASSES.get(&code).copied().unwrap_or(AtomClass::Unknown)
}

/// Returns `true` if atoms of this type are containers.
pub fn is_container(code: FourCc) -> bool {
    classify(code) == AtomClass::Container
}

/// Returns `true` if the type code is one a well-formed file may begin with.
pub fn is_plausible_leading(code: FourCc) -> bool {
    LEADING_ATOMS.contains(&code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_classification() {
        assert_eq!(classify(codes::MOOV), AtomClass::Container);
        assert_eq!(classify(codes::ILST), AtomClass::Container);
        assert_eq!(classify(codes::STSD), AtomClass::Leaf(LeafKind::Stsd));
        assert_eq!(classify(codes::WLOC), AtomClass::Leaf(LeafKind::Wloc));
        assert_eq!(classify(FourCc::new(*b"wloc")), AtomClass::Unknown);
        assert_eq!(classify(codes::DATA), AtomClass::Unknown);
        assert_eq!(classify(FourCc::new(*b"\xa9nam")), AtomClass::Unknown);
        assert!(is_container(codes::TRAK));
        assert!(!is_container(codes::MDAT));
    }

    #[test]
    fn verify_leading_atoms() {
        for code in CONTAINERS {
            assert!(is_plausible_leading(code));
        }
        assert!(is_plausible_leading(codes::FTYP));
        assert!(is_plausible_leading(codes::MDAT));
        assert!(is_plausible_leading(codes::PICT));
        assert!(!is_plausible_leading(codes::HDLR));
        assert!(!is_plausible_leading(codes::STSD));
        assert!(!is_plausible_leading(FourCc::new(*b"RIFF")));
    }
}
