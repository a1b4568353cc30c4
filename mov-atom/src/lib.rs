// Mov Atom
// Copyright (c) 2026 The Project Mov Atom Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]

//! # Mov Atom
//!
//! Mov Atom reads and writes the atom (box) trees of QuickTime movies and MP4 files.
//!
//! An atom is a size-prefixed record with a four character type code. Container atoms hold a
//! sequence of child atoms, while leaf atoms hold a body. Leaf atoms with a known layout are
//! decoded into typed structures, and every other leaf is kept verbatim so that a tree may be
//! written back out without loss.
//!
//! # Usage
//!
//! 1.  Read a file with [`read_file`], or construct an [`AtomReader`] to read from any
//!     [`std::io::Read`] source or byte slice. A stream that is not an atom container at all is
//!     rejected with [`Error::Unsupported`](errors::Error::Unsupported).
//! 2.  Navigate the tree with [`Atom::child`], [`Atom::find`], or [`walk`](tree::walk).
//! 3.  Edit or construct atoms. Sizes never need to be maintained by hand.
//! 4.  Write the tree with [`write_file`], [`write_to_vec`], or an [`AtomWriter`]. Every container
//!     size is recomputed from its children.
//!
//! ```no_run
//! use mov_atom::registry::codes;
//!
//! let atoms = mov_atom::read_file("movie.mov")?;
//!
//! if let Some(mvhd) = mov_atom::tree::find(&atoms, &[codes::MOOV, codes::MVHD]) {
//!     println!("movie header is {} bytes", mvhd.size());
//! }
//!
//! mov_atom::write_file("copy.mov", &atoms)?;
//! # Ok::<(), mov_atom::errors::Error>(())
//! ```

pub mod atoms;
mod context;
pub mod reader;
pub mod registry;
pub mod tree;
pub mod writer;

pub use mov_atom_core::{errors, fourcc, fp, io};

pub use atoms::{Atom, AtomHeader, AtomKind, LeafAtom, LeafBody};
pub use fourcc::FourCc;
pub use reader::{read_file, AtomReader, FileFlavor, ReaderOptions};
pub use writer::{write_file, write_to_vec, AtomWriter};
