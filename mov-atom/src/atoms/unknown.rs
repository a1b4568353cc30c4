// Mov Atom
// Copyright (c) 2026 The Project Mov Atom Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use mov_atom_core::fourcc::FourCc;

/// A leaf atom of a type without a decoder. The body is kept byte-for-byte.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownLeafAtom {
    code: FourCc,
    data: Box<[u8]>,
}

impl UnknownLeafAtom {
    pub fn new(code: FourCc, data: impl Into<Box<[u8]>>) -> Self {
        UnknownLeafAtom { code, data: data.into() }
    }

    pub fn code(&self) -> FourCc {
        self.code
    }

    /// The verbatim atom body.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}
