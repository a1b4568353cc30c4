// Mov Atom
// Copyright (c) 2026 The Project Mov Atom Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use mov_atom_core::fourcc::FourCc;

use crate::atoms::Atom;

/// An atom whose body is a sequence of child atoms.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainerAtom {
    code: FourCc,
    children: Vec<Atom>,
}

impl ContainerAtom {
    /// Instantiate an empty container.
    pub fn new(code: FourCc) -> Self {
        ContainerAtom { code, children: Vec::new() }
    }

    pub fn with_children(code: FourCc, children: Vec<Atom>) -> Self {
        ContainerAtom { code, children }
    }

    pub fn code(&self) -> FourCc {
        self.code
    }

    pub fn children(&self) -> &[Atom] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<Atom> {
        &mut self.children
    }

    /// Append a child, preserving insertion order.
    pub fn push(&mut self, child: impl Into<Atom>) {
        self.children.push(child.into());
    }

    pub fn into_children(self) -> Vec<Atom> {
        self.children
    }
}
