// Mov Atom
// Copyright (c) 2026 The Project Mov Atom Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Navigation of atom trees.
//!
//! Atoms do not own references to their parents. A walk over the tree instead hands each atom to
//! the visitor as a [`Node`] that borrows the node of its parent.

use std::iter;

use mov_atom_core::fourcc::FourCc;

use crate::atoms::Atom;

impl Atom {
    /// The first child with the given type.
    pub fn child(&self, code: FourCc) -> Option<&Atom> {
        self.children().iter().find(|child| child.code() == code)
    }

    /// All children with the given type.
    pub fn children_with_code(&self, code: FourCc) -> impl Iterator<Item = &Atom> {
        self.children().iter().filter(move |child| child.code() == code)
    }

    /// Follow a path of type codes down from this atom. An empty path yields this atom.
    pub fn find(&self, path: &[FourCc]) -> Option<&Atom> {
        path.iter().try_fold(self, |atom, code| atom.child(*code))
    }
}

/// Follow a path of type codes starting at a sequence of root atoms.
pub fn find<'a>(atoms: &'a [Atom], path: &[FourCc]) -> Option<&'a Atom> {
    let (first, rest) = path.split_first()?;
    atoms.iter().find(|atom| atom.code() == *first)?.find(rest)
}

/// An atom visited during a walk, with its position in the tree.
pub struct Node<'a> {
    atom: &'a Atom,
    parent: Option<&'a Node<'a>>,
    depth: usize,
}

impl<'a> Node<'a> {
    pub fn atom(&self) -> &'a Atom {
        self.atom
    }

    /// The node of the enclosing container, or `None` for a root atom.
    pub fn parent(&self) -> Option<&'a Node<'a>> {
        self.parent
    }

    /// The number of enclosing containers.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The enclosing nodes, innermost first.
    pub fn ancestors(&self) -> impl Iterator<Item = &'a Node<'a>> {
        iter::successors(self.parent, |node| node.parent)
    }

    /// The type codes from the root down to and including this atom.
    pub fn path(&self) -> Vec<FourCc> {
        let mut path: Vec<FourCc> = self.ancestors().map(|node| node.atom.code()).collect();
        path.reverse();
        path.push(self.atom.code());
        path
    }
}

/// Visit every atom of a sequence of trees in pre-order.
pub fn walk<F>(atoms: &[Atom], mut visit: F)
where
    F: FnMut(&Node<'_>),
{
    for atom in atoms {
        walk_node(atom, None, 0, &mut visit);
    }
}

fn walk_node<'a, F>(atom: &'a Atom, parent: Option<&'a Node<'a>>, depth: usize, visit: &mut F)
where
    F: FnMut(&Node<'_>),
{
    let node = Node { atom, parent, depth };

    visit(&node);

    for child in atom.children() {
        walk_node(child, Some(&node), depth + 1, visit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::{HdlrAtom, MdhdAtom};
    use crate::registry::codes;

    fn track() -> Atom {
        let hdlr = HdlrAtom::new(FourCc::new(*b"mhlr"), FourCc::new(*b"vide"), "Video");
        let mdia = Atom::container(codes::MDIA, vec![MdhdAtom::new(600, 0).into(), hdlr.into()]);
        Atom::container(codes::TRAK, vec![mdia])
    }

    #[test]
    fn verify_find() {
        let atoms = vec![Atom::container(codes::MOOV, vec![track(), track()])];

        let mdhd = find(&atoms, &[codes::MOOV, codes::TRAK, codes::MDIA, codes::MDHD]);
        assert_eq!(mdhd.map(Atom::code), Some(codes::MDHD));

        assert!(find(&atoms, &[codes::MOOV, codes::UDTA]).is_none());
        assert!(find(&atoms, &[]).is_none());

        let moov = &atoms[0];
        assert_eq!(moov.find(&[]), Some(moov));
        assert_eq!(moov.children_with_code(codes::TRAK).count(), 2);
    }

    #[test]
    fn verify_walk() {
        let atoms = vec![Atom::container(codes::MOOV, vec![track()]), Atom::empty()];

        let mut visited = Vec::new();

        walk(&atoms, |node| {
            if node.atom().code() == codes::HDLR {
                assert_eq!(node.parent().map(|parent| parent.atom().code()), Some(codes::MDIA));
                assert_eq!(node.ancestors().count(), 3);
            }
            visited.push((node.depth(), node.path()));
        });

        assert_eq!(visited.len(), 6);
        assert_eq!(visited[0], (0, vec![codes::MOOV]));
        assert_eq!(visited[3], (3, vec![codes::MOOV, codes::TRAK, codes::MDIA, codes::MDHD]));
        assert_eq!(visited[5], (0, vec![FourCc::NULL]));
    }
}
