// Mov Atom
// Copyright (c) 2026 The Project Mov Atom Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use mov_atom_core::fourcc::FourCc;
use smallvec::SmallVec;

use crate::atoms::MediaKind;

/// A container atom that is currently being read.
#[derive(Copy, Clone, Debug)]
struct Frame {
    code: FourCc,
    /// Set once a media information header has been read as a child of this container.
    kind: MediaKind,
}

/// The chain of container atoms enclosing the atom being read, innermost last.
#[derive(Default)]
pub(crate) struct Context {
    frames: SmallVec<[Frame; 8]>,
}

impl Context {
    pub fn new() -> Self {
        Default::default()
    }

    /// The number of enclosing containers.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn push(&mut self, code: FourCc) {
        self.frames.push(Frame { code, kind: MediaKind::Other });
    }

    pub fn pop(&mut self) {
        self.frames.pop();
    }

    /// The type of the immediately enclosing container.
    pub fn parent(&self) -> Option<FourCc> {
        self.frames.last().map(|frame| frame.code)
    }

    /// Record the kind of media described by the immediately enclosing container.
    pub fn mark(&mut self, kind: MediaKind) {
        if let Some(frame) = self.frames.last_mut() {
            frame.kind = kind;
        }
    }

    /// The kind of media recorded on the container enclosing the parent. For a sample description
    /// this is the media information atom of the track.
    pub fn grandparent_kind(&self) -> MediaKind {
        match self.frames.len() {
            len if len >= 2 => self.frames[len - 2].kind,
            _ => MediaKind::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::codes;

    #[test]
    fn verify_context_frames() {
        let mut ctx = Context::new();
        assert_eq!(ctx.parent(), None);
        assert_eq!(ctx.grandparent_kind(), MediaKind::Other);

        ctx.push(codes::MOOV);
        ctx.push(codes::MINF);
        ctx.mark(MediaKind::Sound);
        ctx.push(codes::STBL);

        assert_eq!(ctx.depth(), 3);
        assert_eq!(ctx.parent(), Some(codes::STBL));
        assert_eq!(ctx.grandparent_kind(), MediaKind::Sound);

        ctx.pop();
        assert_eq!(ctx.parent(), Some(codes::MINF));
        assert_eq!(ctx.grandparent_kind(), MediaKind::Other);
    }
}
