// Mov Atom
// Copyright (c) 2026 The Project Mov Atom Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Recursive reading of atom trees from untrusted streams.

use std::fs::File;
use std::io;
use std::path::Path;

use log::{debug, info, trace, warn};

use mov_atom_core::errors::{decode_error, limit_error, unsupported_error, Result};
use mov_atom_core::fourcc::FourCc;
use mov_atom_core::io::{BufReader, FiniteStream, ReadBytes, ScopedStream, SourceStream};

use crate::atoms::*;
use crate::context::Context;
use crate::registry::{self, codes, AtomClass, LeafKind};

/// While fewer than this many atoms have been read, a malformed header means the stream is not an
/// atom container at all.
const TRUSTED_HEADER_COUNT: usize = 3;

/// While fewer than this many atoms have been read, only plausible leading atom types are
/// accepted.
const TRUSTED_TYPE_COUNT: usize = 2;

/// The family of container file being read, as declared by the root `ftyp` atom.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FileFlavor {
    /// A QuickTime movie (major brand `qt  `).
    QuickTime,
    /// Any other ISO base media file, such as MP4 or M4A.
    Mp4,
}

/// Limits applied while reading.
#[derive(Copy, Clone, Debug)]
pub struct ReaderOptions {
    /// The maximum number of nested containers.
    pub max_depth: usize,
    /// The maximum length of an atom body buffered in memory, or `None` for no limit.
    pub max_payload_len: Option<u64>,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        ReaderOptions { max_depth: 64, max_payload_len: None }
    }
}

/// The outcome of reading an atom header.
enum Next {
    Atom(AtomHeader),
    /// The type code could not be read.
    Empty,
    /// The stream or enclosing body ended cleanly.
    End,
}

/// An `AtomReader` reads a sequence of atom trees from a stream.
///
/// The reader keeps a count of the atoms read so far. Until a few atoms have been read, the stream
/// is not trusted to be an atom container, and malformed input is reported as
/// [`Error::Unsupported`](mov_atom_core::errors::Error::Unsupported) rather than as a decode
/// error.
#[derive(Default)]
pub struct AtomReader {
    options: ReaderOptions,
    atoms_read: usize,
    flavor: Option<FileFlavor>,
}

impl AtomReader {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_options(options: ReaderOptions) -> Self {
        AtomReader { options, ..Default::default() }
    }

    /// The file flavor, if a root `ftyp` atom has been read.
    pub fn flavor(&self) -> Option<FileFlavor> {
        self.flavor
    }

    /// The number of atoms read so far, at any depth.
    pub fn atoms_read(&self) -> usize {
        self.atoms_read
    }

    /// Read every root atom of an `std::io::Read` source.
    pub fn read_all<R: io::Read>(&mut self, source: R) -> Result<Vec<Atom>> {
        let mut stream = SourceStream::new(source);
        self.read_stream(&mut stream)
    }

    /// Read every root atom of a buffer.
    pub fn read_all_bytes(&mut self, buf: &[u8]) -> Result<Vec<Atom>> {
        let mut reader = BufReader::new(buf);
        self.read_stream(&mut reader)
    }

    /// Read every root atom of a stream. The reader's state is reset first so the reader may be
    /// reused for another stream.
    pub fn read_stream(&mut self, reader: &mut dyn ReadBytes) -> Result<Vec<Atom>> {
        self.atoms_read = 0;
        self.flavor = None;

        let mut atoms = Vec::new();

        while let Some(atom) = self.read_next(reader)? {
            atoms.push(atom);
        }

        Ok(atoms)
    }

    /// Read the next root atom of a stream. Returns `None` once the stream ends.
    pub fn read_next(&mut self, reader: &mut dyn ReadBytes) -> Result<Option<Atom>> {
        let mut ctx = Context::new();
        self.read_atom(reader, &mut ctx, None)
    }

    /// Read one atom. `bound` is the number of bytes the enclosing atom body has left, if there
    /// is an enclosing atom.
    fn read_atom(
        &mut self,
        reader: &mut dyn ReadBytes,
        ctx: &mut Context,
        bound: Option<u64>,
    ) -> Result<Option<Atom>> {
        let header = match self.read_header(reader, bound) {
            Ok(Next::Atom(header)) => header,
            Ok(Next::Empty) => return Ok(Some(Atom::empty())),
            Ok(Next::End) => return Ok(None),
            Err(err) if err.is_unsupported() => return Err(err),
            Err(err) if self.atoms_read < TRUSTED_HEADER_COUNT => {
                debug!("malformed leading atom header: {}", err);
                return unsupported_error("mov-atom: malformed leading atom header");
            }
            Err(err) => return Err(err),
        };

        if self.atoms_read < TRUSTED_TYPE_COUNT && !registry::is_plausible_leading(header.code) {
            debug!("unexpected leading atom type {}", header.code);
            return unsupported_error("mov-atom: unexpected leading atom type");
        }

        let mut body = ScopedStream::new(&mut *reader, header.data_len());

        let kind = self.read_body(&mut body, ctx, &header)?;

        // Skip whatever the decoder did not consume.
        body.ignore()?;

        self.atoms_read += 1;

        Ok(Some(Atom::with_header(header, kind)))
    }

    fn read_header(&mut self, reader: &mut dyn ReadBytes, bound: Option<u64>) -> Result<Next> {
        let start = reader.pos();

        let mut fillers = 0;

        let size = loop {
            match reader.read_be_u32() {
                Ok(0) => fillers += 1,
                Ok(size) => break u64::from(size),
                Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                    if self.atoms_read == 0 {
                        return unsupported_error("mov-atom: no atoms in stream");
                    }
                    return Ok(Next::End);
                }
                Err(err) => return Err(err.into()),
            }
        };

        if fillers > 0 {
            debug!("skipped {} zero filler words at {}", fillers, start);
        }

        let pos = reader.pos() - 4;

        // The most an atom may span, counting the size field already read.
        let limit = bound.map(|bound| bound.saturating_sub(reader.pos() - start) + 4);

        let mut clamped = false;

        let mut clamp = |size: u64| match limit {
            Some(limit) if size > limit => {
                debug!("atom at {} declares {} bytes but only {} remain", pos, size, limit);
                clamped = true;
                limit
            }
            _ => size,
        };

        let mut atom_len = clamp(size);

        let code = match reader.read_quad_bytes() {
            Ok(code) => FourCc::new(code),
            Err(_) => {
                if self.atoms_read == 0 {
                    return unsupported_error("mov-atom: typeless leading atom");
                }
                debug!("atom at {} has no type", pos);
                return Ok(Next::Empty);
            }
        };

        let header_len = if atom_len == 1 {
            atom_len = clamp(reader.read_be_u64()?);
            AtomHeader::LARGE_HEADER_SIZE
        }
        else {
            AtomHeader::HEADER_SIZE
        };

        if atom_len < u64::from(header_len) {
            return decode_error("mov-atom: atom size is smaller than its header");
        }

        trace!("atom {} at {} len {}", code, pos, atom_len);

        Ok(Next::Atom(AtomHeader { code, pos, header_len, atom_len, clamped }))
    }

    fn read_body<B>(
        &mut self,
        body: &mut B,
        ctx: &mut Context,
        header: &AtomHeader,
    ) -> Result<AtomKind>
    where
        B: ReadBytes + FiniteStream,
    {
        let code = header.code;

        let class = registry::classify(code);

        if let AtomClass::Leaf(kind) = class {
            return Ok(AtomKind::Leaf(self.read_leaf(kind, body, ctx, header)?));
        }

        if self.flavor == Some(FileFlavor::QuickTime) {
            if code.is_copyright_prefixed() {
                return self.read_buffered::<UserDataTextAtom, _>(body, header);
            }
        }
        else {
            if code == codes::DATA {
                return self.read_buffered::<DataAtom, _>(body, header);
            }
            if code.is_copyright_prefixed() && ctx.parent() == Some(codes::ILST) {
                return self.read_container(body, ctx, code);
            }
        }

        match class {
            AtomClass::Container => self.read_container(body, ctx, code),
            _ => {
                let data = self.read_payload(body)?;
                Ok(AtomKind::Unknown(UnknownLeafAtom::new(code, data)))
            }
        }
    }

    fn read_leaf<B>(
        &mut self,
        kind: LeafKind,
        body: &mut B,
        ctx: &mut Context,
        header: &AtomHeader,
    ) -> Result<LeafAtom>
    where
        B: ReadBytes + FiniteStream,
    {
        let leaf = match kind {
            LeafKind::Mvhd => MvhdAtom::read(body, header)?.into(),
            LeafKind::Mdhd => MdhdAtom::read(body, header)?.into(),
            LeafKind::Tkhd => TkhdAtom::read(body, header)?.into(),
            LeafKind::Hdlr => HdlrAtom::read(body, header)?.into(),
            LeafKind::Vmhd => {
                ctx.mark(MediaKind::Video);
                VmhdAtom::read(body, header)?.into()
            }
            LeafKind::Smhd => {
                ctx.mark(MediaKind::Sound);
                SmhdAtom::read(body, header)?.into()
            }
            LeafKind::Dref => DrefAtom::read(body, header)?.into(),
            LeafKind::Elst => ElstAtom::read(body, header)?.into(),
            LeafKind::Stsd => StsdAtom::read_media(body, ctx.grandparent_kind())?.into(),
            LeafKind::Stts => SttsAtom::read(body, header)?.into(),
            LeafKind::Stsc => StscAtom::read(body, header)?.into(),
            LeafKind::Stsz => StszAtom::read(body, header)?.into(),
            LeafKind::Stco => StcoAtom::read(body, header)?.into(),
            LeafKind::Wloc => WlocAtom::read(body, header)?.into(),
            LeafKind::Ftyp => {
                let ftyp = FtypAtom::read(body, header)?;

                if ctx.depth() == 0 && self.flavor.is_none() {
                    let flavor =
                        if ftyp.is_quicktime() { FileFlavor::QuickTime } else { FileFlavor::Mp4 };

                    info!("file flavor is {:?} (major brand {})", flavor, ftyp.major);
                    self.flavor = Some(flavor);
                }

                ftyp.into()
            }
        };

        Ok(leaf)
    }

    fn read_container<B>(
        &mut self,
        body: &mut B,
        ctx: &mut Context,
        code: FourCc,
    ) -> Result<AtomKind>
    where
        B: ReadBytes + FiniteStream,
    {
        if ctx.depth() >= self.options.max_depth {
            return limit_error("mov-atom: maximum atom depth exceeded");
        }

        ctx.push(code);
        let children = self.read_children(body, ctx);
        ctx.pop();

        Ok(AtomKind::Container(ContainerAtom::with_children(code, children?)))
    }

    fn read_children<B>(&mut self, body: &mut B, ctx: &mut Context) -> Result<Vec<Atom>>
    where
        B: ReadBytes + FiniteStream,
    {
        let mut children = Vec::new();

        while body.bytes_available() > 0 {
            let bound = body.bytes_available();

            match self.read_atom(&mut *body, ctx, Some(bound))? {
                Some(child) => children.push(child),
                None => break,
            }
        }

        Ok(children)
    }

    /// Decode a leaf from a buffered copy of its body. If decoding fails, the body is kept
    /// verbatim as an unknown leaf instead.
    fn read_buffered<T, B>(&mut self, body: &mut B, header: &AtomHeader) -> Result<AtomKind>
    where
        T: LeafBody + Into<LeafAtom>,
        B: ReadBytes + FiniteStream,
    {
        let data = self.read_payload(body)?;

        match T::read(&mut BufReader::new(&data), header) {
            Ok(leaf) => Ok(AtomKind::Leaf(leaf.into())),
            Err(err) => {
                warn!("atom {} at {} could not be decoded: {}", header.code, header.pos, err);
                Ok(AtomKind::Unknown(UnknownLeafAtom::new(header.code, data)))
            }
        }
    }

    fn read_payload<B>(&mut self, body: &mut B) -> Result<Box<[u8]>>
    where
        B: ReadBytes + FiniteStream,
    {
        let len = body.bytes_available();

        if let Some(max_len) = self.options.max_payload_len {
            if len > max_len {
                return limit_error("mov-atom: atom payload exceeds limit");
            }
        }

        read_remainder(body)
    }
}

/// Read every root atom of a file.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Vec<Atom>> {
    let file = File::open(path)?;
    AtomReader::new().read_all(file)
}
