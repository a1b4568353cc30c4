// Mov Atom
// Copyright (c) 2026 The Project Mov Atom Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use mov_atom::atoms::{LeafAtom, SampleEntry, SampleSize};
use mov_atom::{Atom, AtomKind};

use serde::Serialize;

/// A serializable view of an atom tree.
#[derive(Serialize)]
pub struct AtomNode {
    #[serde(rename = "type")]
    code: String,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<u64>,
    size: u64,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    clamped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<AtomNode>,
}

impl AtomNode {
    pub fn new(atom: &Atom) -> Self {
        let header = atom.header();

        AtomNode {
            code: atom.code().to_string(),
            kind: kind_name(atom),
            offset: header.map(|header| header.pos),
            size: header.map(|header| header.atom_len).unwrap_or_else(|| atom.size()),
            clamped: header.map(|header| header.clamped).unwrap_or(false),
            summary: summarize(atom),
            children: atom.children().iter().map(AtomNode::new).collect(),
        }
    }
}

pub fn kind_name(atom: &Atom) -> &'static str {
    match atom.kind() {
        AtomKind::Container(_) => "container",
        AtomKind::Leaf(_) => "leaf",
        AtomKind::Unknown(_) => "unknown",
        AtomKind::Empty => "empty",
    }
}

/// A one-line description of the interesting fields of an atom.
pub fn summarize(atom: &Atom) -> Option<String> {
    let leaf = match atom.kind() {
        AtomKind::Leaf(leaf) => leaf,
        AtomKind::Unknown(unknown) => return Some(format!("{} bytes", unknown.data().len())),
        _ => return None,
    };

    let summary = match leaf {
        LeafAtom::Ftyp(ftyp) => {
            let compatible: Vec<String> = ftyp.compatible.iter().map(|c| c.to_string()).collect();
            format!("major {}, compatible [{}]", ftyp.major, compatible.join(", "))
        }
        LeafAtom::Mvhd(mvhd) => {
            format!("timescale {}, duration {}", mvhd.timescale, mvhd.duration)
        }
        LeafAtom::Tkhd(tkhd) => {
            format!(
                "track {}, duration {}, {}x{}",
                tkhd.id,
                tkhd.duration,
                f64::from(tkhd.width),
                f64::from(tkhd.height)
            )
        }
        LeafAtom::Mdhd(mdhd) => format!(
            "timescale {}, duration {}, language {}",
            mdhd.timescale,
            mdhd.duration,
            mdhd.iso_language().unwrap_or_else(|| format!("{:#06x}", mdhd.language))
        ),
        LeafAtom::Hdlr(hdlr) => format!(
            "{}/{} \"{}\"",
            hdlr.component_type,
            hdlr.component_subtype,
            hdlr.name()
        ),
        LeafAtom::Vmhd(vmhd) => format!("graphics mode {:#x}", vmhd.graphics_mode),
        LeafAtom::Smhd(smhd) => format!("balance {}", f64::from(smhd.balance)),
        LeafAtom::Dref(dref) => {
            let kinds: Vec<String> = dref.entries.iter().map(|e| e.kind.to_string()).collect();
            format!("[{}]", kinds.join(", "))
        }
        LeafAtom::Elst(elst) => format!("{} edits", elst.entries.len()),
        LeafAtom::Stsd(stsd) => {
            let entries: Vec<String> = stsd.entries.iter().map(describe_entry).collect();
            format!("[{}]", entries.join(", "))
        }
        LeafAtom::Stts(stts) => {
            format!("{} runs, duration {}", stts.entries.len(), stts.total_duration())
        }
        LeafAtom::Stsc(stsc) => format!("{} runs", stsc.entries.len()),
        LeafAtom::Stsz(stsz) => match stsz.sample_sizes {
            SampleSize::Constant { size, count } => format!("{} samples of {} bytes", count, size),
            SampleSize::Table(ref sizes) => format!("{} samples", sizes.len()),
        },
        LeafAtom::Stco(stco) => format!("{} chunks", stco.chunk_offsets.len()),
        LeafAtom::Wloc(wloc) => format!("x {}, y {}", wloc.x, wloc.y),
        LeafAtom::UserDataText(text) => format!("\"{}\"", text.text().unwrap_or_default()),
        LeafAtom::Data(data) => {
            if let Some(text) = data.text() {
                format!("\"{}\"", text)
            }
            else if let Some(value) = data.integer() {
                value.to_string()
            }
            else if let Some(format) = data.image_format() {
                format!("{} image, {} bytes", format, data.payload.len())
            }
            else {
                format!("type {}, {} bytes", data.data_type, data.payload.len())
            }
        }
    };

    Some(summary)
}

fn describe_entry(entry: &SampleEntry) -> String {
    match entry {
        SampleEntry::Video(video) => format!(
            "{} {}x{} \"{}\"",
            video.format,
            video.width,
            video.height,
            video.compressor_name()
        ),
        SampleEntry::Sound(sound) => format!(
            "{} {} Hz, {} channels, {} bits",
            sound.format,
            f64::from(sound.sample_rate),
            sound.channels,
            sound.sample_size
        ),
        SampleEntry::Other(other) => other.format.to_string(),
    }
}
