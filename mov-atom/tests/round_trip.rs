// Mov Atom
// Copyright (c) 2026 The Project Mov Atom Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io::Cursor;

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};

use mov_atom::atoms::*;
use mov_atom::errors::Error;
use mov_atom::registry::codes;
use mov_atom::tree::{self, walk};
use mov_atom::{read_file, write_file, write_to_vec, Atom, AtomReader, FourCc, ReaderOptions};

const TIMESCALE: u32 = 600;

fn random_bytes(seed: u64, len: usize) -> Vec<u8> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut buf = vec![0u8; len];
    rng.fill_bytes(&mut buf);
    buf
}

fn data_information() -> Atom {
    let mut dref = DrefAtom::default();
    dref.add_entry(FourCc::new(*b"alis"), 0, 1, Vec::new());
    Atom::container(codes::DINF, vec![dref.into()])
}

fn media_handler(subtype: &[u8; 4], name: &str) -> Atom {
    HdlrAtom::new(FourCc::new(*b"mhlr"), FourCc::new(*subtype), name).into()
}

fn data_handler() -> Atom {
    HdlrAtom::new(FourCc::new(*b"dhlr"), FourCc::new(*b"alis"), "Alias Data Handler").into()
}

/// A video track of JPEG frames, laid out the way a simple movie writer lays it out.
fn video_track(frame_sizes: &[u32], first_offset: u32) -> Atom {
    let frame_duration = TIMESCALE / 30;
    let duration = u64::from(frame_duration) * frame_sizes.len() as u64;

    let mut stsd = StsdAtom::default();
    stsd.add_entry(VideoSampleEntry::jpeg(640, 480));

    let mut stts = SttsAtom::default();
    let mut stsc = StscAtom::default();
    let mut stsz = StszAtom::default();
    let mut stco = StcoAtom::default();

    let mut offset = first_offset;

    for (i, &size) in frame_sizes.iter().enumerate() {
        stts.add_sample_time(frame_duration);
        stsc.add_chunk(i as u32 + 1, 1, 1);
        stsz.add_sample_size(size).unwrap();
        stco.add_chunk_offset(offset);
        offset += size;
    }

    let stbl = Atom::container(
        codes::STBL,
        vec![stsd.into(), stts.into(), stsc.into(), stsz.into(), stco.into()],
    );

    let minf = Atom::container(
        codes::MINF,
        vec![VmhdAtom::default().into(), data_handler(), data_information(), stbl],
    );

    let mut mdhd = MdhdAtom::new(TIMESCALE, duration);
    mdhd.set_iso_language("eng");

    let mdia = Atom::container(
        codes::MDIA,
        vec![mdhd.into(), media_handler(b"vide", "Video Media Handler"), minf],
    );

    let mut elst = ElstAtom::default();
    elst.entries.push(EditListEntry::new(duration, 0));

    Atom::container(
        codes::TRAK,
        vec![
            TkhdAtom::new_video(1, duration, 640, 480).into(),
            Atom::container(codes::EDTS, vec![elst.into()]),
            mdia,
        ],
    )
}

/// A track of 16-bit stereo PCM audio stored in a single chunk.
fn sound_track(frames: u32, offset: u32) -> Atom {
    let mut stsd = StsdAtom::default();
    stsd.add_entry(SoundSampleEntry::pcm(44100.0, 2, 16));

    let mut stts = SttsAtom::default();
    stts.add_sample_times(frames, 1);

    let mut stsc = StscAtom::default();
    stsc.add_chunk(1, frames, 1);

    let mut stsz = StszAtom::default();
    stsz.set_constant(4, frames);

    let mut stco = StcoAtom::default();
    stco.add_chunk_offset(offset);

    let stbl = Atom::container(
        codes::STBL,
        vec![stsd.into(), stts.into(), stsc.into(), stsz.into(), stco.into()],
    );

    let minf = Atom::container(
        codes::MINF,
        vec![SmhdAtom::default().into(), data_handler(), data_information(), stbl],
    );

    let mdia = Atom::container(
        codes::MDIA,
        vec![
            MdhdAtom::new(44100, u64::from(frames)).into(),
            media_handler(b"soun", "Sound Media Handler"),
            minf,
        ],
    );

    let duration = u64::from(frames) * u64::from(TIMESCALE) / 44100;

    Atom::container(codes::TRAK, vec![TkhdAtom::new_sound(2, duration).into(), mdia])
}

fn movie() -> Vec<Atom> {
    let frame_sizes = [1200, 1350, 1100, 1275];
    let frames_len: u32 = frame_sizes.iter().sum();
    let audio_frames = 2205;

    let mdat = random_bytes(7, (frames_len + 4 * audio_frames) as usize);

    let udta = Atom::container(
        codes::UDTA,
        vec![
            UserDataTextAtom::with_text(FourCc::new(*b"\xa9nam"), "Round Trip").into(),
            WlocAtom { x: 40, y: 60 }.into(),
        ],
    );

    let moov = Atom::container(
        codes::MOOV,
        vec![
            MvhdAtom::new(TIMESCALE, 80).into(),
            video_track(&frame_sizes, 36),
            sound_track(audio_frames, 36 + frames_len),
            udta,
        ],
    );

    vec![FtypAtom::quicktime().into(), Atom::unknown(codes::MDAT, mdat), moov]
}

fn read(buf: &[u8]) -> Result<Vec<Atom>, Error> {
    AtomReader::new().read_all_bytes(buf)
}

fn atom(code: &[u8; 4], body: &[u8]) -> Vec<u8> {
    let mut buf = (body.len() as u32 + 8).to_be_bytes().to_vec();
    buf.extend_from_slice(code);
    buf.extend_from_slice(body);
    buf
}

#[test]
fn round_trip_constructed_movie() {
    let atoms = movie();
    let buf = write_to_vec(&atoms).unwrap();

    assert_eq!(buf.len() as u64, atoms.iter().map(Atom::size).sum::<u64>());

    let mut reader = AtomReader::new();
    let read_back = reader.read_all(Cursor::new(&buf)).unwrap();

    assert_eq!(read_back, atoms);
    assert_eq!(reader.flavor(), Some(mov_atom::FileFlavor::QuickTime));

    // Writing the tree that was read yields the same bytes.
    assert_eq!(write_to_vec(&read_back).unwrap(), buf);

    let path = [codes::MOOV, codes::TRAK, codes::MDIA, codes::MINF, codes::STBL, codes::STSD];
    let stsd = tree::find(&read_back, &path).and_then(Atom::as_leaf);

    match stsd {
        Some(LeafAtom::Stsd(stsd)) => match &stsd.entries[0] {
            SampleEntry::Video(entry) => {
                assert_eq!(entry.compressor_name(), "Photo - JPEG");
                assert_eq!((entry.width, entry.height), (640, 480));
            }
            entry => panic!("unexpected sample entry {:?}", entry),
        },
        _ => panic!("missing stsd"),
    }

    let moov = &read_back[2];
    let sound = moov.children_with_code(codes::TRAK).nth(1).unwrap();
    let stsd = sound.find(&[codes::MDIA, codes::MINF, codes::STBL, codes::STSD]);

    match stsd.and_then(Atom::as_leaf) {
        Some(LeafAtom::Stsd(stsd)) => assert!(matches!(stsd.entries[0], SampleEntry::Sound(_))),
        _ => panic!("missing stsd"),
    }
}

#[test]
fn container_sizes_match_children() {
    let buf = write_to_vec(&movie()).unwrap();
    let atoms = read(&buf).unwrap();

    let mut containers = 0;

    walk(&atoms, |node| {
        let atom = node.atom();
        let header = atom.header().unwrap();

        assert!(!header.clamped);
        assert_eq!(header.atom_len, atom.size());

        if atom.as_container().is_some() {
            let children: u64 =
                atom.children().iter().map(|child| child.header().unwrap().atom_len).sum();

            assert_eq!(header.atom_len, 8 + children);
            containers += 1;
        }
    });

    // moov and udta, then trak, mdia, minf, dinf, and stbl per track, plus the video edts.
    assert_eq!(containers, 2 + 5 * 2 + 1);
}

#[test]
fn unknown_atoms_are_preserved() {
    let payload = random_bytes(42, 333);
    let code = FourCc::new([0x00, 0xff, b'?', 0x7f]);

    let mut atoms = movie();
    if let Some(moov) = atoms[2].as_container_mut() {
        moov.push(Atom::unknown(code, payload.clone()));
    }

    let buf = write_to_vec(&atoms).unwrap();
    let read_back = read(&buf).unwrap();

    let unknown = read_back[2].child(code).and_then(Atom::as_unknown).unwrap();
    assert_eq!(unknown.data(), &payload[..]);
    assert_eq!(write_to_vec(&read_back).unwrap(), buf);
}

#[test]
fn extended_size_atom() {
    let buf = b"\x00\x00\x00\x01free\x00\x00\x00\x00\x00\x00\x00\x10";
    let atoms = read(buf).unwrap();

    assert_eq!(atoms.len(), 1);
    assert_eq!(atoms[0].code(), codes::FREE);
    assert_eq!(atoms[0].header().map(|header| header.atom_len), Some(16));
    assert_eq!(atoms[0].as_unknown().map(|free| free.data().len()), Some(0));

    // Written back with a 32-bit size.
    assert_eq!(write_to_vec(&atoms).unwrap(), b"\x00\x00\x00\x08free");
}

#[test]
fn zero_filler_is_skipped() {
    let mut buf = vec![0; 12];
    buf.extend(write_to_vec(&movie()).unwrap());

    assert_eq!(read(&buf).unwrap(), movie());
}

#[test]
fn leading_atom_rejection() {
    // A WAVE file is not an atom container.
    let wave = b"RIFF\x24\x00\x00\x00WAVEfmt \x10\x00\x00\x00";
    assert!(read(wave).unwrap_err().is_unsupported());

    // An atom that is only found inside containers cannot begin a file.
    let stsz = atom(b"stsz", &[0; 12]);
    assert!(read(&stsz).unwrap_err().is_unsupported());

    // Once several atoms have been read, the same atom is accepted.
    let mut buf = Vec::new();
    for code in [b"ftyp", b"free", b"skip", b"wide"] {
        let body: &[u8] = if code == b"ftyp" { b"qt  \x20\x05\x03\x00" } else { &[] };
        buf.extend(atom(code, body));
    }
    buf.extend(&stsz);

    let atoms = read(&buf).unwrap();
    assert_eq!(atoms.len(), 5);
    assert_eq!(atoms[4].code(), codes::STSZ);
    assert!(matches!(atoms[4].as_leaf(), Some(LeafAtom::Stsz(_))));
}

#[test]
fn empty_input_is_unsupported() {
    assert!(read(&[]).unwrap_err().is_unsupported());

    let err = AtomReader::new().read_all(Cursor::new(Vec::new())).unwrap_err();
    assert!(err.is_unsupported());
}

#[test]
fn bounded_bodies_protect_siblings() {
    // The first text entry claims 64 bytes, far more than its atom holds.
    let bad = Atom::unknown(FourCc::new(*b"\xa9cmt"), b"\x00\x40\x00\x00short".to_vec());
    let good = UserDataTextAtom::with_text(FourCc::new(*b"\xa9cpy"), "(c) 2026");

    // A video media header followed by bytes its decoder does not read.
    let mut vmhd = write_to_vec(&[VmhdAtom::default().into()]).unwrap();
    vmhd[3] += 4;
    vmhd.extend_from_slice(b"junk");

    let mut atoms = movie();
    if let Some(moov) = atoms[2].as_container_mut() {
        moov.push(Atom::container(codes::UDTA, vec![bad.clone(), good.clone().into()]));
    }

    let mut buf = write_to_vec(&atoms).unwrap();

    // Wrap the padded vmhd and a wloc in a minf at the root.
    let mut minf_body = vmhd;
    minf_body.extend(write_to_vec(&[WlocAtom { x: 1, y: 2 }.into()]).unwrap());
    buf.extend(atom(b"minf", &minf_body));

    let read_back = read(&buf).unwrap();

    let udta = read_back[2].children_with_code(codes::UDTA).nth(1).unwrap();
    assert_eq!(udta.children()[0], bad);
    assert_eq!(udta.children()[1], Atom::from(good));

    let minf = &read_back[3];
    assert_eq!(minf.children()[0], Atom::from(VmhdAtom::default()));
    assert_eq!(minf.children()[1], Atom::from(WlocAtom { x: 1, y: 2 }));
}

#[test]
fn oversized_child_is_clamped() {
    let atoms = movie();
    let mut buf = write_to_vec(&atoms[..2]).unwrap();

    // A moov whose only child declares far more bytes than the moov holds.
    let mut moov_body = atom(b"mvhd", &[]);
    moov_body[..4].copy_from_slice(&0x1000u32.to_be_bytes());
    moov_body.extend_from_slice(&[0; 100]);

    buf.extend(atom(b"moov", &moov_body));
    buf.extend(atom(b"free", b"end"));

    let read_back = read(&buf).unwrap();
    assert_eq!(read_back.len(), 4);

    let mvhd = &read_back[2].children()[0];
    let header = mvhd.header().unwrap();
    assert!(header.clamped);
    assert_eq!(header.atom_len, 108);
    assert!(matches!(mvhd.as_leaf(), Some(LeafAtom::Mvhd(_))));

    assert_eq!(read_back[3], Atom::unknown(codes::FREE, b"end".to_vec()));
}

#[test]
fn reader_limits() {
    let buf = write_to_vec(&movie()).unwrap();

    let options = ReaderOptions { max_depth: 4, ..Default::default() };
    let err = AtomReader::with_options(options).read_all_bytes(&buf).unwrap_err();
    assert!(matches!(err, Error::LimitError(_)));

    let options = ReaderOptions { max_payload_len: Some(1024), ..Default::default() };
    let err = AtomReader::with_options(options).read_all_bytes(&buf).unwrap_err();
    assert!(matches!(err, Error::LimitError(_)));
}

#[test]
fn file_round_trip() {
    let path = std::env::temp_dir().join(format!("mov-atom-{}.mov", std::process::id()));

    write_file(&path, &movie()).unwrap();
    let atoms = read_file(&path);
    std::fs::remove_file(&path).unwrap();

    assert_eq!(atoms.unwrap(), movie());
}
