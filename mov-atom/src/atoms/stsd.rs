// Mov Atom
// Copyright (c) 2026 The Project Mov Atom Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use mov_atom_core::errors::{decode_error, Result};
use mov_atom_core::fourcc::FourCc;
use mov_atom_core::fp::FpU16;
use mov_atom_core::io::{FiniteStream, ReadBytes, ScopedStream, WriteBytes};

use crate::atoms::{
    check_entry_count, entry_capacity, read_remainder, read_version_flags, write_version_flags,
    AtomHeader, LeafBody,
};
use crate::registry::codes;

/// Size, format, reserved bytes, and data reference index common to every sample entry.
const ENTRY_HEADER_LEN: u64 = 16;
/// Fixed fields of a video sample entry after the common header.
const VIDEO_FIELDS_LEN: u64 = 70;
/// Fixed fields of a version 0 sound sample entry after the common header.
const SOUND_FIELDS_LEN: u64 = 20;

/// The kind of media a track holds, as implied by its media information header.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MediaKind {
    /// The media information contains a `vmhd` atom.
    Video,
    /// The media information contains a `smhd` atom.
    Sound,
    #[default]
    Other,
}

/// A visual sample description.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoSampleEntry {
    /// Compression format, such as `jpeg` or `png `.
    pub format: FourCc,
    pub data_ref_index: u16,
    pub version: u16,
    pub revision: u16,
    pub vendor: FourCc,
    pub temporal_quality: u32,
    pub spatial_quality: u32,
    pub width: u16,
    pub height: u16,
    /// Horizontal resolution in pixels per inch.
    pub horizontal_resolution: FpU16,
    /// Vertical resolution in pixels per inch.
    pub vertical_resolution: FpU16,
    pub data_size: u32,
    /// Frames stored per sample.
    pub frame_count: u16,
    /// A 32 byte Pascal string.
    pub compressor_name: [u8; 32],
    /// Pixel depth.
    pub depth: u16,
    /// Color table identifier, or `0xffff` for the default table.
    pub color_table_id: u16,
    /// Extension atoms following the fixed fields, kept verbatim.
    pub extensions: Box<[u8]>,
}

impl VideoSampleEntry {
    pub fn new(format: FourCc, width: u16, height: u16) -> Self {
        VideoSampleEntry {
            format,
            data_ref_index: 1,
            version: 0,
            revision: 0,
            vendor: FourCc::NULL,
            temporal_quality: 0,
            spatial_quality: 512,
            width,
            height,
            horizontal_resolution: FpU16::new(72),
            vertical_resolution: FpU16::new(72),
            data_size: 0,
            frame_count: 1,
            compressor_name: [0; 32],
            depth: 24,
            color_table_id: 0xffff,
            extensions: Box::default(),
        }
    }

    /// A Motion-JPEG description.
    pub fn jpeg(width: u16, height: u16) -> Self {
        let mut entry = VideoSampleEntry::new(FourCc::new(*b"jpeg"), width, height);
        entry.set_compressor_name("Photo - JPEG");
        entry.version = 1;
        entry.revision = 1;
        entry
    }

    /// A PNG description.
    pub fn png(width: u16, height: u16) -> Self {
        let mut entry = VideoSampleEntry::new(FourCc::new(*b"png "), width, height);
        entry.set_compressor_name("Photo - PNG");
        entry.version = 1;
        entry.revision = 1;
        entry
    }

    /// Decode the compressor name.
    pub fn compressor_name(&self) -> String {
        let len = usize::from(self.compressor_name[0]).min(31);
        String::from_utf8_lossy(&self.compressor_name[1..1 + len]).to_string()
    }

    /// Set the compressor name, truncated to 31 bytes.
    pub fn set_compressor_name(&mut self, name: &str) {
        let name = name.as_bytes();
        let len = name.len().min(31);

        self.compressor_name = [0; 32];
        self.compressor_name[0] = len as u8;
        self.compressor_name[1..1 + len].copy_from_slice(&name[..len]);
    }

    fn read<B: ReadBytes + FiniteStream>(
        reader: &mut B,
        format: FourCc,
        data_ref_index: u16,
    ) -> Result<Self> {
        let version = reader.read_be_u16()?;
        let revision = reader.read_be_u16()?;
        let vendor = FourCc::new(reader.read_quad_bytes()?);
        let temporal_quality = reader.read_be_u32()?;
        let spatial_quality = reader.read_be_u32()?;
        let width = reader.read_be_u16()?;
        let height = reader.read_be_u16()?;
        let horizontal_resolution = FpU16::parse_raw(reader.read_be_u32()?);
        let vertical_resolution = FpU16::parse_raw(reader.read_be_u32()?);
        let data_size = reader.read_be_u32()?;
        let frame_count = reader.read_be_u16()?;

        let mut compressor_name = [0; 32];
        reader.read_buf_exact(&mut compressor_name)?;

        let depth = reader.read_be_u16()?;
        let color_table_id = reader.read_be_u16()?;

        let extensions = read_remainder(reader)?;

        Ok(VideoSampleEntry {
            format,
            data_ref_index,
            version,
            revision,
            vendor,
            temporal_quality,
            spatial_quality,
            width,
            height,
            horizontal_resolution,
            vertical_resolution,
            data_size,
            frame_count,
            compressor_name,
            depth,
            color_table_id,
            extensions,
        })
    }

    fn write<W: WriteBytes + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_be_u16(self.version)?;
        writer.write_be_u16(self.revision)?;
        writer.write_quad_bytes(self.vendor.get())?;
        writer.write_be_u32(self.temporal_quality)?;
        writer.write_be_u32(self.spatial_quality)?;
        writer.write_be_u16(self.width)?;
        writer.write_be_u16(self.height)?;
        writer.write_be_u32(self.horizontal_resolution.to_raw())?;
        writer.write_be_u32(self.vertical_resolution.to_raw())?;
        writer.write_be_u32(self.data_size)?;
        writer.write_be_u16(self.frame_count)?;
        writer.write_buf(&self.compressor_name)?;
        writer.write_be_u16(self.depth)?;
        writer.write_be_u16(self.color_table_id)?;
        writer.write_buf(&self.extensions)?;
        Ok(())
    }
}

/// A sound sample description.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SoundSampleEntry {
    /// Audio format, such as `twos` or `raw `.
    pub format: FourCc,
    pub data_ref_index: u16,
    /// Version 1 and 2 descriptions carry more fields. They are kept in `extensions`.
    pub version: u16,
    pub revision: u16,
    pub vendor: FourCc,
    pub channels: u16,
    /// Bits per sample.
    pub sample_size: u16,
    pub compression_id: i16,
    pub packet_size: u16,
    pub sample_rate: FpU16,
    pub extensions: Box<[u8]>,
}

impl SoundSampleEntry {
    pub fn new(format: FourCc, sample_rate: f64, channels: u16, sample_size: u16) -> Self {
        SoundSampleEntry {
            format,
            data_ref_index: 1,
            version: 0,
            revision: 0,
            vendor: FourCc::NULL,
            channels,
            sample_size,
            compression_id: 0,
            packet_size: 0,
            sample_rate: FpU16::from_f64(sample_rate),
            extensions: Box::default(),
        }
    }

    /// An uncompressed PCM description. 8-bit audio is unsigned, wider samples are signed
    /// big-endian.
    pub fn pcm(sample_rate: f64, channels: u16, sample_size: u16) -> Self {
        let format = if sample_size == 8 { *b"raw " } else { *b"twos" };
        SoundSampleEntry::new(FourCc::new(format), sample_rate, channels, sample_size)
    }

    fn read<B: ReadBytes + FiniteStream>(
        reader: &mut B,
        format: FourCc,
        data_ref_index: u16,
    ) -> Result<Self> {
        Ok(SoundSampleEntry {
            format,
            data_ref_index,
            version: reader.read_be_u16()?,
            revision: reader.read_be_u16()?,
            vendor: FourCc::new(reader.read_quad_bytes()?),
            channels: reader.read_be_u16()?,
            sample_size: reader.read_be_u16()?,
            compression_id: reader.read_be_i16()?,
            packet_size: reader.read_be_u16()?,
            sample_rate: FpU16::parse_raw(reader.read_be_u32()?),
            extensions: read_remainder(reader)?,
        })
    }

    fn write<W: WriteBytes + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_be_u16(self.version)?;
        writer.write_be_u16(self.revision)?;
        writer.write_quad_bytes(self.vendor.get())?;
        writer.write_be_u16(self.channels)?;
        writer.write_be_u16(self.sample_size)?;
        writer.write_be_i16(self.compression_id)?;
        writer.write_be_u16(self.packet_size)?;
        writer.write_be_u32(self.sample_rate.to_raw())?;
        writer.write_buf(&self.extensions)?;
        Ok(())
    }
}

/// A sample description of any other media. The fields after the common header are kept
/// verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenericSampleEntry {
    pub format: FourCc,
    pub data_ref_index: u16,
    pub data: Box<[u8]>,
}

/// A sample description table entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SampleEntry {
    Video(VideoSampleEntry),
    Sound(SoundSampleEntry),
    Other(GenericSampleEntry),
}

impl SampleEntry {
    pub fn format(&self) -> FourCc {
        match self {
            SampleEntry::Video(entry) => entry.format,
            SampleEntry::Sound(entry) => entry.format,
            SampleEntry::Other(entry) => entry.format,
        }
    }

    fn data_ref_index(&self) -> u16 {
        match self {
            SampleEntry::Video(entry) => entry.data_ref_index,
            SampleEntry::Sound(entry) => entry.data_ref_index,
            SampleEntry::Other(entry) => entry.data_ref_index,
        }
    }

    /// The encoded size of the entry, including its size field.
    pub fn encoded_len(&self) -> u64 {
        ENTRY_HEADER_LEN
            + match self {
                SampleEntry::Video(entry) => VIDEO_FIELDS_LEN + entry.extensions.len() as u64,
                SampleEntry::Sound(entry) => SOUND_FIELDS_LEN + entry.extensions.len() as u64,
                SampleEntry::Other(entry) => entry.data.len() as u64,
            }
    }

    fn read<B: ReadBytes + FiniteStream>(reader: &mut B, kind: MediaKind) -> Result<Self> {
        let size = u64::from(reader.read_be_u32()?);

        if size < ENTRY_HEADER_LEN || size - 4 > reader.bytes_available() {
            return decode_error("stsd: invalid sample entry size");
        }

        let format = FourCc::new(reader.read_quad_bytes()?);

        // Reserved
        reader.ignore_bytes(6)?;

        let data_ref_index = reader.read_be_u16()?;

        let fields_len = size - ENTRY_HEADER_LEN;
        let mut fields = ScopedStream::new(&mut *reader, fields_len);

        // Entries too short for the layout implied by the media kind are kept verbatim.
        let entry = match kind {
            MediaKind::Video if fields_len >= VIDEO_FIELDS_LEN => {
                SampleEntry::Video(VideoSampleEntry::read(&mut fields, format, data_ref_index)?)
            }
            MediaKind::Sound if fields_len >= SOUND_FIELDS_LEN => {
                SampleEntry::Sound(SoundSampleEntry::read(&mut fields, format, data_ref_index)?)
            }
            _ => SampleEntry::Other(GenericSampleEntry {
                format,
                data_ref_index,
                data: read_remainder(&mut fields)?,
            }),
        };

        Ok(entry)
    }

    fn write<W: WriteBytes + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_be_u32(self.encoded_len() as u32)?;
        writer.write_quad_bytes(self.format().get())?;
        writer.write_buf(&[0; 6])?;
        writer.write_be_u16(self.data_ref_index())?;

        match self {
            SampleEntry::Video(entry) => entry.write(writer),
            SampleEntry::Sound(entry) => entry.write(writer),
            SampleEntry::Other(entry) => {
                writer.write_buf(&entry.data)?;
                Ok(())
            }
        }
    }
}

impl From<VideoSampleEntry> for SampleEntry {
    fn from(entry: VideoSampleEntry) -> Self {
        SampleEntry::Video(entry)
    }
}

impl From<SoundSampleEntry> for SampleEntry {
    fn from(entry: SoundSampleEntry) -> Self {
        SampleEntry::Sound(entry)
    }
}

impl From<GenericSampleEntry> for SampleEntry {
    fn from(entry: GenericSampleEntry) -> Self {
        SampleEntry::Other(entry)
    }
}

/// Sample description atom.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StsdAtom {
    pub version: u8,
    pub flags: u32,
    pub entries: Vec<SampleEntry>,
}

impl StsdAtom {
    pub fn add_entry(&mut self, entry: impl Into<SampleEntry>) {
        self.entries.push(entry.into());
    }

    /// Decode the sample descriptions of a track holding `kind` media.
    pub fn read_media<B>(reader: &mut B, kind: MediaKind) -> Result<Self>
    where
        B: ReadBytes + FiniteStream,
    {
        let (version, flags) = read_version_flags(reader)?;

        let entry_count = reader.read_be_u32()?;
        check_entry_count(reader, entry_count, ENTRY_HEADER_LEN, "stsd: invalid entry count")?;

        let mut entries = Vec::with_capacity(entry_capacity(entry_count));

        for _ in 0..entry_count {
            entries.push(SampleEntry::read(reader, kind)?);
        }

        Ok(StsdAtom { version, flags, entries })
    }
}

impl LeafBody for StsdAtom {
    /// Without knowledge of the track, every entry is generic.
    fn read<B: ReadBytes + FiniteStream>(reader: &mut B, _: &AtomHeader) -> Result<Self> {
        StsdAtom::read_media(reader, MediaKind::Other)
    }

    fn code(&self) -> FourCc {
        codes::STSD
    }

    fn body_len(&self) -> u64 {
        8 + self.entries.iter().map(SampleEntry::encoded_len).sum::<u64>()
    }

    fn write<W: WriteBytes + ?Sized>(&self, writer: &mut W) -> Result<()> {
        write_version_flags(writer, self.version, self.flags)?;
        writer.write_be_u32(self.entries.len() as u32)?;

        for entry in &self.entries {
            entry.write(writer)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mov_atom_core::io::BufReader;

    use super::*;

    fn encode(stsd: &StsdAtom) -> Vec<u8> {
        let mut buf = Vec::new();
        stsd.write(&mut buf).unwrap();
        assert_eq!(buf.len() as u64, stsd.body_len());
        buf
    }

    #[test]
    fn verify_video_entry_layout() {
        let mut stsd = StsdAtom::default();
        stsd.add_entry(VideoSampleEntry::jpeg(320, 240));

        let buf = encode(&stsd);
        assert_eq!(buf.len(), 8 + 86);
        assert_eq!(&buf[8..16], b"\x00\x00\x00\x56jpeg");

        let read = StsdAtom::read_media(&mut BufReader::new(&buf), MediaKind::Video).unwrap();
        assert_eq!(read, stsd);

        match &read.entries[0] {
            SampleEntry::Video(entry) => {
                assert_eq!(entry.compressor_name(), "Photo - JPEG");
                assert_eq!(entry.spatial_quality, 512);
                assert_eq!(f64::from(entry.horizontal_resolution), 72.0);
            }
            entry => panic!("unexpected entry {:?}", entry),
        }
    }

    #[test]
    fn verify_sound_entry_layout() {
        let mut stsd = StsdAtom::default();
        stsd.add_entry(SoundSampleEntry::pcm(22050.0, 1, 8));
        stsd.add_entry(SoundSampleEntry::pcm(44100.0, 2, 16));

        let buf = encode(&stsd);
        assert_eq!(buf.len(), 8 + 2 * 36);
        assert_eq!(stsd.entries[0].format(), FourCc::new(*b"raw "));
        assert_eq!(stsd.entries[1].format(), FourCc::new(*b"twos"));

        let read = StsdAtom::read_media(&mut BufReader::new(&buf), MediaKind::Sound).unwrap();
        assert_eq!(read, stsd);
    }

    #[test]
    fn verify_media_kind_selects_layout() {
        let mut stsd = StsdAtom::default();
        stsd.add_entry(VideoSampleEntry::png(16, 16));
        let buf = encode(&stsd);

        // The same bytes decode as a generic entry when the track kind is unknown, and re-encode
        // identically.
        let generic = StsdAtom::read_media(&mut BufReader::new(&buf), MediaKind::Other).unwrap();
        match &generic.entries[0] {
            SampleEntry::Other(entry) => assert_eq!(entry.data.len(), 70),
            entry => panic!("unexpected entry {:?}", entry),
        }
        assert_eq!(encode(&generic), buf);

        // A sound track reads the video fields as a sound entry with extensions.
        let sound = StsdAtom::read_media(&mut BufReader::new(&buf), MediaKind::Sound).unwrap();
        assert_eq!(encode(&sound), buf);
    }

    #[test]
    fn verify_invalid_entry_size() {
        let mut stsd = StsdAtom::default();
        stsd.add_entry(GenericSampleEntry {
            format: FourCc::new(*b"tmcd"),
            data_ref_index: 1,
            data: vec![1, 2, 3, 4].into_boxed_slice(),
        });
        let mut buf = encode(&stsd);

        // An entry larger than the atom.
        buf[11] = 0x40;
        assert!(StsdAtom::read_media(&mut BufReader::new(&buf), MediaKind::Other).is_err());

        // An entry smaller than its own header.
        buf[11] = 0x08;
        assert!(StsdAtom::read_media(&mut BufReader::new(&buf), MediaKind::Other).is_err());
    }
}
