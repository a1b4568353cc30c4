// Mov Atom
// Copyright (c) 2026 The Project Mov Atom Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt;

/// A four character code identifying an atom type, brand, or codec.
///
/// The bytes are not required to be printable ASCII. QuickTime user data text atoms, for example,
/// begin with the byte `0xa9` ("©" in Mac OS Roman).
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Copy, Default)]
#[repr(transparent)]
pub struct FourCc {
    val: [u8; 4],
}

impl FourCc {
    /// The all-zero code. Used for atoms whose type could not be read.
    pub const NULL: FourCc = FourCc::new([0; 4]);

    /// Construct a new FourCC code from the given byte array.
    pub const fn new(val: [u8; 4]) -> Self {
        Self { val }
    }

    /// Get the raw bytes of the code.
    pub const fn get(&self) -> [u8; 4] {
        self.val
    }

    /// Returns `true` if the code begins with the copyright sign used by user data text atoms.
    pub fn is_copyright_prefixed(&self) -> bool {
        self.val[0] == 0xa9
    }
}

impl From<[u8; 4]> for FourCc {
    fn from(val: [u8; 4]) -> Self {
        FourCc::new(val)
    }
}

impl From<&[u8; 4]> for FourCc {
    fn from(val: &[u8; 4]) -> Self {
        FourCc::new(*val)
    }
}

impl fmt::Display for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &byte in &self.val {
            match byte {
                // Mac OS Roman copyright sign.
                0xa9 => f.write_str("©")?,
                0x20..=0x7e => write!(f, "{}", byte as char)?,
                _ => write!(f, "\\x{:02x}", byte)?,
            }
        }
        Ok(())
    }
}

impl fmt::Debug for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self)
    }
}

#[cfg(test)]
mod tests {
    use super::FourCc;

    #[test]
    fn verify_fourcc_display() {
        assert_eq!(FourCc::new(*b"moov").to_string(), "moov");
        assert_eq!(FourCc::new(*b"\xa9nam").to_string(), "©nam");
        assert_eq!(FourCc::new([0, 1, b'a', b' ']).to_string(), "\\x00\\x01a ");
        assert_eq!(format!("{:?}", FourCc::new(*b"trak")), "'trak'");
    }

    #[test]
    fn verify_copyright_prefix() {
        assert!(FourCc::new(*b"\xa9day").is_copyright_prefixed());
        assert!(!FourCc::new(*b"data").is_copyright_prefixed());
    }
}
