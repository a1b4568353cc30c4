// Mov Atom
// Copyright (c) 2026 The Project Mov Atom Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `errors` module defines the common error type.

use std::error;
use std::fmt;
use std::io;
use std::result;

/// `Error` provides an enumeration of all possible errors reported by the atom codec.
#[derive(Debug)]
pub enum Error {
    /// An IO error occured while reading or writing the stream. A decoder reading past the end of
    /// its bounded atom body is also reported this way.
    IoError(std::io::Error),
    /// The stream was recognized as an atom container, but contained malformed data.
    DecodeError(&'static str),
    /// The stream is not an atom container of a supported family at all.
    Unsupported(&'static str),
    /// A default or user-defined limit was reached while reading or writing the tree. Limits are
    /// used to prevent denial-of-service attacks from malicious streams.
    LimitError(&'static str),
    /// An atom wrote a different number of bytes than it reported when measured.
    EncodeError(&'static str),
}

impl Error {
    /// Returns `true` if the input was rejected as not being a container file of this family, as
    /// opposed to a recognized file that is damaged.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Error::Unsupported(_))
    }

    /// Returns `true` if the error was caused by reaching the end of a stream or of a bounded
    /// atom body.
    pub fn is_end_of_stream(&self) -> bool {
        match self {
            Error::IoError(err) => err.kind() == io::ErrorKind::UnexpectedEof,
            _ => false,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::IoError(ref err) => err.fmt(f),
            Error::DecodeError(msg) => {
                write!(f, "malformed stream: {}", msg)
            }
            Error::Unsupported(msg) => {
                write!(f, "unsupported file: {}", msg)
            }
            Error::LimitError(constraint) => {
                write!(f, "limit reached: {}", constraint)
            }
            Error::EncodeError(msg) => {
                write!(f, "encode error: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::IoError(ref err) => Some(err),
            Error::DecodeError(_) => None,
            Error::Unsupported(_) => None,
            Error::LimitError(_) => None,
            Error::EncodeError(_) => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::IoError(err)
    }
}

pub type Result<T> = result::Result<T, Error>;

/// Convenience function to create a decode error.
pub fn decode_error<T>(desc: &'static str) -> Result<T> {
    Err(Error::DecodeError(desc))
}

/// Convenience function to create an unsupported file error.
pub fn unsupported_error<T>(desc: &'static str) -> Result<T> {
    Err(Error::Unsupported(desc))
}

/// Convenience function to create a limit error.
pub fn limit_error<T>(constraint: &'static str) -> Result<T> {
    Err(Error::LimitError(constraint))
}

/// Convenience function to create an encode error.
pub fn encode_error<T>(desc: &'static str) -> Result<T> {
    Err(Error::EncodeError(desc))
}

/// Convenience function to create an end-of-stream error.
pub fn end_of_stream_error<T>() -> Result<T> {
    Err(Error::IoError(io::Error::new(io::ErrorKind::UnexpectedEof, "end of stream")))
}

#[cfg(test)]
mod tests {
    use super::{decode_error, end_of_stream_error, unsupported_error, Error, Result};

    #[test]
    fn verify_error_classification() {
        let err: Result<()> = unsupported_error("bad leading atom");
        assert!(err.unwrap_err().is_unsupported());

        let err: Result<()> = decode_error("bad size");
        let err = err.unwrap_err();
        assert!(!err.is_unsupported());
        assert!(!err.is_end_of_stream());

        let err: Result<()> = end_of_stream_error();
        assert!(err.unwrap_err().is_end_of_stream());
    }

    #[test]
    fn verify_error_display() {
        assert_eq!(Error::DecodeError("oops").to_string(), "malformed stream: oops");
        assert_eq!(Error::Unsupported("nope").to_string(), "unsupported file: nope");
        assert_eq!(Error::LimitError("depth").to_string(), "limit reached: depth");
    }
}
