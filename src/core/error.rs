// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for cdf-codec.
//!
//! Provides error types for the record graph, value assembly, compression,
//! and writer stages:
//! - Header and version detection
//! - Record decoding
//! - Byte-source bounds
//! - Compression
//! - High-level container lookups

use std::fmt;

/// Errors that can occur while reading or writing a CDF file.
#[derive(Debug, Clone)]
pub enum CdfError {
    /// The byte stream does not start with a recognised CDF magic number.
    NotACdf,

    /// The magic number indicates a format version this library does not support.
    UnsupportedVersion {
        /// Raw first magic word.
        magic: u32,
    },

    /// A variable or the file body uses a compression scheme with no decoder.
    UnsupportedCompression {
        /// Raw `cType` value from the `CPR`.
        c_type: i32,
    },

    /// A record's header type tag did not match what was expected at this position.
    BadRecord {
        /// Record type tags that would have been acceptable here.
        expected: &'static str,
        /// Byte offset of the record header.
        at: u64,
    },

    /// A read would fall outside the bounds of the byte source.
    ReadOutOfRange {
        /// Offset of the read.
        offset: u64,
        /// Requested length.
        len: u64,
    },

    /// A read request could not be fully satisfied by the source.
    ShortRead {
        /// Bytes requested.
        requested: usize,
        /// Bytes actually available.
        available: usize,
    },

    /// A compression codec rejected its input or produced an unexpected length.
    BadCompressedData {
        /// What went wrong, in human terms.
        reason: String,
    },

    /// An assembled variable buffer does not match its declared shape.
    ShapeMismatch {
        /// Expected byte count.
        expected: usize,
        /// Actual byte count assembled.
        actual: usize,
    },

    /// An enum-valued field held a code outside its valid set.
    InvalidEnum {
        /// Name of the field.
        field: &'static str,
        /// The offending value.
        value: i64,
    },

    /// `add_attribute`/`add_variable` was called with a name already present.
    Duplicate {
        /// The colliding name.
        name: String,
    },

    /// A name was looked up that does not exist in the container.
    KeyNotFound {
        /// The missing name.
        name: String,
    },

    /// An underlying I/O operation failed.
    Io {
        /// Message describing the failure.
        message: String,
    },
}

impl CdfError {
    /// Create a [`CdfError::BadRecord`].
    pub fn bad_record(expected: &'static str, at: u64) -> Self {
        CdfError::BadRecord { expected, at }
    }

    /// Create a [`CdfError::ReadOutOfRange`].
    pub fn read_out_of_range(offset: u64, len: u64) -> Self {
        CdfError::ReadOutOfRange { offset, len }
    }

    /// Create a [`CdfError::ShortRead`].
    pub fn short_read(requested: usize, available: usize) -> Self {
        CdfError::ShortRead {
            requested,
            available,
        }
    }

    /// Create a [`CdfError::BadCompressedData`].
    pub fn bad_compressed_data(reason: impl Into<String>) -> Self {
        CdfError::BadCompressedData {
            reason: reason.into(),
        }
    }

    /// Create a [`CdfError::ShapeMismatch`].
    pub fn shape_mismatch(expected: usize, actual: usize) -> Self {
        CdfError::ShapeMismatch { expected, actual }
    }

    /// Create a [`CdfError::InvalidEnum`].
    pub fn invalid_enum(field: &'static str, value: i64) -> Self {
        CdfError::InvalidEnum { field, value }
    }

    /// Create a [`CdfError::Duplicate`].
    pub fn duplicate(name: impl Into<String>) -> Self {
        CdfError::Duplicate { name: name.into() }
    }

    /// Create a [`CdfError::KeyNotFound`].
    pub fn key_not_found(name: impl Into<String>) -> Self {
        CdfError::KeyNotFound { name: name.into() }
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            CdfError::NotACdf => vec![],
            CdfError::UnsupportedVersion { magic } => vec![("magic", format!("{magic:#010x}"))],
            CdfError::UnsupportedCompression { c_type } => {
                vec![("c_type", c_type.to_string())]
            }
            CdfError::BadRecord { expected, at } => {
                vec![("expected", expected.to_string()), ("at", at.to_string())]
            }
            CdfError::ReadOutOfRange { offset, len } => {
                vec![("offset", offset.to_string()), ("len", len.to_string())]
            }
            CdfError::ShortRead {
                requested,
                available,
            } => vec![
                ("requested", requested.to_string()),
                ("available", available.to_string()),
            ],
            CdfError::BadCompressedData { reason } => vec![("reason", reason.clone())],
            CdfError::ShapeMismatch { expected, actual } => vec![
                ("expected", expected.to_string()),
                ("actual", actual.to_string()),
            ],
            CdfError::InvalidEnum { field, value } => {
                vec![("field", field.to_string()), ("value", value.to_string())]
            }
            CdfError::Duplicate { name } => vec![("name", name.clone())],
            CdfError::KeyNotFound { name } => vec![("name", name.clone())],
            CdfError::Io { message } => vec![("message", message.clone())],
        }
    }
}

impl fmt::Display for CdfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CdfError::NotACdf => write!(f, "input does not begin with a CDF magic number"),
            CdfError::UnsupportedVersion { magic } => {
                write!(f, "unsupported CDF version (magic {magic:#010x})")
            }
            CdfError::UnsupportedCompression { c_type } => {
                write!(f, "unsupported compression type {c_type}")
            }
            CdfError::BadRecord { expected, at } => {
                write!(f, "expected {expected} record at offset {at}")
            }
            CdfError::ReadOutOfRange { offset, len } => {
                write!(f, "read of {len} bytes at offset {offset} is out of range")
            }
            CdfError::ShortRead {
                requested,
                available,
            } => write!(
                f,
                "short read: requested {requested} bytes, {available} available"
            ),
            CdfError::BadCompressedData { reason } => {
                write!(f, "bad compressed data: {reason}")
            }
            CdfError::ShapeMismatch { expected, actual } => write!(
                f,
                "assembled buffer is {actual} bytes, expected {expected}"
            ),
            CdfError::InvalidEnum { field, value } => {
                write!(f, "invalid value {value} for field '{field}'")
            }
            CdfError::Duplicate { name } => write!(f, "'{name}' already exists"),
            CdfError::KeyNotFound { name } => write!(f, "'{name}' not found"),
            CdfError::Io { message } => write!(f, "I/O error: {message}"),
        }
    }
}

impl std::error::Error for CdfError {}

impl From<std::io::Error> for CdfError {
    fn from(err: std::io::Error) -> Self {
        CdfError::Io {
            message: err.to_string(),
        }
    }
}

/// Result type for cdf-codec operations.
pub type Result<T> = std::result::Result<T, CdfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_name_the_offending_value() {
        assert!(CdfError::NotACdf.to_string().contains("magic"));
        assert!(CdfError::bad_record("VDR", 128)
            .to_string()
            .contains("VDR"));
        assert!(CdfError::shape_mismatch(12, 8)
            .to_string()
            .contains("12"));
        assert!(CdfError::duplicate("X").to_string().contains("X"));
    }

    #[test]
    fn log_fields_expose_structured_data() {
        let err = CdfError::read_out_of_range(64, 16);
        let fields = err.log_fields();
        assert!(fields.contains(&("offset", "64".to_string())));
        assert!(fields.contains(&("len", "16".to_string())));
    }

    #[test]
    fn io_error_conversion_preserves_message() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let cdf_err: CdfError = io_err.into();
        match cdf_err {
            CdfError::Io { message } => assert!(message.contains("no such file")),
            other => panic!("unexpected conversion {other:?}"),
        }
    }

    #[test]
    fn implements_std_error() {
        fn assert_std_error<E: std::error::Error>(_: &E) {}
        assert_std_error(&CdfError::NotACdf);
    }
}
