// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Decoded value representation for attribute entries and variable payloads.
//!
//! All variants flatten synonymous wire codes (`CDF_FLOAT`/`CDF_REAL4`,
//! `CDF_DOUBLE`/`CDF_REAL8`) into one in-memory representation; the original
//! on-disk type code is kept alongside the owning [`crate::record::vdr::Vdr`]
//! or attribute entry so it round-trips on save.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::core::types::DataType;

/// A decoded, contiguous run of CDF values of a single primitive type.
///
/// This is the storage behind both attribute entries (always eager, one
/// `CdfValue` per entry) and variable payloads (one `CdfValue` for the whole
/// variable, holding every record).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CdfValue {
    Int1(Vec<i8>),
    Int2(Vec<i16>),
    Int4(Vec<i32>),
    Int8(Vec<i64>),
    UInt1(Vec<u8>),
    UInt2(Vec<u16>),
    UInt4(Vec<u32>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    Epoch(Vec<f64>),
    Epoch16(Vec<(f64, f64)>),
    Tt2000(Vec<i64>),
    Byte(Vec<i8>),
    /// Character data. Each element is one NUL-padded row of `row_len` bytes.
    Char { bytes: Vec<u8>, row_len: usize },
    UChar { bytes: Vec<u8>, row_len: usize },
}

impl CdfValue {
    /// Number of logical elements (not bytes) held by this value.
    pub fn len(&self) -> usize {
        match self {
            CdfValue::Int1(v) | CdfValue::Byte(v) => v.len(),
            CdfValue::Int2(v) => v.len(),
            CdfValue::Int4(v) => v.len(),
            CdfValue::Int8(v) | CdfValue::Tt2000(v) => v.len(),
            CdfValue::UInt1(v) => v.len(),
            CdfValue::UInt2(v) => v.len(),
            CdfValue::UInt4(v) => v.len(),
            CdfValue::Float32(v) => v.len(),
            CdfValue::Float64(v) | CdfValue::Epoch(v) => v.len(),
            CdfValue::Epoch16(v) => v.len(),
            CdfValue::Char { bytes, row_len } | CdfValue::UChar { bytes, row_len } => {
                if *row_len == 0 {
                    0
                } else {
                    bytes.len() / row_len
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw byte count of this value's storage (what a `VVR` would hold).
    pub fn byte_len(&self) -> usize {
        match self {
            CdfValue::Int1(v) | CdfValue::Byte(v) => v.len(),
            CdfValue::Int2(v) => v.len() * 2,
            CdfValue::Int4(v) => v.len() * 4,
            CdfValue::Int8(v) | CdfValue::Tt2000(v) => v.len() * 8,
            CdfValue::UInt1(v) => v.len(),
            CdfValue::UInt2(v) => v.len() * 2,
            CdfValue::UInt4(v) => v.len() * 4,
            CdfValue::Float32(v) => v.len() * 4,
            CdfValue::Float64(v) | CdfValue::Epoch(v) => v.len() * 8,
            CdfValue::Epoch16(v) => v.len() * 16,
            CdfValue::Char { bytes, .. } | CdfValue::UChar { bytes, .. } => bytes.len(),
        }
    }

    /// The string rows of a character value, trimmed at the first NUL in each row.
    ///
    /// Returns `None` for non-character values.
    pub fn as_strings(&self) -> Option<Vec<&[u8]>> {
        let (bytes, row_len) = match self {
            CdfValue::Char { bytes, row_len } | CdfValue::UChar { bytes, row_len } => {
                (bytes, *row_len)
            }
            _ => return None,
        };
        if row_len == 0 {
            return Some(Vec::new());
        }
        Some(
            bytes
                .chunks(row_len)
                .map(|row| {
                    let end = row.iter().position(|&b| b == 0).unwrap_or(row.len());
                    &row[..end]
                })
                .collect(),
        )
    }

    /// The on-disk [`DataType`] this value would be written back out as.
    ///
    /// `Real4`/`Float` and `Real8`/`Double` share one in-memory storage kind
    /// (§3.1); a value constructed in memory rather than loaded from disk
    /// always writes back as the `Real4`/`Real8` code.
    pub fn data_type(&self) -> DataType {
        match self {
            CdfValue::Int1(_) => DataType::Int1,
            CdfValue::Int2(_) => DataType::Int2,
            CdfValue::Int4(_) => DataType::Int4,
            CdfValue::Int8(_) => DataType::Int8,
            CdfValue::UInt1(_) => DataType::UInt1,
            CdfValue::UInt2(_) => DataType::UInt2,
            CdfValue::UInt4(_) => DataType::UInt4,
            CdfValue::Float32(_) => DataType::Real4,
            CdfValue::Float64(_) => DataType::Real8,
            CdfValue::Epoch(_) => DataType::Epoch,
            CdfValue::Epoch16(_) => DataType::Epoch16,
            CdfValue::Tt2000(_) => DataType::Tt2000,
            CdfValue::Byte(_) => DataType::Byte,
            CdfValue::Char { .. } => DataType::Char,
            CdfValue::UChar { .. } => DataType::UChar,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_len_and_byte_len() {
        let value = CdfValue::Int4(vec![1, 2, 3]);
        assert_eq!(value.len(), 3);
        assert_eq!(value.byte_len(), 12);
        assert!(!value.is_empty());
        assert_eq!(value.data_type(), DataType::Int4);
    }

    #[test]
    fn epoch16_counts_pairs_not_halves() {
        let value = CdfValue::Epoch16(vec![(1.0, 2.0), (3.0, 4.0)]);
        assert_eq!(value.len(), 2);
        assert_eq!(value.byte_len(), 32);
    }

    #[test]
    fn char_len_divides_by_row_len() {
        let value = CdfValue::Char {
            bytes: b"abcdefghij".to_vec(),
            row_len: 5,
        };
        assert_eq!(value.len(), 2);
        assert_eq!(value.byte_len(), 10);
    }

    #[test]
    fn as_strings_trims_at_first_nul() {
        let mut bytes = b"hi\0\0\0".to_vec();
        bytes.extend_from_slice(b"there");
        let value = CdfValue::Char { bytes, row_len: 5 };
        let rows = value.as_strings().unwrap();
        assert_eq!(rows, vec![b"hi".as_slice(), b"there".as_slice()]);
    }

    #[test]
    fn as_strings_is_none_for_numeric_values() {
        assert!(CdfValue::Int4(vec![1]).as_strings().is_none());
    }

    #[test]
    fn empty_char_row_len_is_empty_not_divide_by_zero() {
        let value = CdfValue::Char {
            bytes: Vec::new(),
            row_len: 0,
        };
        assert_eq!(value.len(), 0);
        assert!(value.is_empty());
        assert_eq!(value.as_strings().unwrap(), Vec::<&[u8]>::new());
    }
}
