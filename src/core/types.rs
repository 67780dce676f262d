// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CDF primitive type codes and their on-disk widths.

use crate::core::error::{CdfError, Result};

/// A CDF primitive data type, as stored in the `DataType` field of a `VDR` or `AEDR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Int1,
    Int2,
    Int4,
    Int8,
    UInt1,
    UInt2,
    UInt4,
    Real4,
    Real8,
    Epoch,
    Epoch16,
    Tt2000,
    Byte,
    Float,
    Double,
    Char,
    UChar,
}

impl DataType {
    /// Decode a raw `DataType` code as it appears on disk.
    pub fn from_code(code: i64) -> Result<Self> {
        Ok(match code {
            1 => DataType::Int1,
            2 => DataType::Int2,
            4 => DataType::Int4,
            8 => DataType::Int8,
            11 => DataType::UInt1,
            12 => DataType::UInt2,
            14 => DataType::UInt4,
            21 => DataType::Real4,
            22 => DataType::Real8,
            31 => DataType::Epoch,
            32 => DataType::Epoch16,
            33 => DataType::Tt2000,
            41 => DataType::Byte,
            44 => DataType::Float,
            45 => DataType::Double,
            51 => DataType::Char,
            52 => DataType::UChar,
            other => return Err(CdfError::invalid_enum("DataType", other)),
        })
    }

    /// The on-disk numeric code for this type.
    pub fn code(self) -> i32 {
        match self {
            DataType::Int1 => 1,
            DataType::Int2 => 2,
            DataType::Int4 => 4,
            DataType::Int8 => 8,
            DataType::UInt1 => 11,
            DataType::UInt2 => 12,
            DataType::UInt4 => 14,
            DataType::Real4 => 21,
            DataType::Real8 => 22,
            DataType::Epoch => 31,
            DataType::Epoch16 => 32,
            DataType::Tt2000 => 33,
            DataType::Byte => 41,
            DataType::Float => 44,
            DataType::Double => 45,
            DataType::Char => 51,
            DataType::UChar => 52,
        }
    }

    /// Width in bytes of a single element of this type.
    pub fn size(self) -> usize {
        match self {
            DataType::Int1 | DataType::UInt1 | DataType::Byte | DataType::Char | DataType::UChar => 1,
            DataType::Int2 | DataType::UInt2 => 2,
            DataType::Int4 | DataType::UInt4 | DataType::Real4 | DataType::Float => 4,
            DataType::Int8
            | DataType::Real8
            | DataType::Double
            | DataType::Epoch
            | DataType::Tt2000 => 8,
            DataType::Epoch16 => 16,
        }
    }

    /// Whether this type is a character/string storage kind.
    pub fn is_string(self) -> bool {
        matches!(self, DataType::Char | DataType::UChar)
    }

    /// Whether byte order matters for this type (multi-byte, non-character).
    pub fn needs_endian_swap(self) -> bool {
        self.size() > 1 && !self.is_string()
    }
}

/// Variable/attribute scope, as stored in `ADR.Scope`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrScope {
    Global,
    Variable,
    GlobalAssumed,
    VariableAssumed,
}

impl AttrScope {
    pub fn from_code(code: i32) -> Result<Self> {
        Ok(match code {
            1 => AttrScope::Global,
            2 => AttrScope::Variable,
            3 => AttrScope::GlobalAssumed,
            4 => AttrScope::VariableAssumed,
            other => return Err(CdfError::invalid_enum("Scope", other as i64)),
        })
    }

    pub fn code(self) -> i32 {
        match self {
            AttrScope::Global => 1,
            AttrScope::Variable => 2,
            AttrScope::GlobalAssumed => 3,
            AttrScope::VariableAssumed => 4,
        }
    }

    pub fn is_global(self) -> bool {
        matches!(self, AttrScope::Global | AttrScope::GlobalAssumed)
    }
}

/// Row- vs column-major record layout, as stored in `CDR.Flags` bit 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Majority {
    Column,
    Row,
}

impl Majority {
    pub fn from_flag(row_major: bool) -> Self {
        if row_major {
            Majority::Row
        } else {
            Majority::Column
        }
    }

    pub fn is_row(self) -> bool {
        matches!(self, Majority::Row)
    }
}

/// Per-variable or whole-body compression scheme, as stored in `CPR.cType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionType {
    None,
    Rle,
    Gzip,
    Zstd,
}

impl CompressionType {
    pub fn from_code(code: i32) -> Result<Self> {
        Ok(match code {
            0 => CompressionType::None,
            1 => CompressionType::Rle,
            5 => CompressionType::Gzip,
            16 => CompressionType::Zstd,
            2 | 3 => return Err(CdfError::UnsupportedCompression { c_type: code }),
            other => return Err(CdfError::invalid_enum("cType", other as i64)),
        })
    }

    pub fn code(self) -> i32 {
        match self {
            CompressionType::None => 0,
            CompressionType::Rle => 1,
            CompressionType::Gzip => 5,
            CompressionType::Zstd => 16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_type_codes_round_trip() {
        let all = [
            DataType::Int1,
            DataType::Int2,
            DataType::Int4,
            DataType::Int8,
            DataType::UInt1,
            DataType::UInt2,
            DataType::UInt4,
            DataType::Real4,
            DataType::Real8,
            DataType::Epoch,
            DataType::Epoch16,
            DataType::Tt2000,
            DataType::Byte,
            DataType::Float,
            DataType::Double,
            DataType::Char,
            DataType::UChar,
        ];
        for dt in all {
            assert_eq!(DataType::from_code(dt.code() as i64).unwrap(), dt);
        }
    }

    #[test]
    fn unknown_data_type_code_is_invalid_enum() {
        assert!(matches!(
            DataType::from_code(999),
            Err(CdfError::InvalidEnum { .. })
        ));
    }

    #[test]
    fn sizes_match_spec_widths() {
        assert_eq!(DataType::Int1.size(), 1);
        assert_eq!(DataType::Int4.size(), 4);
        assert_eq!(DataType::Epoch16.size(), 16);
        assert_eq!(DataType::Char.size(), 1);
        assert!(!DataType::Char.needs_endian_swap());
        assert!(DataType::Int4.needs_endian_swap());
        assert!(!DataType::Int1.needs_endian_swap());
    }

    #[test]
    fn attr_scope_is_global() {
        assert!(AttrScope::Global.is_global());
        assert!(AttrScope::GlobalAssumed.is_global());
        assert!(!AttrScope::Variable.is_global());
        assert!(!AttrScope::VariableAssumed.is_global());
    }

    #[test]
    fn attr_scope_codes_round_trip() {
        for scope in [
            AttrScope::Global,
            AttrScope::Variable,
            AttrScope::GlobalAssumed,
            AttrScope::VariableAssumed,
        ] {
            assert_eq!(AttrScope::from_code(scope.code()).unwrap(), scope);
        }
    }

    #[test]
    fn majority_from_flag() {
        assert_eq!(Majority::from_flag(true), Majority::Row);
        assert_eq!(Majority::from_flag(false), Majority::Column);
        assert!(Majority::Row.is_row());
        assert!(!Majority::Column.is_row());
    }

    #[test]
    fn compression_type_codes_round_trip() {
        for kind in [
            CompressionType::None,
            CompressionType::Rle,
            CompressionType::Gzip,
            CompressionType::Zstd,
        ] {
            assert_eq!(CompressionType::from_code(kind.code()).unwrap(), kind);
        }
    }

    #[test]
    fn huffman_codes_are_unsupported_not_invalid() {
        assert!(matches!(
            CompressionType::from_code(2),
            Err(CdfError::UnsupportedCompression { c_type: 2 })
        ));
        assert!(matches!(
            CompressionType::from_code(3),
            Err(CdfError::UnsupportedCompression { c_type: 3 })
        ));
    }
}
