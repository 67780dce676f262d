// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! The on-disk record catalogue: field layouts, version-parameterised widths,
//! and the cursor used to decode/encode every record kind.
//!
//! Every record begins with a header (`record_size` then `record_type`) whose
//! field widths depend on the file's format version; everything past the
//! header is record-specific fixed fields optionally followed by a
//! variable-length table whose length is derived from an earlier field in the
//! same record (§4.2 of the design doc).

pub mod adr;
pub mod aedr;
pub mod ccr;
pub mod cdr;
pub mod cpr;
pub mod cursor;
pub mod cvvr;
pub mod gdr;
pub mod vdr;
pub mod vvr;
pub mod vxr;

pub use cursor::{Decoder, Encoder};

use crate::core::error::{CdfError, Result};
use crate::io::ByteSource;

/// Which of the two wire layouts a file uses.
///
/// The only structural differences this introduces are offset/record-size
/// width (32-bit vs 64-bit) and two string field lengths (`Name`,
/// `Copyright`) that grew in v2.5 to match v3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatVersion {
    pub major: i32,
    pub minor: i32,
    pub release: i32,
    pub is_v3: bool,
}

impl FormatVersion {
    /// Width in bytes of an offset field and of a record's `record_size` field.
    pub fn offset_width(self) -> usize {
        if self.is_v3 {
            8
        } else {
            4
        }
    }

    /// Maximum length of an `ADR.Name`/`VDR.Name` string field.
    pub fn name_len(self) -> usize {
        if self.is_v3 {
            256
        } else {
            64
        }
    }

    /// Maximum length of `CDR.Copyright`.
    pub fn copyright_len(self) -> usize {
        if self.is_v3 || self.release >= 5 {
            256
        } else {
            1945
        }
    }

    /// Whether `VDR` carries the v2.4-and-earlier 132-byte `rfuF` padding
    /// table in place of a single reserved `i32`.
    pub fn has_vdr_padding_table(self) -> bool {
        !self.is_v3 && self.release < 5
    }
}

/// Record type tag, as stored in every record header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordType {
    Cdr,
    Gdr,
    RVdr,
    Adr,
    AgrEdr,
    Vxr,
    Vvr,
    ZVdr,
    AzEdr,
    Ccr,
    Cpr,
    Spr,
    Cvvr,
    Uir,
}

impl RecordType {
    pub fn from_code(code: i32) -> Result<Self> {
        Ok(match code {
            1 => RecordType::Cdr,
            2 => RecordType::Gdr,
            3 => RecordType::RVdr,
            4 => RecordType::Adr,
            5 => RecordType::AgrEdr,
            6 => RecordType::Vxr,
            7 => RecordType::Vvr,
            8 => RecordType::ZVdr,
            9 => RecordType::AzEdr,
            10 => RecordType::Ccr,
            11 => RecordType::Cpr,
            12 => RecordType::Spr,
            13 => RecordType::Cvvr,
            -1 => RecordType::Uir,
            other => return Err(CdfError::invalid_enum("record_type", other as i64)),
        })
    }

    pub fn code(self) -> i32 {
        match self {
            RecordType::Cdr => 1,
            RecordType::Gdr => 2,
            RecordType::RVdr => 3,
            RecordType::Adr => 4,
            RecordType::AgrEdr => 5,
            RecordType::Vxr => 6,
            RecordType::Vvr => 7,
            RecordType::ZVdr => 8,
            RecordType::AzEdr => 9,
            RecordType::Ccr => 10,
            RecordType::Cpr => 11,
            RecordType::Spr => 12,
            RecordType::Cvvr => 13,
            RecordType::Uir => -1,
        }
    }
}

/// A decoded record header: the number of bytes the record occupies
/// (including this header) and its type tag.
#[derive(Debug, Clone, Copy)]
pub struct RecordHeader {
    pub record_size: u64,
    pub record_type: RecordType,
}

/// Width in bytes of the header itself for a given format version.
pub fn header_width(version: FormatVersion) -> usize {
    version.offset_width() + 4
}

/// Peek a record's header at `offset` without committing to decoding the
/// rest of it. Used to disambiguate `VXR.Offset[i]` targets (§4.3 open
/// question 2 of the design doc) and to validate expected record positions.
pub fn peek_header(
    source: &dyn ByteSource,
    version: FormatVersion,
    offset: u64,
) -> Result<RecordHeader> {
    let width = header_width(version);
    let raw = source.read_into(offset, width)?;
    let mut cur = cursor::Decoder::new(&raw);
    let record_size = if version.is_v3 {
        cur.read_u64()?
    } else {
        cur.read_u32()? as u64
    };
    let record_type = RecordType::from_code(cur.read_i32()?)?;
    Ok(RecordHeader {
        record_size,
        record_type,
    })
}

/// Write a record header (`record_size` then `record_type`), sizing the
/// `record_size` field according to the format version.
pub fn write_header(enc: &mut cursor::Encoder, version: FormatVersion, size: u64, rtype: RecordType) {
    if version.is_v3 {
        enc.write_u64(size);
    } else {
        enc.write_u32(size as u32);
    }
    enc.write_i32(rtype.code());
}

/// Read and validate a record header, returning its byte size, or a
/// [`CdfError::BadRecord`] naming `expected` if the type tag doesn't match.
pub fn expect_header(
    source: &dyn ByteSource,
    version: FormatVersion,
    offset: u64,
    expected: &'static str,
    matches: impl Fn(RecordType) -> bool,
) -> Result<RecordHeader> {
    let header = peek_header(source, version, offset)?;
    if !matches(header.record_type) {
        return Err(CdfError::bad_record(expected, offset));
    }
    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::SliceArena;

    fn v3() -> FormatVersion {
        FormatVersion {
            major: 3,
            minor: 8,
            release: 0,
            is_v3: true,
        }
    }

    fn v2() -> FormatVersion {
        FormatVersion {
            major: 2,
            minor: 7,
            release: 0,
            is_v3: false,
        }
    }

    #[test]
    fn v3_widths_are_64_bit() {
        assert_eq!(v3().offset_width(), 8);
        assert_eq!(v3().name_len(), 256);
        assert_eq!(header_width(v3()), 12);
        assert!(!v3().has_vdr_padding_table());
    }

    #[test]
    fn v2_widths_are_32_bit() {
        assert_eq!(v2().offset_width(), 4);
        assert_eq!(v2().name_len(), 64);
        assert_eq!(header_width(v2()), 8);
    }

    #[test]
    fn v2_4_carries_vdr_padding_table_v2_5_does_not() {
        let v2_4 = FormatVersion {
            release: 4,
            ..v2()
        };
        let v2_5 = FormatVersion {
            release: 5,
            ..v2()
        };
        assert!(v2_4.has_vdr_padding_table());
        assert!(!v2_5.has_vdr_padding_table());
        assert_eq!(v2_4.copyright_len(), 1945);
        assert_eq!(v2_5.copyright_len(), 256);
    }

    #[test]
    fn record_type_codes_round_trip() {
        let all = [
            RecordType::Cdr,
            RecordType::Gdr,
            RecordType::RVdr,
            RecordType::Adr,
            RecordType::AgrEdr,
            RecordType::Vxr,
            RecordType::Vvr,
            RecordType::ZVdr,
            RecordType::AzEdr,
            RecordType::Ccr,
            RecordType::Cpr,
            RecordType::Spr,
            RecordType::Cvvr,
            RecordType::Uir,
        ];
        for rt in all {
            assert_eq!(RecordType::from_code(rt.code()).unwrap(), rt);
        }
    }

    #[test]
    fn expect_header_rejects_mismatched_type() {
        let version = v3();
        let mut enc = cursor::Encoder::with_capacity(header_width(version));
        write_header(&mut enc, version, header_width(version) as u64, RecordType::Cdr);
        let arena = SliceArena::new(enc.into_bytes());
        let err = expect_header(&arena, version, 0, "GDR", |t| matches!(t, RecordType::Gdr))
            .unwrap_err();
        assert!(matches!(err, CdfError::BadRecord { expected: "GDR", .. }));
    }

    #[test]
    fn peek_header_reads_back_written_fields() {
        let version = v3();
        let mut enc = cursor::Encoder::with_capacity(header_width(version));
        write_header(&mut enc, version, 128, RecordType::Vxr);
        let arena = SliceArena::new(enc.into_bytes());
        let header = peek_header(&arena, version, 0).unwrap();
        assert_eq!(header.record_size, 128);
        assert_eq!(header.record_type, RecordType::Vxr);
    }
}
