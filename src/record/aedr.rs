// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Attribute Entry Descriptor Record: one attribute value, either global
//! (`AgrEDR`) or targeting a specific variable (`AzEDR`). Both share this
//! layout; only the record type tag and the `num` field's meaning differ.

use crate::core::error::Result;
use crate::core::types::DataType;
use crate::io::ByteSource;
use crate::record::cursor::{Decoder, Encoder};
use crate::record::{expect_header, header_width, write_header, FormatVersion, RecordType};

/// Which entry-chain kind this record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// `AgrEDR`: a global attribute entry, or an r-variable attribute entry.
    Gr,
    /// `AzEDR`: a z-variable attribute entry.
    Z,
}

impl EntryKind {
    fn record_type(self) -> RecordType {
        match self {
            EntryKind::Gr => RecordType::AgrEdr,
            EntryKind::Z => RecordType::AzEdr,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Aedr {
    pub aedr_next: u64,
    pub attr_num: i32,
    pub data_type: DataType,
    /// For global entries: the entry's ordinal. For variable entries:
    /// the target variable's number.
    pub num: i32,
    pub num_elements: i32,
    pub num_strings: i32,
    pub value: Vec<u8>,
}

impl Aedr {
    pub fn decode(
        source: &dyn ByteSource,
        version: FormatVersion,
        offset: u64,
        kind: EntryKind,
    ) -> Result<Self> {
        let expected = match kind {
            EntryKind::Gr => "AgrEDR",
            EntryKind::Z => "AzEDR",
        };
        let header = expect_header(source, version, offset, expected, |t| t == kind.record_type())?;
        let raw = source.read_into(offset, header.record_size as usize)?;
        let mut cur = Decoder::new(&raw);
        cur.skip(header_width(version))?;
        let aedr_next = cur.read_offset(version.is_v3)?;
        let attr_num = cur.read_i32()?;
        let data_type = DataType::from_code(cur.read_i32()? as i64)?;
        let num = cur.read_i32()?;
        let num_elements = cur.read_i32()?;
        let num_strings = cur.read_i32()?;
        cur.skip(4)?; // rfuB
        cur.skip(4)?; // rfuC
        cur.skip(4)?; // rfuD
        cur.skip(4)?; // rfuE
        let value_len = (num_elements.max(0) as usize) * data_type.size();
        let value = cur.read_bytes(value_len)?;
        Ok(Aedr {
            aedr_next,
            attr_num,
            data_type,
            num,
            num_elements,
            num_strings,
            value,
        })
    }

    pub fn encoded_size(&self, version: FormatVersion) -> usize {
        header_width(version) + version.offset_width() + 4 * 7 + self.value.len()
    }

    pub fn encode(&self, version: FormatVersion, kind: EntryKind) -> Encoder {
        let mut enc = Encoder::with_capacity(self.encoded_size(version));
        write_header(
            &mut enc,
            version,
            self.encoded_size(version) as u64,
            kind.record_type(),
        );
        enc.write_offset(self.aedr_next, version.is_v3);
        enc.write_i32(self.attr_num);
        enc.write_i32(self.data_type.code());
        enc.write_i32(self.num);
        enc.write_i32(self.num_elements);
        enc.write_i32(self.num_strings);
        enc.write_i32(0);
        enc.write_i32(0);
        enc.write_i32(-1);
        enc.write_i32(-1);
        enc.write_bytes(&self.value);
        enc
    }
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

    #[test]
    fn roundtrip_global_numeric_entry() {
        let aedr = Aedr {
            aedr_next: crate::record::cursor::NO_OFFSET,
            attr_num: 0,
            data_type: DataType::Int4,
            num: 0,
            num_elements: 3,
            num_strings: 0,
            value: vec![0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0, 3],
        };
        let version = v3();
        let bytes = aedr.encode(version, EntryKind::Gr).into_bytes();
        assert_eq!(bytes.len(), aedr.encoded_size(version));
        let decoded = Aedr::decode(&SliceArena::new(bytes), version, 0, EntryKind::Gr).unwrap();
        assert_eq!(decoded.data_type, DataType::Int4);
        assert_eq!(decoded.value, vec![0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0, 3]);
    }

    #[test]
    fn roundtrip_variable_char_entry() {
        let aedr = Aedr {
            aedr_next: crate::record::cursor::NO_OFFSET,
            attr_num: 1,
            data_type: DataType::Char,
            num: 4,
            num_elements: 2,
            num_strings: 1,
            value: b"nT".to_vec(),
        };
        let version = v3();
        let bytes = aedr.encode(version, EntryKind::Z).into_bytes();
        let decoded = Aedr::decode(&SliceArena::new(bytes), version, 0, EntryKind::Z).unwrap();
        assert_eq!(decoded.num, 4);
        assert_eq!(decoded.value, b"nT");
    }

    #[test]
    fn decode_rejects_wrong_record_kind() {
        let aedr = Aedr {
            aedr_next: crate::record::cursor::NO_OFFSET,
            attr_num: 0,
            data_type: DataType::Int4,
            num: 0,
            num_elements: 0,
            num_strings: 0,
            value: Vec::new(),
        };
        let version = v3();
        let bytes = aedr.encode(version, EntryKind::Gr).into_bytes();
        assert!(Aedr::decode(&SliceArena::new(bytes), version, 0, EntryKind::Z).is_err());
    }
}
