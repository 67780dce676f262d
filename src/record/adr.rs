// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Attribute Descriptor Record: one per attribute name, owning either a
//! global-entry (`AgrEDR`) chain or a variable-entry (`AzEDR`) chain.

use crate::core::error::Result;
use crate::core::types::AttrScope;
use crate::io::ByteSource;
use crate::record::cursor::{Decoder, Encoder};
use crate::record::{expect_header, header_width, write_header, FormatVersion, RecordType};

#[derive(Debug, Clone)]
pub struct Adr {
    pub adr_next: u64,
    pub agredr_head: u64,
    pub scope: AttrScope,
    pub num: i32,
    pub ngr_entries: i32,
    pub max_gr_entry: i32,
    pub azedr_head: u64,
    pub nz_entries: i32,
    pub max_z_entry: i32,
    pub name: String,
}

impl Adr {
    pub fn decode(source: &dyn ByteSource, version: FormatVersion, offset: u64) -> Result<Self> {
        let header = expect_header(source, version, offset, "ADR", |t| {
            matches!(t, RecordType::Adr)
        })?;
        let raw = source.read_into(offset, header.record_size as usize)?;
        let mut cur = Decoder::new(&raw);
        cur.skip(header_width(version))?;
        let adr_next = cur.read_offset(version.is_v3)?;
        let agredr_head = cur.read_offset(version.is_v3)?;
        let scope = AttrScope::from_code(cur.read_i32()?)?;
        let num = cur.read_i32()?;
        let ngr_entries = cur.read_i32()?;
        let max_gr_entry = cur.read_i32()?;
        cur.skip(4)?; // rfuA
        let azedr_head = cur.read_offset(version.is_v3)?;
        let nz_entries = cur.read_i32()?;
        let max_z_entry = cur.read_i32()?;
        cur.skip(4)?; // rfuE
        let name = cur.read_fixed_string(version.name_len())?;
        Ok(Adr {
            adr_next,
            agredr_head,
            scope,
            num,
            ngr_entries,
            max_gr_entry,
            azedr_head,
            nz_entries,
            max_z_entry,
            name,
        })
    }

    pub fn encoded_size(&self, version: FormatVersion) -> usize {
        header_width(version) + version.offset_width() * 3 + 4 * 6 + version.name_len()
    }

    pub fn encode(&self, version: FormatVersion) -> Encoder {
        let mut enc = Encoder::with_capacity(self.encoded_size(version));
        write_header(&mut enc, version, self.encoded_size(version) as u64, RecordType::Adr);
        enc.write_offset(self.adr_next, version.is_v3);
        enc.write_offset(self.agredr_head, version.is_v3);
        enc.write_i32(self.scope.code());
        enc.write_i32(self.num);
        enc.write_i32(self.ngr_entries);
        enc.write_i32(self.max_gr_entry);
        enc.write_i32(0);
        enc.write_offset(self.azedr_head, version.is_v3);
        enc.write_i32(self.nz_entries);
        enc.write_i32(self.max_z_entry);
        enc.write_i32(-1);
        enc.write_fixed_string(&self.name, version.name_len());
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
    fn roundtrip_global_attribute() {
        let adr = Adr {
            adr_next: 0xABCD,
            agredr_head: 128,
            scope: AttrScope::Global,
            num: 0,
            ngr_entries: 1,
            max_gr_entry: 0,
            azedr_head: crate::record::cursor::NO_OFFSET,
            nz_entries: 0,
            max_z_entry: -1,
            name: "TITLE".into(),
        };
        let version = v3();
        let bytes = adr.encode(version).into_bytes();
        assert_eq!(bytes.len(), adr.encoded_size(version));
        let arena = SliceArena::new(bytes);
        let decoded = Adr::decode(&arena, version, 0).unwrap();
        assert_eq!(decoded.name, "TITLE");
        assert_eq!(decoded.scope, AttrScope::Global);
        assert_eq!(decoded.agredr_head, 128);
        assert_eq!(decoded.azedr_head, crate::record::cursor::NO_OFFSET);
    }

    #[test]
    fn roundtrip_variable_attribute() {
        let adr = Adr {
            adr_next: crate::record::cursor::NO_OFFSET,
            agredr_head: crate::record::cursor::NO_OFFSET,
            scope: AttrScope::Variable,
            num: 3,
            ngr_entries: 0,
            max_gr_entry: -1,
            azedr_head: 256,
            nz_entries: 2,
            max_z_entry: 1,
            name: "UNITS".into(),
        };
        let version = v3();
        let bytes = adr.encode(version).into_bytes();
        let decoded = Adr::decode(&SliceArena::new(bytes), version, 0).unwrap();
        assert_eq!(decoded.scope, AttrScope::Variable);
        assert_eq!(decoded.azedr_head, 256);
        assert_eq!(decoded.nz_entries, 2);
    }
}
