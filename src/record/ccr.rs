// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Compressed CDF Record: wraps the entire file body when the whole file
//! (not just individual variables) is stored compressed (§4.3 step 4).

use crate::core::error::Result;
use crate::io::ByteSource;
use crate::record::cursor::{Decoder, Encoder};
use crate::record::{expect_header, header_width, write_header, FormatVersion, RecordType};

#[derive(Debug, Clone)]
pub struct Ccr {
    pub cpr_offset: u64,
    pub u_size: u64,
    pub data: Vec<u8>,
}

impl Ccr {
    pub fn decode(source: &dyn ByteSource, version: FormatVersion, offset: u64) -> Result<Self> {
        let header = expect_header(source, version, offset, "CCR", |t| {
            matches!(t, RecordType::Ccr)
        })?;
        let raw = source.read_into(offset, header.record_size as usize)?;
        let mut cur = Decoder::new(&raw);
        cur.skip(header_width(version))?;
        let cpr_offset = cur.read_offset(version.is_v3)?;
        let u_size = cur.read_offset(version.is_v3)?;
        cur.skip(4)?; // rfuA
        let data = cur.read_bytes(cur.remaining())?;
        Ok(Ccr {
            cpr_offset,
            u_size,
            data,
        })
    }

    pub fn encoded_size(&self, version: FormatVersion) -> usize {
        header_width(version) + version.offset_width() * 2 + 4 + self.data.len()
    }

    pub fn encode(&self, version: FormatVersion) -> Encoder {
        let mut enc = Encoder::with_capacity(self.encoded_size(version));
        write_header(&mut enc, version, self.encoded_size(version) as u64, RecordType::Ccr);
        enc.write_offset(self.cpr_offset, version.is_v3);
        enc.write_offset(self.u_size, version.is_v3);
        enc.write_i32(0); // rfuA
        enc.write_bytes(&self.data);
        enc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::SliceArena;

    #[test]
    fn roundtrip() {
        let version = FormatVersion {
            major: 3,
            minor: 8,
            release: 0,
            is_v3: true,
        };
        let ccr = Ccr {
            cpr_offset: 64,
            u_size: 5,
            data: b"compr".to_vec(),
        };
        let bytes = ccr.encode(version).into_bytes();
        assert_eq!(bytes.len(), ccr.encoded_size(version));
        let arena = SliceArena::new(bytes);
        let decoded = Ccr::decode(&arena, version, 0).unwrap();
        assert_eq!(decoded.u_size, 5);
        assert_eq!(decoded.data, b"compr".to_vec());
    }
}
