// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Compression Parameters Record: names a compression scheme and carries its
//! codec-specific parameter table (for `gzip`, a single deflate level).

use crate::core::error::Result;
use crate::core::types::CompressionType;
use crate::io::ByteSource;
use crate::record::cursor::{Decoder, Encoder};
use crate::record::{expect_header, header_width, write_header, FormatVersion, RecordType};

#[derive(Debug, Clone)]
pub struct Cpr {
    pub c_type: CompressionType,
    pub c_parms: Vec<u32>,
}

impl Cpr {
    pub fn decode(source: &dyn ByteSource, version: FormatVersion, offset: u64) -> Result<Self> {
        let header = expect_header(source, version, offset, "CPR", |t| {
            matches!(t, RecordType::Cpr)
        })?;
        let raw = source.read_into(offset, header.record_size as usize)?;
        let mut cur = Decoder::new(&raw);
        cur.skip(header_width(version))?;
        let c_type = CompressionType::from_code(cur.read_i32()?)?;
        cur.skip(4)?; // rfuA
        let p_count = cur.read_u32()?;
        let mut c_parms = Vec::with_capacity(p_count as usize);
        for _ in 0..p_count {
            c_parms.push(cur.read_u32()?);
        }
        Ok(Cpr { c_type, c_parms })
    }

    pub fn encoded_size(&self, version: FormatVersion) -> usize {
        header_width(version) + 4 * 2 + 4 + 4 * self.c_parms.len()
    }

    pub fn encode(&self, version: FormatVersion) -> Encoder {
        let mut enc = Encoder::with_capacity(self.encoded_size(version));
        write_header(&mut enc, version, self.encoded_size(version) as u64, RecordType::Cpr);
        enc.write_i32(self.c_type.code());
        enc.write_i32(0); // rfuA
        enc.write_u32(self.c_parms.len() as u32);
        for p in &self.c_parms {
            enc.write_u32(*p);
        }
        enc
    }

    /// A `CPR` for `gzip` at the given deflate level (1-9), matching the
    /// single-parameter convention of the on-disk format.
    pub fn gzip(level: u32) -> Self {
        Cpr {
            c_type: CompressionType::Gzip,
            c_parms: vec![level],
        }
    }

    pub fn rle() -> Self {
        Cpr {
            c_type: CompressionType::Rle,
            c_parms: vec![0],
        }
    }

    pub fn zstd(level: u32) -> Self {
        Cpr {
            c_type: CompressionType::Zstd,
            c_parms: vec![level],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::SliceArena;

    #[test]
    fn roundtrip_gzip() {
        let version = FormatVersion {
            major: 3,
            minor: 8,
            release: 0,
            is_v3: true,
        };
        let cpr = Cpr::gzip(6);
        let bytes = cpr.encode(version).into_bytes();
        assert_eq!(bytes.len(), cpr.encoded_size(version));
        let arena = SliceArena::new(bytes);
        let decoded = Cpr::decode(&arena, version, 0).unwrap();
        assert_eq!(decoded.c_type, CompressionType::Gzip);
        assert_eq!(decoded.c_parms, vec![6]);
    }
}
