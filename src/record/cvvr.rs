// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Compressed Variable Values Record: a `VVR` equivalent whose payload is
//! compressed with the owning variable's `CPR.cType`.

use crate::core::error::Result;
use crate::io::ByteSource;
use crate::record::cursor::{Decoder, Encoder};
use crate::record::{expect_header, header_width, write_header, FormatVersion, RecordType};

#[derive(Debug, Clone)]
pub struct Cvvr {
    pub c_size: u64,
    pub data: Vec<u8>,
}

impl Cvvr {
    pub fn decode(source: &dyn ByteSource, version: FormatVersion, offset: u64) -> Result<Self> {
        let header = expect_header(source, version, offset, "CVVR", |t| {
            matches!(t, RecordType::Cvvr)
        })?;
        let raw = source.read_into(offset, header.record_size as usize)?;
        let mut cur = Decoder::new(&raw);
        cur.skip(header_width(version))?;
        cur.skip(4)?; // rfuA
        let c_size = cur.read_offset(version.is_v3)?;
        let data = cur.read_bytes(c_size as usize)?;
        Ok(Cvvr { c_size, data })
    }

    pub fn encoded_size(&self, version: FormatVersion) -> usize {
        header_width(version) + 4 + version.offset_width() + self.data.len()
    }

    pub fn encode(&self, version: FormatVersion) -> Encoder {
        let mut enc = Encoder::with_capacity(self.encoded_size(version));
        write_header(&mut enc, version, self.encoded_size(version) as u64, RecordType::Cvvr);
        enc.write_i32(0); // rfuA
        enc.write_offset(self.c_size, version.is_v3);
        enc.write_bytes(&self.data);
        enc
    }
}
