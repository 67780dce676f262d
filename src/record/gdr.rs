// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Global Descriptor Record: anchors the r-variable, z-variable, and
//! attribute chains, and declares the r-variables' shared dimensionality.

use crate::core::error::Result;
use crate::io::ByteSource;
use crate::record::cursor::{Decoder, Encoder, NO_OFFSET};
use crate::record::{expect_header, header_width, write_header, FormatVersion, RecordType};

#[derive(Debug, Clone)]
pub struct Gdr {
    pub rvdr_head: u64,
    pub zvdr_head: u64,
    pub adr_head: u64,
    pub eof: u64,
    pub n_rvars: i32,
    pub num_attr: i32,
    pub r_max_rec: i32,
    pub uir_head: u64,
    pub r_num_dims: i32,
    pub n_zvars: i32,
    pub leap_second_last_updated: u32,
    pub r_dim_sizes: Vec<i32>,
}

impl Gdr {
    pub fn decode(source: &dyn ByteSource, version: FormatVersion, offset: u64) -> Result<Self> {
        let header = expect_header(source, version, offset, "GDR", |t| {
            matches!(t, RecordType::Gdr)
        })?;
        let raw = source.read_into(offset, header.record_size as usize)?;
        let mut cur = Decoder::new(&raw);
        cur.skip(header_width(version))?;
        let rvdr_head = cur.read_offset(version.is_v3)?;
        let zvdr_head = cur.read_offset(version.is_v3)?;
        let adr_head = cur.read_offset(version.is_v3)?;
        let eof = cur.read_offset(version.is_v3)?;
        let n_rvars = cur.read_i32()?;
        let num_attr = cur.read_i32()?;
        let r_max_rec = cur.read_i32()?;
        let r_num_dims = cur.read_i32()?;
        let n_zvars = cur.read_i32()?;
        let uir_head = cur.read_offset(version.is_v3)?;
        cur.skip(4)?; // rfuC
        let leap_second_last_updated = cur.read_u32()?;
        cur.skip(4)?; // rfuE
        let mut r_dim_sizes = Vec::with_capacity(r_num_dims.max(0) as usize);
        for _ in 0..r_num_dims.max(0) {
            r_dim_sizes.push(cur.read_i32()?);
        }
        Ok(Gdr {
            rvdr_head,
            zvdr_head,
            adr_head,
            eof,
            n_rvars,
            num_attr,
            r_max_rec,
            uir_head,
            r_num_dims,
            n_zvars,
            leap_second_last_updated,
            r_dim_sizes,
        })
    }

    pub fn encoded_size(&self, version: FormatVersion) -> usize {
        header_width(version)
            + version.offset_width() * 5
            + 4 * 5
            + 4 * self.r_dim_sizes.len()
    }

    pub fn encode(&self, version: FormatVersion) -> Encoder {
        let mut enc = Encoder::with_capacity(self.encoded_size(version));
        write_header(&mut enc, version, self.encoded_size(version) as u64, RecordType::Gdr);
        enc.write_offset(self.rvdr_head, version.is_v3);
        enc.write_offset(self.zvdr_head, version.is_v3);
        enc.write_offset(self.adr_head, version.is_v3);
        enc.write_offset(self.eof, version.is_v3);
        enc.write_i32(self.n_rvars);
        enc.write_i32(self.num_attr);
        enc.write_i32(self.r_max_rec);
        enc.write_i32(self.r_num_dims);
        enc.write_i32(self.n_zvars);
        enc.write_offset(self.uir_head, version.is_v3);
        enc.write_i32(0); // rfuC
        enc.write_u32(self.leap_second_last_updated);
        enc.write_i32(-1); // rfuE
        for d in &self.r_dim_sizes {
            enc.write_i32(*d);
        }
        enc
    }

    pub fn empty() -> Self {
        Gdr {
            rvdr_head: NO_OFFSET,
            zvdr_head: NO_OFFSET,
            adr_head: NO_OFFSET,
            eof: 0,
            n_rvars: 0,
            num_attr: 0,
            r_max_rec: -1,
            uir_head: NO_OFFSET,
            r_num_dims: 0,
            n_zvars: 0,
            leap_second_last_updated: 0,
            r_dim_sizes: Vec::new(),
        }
    }
}
