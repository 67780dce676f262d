// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Variable Descriptor Record: one per r- or z-variable, owning the `VXR`
//! tree that indexes its value records.
//!
//! r- and z-VDRs share every field except the dimensionality table: a z-VDR
//! carries its own `zNumDims`/`zDimSizes`, while an r-VDR's `DimVarys` length
//! is derived from `GDR.rNumDims`. Both are modelled by one [`Vdr`] struct
//! parameterised by [`VdrKind`], mirroring how [`crate::record::aedr::Aedr`]
//! folds `AgrEDR`/`AzEDR` into one shape.

use crate::core::error::Result;
use crate::core::types::DataType;
use crate::io::ByteSource;
use crate::record::cursor::{Decoder, Encoder};
use crate::record::{expect_header, header_width, write_header, FormatVersion, RecordType};

/// `VDR.Flags` bit 0: the variable has one value per record.
pub const FLAG_RECORD_VARY: i32 = 1 << 0;
/// `VDR.Flags` bit 2: the variable's records are individually compressed.
pub const FLAG_COMPRESSED: i32 = 1 << 2;

/// Whether a [`Vdr`] describes an r-variable or a z-variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VdrKind {
    R,
    Z,
}

impl VdrKind {
    fn record_type(self) -> RecordType {
        match self {
            VdrKind::R => RecordType::RVdr,
            VdrKind::Z => RecordType::ZVdr,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Vdr {
    pub kind: VdrKind,
    pub vdr_next: u64,
    pub data_type: DataType,
    pub max_rec: i32,
    pub vxr_head: u64,
    pub vxr_tail: u64,
    pub flags: i32,
    pub s_records: i32,
    pub num_elems: i32,
    pub num: i32,
    pub cpr_or_spr_offset: u64,
    pub blocking_factor: i32,
    pub name: String,
    /// z-variables only; `0` for r-variables (their dimensionality lives in `GDR`).
    pub z_num_dims: i32,
    /// z-variables only.
    pub z_dim_sizes: Vec<i32>,
    /// Length `zNumDims` for z-variables, `GDR.rNumDims` for r-variables.
    pub dim_varys: Vec<i32>,
}

impl Vdr {
    pub fn is_record_vary(&self) -> bool {
        self.flags & FLAG_RECORD_VARY != 0
    }

    pub fn is_compressed(&self) -> bool {
        self.flags & FLAG_COMPRESSED != 0
    }

    /// Decode a VDR at `offset`. `r_num_dims` is the `GDR.rNumDims` used to
    /// size `DimVarys` for an r-variable; ignored for z-variables.
    pub fn decode(
        source: &dyn ByteSource,
        version: FormatVersion,
        offset: u64,
        kind: VdrKind,
        r_num_dims: i32,
    ) -> Result<Self> {
        let expected = match kind {
            VdrKind::R => "rVDR",
            VdrKind::Z => "zVDR",
        };
        let header = expect_header(source, version, offset, expected, |t| t == kind.record_type())?;
        let raw = source.read_into(offset, header.record_size as usize)?;
        let mut cur = Decoder::new(&raw);
        cur.skip(header_width(version))?;
        let vdr_next = cur.read_offset(version.is_v3)?;
        let data_type = DataType::from_code(cur.read_i32()? as i64)?;
        let max_rec = cur.read_i32()?;
        let vxr_head = cur.read_offset(version.is_v3)?;
        let vxr_tail = cur.read_offset(version.is_v3)?;
        let flags = cur.read_i32()?;
        let s_records = cur.read_i32()?;
        cur.skip(4)?; // rfuB
        cur.skip(4)?; // rfuC
        if version.has_vdr_padding_table() {
            cur.skip(132)?; // rfuF: v2.4-or-less padding table
        } else {
            cur.skip(4)?; // rfuF: reserved int32
        }
        let num_elems = cur.read_i32()?;
        let num = cur.read_i32()?;
        let cpr_or_spr_offset = cur.read_offset(version.is_v3)?;
        let blocking_factor = cur.read_i32()?;
        let name = cur.read_fixed_string(version.name_len())?;

        let (z_num_dims, z_dim_sizes, dim_varys_len) = match kind {
            VdrKind::R => (0, Vec::new(), r_num_dims.max(0) as usize),
            VdrKind::Z => {
                let n = cur.read_i32()?;
                let mut sizes = Vec::with_capacity(n.max(0) as usize);
                for _ in 0..n.max(0) {
                    sizes.push(cur.read_i32()?);
                }
                (n, sizes, n.max(0) as usize)
            }
        };
        let mut dim_varys = Vec::with_capacity(dim_varys_len);
        for _ in 0..dim_varys_len {
            dim_varys.push(cur.read_i32()?);
        }
        // PadValues: the reference implementation never emits pad values, so
        // its declared size is always zero; nothing left to read.

        Ok(Vdr {
            kind,
            vdr_next,
            data_type,
            max_rec,
            vxr_head,
            vxr_tail,
            flags,
            s_records,
            num_elems,
            num,
            cpr_or_spr_offset,
            blocking_factor,
            name,
            z_num_dims,
            z_dim_sizes,
            dim_varys,
        })
    }

    pub fn encoded_size(&self, version: FormatVersion) -> usize {
        let padding = if version.has_vdr_padding_table() { 132 } else { 4 };
        let mut size = header_width(version)
            + version.offset_width() * 4 // VDRnext, VXRhead, VXRtail, CPRorSPRoffset
            + 4 * 2 // DataType, MaxRec
            + 4 * 2 // Flags, SRecords
            + 8 // rfuB, rfuC
            + padding
            + 4 * 3 // NumElems, Num, BlockingFactor
            + version.name_len();
        if self.kind == VdrKind::Z {
            size += 4; // zNumDims
            size += 4 * self.z_dim_sizes.len();
        }
        size += 4 * self.dim_varys.len();
        size
    }

    pub fn encode(&self, version: FormatVersion) -> Encoder {
        let mut enc = Encoder::with_capacity(self.encoded_size(version));
        write_header(
            &mut enc,
            version,
            self.encoded_size(version) as u64,
            self.kind.record_type(),
        );
        enc.write_offset(self.vdr_next, version.is_v3);
        enc.write_i32(self.data_type.code());
        enc.write_i32(self.max_rec);
        enc.write_offset(self.vxr_head, version.is_v3);
        enc.write_offset(self.vxr_tail, version.is_v3);
        enc.write_i32(self.flags);
        enc.write_i32(self.s_records);
        enc.write_i32(0); // rfuB
        enc.write_i32(0); // rfuC
        if version.has_vdr_padding_table() {
            enc.write_bytes(&[0u8; 132]);
        } else {
            enc.write_i32(0);
        }
        enc.write_i32(self.num_elems);
        enc.write_i32(self.num);
        enc.write_offset(self.cpr_or_spr_offset, version.is_v3);
        enc.write_i32(self.blocking_factor);
        enc.write_fixed_string(&self.name, version.name_len());
        if self.kind == VdrKind::Z {
            enc.write_i32(self.z_num_dims);
            for d in &self.z_dim_sizes {
                enc.write_i32(*d);
            }
        }
        for d in &self.dim_varys {
            enc.write_i32(*d);
        }
        enc
    }
}
