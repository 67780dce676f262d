// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Top-level load pipeline (§4.3): magic detection, optional whole-body
//! decompression, then descriptor-graph assembly into a [`crate::cdf::Cdf`].

pub mod attrs;
pub mod header;
pub mod iter;
pub mod majority;
pub mod value_codec;
pub mod variable;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::cdf::indexed_map::IndexedMap;
use crate::cdf::variable::{big_endian_from_cdr, LazyContext, Variable};
use crate::cdf::Cdf;
use crate::compress;
use crate::core::error::Result;
use crate::core::types::{CompressionType, Majority};
use crate::core::value::CdfValue;
use crate::io::{ByteSource, MmapArena, SharedSource, SliceArena};
use crate::record::ccr::Ccr;
use crate::record::cdr::Cdr;
use crate::record::cpr::Cpr;
use crate::record::cursor::NO_OFFSET;
use crate::record::gdr::Gdr;
use crate::record::vdr::VdrKind;
use crate::record::FormatVersion;
use crate::reader::attrs::{assemble_attributes, AssembledAttribute};
use crate::reader::header::detect_header;
use crate::reader::iter::VdrIter;
use crate::reader::variable::{record_count, variable_shape};

/// Open a file-backed CDF by memory-mapping it and running [`load`].
pub fn open<P: AsRef<Path>>(path: P, utf8_transcode: bool, lazy: bool) -> Result<Cdf> {
    let arena = MmapArena::open(path)?;
    load(Arc::new(arena), utf8_transcode, lazy)
}

/// Parse a CDF from any byte source, producing a [`Cdf`] whose variables are
/// either fully materialised (`lazy = false`) or deferred to first access.
pub fn load(source: SharedSource, utf8_transcode: bool, lazy: bool) -> Result<Cdf> {
    let header = detect_header(source.as_ref())?;

    let (source, version, body_compression): (SharedSource, FormatVersion, CompressionType) =
        if header.compressed {
            let ccr = Ccr::decode(source.as_ref(), header.version, 8)?;
            let cpr = Cpr::decode(source.as_ref(), header.version, ccr.cpr_offset)?;
            let inflated = compress::inflate(cpr.c_type, &ccr.data, ccr.u_size as usize)?;
            let mut buf = Vec::with_capacity(8 + inflated.len());
            buf.extend_from_slice(&header.magic_bytes);
            buf.extend_from_slice(&inflated);
            tracing::debug!(c_type = ?cpr.c_type, u_size = ccr.u_size, "inflated whole-body CCR");
            (Arc::new(SliceArena::new(buf)), header.version, cpr.c_type)
        } else {
            (source, header.version, CompressionType::None)
        };

    let cdr = Cdr::decode(source.as_ref(), version, 8)?;
    let version = FormatVersion { release: cdr.release, ..version };
    let gdr = Gdr::decode(source.as_ref(), version, cdr.gdr_offset)?;

    let big_endian = big_endian_from_cdr(&cdr);
    let row_major = cdr.is_row_major();

    let assembled = assemble_attributes(source.as_ref(), version, gdr.adr_head, big_endian, utf8_transcode)?;

    let mut attributes = IndexedMap::new();
    let mut per_variable: HashMap<i32, Vec<(String, CdfValue)>> = HashMap::new();
    for attr in assembled {
        match attr {
            AssembledAttribute::Global(attribute) => {
                attributes.insert(attribute.name.clone(), attribute);
            }
            AssembledAttribute::PerVariable { name, by_var } => {
                for (var_num, attribute) in by_var {
                    if let Some(value) = attribute.entries.into_iter().next() {
                        per_variable.entry(var_num).or_default().push((name.clone(), value));
                    }
                }
            }
        }
    }

    let mut variables = IndexedMap::new();
    let z_iter = VdrIter::new(source.as_ref(), version, VdrKind::Z, 0, gdr.zvdr_head);
    let r_iter = VdrIter::new(source.as_ref(), version, VdrKind::R, gdr.r_num_dims, gdr.rvdr_head);
    for entry in z_iter.chain(r_iter) {
        let (_, vdr) = entry?;
        let shape = variable_shape(&vdr, &gdr.r_dim_sizes);
        let count = record_count(&vdr);
        let compression = if vdr.is_compressed() && vdr.cpr_or_spr_offset != NO_OFFSET {
            Cpr::decode(source.as_ref(), version, vdr.cpr_or_spr_offset)?.c_type
        } else {
            CompressionType::None
        };

        let ctx = LazyContext {
            source: source.clone(),
            version,
            vdr: vdr.clone(),
            r_dim_sizes: gdr.r_dim_sizes.clone(),
            big_endian,
            row_major,
            utf8_transcode,
        };

        let mut variable = if lazy {
            Variable::lazy(vdr.data_type, shape, count, !vdr.is_record_vary(), compression, ctx)
        } else {
            let value = variable::assemble(&ctx)?;
            Variable::eager(vdr.data_type, shape, count, !vdr.is_record_vary(), compression, value)
        };

        if let Some(entries) = per_variable.remove(&vdr.num) {
            let mut map = IndexedMap::new();
            for (name, value) in entries {
                map.insert(name, value);
            }
            variable.set_attribute_values(map);
        }

        variables.insert(vdr.name.clone(), variable);
    }

    Ok(Cdf {
        attributes,
        variables,
        majority: Majority::from_flag(row_major),
        compression_type: body_compression,
        distribution_version: (cdr.version, cdr.release),
        leap_second_last_updated: gdr.leap_second_last_updated,
    })
}
