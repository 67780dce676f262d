// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Symmetric writer (§4.10 of the design doc): build -> size -> layout ->
//! link -> emit, mirroring the reader's pipeline in reverse and reusing the
//! same record structs so the offsets a round trip produces are exactly the
//! ones the reader already knows how to walk.
//!
//! Unlike the reader, which discovers record sizes and positions by reading
//! them off disk, the writer must invent both: `encoded_size` for every
//! wrapper never depends on where that wrapper ends up (offset fields are
//! fixed-width regardless of value), so sizes are computed once up front,
//! offsets are assigned by a single forward walk over the fixed record
//! order of §4.10 step 3, and pointer fields are patched in a second pass
//! before anything is serialised.

pub mod builder;

use std::collections::HashMap;

use crate::cdf::Cdf;
use crate::compress;
use crate::core::error::Result;
use crate::core::types::CompressionType;
use crate::core::value::CdfValue;
use crate::record::adr::Adr;
use crate::record::aedr::{Aedr, EntryKind};
use crate::record::ccr::Ccr;
use crate::record::cdr::{Cdr, FLAG_ROW_MAJOR};
use crate::record::cpr::Cpr;
use crate::record::cursor::NO_OFFSET;
use crate::record::cvvr::Cvvr;
use crate::record::gdr::Gdr;
use crate::record::vdr::{Vdr, VdrKind, FLAG_COMPRESSED, FLAG_RECORD_VARY};
use crate::record::vvr::encode_vvr;
use crate::record::vxr::Vxr;
use crate::record::FormatVersion;
use crate::reader::header::encode_magic;
use crate::reader::value_codec::encode_values;

/// Ceiling, in bytes, on a single raw `VVR`/`CVVR` block (§9 item 3 of the
/// design doc). The reference implementation uses roughly 1 GiB; this is a
/// writer policy choice, not a format requirement, so it is configurable
/// through [`builder::CdfWriterBuilder::chunk_ceiling`].
pub const DEFAULT_CHUNK_CEILING: usize = 1 << 30;

/// Knobs the writer exposes, set through [`builder::CdfWriterBuilder`].
#[derive(Debug, Clone, Copy)]
pub struct WriteOptions {
    pub version: FormatVersion,
    pub body_compression: CompressionType,
    pub chunk_ceiling: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            version: FormatVersion {
                major: 3,
                minor: 8,
                release: 0,
                is_v3: true,
            },
            body_compression: CompressionType::None,
            chunk_ceiling: DEFAULT_CHUNK_CEILING,
        }
    }
}

fn compression_level(kind: CompressionType) -> u32 {
    match kind {
        CompressionType::Gzip => 6,
        CompressionType::Zstd => 3,
        CompressionType::Rle | CompressionType::None => 0,
    }
}

fn cpr_for(kind: CompressionType) -> Option<Cpr> {
    match kind {
        CompressionType::None => None,
        CompressionType::Gzip => Some(Cpr::gzip(compression_level(kind))),
        CompressionType::Rle => Some(Cpr::rle()),
        CompressionType::Zstd => Some(Cpr::zstd(compression_level(kind))),
    }
}

/// One global or variable attribute plus its not-yet-linked entry records.
struct AdrBuild {
    adr: Adr,
    entries: Vec<Aedr>,
}

fn build_aedr(value: &CdfValue, num: i32) -> Aedr {
    let data_type = value.data_type();
    let raw = encode_values(value);
    let (num_elements, num_strings) = match value {
        CdfValue::Char { row_len, .. } | CdfValue::UChar { row_len, .. } => (*row_len as i32, 1),
        _ => (value.len() as i32, 0),
    };
    Aedr {
        aedr_next: NO_OFFSET,
        attr_num: 0, // patched once the owning ADR's Num is assigned
        data_type,
        num,
        num_elements,
        num_strings,
        value: raw,
    }
}

/// Build one `AdrBuild` per global attribute, in the container's insertion
/// order, each owning one `AgrEDR` per entry value.
fn build_global_adrs(cdf: &Cdf) -> Vec<AdrBuild> {
    cdf.attributes
        .iter()
        .map(|(name, attr)| {
            let entries: Vec<Aedr> = attr
                .entries
                .iter()
                .enumerate()
                .map(|(i, value)| build_aedr(value, i as i32))
                .collect();
            let adr = Adr {
                adr_next: NO_OFFSET,
                agredr_head: NO_OFFSET,
                scope: attr.scope,
                num: 0,
                ngr_entries: entries.len() as i32,
                max_gr_entry: entries.len() as i32 - 1,
                azedr_head: NO_OFFSET,
                nz_entries: 0,
                max_z_entry: -1,
                name: name.to_string(),
            };
            AdrBuild { adr, entries }
        })
        .collect()
}

/// Gather every variable's variable-scoped attribute entries, grouped by
/// attribute name in first-seen order, and build one `AdrBuild` per name
/// owning one `AzEDR` per target variable.
fn build_variable_adrs(cdf: &Cdf) -> Vec<AdrBuild> {
    let mut order: Vec<String> = Vec::new();
    let mut by_name: HashMap<String, Vec<(i32, CdfValue)>> = HashMap::new();
    for (var_num, (_, variable)) in cdf.variables.iter().enumerate() {
        for (attr_name, value) in variable.attribute_values.iter() {
            by_name
                .entry(attr_name.to_string())
                .or_insert_with(|| {
                    order.push(attr_name.to_string());
                    Vec::new()
                })
                .push((var_num as i32, value.clone()));
        }
    }
    order
        .into_iter()
        .map(|name| {
            let targets = by_name.remove(&name).unwrap_or_default();
            let entries: Vec<Aedr> = targets
                .iter()
                .map(|(num, value)| build_aedr(value, *num))
                .collect();
            let adr = Adr {
                adr_next: NO_OFFSET,
                agredr_head: NO_OFFSET,
                scope: crate::core::types::AttrScope::Variable,
                num: 0,
                ngr_entries: 0,
                max_gr_entry: -1,
                azedr_head: NO_OFFSET,
                nz_entries: entries.len() as i32,
                max_z_entry: entries.len() as i32 - 1,
                name,
            };
            AdrBuild { adr, entries }
        })
        .collect()
}

/// One variable plus its not-yet-linked `VXR`/`CPR`/value-record wrappers.
struct VariableBuild {
    vdr: Vdr,
    vxr: Option<Vxr>,
    cpr: Option<Cpr>,
    values: Vec<Vec<u8>>,
}

fn encode_value_record(version: FormatVersion, compressed: bool, payload: &[u8]) -> Vec<u8> {
    if compressed {
        Cvvr {
            c_size: payload.len() as u64,
            data: payload.to_vec(),
        }
        .encode(version)
        .into_bytes()
    } else {
        encode_vvr(version, payload).into_bytes()
    }
}

fn build_variable(
    var_num: i32,
    name: &str,
    variable: &crate::cdf::variable::Variable,
    version: FormatVersion,
    chunk_ceiling: usize,
) -> Result<VariableBuild> {
    let value = variable.values()?;
    let raw = encode_values(value);
    let record_size = if variable.record_count > 0 {
        raw.len() / variable.record_count
    } else {
        0
    };

    let mut values = Vec::new();
    let mut first = Vec::new();
    let mut last = Vec::new();
    if record_size > 0 && !raw.is_empty() {
        let records_per_chunk = (chunk_ceiling / record_size).max(1);
        let mut rec = 0usize;
        let mut pos = 0usize;
        while rec < variable.record_count {
            let chunk_records = records_per_chunk.min(variable.record_count - rec);
            let chunk_len = chunk_records * record_size;
            let chunk = &raw[pos..pos + chunk_len];
            let encoded = if variable.compression == CompressionType::None {
                chunk.to_vec()
            } else {
                compress::deflate(variable.compression, chunk)?
            };
            values.push(encode_value_record(
                version,
                variable.compression != CompressionType::None,
                &encoded,
            ));
            first.push(rec as i32);
            last.push((rec + chunk_records - 1) as i32);
            rec += chunk_records;
            pos += chunk_len;
        }
    }

    let vxr = if values.is_empty() {
        None
    } else {
        Vxr {
            vxr_next: NO_OFFSET,
            nentries: values.len() as i32,
            nused_entries: values.len() as i32,
            first,
            last,
            offset: vec![0; values.len()],
        }
        .into()
    };

    let cpr = cpr_for(variable.compression);

    let is_string = variable.data_type.is_string();
    let (dims, num_elems) = if is_string {
        let split = variable.shape.len().saturating_sub(1);
        let (head, tail) = variable.shape.split_at(split);
        (head.to_vec(), *tail.first().unwrap_or(&0) as i32)
    } else {
        (variable.shape.clone(), 1)
    };

    let flags = (if variable.is_nrv { 0 } else { FLAG_RECORD_VARY })
        | (if cpr.is_some() { FLAG_COMPRESSED } else { 0 });

    let vdr = Vdr {
        kind: VdrKind::Z,
        vdr_next: NO_OFFSET,
        data_type: variable.data_type,
        max_rec: if variable.is_nrv {
            -1
        } else {
            variable.record_count as i32 - 1
        },
        vxr_head: NO_OFFSET,
        vxr_tail: NO_OFFSET,
        flags,
        s_records: 0,
        num_elems,
        num: var_num,
        cpr_or_spr_offset: NO_OFFSET,
        blocking_factor: variable.record_count.max(1) as i32,
        name: name.to_string(),
        z_num_dims: dims.len() as i32,
        z_dim_sizes: dims.iter().map(|&d| d as i32).collect(),
        dim_varys: vec![1; dims.len()],
    };

    Ok(VariableBuild {
        vdr,
        vxr,
        cpr,
        values,
    })
}

/// Serialise everything from the logical offset 8 onward: `CDR`, `GDR`, the
/// combined `ADR` chain (global attributes then variable attributes, per
/// §4.10 step 3's fixed layout order), then each variable's `VDR`/`VXR`/
/// `CPR`/value records.
fn build_body(cdf: &Cdf, opts: &WriteOptions) -> Result<Vec<u8>> {
    let version = opts.version;

    let mut adr_builds = build_global_adrs(cdf);
    adr_builds.extend(build_variable_adrs(cdf));
    for (i, build) in adr_builds.iter_mut().enumerate() {
        build.adr.num = i as i32;
        for entry in &mut build.entries {
            entry.attr_num = i as i32;
        }
    }

    let mut variable_builds = Vec::with_capacity(cdf.variables.len());
    for (var_num, (name, variable)) in cdf.variables.iter().enumerate() {
        variable_builds.push(build_variable(
            var_num as i32,
            name,
            variable,
            version,
            opts.chunk_ceiling,
        )?);
    }

    // --- size + layout: one forward walk computing every wrapper's offset ---
    let cdr_offset = 8u64;
    let mut cdr = Cdr {
        gdr_offset: 0,
        version: version.major,
        release: version.release,
        encoding: 1, // NETWORK: big-endian, matching the writer's always-big-endian payloads
        flags: FLAG_ROW_MAJOR,
        increment: 0,
        identifier: 2,
        copyright: "CDF Codec".to_string(),
    };
    let cdr_size = cdr.encoded_size(version) as u64;
    let gdr_offset = cdr_offset + cdr_size;
    cdr.gdr_offset = gdr_offset;

    let mut gdr = Gdr::empty();
    let gdr_size = gdr.encoded_size(version) as u64;
    let mut cursor = gdr_offset + gdr_size;

    let mut adr_offsets = Vec::with_capacity(adr_builds.len());
    let mut aedr_offsets: Vec<Vec<u64>> = Vec::with_capacity(adr_builds.len());
    for build in &adr_builds {
        adr_offsets.push(cursor);
        cursor += build.adr.encoded_size(version) as u64;
        let mut entry_offsets = Vec::with_capacity(build.entries.len());
        for entry in &build.entries {
            entry_offsets.push(cursor);
            cursor += entry.encoded_size(version) as u64;
        }
        aedr_offsets.push(entry_offsets);
    }

    let mut vdr_offsets = Vec::with_capacity(variable_builds.len());
    let mut vxr_offsets: Vec<Option<u64>> = Vec::with_capacity(variable_builds.len());
    let mut cpr_offsets: Vec<Option<u64>> = Vec::with_capacity(variable_builds.len());
    let mut value_offsets: Vec<Vec<u64>> = Vec::with_capacity(variable_builds.len());
    for vb in &variable_builds {
        vdr_offsets.push(cursor);
        cursor += vb.vdr.encoded_size(version) as u64;
        let vxr_off = vb.vxr.as_ref().map(|vxr| {
            let off = cursor;
            cursor += vxr.encoded_size(version) as u64;
            off
        });
        vxr_offsets.push(vxr_off);
        let cpr_off = vb.cpr.as_ref().map(|cpr| {
            let off = cursor;
            cursor += cpr.encoded_size(version) as u64;
            off
        });
        cpr_offsets.push(cpr_off);
        let mut offs = Vec::with_capacity(vb.values.len());
        for v in &vb.values {
            offs.push(cursor);
            cursor += v.len() as u64;
        }
        value_offsets.push(offs);
    }

    // --- link: back-patch every pointer field now that offsets are known ---
    gdr.adr_head = adr_offsets.first().copied().unwrap_or(NO_OFFSET);
    gdr.zvdr_head = vdr_offsets.first().copied().unwrap_or(NO_OFFSET);
    gdr.num_attr = adr_builds.len() as i32;
    gdr.n_zvars = variable_builds.len() as i32;
    gdr.eof = cursor;
    gdr.leap_second_last_updated = cdf.leap_second_last_updated;

    for (i, build) in adr_builds.iter_mut().enumerate() {
        build.adr.adr_next = adr_offsets.get(i + 1).copied().unwrap_or(NO_OFFSET);
        let entry_offsets = &aedr_offsets[i];
        let head = entry_offsets.first().copied().unwrap_or(NO_OFFSET);
        if build.adr.scope.is_global() {
            build.adr.agredr_head = head;
        } else {
            build.adr.azedr_head = head;
        }
        for (j, entry) in build.entries.iter_mut().enumerate() {
            entry.aedr_next = entry_offsets.get(j + 1).copied().unwrap_or(NO_OFFSET);
        }
    }

    for (i, vb) in variable_builds.iter_mut().enumerate() {
        vb.vdr.vdr_next = vdr_offsets.get(i + 1).copied().unwrap_or(NO_OFFSET);
        let vxr_off = vxr_offsets[i].unwrap_or(NO_OFFSET);
        vb.vdr.vxr_head = vxr_off;
        vb.vdr.vxr_tail = vxr_off;
        vb.vdr.cpr_or_spr_offset = cpr_offsets[i].unwrap_or(NO_OFFSET);
        if let Some(vxr) = vb.vxr.as_mut() {
            vxr.offset = value_offsets[i].clone();
        }
    }

    // --- emit, in the exact order offsets were assigned ---
    let mut out = Vec::with_capacity((cursor - 8) as usize);
    out.extend_from_slice(&cdr.encode(version).into_bytes());
    out.extend_from_slice(&gdr.encode(version).into_bytes());
    for build in &adr_builds {
        out.extend_from_slice(&build.adr.encode(version).into_bytes());
        let kind = if build.adr.scope.is_global() {
            EntryKind::Gr
        } else {
            EntryKind::Z
        };
        for entry in &build.entries {
            out.extend_from_slice(&entry.encode(version, kind).into_bytes());
        }
    }
    for vb in &variable_builds {
        out.extend_from_slice(&vb.vdr.encode(version).into_bytes());
        if let Some(vxr) = &vb.vxr {
            out.extend_from_slice(&vxr.encode(version).into_bytes());
        }
        if let Some(cpr) = &vb.cpr {
            out.extend_from_slice(&cpr.encode(version).into_bytes());
        }
        for v in &vb.values {
            out.extend_from_slice(v);
        }
    }

    debug_assert_eq!(out.len() as u64 + 8, cursor);
    Ok(out)
}

/// Serialise `cdf` to an in-memory buffer (§6.2's "sink is path or growable
/// byte buffer").
pub fn save_to_vec(cdf: &Cdf, opts: &WriteOptions) -> Result<Vec<u8>> {
    let body = build_body(cdf, opts)?;
    let compressed = !matches!(opts.body_compression, CompressionType::None);
    let magic = encode_magic(opts.version, compressed);

    let mut out = Vec::with_capacity(body.len() + 64);
    out.extend_from_slice(&magic);

    if !compressed {
        out.extend_from_slice(&body);
        return Ok(out);
    }

    tracing::debug!(c_type = ?opts.body_compression, u_size = body.len(), "deflating whole CDF body");
    let data = compress::deflate(opts.body_compression, &body)?;
    let mut ccr = Ccr {
        cpr_offset: 0,
        u_size: body.len() as u64,
        data,
    };
    let ccr_size = ccr.encoded_size(opts.version) as u64;
    ccr.cpr_offset = 8 + ccr_size;
    let cpr = cpr_for(opts.body_compression).expect("compressed body always carries a CPR");

    out.extend_from_slice(&ccr.encode(opts.version).into_bytes());
    out.extend_from_slice(&cpr.encode(opts.version).into_bytes());
    Ok(out)
}

/// Serialise `cdf` to a file at `path`, using default [`WriteOptions`]. For
/// custom options (target version, body compression, chunk ceiling), use
/// [`builder::CdfWriterBuilder`].
pub fn save<P: AsRef<std::path::Path>>(cdf: &Cdf, path: P) -> Result<()> {
    let opts = WriteOptions::default();
    let bytes = save_to_vec(cdf, &opts)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{AttrScope, DataType};
    use crate::reader;

    fn sample_cdf() -> Cdf {
        let mut cdf = Cdf::empty();
        cdf.add_attribute(
            "TITLE",
            AttrScope::Global,
            vec![CdfValue::Char {
                bytes: b"hello".to_vec(),
                row_len: 5,
            }],
        )
        .unwrap();
        cdf.add_variable(
            "X",
            DataType::Int4,
            vec![5],
            1,
            true,
            CompressionType::None,
            CdfValue::Int4(vec![1, 2, 3, 4, 5]),
        )
        .unwrap();
        cdf
    }

    #[test]
    fn empty_cdf_round_trips() {
        let cdf = Cdf::empty();
        let bytes = save_to_vec(&cdf, &WriteOptions::default()).unwrap();
        let loaded = reader::load(std::sync::Arc::new(crate::io::SliceArena::new(bytes)), false, false).unwrap();
        assert_eq!(loaded.attributes.len(), 0);
        assert_eq!(loaded.variables.len(), 0);
    }

    #[test]
    fn scalar_variable_round_trips() {
        let cdf = sample_cdf();
        let bytes = save_to_vec(&cdf, &WriteOptions::default()).unwrap();
        let loaded = reader::load(std::sync::Arc::new(crate::io::SliceArena::new(bytes)), false, false).unwrap();
        assert_eq!(loaded.variable("X").unwrap().values().unwrap(), &CdfValue::Int4(vec![1, 2, 3, 4, 5]));
        assert_eq!(loaded.attribute("TITLE").unwrap().entries.len(), 1);
    }

    #[test]
    fn gzip_variable_round_trips() {
        let mut cdf = Cdf::empty();
        let values: Vec<f64> = (0..100).map(|i| i as f64 * 0.5).collect();
        cdf.add_variable(
            "Y",
            DataType::Double,
            vec![100],
            1,
            true,
            CompressionType::Gzip,
            CdfValue::Float64(values.clone()),
        )
        .unwrap();
        let bytes = save_to_vec(&cdf, &WriteOptions::default()).unwrap();
        let loaded = reader::load(std::sync::Arc::new(crate::io::SliceArena::new(bytes)), false, false).unwrap();
        let y = loaded.variable("Y").unwrap();
        assert_eq!(y.compression, CompressionType::Gzip);
        assert_eq!(y.values().unwrap(), &CdfValue::Float64(values));
    }

    #[test]
    fn compressed_body_round_trips() {
        let cdf = sample_cdf();
        let opts = WriteOptions {
            body_compression: CompressionType::Gzip,
            ..WriteOptions::default()
        };
        let bytes = save_to_vec(&cdf, &opts).unwrap();
        assert_eq!(u32::from_be_bytes(bytes[4..8].try_into().unwrap()), 0xCCCC_0001);
        let loaded = reader::load(std::sync::Arc::new(crate::io::SliceArena::new(bytes)), false, false).unwrap();
        assert_eq!(loaded.compression_type, CompressionType::Gzip);
        assert_eq!(loaded.variable("X").unwrap().values().unwrap(), &CdfValue::Int4(vec![1, 2, 3, 4, 5]));
    }

    #[test]
    fn variable_attribute_round_trips() {
        let mut cdf = Cdf::empty();
        cdf.add_variable(
            "X",
            DataType::Int4,
            vec![2],
            1,
            true,
            CompressionType::None,
            CdfValue::Int4(vec![1, 2]),
        )
        .unwrap();
        cdf.variables
            .get_mut("X")
            .unwrap()
            .attribute_values
            .insert("UNITS", CdfValue::Char { bytes: b"nT".to_vec(), row_len: 2 });
        let bytes = save_to_vec(&cdf, &WriteOptions::default()).unwrap();
        let loaded = reader::load(std::sync::Arc::new(crate::io::SliceArena::new(bytes)), false, false).unwrap();
        let x = loaded.variable("X").unwrap();
        assert_eq!(x.attribute_values.get("UNITS").unwrap().as_strings().unwrap(), vec![b"nT".as_slice()]);
    }
}
