// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Variable payload assembly (§4.6 of the design doc): walk a VDR's VXR tree,
//! copy or inflate each referenced value record into a preallocated buffer,
//! then endian-decode, optionally transcode, and optionally un-transpose.

use crate::cdf::variable::LazyContext;
use crate::compress;
use crate::core::error::{CdfError, Result};
use crate::core::types::DataType;
use crate::core::value::CdfValue;
use crate::io::ByteSource;
use crate::record::cpr::Cpr;
use crate::record::cvvr::Cvvr;
use crate::record::vdr::{Vdr, VdrKind};
use crate::record::vvr::vvr_span;
use crate::record::{peek_header, FormatVersion, RecordType};
use crate::reader::iter::VxrIter;
use crate::reader::majority;
use crate::reader::value_codec::{decode_values, transcode_char_value};

/// The per-record shape of a variable (excluding the leading record axis),
/// with the string row length appended as the trailing axis for char types.
pub fn variable_shape(vdr: &Vdr, r_dim_sizes: &[i32]) -> Vec<usize> {
    let mut shape = match vdr.kind {
        VdrKind::Z => vdr
            .z_dim_sizes
            .iter()
            .zip(&vdr.dim_varys)
            .filter(|(_, vary)| **vary != 0)
            .map(|(d, _)| *d as usize)
            .collect::<Vec<_>>(),
        VdrKind::R => r_dim_sizes
            .iter()
            .zip(&vdr.dim_varys)
            .filter(|(_, vary)| **vary != 0)
            .map(|(d, _)| *d as usize)
            .collect::<Vec<_>>(),
    };
    if vdr.data_type.is_string() {
        shape.push(vdr.num_elems.max(0) as usize);
    }
    shape
}

/// The number of logical records a VDR's buffer holds.
pub fn record_count(vdr: &Vdr) -> usize {
    if !vdr.is_record_vary() {
        1
    } else {
        (vdr.max_rec + 1).max(0) as usize
    }
}

fn record_byte_size(data_type: DataType, shape: &[usize]) -> usize {
    shape.iter().product::<usize>() * data_type.size()
}

/// Materialise a variable's full value buffer from its lazy loading context.
pub fn assemble(ctx: &LazyContext) -> Result<CdfValue> {
    let shape = variable_shape(&ctx.vdr, &ctx.r_dim_sizes);
    let record_size = record_byte_size(ctx.vdr.data_type, &shape);
    let count = record_count(&ctx.vdr);
    let total = count * record_size;

    let compression = if ctx.vdr.is_compressed() && ctx.vdr.cpr_or_spr_offset != crate::record::cursor::NO_OFFSET
    {
        Cpr::decode(ctx.source.as_ref(), ctx.version, ctx.vdr.cpr_or_spr_offset)?.c_type
    } else {
        crate::core::types::CompressionType::None
    };

    let mut buf = vec![0u8; total];
    assemble_chain(
        ctx.source.as_ref(),
        ctx.version,
        ctx.vdr.vxr_head,
        compression,
        record_size,
        &mut buf,
    )?;

    if !ctx.row_major {
        let (transpose_dims, unit_size): (&[usize], usize) = if ctx.vdr.data_type.is_string() {
            (&shape[..shape.len().saturating_sub(1)], *shape.last().unwrap_or(&0))
        } else {
            (&shape[..], ctx.vdr.data_type.size())
        };
        majority::transpose_all(&mut buf, count, transpose_dims, unit_size);
    }

    let row_len = if ctx.vdr.data_type.is_string() {
        *shape.last().unwrap_or(&0)
    } else {
        0
    };
    let mut value = decode_values(ctx.vdr.data_type, &buf, ctx.big_endian, row_len)?;
    if ctx.utf8_transcode && ctx.vdr.data_type.is_string() {
        transcode_char_value(&mut value);
    }
    Ok(value)
}

/// Walk a VXR chain (and, recursively, any nested VXRs reached through an
/// entry's `Offset[i]`), copying or inflating each VVR/CVVR payload into
/// `buf` at the position implied by its `[First, Last]` record range.
fn assemble_chain(
    source: &dyn ByteSource,
    version: FormatVersion,
    head: u64,
    compression: crate::core::types::CompressionType,
    record_size: usize,
    buf: &mut [u8],
) -> Result<()> {
    for entry in VxrIter::new(source, version, head) {
        let (_, vxr) = entry?;
        for (first, last, offset) in vxr.used_entries() {
            let span_len = (last - first + 1).max(0) as usize * record_size;
            let write_pos = first.max(0) as usize * record_size;
            if write_pos + span_len > buf.len() {
                return Err(CdfError::shape_mismatch(buf.len(), write_pos + span_len));
            }
            let header = peek_header(source, version, offset)?;
            match header.record_type {
                RecordType::Vvr => {
                    let span = vvr_span(source, version, offset)?;
                    if span.payload_len != span_len {
                        return Err(CdfError::shape_mismatch(span_len, span.payload_len));
                    }
                    let bytes = source.view(span.payload_offset, span.payload_len)?;
                    buf[write_pos..write_pos + span_len].copy_from_slice(bytes);
                }
                RecordType::Cvvr => {
                    let cvvr = Cvvr::decode(source, version, offset)?;
                    let inflated = compress::inflate(compression, &cvvr.data, span_len)?;
                    buf[write_pos..write_pos + span_len].copy_from_slice(&inflated);
                }
                RecordType::Vxr => {
                    assemble_chain(source, version, offset, compression, record_size, buf)?;
                }
                _ => return Err(CdfError::bad_record("VVR|CVVR|VXR", offset)),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::CompressionType;
    use crate::io::SliceArena;
    use crate::record::cursor::NO_OFFSET;
    use crate::record::vvr::encode_vvr;
    use crate::record::vxr::Vxr;

    fn v3() -> FormatVersion {
        FormatVersion {
            major: 3,
            minor: 8,
            release: 0,
            is_v3: true,
        }
    }

    #[test]
    fn single_vvr_assembles_into_buffer() {
        let version = v3();
        let values: Vec<u8> = (0..20u8).collect();
        let vvr_bytes = encode_vvr(version, &values).into_bytes();
        let vvr_offset = 0u64;
        let vxr = Vxr {
            vxr_next: NO_OFFSET,
            nentries: 1,
            nused_entries: 1,
            first: vec![0],
            last: vec![4],
            offset: vec![vvr_bytes.len() as u64],
        };
        let vxr_bytes = vxr.encode(version).into_bytes();
        let mut bytes = vvr_bytes;
        let vxr_offset_abs = bytes.len() as u64;
        bytes.extend_from_slice(&vxr_bytes);
        let arena = SliceArena::new(bytes);

        let mut buf = vec![0u8; 20];
        assemble_chain(&arena, version, vxr_offset_abs, CompressionType::None, 4, &mut buf).unwrap();
        assert_eq!(buf, values);
        let _ = vvr_offset;
    }
}
