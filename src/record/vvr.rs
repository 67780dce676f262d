// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Variable Values Record: a raw, uncompressed run of a variable's records.
//!
//! A `VVR` carries no fields beyond its header; its payload is simply every
//! byte after the header, so the only useful "decode" is handing back the
//! `(payload_offset, payload_len)` span for the caller to copy directly out
//! of the byte source, avoiding an extra allocation on the hot assembly path
//! (§4.6 of the design doc).

use crate::core::error::Result;
use crate::io::ByteSource;
use crate::record::cursor::Encoder;
use crate::record::{expect_header, header_width, write_header, FormatVersion, RecordType};

#[derive(Debug, Clone, Copy)]
pub struct VvrSpan {
    pub payload_offset: u64,
    pub payload_len: usize,
}

/// Peek a `VVR`'s header at `offset` and return the span of its raw payload.
pub fn vvr_span(source: &dyn ByteSource, version: FormatVersion, offset: u64) -> Result<VvrSpan> {
    let header = expect_header(source, version, offset, "VVR", |t| matches!(t, RecordType::Vvr))?;
    let header_len = header_width(version) as u64;
    Ok(VvrSpan {
        payload_offset: offset + header_len,
        payload_len: (header.record_size - header_len) as usize,
    })
}

/// Encode a raw `VVR` wrapping `data` verbatim. Used by the writer for
/// variables (or chunks of variables) with no per-variable compression.
pub fn encode_vvr(version: FormatVersion, data: &[u8]) -> Encoder {
    let size = header_width(version) + data.len();
    let mut enc = Encoder::with_capacity(size);
    write_header(&mut enc, version, size as u64, RecordType::Vvr);
    enc.write_bytes(data);
    enc
}
