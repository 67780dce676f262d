// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Variable indeX Record: an index node over a variable's value records.
//!
//! Each of the first `NusedEntries` parallel slots `(First[i], Last[i],
//! Offset[i])` covers an inclusive logical-record range and points at either
//! a `VVR`, a `CVVR`, or a nested `VXR` — the polymorphic slot of §4.4/§9 of
//! the design doc, disambiguated by peeking the target's header.

use crate::core::error::Result;
use crate::io::ByteSource;
use crate::record::cursor::{Decoder, Encoder};
use crate::record::{expect_header, header_width, write_header, FormatVersion, RecordType};

#[derive(Debug, Clone)]
pub struct Vxr {
    pub vxr_next: u64,
    pub nentries: i32,
    pub nused_entries: i32,
    pub first: Vec<i32>,
    pub last: Vec<i32>,
    pub offset: Vec<u64>,
}

impl Vxr {
    pub fn decode(source: &dyn ByteSource, version: FormatVersion, offset: u64) -> Result<Self> {
        let header = expect_header(source, version, offset, "VXR", |t| {
            matches!(t, RecordType::Vxr)
        })?;
        let raw = source.read_into(offset, header.record_size as usize)?;
        let mut cur = Decoder::new(&raw);
        cur.skip(header_width(version))?;
        let vxr_next = cur.read_offset(version.is_v3)?;
        let nentries = cur.read_i32()?;
        let nused_entries = cur.read_i32()?;
        let n = nentries.max(0) as usize;
        let mut first = Vec::with_capacity(n);
        for _ in 0..n {
            first.push(cur.read_i32()?);
        }
        let mut last = Vec::with_capacity(n);
        for _ in 0..n {
            last.push(cur.read_i32()?);
        }
        let mut entry_offsets = Vec::with_capacity(n);
        for _ in 0..n {
            entry_offsets.push(cur.read_offset(version.is_v3)?);
        }
        Ok(Vxr {
            vxr_next,
            nentries,
            nused_entries,
            first,
            last,
            offset: entry_offsets,
        })
    }

    /// The `(first, last, offset)` triples actually in use.
    pub fn used_entries(&self) -> impl Iterator<Item = (i32, i32, u64)> + '_ {
        let n = self.nused_entries.max(0) as usize;
        self.first[..n]
            .iter()
            .zip(&self.last[..n])
            .zip(&self.offset[..n])
            .map(|((f, l), o)| (*f, *l, *o))
    }

    pub fn encoded_size(&self, version: FormatVersion) -> usize {
        header_width(version)
            + version.offset_width()
            + 4 * 2
            + (4 + 4 + version.offset_width()) * self.first.len()
    }

    pub fn encode(&self, version: FormatVersion) -> Encoder {
        let mut enc = Encoder::with_capacity(self.encoded_size(version));
        write_header(&mut enc, version, self.encoded_size(version) as u64, RecordType::Vxr);
        enc.write_offset(self.vxr_next, version.is_v3);
        enc.write_i32(self.nentries);
        enc.write_i32(self.nused_entries);
        for f in &self.first {
            enc.write_i32(*f);
        }
        for l in &self.last {
            enc.write_i32(*l);
        }
        for o in &self.offset {
            enc.write_offset(*o, version.is_v3);
        }
        enc
    }
}
