// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Descriptor-chain iterators derived mechanically from the record graph
//! (§4.4): ADR, AEDR, VDR, and VXR, each a borrowing `Iterator` yielding
//! `(offset, record)` pairs rather than collecting eagerly, in the teacher's
//! `RawMessageStream`-style convention for streaming readers.

use crate::core::error::Result;
use crate::io::ByteSource;
use crate::record::adr::Adr;
use crate::record::aedr::{Aedr, EntryKind};
use crate::record::cursor::NO_OFFSET;
use crate::record::vdr::{Vdr, VdrKind};
use crate::record::vxr::Vxr;
use crate::record::FormatVersion;

fn is_terminal(offset: u64) -> bool {
    offset == 0 || offset == NO_OFFSET
}

/// Iterates the `ADR` chain from `GDR.ADRhead`.
pub struct AdrIter<'a> {
    source: &'a dyn ByteSource,
    version: FormatVersion,
    next: u64,
}

impl<'a> AdrIter<'a> {
    pub fn new(source: &'a dyn ByteSource, version: FormatVersion, head: u64) -> Self {
        Self {
            source,
            version,
            next: head,
        }
    }
}

impl Iterator for AdrIter<'_> {
    type Item = Result<(u64, Adr)>;

    fn next(&mut self) -> Option<Self::Item> {
        if is_terminal(self.next) {
            return None;
        }
        let offset = self.next;
        match Adr::decode(self.source, self.version, offset) {
            Ok(adr) => {
                self.next = adr.adr_next;
                Some(Ok((offset, adr)))
            }
            Err(e) => {
                self.next = NO_OFFSET;
                Some(Err(e))
            }
        }
    }
}

/// Iterates an AEDR chain (either `AgrEDR` or `AzEDR`, per `kind`).
pub struct AedrIter<'a> {
    source: &'a dyn ByteSource,
    version: FormatVersion,
    kind: EntryKind,
    next: u64,
}

impl<'a> AedrIter<'a> {
    pub fn new(source: &'a dyn ByteSource, version: FormatVersion, kind: EntryKind, head: u64) -> Self {
        Self {
            source,
            version,
            kind,
            next: head,
        }
    }
}

impl Iterator for AedrIter<'_> {
    type Item = Result<(u64, Aedr)>;

    fn next(&mut self) -> Option<Self::Item> {
        if is_terminal(self.next) {
            return None;
        }
        let offset = self.next;
        match Aedr::decode(self.source, self.version, offset, self.kind) {
            Ok(aedr) => {
                self.next = aedr.aedr_next;
                Some(Ok((offset, aedr)))
            }
            Err(e) => {
                self.next = NO_OFFSET;
                Some(Err(e))
            }
        }
    }
}


/// Iterates a VDR chain (either rVDR or zVDR, per `kind`). `r_num_dims` is
/// forwarded to every decode for r-variables' `DimVarys` table length.
pub struct VdrIter<'a> {
    source: &'a dyn ByteSource,
    version: FormatVersion,
    kind: VdrKind,
    r_num_dims: i32,
    next: u64,
}

impl<'a> VdrIter<'a> {
    pub fn new(
        source: &'a dyn ByteSource,
        version: FormatVersion,
        kind: VdrKind,
        r_num_dims: i32,
        head: u64,
    ) -> Self {
        Self {
            source,
            version,
            kind,
            r_num_dims,
            next: head,
        }
    }
}

impl Iterator for VdrIter<'_> {
    type Item = Result<(u64, Vdr)>;

    fn next(&mut self) -> Option<Self::Item> {
        if is_terminal(self.next) {
            return None;
        }
        let offset = self.next;
        match Vdr::decode(self.source, self.version, offset, self.kind, self.r_num_dims) {
            Ok(vdr) => {
                self.next = vdr.vdr_next;
                Some(Ok((offset, vdr)))
            }
            Err(e) => {
                self.next = NO_OFFSET;
                Some(Err(e))
            }
        }
    }
}

/// Iterates the top-level `VXR` chain from `VDR.VXRhead`. Nested VXRs
/// (reachable through an entry's `Offset[i]` rather than `VXRnext`) are
/// walked separately by the variable assembler (§4.6), which recurses
/// rather than flattening them into this iterator.
pub struct VxrIter<'a> {
    source: &'a dyn ByteSource,
    version: FormatVersion,
    next: u64,
}

impl<'a> VxrIter<'a> {
    pub fn new(source: &'a dyn ByteSource, version: FormatVersion, head: u64) -> Self {
        Self {
            source,
            version,
            next: head,
        }
    }
}

impl Iterator for VxrIter<'_> {
    type Item = Result<(u64, Vxr)>;

    fn next(&mut self) -> Option<Self::Item> {
        if is_terminal(self.next) {
            return None;
        }
        let offset = self.next;
        match Vxr::decode(self.source, self.version, offset) {
            Ok(vxr) => {
                self.next = vxr.vxr_next;
                Some(Ok((offset, vxr)))
            }
            Err(e) => {
                self.next = NO_OFFSET;
                Some(Err(e))
            }
        }
    }
}
