// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! A decoded variable: its shape/type/compression metadata plus either an
//! already-decoded value buffer (eager loading) or a deferred loader that
//! performs the full §4.6 assembly pipeline on first access (lazy loading).
//!
//! The `Pending(Loader) -> Ready(buffer)` transition of §9's design note is
//! expressed with `std::sync::OnceLock` rather than a hand-rolled sum type:
//! the teacher reaches for `OnceLock` for exactly this one-time,
//! read-mostly initialization shape (its schema registry and arena pool
//! globals), so a per-instance `OnceLock` is the idiomatic equivalent here.
//! A racing pair of first touches would each run the assembly pipeline and
//! only the first `set` wins — safe, if wasteful, which is a strictly
//! stronger guarantee than the "caller must serialize first touch" contract
//! this crate documents.

use std::sync::OnceLock;

use crate::cdf::indexed_map::IndexedMap;
use crate::core::error::Result;
use crate::core::types::{CompressionType, DataType};
use crate::core::value::CdfValue;
use crate::io::SharedSource;
use crate::record::cdr::Cdr;
use crate::record::vdr::Vdr;
use crate::record::FormatVersion;

/// Everything a deferred loader needs to run §4.6 without touching the
/// high-level container again.
pub struct LazyContext {
    pub source: SharedSource,
    pub version: FormatVersion,
    pub vdr: Vdr,
    /// `GDR.rDimSizes`, needed only when `vdr.kind` is `VdrKind::R`.
    pub r_dim_sizes: Vec<i32>,
    pub big_endian: bool,
    pub row_major: bool,
    pub utf8_transcode: bool,
}

pub struct Variable {
    pub data_type: DataType,
    pub shape: Vec<usize>,
    pub record_count: usize,
    pub is_nrv: bool,
    pub compression: CompressionType,
    /// This variable's variable-scoped attribute entries, keyed by attribute
    /// name. Populated after construction by the loader/builder; excluded
    /// from equality (§4.11 only compares name/shape/compression/nrv/type/bytes).
    pub attribute_values: IndexedMap<CdfValue>,
    cell: OnceLock<CdfValue>,
    loader: Option<LazyContext>,
}

impl Variable {
    pub fn eager(
        data_type: DataType,
        shape: Vec<usize>,
        record_count: usize,
        is_nrv: bool,
        compression: CompressionType,
        value: CdfValue,
    ) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(value);
        Self {
            data_type,
            shape,
            record_count,
            is_nrv,
            compression,
            attribute_values: IndexedMap::new(),
            cell,
            loader: None,
        }
    }

    pub fn lazy(
        data_type: DataType,
        shape: Vec<usize>,
        record_count: usize,
        is_nrv: bool,
        compression: CompressionType,
        loader: LazyContext,
    ) -> Self {
        Self {
            data_type,
            shape,
            record_count,
            is_nrv,
            compression,
            attribute_values: IndexedMap::new(),
            cell: OnceLock::new(),
            loader: Some(loader),
        }
    }

    /// Attach this variable's variable-scoped attribute entries. Called by
    /// the loader/builder after construction, once the entries are known.
    pub fn set_attribute_values(&mut self, attrs: IndexedMap<CdfValue>) {
        self.attribute_values = attrs;
    }

    /// The decoded value buffer, materialising it on first call if this
    /// variable was loaded lazily.
    pub fn values(&self) -> Result<&CdfValue> {
        if let Some(v) = self.cell.get() {
            return Ok(v);
        }
        let ctx = self
            .loader
            .as_ref()
            .expect("eager variable is always pre-populated");
        let value = crate::reader::variable::assemble(ctx)?;
        let _ = self.cell.set(value);
        Ok(self.cell.get().expect("value was just set"))
    }

    /// Raw byte length of the assembled buffer (§8 property 5's shape law).
    pub fn byte_len(&self) -> Result<usize> {
        Ok(self.values()?.byte_len())
    }

    pub fn is_materialised(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl std::fmt::Debug for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Variable")
            .field("data_type", &self.data_type)
            .field("shape", &self.shape)
            .field("record_count", &self.record_count)
            .field("is_nrv", &self.is_nrv)
            .field("compression", &self.compression)
            .field("materialised", &self.is_materialised())
            .finish()
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.data_type == other.data_type
            && self.shape == other.shape
            && self.is_nrv == other.is_nrv
            && self.compression == other.compression
            && self.values().ok() == other.values().ok()
    }
}

/// Whether `CDR.Encoding` denotes a big-endian value encoding (§6.1). Every
/// code not in the known big-endian set is treated as little-endian,
/// matching CDFpp's `is_big_endian_encoding`/`is_little_endian_encoding`
/// pair (network=1, SUN=2, NeXT=12, PPC=9, SGi=5, IBMRS=7, ARM_BIG=18).
pub fn encoding_is_big_endian(encoding: i32) -> bool {
    matches!(encoding, 1 | 2 | 5 | 7 | 9 | 12 | 18)
}

pub fn big_endian_from_cdr(cdr: &Cdr) -> bool {
    encoding_is_big_endian(cdr.encoding)
}
