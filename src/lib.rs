// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # cdf-codec
//!
//! Reads and writes files in the Common Data Format (CDF): a self-describing
//! binary container used across space-physics archives to hold
//! multi-dimensional labelled arrays alongside hierarchical metadata.
//!
//! The on-disk layout is a graph of fixed-shape descriptor records linked by
//! absolute byte offsets, interleaved with the opaque value records holding
//! each variable's payload. A file may be stored uncompressed or as a single
//! whole-body compressed blob, and individual variables may carry their own
//! per-variable compression independent of that.
//!
//! ## Reading
//!
//! ```rust,no_run
//! # fn main() -> cdf_codec::Result<()> {
//! let cdf = cdf_codec::load(std::path::Path::new("data.cdf"), false, true)?;
//! for name in cdf.variables.keys() {
//!     println!("{name}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Writing
//!
//! ```rust,no_run
//! # fn main() -> cdf_codec::Result<()> {
//! use cdf_codec::core::types::{CompressionType, DataType};
//! use cdf_codec::core::value::CdfValue;
//! use cdf_codec::cdf::Cdf;
//!
//! let mut cdf = Cdf::empty();
//! cdf.add_variable(
//!     "X",
//!     DataType::Int4,
//!     vec![5],
//!     1,
//!     true,
//!     CompressionType::None,
//!     CdfValue::Int4(vec![1, 2, 3, 4, 5]),
//! )?;
//! cdf_codec::save(&cdf, "out.cdf")?;
//! # Ok(())
//! # }
//! ```

// Core types: error, primitive type codes, decoded value storage.
pub mod core;

// Re-export the crate's single error channel for convenience.
pub use core::error::{CdfError, Result};
pub use core::types::{AttrScope, CompressionType, DataType, Majority};
pub use core::value::CdfValue;

// Byte-source abstraction shared by the reader and lazy variable loaders.
pub mod io;

pub use io::{ByteSource, MmapArena, SharedSource, SliceArena};

// The on-disk record catalogue: field layouts and the big-endian cursor.
pub mod record;

pub use record::FormatVersion;

// Uniform compress/decompress adapter (gzip, the format's own rle, zstd).
pub mod compress;

// Top-level load pipeline: magic detection, descriptor-graph assembly.
pub mod reader;

pub use reader::{load, open};

// Symmetric writer: build, size, layout, link, emit.
pub mod writer;

pub use writer::builder::CdfWriterBuilder;
pub use writer::{save, save_to_vec, WriteOptions};

// The high-level CDF container: attributes, variables, insertion order.
pub mod cdf;

pub use cdf::{Attribute, Cdf, Variable};
