// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Fluent builder for the writer's handful of sink-relevant knobs, in the
//! teacher's `WriterBuilder` idiom (§4.10 of the design doc): a plain config
//! struct, chainable setters consuming and returning `Self`, and a terminal
//! `write_*` method that resolves the configuration and does the work.

use std::path::Path;

use crate::cdf::Cdf;
use crate::core::error::Result;
use crate::core::types::CompressionType;
use crate::record::FormatVersion;

use super::{save_to_vec, WriteOptions, DEFAULT_CHUNK_CEILING};

/// Builds a [`WriteOptions`] and writes a [`Cdf`] to a file or an in-memory
/// buffer.
#[derive(Debug, Clone)]
pub struct CdfWriterBuilder {
    opts: WriteOptions,
}

impl Default for CdfWriterBuilder {
    fn default() -> Self {
        Self {
            opts: WriteOptions::default(),
        }
    }
}

impl CdfWriterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Target wire version: v3 (64-bit offsets) unless set to v2.
    pub fn version(mut self, version: FormatVersion) -> Self {
        self.opts.version = version;
        self
    }

    /// Whole-file compression scheme. Default [`CompressionType::None`].
    /// Per-variable compression is set independently through
    /// [`crate::cdf::Cdf::add_variable`].
    pub fn body_compression(mut self, kind: CompressionType) -> Self {
        self.opts.body_compression = kind;
        self
    }

    /// Ceiling, in bytes, on a single raw `VVR`/`CVVR` block (§9 item 3).
    /// Defaults to [`DEFAULT_CHUNK_CEILING`].
    pub fn chunk_ceiling(mut self, bytes: usize) -> Self {
        self.opts.chunk_ceiling = bytes.max(1);
        self
    }

    /// Serialise `cdf` to an in-memory buffer.
    pub fn write_to_vec(self, cdf: &Cdf) -> Result<Vec<u8>> {
        save_to_vec(cdf, &self.opts)
    }

    /// Serialise `cdf` to a file at `path`.
    pub fn write_to_file<P: AsRef<Path>>(self, cdf: &Cdf, path: P) -> Result<()> {
        let bytes = self.write_to_vec(cdf)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_write_options_default() {
        let builder = CdfWriterBuilder::new();
        assert!(builder.opts.version.is_v3);
        assert_eq!(builder.opts.chunk_ceiling, DEFAULT_CHUNK_CEILING);
        assert_eq!(builder.opts.body_compression, CompressionType::None);
    }

    #[test]
    fn fluent_setters_compose() {
        let builder = CdfWriterBuilder::new()
            .body_compression(CompressionType::Gzip)
            .chunk_ceiling(4096);
        assert_eq!(builder.opts.body_compression, CompressionType::Gzip);
        assert_eq!(builder.opts.chunk_ceiling, 4096);
    }
}
