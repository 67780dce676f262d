// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Uniform compress/decompress adapter over the body- and per-variable
//! compression schemes the format supports: `gzip` (via `flate2`), the
//! format's own `rle`, and optional `zstd` (via the `zstd` cargo feature).
//! `huff`/`ahuff` are recognised as enum values but have no decoder anywhere
//! in the ecosystem, so encountering them is always `UnsupportedCompression`
//! (§9 open question 2 of the design doc).

pub mod rle;

use std::io::{Read, Write};

use crate::core::error::{CdfError, Result};
use crate::core::types::CompressionType;

/// Inflate `input`, which is expected to expand to exactly `expected_len`
/// bytes once decompressed.
pub fn inflate(kind: CompressionType, input: &[u8], expected_len: usize) -> Result<Vec<u8>> {
    let out = match kind {
        CompressionType::None => input.to_vec(),
        CompressionType::Rle => rle::inflate(input)?,
        CompressionType::Gzip => {
            let mut decoder = flate2::read::GzDecoder::new(input);
            let mut out = Vec::with_capacity(expected_len);
            decoder
                .read_to_end(&mut out)
                .map_err(|e| CdfError::bad_compressed_data(e.to_string()))?;
            out
        }
        CompressionType::Zstd => zstd_inflate(input, expected_len)?,
    };
    if out.len() != expected_len {
        return Err(CdfError::bad_compressed_data(format!(
            "expected {expected_len} bytes after inflation, got {}",
            out.len()
        )));
    }
    Ok(out)
}

/// Deflate `input` using `kind`.
pub fn deflate(kind: CompressionType, input: &[u8]) -> Result<Vec<u8>> {
    Ok(match kind {
        CompressionType::None => input.to_vec(),
        CompressionType::Rle => rle::deflate(input),
        CompressionType::Gzip => {
            let mut encoder =
                flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
            encoder
                .write_all(input)
                .map_err(|e| CdfError::bad_compressed_data(e.to_string()))?;
            encoder
                .finish()
                .map_err(|e| CdfError::bad_compressed_data(e.to_string()))?
        }
        CompressionType::Zstd => zstd_deflate(input)?,
    })
}

#[cfg(feature = "zstd")]
fn zstd_inflate(input: &[u8], expected_len: usize) -> Result<Vec<u8>> {
    zstd::bulk::decompress(input, expected_len)
        .map_err(|e| CdfError::bad_compressed_data(e.to_string()))
}

#[cfg(not(feature = "zstd"))]
fn zstd_inflate(_input: &[u8], _expected_len: usize) -> Result<Vec<u8>> {
    Err(CdfError::UnsupportedCompression {
        c_type: CompressionType::Zstd.code(),
    })
}

#[cfg(feature = "zstd")]
fn zstd_deflate(input: &[u8]) -> Result<Vec<u8>> {
    zstd::bulk::compress(input, 0).map_err(|e| CdfError::bad_compressed_data(e.to_string()))
}

#[cfg(not(feature = "zstd"))]
fn zstd_deflate(_input: &[u8]) -> Result<Vec<u8>> {
    Err(CdfError::UnsupportedCompression {
        c_type: CompressionType::Zstd.code(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gzip_roundtrip() {
        let input = b"the quick brown fox jumps over the lazy dog".repeat(4);
        let deflated = deflate(CompressionType::Gzip, &input).unwrap();
        let inflated = inflate(CompressionType::Gzip, &deflated, input.len()).unwrap();
        assert_eq!(inflated, input);
    }

    #[test]
    fn rle_roundtrip_through_adapter() {
        let input = vec![0, 0, 0, 1, 2, 0, 0];
        let deflated = deflate(CompressionType::Rle, &input).unwrap();
        let inflated = inflate(CompressionType::Rle, &deflated, input.len()).unwrap();
        assert_eq!(inflated, input);
    }

    #[test]
    fn none_is_identity() {
        let input = vec![9, 8, 7];
        let deflated = deflate(CompressionType::None, &input).unwrap();
        assert_eq!(deflated, input);
        let inflated = inflate(CompressionType::None, &deflated, input.len()).unwrap();
        assert_eq!(inflated, input);
    }

    #[test]
    fn gzip_length_mismatch_is_bad_compressed_data() {
        let input = b"some data".to_vec();
        let deflated = deflate(CompressionType::Gzip, &input).unwrap();
        assert!(inflate(CompressionType::Gzip, &deflated, input.len() + 1).is_err());
    }
}
