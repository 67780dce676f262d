// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Magic-byte detection and version dispatch (§4.3 steps 1-3).
//!
//! `magic1`'s top 12 bits name the format family (`0xCDF`); the next nibble
//! is the major version, the following byte the minor. `major >= 3` selects
//! the v3 (64-bit offset) layout. `magic2` distinguishes an uncompressed body
//! from one wrapped in a whole-file `CCR`/`CPR`.

use crate::core::error::{CdfError, Result};
use crate::io::ByteSource;
use crate::record::cursor::Decoder;
use crate::record::FormatVersion;

const FAMILY_MASK: u32 = 0xFFF0_0000;
const FAMILY_TAG: u32 = 0xCDF0_0000;
const MAGIC_UNCOMPRESSED: u32 = 0x0000_FFFF;
const MAGIC_COMPRESSED: u32 = 0xCCCC_0001;

pub struct DetectedHeader {
    pub version: FormatVersion,
    pub compressed: bool,
    pub magic_bytes: [u8; 8],
}

/// Read and validate the 8-byte magic at offset 0, deriving the file's
/// [`FormatVersion`] (`release` not yet known; filled in once `CDR` is
/// decoded) and whether the body is whole-file compressed.
pub fn detect_header(source: &dyn ByteSource) -> Result<DetectedHeader> {
    let magic_bytes: [u8; 8] = source.read_array(0)?;
    let mut cur = Decoder::new(&magic_bytes);
    let magic1 = cur.read_u32()?;
    let magic2 = cur.read_u32()?;

    if magic1 & FAMILY_MASK != FAMILY_TAG {
        return Err(CdfError::NotACdf);
    }
    let major = ((magic1 >> 16) & 0xF) as i32;
    let minor = ((magic1 >> 8) & 0xFF) as i32;
    if !(2..=3).contains(&major) {
        return Err(CdfError::UnsupportedVersion { magic: magic1 });
    }
    let compressed = match magic2 {
        MAGIC_UNCOMPRESSED => false,
        MAGIC_COMPRESSED => true,
        _ => return Err(CdfError::NotACdf),
    };

    Ok(DetectedHeader {
        version: FormatVersion {
            major,
            minor,
            release: 0,
            is_v3: major >= 3,
        },
        compressed,
        magic_bytes,
    })
}

/// Build the 8-byte magic for a given version/compression combination, the
/// inverse of [`detect_header`]'s parse.
pub fn encode_magic(version: FormatVersion, compressed: bool) -> [u8; 8] {
    let magic1 = FAMILY_TAG | ((version.major as u32 & 0xF) << 16) | ((version.minor as u32 & 0xFF) << 8);
    let magic2 = if compressed { MAGIC_COMPRESSED } else { MAGIC_UNCOMPRESSED };
    let mut out = [0u8; 8];
    out[0..4].copy_from_slice(&magic1.to_be_bytes());
    out[4..8].copy_from_slice(&magic2.to_be_bytes());
    out
}
