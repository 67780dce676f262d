// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CDF Descriptor Record: the file's sole entry point, anchoring the `GDR`.

use crate::core::error::Result;
use crate::io::ByteSource;
use crate::record::cursor::{Decoder, Encoder};
use crate::record::{expect_header, header_width, write_header, FormatVersion, RecordType};

/// The `CDR`, always the first record after the 8-byte magic.
#[derive(Debug, Clone)]
pub struct Cdr {
    pub gdr_offset: u64,
    pub version: i32,
    pub release: i32,
    pub encoding: i32,
    pub flags: i32,
    pub increment: i32,
    pub identifier: i32,
    pub copyright: String,
}

/// `CDR.Flags` bit 0: the file's variables are stored row-major.
pub const FLAG_ROW_MAJOR: i32 = 1 << 0;
/// `CDR.Flags` bit 1: a single (possibly trailing) checksum is present.
pub const FLAG_MD5_CHECKSUM: i32 = 1 << 2;

impl Cdr {
    pub fn decode(source: &dyn ByteSource, version: FormatVersion, offset: u64) -> Result<Self> {
        let header = expect_header(source, version, offset, "CDR", |t| {
            matches!(t, RecordType::Cdr)
        })?;
        let raw = source.read_into(offset, header.record_size as usize)?;
        let mut cur = Decoder::new(&raw);
        cur.skip(header_width(version))?;
        let gdr_offset = cur.read_offset(version.is_v3)?;
        let cdr_version = cur.read_i32()?;
        let release = cur.read_i32()?;
        let encoding = cur.read_i32()?;
        let flags = cur.read_i32()?;
        cur.skip(4)?; // rfuA
        cur.skip(4)?; // rfuB
        let increment = cur.read_i32()?;
        let identifier = cur.read_i32()?;
        cur.skip(4)?; // rfuE, always -1
        // Copyright's length depends on `release`, which this record itself
        // carries; the version passed in may not have it filled yet (the
        // top-level header parse doesn't know it until CDR is decoded).
        let resolved = FormatVersion { release, ..version };
        let copyright = cur.read_fixed_string(resolved.copyright_len())?;
        Ok(Cdr {
            gdr_offset,
            version: cdr_version,
            release,
            encoding,
            flags,
            increment,
            identifier,
            copyright,
        })
    }

    pub fn is_row_major(&self) -> bool {
        self.flags & FLAG_ROW_MAJOR != 0
    }

    pub fn encoded_size(&self, version: FormatVersion) -> usize {
        let resolved = FormatVersion { release: self.release, ..version };
        header_width(version) + version.offset_width() + 4 * 7 + resolved.copyright_len()
    }

    pub fn encode(&self, version: FormatVersion) -> Encoder {
        let resolved = FormatVersion { release: self.release, ..version };
        let mut enc = Encoder::with_capacity(self.encoded_size(version));
        write_header(&mut enc, version, self.encoded_size(version) as u64, RecordType::Cdr);
        enc.write_offset(self.gdr_offset, version.is_v3);
        enc.write_i32(self.version);
        enc.write_i32(self.release);
        enc.write_i32(self.encoding);
        enc.write_i32(self.flags);
        enc.write_i32(0);
        enc.write_i32(0);
        enc.write_i32(self.increment);
        enc.write_i32(self.identifier);
        enc.write_i32(-1);
        enc.write_fixed_string(&self.copyright, resolved.copyright_len());
        enc
    }
}
