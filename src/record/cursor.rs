// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! A sequential big-endian field cursor, used to decode and encode every
//! record kind.
//!
//! Unlike a general-purpose wire cursor, CDF descriptor fields have no
//! alignment padding and are always big-endian regardless of the variable
//! payload's declared encoding (§4.2 of the design doc), so this cursor is
//! considerably simpler than a CDR-style cursor: no origin stack, no
//! endianness flag, just a moving read/write position.

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::Cursor as IoCursor;

use crate::core::error::{CdfError, Result};

/// Sequential big-endian reader over a borrowed byte slice.
pub struct Decoder<'a> {
    inner: IoCursor<&'a [u8]>,
    len: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            len: data.len(),
            inner: IoCursor::new(data),
        }
    }

    pub fn position(&self) -> u64 {
        self.inner.position()
    }

    fn check(&self, n: usize) -> Result<()> {
        let available = self.len.saturating_sub(self.inner.position() as usize);
        if available < n {
            return Err(CdfError::short_read(n, available));
        }
        Ok(())
    }

    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.check(n)?;
        self.inner.set_position(self.inner.position() + n as u64);
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.check(1)?;
        Ok(self.inner.read_u8()?)
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        self.check(1)?;
        Ok(self.inner.read_i8()?)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.check(2)?;
        Ok(self.inner.read_u16::<BigEndian>()?)
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        self.check(2)?;
        Ok(self.inner.read_i16::<BigEndian>()?)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.check(4)?;
        Ok(self.inner.read_u32::<BigEndian>()?)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.check(4)?;
        Ok(self.inner.read_i32::<BigEndian>()?)
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        self.check(8)?;
        Ok(self.inner.read_u64::<BigEndian>()?)
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        self.check(8)?;
        Ok(self.inner.read_i64::<BigEndian>()?)
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        self.check(4)?;
        Ok(self.inner.read_f32::<BigEndian>()?)
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        self.check(8)?;
        Ok(self.inner.read_f64::<BigEndian>()?)
    }

    /// Read an offset field: 32-bit when `is_v3` is false, 64-bit otherwise.
    /// `-1` (all-ones) is preserved as `u64::MAX` so callers can test for the
    /// "none" sentinel uniformly across versions.
    pub fn read_offset(&mut self, is_v3: bool) -> Result<u64> {
        if is_v3 {
            let raw = self.read_i64()?;
            Ok(raw as u64)
        } else {
            let raw = self.read_i32()?;
            Ok(raw as i64 as u64)
        }
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        self.check(n)?;
        let mut buf = vec![0u8; n];
        std::io::Read::read_exact(&mut self.inner, &mut buf)?;
        Ok(buf)
    }

    /// Read a fixed-width NUL-terminated/padded string field.
    pub fn read_fixed_string(&mut self, max_len: usize) -> Result<String> {
        let bytes = self.read_bytes(max_len)?;
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        Ok(String::from_utf8_lossy(&bytes[..end]).into_owned())
    }

    pub fn remaining(&self) -> usize {
        self.len.saturating_sub(self.inner.position() as usize)
    }
}

/// Sequential big-endian writer building an owned byte buffer.
pub struct Encoder {
    inner: Vec<u8>,
}

impl Encoder {
    pub fn new() -> Self {
        Self { inner: Vec::new() }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            inner: Vec::with_capacity(cap),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.inner
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn write_u8(&mut self, v: u8) {
        self.inner.push(v);
    }

    pub fn write_i8(&mut self, v: i8) {
        let _ = self.inner.write_i8(v);
    }

    pub fn write_u16(&mut self, v: u16) {
        let _ = self.inner.write_u16::<BigEndian>(v);
    }

    pub fn write_i16(&mut self, v: i16) {
        let _ = self.inner.write_i16::<BigEndian>(v);
    }

    pub fn write_u32(&mut self, v: u32) {
        let _ = self.inner.write_u32::<BigEndian>(v);
    }

    pub fn write_i32(&mut self, v: i32) {
        let _ = self.inner.write_i32::<BigEndian>(v);
    }

    pub fn write_u64(&mut self, v: u64) {
        let _ = self.inner.write_u64::<BigEndian>(v);
    }

    pub fn write_i64(&mut self, v: i64) {
        let _ = self.inner.write_i64::<BigEndian>(v);
    }

    pub fn write_f32(&mut self, v: f32) {
        let _ = self.inner.write_f32::<BigEndian>(v);
    }

    pub fn write_f64(&mut self, v: f64) {
        let _ = self.inner.write_f64::<BigEndian>(v);
    }

    /// Write an offset field, sized according to the format version.
    /// `u64::MAX` (the sentinel produced by [`Decoder::read_offset`]) is
    /// written back out as `-1`.
    pub fn write_offset(&mut self, v: u64, is_v3: bool) {
        if is_v3 {
            self.write_i64(v as i64);
        } else {
            self.write_i32(v as i64 as i32);
        }
    }

    pub fn write_bytes(&mut self, data: &[u8]) {
        self.inner.extend_from_slice(data);
    }

    /// Write a string field, truncated or NUL-padded to exactly `max_len` bytes.
    pub fn write_fixed_string(&mut self, s: &str, max_len: usize) {
        let bytes = s.as_bytes();
        let n = bytes.len().min(max_len);
        self.inner.extend_from_slice(&bytes[..n]);
        self.inner.resize(self.inner.len() + (max_len - n), 0);
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Offset-or-`-1` sentinel shared by every `next`/`head`/`tail` style field.
pub const NO_OFFSET: u64 = u64::MAX;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_scalars() {
        let mut enc = Encoder::new();
        enc.write_i32(-7);
        enc.write_u64(42);
        enc.write_fixed_string("hi", 8);
        let bytes = enc.into_bytes();
        let mut dec = Decoder::new(&bytes);
        assert_eq!(dec.read_i32().unwrap(), -7);
        assert_eq!(dec.read_u64().unwrap(), 42);
        assert_eq!(dec.read_fixed_string(8).unwrap(), "hi");
    }

    #[test]
    fn offset_sentinel_roundtrips() {
        let mut enc = Encoder::new();
        enc.write_offset(NO_OFFSET, true);
        let bytes = enc.into_bytes();
        let mut dec = Decoder::new(&bytes);
        assert_eq!(dec.read_offset(true).unwrap(), NO_OFFSET);
    }

    #[test]
    fn short_read_errors() {
        let bytes = [0u8; 2];
        let mut dec = Decoder::new(&bytes);
        assert!(dec.read_u32().is_err());
    }
}
