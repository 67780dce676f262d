// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Byte sources: uniform random-access reads over a file, a memory-mapped
//! file, or an in-memory buffer.
//!
//! The record graph and lazy variable loaders only ever talk to the
//! [`ByteSource`] trait, so the same reader code serves a memory-mapped file,
//! a CDF constructed in memory, and the virtual body produced by inflating a
//! `CCR`-compressed file (§4.3 step 4 of the design doc).
//!
//! # Ownership model
//!
//! ```text
//! ByteSource (Arc-shared)
//!   ↓
//! Reader (borrows an Arc<dyn ByteSource> for its lifetime)
//!   ↓
//! Lazy Variable loader (clones the Arc, captures it in a closure)
//! ```

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use crate::core::error::{CdfError, Result};

/// Uniform random-access read over the bytes of a CDF file.
///
/// Implementations must be cheaply shareable: the same source is held by the
/// top-level reader and by every lazy [`crate::cdf::Variable`] it hands out.
pub trait ByteSource: Send + Sync {
    /// Total length of the source in bytes.
    fn len(&self) -> usize;

    /// Whether the source is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy `len` bytes starting at `offset` into a freshly allocated vector.
    fn read_into(&self, offset: u64, len: usize) -> Result<Vec<u8>> {
        Ok(self.view(offset, len)?.to_vec())
    }

    /// Borrow `len` bytes starting at `offset`.
    fn view(&self, offset: u64, len: usize) -> Result<&[u8]>;
}

impl dyn ByteSource {
    /// Read a fixed-size big-endian array at `offset`.
    pub fn read_array<const N: usize>(&self, offset: u64) -> Result<[u8; N]> {
        let slice = self.view(offset, N)?;
        let mut buf = [0u8; N];
        buf.copy_from_slice(slice);
        Ok(buf)
    }
}

fn bounds_check(total: usize, offset: u64, len: usize) -> Result<(usize, usize)> {
    let start = usize::try_from(offset).map_err(|_| CdfError::read_out_of_range(offset, len as u64))?;
    let end = start
        .checked_add(len)
        .ok_or_else(|| CdfError::read_out_of_range(offset, len as u64))?;
    if end > total {
        return Err(CdfError::short_read(len, total.saturating_sub(start)));
    }
    Ok((start, end))
}

/// A memory-mapped file byte source.
///
/// Grounded on the teacher's `MmapArena`: owns the `memmap2::Mmap`, exposes
/// bounds-checked slicing, and never performs an unsafe lifetime transmute.
pub struct MmapArena {
    mmap: memmap2::Mmap,
    path: String,
}

impl MmapArena {
    /// Open a file and create a memory-mapped arena.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let path_str = path_ref.to_string_lossy().to_string();
        let file = File::open(path_ref)?;
        // SAFETY: the mmap is owned by this arena for its entire lifetime;
        // external modification of the backing file while mapped is the
        // caller's responsibility, same contract as `memmap2` itself.
        let mmap = unsafe { memmap2::Mmap::map(&file) }?;
        Ok(Self {
            mmap,
            path: path_str,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl ByteSource for MmapArena {
    fn len(&self) -> usize {
        self.mmap.len()
    }

    fn view(&self, offset: u64, len: usize) -> Result<&[u8]> {
        let (start, end) = bounds_check(self.mmap.len(), offset, len)?;
        Ok(&self.mmap[start..end])
    }
}

/// An in-memory byte source, used for CDFs constructed programmatically or
/// already fully loaded, and for the virtual body produced by decompressing
/// a `CCR`.
pub struct SliceArena {
    data: Vec<u8>,
}

impl SliceArena {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }
}

impl ByteSource for SliceArena {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn view(&self, offset: u64, len: usize) -> Result<&[u8]> {
        let (start, end) = bounds_check(self.data.len(), offset, len)?;
        Ok(&self.data[start..end])
    }
}

/// Shared handle to a byte source, cloned into every lazy variable loader.
pub type SharedSource = Arc<dyn ByteSource>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_arena_bounds() {
        let arena = SliceArena::new(b"hello world".to_vec());
        assert_eq!(arena.view(0, 5).unwrap(), b"hello");
        assert_eq!(arena.view(6, 5).unwrap(), b"world");
        assert!(arena.view(6, 100).is_err());
        assert!(arena.view(100, 1).is_err());
    }

    #[test]
    fn mmap_arena_roundtrip() {
        let mut path = std::env::temp_dir();
        path.push(format!("cdf_codec_arena_test_{}.tmp", std::process::id()));
        std::fs::write(&path, b"0123456789").unwrap();
        let arena = MmapArena::open(&path).unwrap();
        assert_eq!(arena.len(), 10);
        assert_eq!(arena.view(2, 3).unwrap(), b"234");
        let _ = std::fs::remove_file(&path);
    }
}
