// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Tests for the byte-source layer used by both the mmap-backed and the
//! in-memory (whole-body-decompressed) reader paths.

use std::fs::File;
use std::io::Write;

use cdf_codec::{ByteSource, MmapArena, SliceArena};

fn temp_file(name: &str, contents: &[u8]) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!(
        "cdf_codec_io_test_{}_{}",
        std::process::id(),
        name
    ));
    let mut file = File::create(&path).unwrap();
    file.write_all(contents).unwrap();
    file.sync_all().unwrap();
    path
}

#[test]
fn mmap_arena_reads_full_file() {
    let path = temp_file("mmap.bin", b"hello cdf world");
    let arena = MmapArena::open(&path).unwrap();
    assert_eq!(arena.len(), 15);
    assert!(!arena.is_empty());

    assert_eq!(arena.read_into(0, 5).unwrap(), b"hello");
    assert_eq!(arena.view(6, 3).unwrap(), b"cdf");

    let _ = std::fs::remove_file(&path);
}

#[test]
fn mmap_arena_read_out_of_range_errors() {
    let path = temp_file("mmap_oob.bin", b"tiny");
    let arena = MmapArena::open(&path).unwrap();
    assert!(arena.read_into(0, 16).is_err());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn slice_arena_mirrors_byte_source_contract() {
    let arena = SliceArena::new(b"in memory body".to_vec());
    assert_eq!(arena.len(), 14);
    assert_eq!(arena.view(3, 6).unwrap(), b"memory");
    assert_eq!(arena.read_into(0, 2).unwrap(), b"in");
}

#[test]
fn slice_arena_empty_reports_empty() {
    let arena = SliceArena::new(Vec::new());
    assert!(arena.is_empty());
    assert_eq!(arena.len(), 0);
}
