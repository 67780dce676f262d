// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Byte-source abstraction shared by the reader and the lazy variable loader.

pub mod arena;

pub use arena::{ByteSource, MmapArena, SharedSource, SliceArena};
