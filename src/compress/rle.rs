// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! The format's own run-length scheme for zero bytes: `0x00, n` expands to
//! `n + 1` zero bytes; every other byte is a literal (§4.8 of the design
//! doc). Grounded on CDFpp's `cdf::io::rle`, with one deliberate deviation:
//! the deflate side caps each emitted run at 256 zeros instead of letting the
//! count byte wrap past 255, since the spec calls out a 256-byte cap and an
//! unbounded run would silently corrupt data on decode.

use crate::core::error::{CdfError, Result};

const MAX_RUN: usize = 256;

pub fn inflate(input: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        let b = input[i];
        if b == 0 {
            let n = *input
                .get(i + 1)
                .ok_or_else(|| CdfError::bad_compressed_data("truncated RLE run"))?;
            out.resize(out.len() + n as usize + 1, 0);
            i += 2;
        } else {
            out.push(b);
            i += 1;
        }
    }
    Ok(out)
}

pub fn deflate(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        if input[i] == 0 {
            let mut run = 1;
            while run < MAX_RUN && i + run < input.len() && input[i + run] == 0 {
                run += 1;
            }
            out.push(0);
            out.push((run - 1) as u8);
            i += run;
        } else {
            out.push(input[i]);
            i += 1;
        }
    }
    out
}
