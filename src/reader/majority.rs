// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Row-major <-> column-major per-record transposition (§4.9).
//!
//! Reading a column-major file means: for every element, decode its linear
//! position under column-major strides (first axis fastest) to recover its
//! multi-index, then re-encode that multi-index under row-major strides
//! (last axis fastest) to get its position in the in-memory buffer. That map
//! is a bijection but, for non-square shapes of three or more axes, is *not*
//! its own inverse — the opposite direction (row-major source, column-major
//! target) decodes and encodes with the strides swapped, which is a
//! different permutation in general. [`invert_permutation`] produces the
//! matching permutation for the opposite direction from the one this module
//! builds, so §8 property 6 ("flipping majority twice is the identity")
//! holds for the forward/inverse *pair*, not for reapplying one permutation
//! twice.

/// Strides for row-major (last axis varies fastest) linearisation of `dims`.
fn row_strides(dims: &[usize]) -> Vec<usize> {
    let k = dims.len();
    let mut s = vec![1usize; k];
    for i in (0..k.saturating_sub(1)).rev() {
        s[i] = s[i + 1] * dims[i + 1];
    }
    s
}

/// Strides for column-major (first axis varies fastest) linearisation of `dims`.
fn col_strides(dims: &[usize]) -> Vec<usize> {
    let k = dims.len();
    let mut s = vec![1usize; k];
    for i in 1..k {
        s[i] = s[i - 1] * dims[i - 1];
    }
    s
}

/// Decode `idx` into per-axis coordinates under `strides`. Axes are visited
/// from largest stride to smallest so the division/modulo pair extracts
/// digits correctly regardless of whether `strides` itself is ascending
/// (column-major) or descending (row-major).
fn decode_coords(idx: usize, strides: &[usize]) -> Vec<usize> {
    let k = strides.len();
    let mut axes: Vec<usize> = (0..k).collect();
    axes.sort_by(|&a, &b| strides[b].cmp(&strides[a]));
    let mut coords = vec![0usize; k];
    let mut rem = idx;
    for axis in axes {
        coords[axis] = rem / strides[axis];
        rem %= strides[axis];
    }
    coords
}

fn encode_coords(coords: &[usize], strides: &[usize]) -> usize {
    coords.iter().zip(strides).map(|(c, s)| c * s).sum()
}

/// Build the permutation `perm` such that `perm[i]` is the row-major
/// position that on-disk column-major position `i` belongs at, for a record
/// shaped `dims` (each entry counted in "units", not bytes). This is the
/// read-direction transform (§4.6 step 8): decode under the source
/// (column-major) strides, re-encode under the target (row-major) strides.
fn build_permutation(dims: &[usize]) -> Vec<usize> {
    let row = row_strides(dims);
    let col = col_strides(dims);
    let n: usize = dims.iter().product();
    (0..n)
        .map(|src| encode_coords(&decode_coords(src, &col), &row))
        .collect()
}

/// Invert a permutation: `invert_permutation(perm)[perm[i]] == i`. Gives the
/// matching opposite-direction (row-major source, column-major target)
/// transform from the one [`build_permutation`] builds.
fn invert_permutation(perm: &[usize]) -> Vec<usize> {
    let mut inv = vec![0usize; perm.len()];
    for (src, &dst) in perm.iter().enumerate() {
        inv[dst] = src;
    }
    inv
}

fn apply_permutation(record: &mut [u8], perm: &[usize], unit_size: usize) {
    let mut tmp = vec![0u8; record.len()];
    for (src, &dst) in perm.iter().enumerate() {
        let s = src * unit_size;
        let d = dst * unit_size;
        tmp[d..d + unit_size].copy_from_slice(&record[s..s + unit_size]);
    }
    record.copy_from_slice(&tmp);
}

/// Transpose one record in place from column-major storage order to
/// row-major storage order. `dims` is the record's shape (excluding the
/// leading record axis and, for strings, excluding the trailing character
/// axis); `unit_size` is the byte width of one leaf element (`sizeof(type)`
/// for numerics, the string row length for characters).
pub fn transpose_record(record: &mut [u8], dims: &[usize], unit_size: usize) {
    if dims.len() < 2 || unit_size == 0 {
        return;
    }
    apply_permutation(record, &build_permutation(dims), unit_size);
}

/// Transpose every record of a flat multi-record buffer in place, from
/// column-major to row-major (see [`transpose_record`]).
pub fn transpose_all(buf: &mut [u8], record_count: usize, dims: &[usize], unit_size: usize) {
    if dims.len() < 2 || unit_size == 0 || record_count == 0 {
        return;
    }
    let record_len: usize = dims.iter().product::<usize>() * unit_size;
    for record in buf.chunks_exact_mut(record_len).take(record_count) {
        transpose_record(record, dims, unit_size);
    }
}
