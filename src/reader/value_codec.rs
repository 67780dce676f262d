// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Shared byte-buffer <-> [`CdfValue`] pipeline used by both attribute entry
//! decoding (§4.7) and variable payload assembly (§4.6 step 7): endian
//! decode into host order, with an optional Latin-1 -> UTF-8 transcoding
//! pass for character types (§4.5/§8 property 8).

use crate::core::error::Result;
use crate::core::types::DataType;
use crate::core::value::CdfValue;

fn decode_chunks<const N: usize, T>(
    raw: &[u8],
    big_endian: bool,
    from_be: fn([u8; N]) -> T,
    from_le: fn([u8; N]) -> T,
) -> Vec<T> {
    raw.chunks_exact(N)
        .map(|c| {
            let mut arr = [0u8; N];
            arr.copy_from_slice(c);
            if big_endian {
                from_be(arr)
            } else {
                from_le(arr)
            }
        })
        .collect()
}

/// Decode a raw byte buffer of `data_type` values. `big_endian` reflects the
/// file's `CDR.Encoding`. `row_len` is the trailing string-length dimension;
/// required (and only meaningful) for `Char`/`UChar`.
pub fn decode_values(data_type: DataType, raw: &[u8], big_endian: bool, row_len: usize) -> Result<CdfValue> {
    Ok(match data_type {
        DataType::Int1 => CdfValue::Int1(raw.iter().map(|&b| b as i8).collect()),
        DataType::Byte => CdfValue::Byte(raw.iter().map(|&b| b as i8).collect()),
        DataType::UInt1 => CdfValue::UInt1(raw.to_vec()),
        DataType::Int2 => CdfValue::Int2(decode_chunks(raw, big_endian, i16::from_be_bytes, i16::from_le_bytes)),
        DataType::UInt2 => CdfValue::UInt2(decode_chunks(raw, big_endian, u16::from_be_bytes, u16::from_le_bytes)),
        DataType::Int4 => CdfValue::Int4(decode_chunks(raw, big_endian, i32::from_be_bytes, i32::from_le_bytes)),
        DataType::UInt4 => CdfValue::UInt4(decode_chunks(raw, big_endian, u32::from_be_bytes, u32::from_le_bytes)),
        DataType::Int8 => CdfValue::Int8(decode_chunks(raw, big_endian, i64::from_be_bytes, i64::from_le_bytes)),
        DataType::Tt2000 => CdfValue::Tt2000(decode_chunks(raw, big_endian, i64::from_be_bytes, i64::from_le_bytes)),
        DataType::Real4 | DataType::Float => {
            CdfValue::Float32(decode_chunks(raw, big_endian, f32::from_be_bytes, f32::from_le_bytes))
        }
        DataType::Real8 | DataType::Double => {
            CdfValue::Float64(decode_chunks(raw, big_endian, f64::from_be_bytes, f64::from_le_bytes))
        }
        DataType::Epoch => CdfValue::Epoch(decode_chunks(raw, big_endian, f64::from_be_bytes, f64::from_le_bytes)),
        DataType::Epoch16 => {
            let flat: Vec<f64> = decode_chunks(raw, big_endian, f64::from_be_bytes, f64::from_le_bytes);
            CdfValue::Epoch16(flat.chunks_exact(2).map(|c| (c[0], c[1])).collect())
        }
        DataType::Char => CdfValue::Char {
            bytes: raw.to_vec(),
            row_len,
        },
        DataType::UChar => CdfValue::UChar {
            bytes: raw.to_vec(),
            row_len,
        },
    })
}

/// Encode a [`CdfValue`] back to its on-disk byte representation. The writer
/// always emits values in big-endian (network) order (§4.10).
pub fn encode_values(value: &CdfValue) -> Vec<u8> {
    match value {
        CdfValue::Int1(v) | CdfValue::Byte(v) => v.iter().map(|&x| x as u8).collect(),
        CdfValue::UInt1(v) => v.clone(),
        CdfValue::Int2(v) => v.iter().flat_map(|x| x.to_be_bytes()).collect(),
        CdfValue::UInt2(v) => v.iter().flat_map(|x| x.to_be_bytes()).collect(),
        CdfValue::Int4(v) => v.iter().flat_map(|x| x.to_be_bytes()).collect(),
        CdfValue::UInt4(v) => v.iter().flat_map(|x| x.to_be_bytes()).collect(),
        CdfValue::Int8(v) | CdfValue::Tt2000(v) => v.iter().flat_map(|x| x.to_be_bytes()).collect(),
        CdfValue::Float32(v) => v.iter().flat_map(|x| x.to_be_bytes()).collect(),
        CdfValue::Float64(v) | CdfValue::Epoch(v) => v.iter().flat_map(|x| x.to_be_bytes()).collect(),
        CdfValue::Epoch16(v) => v
            .iter()
            .flat_map(|(s, p)| s.to_be_bytes().into_iter().chain(p.to_be_bytes()))
            .collect(),
        CdfValue::Char { bytes, .. } | CdfValue::UChar { bytes, .. } => bytes.clone(),
    }
}

/// Latin-1 -> UTF-8 transcoding (§4.5, §8 property 8): bytes below `0x80`
/// pass through; bytes at or above it expand to a two-byte UTF-8 sequence.
pub fn latin1_to_utf8(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    for &b in bytes {
        if b < 0x80 {
            out.push(b);
        } else {
            out.push(0xC0 | (b >> 6));
            out.push(0x80 | (b & 0x3F));
        }
    }
    out
}

/// Apply [`latin1_to_utf8`] to a character value's bytes in place,
/// recomputing `row_len` for the new (possibly wider) row width.
pub fn transcode_char_value(value: &mut CdfValue) {
    match value {
        CdfValue::Char { bytes, row_len } | CdfValue::UChar { bytes, row_len } => {
            if *row_len == 0 {
                return;
            }
            let n_rows = bytes.len() / *row_len;
            let mut new_bytes = Vec::with_capacity(bytes.len());
            let mut new_row_len = 0;
            for row in bytes.chunks(*row_len) {
                let transcoded = latin1_to_utf8(row);
                new_row_len = new_row_len.max(transcoded.len());
                new_bytes.push(transcoded);
            }
            let mut packed = Vec::with_capacity(new_row_len * n_rows);
            for row in &new_bytes {
                packed.extend_from_slice(row);
                packed.resize(packed.len() + (new_row_len - row.len()), 0);
            }
            *bytes = packed;
            *row_len = new_row_len;
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_encode_int4_roundtrip() {
        let raw = 7i32.to_be_bytes();
        let value = decode_values(DataType::Int4, &raw, true, 0).unwrap();
        assert_eq!(value, CdfValue::Int4(vec![7]));
        assert_eq!(encode_values(&value), raw.to_vec());
    }

    #[test]
    fn decode_little_endian_source() {
        let raw = 7i32.to_le_bytes();
        let value = decode_values(DataType::Int4, &raw, false, 0).unwrap();
        assert_eq!(value, CdfValue::Int4(vec![7]));
    }

    #[test]
    fn latin1_law() {
        assert_eq!(latin1_to_utf8(&[0x41]), vec![0x41]);
        assert_eq!(latin1_to_utf8(&[0xE9]), vec![0xC3, 0xA9]);
    }

    #[test]
    fn char_value_row_len() {
        let value = decode_values(DataType::Char, b"hello", true, 5).unwrap();
        assert_eq!(value.as_strings().unwrap(), vec![b"hello".as_slice()]);
    }
}
