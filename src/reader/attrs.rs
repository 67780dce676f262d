// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Attribute assembly (§4.5 of the design doc): walk the `ADR` chain and, for
//! each attribute, either its ordered global-entry list or its per-variable
//! entry map, depending on scope.

use std::collections::HashMap;

use crate::cdf::attribute::Attribute;
use crate::core::error::Result;
use crate::io::ByteSource;
use crate::record::aedr::EntryKind;
use crate::record::cursor::NO_OFFSET;
use crate::record::FormatVersion;
use crate::reader::iter::{AdrIter, AedrIter};
use crate::reader::value_codec::{decode_values, transcode_char_value};

/// One ADR's assembled contents: either a global attribute's ordered entry
/// list, or a variable attribute's per-variable-index value map.
pub enum AssembledAttribute {
    Global(Attribute),
    PerVariable {
        name: String,
        by_var: HashMap<i32, Attribute>,
    },
}

/// Assemble every attribute reachable from `GDR.ADRhead`, in discovery order.
pub fn assemble_attributes(
    source: &dyn ByteSource,
    version: FormatVersion,
    adr_head: u64,
    big_endian: bool,
    utf8_transcode: bool,
) -> Result<Vec<AssembledAttribute>> {
    let mut out = Vec::new();
    for entry in AdrIter::new(source, version, adr_head) {
        let (_, adr) = entry?;
        if adr.scope.is_global() {
            let mut values = Vec::new();
            for aedr_entry in AedrIter::new(source, version, EntryKind::Gr, adr.agredr_head) {
                let (_, aedr) = aedr_entry?;
                let row_len = if aedr.data_type.is_string() {
                    aedr.num_elements.max(0) as usize
                } else {
                    0
                };
                let mut value = decode_values(aedr.data_type, &aedr.value, big_endian, row_len)?;
                if utf8_transcode && aedr.data_type.is_string() {
                    transcode_char_value(&mut value);
                }
                values.push(value);
            }
            out.push(AssembledAttribute::Global(Attribute {
                name: adr.name,
                scope: adr.scope,
                entries: values,
            }));
        } else {
            let kind = if adr.azedr_head != 0 && adr.azedr_head != NO_OFFSET {
                EntryKind::Z
            } else {
                EntryKind::Gr
            };
            let head = if kind == EntryKind::Z {
                adr.azedr_head
            } else {
                adr.agredr_head
            };
            let mut by_var: HashMap<i32, Attribute> = HashMap::new();
            let mut last_offset: HashMap<i32, u64> = HashMap::new();
            for aedr_entry in AedrIter::new(source, version, kind, head) {
                let (offset, aedr) = aedr_entry?;
                let row_len = if aedr.data_type.is_string() {
                    aedr.num_elements.max(0) as usize
                } else {
                    0
                };
                let mut value = decode_values(aedr.data_type, &aedr.value, big_endian, row_len)?;
                if utf8_transcode && aedr.data_type.is_string() {
                    transcode_char_value(&mut value);
                }
                if let Some(prev_offset) = last_offset.get(&aedr.num) {
                    tracing::warn!(
                        attribute = %adr.name,
                        variable = aedr.num,
                        previous_entry_offset = prev_offset,
                        colliding_entry_offset = offset,
                        "variable attribute entry collision, later entry wins"
                    );
                }
                last_offset.insert(aedr.num, offset);
                by_var.insert(
                    aedr.num,
                    Attribute {
                        name: adr.name.clone(),
                        scope: adr.scope,
                        entries: vec![value],
                    },
                );
            }
            out.push(AssembledAttribute::PerVariable {
                name: adr.name,
                by_var,
            });
        }
    }
    Ok(out)
}
