// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! The high-level CDF container (§4.11): insertion-ordered attribute and
//! variable maps plus the handful of file-level scalars, built by the reader
//! and consumed by the writer.

pub mod attribute;
pub mod indexed_map;
pub mod variable;

pub use attribute::Attribute;
pub use indexed_map::IndexedMap;
pub use variable::Variable;

use crate::core::error::{CdfError, Result};
use crate::core::types::{AttrScope, CompressionType, DataType, Majority};
use crate::core::value::CdfValue;

/// A fully decoded (or lazily-backed) CDF file.
pub struct Cdf {
    pub attributes: IndexedMap<Attribute>,
    pub variables: IndexedMap<Variable>,
    pub majority: Majority,
    pub compression_type: CompressionType,
    /// `(CDR.Version, CDR.Release)` of the file this was loaded from, or the
    /// target version for a freshly constructed CDF.
    pub distribution_version: (i32, i32),
    pub leap_second_last_updated: u32,
}

impl Cdf {
    /// An empty CDF ready for `add_attribute`/`add_variable` calls.
    pub fn empty() -> Self {
        Cdf {
            attributes: IndexedMap::new(),
            variables: IndexedMap::new(),
            majority: Majority::Row,
            compression_type: CompressionType::None,
            distribution_version: (3, 0),
            leap_second_last_updated: 0,
        }
    }

    pub fn add_attribute(
        &mut self,
        name: impl Into<String>,
        scope: AttrScope,
        entries: Vec<CdfValue>,
    ) -> Result<()> {
        let name = name.into();
        if self.attributes.contains_key(&name) {
            return Err(CdfError::duplicate(name));
        }
        self.attributes.insert(name.clone(), Attribute { name, scope, entries });
        Ok(())
    }

    /// Add a variable whose full value buffer is already assembled.
    /// `value.byte_len()` must equal `product(shape) * record_count *
    /// sizeof(data_type)`.
    pub fn add_variable(
        &mut self,
        name: impl Into<String>,
        data_type: DataType,
        shape: Vec<usize>,
        record_count: usize,
        is_nrv: bool,
        compression: CompressionType,
        value: CdfValue,
    ) -> Result<()> {
        let name = name.into();
        if self.variables.contains_key(&name) {
            return Err(CdfError::duplicate(name));
        }
        let expected = shape.iter().product::<usize>() * record_count * data_type.size();
        if value.byte_len() != expected {
            return Err(CdfError::shape_mismatch(expected, value.byte_len()));
        }
        let variable = Variable::eager(data_type, shape, record_count, is_nrv, compression, value);
        self.variables.insert(name, variable);
        Ok(())
    }

    pub fn attribute(&self, name: &str) -> Result<&Attribute> {
        self.attributes
            .get(name)
            .ok_or_else(|| CdfError::key_not_found(name))
    }

    pub fn variable(&self, name: &str) -> Result<&Variable> {
        self.variables
            .get(name)
            .ok_or_else(|| CdfError::key_not_found(name))
    }
}

impl std::ops::Index<&str> for Cdf {
    type Output = Variable;

    fn index(&self, name: &str) -> &Variable {
        self.variables.get(name).expect("variable not found")
    }
}

impl PartialEq for Cdf {
    fn eq(&self, other: &Self) -> bool {
        self.attributes == other.attributes
            && self.variables == other.variables
            && self.leap_second_last_updated == other.leap_second_last_updated
    }
}
