// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types shared across the record model, reader, and writer.
//!
//! - [`CdfError`] / [`Result`] - the crate's single error channel
//! - [`DataType`] - CDF primitive type codes and widths
//! - [`CdfValue`] - decoded value storage
//! - [`Majority`], [`AttrScope`], [`CompressionType`] - small on-disk enums

pub mod error;
pub mod types;
pub mod value;

pub use error::{CdfError, Result};
pub use types::{AttrScope, CompressionType, DataType, Majority};
pub use value::CdfValue;
