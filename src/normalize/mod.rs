//! Column normalization
//!
//! Reconciles arbitrary input column names with the canonical names of an
//! entity schema. Rows and geometries are never touched.

mod errors;
mod mapping;
mod normalizer;

pub use errors::{NormalizeError, NormalizeResult};
pub use mapping::ColumnMapping;
pub use normalizer::{ColumnNormalizer, RenamePlan};
