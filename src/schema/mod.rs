//! Schema subsystem
//!
//! A declarative registry of per-entity shape contracts and a single generic
//! validator parameterized by those contracts.
//!
//! # Design Principles
//!
//! - One registry entry per entity type, no per-type validator code
//! - Certification is an explicit call returning a structured result
//! - All violations are reported together
//! - Deterministic and stateless: re-certifying re-runs every check

mod errors;
mod registry;
mod types;
mod validator;

pub use errors::{Check, SchemaResult, SchemaViolation, UnknownEntityKind, Violation};
pub use registry::{names, schema};
pub use types::{ColumnKind, ColumnSpec, EntityKind, EntitySchema, LogicalRole};
pub use validator::{CertifiedTable, SchemaValidator};
