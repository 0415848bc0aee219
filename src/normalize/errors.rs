//! Normalization errors
//!
//! Every variant is a configuration conflict: the caller's mapping cannot be
//! applied without dropping or overwriting a column. Retrying without
//! changing the mapping cannot succeed.

use thiserror::Error;

use crate::schema::{EntityKind, LogicalRole};
use crate::table::TableError;

/// Result type for normalization
pub type NormalizeResult<T> = Result<T, NormalizeError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("columns {sources:?} would all be renamed to '{target}'")]
    Conflict { target: String, sources: Vec<String> },

    #[error("column '{source_column}' is mapped to more than one name: {targets:?}")]
    AmbiguousSource {
        source_column: String,
        targets: Vec<String>,
    },

    #[error("role '{role}' is not defined for {entity}")]
    UnknownRole { entity: EntityKind, role: LogicalRole },

    #[error("renamed table is malformed: {0}")]
    Table(#[from] TableError),
}
