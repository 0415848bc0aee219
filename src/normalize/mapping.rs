//! Caller-supplied column mapping

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::schema::LogicalRole;

/// Overrides applied on top of an entity's default mapping.
///
/// `columns` names the input column that carries a logical role; an entry
/// replaces the registry default for that role. `extra` renames columns the
/// schema knows nothing about and passes them through.
///
/// Each call builds its own mapping; there is no shared default instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    /// Logical role → input column name
    pub columns: BTreeMap<LogicalRole, String>,
    /// Input column name → output column name
    pub extra: BTreeMap<String, String>,
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `role` from the input column `input`
    pub fn with_column(mut self, role: LogicalRole, input: impl Into<String>) -> Self {
        self.columns.insert(role, input.into());
        self
    }

    /// Renames `from` to `to` without assigning a role
    pub fn with_extra(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.extra.insert(from.into(), to.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.extra.is_empty()
    }
}
