//! Reference check errors

use std::fmt;
use thiserror::Error;

use super::checker::ReferenceOutcome;
use crate::schema::EntityKind;
use crate::table::RowId;

/// Result type for reference checks
pub type ReferenceResult<T> = Result<T, ReferenceError>;

/// Failure details for one reference column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceFailure {
    pub column: String,
    pub target: Option<EntityKind>,
    /// The column is absent and the policy forbids nulls
    pub missing_column: bool,
    /// (referencing row, identifier not found in the referenced table)
    pub unresolved: Vec<(RowId, RowId)>,
    /// Rows holding null where the policy forbids it
    pub null_rows: Vec<RowId>,
    /// Rows holding something other than an integer identifier
    pub invalid_rows: Vec<RowId>,
}

impl ReferenceFailure {
    pub(crate) fn new(column: &str, target: EntityKind) -> Self {
        Self {
            column: column.to_string(),
            target: Some(target),
            ..Self::default()
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        !self.missing_column
            && self.unresolved.is_empty()
            && self.null_rows.is_empty()
            && self.invalid_rows.is_empty()
    }

    /// Every referencing row that failed, sorted and deduplicated
    pub fn offending_rows(&self) -> Vec<RowId> {
        let mut rows: Vec<RowId> = self
            .unresolved
            .iter()
            .map(|(row, _)| *row)
            .chain(self.null_rows.iter().copied())
            .chain(self.invalid_rows.iter().copied())
            .collect();
        rows.sort_unstable();
        rows.dedup();
        rows
    }

    /// Referenced identifiers that do not exist, sorted and deduplicated
    pub fn missing_targets(&self) -> Vec<RowId> {
        let mut targets: Vec<RowId> = self.unresolved.iter().map(|(_, t)| *t).collect();
        targets.sort_unstable();
        targets.dedup();
        targets
    }
}

impl fmt::Display for ReferenceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "column '{}'", self.column)?;
        if let Some(target) = self.target {
            write!(f, " -> {}", target)?;
        }
        if self.missing_column {
            return write!(f, ": column missing and nulls are not allowed");
        }

        let mut parts = Vec::new();
        if !self.unresolved.is_empty() {
            parts.push(format!(
                "{} unresolved (missing targets {:?})",
                self.unresolved.len(),
                self.missing_targets()
            ));
        }
        if !self.null_rows.is_empty() {
            parts.push(format!("{} null (rows {:?})", self.null_rows.len(), self.null_rows));
        }
        if !self.invalid_rows.is_empty() {
            parts.push(format!(
                "{} not an identifier (rows {:?})",
                self.invalid_rows.len(),
                self.invalid_rows
            ));
        }
        write!(f, ": {}", parts.join(", "))
    }
}

/// One or more reference columns failed to resolve.
///
/// The referencing table may still be schema-valid; only the relationship
/// is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferentialViolation {
    pub failures: Vec<ReferenceFailure>,
    /// Columns that passed
    pub passed: Vec<ReferenceOutcome>,
}

impl ReferentialViolation {
    pub fn failure_for(&self, column: &str) -> Option<&ReferenceFailure> {
        self.failures.iter().find(|f| f.column == column)
    }
}

impl fmt::Display for ReferentialViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} reference column(s) failed", self.failures.len())?;
        for failure in &self.failures {
            write!(f, "; {}", failure)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("{0}")]
    Violation(ReferentialViolation),

    #[error("column '{column}' references {expected}, but the referenced table is certified as {found}")]
    TargetMismatch {
        column: String,
        expected: EntityKind,
        found: EntityKind,
    },
}

impl ReferenceError {
    /// Returns the violation details, if this is a resolution failure
    pub fn violation(&self) -> Option<&ReferentialViolation> {
        match self {
            ReferenceError::Violation(v) => Some(v),
            ReferenceError::TargetMismatch { .. } => None,
        }
    }
}
