//! Schema certification errors
//!
//! A failed certification carries every violated check, never just the
//! first one:
//! - required_column: canonical column missing
//! - geometry: null or wrong-kind geometry
//! - temporal: null, naive or non-timestamp instants
//! - unique_index: duplicated row identifiers
//! - user_id: null user identifiers
//! - column_type: reference or flag columns holding the wrong type
//! - null_reference: nulls in a non-nullable reference column

use std::fmt;
use thiserror::Error;

use super::types::EntityKind;
use crate::table::RowId;

/// Maximum number of row identifiers rendered in a message
const DISPLAY_ROWS: usize = 5;

/// The individual checks of certification, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Check {
    RequiredColumn,
    Geometry,
    Temporal,
    UniqueIndex,
    UserId,
    ColumnType,
    NullReference,
}

impl Check {
    pub fn as_str(&self) -> &'static str {
        match self {
            Check::RequiredColumn => "required_column",
            Check::Geometry => "geometry",
            Check::Temporal => "temporal",
            Check::UniqueIndex => "unique_index",
            Check::UserId => "user_id",
            Check::ColumnType => "column_type",
            Check::NullReference => "null_reference",
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One failed check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub check: Check,
    /// Column the check ran against; `None` for index checks
    pub column: Option<String>,
    /// Expected type or condition
    pub expected: String,
    /// What was found instead
    pub found: String,
    /// Offending row identifiers, in table order
    pub rows: Vec<RowId>,
}

impl Violation {
    pub fn new(
        check: Check,
        column: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
        rows: Vec<RowId>,
    ) -> Self {
        Self {
            check,
            column: Some(column.into()),
            expected: expected.into(),
            found: found.into(),
            rows,
        }
    }

    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::new(
            Check::RequiredColumn,
            column,
            "column to be present",
            "missing",
            Vec::new(),
        )
    }

    pub fn null_values(check: Check, column: impl Into<String>, rows: Vec<RowId>) -> Self {
        Self::new(check, column, "non-null value", "null", rows)
    }

    pub fn duplicate_index(duplicates: Vec<RowId>) -> Self {
        Self {
            check: Check::UniqueIndex,
            column: None,
            expected: "unique row identifiers".into(),
            found: format!("{} duplicated identifier(s)", duplicates.len()),
            rows: duplicates,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ", self.check)?;
        match &self.column {
            Some(column) => write!(f, "column '{}'", column)?,
            None => write!(f, "index")?,
        }
        write!(f, ": expected {}, found {}", self.expected, self.found)?;

        if !self.rows.is_empty() {
            let shown: Vec<String> = self
                .rows
                .iter()
                .take(DISPLAY_ROWS)
                .map(ToString::to_string)
                .collect();
            write!(f, " (rows {}", shown.join(", "))?;
            if self.rows.len() > DISPLAY_ROWS {
                write!(f, " and {} more", self.rows.len() - DISPLAY_ROWS)?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// A table failed certification as `entity`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    pub entity: EntityKind,
    pub failures: Vec<Violation>,
}

impl SchemaViolation {
    /// Returns the violations raised by a given check
    pub fn failures_for(&self, check: Check) -> impl Iterator<Item = &Violation> {
        self.failures.iter().filter(move |v| v.check == check)
    }

    pub fn has_failure(&self, check: Check) -> bool {
        self.failures_for(check).next().is_some()
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "table is not valid {}: {} violation(s)",
            self.entity,
            self.failures.len()
        )?;
        for failure in &self.failures {
            write!(f, "; {}", failure)?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaViolation {}

/// Result type for certification
pub type SchemaResult<T> = Result<T, SchemaViolation>;

/// An entity type name that is not part of the model
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown entity type '{0}', expected one of positionfixes, staypoints, triplegs, trips, locations, tours")]
pub struct UnknownEntityKind(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violation_display_includes_expected_and_found() {
        let v = Violation::new(Check::Geometry, "geom", "point", "line", vec![3]);
        let display = v.to_string();
        assert!(display.contains("[geometry]"));
        assert!(display.contains("geom"));
        assert!(display.contains("expected point"));
        assert!(display.contains("found line"));
        assert!(display.contains("rows 3"));
    }

    #[test]
    fn test_violation_display_truncates_rows() {
        let v = Violation::duplicate_index((0..8).collect());
        let display = v.to_string();
        assert!(display.starts_with("[unique_index] index"));
        assert!(display.contains("0, 1, 2, 3, 4 and 3 more"));
    }

    #[test]
    fn test_schema_violation_lists_every_failure() {
        let err = SchemaViolation {
            entity: EntityKind::Staypoints,
            failures: vec![
                Violation::missing_column("started_at"),
                Violation::null_values(Check::UserId, "user_id", vec![1]),
            ],
        };
        let display = err.to_string();
        assert!(display.contains("staypoints"));
        assert!(display.contains("2 violation(s)"));
        assert!(display.contains("started_at"));
        assert!(display.contains("user_id"));
        assert!(err.has_failure(Check::UserId));
        assert!(!err.has_failure(Check::Geometry));
    }
}
