//! Reference checker
//!
//! For each rule:
//! - non-null cells must be row identifiers present in the referenced table
//! - null cells pass only when the rule is nullable
//! - an absent column counts as all-null

use std::collections::HashSet;

use serde::Serialize;

use super::errors::{ReferenceError, ReferenceFailure, ReferenceResult, ReferentialViolation};
use super::rules::ReferenceRule;
use crate::observability::Event;
use crate::schema::{CertifiedTable, EntityKind};
use crate::table::{RowId, Table, Value};

/// Pass details for one reference column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceOutcome {
    pub column: String,
    pub target: EntityKind,
    /// Number of non-null references resolved
    pub resolved: usize,
    /// Number of accepted nulls
    pub nulls: usize,
}

/// All reference columns resolved
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReferenceReport {
    pub outcomes: Vec<ReferenceOutcome>,
}

/// Checks references into one certified table.
///
/// Holding a `CertifiedTable` guarantees the referenced side was certified
/// first; no other ordering between the two certifications is required.
pub struct ReferenceChecker<'a> {
    referenced: &'a CertifiedTable,
    ids: HashSet<RowId>,
}

impl<'a> ReferenceChecker<'a> {
    pub fn new(referenced: &'a CertifiedTable) -> Self {
        Self {
            referenced,
            ids: referenced.index().iter().copied().collect(),
        }
    }

    /// Checks every rule against `referencing`.
    ///
    /// # Errors
    ///
    /// - `TargetMismatch` if a rule points at a different entity type than
    ///   the referenced table was certified as
    /// - `Violation` listing every failing column, with offending rows and
    ///   missing targets
    pub fn check(
        &self,
        referencing: &Table,
        rules: &[ReferenceRule],
    ) -> ReferenceResult<ReferenceReport> {
        let found = self.referenced.entity();
        if let Some(rule) = rules.iter().find(|r| r.target != found) {
            return Err(ReferenceError::TargetMismatch {
                column: rule.column.clone(),
                expected: rule.target,
                found,
            });
        }

        let mut outcomes = Vec::new();
        let mut failures = Vec::new();

        for rule in rules {
            match self.check_rule(referencing, rule) {
                Ok(outcome) => outcomes.push(outcome),
                Err(failure) => failures.push(failure),
            }
        }

        if failures.is_empty() {
            tracing::debug!(
                event = %Event::ReferencesResolved,
                target = %found,
                columns = outcomes.len(),
                "references resolved"
            );
            Ok(ReferenceReport { outcomes })
        } else {
            tracing::debug!(
                event = %Event::ReferencesRejected,
                target = %found,
                failed = failures.len(),
                "references rejected"
            );
            Err(ReferenceError::Violation(ReferentialViolation {
                failures,
                passed: outcomes,
            }))
        }
    }

    fn check_rule(
        &self,
        referencing: &Table,
        rule: &ReferenceRule,
    ) -> Result<ReferenceOutcome, ReferenceFailure> {
        let mut outcome = ReferenceOutcome {
            column: rule.column.clone(),
            target: rule.target,
            resolved: 0,
            nulls: 0,
        };

        let Some(column) = referencing.column(&rule.column) else {
            if rule.nullable {
                outcome.nulls = referencing.len();
                return Ok(outcome);
            }
            return Err(ReferenceFailure {
                missing_column: true,
                ..ReferenceFailure::new(&rule.column, rule.target)
            });
        };

        let mut failure = ReferenceFailure::new(&rule.column, rule.target);

        for (row, value) in referencing.index().iter().zip(column.values()) {
            match value {
                Value::Null if rule.nullable => outcome.nulls += 1,
                Value::Null => failure.null_rows.push(*row),
                Value::Int(id) if self.ids.contains(id) => outcome.resolved += 1,
                Value::Int(id) => failure.unresolved.push((*row, *id)),
                _ => failure.invalid_rows.push(*row),
            }
        }

        if failure.is_empty() {
            Ok(outcome)
        } else {
            Err(failure)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaValidator;
    use chrono::{FixedOffset, TimeZone};
    use geo::point;

    fn certified_staypoints(ids: &[RowId]) -> CertifiedTable {
        let t = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .unwrap();
        let table = Table::builder()
            .index(ids.iter().copied())
            .column("user_id", ids.iter().map(|_| 1i64))
            .column("started_at", ids.iter().map(|_| t))
            .column("finished_at", ids.iter().map(|_| t))
            .column("geom", ids.iter().map(|_| point!(x: 0.0, y: 0.0)))
            .build()
            .unwrap();
        SchemaValidator::new(EntityKind::Staypoints)
            .certify(table)
            .unwrap()
    }

    fn origin_rule(nullable: bool) -> ReferenceRule {
        ReferenceRule::new("origin_staypoint_id", EntityKind::Staypoints, nullable)
    }

    #[test]
    fn test_resolved_references_pass() {
        let staypoints = certified_staypoints(&[10, 11]);
        let trips = Table::builder()
            .column("origin_staypoint_id", [Value::Int(10), Value::Int(11), Value::Null])
            .build()
            .unwrap();

        let report = ReferenceChecker::new(&staypoints)
            .check(&trips, &[origin_rule(true)])
            .unwrap();
        assert_eq!(report.outcomes[0].resolved, 2);
        assert_eq!(report.outcomes[0].nulls, 1);
    }

    #[test]
    fn test_unresolved_reference_lists_row_and_target() {
        let staypoints = certified_staypoints(&[10]);
        let trips = Table::builder()
            .index([100, 101])
            .column("origin_staypoint_id", [10i64, 42])
            .build()
            .unwrap();

        let err = ReferenceChecker::new(&staypoints)
            .check(&trips, &[origin_rule(true)])
            .unwrap_err();
        let failure = err
            .violation()
            .and_then(|v| v.failure_for("origin_staypoint_id"))
            .unwrap();
        assert_eq!(failure.unresolved, vec![(101, 42)]);
        assert_eq!(failure.offending_rows(), vec![101]);
        assert_eq!(failure.missing_targets(), vec![42]);
    }

    #[test]
    fn test_null_rejected_when_not_nullable() {
        let staypoints = certified_staypoints(&[10]);
        let trips = Table::builder()
            .index([5])
            .column("origin_staypoint_id", [Value::Null])
            .build()
            .unwrap();

        let checker = ReferenceChecker::new(&staypoints);
        assert!(checker.check(&trips, &[origin_rule(true)]).is_ok());

        let err = checker.check(&trips, &[origin_rule(false)]).unwrap_err();
        let failure = &err.violation().unwrap().failures[0];
        assert_eq!(failure.null_rows, vec![5]);
    }

    #[test]
    fn test_missing_column_follows_policy() {
        let staypoints = certified_staypoints(&[10]);
        let trips = Table::builder().column("user_id", [1i64]).build().unwrap();
        let checker = ReferenceChecker::new(&staypoints);

        assert!(checker.check(&trips, &[origin_rule(true)]).is_ok());

        let err = checker.check(&trips, &[origin_rule(false)]).unwrap_err();
        assert!(err.violation().unwrap().failures[0].missing_column);
    }

    #[test]
    fn test_passing_columns_reported_alongside_failures() {
        let staypoints = certified_staypoints(&[10]);
        let trips = Table::builder()
            .column("origin_staypoint_id", [10i64])
            .column("destination_staypoint_id", [11i64])
            .build()
            .unwrap();
        let rules = [
            origin_rule(true),
            ReferenceRule::new("destination_staypoint_id", EntityKind::Staypoints, true),
        ];

        let err = ReferenceChecker::new(&staypoints)
            .check(&trips, &rules)
            .unwrap_err();
        let violation = err.violation().unwrap();
        assert_eq!(violation.passed.len(), 1);
        assert_eq!(violation.passed[0].column, "origin_staypoint_id");
        assert_eq!(violation.failures[0].column, "destination_staypoint_id");
    }

    #[test]
    fn test_wrong_target_entity() {
        let staypoints = certified_staypoints(&[10]);
        let tours = Table::builder()
            .column("origin_destination_location_id", [10i64])
            .build()
            .unwrap();
        let rule =
            ReferenceRule::new("origin_destination_location_id", EntityKind::Locations, false);

        let err = ReferenceChecker::new(&staypoints)
            .check(&tours, &[rule])
            .unwrap_err();
        assert_eq!(
            err,
            ReferenceError::TargetMismatch {
                column: "origin_destination_location_id".into(),
                expected: EntityKind::Locations,
                found: EntityKind::Staypoints,
            }
        );
    }

    #[test]
    fn test_non_identifier_cells_are_invalid() {
        let staypoints = certified_staypoints(&[10]);
        let trips = Table::builder()
            .index([8])
            .column("origin_staypoint_id", [10.0])
            .build()
            .unwrap();

        let err = ReferenceChecker::new(&staypoints)
            .check(&trips, &[origin_rule(true)])
            .unwrap_err();
        assert_eq!(err.violation().unwrap().failures[0].invalid_rows, vec![8]);
    }
}
