//! Schema validator for table certification
//!
//! Validation semantics:
//! - Required columns are present
//! - Geometry columns hold non-null geometries of an accepted kind
//! - Temporal columns hold timezone-aware instants
//! - Row identifiers are unique
//! - User identifiers are non-null
//! - Reference and flag columns hold the right cell type
//! - Reference columns hold no nulls unless nullable
//!
//! Reference nullability defaults to the registry and may be overridden per
//! role; a non-nullable reference column is also required.
//!
//! Every check runs; violations are accumulated, not short-circuited.
//! A column reported missing by the first check is skipped by the others.

use std::collections::{BTreeMap, HashMap};
use std::ops::Deref;

use serde::Serialize;

use super::errors::{Check, SchemaResult, SchemaViolation, Violation};
use super::registry;
use super::types::{ColumnKind, ColumnSpec, EntityKind, EntitySchema, LogicalRole};
use crate::observability::Event;
use crate::table::{GeometryKind, RowId, Table, Value};

/// A table that passed certification as a specific entity type.
///
/// Only `SchemaValidator::certify` constructs this type, so holding one is
/// proof that the shape contract held when it was built. Release it with
/// `into_inner` before transforming rows; the result must be certified again.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CertifiedTable {
    entity: EntityKind,
    table: Table,
}

impl CertifiedTable {
    pub fn entity(&self) -> EntityKind {
        self.entity
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn into_inner(self) -> Table {
        self.table
    }
}

impl Deref for CertifiedTable {
    type Target = Table;

    fn deref(&self) -> &Table {
        &self.table
    }
}

impl AsRef<Table> for CertifiedTable {
    fn as_ref(&self) -> &Table {
        &self.table
    }
}

/// Schema validator for one entity type.
///
/// Validator does not mutate tables and caches nothing between calls.
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    schema: &'static EntitySchema,
    nullable: BTreeMap<LogicalRole, bool>,
}

impl SchemaValidator {
    /// Creates a validator for the registry entry of `entity`.
    pub fn new(entity: EntityKind) -> Self {
        Self {
            schema: registry::schema(entity),
            nullable: BTreeMap::new(),
        }
    }

    /// Overrides whether the reference column for `role` accepts nulls.
    ///
    /// Roles that are not reference columns of this entity are ignored.
    pub fn with_nullable(mut self, role: LogicalRole, nullable: bool) -> Self {
        self.nullable.insert(role, nullable);
        self
    }

    /// Effective nullability of a reference column; `None` for other kinds
    fn reference_nullable(&self, spec: &ColumnSpec) -> Option<bool> {
        match spec.kind {
            ColumnKind::Reference { nullable, .. } => {
                Some(self.nullable.get(&spec.role).copied().unwrap_or(nullable))
            }
            _ => None,
        }
    }

    pub fn schema(&self) -> &'static EntitySchema {
        self.schema
    }

    /// Runs every check and returns all violations, in check order.
    ///
    /// An empty result means the table satisfies the contract.
    pub fn violations(&self, table: &Table) -> Vec<Violation> {
        let mut failures = Vec::new();

        self.check_required(table, &mut failures);
        self.check_geometry(table, &mut failures);
        self.check_temporal(table, &mut failures);
        check_unique_index(table, &mut failures);
        self.check_user_id(table, &mut failures);
        self.check_column_types(table, &mut failures);

        failures
    }

    /// Validates a table without taking ownership of it.
    ///
    /// # Errors
    ///
    /// Returns `SchemaViolation` listing every failed check.
    pub fn validate(&self, table: &Table) -> SchemaResult<()> {
        let failures = self.violations(table);
        if failures.is_empty() {
            Ok(())
        } else {
            Err(SchemaViolation {
                entity: self.schema.entity,
                failures,
            })
        }
    }

    /// Certifies a table, returning it unchanged behind the certified marker.
    ///
    /// # Errors
    ///
    /// Returns `SchemaViolation` listing every failed check. Certification
    /// is all-or-nothing.
    pub fn certify(&self, table: Table) -> SchemaResult<CertifiedTable> {
        let entity = self.schema.entity;

        match self.validate(&table) {
            Ok(()) => {
                tracing::debug!(
                    event = %Event::TableCertified,
                    entity = %entity,
                    rows = table.len(),
                    "table certified"
                );
                Ok(CertifiedTable { entity, table })
            }
            Err(err) => {
                tracing::debug!(
                    event = %Event::CertificationRejected,
                    entity = %entity,
                    violations = err.failures.len(),
                    "table rejected"
                );
                Err(err)
            }
        }
    }

    fn check_required(&self, table: &Table, failures: &mut Vec<Violation>) {
        for spec in self.schema.columns {
            let required = self
                .reference_nullable(spec)
                .map_or(spec.required, |nullable| !nullable);
            if required && !table.has_column(spec.name) {
                failures.push(Violation::missing_column(spec.name));
            }
        }
    }

    fn check_geometry(&self, table: &Table, failures: &mut Vec<Violation>) {
        for spec in self.schema.geometry_columns() {
            let ColumnKind::Geometry { accepted } = spec.kind else {
                continue;
            };
            let Some(values) = present(table, spec) else {
                continue;
            };

            if spec.required {
                push_nulls(table, Check::Geometry, spec.name, values, failures);
            }

            let mismatched = group_positions(values, |value| match value {
                Value::Null => None,
                Value::Geometry(g) => {
                    let kind = GeometryKind::of(g);
                    (!accepted.contains(&kind)).then(|| kind.as_str())
                }
                other => Some(other.type_name()),
            });

            let expected = format!("geometry of kind {}", describe_kinds(accepted));
            for (found, positions) in mismatched {
                failures.push(Violation::new(
                    Check::Geometry,
                    spec.name,
                    expected.clone(),
                    found,
                    table.row_ids_at(positions),
                ));
            }
        }
    }

    fn check_temporal(&self, table: &Table, failures: &mut Vec<Violation>) {
        for spec in self.schema.temporal_columns() {
            let Some(values) = present(table, spec) else {
                continue;
            };

            let offending = group_positions(values, |value| match value {
                Value::Timestamp(_) => None,
                other => Some(other.type_name()),
            });

            for (found, positions) in offending {
                failures.push(Violation::new(
                    Check::Temporal,
                    spec.name,
                    "timezone-aware instant",
                    found,
                    table.row_ids_at(positions),
                ));
            }
        }
    }

    fn check_user_id(&self, table: &Table, failures: &mut Vec<Violation>) {
        let Some(spec) = self.schema.user_id_column() else {
            return;
        };
        if let Some(values) = present(table, spec) {
            push_nulls(table, Check::UserId, spec.name, values, failures);
        }
    }

    fn check_column_types(&self, table: &Table, failures: &mut Vec<Violation>) {
        for spec in self.schema.columns {
            let Some(values) = present(table, spec) else {
                continue;
            };

            let (expected, offending) = match spec.kind {
                ColumnKind::Reference { target, .. } => (
                    format!("{} row identifier", target),
                    group_positions(values, |value| match value {
                        Value::Int(_) | Value::Null => None,
                        other => Some(other.type_name()),
                    }),
                ),
                ColumnKind::Flag => (
                    "non-null bool".to_string(),
                    group_positions(values, |value| match value {
                        Value::Bool(_) => None,
                        other => Some(other.type_name()),
                    }),
                ),
                _ => continue,
            };

            if self.reference_nullable(spec) == Some(false) {
                push_nulls(table, Check::NullReference, spec.name, values, failures);
            }

            for (found, positions) in offending {
                failures.push(Violation::new(
                    Check::ColumnType,
                    spec.name,
                    expected.clone(),
                    found,
                    table.row_ids_at(positions),
                ));
            }
        }
    }
}

/// Returns the column's cells if the table carries it.
fn present<'t>(table: &'t Table, spec: &ColumnSpec) -> Option<&'t [Value]> {
    table.column(spec.name).map(|c| c.values())
}

fn push_nulls(
    table: &Table,
    check: Check,
    column: &str,
    values: &[Value],
    failures: &mut Vec<Violation>,
) {
    let nulls: Vec<usize> = values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_null())
        .map(|(i, _)| i)
        .collect();

    if !nulls.is_empty() {
        failures.push(Violation::null_values(check, column, table.row_ids_at(nulls)));
    }
}

fn check_unique_index(table: &Table, failures: &mut Vec<Violation>) {
    let mut counts: HashMap<RowId, usize> = HashMap::with_capacity(table.len());
    for id in table.index() {
        *counts.entry(*id).or_default() += 1;
    }

    // Report each duplicated identifier once, in first-seen order.
    let mut duplicates = Vec::new();
    for id in table.index() {
        if let Some(count) = counts.get_mut(id) {
            if *count > 1 {
                duplicates.push(*id);
                *count = 0;
            }
        }
    }

    if !duplicates.is_empty() {
        failures.push(Violation::duplicate_index(duplicates));
    }
}

/// Groups row positions by a classifier; `None` means the cell is fine.
fn group_positions<F>(values: &[Value], classify: F) -> BTreeMap<&'static str, Vec<usize>>
where
    F: Fn(&Value) -> Option<&'static str>,
{
    let mut groups: BTreeMap<&'static str, Vec<usize>> = BTreeMap::new();
    for (position, value) in values.iter().enumerate() {
        if let Some(found) = classify(value) {
            groups.entry(found).or_default().push(position);
        }
    }
    groups
}

fn describe_kinds(kinds: &[GeometryKind]) -> String {
    kinds
        .iter()
        .map(GeometryKind::as_str)
        .collect::<Vec<_>>()
        .join(" or ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
    use geo::{line_string, point};

    fn instant(hour: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2024, 5, 1, hour, 0, 0)
            .unwrap()
    }

    fn staypoints() -> Table {
        Table::builder()
            .index([1, 2])
            .column("user_id", [7i64, 7])
            .column("started_at", [instant(8), instant(12)])
            .column("finished_at", [instant(9), instant(13)])
            .column("geom", [point!(x: 8.54, y: 47.37), point!(x: 8.55, y: 47.38)])
            .build()
            .unwrap()
    }

    #[test]
    fn test_valid_staypoints_certify() {
        let validator = SchemaValidator::new(EntityKind::Staypoints);
        let table = staypoints();
        let certified = validator.certify(table.clone()).unwrap();

        assert_eq!(certified.entity(), EntityKind::Staypoints);
        assert_eq!(certified.table(), &table);
    }

    #[test]
    fn test_missing_columns_reported_once() {
        let table = Table::builder()
            .column("user_id", [1i64])
            .build()
            .unwrap();

        let failures = SchemaValidator::new(EntityKind::Staypoints).violations(&table);
        assert_eq!(failures.len(), 3);
        assert!(failures.iter().all(|v| v.check == Check::RequiredColumn));
    }

    #[test]
    fn test_line_geometry_rejected_for_staypoints() {
        let table = Table::builder()
            .index([1, 2])
            .column("user_id", [7i64, 7])
            .column("started_at", [instant(8), instant(12)])
            .column("finished_at", [instant(9), instant(13)])
            .column(
                "geom",
                [
                    Value::from(point!(x: 0.0, y: 0.0)),
                    Value::from(line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0)]),
                ],
            )
            .build()
            .unwrap();

        let err = SchemaValidator::new(EntityKind::Staypoints)
            .validate(&table)
            .unwrap_err();
        assert_eq!(err.failures.len(), 1);
        let v = &err.failures[0];
        assert_eq!(v.check, Check::Geometry);
        assert_eq!(v.expected, "geometry of kind point");
        assert_eq!(v.found, "line");
        assert_eq!(v.rows, vec![2]);
    }

    #[test]
    fn test_null_geometry_rejected_when_required() {
        let table = Table::builder()
            .column("user_id", [1i64])
            .column("tracked_at", [instant(1)])
            .column("geom", [Value::Null])
            .build()
            .unwrap();

        let err = SchemaValidator::new(EntityKind::Positionfixes)
            .validate(&table)
            .unwrap_err();
        assert_eq!(err.failures.len(), 1);
        assert_eq!(err.failures[0].found, "null");
        assert_eq!(err.failures[0].check, Check::Geometry);
    }

    #[test]
    fn test_naive_timestamps_rejected() {
        let naive = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let table = Table::builder()
            .column("user_id", [1i64])
            .column("tracked_at", [naive])
            .column("geom", [point!(x: 0.0, y: 0.0)])
            .build()
            .unwrap();

        let err = SchemaValidator::new(EntityKind::Positionfixes)
            .validate(&table)
            .unwrap_err();
        assert_eq!(err.failures[0].check, Check::Temporal);
        assert_eq!(err.failures[0].found, "naive timestamp");
    }

    #[test]
    fn test_duplicate_index_reported_once_per_id() {
        let table = Table::builder()
            .index([4, 4, 4, 5])
            .column("user_id", [1i64, 1, 1, 1])
            .column("center", [point!(x: 0.0, y: 0.0); 4])
            .build()
            .unwrap();

        let err = SchemaValidator::new(EntityKind::Locations)
            .validate(&table)
            .unwrap_err();
        assert_eq!(err.failures.len(), 1);
        assert_eq!(err.failures[0].check, Check::UniqueIndex);
        assert_eq!(err.failures[0].rows, vec![4]);
    }

    #[test]
    fn test_null_user_id_rejected() {
        let table = Table::builder()
            .index([3])
            .column("user_id", [Value::Null])
            .column("center", [point!(x: 0.0, y: 0.0)])
            .build()
            .unwrap();

        let err = SchemaValidator::new(EntityKind::Locations)
            .validate(&table)
            .unwrap_err();
        assert_eq!(err.failures[0].check, Check::UserId);
        assert_eq!(err.failures[0].rows, vec![3]);
    }

    #[test]
    fn test_reference_and_flag_types() {
        let table = Table::builder()
            .column("user_id", [1i64, 1])
            .column("started_at", [instant(1), instant(2)])
            .column("finished_at", [instant(2), instant(3)])
            .column("origin_destination_location_id", [Value::Int(1), Value::from("home")])
            .column("journey", [Value::Bool(true), Value::Null])
            .build()
            .unwrap();

        let err = SchemaValidator::new(EntityKind::Tours)
            .validate(&table)
            .unwrap_err();
        let types: Vec<_> = err.failures_for(Check::ColumnType).collect();
        assert_eq!(types.len(), 2);
        assert_eq!(types[0].column.as_deref(), Some("origin_destination_location_id"));
        assert_eq!(types[0].found, "text");
        assert_eq!(types[1].column.as_deref(), Some("journey"));
        assert_eq!(types[1].found, "null");
    }

    fn tour(location: Value) -> Table {
        Table::builder()
            .index([6])
            .column("user_id", [1i64])
            .column("started_at", [instant(1)])
            .column("finished_at", [instant(2)])
            .column("origin_destination_location_id", [location])
            .column("journey", [false])
            .build()
            .unwrap()
    }

    #[test]
    fn test_null_in_non_nullable_reference() {
        let err = SchemaValidator::new(EntityKind::Tours)
            .validate(&tour(Value::Null))
            .unwrap_err();
        let nulls: Vec<_> = err.failures_for(Check::NullReference).collect();
        assert_eq!(nulls.len(), 1);
        assert_eq!(nulls[0].rows, vec![6]);
        assert!(!err.has_failure(Check::ColumnType));
    }

    #[test]
    fn test_nullability_override() {
        let lenient = SchemaValidator::new(EntityKind::Tours)
            .with_nullable(LogicalRole::OriginDestinationLocationId, true);
        assert!(lenient.validate(&tour(Value::Null)).is_ok());

        let trip = Table::builder()
            .column("user_id", [1i64])
            .column("started_at", [instant(1)])
            .column("finished_at", [instant(2)])
            .build()
            .unwrap();
        let strict = SchemaValidator::new(EntityKind::Trips)
            .with_nullable(LogicalRole::OriginStaypointId, false);
        let err = strict.validate(&trip).unwrap_err();
        assert_eq!(
            err.failures,
            vec![Violation::missing_column("origin_staypoint_id")]
        );
    }

    #[test]
    fn test_optional_trip_geometry_may_be_null() {
        let table = Table::builder()
            .column("user_id", [1i64])
            .column("started_at", [instant(1)])
            .column("finished_at", [instant(2)])
            .column("geom", [Value::Null])
            .build()
            .unwrap();

        assert!(SchemaValidator::new(EntityKind::Trips).validate(&table).is_ok());
    }

    #[test]
    fn test_failures_accumulate_in_check_order() {
        let table = Table::builder()
            .index([1, 1])
            .column("user_id", [Value::Null, Value::Int(2)])
            .column("started_at", [Value::Null, Value::from(instant(2))])
            .column(
                "geom",
                [
                    Value::from(point!(x: 0.0, y: 0.0)),
                    Value::from(point!(x: 1.0, y: 1.0)),
                ],
            )
            .build()
            .unwrap();

        let err = SchemaValidator::new(EntityKind::Triplegs)
            .validate(&table)
            .unwrap_err();
        let checks: Vec<Check> = err.failures.iter().map(|v| v.check).collect();
        assert_eq!(
            checks,
            vec![
                Check::RequiredColumn,
                Check::Geometry,
                Check::Temporal,
                Check::UniqueIndex,
                Check::UserId,
            ]
        );
    }
}
