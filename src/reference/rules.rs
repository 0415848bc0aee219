//! Reference rules and nullability policy

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::schema::{self, ColumnKind, EntityKind, LogicalRole, SchemaValidator};

/// One reference column to check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceRule {
    /// Column in the referencing table
    pub column: String,
    /// Entity type the column points into
    pub target: EntityKind,
    /// Whether null cells are accepted
    pub nullable: bool,
}

impl ReferenceRule {
    pub fn new(column: impl Into<String>, target: EntityKind, nullable: bool) -> Self {
        Self {
            column: column.into(),
            target,
            nullable,
        }
    }
}

/// Per-role nullability overrides on top of the registry defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferencePolicy {
    nullable: BTreeMap<LogicalRole, bool>,
}

impl ReferencePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, role: LogicalRole, nullable: bool) -> Self {
        self.nullable.insert(role, nullable);
        self
    }

    pub fn allow_null(self, role: LogicalRole) -> Self {
        self.with(role, true)
    }

    pub fn forbid_null(self, role: LogicalRole) -> Self {
        self.with(role, false)
    }

    /// Roles this policy overrides
    pub fn roles(&self) -> impl Iterator<Item = LogicalRole> + '_ {
        self.nullable.keys().copied()
    }

    /// Schema validator for `entity` that enforces this policy's nulls.
    pub fn validator(&self, entity: EntityKind) -> SchemaValidator {
        self.nullable
            .iter()
            .fold(SchemaValidator::new(entity), |validator, (role, nullable)| {
                validator.with_nullable(*role, *nullable)
            })
    }

    /// Rules for every reference column of `entity`, policy applied.
    ///
    /// Overrides for roles that are not reference columns of `entity` are
    /// ignored.
    pub fn rules(&self, entity: EntityKind) -> Vec<ReferenceRule> {
        schema::schema(entity)
            .reference_columns()
            .filter_map(|spec| match spec.kind {
                ColumnKind::Reference { target, nullable } => {
                    let nullable = self.nullable.get(&spec.role).copied().unwrap_or(nullable);
                    Some(ReferenceRule::new(spec.name, target, nullable))
                }
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_trip_rules_are_nullable() {
        let rules = ReferencePolicy::new().rules(EntityKind::Trips);
        assert_eq!(
            rules,
            vec![
                ReferenceRule::new("origin_staypoint_id", EntityKind::Staypoints, true),
                ReferenceRule::new("destination_staypoint_id", EntityKind::Staypoints, true),
            ]
        );
    }

    #[test]
    fn test_policy_overrides_default() {
        let rules = ReferencePolicy::new()
            .forbid_null(LogicalRole::OriginStaypointId)
            .rules(EntityKind::Trips);
        assert!(!rules[0].nullable);
        assert!(rules[1].nullable);

        let rules = ReferencePolicy::new()
            .allow_null(LogicalRole::OriginDestinationLocationId)
            .rules(EntityKind::Tours);
        assert_eq!(
            rules,
            vec![ReferenceRule::new(
                "origin_destination_location_id",
                EntityKind::Locations,
                true
            )]
        );
    }

    #[test]
    fn test_validator_enforces_policy() {
        use crate::schema::Check;
        use crate::table::{Table, Value};

        let t = chrono::FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 2, 1, 9, 0, 0)
            .unwrap();
        let trips = Table::builder()
            .column("user_id", [1i64])
            .column("started_at", [t])
            .column("finished_at", [t])
            .column("origin_staypoint_id", [Value::Null])
            .build()
            .unwrap();

        assert!(ReferencePolicy::new()
            .validator(EntityKind::Trips)
            .validate(&trips)
            .is_ok());

        let err = ReferencePolicy::new()
            .forbid_null(LogicalRole::OriginStaypointId)
            .validator(EntityKind::Trips)
            .validate(&trips)
            .unwrap_err();
        assert!(err.has_failure(Check::NullReference));
    }

    #[test]
    fn test_entities_without_references() {
        for kind in [EntityKind::Positionfixes, EntityKind::Staypoints, EntityKind::Locations] {
            assert!(ReferencePolicy::new().rules(kind).is_empty());
        }
    }

    #[test]
    fn test_policy_json_is_a_plain_map() {
        let policy: ReferencePolicy =
            serde_json::from_value(serde_json::json!({"origin_staypoint_id": false})).unwrap();
        assert_eq!(policy, ReferencePolicy::new().forbid_null(LogicalRole::OriginStaypointId));
    }
}
