//! Static schema registry
//!
//! One immutable `EntitySchema` per entity type. Pure data: lookups cannot
//! fail and nothing here is mutable at runtime.

use super::types::{ColumnKind, ColumnSpec, EntityKind, EntitySchema, LogicalRole};
use crate::table::GeometryKind;

/// Canonical column names
pub mod names {
    pub const USER_ID: &str = "user_id";
    pub const TRACKED_AT: &str = "tracked_at";
    pub const STARTED_AT: &str = "started_at";
    pub const FINISHED_AT: &str = "finished_at";
    pub const GEOM: &str = "geom";
    pub const CENTER: &str = "center";
    pub const EXTENT: &str = "extent";
    pub const ORIGIN_STAYPOINT_ID: &str = "origin_staypoint_id";
    pub const DESTINATION_STAYPOINT_ID: &str = "destination_staypoint_id";
    pub const ORIGIN_DESTINATION_LOCATION_ID: &str = "origin_destination_location_id";
    pub const JOURNEY: &str = "journey";
}

const POINT: &[GeometryKind] = &[GeometryKind::Point];
const LINE: &[GeometryKind] = &[GeometryKind::Line];
const PATH: &[GeometryKind] = &[GeometryKind::Line, GeometryKind::MultiLine];
const AREA: &[GeometryKind] = &[GeometryKind::Polygon, GeometryKind::MultiPolygon];

const USER_ID: ColumnSpec =
    ColumnSpec::required(LogicalRole::UserId, names::USER_ID, ColumnKind::UserId);
const STARTED_AT: ColumnSpec =
    ColumnSpec::required(LogicalRole::StartedAt, names::STARTED_AT, ColumnKind::Instant);
const FINISHED_AT: ColumnSpec =
    ColumnSpec::required(LogicalRole::FinishedAt, names::FINISHED_AT, ColumnKind::Instant);

static POSITIONFIXES: EntitySchema = EntitySchema {
    entity: EntityKind::Positionfixes,
    columns: &[
        USER_ID,
        ColumnSpec::required(LogicalRole::TrackedAt, names::TRACKED_AT, ColumnKind::Instant),
        ColumnSpec::required(
            LogicalRole::Geom,
            names::GEOM,
            ColumnKind::Geometry { accepted: POINT },
        ),
    ],
};

static STAYPOINTS: EntitySchema = EntitySchema {
    entity: EntityKind::Staypoints,
    columns: &[
        USER_ID,
        STARTED_AT,
        FINISHED_AT,
        ColumnSpec::required(
            LogicalRole::Geom,
            names::GEOM,
            ColumnKind::Geometry { accepted: POINT },
        ),
    ],
};

static TRIPLEGS: EntitySchema = EntitySchema {
    entity: EntityKind::Triplegs,
    columns: &[
        USER_ID,
        STARTED_AT,
        FINISHED_AT,
        ColumnSpec::required(
            LogicalRole::Geom,
            names::GEOM,
            ColumnKind::Geometry { accepted: LINE },
        ),
    ],
};

// Trips may start or end outside any known staypoint.
static TRIPS: EntitySchema = EntitySchema {
    entity: EntityKind::Trips,
    columns: &[
        USER_ID,
        STARTED_AT,
        FINISHED_AT,
        ColumnSpec::optional(
            LogicalRole::OriginStaypointId,
            names::ORIGIN_STAYPOINT_ID,
            ColumnKind::Reference {
                target: EntityKind::Staypoints,
                nullable: true,
            },
        ),
        ColumnSpec::optional(
            LogicalRole::DestinationStaypointId,
            names::DESTINATION_STAYPOINT_ID,
            ColumnKind::Reference {
                target: EntityKind::Staypoints,
                nullable: true,
            },
        ),
        ColumnSpec::optional(
            LogicalRole::Geom,
            names::GEOM,
            ColumnKind::Geometry { accepted: PATH },
        ),
    ],
};

static LOCATIONS: EntitySchema = EntitySchema {
    entity: EntityKind::Locations,
    columns: &[
        USER_ID,
        ColumnSpec::required(
            LogicalRole::Center,
            names::CENTER,
            ColumnKind::Geometry { accepted: POINT },
        ),
        ColumnSpec::optional(
            LogicalRole::Extent,
            names::EXTENT,
            ColumnKind::Geometry { accepted: AREA },
        ),
    ],
};

static TOURS: EntitySchema = EntitySchema {
    entity: EntityKind::Tours,
    columns: &[
        USER_ID,
        STARTED_AT,
        FINISHED_AT,
        ColumnSpec::required(
            LogicalRole::OriginDestinationLocationId,
            names::ORIGIN_DESTINATION_LOCATION_ID,
            ColumnKind::Reference {
                target: EntityKind::Locations,
                nullable: false,
            },
        ),
        ColumnSpec::required(LogicalRole::Journey, names::JOURNEY, ColumnKind::Flag),
    ],
};

/// Returns the schema for an entity type.
pub fn schema(entity: EntityKind) -> &'static EntitySchema {
    match entity {
        EntityKind::Positionfixes => &POSITIONFIXES,
        EntityKind::Staypoints => &STAYPOINTS,
        EntityKind::Triplegs => &TRIPLEGS,
        EntityKind::Trips => &TRIPS,
        EntityKind::Locations => &LOCATIONS,
        EntityKind::Tours => &TOURS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_entity_requires_user_id() {
        for kind in EntityKind::ALL {
            let spec = schema(kind).user_id_column().unwrap();
            assert!(spec.required, "{} must require user_id", kind);
            assert_eq!(spec.name, names::USER_ID);
        }
    }

    #[test]
    fn test_schema_entity_matches_selector() {
        for kind in EntityKind::ALL {
            assert_eq!(schema(kind).entity, kind);
        }
    }

    #[test]
    fn test_canonical_names_unique_per_entity() {
        for kind in EntityKind::ALL {
            let s = schema(kind);
            let names: HashSet<_> = s.columns.iter().map(|c| c.name).collect();
            let roles: HashSet<_> = s.columns.iter().map(|c| c.role).collect();
            assert_eq!(names.len(), s.columns.len());
            assert_eq!(roles.len(), s.columns.len());
        }
    }

    #[test]
    fn test_geometry_kinds() {
        let accepted = |kind: EntityKind| match schema(kind).geometry_column().map(|c| c.kind) {
            Some(ColumnKind::Geometry { accepted }) => accepted.to_vec(),
            _ => Vec::new(),
        };

        assert_eq!(accepted(EntityKind::Positionfixes), vec![GeometryKind::Point]);
        assert_eq!(accepted(EntityKind::Staypoints), vec![GeometryKind::Point]);
        assert_eq!(accepted(EntityKind::Triplegs), vec![GeometryKind::Line]);
        assert_eq!(accepted(EntityKind::Locations), vec![GeometryKind::Point]);
        assert!(accepted(EntityKind::Tours).is_empty());
        assert!(!schema(EntityKind::Trips).geometry_column().unwrap().required);
    }

    #[test]
    fn test_temporal_naming() {
        let temporal = |kind: EntityKind| -> Vec<&'static str> {
            schema(kind).temporal_columns().map(|c| c.name).collect()
        };

        assert_eq!(temporal(EntityKind::Positionfixes), vec!["tracked_at"]);
        for kind in [
            EntityKind::Staypoints,
            EntityKind::Triplegs,
            EntityKind::Trips,
            EntityKind::Tours,
        ] {
            assert_eq!(temporal(kind), vec!["started_at", "finished_at"]);
        }
        assert!(temporal(EntityKind::Locations).is_empty());
    }

    #[test]
    fn test_reference_targets_and_policy() {
        let trips: Vec<_> = schema(EntityKind::Trips)
            .reference_columns()
            .map(|c| c.kind)
            .collect();
        assert_eq!(trips.len(), 2);
        for kind in trips {
            assert_eq!(
                kind,
                ColumnKind::Reference {
                    target: EntityKind::Staypoints,
                    nullable: true
                }
            );
        }

        let tours = schema(EntityKind::Tours)
            .column(LogicalRole::OriginDestinationLocationId)
            .unwrap();
        assert_eq!(
            tours.kind,
            ColumnKind::Reference {
                target: EntityKind::Locations,
                nullable: false
            }
        );
    }

    #[test]
    fn test_reference_required_unless_nullable() {
        for kind in EntityKind::ALL {
            for spec in schema(kind).reference_columns() {
                if let ColumnKind::Reference { nullable, .. } = spec.kind {
                    assert_eq!(spec.required, !nullable, "{}.{}", kind, spec.name);
                }
            }
        }
        assert!(schema(EntityKind::Tours).column(LogicalRole::Journey).unwrap().required);
    }

    #[test]
    fn test_default_mapping_is_identity_on_canonical_names() {
        let mapping = schema(EntityKind::Positionfixes).default_mapping();
        assert_eq!(mapping.get(&LogicalRole::Geom), Some(&"geom"));
        assert_eq!(mapping.get(&LogicalRole::UserId), Some(&"user_id"));
        assert_eq!(mapping.get(&LogicalRole::TrackedAt), Some(&"tracked_at"));
        assert_eq!(mapping.len(), 3);
    }
}
