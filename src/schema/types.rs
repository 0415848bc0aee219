//! Schema type definitions
//!
//! An entity schema is an ordered list of column specifications. Each
//! specification binds a logical role to its canonical column name and to
//! the kind of content the column must hold.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::errors::UnknownEntityKind;
use crate::table::GeometryKind;

/// The six entity types of the movement-data model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Positionfixes,
    Staypoints,
    Triplegs,
    Trips,
    Locations,
    Tours,
}

impl EntityKind {
    /// All entity kinds in hierarchy order
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Positionfixes,
        EntityKind::Staypoints,
        EntityKind::Triplegs,
        EntityKind::Trips,
        EntityKind::Locations,
        EntityKind::Tours,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Positionfixes => "positionfixes",
            EntityKind::Staypoints => "staypoints",
            EntityKind::Triplegs => "triplegs",
            EntityKind::Trips => "trips",
            EntityKind::Locations => "locations",
            EntityKind::Tours => "tours",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = UnknownEntityKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownEntityKind(s.to_string()))
    }
}

/// Abstract column purpose, independent of any source-specific name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalRole {
    UserId,
    TrackedAt,
    StartedAt,
    FinishedAt,
    Geom,
    Center,
    Extent,
    OriginStaypointId,
    DestinationStaypointId,
    OriginDestinationLocationId,
    Journey,
}

impl LogicalRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalRole::UserId => "user_id",
            LogicalRole::TrackedAt => "tracked_at",
            LogicalRole::StartedAt => "started_at",
            LogicalRole::FinishedAt => "finished_at",
            LogicalRole::Geom => "geom",
            LogicalRole::Center => "center",
            LogicalRole::Extent => "extent",
            LogicalRole::OriginStaypointId => "origin_staypoint_id",
            LogicalRole::DestinationStaypointId => "destination_staypoint_id",
            LogicalRole::OriginDestinationLocationId => "origin_destination_location_id",
            LogicalRole::Journey => "journey",
        }
    }
}

impl fmt::Display for LogicalRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a column must hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnKind {
    /// Per-user identifier; any non-null scalar
    UserId,
    /// Timezone-aware instant
    Instant,
    /// Geometry of one of the accepted kinds
    Geometry {
        accepted: &'static [GeometryKind],
    },
    /// Row identifier of a row in another entity's table
    Reference {
        target: EntityKind,
        /// Default nullability policy; callers may override it
        nullable: bool,
    },
    /// Boolean flag
    Flag,
}

/// Column specification within an entity schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnSpec {
    pub role: LogicalRole,
    /// Canonical column name after normalization
    pub name: &'static str,
    #[serde(flatten)]
    pub kind: ColumnKind,
    /// Whether the column must be present (and, for mandatory kinds, non-null)
    pub required: bool,
}

impl ColumnSpec {
    pub const fn required(role: LogicalRole, name: &'static str, kind: ColumnKind) -> Self {
        Self {
            role,
            name,
            kind,
            required: true,
        }
    }

    pub const fn optional(role: LogicalRole, name: &'static str, kind: ColumnKind) -> Self {
        Self {
            role,
            name,
            kind,
            required: false,
        }
    }

    pub fn is_geometry(&self) -> bool {
        matches!(self.kind, ColumnKind::Geometry { .. })
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self.kind, ColumnKind::Instant)
    }

    pub fn is_reference(&self) -> bool {
        matches!(self.kind, ColumnKind::Reference { .. })
    }
}

/// Complete shape contract of one entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntitySchema {
    pub entity: EntityKind,
    pub columns: &'static [ColumnSpec],
}

impl EntitySchema {
    pub fn column(&self, role: LogicalRole) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.role == role)
    }

    /// Default mapping: logical role → canonical column name
    pub fn default_mapping(&self) -> BTreeMap<LogicalRole, &'static str> {
        self.columns.iter().map(|c| (c.role, c.name)).collect()
    }

    /// The primary geometry column, if the entity declares one
    pub fn geometry_column(&self) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.is_geometry())
    }

    pub fn geometry_columns(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.iter().filter(|c| c.is_geometry())
    }

    pub fn temporal_columns(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.iter().filter(|c| c.is_temporal())
    }

    pub fn reference_columns(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.iter().filter(|c| c.is_reference())
    }

    pub fn user_id_column(&self) -> Option<&ColumnSpec> {
        self.columns
            .iter()
            .find(|c| matches!(c.kind, ColumnKind::UserId))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_kind_round_trips_through_str() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.as_str().parse::<EntityKind>().unwrap(), kind);
        }
        assert!("waypoints".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_role_serde_names_match_as_str() {
        let json = serde_json::to_value(LogicalRole::OriginStaypointId).unwrap();
        assert_eq!(json, serde_json::json!("origin_staypoint_id"));

        let role: LogicalRole = serde_json::from_value(serde_json::json!("tracked_at")).unwrap();
        assert_eq!(role, LogicalRole::TrackedAt);
    }
}
