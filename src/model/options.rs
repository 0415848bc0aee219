//! Per-entity configuration surface
//!
//! Each options struct names the input column carrying every logical role
//! of its entity (defaulting to the canonical name) plus an open `extra`
//! rename map for non-standard columns. Trips and tours also carry
//! per-reference nullability overrides.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::normalize::ColumnMapping;
use crate::reference::ReferencePolicy;
use crate::schema::{names, EntityKind, LogicalRole};

/// Common behaviour of the per-entity options structs.
pub trait EntityOptions {
    /// Entity type these options configure
    const ENTITY: EntityKind;

    /// Logical role → input column name
    fn role_columns(&self) -> Vec<(LogicalRole, &str)>;

    /// Passthrough renames: input name → output name
    fn extra(&self) -> &BTreeMap<String, String>;

    /// Builds a fresh mapping for one normalization call
    fn mapping(&self) -> ColumnMapping {
        ColumnMapping {
            columns: self
                .role_columns()
                .into_iter()
                .map(|(role, name)| (role, name.to_string()))
                .collect(),
            extra: self.extra().clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionfixOptions {
    pub tracked_at: String,
    pub user_id: String,
    pub geom: String,
    pub extra: BTreeMap<String, String>,
}

impl Default for PositionfixOptions {
    fn default() -> Self {
        Self {
            tracked_at: names::TRACKED_AT.into(),
            user_id: names::USER_ID.into(),
            geom: names::GEOM.into(),
            extra: BTreeMap::new(),
        }
    }
}

impl EntityOptions for PositionfixOptions {
    const ENTITY: EntityKind = EntityKind::Positionfixes;

    fn role_columns(&self) -> Vec<(LogicalRole, &str)> {
        vec![
            (LogicalRole::TrackedAt, self.tracked_at.as_str()),
            (LogicalRole::UserId, self.user_id.as_str()),
            (LogicalRole::Geom, self.geom.as_str()),
        ]
    }

    fn extra(&self) -> &BTreeMap<String, String> {
        &self.extra
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaypointOptions {
    pub started_at: String,
    pub finished_at: String,
    pub user_id: String,
    pub geom: String,
    pub extra: BTreeMap<String, String>,
}

impl Default for StaypointOptions {
    fn default() -> Self {
        Self {
            started_at: names::STARTED_AT.into(),
            finished_at: names::FINISHED_AT.into(),
            user_id: names::USER_ID.into(),
            geom: names::GEOM.into(),
            extra: BTreeMap::new(),
        }
    }
}

impl EntityOptions for StaypointOptions {
    const ENTITY: EntityKind = EntityKind::Staypoints;

    fn role_columns(&self) -> Vec<(LogicalRole, &str)> {
        vec![
            (LogicalRole::StartedAt, self.started_at.as_str()),
            (LogicalRole::FinishedAt, self.finished_at.as_str()),
            (LogicalRole::UserId, self.user_id.as_str()),
            (LogicalRole::Geom, self.geom.as_str()),
        ]
    }

    fn extra(&self) -> &BTreeMap<String, String> {
        &self.extra
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriplegOptions {
    pub started_at: String,
    pub finished_at: String,
    pub user_id: String,
    pub geom: String,
    pub extra: BTreeMap<String, String>,
}

impl Default for TriplegOptions {
    fn default() -> Self {
        Self {
            started_at: names::STARTED_AT.into(),
            finished_at: names::FINISHED_AT.into(),
            user_id: names::USER_ID.into(),
            geom: names::GEOM.into(),
            extra: BTreeMap::new(),
        }
    }
}

impl EntityOptions for TriplegOptions {
    const ENTITY: EntityKind = EntityKind::Triplegs;

    fn role_columns(&self) -> Vec<(LogicalRole, &str)> {
        vec![
            (LogicalRole::StartedAt, self.started_at.as_str()),
            (LogicalRole::FinishedAt, self.finished_at.as_str()),
            (LogicalRole::UserId, self.user_id.as_str()),
            (LogicalRole::Geom, self.geom.as_str()),
        ]
    }

    fn extra(&self) -> &BTreeMap<String, String> {
        &self.extra
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripOptions {
    pub started_at: String,
    pub finished_at: String,
    pub user_id: String,
    pub origin_staypoint_id: String,
    pub destination_staypoint_id: String,
    pub geom: String,
    pub extra: BTreeMap<String, String>,
    /// Overrides of the registry's nullability for the staypoint references
    pub nullable: ReferencePolicy,
}

impl Default for TripOptions {
    fn default() -> Self {
        Self {
            started_at: names::STARTED_AT.into(),
            finished_at: names::FINISHED_AT.into(),
            user_id: names::USER_ID.into(),
            origin_staypoint_id: names::ORIGIN_STAYPOINT_ID.into(),
            destination_staypoint_id: names::DESTINATION_STAYPOINT_ID.into(),
            geom: names::GEOM.into(),
            extra: BTreeMap::new(),
            nullable: ReferencePolicy::new(),
        }
    }
}

impl EntityOptions for TripOptions {
    const ENTITY: EntityKind = EntityKind::Trips;

    fn role_columns(&self) -> Vec<(LogicalRole, &str)> {
        vec![
            (LogicalRole::StartedAt, self.started_at.as_str()),
            (LogicalRole::FinishedAt, self.finished_at.as_str()),
            (LogicalRole::UserId, self.user_id.as_str()),
            (LogicalRole::OriginStaypointId, self.origin_staypoint_id.as_str()),
            (LogicalRole::DestinationStaypointId, self.destination_staypoint_id.as_str()),
            (LogicalRole::Geom, self.geom.as_str()),
        ]
    }

    fn extra(&self) -> &BTreeMap<String, String> {
        &self.extra
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationOptions {
    pub user_id: String,
    pub center: String,
    pub extent: String,
    pub extra: BTreeMap<String, String>,
}

impl Default for LocationOptions {
    fn default() -> Self {
        Self {
            user_id: names::USER_ID.into(),
            center: names::CENTER.into(),
            extent: names::EXTENT.into(),
            extra: BTreeMap::new(),
        }
    }
}

impl EntityOptions for LocationOptions {
    const ENTITY: EntityKind = EntityKind::Locations;

    fn role_columns(&self) -> Vec<(LogicalRole, &str)> {
        vec![
            (LogicalRole::UserId, self.user_id.as_str()),
            (LogicalRole::Center, self.center.as_str()),
            (LogicalRole::Extent, self.extent.as_str()),
        ]
    }

    fn extra(&self) -> &BTreeMap<String, String> {
        &self.extra
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TourOptions {
    pub user_id: String,
    pub started_at: String,
    pub finished_at: String,
    pub origin_destination_location_id: String,
    pub journey: String,
    pub extra: BTreeMap<String, String>,
    /// Overrides of the registry's nullability for the location reference
    pub nullable: ReferencePolicy,
}

impl Default for TourOptions {
    fn default() -> Self {
        Self {
            user_id: names::USER_ID.into(),
            started_at: names::STARTED_AT.into(),
            finished_at: names::FINISHED_AT.into(),
            origin_destination_location_id: names::ORIGIN_DESTINATION_LOCATION_ID.into(),
            journey: names::JOURNEY.into(),
            extra: BTreeMap::new(),
            nullable: ReferencePolicy::new(),
        }
    }
}

impl EntityOptions for TourOptions {
    const ENTITY: EntityKind = EntityKind::Tours;

    fn role_columns(&self) -> Vec<(LogicalRole, &str)> {
        vec![
            (LogicalRole::UserId, self.user_id.as_str()),
            (LogicalRole::StartedAt, self.started_at.as_str()),
            (LogicalRole::FinishedAt, self.finished_at.as_str()),
            (
                LogicalRole::OriginDestinationLocationId,
                self.origin_destination_location_id.as_str(),
            ),
            (LogicalRole::Journey, self.journey.as_str()),
        ]
    }

    fn extra(&self) -> &BTreeMap<String, String> {
        &self.extra
    }
}
