//! Entity facade
//!
//! Per-entity entry points that turn a raw table into a certified one:
//! column normalization, schema validation and, where the entity refers
//! to another, reference checking.

mod errors;
mod facade;
mod options;

pub use errors::{ErrorCode, ModelError, ModelResult, Stage};
pub use facade::{
    certify, certify_with_policy, check_references, locations, positionfixes, staypoints, tours,
    trips, triplegs,
};
pub use options::{
    EntityOptions, LocationOptions, PositionfixOptions, StaypointOptions, TourOptions,
    TripOptions, TriplegOptions,
};
