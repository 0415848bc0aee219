//! Entity facade
//!
//! One operation per entity type, each composing
//! normalize → validate → (reference check, for trips and tours).
//! The first failing stage ends the call.

use crate::normalize::{ColumnMapping, ColumnNormalizer};
use crate::reference::{ReferenceChecker, ReferencePolicy, ReferenceReport};
use crate::schema::{CertifiedTable, EntityKind};
use crate::table::Table;

use super::errors::ModelResult;
use super::options::{
    EntityOptions, LocationOptions, PositionfixOptions, StaypointOptions, TourOptions,
    TripOptions, TriplegOptions,
};

/// Normalizes and certifies `table` as `entity`, with registry nullability.
///
/// The caller's table is not modified.
pub fn certify(
    entity: EntityKind,
    table: &Table,
    mapping: &ColumnMapping,
) -> ModelResult<CertifiedTable> {
    certify_with_policy(entity, table, mapping, &ReferencePolicy::new())
}

/// Like [`certify`], with reference nullability taken from `policy`.
///
/// Nulls in a non-nullable reference column, or its absence, fail
/// validation even when no referenced table is at hand.
pub fn certify_with_policy(
    entity: EntityKind,
    table: &Table,
    mapping: &ColumnMapping,
    policy: &ReferencePolicy,
) -> ModelResult<CertifiedTable> {
    let normalized = ColumnNormalizer::new(entity).normalize(table, mapping)?;
    let certified = policy.validator(entity).certify(normalized)?;
    Ok(certified)
}

/// Checks the reference columns of a certified table against the table
/// they point into, with `policy` applied over the registry defaults.
pub fn check_references(
    referencing: &CertifiedTable,
    referenced: &CertifiedTable,
    policy: &ReferencePolicy,
) -> ModelResult<ReferenceReport> {
    let rules = policy.rules(referencing.entity());
    let report = ReferenceChecker::new(referenced).check(referencing, &rules)?;
    Ok(report)
}

fn certify_with<O: EntityOptions>(table: &Table, options: &O) -> ModelResult<CertifiedTable> {
    certify(O::ENTITY, table, &options.mapping())
}

/// Certifies a positionfixes table (point geometry, `tracked_at` instant).
pub fn positionfixes(table: &Table, options: &PositionfixOptions) -> ModelResult<CertifiedTable> {
    certify_with(table, options)
}

/// Certifies a staypoints table (point geometry, interval).
pub fn staypoints(table: &Table, options: &StaypointOptions) -> ModelResult<CertifiedTable> {
    certify_with(table, options)
}

/// Certifies a triplegs table (line geometry, interval).
pub fn triplegs(table: &Table, options: &TriplegOptions) -> ModelResult<CertifiedTable> {
    certify_with(table, options)
}

/// Certifies a trips table.
///
/// Origin and destination references must resolve against `staypoints`;
/// nulls are allowed unless `options.nullable` forbids them.
pub fn trips(
    table: &Table,
    options: &TripOptions,
    staypoints: &CertifiedTable,
) -> ModelResult<CertifiedTable> {
    let certified = certify_with_policy(
        EntityKind::Trips,
        table,
        &options.mapping(),
        &options.nullable,
    )?;
    check_references(&certified, staypoints, &options.nullable)?;
    Ok(certified)
}

/// Certifies a locations table (point center, optional polygon extent).
pub fn locations(table: &Table, options: &LocationOptions) -> ModelResult<CertifiedTable> {
    certify_with(table, options)
}

/// Certifies a tours table.
///
/// The origin/destination location reference must resolve against
/// `locations` and is non-null unless `options.nullable` allows it.
pub fn tours(
    table: &Table,
    options: &TourOptions,
    locations: &CertifiedTable,
) -> ModelResult<CertifiedTable> {
    let certified = certify_with_policy(
        EntityKind::Tours,
        table,
        &options.mapping(),
        &options.nullable,
    )?;
    check_references(&certified, locations, &options.nullable)?;
    Ok(certified)
}
