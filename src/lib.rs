//! trackmodel - canonical schemas for movement data
//!
//! Raw tables of geolocated records are mapped onto one of six entity
//! types (positionfixes, staypoints, triplegs, trips, locations, tours)
//! and certified against that type's schema before downstream use.
//!
//! Pipeline: `normalize` → `schema` validation → `reference` checks,
//! composed per entity by `model`.

pub mod cli;
pub mod model;
pub mod normalize;
pub mod observability;
pub mod reference;
pub mod schema;
pub mod table;

pub use model::{ModelError, ModelResult};
pub use schema::{CertifiedTable, EntityKind};
pub use table::{Table, Value};
