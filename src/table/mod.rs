//! Tabular-geometric table model
//!
//! The unit every other subsystem operates on:
//! - A row-identifier index (`RowId`)
//! - Ordered, uniquely-named columns
//! - Dynamically typed cells, one of which is a `geo` geometry
//!
//! Readers hand `Table`s to the core; nothing here parses files.

mod errors;
mod frame;
mod types;

pub use errors::{TableError, TableResult};
pub use frame::{Column, Table, TableBuilder};
pub use types::{GeometryKind, RowId, Value};
