//! Cross-entity reference checking
//!
//! Verifies that reference columns (trip → staypoint, tour → location)
//! resolve to row identifiers of an already-certified referenced table.
//! Both tables are only read.

mod checker;
mod errors;
mod rules;

pub use checker::{ReferenceChecker, ReferenceOutcome, ReferenceReport};
pub use errors::{ReferenceError, ReferenceFailure, ReferenceResult, ReferentialViolation};
pub use rules::{ReferencePolicy, ReferenceRule};
