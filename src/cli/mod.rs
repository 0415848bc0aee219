//! CLI module for trackmodel
//!
//! Provides command-line interface for:
//! - certify: Normalize and certify a JSON table as one entity type
//! - schema: Print the canonical schema of an entity type

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{certify, run, run_command, schema, MappingConfig};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{envelope, read_table, write_result};
