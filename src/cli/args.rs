//! CLI argument definitions using clap
//!
//! Commands:
//! - trackmodel certify --entity <kind> --input <path> [--config <path>] [--references <path>]
//! - trackmodel schema --entity <kind>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::schema::EntityKind;

/// trackmodel - canonical schemas for movement data
#[derive(Parser, Debug)]
#[command(name = "trackmodel")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Normalize and certify a table
    Certify {
        /// Entity type: positionfixes, staypoints, triplegs, trips, locations, tours
        #[arg(long)]
        entity: EntityKind,

        /// Table JSON file, or "-" for stdin
        #[arg(long)]
        input: PathBuf,

        /// Column mapping configuration
        #[arg(long)]
        config: Option<PathBuf>,

        /// Table the entity refers to, in canonical column names; required
        /// for trips (staypoints) and tours (locations)
        #[arg(long)]
        references: Option<PathBuf>,
    },

    /// Print the canonical schema of an entity type
    Schema {
        #[arg(long)]
        entity: EntityKind,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
