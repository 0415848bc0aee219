//! CLI command implementations
//!
//! Commands are thin wrappers around the entity facade: they load inputs,
//! call one facade operation and write a single JSON response.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::model::{self, ModelError, Stage};
use crate::normalize::ColumnMapping;
use crate::observability::{self, Event};
use crate::reference::ReferencePolicy;
use crate::schema::{self as registry, CertifiedTable, EntityKind, LogicalRole, SchemaValidator};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_table, write_result};

/// Mapping configuration file
///
/// ```json
/// {
///   "columns": {"geom": "lat_lon_geom", "user_id": "uid"},
///   "extra": {"acc": "accuracy"},
///   "nullable": {"origin_staypoint_id": false}
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MappingConfig {
    /// Logical role → input column name
    pub columns: BTreeMap<LogicalRole, String>,

    /// Input column name → output column name
    pub extra: BTreeMap<String, String>,

    /// Reference role → whether nulls are accepted
    pub nullable: ReferencePolicy,
}

impl MappingConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: MappingConfig = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        tracing::debug!(
            event = %Event::ConfigLoaded,
            path = %path.display(),
            roles = config.columns.len(),
            extra = config.extra.len(),
            "mapping configuration loaded"
        );

        Ok(config)
    }

    /// Checks that every role named in the file belongs to `entity`
    pub fn validate_for(&self, entity: EntityKind) -> CliResult<()> {
        let schema = registry::schema(entity);

        for role in self.columns.keys() {
            if schema.column(*role).is_none() {
                return Err(CliError::config_error(format!(
                    "Role '{}' is not defined for {}",
                    role.as_str(),
                    entity
                )));
            }
        }

        for role in self.nullable.roles() {
            if !schema.column(role).is_some_and(|spec| spec.is_reference()) {
                return Err(CliError::config_error(format!(
                    "Role '{}' is not a reference column of {}",
                    role.as_str(),
                    entity
                )));
            }
        }

        Ok(())
    }

    pub fn mapping(&self) -> ColumnMapping {
        ColumnMapping {
            columns: self.columns.clone(),
            extra: self.extra.clone(),
        }
    }
}

/// Main CLI entry point
///
/// Installs logging, parses arguments and dispatches to the command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    observability::init_logging();
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command and write its JSON response
///
/// Failures are written as a JSON error response and then returned.
pub fn run_command(cmd: Command) -> CliResult<()> {
    let result = match cmd {
        Command::Certify {
            entity,
            input,
            config,
            references,
        } => certify(entity, &input, config.as_deref(), references.as_deref()),
        Command::Schema { entity } => schema(entity),
    };

    write_result(&result)?;
    result.map(|_| ())
}

/// Normalize and certify the table at `input` as `entity`
///
/// Entities with reference columns (trips, tours) need `references`: the
/// table it holds is certified as the reference target (staypoints for
/// trips, locations for tours) and every reference column is checked
/// against it. Other entities must not be given one.
pub fn certify(
    entity: EntityKind,
    input: &Path,
    config: Option<&Path>,
    references: Option<&Path>,
) -> CliResult<Value> {
    let config = match config {
        Some(path) => MappingConfig::load(path)?,
        None => MappingConfig::default(),
    };
    config.validate_for(entity)?;

    let referenced = match (reference_target(entity), references) {
        (Some(target), Some(path)) => Some(load_referenced(target, path)?),
        (Some(target), None) => {
            return Err(CliError::config_error(format!(
                "{} refer to {}; pass --references",
                entity, target
            )))
        }
        (None, Some(_)) => {
            return Err(CliError::config_error(format!(
                "{} has no reference columns",
                entity
            )))
        }
        (None, None) => None,
    };

    let table = read_table(input)?;
    let certified = model::certify_with_policy(entity, &table, &config.mapping(), &config.nullable)
        .inspect_err(log_rejection)?;

    let report = match &referenced {
        Some(referenced) => Some(
            model::check_references(&certified, referenced, &config.nullable)
                .inspect_err(log_rejection)?,
        ),
        None => None,
    };

    tracing::info!(
        event = %Event::TableCertified,
        entity = %entity,
        rows = certified.len(),
        "table certified"
    );

    Ok(json!({
        "entity": entity,
        "rows": certified.len(),
        "references": report,
        "table": certified.table(),
    }))
}

/// Print the registry entry for `entity`
pub fn schema(entity: EntityKind) -> CliResult<Value> {
    Ok(serde_json::to_value(registry::schema(entity))?)
}

/// Entity type the reference columns of `entity` point into
fn reference_target(entity: EntityKind) -> Option<EntityKind> {
    registry::schema(entity)
        .reference_columns()
        .find_map(|spec| match spec.kind {
            registry::ColumnKind::Reference { target, .. } => Some(target),
            _ => None,
        })
}

fn load_referenced(target: EntityKind, path: &Path) -> CliResult<CertifiedTable> {
    let table = read_table(path)?;
    SchemaValidator::new(target)
        .certify(table)
        .map_err(|e| CliError::from(ModelError::from(e)))
}

fn log_rejection(err: &ModelError) {
    let event = match err.stage() {
        Stage::Normalize => Event::NormalizationRejected,
        Stage::Validate => Event::CertificationRejected,
        Stage::Reference => Event::ReferencesRejected,
    };
    tracing::warn!(
        event = %event,
        stage = %err.stage(),
        code = %err.code(),
        "certification failed"
    );
}
