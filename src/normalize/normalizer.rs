//! Column normalizer
//!
//! Algorithm:
//! 1. Start from the registry's default mapping (role → canonical name)
//! 2. Replace the source column of any role the caller overrides
//! 3. Add the caller's passthrough renames
//! 4. Resolve every input column to its output name
//! 5. Reject the plan if any two input columns end up with the same name
//!
//! The plan is fully checked before the table is touched, so a conflict
//! never yields a partially renamed table.

use std::collections::{BTreeMap, BTreeSet};

use super::errors::{NormalizeError, NormalizeResult};
use super::mapping::ColumnMapping;
use crate::observability::Event;
use crate::schema::{self, EntityKind, EntitySchema};
use crate::table::Table;

/// A validated set of renames: input name → output name.
///
/// Only columns whose name actually changes are listed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenamePlan {
    renames: BTreeMap<String, String>,
}

impl RenamePlan {
    pub fn renames(&self) -> &BTreeMap<String, String> {
        &self.renames
    }

    pub fn is_identity(&self) -> bool {
        self.renames.is_empty()
    }
}

/// Column normalizer for one entity type.
#[derive(Debug, Clone, Copy)]
pub struct ColumnNormalizer {
    schema: &'static EntitySchema,
}

impl ColumnNormalizer {
    pub fn new(entity: EntityKind) -> Self {
        Self {
            schema: schema::schema(entity),
        }
    }

    /// Builds and checks the rename plan for `table` without renaming.
    ///
    /// # Errors
    ///
    /// - `UnknownRole` if an override names a role the entity does not define
    /// - `AmbiguousSource` if an input column is mapped to two names
    /// - `Conflict` if two input columns would share an output name
    pub fn plan(&self, table: &Table, mapping: &ColumnMapping) -> NormalizeResult<RenamePlan> {
        let claims = self.claims(mapping)?;

        let mut renames = BTreeMap::new();
        let mut outputs: BTreeMap<&str, Vec<&str>> = BTreeMap::new();

        for input in table.column_names() {
            let output = match claims.get(input) {
                Some(targets) if targets.len() > 1 => {
                    return Err(NormalizeError::AmbiguousSource {
                        source_column: input.to_string(),
                        targets: targets.iter().map(|t| t.to_string()).collect(),
                    });
                }
                Some(targets) => targets.iter().next().copied().unwrap_or(input),
                None => input,
            };

            if output != input {
                renames.insert(input.to_string(), output.to_string());
            }
            outputs.entry(output).or_default().push(input);
        }

        if let Some((target, sources)) = outputs.into_iter().find(|(_, s)| s.len() > 1) {
            let mut sources: Vec<String> = sources.into_iter().map(String::from).collect();
            sources.sort();
            return Err(NormalizeError::Conflict {
                target: target.to_string(),
                sources,
            });
        }

        Ok(RenamePlan { renames })
    }

    /// Returns a new table with canonical column names.
    ///
    /// The input table is not modified. Normalizing twice with the same
    /// mapping yields identical output.
    pub fn normalize(&self, table: &Table, mapping: &ColumnMapping) -> NormalizeResult<Table> {
        let entity = self.schema.entity;

        let plan = match self.plan(table, mapping) {
            Ok(plan) => plan,
            Err(err) => {
                tracing::debug!(
                    event = %Event::NormalizationRejected,
                    entity = %entity,
                    error = %err,
                    "column mapping rejected"
                );
                return Err(err);
            }
        };

        let normalized = if plan.is_identity() {
            table.clone()
        } else {
            table.renamed(plan.renames())?
        };

        tracing::debug!(
            event = %Event::ColumnsNormalized,
            entity = %entity,
            renamed = plan.renames().len(),
            "columns normalized"
        );

        Ok(normalized)
    }

    /// Source name → set of output names claimed for it.
    fn claims<'m>(
        &self,
        mapping: &'m ColumnMapping,
    ) -> NormalizeResult<BTreeMap<&'m str, BTreeSet<&'m str>>> {
        for role in mapping.columns.keys() {
            if self.schema.column(*role).is_none() {
                return Err(NormalizeError::UnknownRole {
                    entity: self.schema.entity,
                    role: *role,
                });
            }
        }

        let mut claims: BTreeMap<&'m str, BTreeSet<&'m str>> = BTreeMap::new();

        for spec in self.schema.columns {
            let source = mapping
                .columns
                .get(&spec.role)
                .map(String::as_str)
                .unwrap_or(spec.name);
            claims.entry(source).or_default().insert(spec.name);
        }

        for (from, to) in &mapping.extra {
            claims.entry(from.as_str()).or_default().insert(to.as_str());
        }

        Ok(claims)
    }
}
