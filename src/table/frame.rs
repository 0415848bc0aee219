//! Table and column containers
//!
//! A table owns its index and columns. Operations that change column names
//! return a new table; nothing here mutates a caller's table in place.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::errors::{TableError, TableResult};
use super::types::{RowId, Value};

/// A named column of cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    name: String,
    values: Vec<Value>,
}

impl Column {
    /// Create a column from any iterator of values convertible into cells
    pub fn new<I, V>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn with_name(&self, name: &str) -> Self {
        Self {
            name: name.to_string(),
            values: self.values.clone(),
        }
    }
}

/// A table of rows sharing a uniform set of columns.
///
/// Invariants upheld at construction:
/// - Every column has exactly one value per index entry
/// - Column names are unique
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    index: Vec<RowId>,
    columns: Vec<Column>,
}

impl Table {
    /// Create a table from an explicit index and columns.
    ///
    /// # Errors
    ///
    /// Returns `TableError` if:
    /// - A column's length differs from the index length
    /// - Two columns share a name
    pub fn new(index: Vec<RowId>, columns: Vec<Column>) -> TableResult<Self> {
        let mut seen = HashSet::with_capacity(columns.len());

        for column in &columns {
            if column.len() != index.len() {
                return Err(TableError::LengthMismatch {
                    column: column.name.clone(),
                    expected: index.len(),
                    found: column.len(),
                });
            }
            if !seen.insert(column.name.as_str()) {
                return Err(TableError::DuplicateColumn(column.name.clone()));
            }
        }

        Ok(Self { index, columns })
    }

    /// Create a table with the default `0..n` index
    pub fn from_columns(columns: Vec<Column>) -> TableResult<Self> {
        let rows = columns.first().map_or(0, Column::len);
        Self::new((0..rows as RowId).collect(), columns)
    }

    /// Start building a table column by column
    pub fn builder() -> TableBuilder {
        TableBuilder::default()
    }

    pub fn index(&self) -> &[RowId] {
        &self.index
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Column names in table order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Row identifiers of the rows at the given positions
    pub fn row_ids_at<I>(&self, positions: I) -> Vec<RowId>
    where
        I: IntoIterator<Item = usize>,
    {
        positions.into_iter().map(|p| self.index[p]).collect()
    }

    /// Returns a copy of this table with columns renamed.
    ///
    /// Columns not named in `renames` keep their name. The caller is
    /// responsible for ensuring the result has no duplicate names; a
    /// collision is reported as `TableError::DuplicateColumn`.
    pub fn renamed(&self, renames: &BTreeMap<String, String>) -> TableResult<Self> {
        let columns = self
            .columns
            .iter()
            .map(|c| match renames.get(&c.name) {
                Some(target) => c.with_name(target),
                None => c.clone(),
            })
            .collect();

        Self::new(self.index.clone(), columns)
    }
}

impl<'de> Deserialize<'de> for Table {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawTable {
            index: Option<Vec<RowId>>,
            columns: Vec<Column>,
        }

        let raw = RawTable::deserialize(deserializer)?;
        let result = match raw.index {
            Some(index) => Table::new(index, raw.columns),
            None => Table::from_columns(raw.columns),
        };
        result.map_err(serde::de::Error::custom)
    }
}

/// Incremental table construction.
#[derive(Debug, Default)]
pub struct TableBuilder {
    index: Option<Vec<RowId>>,
    columns: Vec<Column>,
}

impl TableBuilder {
    /// Set an explicit row index; defaults to `0..n`
    pub fn index<I: IntoIterator<Item = RowId>>(mut self, index: I) -> Self {
        self.index = Some(index.into_iter().collect());
        self
    }

    pub fn column<I, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.columns.push(Column::new(name, values));
        self
    }

    pub fn build(self) -> TableResult<Table> {
        match self.index {
            Some(index) => Table::new(index, self.columns),
            None => Table::from_columns(self.columns),
        }
    }
}
