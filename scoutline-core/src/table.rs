//! Row-aligned feature and reference tables.
//!
//! Both tables are populated once at startup and never mutated. The feature
//! table is row-major `f32` (the encoder's input layout); the reference
//! table is column-major with nullable cells, because archetype synthesis
//! reads whole original-scale columns while output shaping reads single
//! cells.

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;

use crate::{PlayerId, PositionGroup, UNKNOWN_GENDER, columns};

/// Errors raised while constructing a table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    /// The table contained no rows.
    #[error("{table} table must contain at least one row")]
    Empty {
        /// Human-readable table name.
        table: &'static str,
    },
    /// A player identifier appeared more than once.
    #[error("player id '{id}' appears more than once in the {table} table")]
    DuplicateId {
        /// Human-readable table name.
        table: &'static str,
        /// Offending identifier.
        id: PlayerId,
    },
    /// A feature row did not match the declared column count.
    #[error("feature row {row} has {actual} values but {expected} columns are declared")]
    RowWidthMismatch {
        /// Zero-based row index.
        row: usize,
        /// Declared column count.
        expected: usize,
        /// Observed value count.
        actual: usize,
    },
    /// The number of rows did not match the number of identifiers.
    #[error("{table} table has {ids} ids but {rows} rows")]
    RowCountMismatch {
        /// Human-readable table name.
        table: &'static str,
        /// Identifier count.
        ids: usize,
        /// Row count.
        rows: usize,
    },
    /// A reference column did not match the identifier count.
    #[error("reference column '{column}' has {actual} values but {expected} rows exist")]
    ColumnLengthMismatch {
        /// Offending column name.
        column: String,
        /// Expected row count.
        expected: usize,
        /// Observed value count.
        actual: usize,
    },
}

fn index_ids(table: &'static str, ids: &[PlayerId]) -> Result<HashMap<PlayerId, usize>, TableError> {
    let mut index = HashMap::with_capacity(ids.len());
    for (row, id) in ids.iter().enumerate() {
        if index.insert(id.clone(), row).is_some() {
            return Err(TableError::DuplicateId {
                table,
                id: id.clone(),
            });
        }
    }
    Ok(index)
}

/// Scaled, ML-ready feature rows keyed by player identifier.
#[derive(Debug, Clone)]
pub struct FeatureTable {
    ids: Vec<PlayerId>,
    columns: Vec<String>,
    rows: Vec<Vec<f32>>,
    column_index: HashMap<String, usize>,
}

impl FeatureTable {
    /// Validate and construct a feature table.
    ///
    /// # Errors
    /// Returns [`TableError`] when the table is empty, identifiers repeat,
    /// or any row's width disagrees with the declared columns.
    pub fn new(
        ids: Vec<PlayerId>,
        columns: Vec<String>,
        rows: Vec<Vec<f32>>,
    ) -> Result<Self, TableError> {
        if ids.is_empty() || columns.is_empty() {
            return Err(TableError::Empty { table: "feature" });
        }
        if ids.len() != rows.len() {
            return Err(TableError::RowCountMismatch {
                table: "feature",
                ids: ids.len(),
                rows: rows.len(),
            });
        }
        for (row, values) in rows.iter().enumerate() {
            if values.len() != columns.len() {
                return Err(TableError::RowWidthMismatch {
                    row,
                    expected: columns.len(),
                    actual: values.len(),
                });
            }
        }
        index_ids("feature", &ids)?;
        let column_index = columns
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), idx))
            .collect();
        Ok(Self {
            ids,
            columns,
            rows,
            column_index,
        })
    }

    /// Number of player rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True when the table holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ordered player identifiers.
    #[must_use]
    pub fn ids(&self) -> &[PlayerId] {
        &self.ids
    }

    /// Ordered column names.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// True when the named column exists.
    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.column_index.contains_key(column)
    }

    /// Full scaled feature row for a player.
    #[must_use]
    pub fn row(&self, row: usize) -> Option<&[f32]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    /// Single scaled value, when both the row and the column exist.
    #[must_use]
    pub fn value(&self, row: usize, column: &str) -> Option<f32> {
        let col = *self.column_index.get(column)?;
        self.rows.get(row)?.get(col).copied()
    }

    /// Single scaled value, with the table's missing-value default of `0.0`.
    #[must_use]
    pub fn value_or_zero(&self, row: usize, column: &str) -> f32 {
        self.value(row, column).unwrap_or(0.0)
    }
}

/// Original-scale reference rows keyed by the same player identifiers.
#[derive(Debug, Clone)]
pub struct ReferenceTable {
    ids: Vec<PlayerId>,
    numeric: BTreeMap<String, Vec<Option<f64>>>,
    text: BTreeMap<String, Vec<Option<String>>>,
}

impl ReferenceTable {
    /// Validate and construct a reference table.
    ///
    /// # Errors
    /// Returns [`TableError`] when the table is empty, identifiers repeat,
    /// or any column's length disagrees with the identifier count.
    pub fn new(
        ids: Vec<PlayerId>,
        numeric: BTreeMap<String, Vec<Option<f64>>>,
        text: BTreeMap<String, Vec<Option<String>>>,
    ) -> Result<Self, TableError> {
        if ids.is_empty() {
            return Err(TableError::Empty { table: "reference" });
        }
        for (column, values) in &numeric {
            if values.len() != ids.len() {
                return Err(TableError::ColumnLengthMismatch {
                    column: column.clone(),
                    expected: ids.len(),
                    actual: values.len(),
                });
            }
        }
        for (column, values) in &text {
            if values.len() != ids.len() {
                return Err(TableError::ColumnLengthMismatch {
                    column: column.clone(),
                    expected: ids.len(),
                    actual: values.len(),
                });
            }
        }
        index_ids("reference", &ids)?;
        Ok(Self { ids, numeric, text })
    }

    /// Number of player rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True when the table holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ordered player identifiers.
    #[must_use]
    pub fn ids(&self) -> &[PlayerId] {
        &self.ids
    }

    /// True when a numeric column of the given name exists.
    #[must_use]
    pub fn has_numeric_column(&self, column: &str) -> bool {
        self.numeric.contains_key(column)
    }

    /// True when a text column of the given name exists.
    #[must_use]
    pub fn has_text_column(&self, column: &str) -> bool {
        self.text.contains_key(column)
    }

    /// Whole numeric column, when present.
    #[must_use]
    pub fn numeric_column(&self, column: &str) -> Option<&[Option<f64>]> {
        self.numeric.get(column).map(Vec::as_slice)
    }

    /// Single numeric cell; `None` when the column or value is missing.
    #[must_use]
    pub fn numeric_value(&self, row: usize, column: &str) -> Option<f64> {
        self.numeric.get(column)?.get(row).copied().flatten()
    }

    /// Single text cell; `None` when the column or value is missing.
    #[must_use]
    pub fn text_value(&self, row: usize, column: &str) -> Option<&str> {
        self.text
            .get(column)?
            .get(row)
            .and_then(|value| value.as_deref())
    }

    /// Original-scale age for a row.
    #[must_use]
    pub fn age(&self, row: usize) -> Option<f64> {
        self.numeric_value(row, columns::AGE_ORIG)
    }

    /// Gender for a row; missing values read as the literal `"Unknown"`.
    #[must_use]
    pub fn gender(&self, row: usize) -> &str {
        self.text_value(row, columns::GENDER)
            .unwrap_or(UNKNOWN_GENDER)
    }

    /// Position group for a row, defaulting to [`PositionGroup::Unknown`].
    #[must_use]
    pub fn position_group(&self, row: usize) -> PositionGroup {
        PositionGroup::from_reference(self.text_value(row, columns::POSITION_GROUP))
    }
}
