//! # Table Model
//!
//! In-memory ordered set of named, equal-length columns. Every pipeline stage
//! takes a `&Table` and returns a new `Table`, so a failed stage can never leave
//! a half-modified table behind.
use std::collections::HashSet;
use thiserror::Error;

pub(crate) mod column;
pub(crate) mod value;

pub use column::{Column, ColumnType};
pub use value::Value;

/// Errors raised when building a table by hand.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Column '{name}' has {actual} rows, expected {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Duplicate column name '{0}'")]
    DuplicateColumn(String),
}

/// Ordered, named, equal-length columns.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    /// Kept separately so a zero-column table still knows its row count
    row_count: usize,
}

impl Table {
    /// Builds a table, checking that names are unique and lengths agree.
    pub fn try_new(columns: Vec<Column>) -> Result<Table, TableError> {
        let row_count = columns.first().map(Column::len).unwrap_or(0);
        let mut names = HashSet::new();
        for column in &columns {
            if column.len() != row_count {
                return Err(TableError::LengthMismatch {
                    name: column.name.to_owned(),
                    expected: row_count,
                    actual: column.len(),
                });
            }
            if !names.insert(column.name.as_str()) {
                return Err(TableError::DuplicateColumn(column.name.to_owned()));
            }
        }
        Ok(Table { columns, row_count })
    }

    /// Builds a table whose invariants the caller already upholds.
    pub(crate) fn from_parts(columns: Vec<Column>, row_count: usize) -> Table {
        debug_assert!(columns.iter().all(|column| column.len() == row_count));
        Table { columns, row_count }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Returns true if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// Values of one row across all columns, or `None` past the last row.
    pub fn row(&self, index: usize) -> Option<Vec<&Value>> {
        if index < self.row_count {
            Some(self.columns.iter().map(|column| &column.values[index]).collect())
        } else {
            None
        }
    }

    /// Iterates rows in order.
    pub fn rows(&self) -> impl Iterator<Item = Vec<&Value>> + '_ {
        (0..self.row_count).map(move |index| {
            self.columns.iter().map(|column| &column.values[index]).collect()
        })
    }

    /// Returns the first `rows` rows, used for previews.
    pub fn head(&self, rows: usize) -> Table {
        let indexes: Vec<usize> = (0..self.row_count.min(rows)).collect();
        self.take_rows(&indexes)
    }

    /// Copies the rows selected by `indexes`, in that order.
    pub(crate) fn take_rows(&self, indexes: &[usize]) -> Table {
        let columns = self.columns.iter().map(|column| column.take(indexes)).collect();
        Table::from_parts(columns, indexes.len())
    }
}
