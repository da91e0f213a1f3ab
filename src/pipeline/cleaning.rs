//! Table cleaning operations.
//!
//! Each operation borrows the current table and returns a cleaned copy with a
//! status message for the user.

use crate::table::Column;
use crate::table::Table;
use crate::table::Value;
use crate::table::value::ValueKey;
use std::collections::HashSet;
use tracing::debug;

/// Outcome of a cleaning operation.
#[derive(Clone, Debug, PartialEq)]
pub struct CleaningResult {
    pub table: Table,
    /// Human-readable summary of what changed
    pub message: String,
}

/// Removes rows that repeat an earlier row across all columns.
/// The first occurrence is kept and row order is preserved.
pub fn remove_duplicates(table: &Table) -> CleaningResult {
    let mut seen = HashSet::<Vec<ValueKey>>::with_capacity(table.row_count());
    let kept: Vec<usize> = table
        .rows()
        .enumerate()
        .filter(|(_, row)| seen.insert(row.iter().map(|value| value.key()).collect()))
        .map(|(index, _)| index)
        .collect();

    let removed = table.row_count() - kept.len();
    let message = match removed {
        1 => "1 duplicate row removed.".to_owned(),
        count => format!("{count} duplicate rows removed."),
    };
    debug!("{message}");
    CleaningResult {
        table: table.take_rows(&kept),
        message,
    }
}

/// Replaces missing values of every numeric column with the column mean.
///
/// The mean is taken over the values present before any replacement. Numeric
/// columns without a single value are left as they are and reported; text
/// columns are never touched.
pub fn fill_missing_with_mean(table: &Table) -> CleaningResult {
    let mut filled = 0usize;
    let mut skipped = Vec::<&str>::new();
    let columns = table
        .columns()
        .iter()
        .map(|column| {
            if !column.kind().is_number() || column.null_count() == 0 {
                return column.clone();
            }
            match mean(column) {
                Some(mean) => {
                    filled += column.null_count();
                    let values = column
                        .values()
                        .iter()
                        .map(|value| match value {
                            Value::Null => Value::Number(mean),
                            value => value.clone(),
                        })
                        .collect();
                    Column::new(column.name(), values)
                }
                None => {
                    skipped.push(column.name());
                    column.clone()
                }
            }
        })
        .collect();

    let mut message = match filled {
        1 => "1 missing value filled with the column mean.".to_owned(),
        count => format!("{count} missing values filled with the column mean."),
    };
    if !skipped.is_empty() {
        message.push_str(&format!(" No eligible values in: {}.", skipped.join(", ")));
    }
    debug!("{message}");
    CleaningResult {
        table: Table::from_parts(columns, table.row_count()),
        message,
    }
}

/// Arithmetic mean of the present values, `None` when there are none.
fn mean(column: &Column) -> Option<f64> {
    let (sum, count) = column
        .values()
        .iter()
        .filter_map(Value::as_number)
        .fold((0f64, 0usize), |(sum, count), number| (sum + number, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}
