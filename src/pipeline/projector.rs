use crate::error::SweeperError;
use crate::table::Table;
use std::collections::HashSet;
use tracing::debug;

/// Restricts a table to the named columns, in the order given.
///
/// A name listed twice is kept once, at its first position. An empty selection
/// yields a zero-column table that keeps the row count.
///
/// # Errors
/// `UnknownColumnError` naming the first column the table does not have.
pub fn select_columns<S: AsRef<str>>(table: &Table, names: &[S]) -> Result<Table, SweeperError> {
    let mut seen = HashSet::<&str>::with_capacity(names.len());
    let mut columns = Vec::with_capacity(names.len());
    for name in names {
        let name: &str = name.as_ref();
        if !seen.insert(name) {
            continue;
        }
        let column = table
            .column(name)
            .ok_or_else(|| SweeperError::UnknownColumnError(name.to_owned()))?;
        columns.push(column.clone());
    }

    debug!("Selected {} of {} columns", columns.len(), table.column_count());
    Ok(Table::from_parts(columns, table.row_count()))
}
