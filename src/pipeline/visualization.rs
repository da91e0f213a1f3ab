use crate::table::Table;

/// Number of numeric columns plotted
const CHART_COLUMNS: usize = 2;

/// Picks the first two numeric columns for charting, in column order.
/// Fewer numeric columns give a narrower, possibly empty, table.
pub fn chart_data(table: &Table) -> Table {
    let columns = table
        .columns()
        .iter()
        .filter(|column| column.kind().is_number())
        .take(CHART_COLUMNS)
        .cloned()
        .collect();
    Table::from_parts(columns, table.row_count())
}
