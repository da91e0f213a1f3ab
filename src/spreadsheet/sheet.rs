use crate::error::CodecError;
use crate::spreadsheet::cell::Cell;
use crate::table::Column;
use crate::table::Table;
use crate::table::Value;
use std::collections::HashMap;
use std::collections::HashSet;

/// Sparse grid of the cells read from one sheet, with the bounds of the used range.
pub(crate) struct Sheet {
    /// Source file name
    pub(crate) file_name: String,
    /// Sheet name
    pub(crate) name: String,
    cells: Vec<Cell>,
    /// Position of each cell in `cells`
    indexes: HashMap<(usize, usize), usize>,
    pub(crate) row_lower_bound: Option<usize>,
    pub(crate) row_upper_bound: Option<usize>,
    pub(crate) col_lower_bound: Option<usize>,
    pub(crate) col_upper_bound: Option<usize>,
}

impl Sheet {
    pub(crate) fn new(file_name: &str, name: &str) -> Self {
        Self {
            file_name: file_name.to_owned(),
            name: name.to_owned(),
            cells: Vec::new(),
            indexes: HashMap::new(),
            row_lower_bound: None,
            row_upper_bound: None,
            col_lower_bound: None,
            col_upper_bound: None,
        }
    }

    /// Returns true if the sheet contains no cells.
    pub(crate) fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Adds a cell; a later cell at the same position replaces the earlier one.
    pub(crate) fn push(&mut self, cell: Cell) {
        self.update_bound(cell.row, cell.col);
        match self.indexes.get(&(cell.row, cell.col)) {
            Some(index) => self.cells[*index] = cell,
            None => {
                self.indexes.insert((cell.row, cell.col), self.cells.len());
                self.cells.push(cell);
            }
        }
    }

    fn update_bound(&mut self, row: usize, col: usize) {
        if self.row_lower_bound.map(|row_lower_bound| row < row_lower_bound).unwrap_or(true) {
            self.row_lower_bound = Some(row);
        }
        if self.row_upper_bound.map(|row_upper_bound| row_upper_bound < row).unwrap_or(true) {
            self.row_upper_bound = Some(row);
        }
        if self.col_lower_bound.map(|col_lower_bound| col < col_lower_bound).unwrap_or(true) {
            self.col_lower_bound = Some(col);
        }
        if self.col_upper_bound.map(|col_upper_bound| col_upper_bound < col).unwrap_or(true) {
            self.col_upper_bound = Some(col);
        }
    }

    pub(crate) fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.indexes.get(&(row, col)).map(|index| &self.cells[*index])
    }

    /// Column names taken from the first used row.
    /// Blank names become `Unnamed: <index>` and repeated names get a `.N` suffix.
    pub(crate) fn header(&self) -> Result<Vec<String>, CodecError> {
        let (Some(row), Some(col_lower), Some(col_upper)) = (self.row_lower_bound, self.col_lower_bound, self.col_upper_bound) else {
            return Ok(Vec::new());
        };
        let names = (col_lower..=col_upper)
            .map(|col| {
                let name = self.get(row, col)
                    .map(Cell::to_value)
                    .transpose()?
                    .map(|value| value.to_string())
                    .unwrap_or_default();
                if name.trim().is_empty() {
                    Ok(format!("Unnamed: {}", col - col_lower))
                } else {
                    Ok(name)
                }
            })
            .collect::<Result<Vec<String>, CodecError>>()?;
        Ok(unique_names(names))
    }

    /// Builds the table below the header row, turning null literals into
    /// missing values and inferring each column's type.
    pub(crate) fn to_table(&self, nulls: &HashSet<String>) -> Result<Table, CodecError> {
        let (Some(row_lower), Some(row_upper), Some(col_lower)) = (self.row_lower_bound, self.row_upper_bound, self.col_lower_bound) else {
            return Ok(Table::default());
        };
        let rows = (row_lower + 1)..=row_upper;
        let row_count = rows.clone().count();
        let columns = self.header()?
            .into_iter()
            .enumerate()
            .map(|(offset, name)| {
                let col = col_lower + offset;
                let values = rows.clone()
                    .map(|row| match self.get(row, col) {
                        Some(cell) => cell.to_value().map(|value| match value {
                            Value::Text(text) if nulls.contains(&text) => Value::Null,
                            value => value,
                        }),
                        None => Ok(Value::Null),
                    })
                    .collect::<Result<Vec<Value>, CodecError>>()?;
                Ok(Column::infer(name, values))
            })
            .collect::<Result<Vec<Column>, CodecError>>()?;
        Ok(Table::from_parts(columns, row_count))
    }
}

fn unique_names(names: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::<String>::new();
    names
        .into_iter()
        .map(|name| {
            let mut candidate = name.clone();
            let mut suffix = 0usize;
            while seen.contains(&candidate) {
                suffix += 1;
                candidate = format!("{name}.{suffix}");
            }
            seen.insert(candidate.clone());
            candidate
        })
        .collect()
}
