use crate::reshape::Row;
use crate::reshape::Value;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::SpreadsheetError;

/// Sparse cells collected from one sheet, densified into rows once reading is done.
pub(crate) struct Sheet {
    /// Source file name
    pub(crate) file_name: String,
    /// Sheet name
    pub(crate) name: String,
    /// All non-empty cells in the sheet
    pub(crate) cells: Vec<Cell>,
    /// Actual data range (determined from cell data)
    pub(crate) row_upper_bound: Option<usize>,
    pub(crate) col_upper_bound: Option<usize>,
}

impl Sheet {
    pub(super) fn new(file_name: &str, name: &str) -> Self {
        Self {
            file_name: file_name.to_owned(),
            name: name.to_owned(),
            cells: Vec::new(),
            row_upper_bound: None,
            col_upper_bound: None,
        }
    }

    pub(super) fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Adds a cell to the sheet, updating the data range.
    pub(super) fn push(&mut self, cell: Cell) {
        if self.row_upper_bound.map(|row_upper_bound| row_upper_bound < cell.row).unwrap_or(true) {
            self.row_upper_bound = Some(cell.row);
        }
        if self.col_upper_bound.map(|col_upper_bound| col_upper_bound < cell.col).unwrap_or(true) {
            self.col_upper_bound = Some(cell.col);
        }
        self.cells.push(cell);
    }

    /// Builds a rectangular table anchored at A1: every row has the same width
    /// and positions without a cell hold `Value::Empty`.
    pub(crate) fn into_rows(self, shared_strings: &[String]) -> Result<Vec<Row>, SpreadsheetError> {
        if self.is_empty() {
            return Ok(Vec::new());
        }
        let (row_upper_bound, col_upper_bound) = self.row_upper_bound.zip(self.col_upper_bound).unwrap_or_default();
        let mut rows = vec![vec![Value::Empty; col_upper_bound + 1]; row_upper_bound + 1];
        for cell in &self.cells {
            let value = cell.to_value(shared_strings).map_err(|message| {
                SpreadsheetError::CellValueError(
                    self.file_name.to_owned(),
                    self.name.to_owned(),
                    cell.reference(),
                    message,
                )
            })?;
            rows[cell.row][cell.col] = value;
        }
        Ok(rows)
    }
}
