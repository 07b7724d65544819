//! The table as it is written: positional columns from the reshaped rows,
//! followed by the extracted `Code` and `Month_Year` columns.

use crate::reshape::Row;
use crate::reshape::Value;
use std::fmt::Display;

pub const CODE_HEADER: &str = "Code";
pub const MONTH_YEAR_HEADER: &str = "Month_Year";

/// Column label of the output table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Header {
    /// Position of the column in the reshaped rows, kept after other columns are removed
    Position(usize),
    Name(&'static str),
}

impl Display for Header {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Header::Position(position) => write!(f, "{}", position),
            Header::Name(name) => write!(f, "{}", name),
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct OutputTable {
    pub headers: Vec<Header>,
    pub rows: Vec<Row>,
}

impl OutputTable {
    /// Builds the table from reshaped rows and their index-aligned extractions.
    /// Rows shorter than the widest one are padded with `Value::Empty`.
    pub fn new(rows: &[Row], codes: &[Option<String>], month_years: &[Option<String>]) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut headers: Vec<Header> = (0..width).map(Header::Position).collect();
        headers.push(Header::Name(CODE_HEADER));
        headers.push(Header::Name(MONTH_YEAR_HEADER));

        let to_value = |value: Option<&Option<String>>| match value {
            Some(Some(text)) => Value::Text(text.to_owned()),
            _ => Value::Empty,
        };
        let rows = rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let mut record = Vec::with_capacity(width + 2);
                record.extend(row.iter().cloned());
                record.resize(width, Value::Empty);
                record.push(to_value(codes.get(index)));
                record.push(to_value(month_years.get(index)));
                record
            })
            .collect();
        OutputTable { headers, rows }
    }

    /// Removes the leftmost column in which any stringified value contains
    /// `marker`. At most one column is removed.
    pub fn remove_first_column_containing(&mut self, marker: &str) -> Option<Header> {
        let column = (0..self.headers.len()).find(|&column| {
            self.rows
                .iter()
                .any(|row| row.get(column).is_some_and(|value| value.to_string().contains(marker)))
        })?;
        for row in &mut self.rows {
            if column < row.len() {
                row.remove(column);
            }
        }
        Some(self.headers.remove(column))
    }
}
