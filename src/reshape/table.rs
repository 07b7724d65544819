use crate::reshape::state::ReshapedRow;
use crate::reshape::state::RowReshaper;
use crate::reshape::value::Row;
use tracing::debug;
use tracing::info;

/// Retained rows with their index-aligned codes and month/year pairs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilteredTable {
    rows: Vec<Row>,
    codes: Vec<Option<String>>,
    month_years: Vec<Option<String>>,
}

impl FilteredTable {
    pub fn push(&mut self, row: ReshapedRow) {
        self.rows.push(row.cells);
        self.codes.push(row.code);
        self.month_years.push(row.month_year);
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn codes(&self) -> &[Option<String>] {
        &self.codes
    }

    pub fn month_years(&self) -> &[Option<String>] {
        &self.month_years
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Runs one reshaping pass over `rows` in order and keeps the retained rows.
/// Dropped rows still update the carried marker and receipt.
pub fn filter_rows<I>(rows: I) -> FilteredTable
where
    I: IntoIterator<Item = Row>,
{
    let mut reshaper = RowReshaper::new();
    let mut total = 0;
    let table = rows.into_iter().enumerate().fold(FilteredTable::default(), |mut table, (index, row)| {
        total += 1;
        let reshaped = reshaper.reshape(row);
        if reshaped.is_retained() {
            table.push(reshaped);
        } else {
            debug!(row = index, "dropped row without letters after the receipt");
        }
        table
    });
    reshaper.finish();

    info!(rows = total, retained = table.len(), "reshaped rows");
    table
}
