//! # Excel Filter
//!
//! Reshapes rows of a spreadsheet and writes a filtered, annotated copy.
//!
//! One pass over the first sheet of the input:
//!
//! - a cell starting with `УТ` is taken out of its row and appended to the next row;
//! - a leading `Поступление…` receipt label is carried into the first cell of
//!   every following row until another receipt replaces it;
//! - a product code (`X.XXX-XXX`) and the month/year of the receipt date are
//!   extracted into trailing `Code` and `Month_Year` columns;
//! - rows whose second reshaped cell has no letters are dropped.
//!
//! Before writing, the first column still holding a `УТ` marker is removed.
//!
//! ## Supported formats
//!
//! - Input: Office Open XML (`.xlsx`, `.xlsm`) and OpenDocument (`.ods`)
//! - Output: Office Open XML (`.xlsx`)

pub mod config;
pub mod error;
mod helpers;
pub mod reshape;
pub mod spreadsheet;

use crate::config::Config;
use crate::error::ExcelFilterError;
use crate::spreadsheet::output::Header;
use tracing::info;

/// Outcome of a successful [`run`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub rows_read: usize,
    pub rows_retained: usize,
    pub removed_column: Option<Header>,
}

/// Loads the input, reshapes its rows and saves the result.
///
/// Nothing is written when loading fails, and a failed save leaves no output file.
pub fn run(config: &Config) -> Result<RunSummary, ExcelFilterError> {
    info!(input = %config.input_path.display(), output = %config.output_path.display(), "starting pass");
    let rows = spreadsheet::load(&config.input_path)?;
    let rows_read = rows.len();

    let table = reshape::filter_rows(rows);
    let removed_column = spreadsheet::save(table.rows(), table.codes(), table.month_years(), &config.output_path)?;

    info!(rows_read, rows_retained = table.len(), "finished pass");
    Ok(RunSummary { rows_read, rows_retained: table.len(), removed_column })
}
