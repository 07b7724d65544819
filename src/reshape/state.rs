use crate::reshape::extract::extract_code;
use crate::reshape::extract::extract_month_year;
use crate::reshape::value::Row;
use crate::reshape::value::Value;
use tracing::warn;

/// Prefix of the marker cell carried one row down
pub const UT_PREFIX: &str = "УТ";

/// Prefix of the receipt label carried down until a new one appears
pub const RECEIPT_PREFIX: &str = "Поступление";

/// Values carried between consecutive rows of one pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReshapeState {
    pub pending_ut_marker: Option<String>,
    pub current_receipt: Option<String>,
}

/// One row after reshaping, with the values extracted from it.
#[derive(Clone, Debug, PartialEq)]
pub struct ReshapedRow {
    pub cells: Row,
    pub code: Option<String>,
    pub month_year: Option<String>,
}

impl ReshapedRow {
    /// Kept when the cell after the receipt is text with at least one letter.
    pub fn is_retained(&self) -> bool {
        self.cells
            .get(1)
            .and_then(Value::as_text)
            .is_some_and(|text| text.chars().any(char::is_alphabetic))
    }
}

/// Reshapes rows one at a time, in input order.
///
/// For every row:
/// 1. the first text cell starting with [`UT_PREFIX`] is taken out of the row;
/// 2. a leading text cell starting with [`RECEIPT_PREFIX`] replaces the current
///    receipt and is taken out of the row, its date giving the month/year;
/// 3. a marker pending from the previous row is appended; otherwise this row's
///    marker (if any) becomes pending and an empty cell is appended;
/// 4. the current receipt is inserted as the first cell;
/// 5. the first product code across all cells is extracted.
#[derive(Debug, Default)]
pub struct RowReshaper {
    state: ReshapeState,
}

impl RowReshaper {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn state(&self) -> &ReshapeState {
        &self.state
    }

    pub fn reshape(&mut self, mut cells: Row) -> ReshapedRow {
        let ut_marker = cells
            .iter()
            .position(|cell| cell.as_text().is_some_and(|text| text.starts_with(UT_PREFIX)))
            .and_then(|index| match cells.remove(index) {
                Value::Text(text) => Some(text),
                _ => None,
            });

        let mut month_year = None;
        if let Some(Value::Text(text)) = cells.first() {
            if text.starts_with(RECEIPT_PREFIX) {
                month_year = extract_month_year(text);
                if let Value::Text(receipt) = cells.remove(0) {
                    self.state.current_receipt = Some(receipt);
                }
            }
        }

        match self.state.pending_ut_marker.take() {
            Some(pending) => cells.push(Value::Text(pending)),
            None => {
                self.state.pending_ut_marker = ut_marker;
                cells.push(Value::Empty);
            }
        }

        cells.insert(0, self.state.current_receipt.clone().into());

        let code = extract_code(&cells);
        ReshapedRow { cells, code, month_year }
    }

    /// Ends the pass. A marker still pending has no row left to land on.
    pub fn finish(self) -> ReshapeState {
        if let Some(marker) = &self.state.pending_ut_marker {
            warn!(%marker, "marker on the last row has no following row, dropped");
        }
        self.state
    }
}
