//! Row reshaping: the stateful pass that moves markers between rows and
//! extracts codes and month/year pairs from free text.

mod extract;
mod state;
mod table;
mod value;

pub use extract::extract_code;
pub use extract::extract_month_year;
pub use state::ReshapeState;
pub use state::ReshapedRow;
pub use state::RowReshaper;
pub use state::RECEIPT_PREFIX;
pub use state::UT_PREFIX;
pub use table::filter_rows;
pub use table::FilteredTable;
pub use value::Row;
pub use value::Value;
