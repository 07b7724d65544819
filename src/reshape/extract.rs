//! Pattern extraction from free-text cells. Misses are `None`, never errors.

use crate::reshape::value::Value;
use once_cell::sync::Lazy;
use regex::Regex;

static CODE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{1,3}\.\d{3}-\d{3}").expect("Hardcode regex pattern"));

static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{2})\.(\d{2})\.(\d{4})").expect("Hardcode regex pattern"));

/// First product code (`X.XXX-XXX`, one to three leading digits) found in the
/// text cells, scanning left to right.
pub fn extract_code(cells: &[Value]) -> Option<String> {
    cells
        .iter()
        .filter_map(Value::as_text)
        .find_map(|text| CODE_PATTERN.find(text))
        .map(|found| found.as_str().to_owned())
}

/// `MM.YYYY` from the first `DD.MM.YYYY` date in `text`.
pub fn extract_month_year(text: &str) -> Option<String> {
    let captures = DATE_PATTERN.captures(text)?;
    Some(format!("{}.{}", &captures[2], &captures[3]))
}
