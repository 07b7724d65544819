use crate::reshape::Value;
use crate::spreadsheet::reference::index_to_reference;
use chrono::Duration;
use chrono::NaiveDate;
use chrono::NaiveDateTime;

/// Types of raw cell data found in spreadsheet parts.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) enum CellType {
    #[default]
    Empty,
    /// Boolean values stored as "1"/"0"
    Boolean,
    /// Plain numeric values
    Number,
    /// Date/time values stored as serial numbers from the 1900 epoch
    NumberDateTime1900,
    /// Date/time values stored as serial numbers from the 1904 epoch
    NumberDateTime1904,
    /// ISO 8601 date/time strings
    IsoDateTime,
    /// ISO 8601 duration strings (ods time cells)
    IsoDuration,
    /// Inline string values
    InlineString,
    /// Shared string table references
    SharedString,
    /// Error values such as "#N/A"
    Error,
}

impl CellType {
    fn date_time(is_1904: bool) -> Self {
        if is_1904 {
            Self::NumberDateTime1904
        } else {
            Self::NumberDateTime1900
        }
    }

    /// Parses built-in Excel number format IDs to determine cell type.
    pub(crate) fn parse_builtin_number_format_id(id: &str, is_1904: bool) -> Option<Self> {
        match id {
            "14" | "15" | "16" | "17" | "18" | "19" | "20" | "21" | "22" | "45" | "46" | "47" => Some(Self::date_time(is_1904)),
            _ => None,
        }
    }

    /// Parses custom number format strings to determine cell type.
    /// Date and time tokens inside quotes, brackets or after escapes are ignored.
    pub(crate) fn parse_custom_number_format(format: &str, is_1904: bool) -> Self {
        let mut is_escaped = false;
        let mut is_literal = false;
        let mut is_color = false;
        let mut is_date_time = false;
        for character in format.chars() {
            match character {
                _ if is_escaped => is_escaped = false,
                '_' | '\\' => is_escaped = true,

                '"' if is_literal => is_literal = false,
                '"' if !is_color => is_literal = true,

                ']' if is_color => is_color = false,
                '[' if !is_literal => is_color = true,
                _ if is_literal || is_color => (),

                'Y' | 'y' | 'D' | 'd' | 'H' | 'h' | 'S' | 's' => is_date_time = true,
                _ => (),
            }
        }

        if is_date_time {
            Self::date_time(is_1904)
        } else {
            Self::Number
        }
    }
}

/// Represents a single raw cell with position, type, and undecoded value.
#[derive(Clone, Debug)]
pub(crate) struct Cell {
    /// Row index (0-based)
    pub(crate) row: usize,
    /// Column index (0-based)
    pub(crate) col: usize,
    pub(crate) kind: CellType,
    /// Cell value as found in the part
    pub(crate) value: String,
}

impl Cell {
    /// Returns the Excel-style cell reference (e.g., "A1", "B2").
    pub(crate) fn reference(&self) -> String {
        index_to_reference(self.row, self.col)
    }

    /// Decodes the raw value into a typed cell value.
    pub(crate) fn to_value(&self, shared_strings: &[String]) -> Result<Value, String> {
        let value = match self.kind {
            CellType::Empty | CellType::Error => Value::Empty,
            CellType::Boolean => Value::Boolean(self.value == "1" || self.value.eq_ignore_ascii_case("true")),
            CellType::Number => Value::Number(self.to_double()?),
            CellType::NumberDateTime1900 => Value::DateTime(serial_to_datetime(self.to_double()?, false)?),
            CellType::NumberDateTime1904 => Value::DateTime(serial_to_datetime(self.to_double()?, true)?),
            CellType::IsoDateTime => Value::DateTime(self.to_iso_datetime()?),
            CellType::IsoDuration => Value::Text(
                self.value
                    .replace("PT", "")
                    .replace('H', ":")
                    .replace('M', ":")
                    .replace('S', ""),
            ),
            CellType::InlineString => Value::Text(self.value.to_owned()),
            CellType::SharedString => {
                let index = self.value
                    .parse::<usize>()
                    .map_err(|_| format!("parse shared string index '{}' failed", self.value))?;
                let string = shared_strings
                    .get(index)
                    .ok_or_else(|| format!("shared string {} out of range", index))?;
                Value::Text(string.to_owned())
            }
        };
        Ok(value)
    }

    fn to_double(&self) -> Result<f64, String> {
        self.value.parse::<f64>().map_err(|_| format!("parse '{}' to double failed", self.value))
    }

    fn to_iso_datetime(&self) -> Result<NaiveDateTime, String> {
        if self.value.contains('T') {
            NaiveDateTime::parse_from_str(&self.value, "%Y-%m-%dT%H:%M:%S%.f")
                .map_err(|_| format!("parse '{}' to NaiveDateTime failed", self.value))
        } else {
            NaiveDate::parse_from_str(&self.value, "%Y-%m-%d")
                .map_err(|_| format!("parse '{}' to NaiveDate failed", self.value))
                .map(|date| date.and_hms_opt(0, 0, 0).expect("Append 00:00:00"))
        }
    }
}

/// Converts an Excel serial number to a datetime.
/// Handles the Lotus 1-2-3 leap year bug for the 1900 epoch.
pub(crate) fn serial_to_datetime(serial: f64, is_1904: bool) -> Result<NaiveDateTime, String> {
    let base = if is_1904 {
        NaiveDate::from_ymd_opt(1904, 1, 1)
    } else if serial < 60.0 {
        NaiveDate::from_ymd_opt(1899, 12, 31)
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)
    }
    .expect("NaiveDate Literal")
    .and_hms_opt(0, 0, 0)
    .expect("Midnight Literal");
    let milliseconds = (serial * 86_400_000f64).round();
    if !milliseconds.is_finite() || milliseconds.abs() > 1e15 {
        return Err(format!("serial date '{}' out of range", serial));
    }
    base.checked_add_signed(Duration::milliseconds(milliseconds as i64))
        .ok_or_else(|| format!("serial date '{}' out of range", serial))
}

/// Converts a datetime to an Excel serial number in the 1900 epoch.
pub(crate) fn datetime_to_serial(datetime: &NaiveDateTime) -> f64 {
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)
        .expect("NaiveDate Literal")
        .and_hms_opt(0, 0, 0)
        .expect("Midnight Literal");
    let days = (*datetime - base).num_milliseconds() as f64 / 86_400_000f64;
    if days < 61.0 {
        days - 1.0
    } else {
        days
    }
}
