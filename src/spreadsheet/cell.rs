use crate::error::CodecError;
use crate::spreadsheet::reference::index_to_reference;
use crate::spreadsheet::SpreadsheetError;
use crate::table::Value;
use chrono::Duration;
use chrono::NaiveDate;
use chrono::NaiveDateTime;

/// Epoch a workbook counts its date serial numbers from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum DateSystem {
    /// Serial 1 is 1900-01-01, including the phantom 1900-02-29
    Excel1900,
    /// Serial 0 is 1904-01-01
    Excel1904,
}

/// Types of raw cell data.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum CellType {
    #[default]
    Empty,
    /// Stored as `1` or `0`
    Boolean,
    Number,
    /// Serial number formatted as date and time
    DateTime(DateSystem),
    /// Serial number formatted as date only
    Date(DateSystem),
    /// Serial number formatted as time of day
    Time,
    /// ISO 8601 date/time string
    IsoDateTime,
    /// Index into the shared string table
    SharedString,
    /// Literal text (inline strings, formula strings, delimited fields)
    Text,
    /// Error value such as `#DIV/0!`
    Error,
}

impl CellType {
    /// Cell type implied by a built-in number format id.
    pub(crate) fn parse_builtin_number_format_id(id: &str, system: DateSystem) -> Option<Self> {
        match id {
            "22" => Some(Self::DateTime(system)),
            "14" | "15" | "16" | "17" => Some(Self::Date(system)),
            "18" | "19" | "20" | "21" | "45" | "46" | "47" => Some(Self::Time),
            _ => None,
        }
    }

    /// Cell type implied by a custom number format code.
    /// Quoted literals, escaped characters and bracketed sections such as colors
    /// are ignored, except elapsed-time brackets like `[h]` or `[mm]`;
    /// `y`/`d` mark dates, `h`/`s` mark times.
    pub(crate) fn parse_custom_number_format(format: &str, system: DateSystem) -> Self {
        let mut is_escaped = false;
        let mut is_literal = false;
        let mut is_bracket = false;
        let mut bracket = String::new();
        let mut is_date = false;
        let mut is_time = false;
        for character in format.chars() {
            match character {
                _ if is_escaped => is_escaped = false,
                '_' | '\\' => is_escaped = true,

                '"' if is_literal => is_literal = false,
                '"' if !is_bracket => is_literal = true,

                ']' if is_bracket => {
                    is_bracket = false;
                    if !bracket.is_empty() && bracket.chars().all(|c| matches!(c, 'H' | 'h' | 'M' | 'm' | 'S' | 's')) {
                        is_time = true;
                    }
                    bracket.clear();
                }
                '[' if !is_literal => is_bracket = true,
                _ if is_bracket => bracket.push(character),
                _ if is_literal => (),

                'Y' | 'y' | 'D' | 'd' => is_date = true,
                'H' | 'h' | 'S' | 's' => is_time = true,
                _ => (),
            }
        }

        match (is_date, is_time) {
            (true, true) => Self::DateTime(system),
            (true, false) => Self::Date(system),
            (false, true) => Self::Time,
            (false, false) => Self::Number,
        }
    }
}

/// A single non-empty cell of a sheet.
#[derive(Clone, Debug)]
pub(crate) struct Cell {
    /// Row index (0-based)
    pub(crate) row: usize,
    /// Column index (0-based)
    pub(crate) col: usize,
    pub(crate) kind: CellType,
    /// Raw cell content as stored in the file
    pub(crate) value: String,
}

impl Cell {
    /// Returns the A1-style reference of the cell.
    pub(crate) fn reference(&self) -> String {
        index_to_reference(self.row, self.col)
    }

    /// Converts the raw content to a table value.
    /// Dates and times become ISO text; numbers stay numeric.
    pub(crate) fn to_value(&self) -> Result<Value, CodecError> {
        let value = match self.kind {
            CellType::Empty => Value::Null,
            CellType::Boolean => Value::Text(if self.value == "1" { "true" } else { "false" }.to_owned()),
            CellType::Number => Value::Number(self.to_double()?),
            CellType::DateTime(system) => Value::Text(self.to_datetime(system)?.format("%Y-%m-%d %H:%M:%S").to_string()),
            CellType::Date(system) => Value::Text(self.to_datetime(system)?.format("%Y-%m-%d").to_string()),
            CellType::Time => Value::Text(to_time_string(self.to_double()?)),
            CellType::IsoDateTime => Value::Text(self.value.replace('T', " ")),
            CellType::SharedString | CellType::Text | CellType::Error => Value::Text(self.value.to_owned()),
        };
        Ok(value)
    }

    fn to_double(&self) -> Result<f64, CodecError> {
        self.value.trim().parse::<f64>().map_err(|_| self.value_error())
    }

    /// Serial number to date and time, rounded to the second.
    fn to_datetime(&self, system: DateSystem) -> Result<NaiveDateTime, CodecError> {
        let serial = self.to_double()?;
        let days = serial.trunc() as i64;
        let offset = match system {
            DateSystem::Excel1904 => 1_462,
            DateSystem::Excel1900 if days < 60 => 1, // Lotus 1-2-3 leap year bug
            DateSystem::Excel1900 => 0,
        };
        let seconds = (serial.fract() * 86_400f64).round() as i64;
        NaiveDate::from_ymd_opt(1899, 12, 30)
            .and_then(|date| date.checked_add_signed(Duration::try_days(days + offset)?))
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .and_then(|datetime| datetime.checked_add_signed(Duration::try_seconds(seconds)?))
            .ok_or_else(|| self.value_error())
    }

    fn value_error(&self) -> CodecError {
        SpreadsheetError::CellValueError(self.reference(), self.value.to_owned()).into()
    }
}

/// Day fraction to `HH:MM:SS`, with milliseconds only when present.
fn to_time_string(fraction: f64) -> String {
    let mut rest = (fraction.fract().abs() * 86_400_000f64).round() as i64;
    let milliseconds = rest % 1_000; rest /= 1_000;
    let seconds = rest % 60; rest /= 60;
    let minutes = rest % 60; rest /= 60;
    let hours = rest;
    if milliseconds > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}.{milliseconds:03}")
    } else {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(kind: CellType, value: &str) -> Cell {
        Cell { row: 1, col: 2, kind, value: value.to_owned() }
    }

    #[test]
    fn builtin_formats() {
        let system = DateSystem::Excel1900;
        assert_eq!(CellType::parse_builtin_number_format_id("14", system), Some(CellType::Date(system)));
        assert_eq!(CellType::parse_builtin_number_format_id("22", system), Some(CellType::DateTime(system)));
        assert_eq!(CellType::parse_builtin_number_format_id("20", system), Some(CellType::Time));
        assert_eq!(CellType::parse_builtin_number_format_id("0", system), None);
    }

    #[test]
    fn custom_formats() {
        let system = DateSystem::Excel1904;
        assert_eq!(CellType::parse_custom_number_format("yyyy-mm-dd", system), CellType::Date(system));
        assert_eq!(CellType::parse_custom_number_format("yyyy-mm-dd hh:mm", system), CellType::DateTime(system));
        assert_eq!(CellType::parse_custom_number_format("hh:mm:ss", system), CellType::Time);
        assert_eq!(CellType::parse_custom_number_format("[Red]#,##0.00", system), CellType::Number);
        assert_eq!(CellType::parse_custom_number_format("[h]:mm", system), CellType::Time);
        assert_eq!(CellType::parse_custom_number_format("[mm]", system), CellType::Time);
        assert_eq!(CellType::parse_custom_number_format("[$-409]0.00", system), CellType::Number);
        assert_eq!(CellType::parse_custom_number_format("[>=100]0;0.0", system), CellType::Number);
        assert_eq!(CellType::parse_custom_number_format("0.00\" days\"", system), CellType::Number);
        assert_eq!(CellType::parse_custom_number_format("0\\s", system), CellType::Number);
    }

    #[test]
    fn number_values() {
        assert_eq!(cell(CellType::Number, "1.5").to_value().unwrap(), Value::Number(1.5));
        assert!(cell(CellType::Number, "abc").to_value().is_err());
        assert_eq!(cell(CellType::Boolean, "1").to_value().unwrap(), Value::Text("true".to_owned()));
        assert_eq!(cell(CellType::Error, "#DIV/0!").to_value().unwrap(), Value::Text("#DIV/0!".to_owned()));
    }

    #[test]
    fn date_values() {
        let system = DateSystem::Excel1900;
        assert_eq!(cell(CellType::Date(system), "45292").to_value().unwrap(), Value::Text("2024-01-01".to_owned()));
        assert_eq!(cell(CellType::Date(system), "1").to_value().unwrap(), Value::Text("1900-01-01".to_owned()));
        assert_eq!(cell(CellType::DateTime(system), "45292.5").to_value().unwrap(), Value::Text("2024-01-01 12:00:00".to_owned()));
        assert_eq!(cell(CellType::Date(DateSystem::Excel1904), "0").to_value().unwrap(), Value::Text("1904-01-01".to_owned()));
        assert_eq!(cell(CellType::Time, "0.75").to_value().unwrap(), Value::Text("18:00:00".to_owned()));
        assert_eq!(cell(CellType::IsoDateTime, "2024-01-01T08:30:00").to_value().unwrap(), Value::Text("2024-01-01 08:30:00".to_owned()));
    }

    #[test]
    fn time_with_milliseconds() {
        assert_eq!(to_time_string(0.5 + 0.5 / 86_400.0), "12:00:00.500");
    }
}
