//! Value logic for a "date range" field type.
//!
//! A host form framework hands the field a raw `"<from> to <to>"` string on
//! submit and asks it for a JSON payload on render. This crate turns the
//! former into a [`StoredPair`] of storage-format dates and the latter into a
//! [`DisplayPayload`] carrying the editable string plus the date picker
//! configuration, keeping the server-side and picker-side date formats in
//! lockstep through a single [`DateFormat`] descriptor.

mod calendar;
mod consts;
mod field;
mod format;
mod picker;
mod prelude;
mod range;

pub use chrono::NaiveDate;
pub use consts::*;
pub use field::{
    DateRangeField, DisplayPayload, FieldArguments, FieldConfig, FieldFactory, FieldType,
    FieldTypeRegistry, InputFormatConfig, RangeFieldType, register,
};
pub use format::{DateFormat, Dialect, FormatError, FormatToken, FormattedDate};
pub use picker::PickerOptions;
pub use range::{DateRangeValue, StoredPair, display_value, parse_input};

use crate::prelude::*;

/// Why a piece of date text did not yield a date.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Date does not match layout: {_0}")]
    Layout(chrono::format::ParseError),
    #[display(fmt = "Expected {expected} at offset {offset}")]
    Mismatch { expected: String, offset: usize },
    #[display(fmt = "Missing {_0} component")]
    MissingComponent(&'static str),
    #[display(fmt = "No calendar date for year {year}, month {month}, day {day}")]
    OutOfRange { year: i32, month: u32, day: u32 },
    #[display(fmt = "Trailing data: {_0}")]
    TrailingInput(String),
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Layout(error) => Some(error),
            _ => None,
        }
    }
}

impl From<chrono::format::ParseError> for ParseError {
    fn from(error: chrono::format::ParseError) -> Self {
        Self::Layout(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ParseError::OutOfRange {
                year: 2024,
                month: 13,
                day: 1
            }
            .to_string(),
            "No calendar date for year 2024, month 13, day 1"
        );
        assert_eq!(
            ParseError::MissingComponent("day").to_string(),
            "Missing day component"
        );
        assert_eq!(
            ParseError::Mismatch {
                expected: "ordinal suffix".to_owned(),
                offset: 2
            }
            .to_string(),
            "Expected ordinal suffix at offset 2"
        );
    }

    #[test]
    fn test_layout_error_keeps_source() {
        use std::error::Error;

        let chrono_error = NaiveDate::parse_from_str("2024/01/10", "%Y-%m-%d").unwrap_err();
        let error = ParseError::from(chrono_error);
        assert!(error.to_string().starts_with("Date does not match layout: "));
        assert!(error.source().is_some());
        assert!(ParseError::EmptyInput.source().is_none());
    }
}
