//! Date format descriptors shared by the server side and the date picker.
//!
//! A [`DateFormat`] is a sequence of [`FormatToken`]s. It is built once, from
//! either dialect, and rendered back into each dialect at the boundary, so the
//! PHP-style format used for parsing and storage and the flatpickr format
//! handed to the picker always describe the same layout.

use std::fmt;
use std::str::FromStr;

use chrono::format::{self as chrono_format, Fixed, Item, Numeric, Pad, Parsed};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::ParseError;
use crate::calendar::{expand_two_digit_year, ordinal_suffix, roll_over, strip_ordinal_suffix};
use crate::consts::FORMAT_ESCAPE;
use crate::prelude::*;

/// One element of a date layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatToken {
    /// Day of month, two digits (`d`)
    DayPadded,
    /// Day of month without padding (`j`)
    Day,
    /// Day of month with English ordinal suffix (`jS` / `J`)
    DayOrdinal,
    /// Two-digit day of month with ordinal suffix (`dS`, PHP only)
    DayPaddedOrdinal,
    /// Three-letter weekday (`D`)
    WeekdayShort,
    /// Full weekday (`l`)
    WeekdayLong,
    /// Month number, two digits (`m`)
    MonthPadded,
    /// Month number without padding (`n`)
    Month,
    /// Three-letter month name (`M`)
    MonthShort,
    /// Full month name (`F`)
    MonthLong,
    /// Four-digit year (`Y`)
    YearFull,
    /// Two-digit year (`y`)
    YearShort,
    /// Verbatim character
    Literal(char),
}

/// Format-string dialects a [`DateFormat`] can be read from and written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Dialect {
    #[display(fmt = "PHP")]
    Php,
    #[display(fmt = "flatpickr")]
    Flatpickr,
}

/// Error type for building a format descriptor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("Unsupported {dialect} format token '{token}'")]
    UnsupportedToken { dialect: Dialect, token: char },

    #[error("Dangling escape at end of {dialect} format '{format}'")]
    DanglingEscape { dialect: Dialect, format: String },

    #[error("Format '{0}' must contain year, month and day components")]
    IncompleteDate(String),

    #[error("PHP format '{php}' and flatpickr format '{js}' describe different layouts")]
    DialectMismatch { php: String, js: String },
}

impl FormatToken {
    fn from_letter(dialect: Dialect, letter: char) -> Option<Self> {
        let token = match letter {
            'd' => Self::DayPadded,
            'j' => Self::Day,
            'J' if dialect == Dialect::Flatpickr => Self::DayOrdinal,
            'D' => Self::WeekdayShort,
            'l' => Self::WeekdayLong,
            'm' => Self::MonthPadded,
            'n' => Self::Month,
            'M' => Self::MonthShort,
            'F' => Self::MonthLong,
            'Y' => Self::YearFull,
            'y' => Self::YearShort,
            _ => return None,
        };
        Some(token)
    }

    fn write_dialect(self, dialect: Dialect, out: &mut String) {
        let code = match self {
            Self::DayPadded => "d",
            Self::Day => "j",
            Self::DayOrdinal => match dialect {
                Dialect::Php => "jS",
                Dialect::Flatpickr => "J",
            },
            // flatpickr has no padded ordinal; its `J` output still parses
            Self::DayPaddedOrdinal => match dialect {
                Dialect::Php => "dS",
                Dialect::Flatpickr => "J",
            },
            Self::WeekdayShort => "D",
            Self::WeekdayLong => "l",
            Self::MonthPadded => "m",
            Self::Month => "n",
            Self::MonthShort => "M",
            Self::MonthLong => "F",
            Self::YearFull => "Y",
            Self::YearShort => "y",
            Self::Literal(c) => {
                if c.is_ascii_alphabetic() || c == FORMAT_ESCAPE {
                    out.push(FORMAT_ESCAPE);
                }
                out.push(c);
                return;
            }
        };
        out.push_str(code);
    }

    /// Item used to render this token. Ordinal suffixes are appended separately.
    fn format_item(self) -> Item<'static> {
        match self {
            Self::DayPadded | Self::DayPaddedOrdinal => Item::Numeric(Numeric::Day, Pad::Zero),
            Self::Day | Self::DayOrdinal => Item::Numeric(Numeric::Day, Pad::None),
            Self::WeekdayShort => Item::Fixed(Fixed::ShortWeekdayName),
            Self::WeekdayLong => Item::Fixed(Fixed::LongWeekdayName),
            Self::MonthPadded => Item::Numeric(Numeric::Month, Pad::Zero),
            Self::Month => Item::Numeric(Numeric::Month, Pad::None),
            Self::MonthShort => Item::Fixed(Fixed::ShortMonthName),
            Self::MonthLong => Item::Fixed(Fixed::LongMonthName),
            Self::YearFull => Item::Numeric(Numeric::Year, Pad::Zero),
            Self::YearShort => Item::Numeric(Numeric::YearMod100, Pad::Zero),
            Self::Literal(c) if c.is_whitespace() => Item::OwnedSpace(c.to_string().into()),
            Self::Literal(c) => Item::OwnedLiteral(c.to_string().into()),
        }
    }

    /// Item used to read this token. Names accept both the short and the
    /// long spelling.
    fn parse_item(self) -> Item<'static> {
        match self {
            Self::WeekdayShort | Self::WeekdayLong => Item::Fixed(Fixed::LongWeekdayName),
            Self::MonthShort | Self::MonthLong => Item::Fixed(Fixed::LongMonthName),
            token => token.format_item(),
        }
    }

    const fn is_ordinal(self) -> bool {
        matches!(self, Self::DayOrdinal | Self::DayPaddedOrdinal)
    }

    const fn is_year(self) -> bool {
        matches!(self, Self::YearFull | Self::YearShort)
    }

    const fn is_month(self) -> bool {
        matches!(
            self,
            Self::MonthPadded | Self::Month | Self::MonthShort | Self::MonthLong
        )
    }

    const fn is_day(self) -> bool {
        matches!(
            self,
            Self::DayPadded | Self::Day | Self::DayOrdinal | Self::DayPaddedOrdinal
        )
    }
}

/// A date layout, independent of the dialect it was written in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DateFormat {
    tokens: Vec<FormatToken>,
}

impl DateFormat {
    /// Builds a descriptor from tokens.
    ///
    /// # Errors
    /// Returns `FormatError::IncompleteDate` unless the tokens name a year,
    /// a month and a day.
    pub fn from_tokens(tokens: Vec<FormatToken>) -> Result<Self, FormatError> {
        let format = Self { tokens };
        let complete = format.tokens.iter().any(|t| t.is_year())
            && format.tokens.iter().any(|t| t.is_month())
            && format.tokens.iter().any(|t| t.is_day());
        if !complete {
            return Err(FormatError::IncompleteDate(format.to_php()));
        }
        Ok(format)
    }

    /// Reads a PHP `date()`-style format such as `Y-m-d` or `jS F Y`.
    ///
    /// `S` is accepted after `j` or `d`. A padded ordinal (`dS`) is written
    /// to flatpickr as `J`, since the picker has no padded form.
    ///
    /// # Errors
    /// Returns a `FormatError` for letters outside the supported date tokens,
    /// a trailing backslash, or a layout missing a date component.
    pub fn from_php(format: &str) -> Result<Self, FormatError> {
        Self::parse_dialect(format, Dialect::Php)
    }

    /// Reads a flatpickr format such as `Y-m-d` or `J F Y`.
    ///
    /// # Errors
    /// Same as [`DateFormat::from_php`].
    pub fn from_flatpickr(format: &str) -> Result<Self, FormatError> {
        Self::parse_dialect(format, Dialect::Flatpickr)
    }

    /// Reads a PHP/flatpickr pair that must describe the same layout.
    ///
    /// # Errors
    /// Returns `FormatError::DialectMismatch` when both parse but differ,
    /// or the error of whichever side fails to parse.
    pub fn from_pair(php: &str, js: &str) -> Result<Self, FormatError> {
        let server = Self::from_php(php)?;
        let picker = Self::from_flatpickr(js)?;
        if server != picker {
            return Err(FormatError::DialectMismatch {
                php: php.to_owned(),
                js: js.to_owned(),
            });
        }
        Ok(server)
    }

    fn parse_dialect(format: &str, dialect: Dialect) -> Result<Self, FormatError> {
        let mut tokens: Vec<FormatToken> = Vec::with_capacity(format.len());
        let mut chars = format.chars();

        while let Some(c) = chars.next() {
            let token = match c {
                FORMAT_ESCAPE => {
                    let escaped = chars.next().ok_or_else(|| FormatError::DanglingEscape {
                        dialect,
                        format: format.to_owned(),
                    })?;
                    FormatToken::Literal(escaped)
                }
                // PHP spells the ordinal day as two letters
                'S' if dialect == Dialect::Php => match tokens.last().copied() {
                    Some(FormatToken::Day) => {
                        tokens.pop();
                        FormatToken::DayOrdinal
                    }
                    Some(FormatToken::DayPadded) => {
                        tokens.pop();
                        FormatToken::DayPaddedOrdinal
                    }
                    _ => return Err(FormatError::UnsupportedToken { dialect, token: c }),
                },
                c if c.is_ascii_alphabetic() => FormatToken::from_letter(dialect, c)
                    .ok_or(FormatError::UnsupportedToken { dialect, token: c })?,
                c => FormatToken::Literal(c),
            };
            tokens.push(token);
        }

        Self::from_tokens(tokens)
    }

    pub fn tokens(&self) -> &[FormatToken] {
        &self.tokens
    }

    /// Renders the layout in the given dialect.
    pub fn to_dialect(&self, dialect: Dialect) -> String {
        let mut out = String::with_capacity(self.tokens.len() + 1);
        for token in &self.tokens {
            token.write_dialect(dialect, &mut out);
        }
        out
    }

    pub fn to_php(&self) -> String {
        self.to_dialect(Dialect::Php)
    }

    pub fn to_flatpickr(&self) -> String {
        self.to_dialect(Dialect::Flatpickr)
    }

    /// Lazily renders `date` in this layout.
    pub const fn format<'a>(&'a self, date: &'a NaiveDate) -> FormattedDate<'a> {
        FormattedDate { format: self, date }
    }

    /// Parses `input` against this layout. The whole input must be consumed.
    ///
    /// A space in the layout matches any run of whitespace, including none.
    /// Weekday names are checked to be names but otherwise ignored. A day
    /// past the end of its month carries into the next month, so
    /// `2024-02-30` reads as March 1st.
    ///
    /// # Errors
    /// Returns the `ParseError` describing the first mismatch, or
    /// `ParseError::OutOfRange` if the components cannot form a date.
    pub fn parse(&self, input: &str) -> Result<NaiveDate, ParseError> {
        if input.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let mut parsed = Parsed::new();
        let mut rest = input;
        for token in &self.tokens {
            let item = token.parse_item();
            rest = chrono_format::parse_and_remainder(&mut parsed, rest, std::iter::once(&item))?;
            if token.is_ordinal() {
                rest = strip_ordinal_suffix(rest).ok_or_else(|| ParseError::Mismatch {
                    expected: "ordinal suffix".to_owned(),
                    offset: input.len() - rest.len(),
                })?;
            }
        }

        if !rest.is_empty() {
            return Err(ParseError::TrailingInput(rest.to_owned()));
        }
        resolve(&parsed)
    }
}

impl Default for DateFormat {
    /// ISO-like `Y-m-d`
    fn default() -> Self {
        Self {
            tokens: vec![
                FormatToken::YearFull,
                FormatToken::Literal('-'),
                FormatToken::MonthPadded,
                FormatToken::Literal('-'),
                FormatToken::DayPadded,
            ],
        }
    }
}

/// Displays in the PHP dialect.
impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_php())
    }
}

/// Parses the PHP dialect.
impl FromStr for DateFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_php(s)
    }
}

impl Serialize for DateFormat {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_php())
    }
}

impl<'de> Deserialize<'de> for DateFormat {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A date rendered through a [`DateFormat`], produced by [`DateFormat::format`].
#[derive(Debug, Clone, Copy)]
pub struct FormattedDate<'a> {
    format: &'a DateFormat,
    date: &'a NaiveDate,
}

impl fmt::Display for FormattedDate<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = ordinal_suffix(self.date.day());
        let mut items = Vec::with_capacity(self.format.tokens.len() + 1);
        for token in &self.format.tokens {
            items.push(token.format_item());
            if token.is_ordinal() {
                items.push(Item::Literal(suffix));
            }
        }
        write!(f, "{}", self.date.format_with_items(items.iter()))
    }
}

fn resolve(parsed: &Parsed) -> Result<NaiveDate, ParseError> {
    let year = parsed
        .year()
        .or_else(|| parsed.year_mod_100().map(expand_two_digit_year))
        .ok_or(ParseError::MissingComponent("year"))?;
    let month = parsed
        .month()
        .ok_or(ParseError::MissingComponent("month"))?;
    let day = parsed.day().ok_or(ParseError::MissingComponent("day"))?;
    roll_over(year, month, day).ok_or(ParseError::OutOfRange { year, month, day })
}
