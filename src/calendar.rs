//! Calendar rules chrono leaves to the caller: two-digit year expansion,
//! English ordinal suffixes and day-of-month overflow.

use chrono::{Days, NaiveDate};

use crate::consts::{ORDINAL_SUFFIX_LEN, ORDINAL_SUFFIXES, TWO_DIGIT_YEAR_PIVOT};

/// Expands a two-digit year: 70-99 land in the 1900s, 00-69 in the 2000s.
pub const fn expand_two_digit_year(short: i32) -> i32 {
    if short < TWO_DIGIT_YEAR_PIVOT {
        2000 + short
    } else {
        1900 + short
    }
}

/// English ordinal suffix for a day of month: `st`, `nd`, `rd` or `th`
pub const fn ordinal_suffix(day: u32) -> &'static str {
    match day % 100 {
        11..=13 => "th",
        d if d % 10 == 1 => "st",
        d if d % 10 == 2 => "nd",
        d if d % 10 == 3 => "rd",
        _ => "th",
    }
}

/// Returns `input` without a leading ordinal suffix, matched ignoring case.
pub fn strip_ordinal_suffix(input: &str) -> Option<&str> {
    let suffix = input.get(..ORDINAL_SUFFIX_LEN)?;
    ORDINAL_SUFFIXES
        .iter()
        .any(|known| known.eq_ignore_ascii_case(suffix))
        .then(|| &input[ORDINAL_SUFFIX_LEN..])
}

/// Builds a date, carrying a day past the end of the month into the
/// following month(s): February 30th 2024 is March 1st.
///
/// Returns `None` when `month` is outside 1-12, `day` is zero, or the
/// result leaves chrono's supported range.
pub fn roll_over(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    first.checked_add_days(Days::new(u64::from(day.checked_sub(1)?)))
}
