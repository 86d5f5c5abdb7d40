//! Property-based tests for range parsing and display.
//!
//! These tests use proptest to check the round-trip and failure-tolerance
//! properties across many random dates and layouts.

use chrono::Days;
use date_range_field::{DateFormat, NaiveDate, StoredPair, display_value, parse_input};
use proptest::prelude::*;

// Layouts whose rendered text never contains the "to" separator
const LAYOUTS: [&str; 6] = ["Y-m-d", "m/d/Y", "d.m.Y", "Ymd", "D, M j Y", "jS M Y"];

fn calendar_date() -> impl Strategy<Value = NaiveDate> {
    (1000i32..=9999, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn layout() -> impl Strategy<Value = DateFormat> {
    prop::sample::select(LAYOUTS.to_vec()).prop_map(|php| DateFormat::from_php(php).unwrap())
}

proptest! {
    #[test]
    fn parse_then_display_round_trips(
        from in calendar_date(),
        to in calendar_date(),
        input in layout(),
    ) {
        let storage = DateFormat::default();
        let raw = format!("{} to {}", input.format(&from), input.format(&to));

        let stored = parse_input(Some(raw.as_str()), &input, &storage);
        prop_assert_eq!(stored.from(), from.to_string());
        prop_assert_eq!(stored.to(), to.to_string());
        prop_assert_eq!(display_value(&stored, &storage, &input), raw);
    }

    #[test]
    fn display_then_parse_is_idempotent(
        from in calendar_date(),
        to in proptest::option::of(calendar_date()),
        input in layout(),
        storage in layout(),
    ) {
        let stored = StoredPair::new(
            storage.format(&from).to_string(),
            to.map(|to| storage.format(&to).to_string()).unwrap_or_default(),
        );

        let shown = display_value(&stored, &storage, &input);
        prop_assert_eq!(parse_input(Some(shown.as_str()), &input, &storage), stored);
    }

    #[test]
    fn malformed_from_keeps_valid_to(
        garbage in "[a-z]{1,8}",
        to in calendar_date(),
    ) {
        let iso = DateFormat::default();
        let raw = format!("{garbage} to {to}");
        prop_assume!(!garbage.contains("to"));

        let stored = parse_input(Some(raw.as_str()), &iso, &iso);
        prop_assert_eq!(stored.from(), "");
        prop_assert_eq!(stored.to(), to.to_string());
    }

    #[test]
    fn day_past_month_end_carries_forward(
        year in 1000i32..=9999,
        month in 1u32..=12,
        day in 29u32..=31,
    ) {
        let iso = DateFormat::default();
        let raw = format!("{year:04}-{month:02}-{day:02}");
        let expected = NaiveDate::from_ymd_opt(year, month, 1)
            .unwrap()
            .checked_add_days(Days::new(u64::from(day - 1)))
            .unwrap();

        let stored = parse_input(Some(raw.as_str()), &iso, &iso);
        prop_assert_eq!(stored.from(), expected.to_string());
    }

    #[test]
    fn arbitrary_input_yields_consistent_pair(raw in ".{0,40}") {
        let iso = DateFormat::default();
        let stored = parse_input(Some(raw.as_str()), &iso, &iso);

        let expected = match (stored.from(), stored.to()) {
            (from, "") => from.to_owned(),
            (from, to) => format!("{from} to {to}"),
        };
        prop_assert_eq!(stored.value(), expected);
    }
}
