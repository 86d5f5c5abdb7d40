use serde::{Deserialize, Serialize};
use tracing::debug;

use chrono::NaiveDate;

use crate::{DateFormat, RANGE_JOINER, RANGE_SEPARATOR};

/// A date range as edited in a form.
/// Either bound may be missing and no ordering between them is enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DateRangeValue {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

/// The persisted form of a range: both bounds as storage-format strings (or
/// empty), plus the composite `value` derived from them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "StoredFields")]
pub struct StoredPair {
    value: String,
    from: String,
    to: String,
}

// `value` is always recomputed, so a stale one in storage is ignored
#[derive(Deserialize)]
struct StoredFields {
    #[serde(default)]
    from: String,
    #[serde(default)]
    to: String,
}

impl From<StoredFields> for StoredPair {
    fn from(fields: StoredFields) -> Self {
        Self::new(fields.from, fields.to)
    }
}

impl StoredPair {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        let (from, to) = (from.into(), to.into());
        Self {
            value: join_range(&from, &to),
            from,
            to,
        }
    }

    /// Composite `"<from> to <to>"` value
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn is_empty(&self) -> bool {
        self.from.is_empty() && self.to.is_empty()
    }
}

impl DateRangeValue {
    pub const fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub const fn from(&self) -> Option<NaiveDate> {
        self.from
    }

    pub const fn to(&self) -> Option<NaiveDate> {
        self.to
    }

    pub const fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Reads an editable range such as `"2024-01-10 to 2024-02-01"`.
    ///
    /// The text is split on every `to`; the first two segments are trimmed
    /// and parsed with `format` and any further ones are ignored. A segment
    /// that is empty or fails to parse becomes `None` without affecting the
    /// other.
    pub fn parse(raw: &str, format: &DateFormat) -> Self {
        let mut segments = raw.split(RANGE_SEPARATOR);
        let from = segments.next().and_then(|from| parse_segment(from, format));
        let to = segments.next().and_then(|to| parse_segment(to, format));
        Self { from, to }
    }

    /// Reads a persisted pair back, treating unparseable bounds as missing.
    pub fn from_stored(stored: &StoredPair, storage_format: &DateFormat) -> Self {
        Self {
            from: parse_segment(&stored.from, storage_format),
            to: parse_segment(&stored.to, storage_format),
        }
    }

    pub fn to_stored(&self, storage_format: &DateFormat) -> StoredPair {
        StoredPair::new(
            render(self.from, storage_format),
            render(self.to, storage_format),
        )
    }

    /// Editable text in `format`, joined the same way as the stored composite.
    pub fn display(&self, format: &DateFormat) -> String {
        join_range(&render(self.from, format), &render(self.to, format))
    }
}

/// Converts a submitted form value into the pair to persist.
/// An absent value clears the range.
pub fn parse_input(
    raw: Option<&str>,
    input_format: &DateFormat,
    storage_format: &DateFormat,
) -> StoredPair {
    raw.map_or_else(StoredPair::default, |raw| {
        DateRangeValue::parse(raw, input_format).to_stored(storage_format)
    })
}

/// Converts a persisted pair into the editable text shown in the form.
pub fn display_value(
    stored: &StoredPair,
    storage_format: &DateFormat,
    input_format: &DateFormat,
) -> String {
    if stored.is_empty() {
        return String::new();
    }
    DateRangeValue::from_stored(stored, storage_format).display(input_format)
}

fn parse_segment(segment: &str, format: &DateFormat) -> Option<NaiveDate> {
    let segment = segment.trim();
    if segment.is_empty() {
        return None;
    }
    match format.parse(segment) {
        Ok(date) => Some(date),
        Err(error) => {
            debug!(segment, format = %format, %error, "Discarding unparseable date");
            None
        }
    }
}

fn render(date: Option<NaiveDate>, format: &DateFormat) -> String {
    date.map(|date| format.format(&date).to_string())
        .unwrap_or_default()
}

fn join_range(from: &str, to: &str) -> String {
    if to.is_empty() {
        from.to_owned()
    } else {
        format!("{from}{RANGE_JOINER}{to}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iso() -> DateFormat {
        DateFormat::default()
    }

    fn us() -> DateFormat {
        DateFormat::from_php("m/d/Y").unwrap()
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_stored_pair_composite_value() {
        struct TestCase {
            from: &'static str,
            to: &'static str,
            value: &'static str,
        }

        let cases = [
            TestCase {
                from: "",
                to: "",
                value: "",
            },
            TestCase {
                from: "2024-01-10",
                to: "",
                value: "2024-01-10",
            },
            TestCase {
                from: "2024-01-10",
                to: "2024-02-01",
                value: "2024-01-10 to 2024-02-01",
            },
            TestCase {
                from: "",
                to: "2024-02-01",
                value: " to 2024-02-01",
            },
        ];

        for case in &cases {
            let pair = StoredPair::new(case.from, case.to);
            assert_eq!(pair.value(), case.value, "from={:?} to={:?}", case.from, case.to);
            assert_eq!(pair.from(), case.from);
            assert_eq!(pair.to(), case.to);
        }
    }

    #[test]
    fn test_parse_input_absent_clears() {
        let pair = parse_input(None, &iso(), &iso());
        assert_eq!(pair, StoredPair::default());
        assert!(pair.is_empty());
        assert_eq!(pair.value(), "");
    }

    #[test]
    fn test_parse_input_empty_string() {
        let pair = parse_input(Some(""), &iso(), &iso());
        assert_eq!(pair, StoredPair::new("", ""));
    }

    #[test]
    fn test_parse_input_from_only() {
        let pair = parse_input(Some("2024-01-10"), &iso(), &iso());
        assert_eq!(pair.from(), "2024-01-10");
        assert_eq!(pair.to(), "");
        assert_eq!(pair.value(), "2024-01-10");
    }

    #[test]
    fn test_parse_input_full_range() {
        let pair = parse_input(Some("2024-01-10 to 2024-02-01"), &iso(), &iso());
        assert_eq!(pair.from(), "2024-01-10");
        assert_eq!(pair.to(), "2024-02-01");
        assert_eq!(pair.value(), "2024-01-10 to 2024-02-01");
    }

    #[test]
    fn test_parse_input_converts_to_storage_format() {
        let pair = parse_input(Some(" 01/10/2024   to 02/01/2024 "), &us(), &iso());
        assert_eq!(pair.from(), "2024-01-10");
        assert_eq!(pair.to(), "2024-02-01");
    }

    #[test]
    fn test_parse_input_malformed_from_keeps_to() {
        let pair = parse_input(Some("not-a-date to 2024-02-01"), &iso(), &iso());
        assert_eq!(pair.from(), "");
        assert_eq!(pair.to(), "2024-02-01");
        assert_eq!(pair.value(), " to 2024-02-01");
    }

    #[test]
    fn test_parse_input_malformed_to() {
        let pair = parse_input(Some("2024-01-10 to 2024-02-xx"), &iso(), &iso());
        assert_eq!(pair.from(), "2024-01-10");
        assert_eq!(pair.to(), "");
        assert_eq!(pair.value(), "2024-01-10");
    }

    #[test]
    fn test_parse_input_rolls_day_overflow_forward() {
        let pair = parse_input(Some("2024-01-31 to 2024-02-30"), &iso(), &iso());
        assert_eq!(pair.from(), "2024-01-31");
        assert_eq!(pair.to(), "2024-03-01");
        assert_eq!(pair.value(), "2024-01-31 to 2024-03-01");

        let pair = parse_input(Some("02/29/2023 to 04/31/2023"), &us(), &iso());
        assert_eq!(pair.from(), "2023-03-01");
        assert_eq!(pair.to(), "2023-05-01");
    }

    #[test]
    fn test_parse_input_ignores_segments_past_the_second() {
        let pair = parse_input(
            Some("2024-01-10 to 2024-02-01 to 2024-03-01"),
            &iso(),
            &iso(),
        );
        assert_eq!(pair.from(), "2024-01-10");
        assert_eq!(pair.to(), "2024-02-01");
        assert_eq!(pair.value(), "2024-01-10 to 2024-02-01");

        let pair = parse_input(Some("to to 2024-02-01"), &iso(), &iso());
        assert_eq!(pair, StoredPair::default());
    }

    #[test]
    fn test_parse_input_does_not_enforce_order() {
        let pair = parse_input(Some("2024-02-01 to 2024-01-10"), &iso(), &iso());
        assert_eq!(pair.from(), "2024-02-01");
        assert_eq!(pair.to(), "2024-01-10");
    }

    #[test]
    fn test_display_value_reformats() {
        let stored = StoredPair::new("2024-01-10", "2024-02-01");
        assert_eq!(
            display_value(&stored, &iso(), &us()),
            "01/10/2024 to 02/01/2024"
        );
    }

    #[test]
    fn test_display_value_edge_cases() {
        let cases = [
            (StoredPair::default(), ""),
            (StoredPair::new("2024-01-10", ""), "01/10/2024"),
            (StoredPair::new("", "2024-02-01"), " to 02/01/2024"),
            (StoredPair::new("garbage", "2024-02-01"), " to 02/01/2024"),
            (StoredPair::new("2024-01-10", "garbage"), "01/10/2024"),
            (StoredPair::new("garbage", "rubbish"), ""),
        ];

        for (stored, expected) in &cases {
            assert_eq!(
                display_value(stored, &iso(), &us()),
                *expected,
                "stored {stored:?}"
            );
        }
    }

    #[test]
    fn test_value_round_trip_through_storage() {
        let value = DateRangeValue::new(Some(date(2024, 1, 10)), Some(date(2024, 2, 1)));
        let stored = value.to_stored(&iso());
        assert_eq!(DateRangeValue::from_stored(&stored, &iso()), value);
        assert_eq!(value.display(&us()), "01/10/2024 to 02/01/2024");
    }

    #[test]
    fn test_value_accessors() {
        let value = DateRangeValue::parse("2024-01-10", &iso());
        assert_eq!(value.from(), Some(date(2024, 1, 10)));
        assert_eq!(value.to(), None);
        assert!(!value.is_empty());
        assert!(DateRangeValue::default().is_empty());
    }

    #[test]
    fn test_stored_pair_serde() {
        let pair = StoredPair::new("2024-01-10", "2024-02-01");
        let json = serde_json::to_value(&pair).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "value": "2024-01-10 to 2024-02-01",
                "from": "2024-01-10",
                "to": "2024-02-01",
            })
        );

        let parsed: StoredPair = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, pair);
    }

    #[test]
    fn test_stored_pair_deserialize_recomputes_value() {
        let parsed: StoredPair =
            serde_json::from_str(r#"{"value": "stale", "from": "2024-01-10"}"#).unwrap();
        assert_eq!(parsed.value(), "2024-01-10");
        assert_eq!(parsed.to(), "");
    }
}
