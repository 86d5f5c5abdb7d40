//! Options for the interactive date picker.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::DateFormat;
use crate::prelude::*;

/// Allows typing a date instead of picking one
pub const ALLOW_INPUT_KEY: &str = "allowInput";
/// Selection mode of the picker
pub const MODE_KEY: &str = "mode";
/// Display and input format of the picker (flatpickr dialect)
pub const DATE_FORMAT_KEY: &str = "dateFormat";

/// Picker configuration keyed by option name.
///
/// Always starts from the base options (`allowInput: true`, `mode: "range"`).
/// Merging replaces same-named options in place and appends new ones; values
/// are replaced whole, never merged recursively.
#[derive(Debug, Clone, PartialEq, Eq, Deref, Into, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct PickerOptions(Map<String, Value>);

impl Default for PickerOptions {
    fn default() -> Self {
        let mut options = Map::new();
        options.insert(ALLOW_INPUT_KEY.to_owned(), Value::Bool(true));
        options.insert(MODE_KEY.to_owned(), Value::String("range".to_owned()));
        Self(options)
    }
}

/// Applies `overrides` over the base options.
impl From<Map<String, Value>> for PickerOptions {
    fn from(overrides: Map<String, Value>) -> Self {
        let mut options = Self::default();
        options.merge(overrides);
        options
    }
}

impl PickerOptions {
    pub fn merge<I>(&mut self, overrides: I) -> &mut Self
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        for (key, value) in overrides {
            self.0.insert(key, value);
        }
        self
    }

    /// The options handed to the picker: these options with `dateFormat` set
    /// to `format` in the flatpickr dialect.
    pub fn with_date_format(&self, format: &DateFormat) -> Map<String, Value> {
        let mut options = self.0.clone();
        options.insert(
            DATE_FORMAT_KEY.to_owned(),
            Value::String(format.to_flatpickr()),
        );
        options
    }
}
