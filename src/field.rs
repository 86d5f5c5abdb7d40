//! The date range field as seen by the host framework.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::{
    DateFormat, FIELD_TYPE, FormatError, PickerOptions, StoredPair, display_value, parse_input,
};

/// What the host serializes for the admin UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayPayload {
    /// Editable range text in the input format
    pub value: String,
    /// Storage format, PHP dialect
    pub storage_format: DateFormat,
    /// Picker options including `dateFormat`
    pub picker_options: Map<String, Value>,
}

impl DisplayPayload {
    pub fn into_map(self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("value".to_owned(), Value::String(self.value));
        map.insert(
            "storage_format".to_owned(),
            Value::String(self.storage_format.to_php()),
        );
        map.insert(
            "picker_options".to_owned(),
            Value::Object(self.picker_options),
        );
        map
    }
}

/// Parse/format capability a host needs from a date range field.
pub trait RangeFieldType {
    /// Converts a submitted value into the pair to persist. `None` clears.
    fn parse_input(&self, raw: Option<&str>) -> StoredPair;

    /// Builds the UI payload for a persisted pair.
    fn format_for_display(&self, stored: &StoredPair) -> DisplayPayload;
}

/// How the input format is written in configuration: a single PHP-dialect
/// format, or an explicit PHP/flatpickr pair that must agree.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum InputFormatConfig {
    Single(DateFormat),
    Pair { php: String, js: String },
}

impl Default for InputFormatConfig {
    fn default() -> Self {
        Self::Single(DateFormat::default())
    }
}

impl TryFrom<InputFormatConfig> for DateFormat {
    type Error = FormatError;

    fn try_from(config: InputFormatConfig) -> Result<Self, Self::Error> {
        match config {
            InputFormatConfig::Single(format) => Ok(format),
            InputFormatConfig::Pair { php, js } => Self::from_pair(&php, &js),
        }
    }
}

/// Per-field configuration. Changes apply to the next parse or format call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFieldConfig")]
pub struct FieldConfig {
    pub storage_format: DateFormat,
    pub input_format: DateFormat,
    pub picker_options: PickerOptions,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct RawFieldConfig {
    storage_format: DateFormat,
    input_format: InputFormatConfig,
    picker_options: PickerOptions,
}

impl TryFrom<RawFieldConfig> for FieldConfig {
    type Error = FormatError;

    fn try_from(raw: RawFieldConfig) -> Result<Self, Self::Error> {
        Ok(Self {
            storage_format: raw.storage_format,
            input_format: raw.input_format.try_into()?,
            picker_options: raw.picker_options,
        })
    }
}

impl RangeFieldType for FieldConfig {
    fn parse_input(&self, raw: Option<&str>) -> StoredPair {
        parse_input(raw, &self.input_format, &self.storage_format)
    }

    fn format_for_display(&self, stored: &StoredPair) -> DisplayPayload {
        DisplayPayload {
            value: display_value(stored, &self.storage_format, &self.input_format),
            storage_format: self.storage_format.clone(),
            picker_options: self.picker_options.with_date_format(&self.input_format),
        }
    }
}

/// Host-facing field lifecycle: fill from a submitted form, render to JSON.
pub trait FieldType: fmt::Debug {
    fn field_type(&self) -> &'static str;

    fn name(&self) -> &str;

    fn set_value_from_input(&mut self, input: &HashMap<String, String>);

    fn to_json(&self) -> Value;
}

/// Arguments the host passes when instantiating a field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldArguments {
    #[serde(rename = "type")]
    pub field_type: String,
    pub name: String,
    pub label: String,
}

pub type FieldFactory = fn(FieldArguments) -> Box<dyn FieldType>;

/// The host's extension point for custom field types.
pub trait FieldTypeRegistry {
    fn register_field_type(&mut self, field_type: &'static str, factory: FieldFactory);
}

/// Registers the date range field type. Called from the host's bootstrap.
pub fn register<R: FieldTypeRegistry + ?Sized>(registry: &mut R) {
    registry.register_field_type(FIELD_TYPE, create_field);
    debug!(field_type = FIELD_TYPE, "Registered field type");
}

fn create_field(args: FieldArguments) -> Box<dyn FieldType> {
    Box::new(DateRangeField::new(args.name, args.label))
}

/// A named date range field holding its configuration and current value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRangeField {
    name: String,
    label: String,
    placeholder: Option<String>,
    config: FieldConfig,
    value: StoredPair,
}

impl DateRangeField {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::with_config(name, label, FieldConfig::default())
    }

    pub fn with_config(
        name: impl Into<String>,
        label: impl Into<String>,
        config: FieldConfig,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            placeholder: None,
            config,
            value: StoredPair::default(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) -> &mut Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub const fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub const fn value(&self) -> &StoredPair {
        &self.value
    }

    pub fn set_value(&mut self, value: StoredPair) -> &mut Self {
        self.value = value;
        self
    }

    pub fn clear_value(&mut self) -> &mut Self {
        self.value = StoredPair::default();
        self
    }

    pub const fn storage_format(&self) -> &DateFormat {
        &self.config.storage_format
    }

    pub fn set_storage_format(&mut self, format: DateFormat) -> &mut Self {
        self.config.storage_format = format;
        self
    }

    pub const fn input_format(&self) -> &DateFormat {
        &self.config.input_format
    }

    pub fn set_input_format(&mut self, format: DateFormat) -> &mut Self {
        self.config.input_format = format;
        self
    }

    /// Sets the input format from a PHP/flatpickr pair.
    ///
    /// # Errors
    /// Returns the `FormatError` from [`DateFormat::from_pair`]; the current
    /// input format is kept in that case.
    pub fn set_input_format_pair(&mut self, php: &str, js: &str) -> Result<&mut Self, FormatError> {
        match DateFormat::from_pair(php, js) {
            Ok(format) => Ok(self.set_input_format(format)),
            Err(error) => {
                warn!(field = %self.name, php, js, %error, "Rejected input format");
                Err(error)
            }
        }
    }

    pub const fn picker_options(&self) -> &PickerOptions {
        &self.config.picker_options
    }

    /// Merges `options` over the current picker options.
    pub fn set_picker_options(&mut self, options: Map<String, Value>) -> &mut Self {
        self.config.picker_options.merge(options);
        self
    }
}

impl RangeFieldType for DateRangeField {
    fn parse_input(&self, raw: Option<&str>) -> StoredPair {
        self.config.parse_input(raw)
    }

    fn format_for_display(&self, stored: &StoredPair) -> DisplayPayload {
        self.config.format_for_display(stored)
    }
}

#[allow(clippy::implicit_hasher)]
impl FieldType for DateRangeField {
    fn field_type(&self) -> &'static str {
        FIELD_TYPE
    }

    fn name(&self) -> &str {
        &self.name
    }

    /// Replaces the value from this field's entry in `input`; clears it when
    /// the entry is missing.
    fn set_value_from_input(&mut self, input: &HashMap<String, String>) {
        self.value = self.parse_input(input.get(&self.name).map(String::as_str));
        debug!(field = %self.name, value = self.value.value(), "Set value from input");
    }

    fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("type".to_owned(), Value::String(FIELD_TYPE.to_owned()));
        map.insert("name".to_owned(), Value::String(self.name.clone()));
        map.insert("label".to_owned(), Value::String(self.label.clone()));
        if let Some(placeholder) = &self.placeholder {
            map.insert("placeholder".to_owned(), Value::String(placeholder.clone()));
        }
        map.extend(self.format_for_display(&self.value).into_map());
        Value::Object(map)
    }
}
