use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::StagedFile;

/// A field value after schema validation and coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Str(String),
    Number(f64),
    Bool(bool),
    Object(Map<String, Value>),
    Files(Vec<StagedFile>),
}

/// Parameter object that passed validation against a tool schema.
///
/// Only fields declared by the schema are present; omitted optional fields
/// with a default carry that default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedArguments {
    values: IndexMap<String, ArgValue>,
}

impl ValidatedArguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: ArgValue) {
        self.values.insert(name.into(), value);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// String value of a field, if present.
    pub fn str(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(ArgValue::Str(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        match self.values.get(name) {
            Some(ArgValue::Number(value)) => Some(*value),
            _ => None,
        }
    }

    /// Boolean value of a field; absent fields read as `false`.
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(ArgValue::Bool(true)))
    }

    pub fn object(&self, name: &str) -> Option<&Map<String, Value>> {
        match self.values.get(name) {
            Some(ArgValue::Object(value)) => Some(value),
            _ => None,
        }
    }

    pub fn files(&self, name: &str) -> &[StagedFile] {
        match self.values.get(name) {
            Some(ArgValue::Files(files)) => files.as_slice(),
            _ => &[],
        }
    }

    /// Number rendered the way a command-line flag expects it (`100`, not `100.0`).
    pub fn number_arg(&self, name: &str) -> Option<String> {
        self.number(name).map(format_number)
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
