use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Primitive shape accepted for one tool input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Plain string.
    String,
    /// String, or a JSON object that is serialized compactly before use.
    Text,
    /// Finite number; numeric strings are coerced.
    Number,
    /// Boolean; `"true"`/`"false"` strings are coerced.
    Boolean,
    /// Arbitrary JSON object.
    Object,
    /// Array of `{ path, content }` entries.
    Files,
}

impl FieldKind {
    /// Human-readable label used in validation messages.
    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Text => "string or object",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::Object => "object",
            FieldKind::Files => "array of {path, content}",
        }
    }
}

/// Declaration of one named input field of a tool.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Field name as it appears in the parameter object.
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Value used when the caller omits an optional field.
    pub default: Option<Value>,
    pub description: &'static str,
}

impl FieldSpec {
    pub fn required(name: &'static str, kind: FieldKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: true,
            default: None,
            description,
        }
    }

    pub fn optional(name: &'static str, kind: FieldKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: false,
            default: None,
            description,
        }
    }

    /// Attach a default applied when the field is omitted.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// Ordered set of fields describing a tool's parameter object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolSchema {
    pub fields: Vec<FieldSpec>,
}

impl ToolSchema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    /// Schema for tools that take no parameters.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|field| field.required)
    }
}

/// Caller-supplied file materialized into a staging directory.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct StagedFile {
    /// Relative path of the file inside the staged directory, for example `src/index.js`.
    #[schemars(description = "Relative path inside the staged directory, for example 'index.js' or 'lib/util.js'.")]
    pub path: String,
    /// Full UTF-8 content of the file.
    #[schemars(description = "Full UTF-8 file content.")]
    pub content: String,
}
