use coho_mcp_types::{ArgValue, FieldKind, FieldSpec, StagedFile, ToolSchema, ValidatedArguments};
use coho_mcp_util::normalize_relative_path;
use serde_json::{Map, Value};

use crate::types::ValidationError;

/// Validate a raw parameter object against `schema`.
///
/// Required fields must be present and non-null, optional fields fall back to
/// their declared default, and string encodings of numbers, booleans and
/// objects are coerced. Fields the schema does not declare are ignored.
/// Error messages name the field and the constraint, never the value.
pub fn validate_arguments(
    schema: &ToolSchema,
    params: Option<&Map<String, Value>>,
) -> Result<ValidatedArguments, ValidationError> {
    let mut arguments = ValidatedArguments::new();
    for field in &schema.fields {
        let supplied = params.and_then(|params| params.get(field.name)).filter(|value| !value.is_null());
        match (supplied, field.default.as_ref()) {
            (Some(value), _) => arguments.insert(field.name, coerce(field, value)?),
            (None, _) if field.required => return Err(ValidationError::missing(field.name)),
            (None, Some(default)) => arguments.insert(field.name, coerce(field, default)?),
            (None, None) => {}
        }
    }
    Ok(arguments)
}

fn coerce(field: &FieldSpec, value: &Value) -> Result<ArgValue, ValidationError> {
    let wrong_type = || ValidationError::wrong_type(field.name, field.kind.label());
    match field.kind {
        FieldKind::String => match value {
            Value::String(text) => non_blank(field, text),
            Value::Number(number) => Ok(ArgValue::Str(number.to_string())),
            Value::Bool(flag) => Ok(ArgValue::Str(flag.to_string())),
            _ => Err(wrong_type()),
        },
        FieldKind::Text => match value {
            Value::String(text) => non_blank(field, text),
            Value::Object(_) | Value::Array(_) => serde_json::to_string(value)
                .map(ArgValue::Str)
                .map_err(|_| wrong_type()),
            _ => Err(wrong_type()),
        },
        FieldKind::Number => {
            let number = match value {
                Value::Number(number) => number.as_f64(),
                Value::String(text) => text.trim().parse::<f64>().ok(),
                _ => None,
            };
            number.filter(|number| number.is_finite()).map(ArgValue::Number).ok_or_else(wrong_type)
        }
        FieldKind::Boolean => match value {
            Value::Bool(flag) => Ok(ArgValue::Bool(*flag)),
            Value::String(text) if text.trim().eq_ignore_ascii_case("true") => Ok(ArgValue::Bool(true)),
            Value::String(text) if text.trim().eq_ignore_ascii_case("false") => Ok(ArgValue::Bool(false)),
            _ => Err(wrong_type()),
        },
        FieldKind::Object => match value {
            Value::Object(object) => Ok(ArgValue::Object(object.clone())),
            Value::String(text) => serde_json::from_str::<Map<String, Value>>(text)
                .map(ArgValue::Object)
                .map_err(|_| wrong_type()),
            _ => Err(wrong_type()),
        },
        FieldKind::Files => {
            let files: Vec<StagedFile> = serde_json::from_value(value.clone()).map_err(|_| wrong_type())?;
            if field.required && files.is_empty() {
                return Err(ValidationError::invalid(field.name, "must contain at least one file"));
            }
            for file in &files {
                normalize_relative_path(&file.path)
                    .map_err(|error| ValidationError::invalid(field.name, format!("has an unusable path: {error}")))?;
            }
            Ok(ArgValue::Files(files))
        }
    }
}

fn non_blank(field: &FieldSpec, text: &str) -> Result<ArgValue, ValidationError> {
    if field.required && text.trim().is_empty() {
        return Err(ValidationError::invalid(field.name, "must not be blank"));
    }
    Ok(ArgValue::Str(text.to_string()))
}
