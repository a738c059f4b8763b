use coho_mcp_types::{FieldKind, FieldSpec, StagedFile, ToolSchema};
use schemars::schema_for;
use serde_json::{Map, Value, json};

/// Renders a tool schema as the JSON Schema object advertised in `tools/list`.
pub fn render_input_schema(schema: &ToolSchema) -> Map<String, Value> {
    let properties = schema
        .fields
        .iter()
        .map(|field| (field.name.to_string(), render_field(field)))
        .collect::<Map<String, Value>>();
    let required = schema
        .required_fields()
        .map(|field| Value::String(field.name.to_string()))
        .collect::<Vec<Value>>();

    let mut rendered = Map::new();
    rendered.insert("type".to_string(), json!("object"));
    rendered.insert("properties".to_string(), Value::Object(properties));
    if !required.is_empty() {
        rendered.insert("required".to_string(), Value::Array(required));
    }
    rendered
}

fn render_field(field: &FieldSpec) -> Value {
    let mut rendered = match field.kind {
        FieldKind::String => json!({ "type": "string" }),
        FieldKind::Text => json!({ "type": ["string", "object"] }),
        FieldKind::Number => json!({ "type": "number" }),
        FieldKind::Boolean => json!({ "type": "boolean" }),
        FieldKind::Object => json!({ "type": "object" }),
        FieldKind::Files => json!({ "type": "array", "items": staged_file_schema() }),
    };
    if let Some(object) = rendered.as_object_mut() {
        object.insert("description".to_string(), json!(field.description));
        if let Some(default) = field.default.as_ref() {
            object.insert("default".to_string(), default.clone());
        }
    }
    rendered
}

fn staged_file_schema() -> Value {
    let mut schema = serde_json::to_value(schema_for!(StagedFile)).unwrap_or_else(|_| json!({ "type": "object" }));
    if let Some(object) = schema.as_object_mut() {
        object.remove("$schema");
    }
    schema
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_properties_required_and_defaults() {
        let schema = ToolSchema::new(vec![
            FieldSpec::required("collection", FieldKind::String, "Collection name"),
            FieldSpec::optional("limit", FieldKind::Number, "Maximum rows").with_default(100),
            FieldSpec::required("files", FieldKind::Files, "Source files"),
        ]);
        let rendered = render_input_schema(&schema);
        assert_eq!(rendered["type"], "object");
        assert_eq!(rendered["required"], json!(["collection", "files"]));
        assert_eq!(rendered["properties"]["limit"]["default"], 100);
        assert_eq!(rendered["properties"]["files"]["type"], "array");
        let item_properties = &rendered["properties"]["files"]["items"]["properties"];
        assert!(item_properties.get("path").is_some());
        assert!(item_properties.get("content").is_some());
    }

    #[test]
    fn empty_schema_omits_required() {
        let rendered = render_input_schema(&ToolSchema::empty());
        assert!(rendered.get("required").is_none());
        assert_eq!(rendered["properties"], json!({}));
    }
}
