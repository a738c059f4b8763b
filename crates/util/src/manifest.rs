use serde_json::{Map, Value, json};

/// Manifest file the deploy tool synthesizes when the caller did not send one.
pub const MANIFEST_FILE_NAME: &str = "package.json";

/// Baseline manifest for a Codehooks application.
pub fn default_package_manifest() -> Value {
    json!({
        "name": "codehooks-app",
        "version": "1.0.0",
        "main": "index.js",
        "dependencies": {
            "codehooks-js": "latest"
        }
    })
}

/// Merges caller-supplied manifest fields over [`default_package_manifest`].
///
/// Caller values win. When both sides hold an object for the same key (for
/// example `dependencies`), the objects are merged key by key so the default
/// client library dependency survives unless explicitly overridden.
pub fn merge_manifest(overrides: Option<&Map<String, Value>>) -> Value {
    let mut manifest = default_package_manifest();
    if let (Some(overrides), Value::Object(base)) = (overrides, &mut manifest) {
        for (key, value) in overrides {
            match (base.get_mut(key), value) {
                (Some(Value::Object(existing)), Value::Object(incoming)) => {
                    for (nested_key, nested_value) in incoming {
                        existing.insert(nested_key.clone(), nested_value.clone());
                    }
                }
                _ => {
                    base.insert(key.clone(), value.clone());
                }
            }
        }
    }
    manifest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_overrides_yields_the_default_manifest() {
        assert_eq!(merge_manifest(None), default_package_manifest());
    }

    #[test]
    fn caller_fields_win_and_dependencies_merge() {
        let overrides = json!({
            "name": "orders-api",
            "type": "module",
            "dependencies": { "lodash": "^4.17.21" }
        });
        let merged = merge_manifest(overrides.as_object());
        assert_eq!(merged["name"], "orders-api");
        assert_eq!(merged["version"], "1.0.0");
        assert_eq!(merged["type"], "module");
        assert_eq!(merged["dependencies"]["codehooks-js"], "latest");
        assert_eq!(merged["dependencies"]["lodash"], "^4.17.21");
    }

    #[test]
    fn non_object_override_replaces_the_default() {
        let overrides = json!({ "dependencies": "none" });
        let merged = merge_manifest(overrides.as_object());
        assert_eq!(merged["dependencies"], "none");
    }
}
