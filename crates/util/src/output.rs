use coho_mcp_types::OutputFormat;
use serde_json::Value;

/// Text returned when a command succeeds without printing anything.
pub const EMPTY_OUTPUT_MESSAGE: &str = "Command completed successfully.";

/// Shapes captured standard output for the caller.
///
/// JSON output is re-serialized with indentation when it parses; anything
/// else (and every [`OutputFormat::Raw`] output) is relayed unmodified.
pub fn shape_output(stdout: &str, format: OutputFormat) -> String {
    if stdout.trim().is_empty() {
        return EMPTY_OUTPUT_MESSAGE.to_string();
    }
    match format {
        OutputFormat::Raw => stdout.to_string(),
        OutputFormat::Json => serde_json::from_str::<Value>(stdout.trim())
            .ok()
            .and_then(|value| serde_json::to_string_pretty(&value).ok())
            .unwrap_or_else(|| stdout.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_output_is_pretty_printed() {
        let shaped = shape_output(r#"[{"name":"Joe","age":31}]"#, OutputFormat::Json);
        assert!(shaped.contains("\n"), "{shaped}");
        assert!(shaped.contains(r#""name": "Joe""#));
    }

    #[test]
    fn unparseable_json_output_falls_back_to_raw() {
        let raw = "{\"a\":1}\n{\"a\":2}\n";
        assert_eq!(shape_output(raw, OutputFormat::Json), raw);
    }

    #[test]
    fn raw_output_is_untouched() {
        let csv = "name,age\nJoe,31\n";
        assert_eq!(shape_output(csv, OutputFormat::Raw), csv);
        assert_eq!(shape_output(r#"{"a":1}"#, OutputFormat::Raw), r#"{"a":1}"#);
    }

    #[test]
    fn empty_output_reports_completion() {
        assert_eq!(shape_output("  \n", OutputFormat::Json), EMPTY_OUTPUT_MESSAGE);
    }
}
