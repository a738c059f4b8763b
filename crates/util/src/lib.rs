//! Helpers shared by the Codehooks MCP server crates.
//!
//! Everything here is synchronous and side-effect free: secret redaction,
//! output shaping, staged path checks, deployment manifest merging and JSON
//! schema rendering for tool descriptors.

mod json_schema;
mod manifest;
mod output;
mod paths;
mod redaction;

pub use json_schema::render_input_schema;
pub use manifest::{MANIFEST_FILE_NAME, default_package_manifest, merge_manifest};
pub use output::{EMPTY_OUTPUT_MESSAGE, shape_output};
pub use paths::{StagedPathError, normalize_relative_path};
pub use redaction::{REDACTION_MARKER, redact_json_fields, redact_secret, redact_sensitive};
