use coho_mcp_types::{FieldKind, FieldSpec, ToolSchema};

/// Closed set of tools served by this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    Configure,
    SetAdminToken,
    QueryCollection,
    DeployCode,
    KeyvalGet,
    KeyvalSet,
    KeyvalDelete,
    ListCollections,
    CreateCollection,
    DropCollection,
    CreateIndex,
    DropIndex,
    AddSchema,
    RemoveSchema,
    CapCollection,
    UncapCollection,
    ImportData,
    ExportData,
    UploadFiles,
    ListFiles,
    DeleteFile,
    QueryLogs,
    ProjectInfo,
}

impl ToolKind {
    /// Every tool in catalog order.
    pub const ALL: [ToolKind; 23] = [
        ToolKind::Configure,
        ToolKind::SetAdminToken,
        ToolKind::QueryCollection,
        ToolKind::DeployCode,
        ToolKind::KeyvalGet,
        ToolKind::KeyvalSet,
        ToolKind::KeyvalDelete,
        ToolKind::ListCollections,
        ToolKind::CreateCollection,
        ToolKind::DropCollection,
        ToolKind::CreateIndex,
        ToolKind::DropIndex,
        ToolKind::AddSchema,
        ToolKind::RemoveSchema,
        ToolKind::CapCollection,
        ToolKind::UncapCollection,
        ToolKind::ImportData,
        ToolKind::ExportData,
        ToolKind::UploadFiles,
        ToolKind::ListFiles,
        ToolKind::DeleteFile,
        ToolKind::QueryLogs,
        ToolKind::ProjectInfo,
    ];

    /// Tools that may run before project and token are configured.
    pub fn is_configuration(&self) -> bool {
        matches!(self, ToolKind::Configure | ToolKind::SetAdminToken)
    }

    /// Whether `name` is one of the configuration tools.
    pub fn is_configuration_name(name: &str) -> bool {
        Self::ALL
            .iter()
            .any(|kind| kind.is_configuration() && kind.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Configure => "configure",
            ToolKind::SetAdminToken => "set_admin_token",
            ToolKind::QueryCollection => "query_collection",
            ToolKind::DeployCode => "deploy_code",
            ToolKind::KeyvalGet => "keyval_get",
            ToolKind::KeyvalSet => "keyval_set",
            ToolKind::KeyvalDelete => "keyval_delete",
            ToolKind::ListCollections => "list_collections",
            ToolKind::CreateCollection => "create_collection",
            ToolKind::DropCollection => "drop_collection",
            ToolKind::CreateIndex => "create_index",
            ToolKind::DropIndex => "drop_index",
            ToolKind::AddSchema => "add_schema",
            ToolKind::RemoveSchema => "remove_schema",
            ToolKind::CapCollection => "cap_collection",
            ToolKind::UncapCollection => "uncap_collection",
            ToolKind::ImportData => "import_data",
            ToolKind::ExportData => "export_data",
            ToolKind::UploadFiles => "upload_files",
            ToolKind::ListFiles => "list_files",
            ToolKind::DeleteFile => "delete_file",
            ToolKind::QueryLogs => "query_logs",
            ToolKind::ProjectInfo => "project_info",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ToolKind::Configure => {
                "Set the Codehooks project, space and admin token used by every other tool. \
                 Omitted fields keep their current value."
            }
            ToolKind::SetAdminToken => "Replace the admin token used to authenticate Codehooks CLI calls.",
            ToolKind::QueryCollection => {
                "Query documents in a collection. Returns at most 100 documents unless `limit` is given; \
                 `count` returns only the number of matches."
            }
            ToolKind::DeployCode => {
                "Deploy a Codehooks application from the supplied source files. A package.json is generated \
                 when none is included, dependencies are installed, then the code is deployed."
            }
            ToolKind::KeyvalGet => "Read a value from the key-value store.",
            ToolKind::KeyvalSet => "Store a value in the key-value store, optionally with a time-to-live.",
            ToolKind::KeyvalDelete => "Delete a key from the key-value store.",
            ToolKind::ListCollections => "List the collections in the current project space.",
            ToolKind::CreateCollection => "Create a new collection.",
            ToolKind::DropCollection => "Delete a collection and all of its documents.",
            ToolKind::CreateIndex => "Create an index on a collection field.",
            ToolKind::DropIndex => "Remove an index from a collection field.",
            ToolKind::AddSchema => "Attach a JSON Schema to a collection so inserted documents are validated.",
            ToolKind::RemoveSchema => "Remove the JSON Schema attached to a collection.",
            ToolKind::CapCollection => "Cap a collection to a maximum number of documents.",
            ToolKind::UncapCollection => "Remove the document cap from a collection.",
            ToolKind::ImportData => "Import JSON or CSV data into a collection.",
            ToolKind::ExportData => "Export every document in a collection, optionally filtered, as JSON lines or CSV.",
            ToolKind::UploadFiles => "Upload static files to the project's file storage.",
            ToolKind::ListFiles => "List files in the project's file storage.",
            ToolKind::DeleteFile => "Delete a file from the project's file storage.",
            ToolKind::QueryLogs => "Show the most recent application log lines.",
            ToolKind::ProjectInfo => "Show project and space information, including collections and deployments.",
        }
    }

    pub fn schema(&self) -> ToolSchema {
        match self {
            ToolKind::Configure => ToolSchema::new(vec![
                FieldSpec::optional("token", FieldKind::String, "Admin token for the project."),
                FieldSpec::optional("project", FieldKind::String, "Project identifier, for example 'myproject-ff00'."),
                FieldSpec::optional("space", FieldKind::String, "Space name. Defaults to 'dev'."),
            ]),
            ToolKind::SetAdminToken => ToolSchema::new(vec![FieldSpec::required(
                "token",
                FieldKind::String,
                "Admin token for the project.",
            )]),
            ToolKind::QueryCollection => ToolSchema::new(vec![
                collection(),
                query(),
                FieldSpec::optional("limit", FieldKind::Number, "Maximum number of documents. Defaults to 100."),
                FieldSpec::optional("offset", FieldKind::Number, "Number of documents to skip."),
                FieldSpec::optional("fields", FieldKind::String, "Comma-separated list of fields to return."),
                FieldSpec::optional("sort", FieldKind::String, "Comma-separated list of fields to sort by."),
                FieldSpec::optional("reverse", FieldKind::Boolean, "Reverse the sort order.").with_default(false),
                FieldSpec::optional("count", FieldKind::Boolean, "Return only the number of matching documents.")
                    .with_default(false),
                FieldSpec::optional("csv", FieldKind::Boolean, "Return the result as CSV.").with_default(false),
                FieldSpec::optional("jsonl", FieldKind::Boolean, "Return the result as JSON lines.").with_default(false),
            ]),
            ToolKind::DeployCode => ToolSchema::new(vec![
                files("Application source files. Must include the entry point, usually 'index.js'."),
                FieldSpec::optional(
                    "package_json",
                    FieldKind::Object,
                    "Fields merged over the generated package.json when no package.json file is supplied.",
                ),
            ]),
            ToolKind::KeyvalGet => ToolSchema::new(vec![key(), keyspace()]),
            ToolKind::KeyvalSet => ToolSchema::new(vec![
                key(),
                FieldSpec::required("value", FieldKind::Text, "Value to store. Objects are stored as JSON text."),
                keyspace(),
                FieldSpec::optional("ttl", FieldKind::Number, "Time to live in milliseconds."),
            ]),
            ToolKind::KeyvalDelete => ToolSchema::new(vec![key(), keyspace()]),
            ToolKind::ListCollections => ToolSchema::empty(),
            ToolKind::CreateCollection
            | ToolKind::DropCollection
            | ToolKind::RemoveSchema
            | ToolKind::UncapCollection => ToolSchema::new(vec![collection()]),
            ToolKind::CreateIndex | ToolKind::DropIndex => ToolSchema::new(vec![
                collection(),
                FieldSpec::required("index", FieldKind::String, "Field name the index covers."),
            ]),
            ToolKind::AddSchema => ToolSchema::new(vec![
                collection(),
                FieldSpec::required("schema", FieldKind::Text, "JSON Schema document, as an object or JSON text."),
            ]),
            ToolKind::CapCollection => ToolSchema::new(vec![
                collection(),
                FieldSpec::required("cap", FieldKind::Number, "Maximum number of documents to keep."),
                FieldSpec::optional("capdelay", FieldKind::Number, "Delay in milliseconds between cap checks."),
            ]),
            ToolKind::ImportData => ToolSchema::new(vec![
                collection(),
                FieldSpec::required("content", FieldKind::Text, "Data to import: a JSON array, or CSV text."),
                FieldSpec::optional("format", FieldKind::String, "Format of `content`: 'json' or 'csv'.").with_default("json"),
                FieldSpec::optional("separator", FieldKind::String, "CSV field separator."),
                FieldSpec::optional("encoding", FieldKind::String, "Character encoding of the data."),
            ]),
            ToolKind::ExportData => ToolSchema::new(vec![
                collection(),
                query(),
                FieldSpec::optional("format", FieldKind::String, "Export format: 'jsonl' or 'csv'.").with_default("jsonl"),
            ]),
            ToolKind::UploadFiles => ToolSchema::new(vec![
                files("Files to upload, with paths relative to the upload root."),
                FieldSpec::optional("target", FieldKind::String, "Target directory in file storage."),
            ]),
            ToolKind::ListFiles => ToolSchema::new(vec![FieldSpec::optional(
                "path",
                FieldKind::String,
                "Only list files below this path.",
            )]),
            ToolKind::DeleteFile => ToolSchema::new(vec![FieldSpec::required(
                "filename",
                FieldKind::String,
                "Path of the file to delete.",
            )]),
            ToolKind::QueryLogs => ToolSchema::new(vec![
                FieldSpec::optional("tail", FieldKind::Number, "Number of log lines to return.").with_default(100),
            ]),
            ToolKind::ProjectInfo => ToolSchema::new(vec![
                FieldSpec::optional("json", FieldKind::Boolean, "Return the information as JSON.").with_default(true),
            ]),
        }
    }
}

fn collection() -> FieldSpec {
    FieldSpec::required("collection", FieldKind::String, "Collection name.")
}

fn query() -> FieldSpec {
    FieldSpec::optional(
        "query",
        FieldKind::Text,
        "Filter as a JSON object (for example {\"age\":{\"$gt\":30}}) or a URL-style query string.",
    )
}

fn key() -> FieldSpec {
    FieldSpec::required("key", FieldKind::String, "Key name.")
}

fn keyspace() -> FieldSpec {
    FieldSpec::optional("keyspace", FieldKind::String, "Keyspace that isolates groups of keys.")
}

fn files(description: &'static str) -> FieldSpec {
    FieldSpec::required("files", FieldKind::Files, description)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_configuration_tools_skip_the_credential_check() {
        let configuration: Vec<_> = ToolKind::ALL.iter().filter(|kind| kind.is_configuration()).collect();
        assert_eq!(configuration, vec![&ToolKind::Configure, &ToolKind::SetAdminToken]);
        assert!(ToolKind::is_configuration_name("configure"));
        assert!(!ToolKind::is_configuration_name("query_collection"));
        assert!(!ToolKind::is_configuration_name("unknown"));
    }

    #[test]
    fn query_limit_has_no_schema_default() {
        let schema = ToolKind::QueryCollection.schema();
        assert!(schema.field("limit").is_some_and(|field| field.default.is_none()));
    }
}
