//! Argument-building strategies, one per [`ToolKind`].
//!
//! Strategies are pure: they read validated arguments and the credentials
//! snapshot and describe what to stage and which argument vector to run. The
//! admin token never appears here; the executor appends it.

use std::path::Path;

use coho_mcp_types::{Credentials, CredentialsUpdate, OutputFormat, StagedFile, ValidatedArguments};
use serde_json::{Map, Value};

use super::ToolKind;
use crate::types::{StagingError, ValidationError};

/// Default page size for `query_collection` when the caller sets no limit.
pub const DEFAULT_QUERY_LIMIT: &str = "100";

/// One element of a planned argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgPart {
    Literal(String),
    /// Replaced by the path of the staged file or directory.
    StagedPath,
}

/// Content a command needs on disk before it runs.
#[derive(Debug, Clone, PartialEq)]
pub enum StagingRequest {
    None,
    /// A single file with the given name suffix.
    Text { content: String, suffix: &'static str },
    /// A directory populated with the caller's files.
    Files { files: Vec<StagedFile> },
    /// A deployable application directory.
    Deploy {
        files: Vec<StagedFile>,
        manifest_overrides: Option<Map<String, Value>>,
    },
}

/// Planned CLI invocation for one tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandPlan {
    pub parts: Vec<ArgPart>,
    pub format: OutputFormat,
    pub staging: StagingRequest,
}

impl CommandPlan {
    /// Substitute the staged path into the argument vector.
    pub fn resolve(&self, staged: Option<&Path>) -> Result<Vec<String>, StagingError> {
        self.parts
            .iter()
            .map(|part| match part {
                ArgPart::Literal(value) => Ok(value.clone()),
                ArgPart::StagedPath => staged
                    .map(|path| path.to_string_lossy().into_owned())
                    .ok_or(StagingError::NothingStaged),
            })
            .collect()
    }
}

/// What the dispatcher should do for a validated call.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolAction {
    /// Merge into the credential store; no process is spawned.
    Configure(CredentialsUpdate),
    Command(CommandPlan),
}

impl ToolKind {
    /// Build the action for this tool from validated arguments.
    pub fn plan(&self, args: &ValidatedArguments, credentials: &Credentials) -> Result<ToolAction, ValidationError> {
        let mut cmd = ArgBuilder::default();
        let mut format = OutputFormat::Raw;
        let mut staging = StagingRequest::None;

        match self {
            ToolKind::Configure => {
                return Ok(ToolAction::Configure(CredentialsUpdate {
                    token: owned(args, "token"),
                    project: owned(args, "project"),
                    space: owned(args, "space"),
                }));
            }
            ToolKind::SetAdminToken => {
                return Ok(ToolAction::Configure(CredentialsUpdate {
                    token: owned(args, "token"),
                    ..Default::default()
                }));
            }
            ToolKind::QueryCollection => {
                cmd.arg("query").arg(required(args, "collection")?);
                cmd.opt("--query", args.str("query"));
                let count = args.flag("count");
                if !count {
                    let limit = whole_number(args, "limit")?;
                    cmd.opt("--limit", Some(limit.as_deref().unwrap_or(DEFAULT_QUERY_LIMIT)));
                }
                cmd.opt("--offset", whole_number(args, "offset")?.as_deref());
                cmd.opt("--fields", args.str("fields"));
                cmd.opt("--sort", args.str("sort"));
                cmd.switch("--reverse", args.flag("reverse"));
                cmd.switch("--count", count);
                let csv = args.flag("csv");
                let jsonl = args.flag("jsonl");
                if csv && jsonl {
                    return Err(ValidationError::invalid("csv", "cannot be combined with 'jsonl'"));
                }
                cmd.switch("--csv", csv);
                cmd.switch("--jsonl", jsonl);
                if !csv && !jsonl {
                    format = OutputFormat::Json;
                }
            }
            ToolKind::DeployCode => {
                cmd.arg("deploy");
                staging = StagingRequest::Deploy {
                    files: args.files("files").to_vec(),
                    manifest_overrides: args.object("package_json").cloned(),
                };
            }
            ToolKind::KeyvalGet => {
                cmd.arg("get").arg(required(args, "key")?);
                cmd.opt("--keyspace", args.str("keyspace"));
                format = OutputFormat::Json;
            }
            ToolKind::KeyvalSet => {
                cmd.arg("set").arg(required(args, "key")?).arg(required(args, "value")?);
                cmd.opt("--keyspace", args.str("keyspace"));
                cmd.opt("--ttl", whole_number(args, "ttl")?.as_deref());
                format = OutputFormat::Json;
            }
            ToolKind::KeyvalDelete => {
                cmd.arg("del").arg(required(args, "key")?);
                cmd.opt("--keyspace", args.str("keyspace"));
                format = OutputFormat::Json;
            }
            ToolKind::ListCollections => {
                cmd.arg("collection");
            }
            ToolKind::CreateCollection => {
                cmd.arg("createcollection").arg(required(args, "collection")?);
            }
            ToolKind::DropCollection => {
                cmd.arg("dropcollection").arg(required(args, "collection")?);
            }
            ToolKind::CreateIndex | ToolKind::DropIndex => {
                let subcommand = if *self == ToolKind::CreateIndex { "createindex" } else { "dropindex" };
                cmd.arg(subcommand);
                cmd.opt("--collection", Some(required(args, "collection")?));
                cmd.opt("--index", Some(required(args, "index")?));
            }
            ToolKind::AddSchema => {
                cmd.arg("add-schema");
                cmd.opt("--collection", Some(required(args, "collection")?));
                cmd.flag("--schema").staged();
                staging = StagingRequest::Text {
                    content: required(args, "schema")?.to_string(),
                    suffix: ".json",
                };
            }
            ToolKind::RemoveSchema => {
                cmd.arg("remove-schema");
                cmd.opt("--collection", Some(required(args, "collection")?));
            }
            ToolKind::CapCollection => {
                cmd.arg("cap-collection");
                cmd.opt("--collection", Some(required(args, "collection")?));
                let cap = whole_number(args, "cap")?.ok_or_else(|| ValidationError::missing("cap"))?;
                cmd.opt("--cap", Some(cap.as_str()));
                cmd.opt("--capdelay", whole_number(args, "capdelay")?.as_deref());
            }
            ToolKind::UncapCollection => {
                cmd.arg("uncap-collection");
                cmd.opt("--collection", Some(required(args, "collection")?));
            }
            ToolKind::ImportData => {
                let suffix = match args.str("format").unwrap_or("json").to_ascii_lowercase().as_str() {
                    "json" => ".json",
                    "csv" => ".csv",
                    _ => return Err(ValidationError::invalid("format", "must be 'json' or 'csv'")),
                };
                cmd.arg("import");
                cmd.opt("--collection", Some(required(args, "collection")?));
                cmd.flag("--filepath").staged();
                cmd.opt("--separator", args.str("separator"));
                cmd.opt("--encoding", args.str("encoding"));
                staging = StagingRequest::Text {
                    content: required(args, "content")?.to_string(),
                    suffix,
                };
            }
            ToolKind::ExportData => {
                let switch = match args.str("format").unwrap_or("jsonl").to_ascii_lowercase().as_str() {
                    "jsonl" => "--jsonl",
                    "csv" => "--csv",
                    _ => return Err(ValidationError::invalid("format", "must be 'jsonl' or 'csv'")),
                };
                cmd.arg("query").arg(required(args, "collection")?);
                cmd.opt("--query", args.str("query"));
                cmd.arg(switch);
            }
            ToolKind::UploadFiles => {
                cmd.arg("file-upload");
                cmd.flag("--src").staged();
                cmd.opt("--target", args.str("target"));
                staging = StagingRequest::Files {
                    files: args.files("files").to_vec(),
                };
            }
            ToolKind::ListFiles => {
                cmd.arg("file-list");
                cmd.opt("--path", args.str("path"));
            }
            ToolKind::DeleteFile => {
                cmd.arg("file-delete");
                cmd.opt("--filename", Some(required(args, "filename")?));
            }
            ToolKind::QueryLogs => {
                cmd.arg("log");
                cmd.opt("--tail", whole_number(args, "tail")?.as_deref());
            }
            ToolKind::ProjectInfo => {
                cmd.arg("info");
                let json = args.flag("json");
                cmd.switch("--json", json);
                if json {
                    format = OutputFormat::Json;
                }
            }
        }

        cmd.target(credentials);
        Ok(ToolAction::Command(CommandPlan {
            parts: cmd.finish(),
            format,
            staging,
        }))
    }
}

#[derive(Debug, Default)]
struct ArgBuilder {
    parts: Vec<ArgPart>,
}

impl ArgBuilder {
    fn arg(&mut self, value: impl Into<String>) -> &mut Self {
        self.parts.push(ArgPart::Literal(value.into()));
        self
    }

    fn flag(&mut self, name: &str) -> &mut Self {
        self.arg(name)
    }

    fn opt(&mut self, name: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value {
            self.arg(name).arg(value);
        }
        self
    }

    fn switch(&mut self, name: &str, enabled: bool) -> &mut Self {
        if enabled {
            self.arg(name);
        }
        self
    }

    fn staged(&mut self) -> &mut Self {
        self.parts.push(ArgPart::StagedPath);
        self
    }

    fn target(&mut self, credentials: &Credentials) -> &mut Self {
        self.arg("--project").arg(credentials.project());
        self.arg("--space").arg(credentials.space.as_str())
    }

    fn finish(self) -> Vec<ArgPart> {
        self.parts
    }
}

fn required<'a>(args: &'a ValidatedArguments, name: &str) -> Result<&'a str, ValidationError> {
    args.str(name).ok_or_else(|| ValidationError::missing(name))
}

fn owned(args: &ValidatedArguments, name: &str) -> Option<String> {
    args.str(name).map(str::to_string)
}

fn whole_number(args: &ValidatedArguments, name: &str) -> Result<Option<String>, ValidationError> {
    match args.number(name) {
        None => Ok(None),
        Some(value) if value >= 0.0 && value.fract() == 0.0 => Ok(args.number_arg(name)),
        Some(_) => Err(ValidationError::invalid(name, "must be a non-negative whole number")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::validate_arguments;
    use serde_json::json;

    fn credentials() -> Credentials {
        Credentials::new(Some("proj1".into()), Some("prod".into()), Some("tkn_abc123".into()))
    }

    fn plan(kind: ToolKind, params: Value) -> Result<ToolAction, ValidationError> {
        let args = validate_arguments(&kind.schema(), params.as_object())?;
        kind.plan(&args, &credentials())
    }

    fn command(kind: ToolKind, params: Value) -> CommandPlan {
        match plan(kind, params).expect("valid arguments") {
            ToolAction::Command(plan) => plan,
            other => panic!("expected a command, got {other:?}"),
        }
    }

    fn literal_args(plan: &CommandPlan) -> Vec<String> {
        plan.resolve(Some(Path::new("/staged"))).unwrap()
    }

    #[test]
    fn query_applies_default_limit_unless_counting() {
        let plan = command(ToolKind::QueryCollection, json!({ "collection": "users" }));
        let args = literal_args(&plan);
        assert_eq!(
            args,
            vec!["query", "users", "--limit", "100", "--project", "proj1", "--space", "prod"]
        );
        assert_eq!(plan.format, OutputFormat::Json);

        let counting = literal_args(&command(
            ToolKind::QueryCollection,
            json!({ "collection": "users", "count": true, "limit": 5 }),
        ));
        assert!(counting.contains(&"--count".to_string()));
        assert!(!counting.contains(&"--limit".to_string()));
    }

    #[test]
    fn explicit_limit_and_row_formats_pass_through() {
        let plan = command(
            ToolKind::QueryCollection,
            json!({ "collection": "users", "limit": 7, "offset": 10, "reverse": true, "csv": true }),
        );
        let args = literal_args(&plan);
        assert!(args.windows(2).any(|pair| pair == ["--limit", "7"]));
        assert!(args.windows(2).any(|pair| pair == ["--offset", "10"]));
        assert!(args.contains(&"--reverse".to_string()));
        assert!(args.contains(&"--csv".to_string()));
        assert_eq!(plan.format, OutputFormat::Raw);
    }

    #[test]
    fn conflicting_row_formats_are_rejected() {
        let error = plan(ToolKind::QueryCollection, json!({ "collection": "u", "csv": true, "jsonl": true })).unwrap_err();
        assert!(matches!(error, ValidationError::Invalid { .. }));
    }

    #[test]
    fn fractional_or_negative_counts_are_rejected() {
        let error = plan(ToolKind::QueryLogs, json!({ "tail": 2.5 })).unwrap_err();
        assert!(matches!(error, ValidationError::Invalid { ref field, .. } if field == "tail"));
        let error = plan(ToolKind::QueryCollection, json!({ "collection": "u", "limit": -1 })).unwrap_err();
        assert!(matches!(error, ValidationError::Invalid { ref field, .. } if field == "limit"));
    }

    #[test]
    fn strategies_never_add_the_token() {
        for kind in ToolKind::ALL {
            let params = json!({
                "collection": "c", "key": "k", "value": "v", "index": "f", "schema": "{}",
                "cap": 10, "content": "[]", "filename": "a.txt", "token": "tkn_abc123",
                "files": [{ "path": "index.js", "content": "" }]
            });
            if let ToolAction::Command(plan) = plan(kind, params).unwrap() {
                let args = literal_args(&plan);
                assert!(!args.iter().any(|arg| arg.contains("tkn_abc123") || arg == "--admintoken"), "{kind:?}");
                assert_eq!(args[args.len() - 4..], ["--project", "proj1", "--space", "prod"], "{kind:?}");
            }
        }
    }

    #[test]
    fn file_backed_tools_reference_the_staged_path() {
        let schema = command(ToolKind::AddSchema, json!({ "collection": "users", "schema": { "type": "object" } }));
        assert_eq!(
            schema.staging,
            StagingRequest::Text {
                content: r#"{"type":"object"}"#.into(),
                suffix: ".json"
            }
        );
        assert!(literal_args(&schema).windows(2).any(|pair| pair == ["--schema", "/staged"]));
        assert!(matches!(schema.resolve(None), Err(StagingError::NothingStaged)));

        let import = command(ToolKind::ImportData, json!({ "collection": "users", "content": "a,b", "format": "CSV" }));
        assert!(matches!(import.staging, StagingRequest::Text { suffix: ".csv", .. }));

        let upload = command(
            ToolKind::UploadFiles,
            json!({ "files": [{ "path": "img/logo.png", "content": "x" }], "target": "assets" }),
        );
        assert!(literal_args(&upload).windows(2).any(|pair| pair == ["--src", "/staged"]));
    }

    #[test]
    fn export_has_no_default_limit() {
        let args = literal_args(&command(ToolKind::ExportData, json!({ "collection": "users" })));
        assert_eq!(args[..3], ["query", "users", "--jsonl"]);
        assert!(!args.contains(&"--limit".to_string()));
        assert!(plan(ToolKind::ExportData, json!({ "collection": "u", "format": "xml" })).is_err());
    }

    #[test]
    fn deploy_plan_carries_files_and_manifest_overrides() {
        let plan = command(
            ToolKind::DeployCode,
            json!({ "files": [{ "path": "index.js", "content": "app.init()" }], "package_json": { "name": "orders" } }),
        );
        let StagingRequest::Deploy { files, manifest_overrides } = &plan.staging else {
            panic!("expected deploy staging");
        };
        assert_eq!(files.len(), 1);
        assert_eq!(manifest_overrides.as_ref().unwrap()["name"], "orders");
        assert_eq!(literal_args(&plan)[0], "deploy");
        assert_eq!(plan.format, OutputFormat::Raw);
    }

    #[test]
    fn configuration_tools_merge_instead_of_spawning() {
        let action = plan(ToolKind::Configure, json!({ "token": "t2", "space": "prod" })).unwrap();
        assert_eq!(
            action,
            ToolAction::Configure(CredentialsUpdate {
                token: Some("t2".into()),
                project: None,
                space: Some("prod".into()),
            })
        );
        let action = plan(ToolKind::SetAdminToken, json!({ "token": "t3", "project": "ignored" })).unwrap();
        assert_eq!(
            action,
            ToolAction::Configure(CredentialsUpdate {
                token: Some("t3".into()),
                ..Default::default()
            })
        );
    }
}
