//! Request orchestration: credential check, lookup, validation, planning,
//! staging, execution and output shaping.

use std::sync::Arc;

use coho_mcp_types::{Credentials, CredentialsUpdate, ExecOutput};
use coho_mcp_util::{MANIFEST_FILE_NAME, merge_manifest, shape_output};
use serde_json::{Map, Value, json};
use tracing::{error, info, warn};

use crate::config::ServerSettings;
use crate::credentials::CredentialStore;
use crate::executor::{CommandExecutor, CommandRunner, Invocation};
use crate::registry::{CommandPlan, StagingRequest, ToolAction, ToolDescriptor, ToolKind, ToolRegistry, validate_arguments};
use crate::staging::{StagedDirectory, StagingArea};
use crate::types::{DispatchError, ExecError, StagingError};

/// Arguments passed to the package manager before a deploy.
const NPM_INSTALL_ARGS: [&str; 3] = ["install", "--no-audit", "--no-fund"];

/// Successful tool result, already shaped and redacted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub text: String,
}

/// Entry point for every tool call.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
    credentials: CredentialStore,
    executor: CommandExecutor,
    staging: StagingArea,
    npm_program: String,
}

impl Dispatcher {
    pub fn new(settings: &ServerSettings, credentials: CredentialStore, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            registry: Arc::new(ToolRegistry::catalog()),
            executor: CommandExecutor::new(runner, credentials.clone(), settings),
            credentials,
            staging: StagingArea::new(&settings.scratch_dir),
            npm_program: settings.npm_program.clone(),
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Run one tool call to completion.
    pub async fn handle(&self, tool: &str, params: Option<&Map<String, Value>>) -> Result<ToolOutput, DispatchError> {
        let credentials = self.credentials.snapshot();
        if !ToolKind::is_configuration_name(tool) {
            let missing = credentials.missing_required();
            if !missing.is_empty() {
                warn!(tool, ?missing, "rejecting tool call without configuration");
                return Err(DispatchError::MissingConfiguration { missing });
            }
        }

        let Some(descriptor) = self.registry.lookup(tool) else {
            warn!(tool, "unknown tool requested");
            return Err(DispatchError::UnknownTool { name: tool.to_string() });
        };
        info!(tool = descriptor.name, "tool call");

        let action = validate_arguments(&descriptor.schema, params)
            .and_then(|args| descriptor.kind.plan(&args, &credentials))
            .map_err(|source| {
                warn!(tool = descriptor.name, error = %source, "invalid tool arguments");
                DispatchError::InvalidArguments {
                    tool: descriptor.name.to_string(),
                    source,
                }
            })?;

        match action {
            ToolAction::Configure(update) => Ok(self.configure(descriptor, update)),
            ToolAction::Command(plan) => self.run_command(descriptor, plan).await,
        }
    }

    fn configure(&self, descriptor: &ToolDescriptor, update: CredentialsUpdate) -> ToolOutput {
        let snapshot = self.credentials.configure(update);
        info!(
            tool = descriptor.name,
            project = ?snapshot.project,
            space = %snapshot.space,
            token_configured = snapshot.has_token(),
            "credentials updated"
        );
        ToolOutput {
            text: configuration_summary(&snapshot),
        }
    }

    async fn run_command(&self, descriptor: &ToolDescriptor, plan: CommandPlan) -> Result<ToolOutput, DispatchError> {
        let tool = descriptor.name;
        let output = match &plan.staging {
            StagingRequest::None => {
                let args = plan.resolve(None).map_err(|source| staging_failed(tool, source))?;
                self.execute(tool, Invocation::cli(args)).await?
            }
            StagingRequest::Text { content, suffix } => {
                let staged = self
                    .staging
                    .stage_text(&format!("coho-{tool}-"), suffix, content)
                    .await
                    .map_err(|source| staging_failed(tool, source))?;
                let args = plan.resolve(Some(staged.path())).map_err(|source| staging_failed(tool, source))?;
                self.execute(tool, Invocation::cli(args)).await?
            }
            StagingRequest::Files { files } => {
                let staged = self
                    .staging
                    .stage_files(&format!("coho-{tool}-"), files)
                    .await
                    .map_err(|source| staging_failed(tool, source))?;
                let args = plan.resolve(Some(staged.path())).map_err(|source| staging_failed(tool, source))?;
                self.execute(tool, Invocation::cli(args)).await?
            }
            StagingRequest::Deploy {
                files,
                manifest_overrides,
            } => {
                let staged = self
                    .staging
                    .stage_files("coho-deploy-", files)
                    .await
                    .map_err(|source| staging_failed(tool, source))?;
                if !staged.contains(MANIFEST_FILE_NAME) {
                    let manifest = serde_json::to_string_pretty(&merge_manifest(manifest_overrides.as_ref()))
                        .map_err(|err| staging_failed(tool, StagingError::Manifest { reason: err.to_string() }))?;
                    staged
                        .write_file(MANIFEST_FILE_NAME, &manifest)
                        .await
                        .map_err(|source| staging_failed(tool, source))?;
                }
                let args = plan.resolve(Some(staged.path())).map_err(|source| staging_failed(tool, source))?;
                self.deploy(tool, staged, args).await?
            }
        };

        let text = if output.stdout.trim().is_empty() {
            &output.stderr
        } else {
            &output.stdout
        };
        Ok(ToolOutput {
            text: shape_output(text, plan.format),
        })
    }

    /// Install dependencies, then deploy from the staged directory.
    ///
    /// The directory is removed on success and kept on disk when either step
    /// fails.
    async fn deploy(&self, tool: &str, staged: StagedDirectory, args: Vec<String>) -> Result<ExecOutput, DispatchError> {
        let install = Invocation::external(&self.npm_program, NPM_INSTALL_ARGS.map(String::from).to_vec()).in_dir(staged.path());
        if let Err(source) = self.executor.run(install).await {
            return Err(command_failed(tool, source, Some(staged)));
        }

        let deployed = self.executor.run(Invocation::cli(args).in_dir(staged.path())).await;
        deployed.map_err(|source| command_failed(tool, source, Some(staged)))
    }

    async fn execute(&self, tool: &str, invocation: Invocation) -> Result<ExecOutput, DispatchError> {
        self.executor
            .run(invocation)
            .await
            .map_err(|source| command_failed(tool, source, None))
    }
}

fn command_failed(tool: &str, source: ExecError, staged: Option<StagedDirectory>) -> DispatchError {
    let preserved = staged.map(StagedDirectory::preserve);
    match &preserved {
        Some(path) => error!(
            tool,
            error = %source.details(),
            preserved = %path.display(),
            "command failed, staging directory preserved"
        ),
        None => error!(tool, error = %source.details(), "command failed"),
    }
    DispatchError::CommandFailed {
        tool: tool.to_string(),
        source,
        preserved,
    }
}

fn staging_failed(tool: &str, source: StagingError) -> DispatchError {
    error!(tool, error = %source, "staging failed");
    DispatchError::StagingFailed {
        tool: tool.to_string(),
        source,
    }
}

fn configuration_summary(credentials: &Credentials) -> String {
    let summary = json!({
        "project": credentials.project,
        "space": credentials.space,
        "token_configured": credentials.has_token(),
    });
    serde_json::to_string_pretty(&summary).unwrap_or_else(|_| summary.to_string())
}
