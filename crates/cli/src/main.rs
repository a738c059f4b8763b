use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use coho_mcp::config::{DEFAULT_CLI_PROGRAM, DEFAULT_NPM_PROGRAM};
use coho_mcp::{CohoMcpCore, CredentialStore, Dispatcher, McpHttpServer, ProcessRunner, ServerSettings, resolve_bind_address};
use rmcp::ServiceExt;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// MCP server exposing Codehooks.io project tools backed by the `coho` CLI.
///
/// Credentials are read from CODEHOOKS_PROJECT_NAME, CODEHOOKS_SPACE and
/// CODEHOOKS_ADMIN_TOKEN, or set at runtime with the `configure` tool.
#[derive(Debug, Parser)]
#[command(name = "coho-mcp", version, about)]
struct Cli {
    /// Codehooks CLI executable.
    #[arg(long, env = "COHO_BIN", default_value = DEFAULT_CLI_PROGRAM)]
    coho_bin: String,

    /// Package manager used to install dependencies before a deploy.
    #[arg(long, env = "COHO_MCP_NPM_BIN", default_value = DEFAULT_NPM_PROGRAM)]
    npm_bin: String,

    /// Directory for per-call staging files. Defaults to the OS temp directory.
    #[arg(long, env = "COHO_MCP_SCRATCH_DIR")]
    scratch_dir: Option<PathBuf>,

    /// Timeout in seconds for each external command.
    #[arg(long, env = "COHO_MCP_TIMEOUT_SECS", default_value_t = 120)]
    timeout_secs: u64,

    /// Serve streamable HTTP on this loopback address instead of stdio.
    #[arg(long, value_name = "ADDR")]
    http: Option<String>,
}

impl Cli {
    fn settings(&self) -> ServerSettings {
        let mut settings = ServerSettings::default()
            .with_cli_program(&self.coho_bin)
            .with_npm_program(&self.npm_bin)
            .with_timeout(Duration::from_secs(self.timeout_secs));
        if let Some(scratch_dir) = &self.scratch_dir {
            settings = settings.with_scratch_dir(scratch_dir);
        }
        settings
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let settings = cli.settings();
    info!(
        cli = %settings.cli_program,
        scratch_dir = %settings.scratch_dir.display(),
        timeout_secs = settings.timeout.as_secs(),
        "starting coho-mcp"
    );

    let credentials = CredentialStore::from_env();
    let core = CohoMcpCore::new(Dispatcher::new(&settings, credentials, Arc::new(ProcessRunner)));

    match cli.http.as_deref() {
        Some(address) => serve_http(core, address).await,
        None => serve_stdio(core).await,
    }
}

/// Logs go to stderr; stdout carries the MCP stream.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}

async fn serve_stdio(core: CohoMcpCore) -> Result<()> {
    let service = core
        .serve(rmcp::transport::stdio())
        .await
        .context("failed to start MCP stdio transport")?;
    service.waiting().await.context("MCP stdio session ended with an error")?;
    Ok(())
}

async fn serve_http(core: CohoMcpCore, address: &str) -> Result<()> {
    let bind_address = resolve_bind_address(Some(address))?;
    let running = McpHttpServer::new(bind_address, core).start().await?;
    info!(address = %running.bound_address(), "press Ctrl-C to stop");
    tokio::signal::ctrl_c().await.context("failed to listen for Ctrl-C")?;
    running.stop().await
}
