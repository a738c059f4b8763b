use std::sync::Arc;

use coho_mcp_util::redact_secret;
use rmcp::model::{
    CallToolRequestParams, CallToolResult, Content, ErrorData, Implementation, ListToolsResult, PaginatedRequestParams,
    ProtocolVersion, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::{RoleServer, ServerHandler, service::RequestContext};
use serde_json::{Map, Value};
use tracing::debug;

use crate::dispatch::Dispatcher;
use crate::server::log_payload::sanitized_exchange;
use crate::types::DispatchError;

const SERVER_INSTRUCTIONS: &str = "Tools for a Codehooks.io project, backed by the `coho` command-line client.\n\
CONFIGURATION:\n\
- If a call fails with missing configuration, call `configure` with project, space and token.\n\
- `set_admin_token` replaces only the token.\n\
DATA:\n\
- `query_collection` returns at most 100 documents unless `limit` is set; use `count` for totals.\n\
- `export_data` returns every matching document as JSON lines or CSV.\n\
CODE:\n\
- `deploy_code` takes the full application as files; a package.json is generated when missing.\n\
- Use `query_logs` after a deploy to check for runtime errors.";

/// MCP handler exposing the tool catalog.
///
/// Cloned once per HTTP session; clones share the dispatcher and therefore
/// the credential store.
#[derive(Debug, Clone)]
pub struct CohoMcpCore {
    dispatcher: Arc<Dispatcher>,
}

impl CohoMcpCore {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// Catalog entries as advertised in `tools/list`.
    pub fn tools(&self) -> Vec<Tool> {
        self.dispatcher
            .registry()
            .list()
            .iter()
            .map(|descriptor| Tool::new(descriptor.name, descriptor.description, Arc::new(descriptor.input_schema())))
            .collect()
    }

    /// Execute one tool call and map the outcome onto the protocol.
    ///
    /// Configuration and lookup problems become protocol errors; every other
    /// failure is returned as an error-flagged result so the session survives.
    pub async fn call(&self, name: &str, arguments: Option<Map<String, Value>>) -> Result<CallToolResult, ErrorData> {
        let outcome = self.dispatcher.handle(name, arguments.as_ref()).await;
        let token = self.dispatcher.credentials().token();
        let secret = token.as_deref();

        let response = match outcome {
            Ok(output) => Ok(CallToolResult::success(vec![Content::text(redact_secret(&output.text, secret))])),
            Err(error) if error.is_transport_fault() => Err(transport_error(&error, secret)),
            Err(error) => Ok(CallToolResult::error(vec![Content::text(redact_secret(&error.details(), secret))])),
        };

        let response_value = match &response {
            Ok(result) => serde_json::to_value(result).ok(),
            Err(error) => serde_json::to_value(error).ok(),
        };
        let payload = sanitized_exchange(name, arguments.map(Value::Object), response_value, secret);
        debug!(tool = name, payload = %payload, "tool exchange");
        response
    }
}

fn transport_error(error: &DispatchError, secret: Option<&str>) -> ErrorData {
    let message = redact_secret(&error.to_string(), secret);
    match error {
        DispatchError::UnknownTool { .. } => ErrorData::invalid_params(message, None),
        _ => ErrorData::invalid_request(message, None),
    }
}

impl ServerHandler for CohoMcpCore {
    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, ErrorData>> + Send + '_ {
        std::future::ready(Ok(ListToolsResult::with_all_items(self.tools())))
    }

    fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, ErrorData>> + Send + '_ {
        async move { self.call(&request.name, request.arguments).await }
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            protocol_version: ProtocolVersion::LATEST,
            server_info: Implementation {
                name: "coho-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("Codehooks MCP".to_string()),
                ..Default::default()
            },
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
        }
    }
}
