//! MCP binding: exposes the dispatcher as `tools/list` and `tools/call`.

use rmcp::model::{
    CallToolRequestParams, CallToolResult, Content, Implementation, ListToolsResult,
    PaginatedRequestParams, ServerCapabilities, ServerInfo, Tool, ToolAnnotations,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler, ServiceExt};
use serde_json::json;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::info;

use crate::capability::Capability;
use crate::dispatch::{DispatchError, Dispatcher, InvocationRequest, InvocationResult};
use crate::error::LauncherError;

const INSTRUCTIONS: &str = "Lists installed applications, launches an application by name, \
and opens files or folders with a named application.";

#[derive(Clone)]
pub struct LauncherServer {
    dispatcher: Dispatcher,
}

impl LauncherServer {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Capabilities rendered as MCP tool descriptions, in registry order.
    pub fn tools(&self) -> Vec<Tool> {
        self.dispatcher.capabilities().iter().map(to_tool).collect()
    }

    /// Serve one MCP session over a read/write pair until the client disconnects.
    pub async fn run<R, W>(self, transport: (R, W)) -> Result<(), LauncherError>
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let running = self
            .serve(transport)
            .await
            .map_err(|e| LauncherError::Transport(e.to_string()))?;

        info!("MCP session started, waiting for client");
        let quit = running
            .waiting()
            .await
            .map_err(|e| LauncherError::Transport(e.to_string()))?;
        info!(reason = ?quit, "MCP session ended");

        Ok(())
    }
}

fn to_tool(capability: &Capability) -> Tool {
    let mut tool = Tool::new(
        capability.name,
        capability.description,
        capability.input_schema(),
    );
    tool.annotations = Some(
        ToolAnnotations::new()
            .read_only(capability.effects.read_only)
            .destructive(false)
            .idempotent(capability.effects.idempotent)
            .open_world(capability.effects.externally_visible),
    );
    tool
}

impl ServerHandler for LauncherServer {
    fn get_info(&self) -> ServerInfo {
        let mut implementation = Implementation::default();
        implementation.name = env!("CARGO_PKG_NAME").to_owned();
        implementation.version = env!("CARGO_PKG_VERSION").to_owned();

        let mut info = ServerInfo::default();
        info.capabilities = ServerCapabilities::builder().enable_tools().build();
        info.server_info = implementation;
        info.instructions = Some(INSTRUCTIONS.to_owned());
        info
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let invocation = InvocationRequest::new(
            request.name.to_string(),
            request.arguments.unwrap_or_default(),
        );

        match self.dispatcher.invoke(invocation).await {
            Ok(InvocationResult::Success(text)) => {
                Ok(CallToolResult::success(vec![Content::text(text)]))
            }
            Ok(InvocationResult::Failure(text)) => {
                Ok(CallToolResult::error(vec![Content::text(text)]))
            }
            Err(e) => Err(to_protocol_error(&e)),
        }
    }
}

fn to_protocol_error(error: &DispatchError) -> McpError {
    match error {
        DispatchError::UnknownCapability(_) => McpError::invalid_params(error.to_string(), None),
        DispatchError::InvalidArguments { source, .. } => {
            let fields: Vec<&str> = source.fields().collect();
            McpError::invalid_params(error.to_string(), Some(json!({ "fields": fields })))
        }
        DispatchError::Internal(_) => McpError::internal_error(error.to_string(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::validate::{FieldError, FieldProblem, ValidationError};
    use crate::config::Config;
    use crate::launcher::SystemLauncher;
    use rmcp::model::ErrorCode;
    use std::sync::Arc;

    fn server() -> LauncherServer {
        let config = Config::default();
        let launcher = Arc::new(SystemLauncher::new(&config));
        LauncherServer::new(Dispatcher::new(launcher, config.listing_failure))
    }

    #[test]
    fn tools_follow_registry_order() {
        let names: Vec<String> = server().tools().iter().map(|t| t.name.to_string()).collect();
        assert_eq!(names, ["list_applications", "launch_app", "open_with_app"]);
    }

    #[test]
    fn listing_tool_is_annotated_read_only() {
        let tools = server().tools();
        let annotations = tools[0].annotations.as_ref().unwrap();
        assert_eq!(annotations.read_only_hint, Some(true));
        assert_eq!(annotations.idempotent_hint, Some(true));
        assert_eq!(annotations.open_world_hint, Some(false));
    }

    #[test]
    fn launch_tools_are_annotated_mutating() {
        for tool in &server().tools()[1..] {
            let annotations = tool.annotations.as_ref().unwrap();
            assert_eq!(annotations.read_only_hint, Some(false));
            assert_eq!(annotations.idempotent_hint, Some(false));
            assert_eq!(annotations.open_world_hint, Some(true));
            assert_eq!(annotations.destructive_hint, Some(false));
        }
    }

    #[test]
    fn tool_schema_requires_declared_fields() {
        let tools = server().tools();
        assert_eq!(
            tools[2].input_schema.get("required"),
            Some(&serde_json::json!(["appName", "filePath"]))
        );
    }

    #[test]
    fn server_info_advertises_tools() {
        let info = server().get_info();
        assert!(info.capabilities.tools.is_some());
        assert_eq!(info.server_info.name, "app-launcher");
    }

    #[test]
    fn request_errors_are_invalid_params() {
        let err = to_protocol_error(&DispatchError::UnknownCapability("nope".to_owned()));
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        assert!(err.message.contains("nope"));

        let err = to_protocol_error(&DispatchError::InvalidArguments {
            capability: "open_with_app",
            source: ValidationError {
                errors: vec![
                    FieldError { field: "appName", problem: FieldProblem::NotAString },
                    FieldError { field: "filePath", problem: FieldProblem::Missing },
                ],
            },
        });
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        assert_eq!(err.data, Some(json!({"fields": ["appName", "filePath"]})));

        let err = to_protocol_error(&DispatchError::Internal("boom".to_owned()));
        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
    }
}
