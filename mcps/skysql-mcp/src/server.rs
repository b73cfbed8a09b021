//! MCP Server implementation for SkySQL database management
//!
//! Tools delegate to the handlers module and render their outcome as one text
//! item. Prompts are static templates served from [`crate::prompts`].

use std::sync::Arc;

use mcp_common::{render_outcome, CallToolResult, McpError};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        GetPromptRequestParam, GetPromptResult, ListPromptsResult, PaginatedRequestParam,
        ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    tool, tool_handler, tool_router, RoleServer, ServerHandler,
};

use crate::config::Config;
use crate::db::MySqlConnector;
use crate::handlers::{self, ToolContext};
use crate::params::*;
use crate::{prompts, render};

/// The SkySQL MCP Server
#[derive(Clone)]
pub struct SkySqlMcpServer {
    ctx: Arc<ToolContext>,
    tool_router: ToolRouter<Self>,
}

// ============================================================================
// Tool Router - Each tool delegates to its handler
// ============================================================================

#[tool_router]
impl SkySqlMcpServer {
    /// Create a server from the standard config locations, talking to
    /// databases through the MariaDB driver
    pub fn new() -> Self {
        let config = Config::load();
        Self::with_context(ToolContext::new(config.api, Arc::new(MySqlConnector)))
    }

    /// Create a server around an explicit context
    pub fn with_context(ctx: ToolContext) -> Self {
        Self {
            ctx: Arc::new(ctx),
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "List all available SkySQL DB agents with their capabilities")]
    async fn list_agents(&self) -> Result<CallToolResult, McpError> {
        let outcome = handlers::list_agents(&self.ctx).await;
        Ok(render_outcome(outcome, |agents| render::agents(agents)))
    }

    #[tool(description = "Launch a new Serverless DB instance in SkySQL")]
    async fn launch_serverless_db(
        &self,
        Parameters(params): Parameters<LaunchDbParams>,
    ) -> Result<CallToolResult, McpError> {
        let outcome = handlers::launch_serverless_db(
            &self.ctx,
            &params.name,
            &params.region,
            &params.provider,
        )
        .await;
        Ok(render_outcome(outcome, render::launched))
    }

    #[tool(description = "Delete a DB instance from SkySQL. Deletion is immediate and unconfirmed")]
    async fn delete_db(
        &self,
        Parameters(params): Parameters<ServiceIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let outcome = handlers::delete_db(&self.ctx, &params.service_id).await;
        Ok(render_outcome(outcome, render::deleted))
    }

    #[tool(description = "Ask a question to a specific DB agent")]
    async fn ask_agent(
        &self,
        Parameters(params): Parameters<AskAgentParams>,
    ) -> Result<CallToolResult, McpError> {
        let outcome = handlers::ask_agent(&self.ctx, &params.agent_id, &params.question).await;
        Ok(render_outcome(outcome, render::chat_reply))
    }

    #[tool(description = "Get the credentials for a SkySQL database instance")]
    async fn get_db_credentials(
        &self,
        Parameters(params): Parameters<ServiceIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let outcome = handlers::resolve_credentials(&self.ctx, &params.service_id).await;
        Ok(render_outcome(outcome, render::credentials))
    }

    #[tool(
        description = "Update the IP allowlist for a SkySQL database instance with the current IP"
    )]
    async fn update_ip_allowlist(
        &self,
        Parameters(params): Parameters<ServiceIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let outcome = handlers::update_ip_allowlist(&self.ctx, &params.service_id).await;
        Ok(render_outcome(outcome, render::allowlist_entry))
    }

    #[tool(description = "List all available SkySQL database services")]
    async fn list_services(&self) -> Result<CallToolResult, McpError> {
        let outcome = handlers::list_services(&self.ctx).await;
        Ok(render_outcome(outcome, |services| render::services(services)))
    }

    #[tool(
        description = "Execute SQL on a SkySQL database service and return the results. \
                       The SQL runs as written with the service's default credentials and \
                       every statement autocommits. LOAD DATA LOCAL INFILE is not supported"
    )]
    async fn execute_sql(
        &self,
        Parameters(params): Parameters<ExecuteSqlParams>,
    ) -> Result<CallToolResult, McpError> {
        let outcome = handlers::execute_sql(&self.ctx, &params.service_id, &params.sql_query).await;
        Ok(render_outcome(outcome, render::sql_outcome))
    }
}

// ============================================================================
// Server Handler Implementation
// ============================================================================

#[tool_handler]
impl ServerHandler for SkySqlMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "SkySQL database management: list and query DB agents, launch and delete \
                 serverless databases, fetch credentials, allowlist IPs and run SQL. \
                 delete_db is irreversible; confirm with the user before calling it. \
                 update_ip_allowlist adds this server process's egress IP, which may \
                 differ from the user's. Requires SKYSQL_API_KEY in the environment."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_prompts()
                .build(),
            ..Default::default()
        }
    }

    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        Ok(prompts::list_prompts())
    }

    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        prompts::get_prompt(&request.name).ok_or_else(|| {
            McpError::invalid_params(format!("Unknown prompt: {}", request.name), None)
        })
    }
}

impl Default for SkySqlMcpServer {
    fn default() -> Self {
        Self::new()
    }
}
