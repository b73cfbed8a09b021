//! Agent handler implementations

use tracing::{error, info, warn};

use super::{ToolContext, ToolError};
use crate::skysql::{Agent, ApiError, ApiResult, ChatReply, ChatRequest, SkySqlClient};

const LIST_AGENTS: &str = "list agents";
const ASK_AGENT: &str = "get response from agent";

/// Fetch the agent listing and replace the directory with it
async fn refresh_agents(ctx: &ToolContext, client: &SkySqlClient) -> ApiResult<Vec<Agent>> {
    let agents = client.list_agents().await?;
    ctx.agents.replace(&agents);
    Ok(agents)
}

/// List all agents, refreshing the directory on success
pub async fn list_agents(ctx: &ToolContext) -> Result<Vec<Agent>, ToolError> {
    let client = ctx.client().map_err(|e| ToolError::api(LIST_AGENTS, e))?;
    refresh_agents(ctx, &client)
        .await
        .map_err(|e| ToolError::api(LIST_AGENTS, e))
}

/// Ask an agent a question
///
/// An id missing from the directory triggers exactly one refresh before the
/// agent is reported as not found.
pub async fn ask_agent(
    ctx: &ToolContext,
    agent_id: &str,
    question: &str,
) -> Result<ChatReply, ToolError> {
    let client = ctx.client().map_err(|e| ToolError::api(ASK_AGENT, e))?;

    let agent = match ctx.agents.get(agent_id) {
        Some(agent) => agent,
        None => {
            info!(agent_id, "agent not in directory, refreshing");
            if let Err(e) = refresh_agents(ctx, &client).await {
                warn!("agent directory refresh failed: {}", e);
            }
            ctx.agents.get(agent_id).ok_or_else(|| {
                ToolError::NotFound(format!(
                    "Agent {} not found. Please check the agent ID and try again.",
                    agent_id
                ))
            })?
        }
    };

    let request = ChatRequest::for_agent(&agent, question);

    match client.chat(&request).await {
        Ok(response) => Ok(response.response),
        Err(ApiError::Timeout) => {
            error!(
                timeout_secs = ctx.api.timeout_secs,
                "chat request timed out"
            );
            Err(ToolError::Timeout)
        }
        Err(e) => Err(ToolError::api(ASK_AGENT, e)),
    }
}
