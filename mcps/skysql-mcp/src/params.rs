//! Parameter types for SkySQL MCP tools

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

fn default_region() -> String {
    "eastus".to_string()
}

fn default_provider() -> String {
    "azure".to_string()
}

/// Parameters for launching a serverless database
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct LaunchDbParams {
    #[schemars(description = "Name for the new database (sent lowercased)")]
    pub name: String,

    #[serde(default = "default_region")]
    #[schemars(description = "Cloud region (default: eastus)")]
    pub region: String,

    #[serde(default = "default_provider")]
    #[schemars(description = "Cloud provider: azure, aws or gcp (default: azure)")]
    pub provider: String,
}

/// Parameters for tools that act on one service
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ServiceIdParams {
    #[schemars(description = "SkySQL service ID (see list_services)")]
    pub service_id: String,
}

/// Parameters for asking a DB agent
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AskAgentParams {
    #[schemars(description = "Agent ID (see list_agents)")]
    pub agent_id: String,

    #[schemars(description = "Question for the agent")]
    pub question: String,
}

/// Parameters for executing SQL on a service
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ExecuteSqlParams {
    #[schemars(description = "SkySQL service ID to connect to")]
    pub service_id: String,

    #[schemars(
        description = "SQL to execute verbatim. Multiple statements may be separated by semicolons; every statement commits immediately"
    )]
    pub sql_query: String,
}
