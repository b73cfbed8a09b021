//! Wire types for the SkySQL REST API
//!
//! Response types are lenient: fields the API may omit default to empty
//! values so a single odd record never fails a whole listing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A SkySQL DB agent (copilot)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Agent kind, e.g. "dba"
    #[serde(rename = "type", default)]
    pub agent_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub datasource_id: Option<String>,
}

impl Agent {
    /// Datasource to forward with chat requests; only DBA agents carry one
    pub fn chat_datasource(&self) -> Option<&str> {
        if self.agent_type == "dba" {
            self.datasource_id.as_deref()
        } else {
            None
        }
    }
}

/// A provisioned database service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub service_type: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub fqdn: Option<String>,
    /// Creation time; the API has used both strings and epoch numbers here
    #[serde(default)]
    pub created_on: Option<Value>,
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

impl Service {
    /// First port of the first endpoint, if any level is present
    pub fn first_port(&self) -> Option<u16> {
        self.endpoints
            .first()
            .and_then(|endpoint| endpoint.ports.first())
            .and_then(|port| port.port)
    }

    /// Creation time as display text
    pub fn created_display(&self) -> Option<String> {
        match self.created_on.as_ref()? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// A network endpoint of a service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Endpoint {
    #[serde(default)]
    pub ports: Vec<EndpointPort>,
}

/// A single listening port of an endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EndpointPort {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
}

/// Body of the credentials sub-resource
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CredentialsPayload {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Provisioning request for a serverless database
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaunchRequest {
    pub topology: String,
    pub provider: String,
    pub region: String,
    pub name: String,
}

impl LaunchRequest {
    pub const SERVERLESS_TOPOLOGY: &'static str = "serverless-standalone";

    /// Build a serverless launch request; the API requires lowercase names
    pub fn serverless(name: &str, region: &str, provider: &str) -> Self {
        Self {
            topology: Self::SERVERLESS_TOPOLOGY.to_string(),
            provider: provider.to_string(),
            region: region.to_string(),
            name: name.to_lowercase(),
        }
    }
}

/// Response to a provisioning request
#[derive(Debug, Clone, Deserialize)]
pub struct LaunchedService {
    pub id: String,
}

/// Chat request sent to an agent
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub prompt: String,
    pub agent_id: String,
    pub config: serde_json::Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datasource_id: Option<String>,
}

impl ChatRequest {
    /// Build a chat request for a resolved agent
    pub fn for_agent(agent: &Agent, question: &str) -> Self {
        Self {
            prompt: question.to_string(),
            agent_id: agent.id.clone(),
            config: serde_json::Map::new(),
            datasource_id: agent.chat_datasource().map(str::to_string),
        }
    }
}

/// Envelope returned by the chat endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub response: ChatReply,
}

/// The three independent parts of an agent reply
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub sql_text: Option<String>,
    #[serde(default)]
    pub error_text: Option<String>,
}

/// Allowlist entry submitted for a service
#[derive(Debug, Clone, Serialize)]
pub struct AllowlistRequest {
    pub ip_address: String,
}

impl AllowlistRequest {
    /// Single-host CIDR for an address
    pub fn single_host(ip: &str) -> Self {
        Self {
            ip_address: format!("{}/32", ip),
        }
    }
}
