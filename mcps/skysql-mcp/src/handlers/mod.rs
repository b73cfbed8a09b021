//! Handler implementations for SkySQL MCP tools
//!
//! Organized by domain: agent, service, sql. Handlers return typed outcomes
//! or a [`ToolError`]; turning either into text happens in [`crate::render`].

mod agent;
mod service;
mod sql;

pub use agent::*;
pub use service::*;
pub use sql::*;

use std::sync::Arc;

use thiserror::Error;

use crate::agents::AgentDirectory;
use crate::config::ApiConfig;
use crate::db::{SqlConnector, SqlFailure};
use crate::skysql::{ApiError, ApiResult, SkySqlClient};

/// Shared state handed to every tool invocation
pub struct ToolContext {
    pub api: ApiConfig,
    pub agents: AgentDirectory,
    pub connector: Arc<dyn SqlConnector>,
}

impl ToolContext {
    pub fn new(api: ApiConfig, connector: Arc<dyn SqlConnector>) -> Self {
        Self {
            api,
            agents: AgentDirectory::new(),
            connector,
        }
    }

    /// Build a fresh API client for one invocation
    pub fn client(&self) -> ApiResult<SkySqlClient> {
        SkySqlClient::from_config(&self.api)
    }
}

/// Every way a tool invocation can fail, as shown to the caller
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// API key missing or unusable
    #[error("{0}")]
    Config(String),

    /// Transport failure or non-2xx answer from the API
    #[error("Failed to {action}: {message}")]
    Http {
        action: &'static str,
        message: String,
    },

    /// The agent chat call exceeded the timeout
    #[error(
        "Request timed out. The API is taking longer than expected to respond. \
         You may want to try again or check if the API is experiencing delays."
    )]
    Timeout,

    /// A service or agent id is absent from the remote listing
    #[error("{0}")]
    NotFound(String),

    /// Connection details are incomplete
    #[error("Missing connection details for service {service_id}: {}", .missing.join(", "))]
    MissingData {
        service_id: String,
        missing: Vec<&'static str>,
    },

    /// The database connection could not be opened
    #[error("Failed to connect to database ({}): {message}", error_code(.code))]
    Connection { code: Option<u16>, message: String },

    /// The database rejected or failed the SQL
    #[error("Query execution failed ({}): {message}", error_code(.code))]
    Query { code: Option<u16>, message: String },
}

fn error_code(code: &Option<u16>) -> String {
    match code {
        Some(code) => format!("error {}", code),
        None => "no error code".to_string(),
    }
}

impl ToolError {
    /// Map an API error for a tool whose failures read "Failed to {action}"
    pub fn api(action: &'static str, err: ApiError) -> Self {
        if err.is_config() {
            return ToolError::Config(err.to_string());
        }
        ToolError::Http {
            action,
            message: err.to_string(),
        }
    }
}

impl From<SqlFailure> for ToolError {
    fn from(failure: SqlFailure) -> Self {
        match failure {
            SqlFailure::Connect(e) => ToolError::Connection {
                code: e.code,
                message: e.message,
            },
            SqlFailure::Query(e) => ToolError::Query {
                code: e.code,
                message: e.message,
            },
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbError;

    #[test]
    fn test_api_error_mapping() {
        let config = ToolError::api("list agents", ApiError::MissingApiKey("SKYSQL_API_KEY".into()));
        assert_eq!(config, ToolError::Config("SKYSQL_API_KEY not configured".to_string()));

        let timeout = ToolError::api("list services", ApiError::Timeout);
        assert_eq!(timeout.to_string(), "Failed to list services: request timed out");
    }

    #[test]
    fn test_sql_failure_messages_carry_codes() {
        let connect: ToolError = SqlFailure::Connect(DbError::new(Some(2003), "can't connect")).into();
        assert_eq!(
            connect.to_string(),
            "Failed to connect to database (error 2003): can't connect"
        );

        let query: ToolError = SqlFailure::Query(DbError::new(None, "stream closed")).into();
        assert_eq!(
            query.to_string(),
            "Query execution failed (no error code): stream closed"
        );
    }

    #[test]
    fn test_missing_data_lists_fields() {
        let err = ToolError::MissingData {
            service_id: "svc".to_string(),
            missing: vec!["host", "port"],
        };
        assert_eq!(err.to_string(), "Missing connection details for service svc: host, port");
    }
}
