//! SkySQL MCP Server Library
//!
//! Exposes SkySQL cloud database management to MCP clients: DB agents,
//! serverless service lifecycle, credentials, IP allowlisting and direct SQL
//! execution.
//!
//! The API key is read from `SKYSQL_API_KEY` (configurable) on every call, so
//! the server starts without one and reports the problem per tool.

pub mod agents;
pub mod config;
pub mod db;
pub mod handlers;
pub mod params;
pub mod prompts;
pub mod render;
pub mod server;
pub mod skysql;

pub use config::Config;
pub use handlers::{ToolContext, ToolError};
pub use server::SkySqlMcpServer;
