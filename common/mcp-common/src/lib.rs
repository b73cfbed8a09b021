//! MCP Common - Shared utilities for MCP servers
//!
//! - **Initialization**: `serve_stdio!` macro for standardized server startup
//! - **Results**: text responses, with failures flagged as errors
//!
//! # Example
//!
//! ```rust,ignore
//! use mcp_common::{serve_stdio, render_outcome};
//!
//! serve_stdio!(MyServer, "my_mcp");
//!
//! async fn my_tool(&self) -> Result<CallToolResult, McpError> {
//!     Ok(render_outcome(handlers::do_work(&self.ctx).await, render::work))
//! }
//! ```

pub mod init;
pub mod result;

pub use init::init_tracing;
pub use result::{render_outcome, text_failure, text_success};

// Re-export rmcp types that are commonly needed
pub use rmcp::{
    model::{CallToolResult, Content},
    ErrorData as McpError,
};
