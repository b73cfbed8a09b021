//! Result helpers for MCP tool responses
//!
//! Tools answer with one text item. Failures are still text, flagged with
//! `is_error` so clients can tell them apart without parsing.

use std::fmt::Display;

use rmcp::model::{CallToolResult, Content};

/// Create a successful plain text response
pub fn text_success(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

/// Create a failed plain text response
pub fn text_failure(text: impl Into<String>) -> CallToolResult {
    CallToolResult::error(vec![Content::text(text.into())])
}

/// Render a handler outcome as a single text response
///
/// `Ok` values go through `render`; errors use their `Display` text.
///
/// ```rust,ignore
/// let outcome = handlers::list_services(&ctx).await;
/// Ok(render_outcome(outcome, |services| render::services(services)))
/// ```
pub fn render_outcome<T, E: Display>(
    outcome: Result<T, E>,
    render: impl FnOnce(&T) -> String,
) -> CallToolResult {
    match outcome {
        Ok(value) => text_success(render(&value)),
        Err(e) => {
            tracing::debug!(error = %e, "tool invocation failed");
            text_failure(e.to_string())
        }
    }
}
