//! SkySQL REST API wrapper
//!
//! Client factory, wire types and error types for the provisioning and
//! copilot endpoints.

pub mod client;
pub mod error;
pub mod types;

pub use client::SkySqlClient;
pub use error::{ApiError, ApiResult};
pub use types::*;
