//! Data Transfer Objects for API responses.
//!
//! User payloads live with their use cases in [`crate::users`]; this module
//! holds the transport-only shapes:
//! - `error` - Common error response DTO
//! - `health` - Health check response

mod error;
mod health;

pub use error::ErrorResponse;
pub use health::{HealthResponse, HealthStatus};
