//! Shared types for the shop backend
//!
//! Common types used by the server and any API client: data models,
//! error codes, response structures, and utility functions.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
