//! HTTP server.
//!
//! This module provides:
//! - Configuration types and loading (`config`)
//! - Bearer token authentication (`auth`)
//! - JSON error responses (`error`)
//! - The axum router and handlers (`routes`)

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;

pub use auth::{StaticTokenVerifier, TokenVerifier};
pub use error::{ApiError, ErrorCode};
pub use routes::{AppState, router};
