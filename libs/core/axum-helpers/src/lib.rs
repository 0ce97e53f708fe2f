//! # Axum Helpers
//!
//! A collection of utilities, middleware, and helpers for building Axum web applications.
//!
//! ## Modules
//!
//! - **[`server`]**: Server setup, graceful shutdown, OpenAPI documentation
//! - **[`errors`]**: Structured error responses
//! - **[`health`]**: Liveness endpoint handler
//! - **[`middleware`]**: HTTP middleware (security headers)

pub mod errors;
pub mod health;
pub mod middleware;
pub mod server;
pub mod shutdown;

// Re-export server types
pub use server::{create_app, create_production_app, create_router};

// Re-export shutdown types
pub use shutdown::{ShutdownCoordinator, shutdown_signal};

// Re-export error types
pub use errors::{AppError, ErrorResponse};

// Re-export health types
pub use health::{HealthResponse, health_handler};
