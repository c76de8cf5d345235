//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: the account directory and the ledger operations on it
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request DTOs and parsing helpers
//! - `errors.rs`: consistent error responses
//! - `extract.rs`: extractors that report rejections as `errors.rs` responses

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, Extension, Router};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod extract;
pub mod routes;
pub mod services;

/// Maximum accepted request body size.
pub const BODY_LIMIT: usize = 16 * 1024;

/// Build the full HTTP router over fresh in-memory state (public entrypoint used by `main.rs`).
pub fn build_app() -> Router {
    build_app_with(Arc::new(services::AppServices::in_memory()))
}

/// Build the router over existing services.
pub fn build_app_with(services: Arc<services::AppServices>) -> Router {
    routes::router(services.clone())
        .layer(Extension(services))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::log_requests))
                .layer(DefaultBodyLimit::max(BODY_LIMIT)),
        )
}
