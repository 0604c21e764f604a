//! HTTP collaborator: a thin `axum` router exposing generate, decode, and
//! health endpoints over the sequence engine. Per the generator's
//! concurrency model, handlers never hold the engine's internal mutex
//! across an `.await` point — `generate` is synchronous and returns
//! before any response is built.

mod handlers;
mod types;

pub use handlers::AppState;
pub use types::{GenerateRequest, GiftClassWire, HealthResponse, IdResponse};

use axum::routing::{get, post};
use axum::Router;

/// Assemble the full router over a shared [`AppState`].
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/gift-id/generate", post(handlers::generate))
        .route("/api/v1/gift-id/{id}/decode", get(handlers::decode))
        .route("/health", get(handlers::health))
        .with_state(state)
}
