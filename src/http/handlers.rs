//! Request handlers for the gift-ID HTTP collaborator.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::clock::SystemClock;
use crate::codec::{self, GiftClass};
use crate::engine::GiftIdGenerator;

use super::types::{GenerateRequest, HealthResponse, IdResponse};

/// Shared application state: the single process-wide generator.
pub type AppState = Arc<GiftIdGenerator<SystemClock>>;

/// `POST /api/v1/gift-id/generate`
pub async fn generate(
    State(generator): State<AppState>,
    body: Option<Json<GenerateRequest>>,
) -> Response {
    let gift_class: GiftClass = body
        .and_then(|Json(req)| req.gift_class)
        .map(GiftClass::from)
        .unwrap_or(GiftClass::Toy);

    tracing::debug!(?gift_class, "generate request");

    match generator.generate(gift_class) {
        Ok(id) => {
            let decoded = codec::decode(id).expect("freshly generated id always decodes");
            Json(IdResponse::new(id, decoded)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

/// `GET /api/v1/gift-id/{id}/decode`
pub async fn decode(Path(id_str): Path<String>) -> Response {
    let id: u64 = match id_str.parse() {
        Ok(id) => id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "id is not a valid u64", "code": 400 })),
            )
                .into_response()
        }
    };

    match codec::decode(id) {
        Ok(decoded) => Json(IdResponse::new(id, decoded)).into_response(),
        Err(err) => err.into_response(),
    }
}

/// `GET /health`
pub async fn health(State(generator): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        workshop_id: generator.workshop_id(),
    })
}
