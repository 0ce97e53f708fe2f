//! Readiness probe backed by a MongoDB ping
//!
//! `/health` reports liveness only; this endpoint answers 503 when the
//! database is unreachable so load balancers stop routing traffic.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_helpers::AppError;
use database::mongodb::{Client, check_health_detailed};
use serde::Serialize;

#[derive(Serialize)]
struct ReadyResponse {
    status: &'static str,
    response_time_ms: u64,
}

pub fn ready_router(client: Client) -> Router {
    Router::new()
        .route("/ready", get(ready_handler))
        .with_state(client)
}

async fn ready_handler(State(client): State<Client>) -> impl IntoResponse {
    let status = check_health_detailed(&client).await;
    if status.healthy {
        (
            StatusCode::OK,
            Json(ReadyResponse {
                status: "ready",
                response_time_ms: status.response_time_ms,
            }),
        )
            .into_response()
    } else {
        tracing::warn!(error = ?status.message, "Readiness check failed");
        AppError::ServiceUnavailable("MongoDB is unreachable".to_string()).into_response()
    }
}
