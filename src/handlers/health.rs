use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::AppState;

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let store_status = match state.favorite_service.ping().await {
        Ok(()) => "healthy",
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            "unhealthy"
        }
    };

    let status = if store_status == "healthy" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if status == StatusCode::OK { "ok" } else { "error" },
            "database": store_status,
            "content_types": state
                .favorite_service
                .registry()
                .content_types()
                .map(|ct| ct.to_string())
                .collect::<Vec<_>>(),
            "service": "favorites-service",
        })),
    )
}
