use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::db::Db;

/// GET /health - trivial query against the store
pub async fn health(State(db): State<Db>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match db.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "database": "connected",
                "timestamp": now,
            })),
        ),
        Err(e) => {
            tracing::error!("health check failed: {}", e);

            let mut body = json!({
                "status": "unhealthy",
                "database": "disconnected",
                "timestamp": now,
            });
            if !crate::config::config().is_production() {
                body["error"] = json!(e.to_string());
            }

            (StatusCode::INTERNAL_SERVER_ERROR, Json(body))
        }
    }
}
