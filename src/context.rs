use axum::http::HeaderMap;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Identity resolved for a mutating request
#[derive(Debug, Clone, FromRow)]
pub struct Actor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Resolve the current actor. Session handling is out of scope; as in the
/// original demo deployment, the seeded protected admin account stands in
/// for a real authenticated user. Returns None for unauthenticated calls
/// (no such account present).
pub async fn current_actor(pool: &PgPool) -> Result<Option<Actor>, sqlx::Error> {
    sqlx::query_as::<_, Actor>(
        "SELECT id, name, email FROM users \
         WHERE is_protected = TRUE ORDER BY created_at LIMIT 1",
    )
    .fetch_optional(pool)
    .await
}

/// Originating client address from proxy headers. First hop of
/// X-Forwarded-For wins, then X-Real-IP, then "unknown".
pub fn client_ip(headers: &HeaderMap) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
