use axum::{extract::State, http::HeaderMap, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::audit::{self, AuditEntry};
use crate::context::{client_ip, current_actor};
use crate::db::models::SystemSetting;
use crate::db::Db;
use crate::error::ApiError;

#[derive(Debug, Deserialize, Validate)]
pub struct SocialSettingsInput {
    #[validate(length(max = 255))]
    pub facebook: Option<String>,
    #[validate(length(max = 255))]
    pub twitter: Option<String>,
    #[validate(length(max = 255))]
    pub instagram: Option<String>,
    #[validate(length(max = 255))]
    pub linkedin: Option<String>,
    #[validate(length(max = 255))]
    pub youtube: Option<String>,
}

/// POST /api/system/settings/social - update the social links on the
/// settings singleton row
pub async fn update_social(
    State(db): State<Db>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<Value>, ApiError> {
    let pool = db.pool();

    let actor = current_actor(pool)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Unauthorized action."))?;
    let client_ip = client_ip(&headers);

    let settings: Option<SystemSetting> = sqlx::query_as(
        "SELECT id, name, support_email, language, timezone, currency, \
                facebook, twitter, instagram, linkedin, youtube, created_at, updated_at \
         FROM system_settings LIMIT 1",
    )
    .fetch_optional(pool)
    .await?;
    let settings = settings.ok_or_else(|| ApiError::not_found("Settings not found."))?;

    let input: SocialSettingsInput = serde_json::from_str(&body)
        .map_err(|_| ApiError::validation("Invalid input. Please check your data and try again."))?;
    input
        .validate()
        .map_err(|_| ApiError::validation("Invalid input. Please check your data and try again."))?;

    sqlx::query(
        "UPDATE system_settings \
         SET facebook = $1, twitter = $2, instagram = $3, linkedin = $4, youtube = $5, \
             updated_at = NOW() \
         WHERE id = $6",
    )
    .bind(&input.facebook)
    .bind(&input.twitter)
    .bind(&input.instagram)
    .bind(&input.linkedin)
    .bind(&input.youtube)
    .bind(settings.id)
    .execute(pool)
    .await?;

    audit::system_log(
        pool,
        AuditEntry {
            event: "update",
            user_id: actor.id,
            entity_id: actor.id,
            entity_type: "system.settings",
            description: "System settings updated.",
            ip_address: &client_ip,
        },
    )
    .await?;

    Ok(Json(json!({ "message": "Social settings updated successfully" })))
}
