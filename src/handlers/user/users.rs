use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::audit::{self, AuditEntry};
use crate::context::{client_ip, current_actor};
use crate::db::models::{User, UserRole, UserStatus};
use crate::db::{is_unique, Db};
use crate::error::ApiError;
use crate::query::{fetch_page, FilterBuilder, ListParams, ListQuery, SortMap};

const SORT: SortMap = SortMap::new(
    &[
        ("name", "u.name"),
        ("role_name", "r.name"),
        ("status", "u.status"),
        ("createdAt", "u.created_at"),
        ("lastSignInAt", "u.last_sign_in_at"),
    ],
    "u.created_at",
);

const SEARCH_COLUMNS: &[&str] = &["u.name", "u.email"];

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    is_trashed: bool,
    avatar: Option<String>,
    name: String,
    email: String,
    status: String,
    created_at: DateTime<Utc>,
    last_sign_in_at: Option<DateTime<Utc>>,
    role_id: Option<Uuid>,
    role_name: Option<String>,
}

impl UserRow {
    // Joined role columns nested back into a role sub-object
    fn into_api(self) -> Value {
        let role = self
            .role_id
            .map(|id| json!({ "id": id, "name": self.role_name }));
        json!({
            "id": self.id,
            "isTrashed": self.is_trashed,
            "avatar": self.avatar,
            "name": self.name,
            "email": self.email,
            "status": self.status,
            "createdAt": self.created_at,
            "lastSignInAt": self.last_sign_in_at,
            "role": role,
        })
    }
}

/// GET /api/user/users - paginated user listing with role details and
/// optional status/role filters
pub async fn list(
    State(db): State<Db>,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>, ApiError> {
    let spec = params.to_spec("name");

    // Status filter maps to a known status; invalid values fall back to
    // no filter rather than a guaranteed-empty match
    let status = ListParams::exact(&params.status)
        .and_then(UserStatus::parse)
        .map(|s| s.as_str());

    let filter = FilterBuilder::new()
        .eq_opt("u.status", status)
        .eq_opt("u.role_id::text", ListParams::exact(&params.role_id))
        .search(SEARCH_COLUMNS, &spec.search)
        .build();

    let page = fetch_page::<UserRow>(
        db.pool(),
        &spec,
        ListQuery {
            base_table: "users",
            from: "users u LEFT JOIN user_roles r ON r.id = u.role_id",
            select: "u.id, u.is_trashed, u.avatar, u.name, u.email, u.status, \
                     u.created_at, u.last_sign_in_at, r.id AS role_id, r.name AS role_name",
            filter,
            order_by: SORT.order_by(&spec),
        },
    )
    .await?;

    let data: Vec<Value> = page.items.into_iter().map(UserRow::into_api).collect();

    Ok(Json(json!({
        "data": data,
        "pagination": { "total": page.total, "page": spec.page, "limit": spec.limit },
        "empty": page.empty_overall,
    })))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserAddInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub role_id: Uuid,
}

/// POST /api/user/users - create a user; the insert and its audit entry
/// succeed or fail together
pub async fn create(
    State(db): State<Db>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<Value>, ApiError> {
    let pool = db.pool();

    let actor = current_actor(pool)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Unauthorized action."))?;
    let client_ip = client_ip(&headers);

    let input: UserAddInput =
        serde_json::from_str(&body).map_err(|_| ApiError::validation("Invalid input."))?;
    input
        .validate()
        .map_err(|_| ApiError::validation("Invalid input."))?;

    if !is_unique(pool, "users", &[("email", &input.email)]).await? {
        return Err(ApiError::conflict("Email is already registered."));
    }

    // Referenced role must still exist before any insert
    let role: Option<UserRole> = sqlx::query_as(
        "SELECT id, slug, name, description, is_protected, is_default, created_at \
         FROM user_roles WHERE id = $1",
    )
    .bind(input.role_id)
    .fetch_optional(pool)
    .await?;
    if role.is_none() {
        return Err(ApiError::not_found(
            "Selected role does not exist. Someone might have deleted it already.",
        ));
    }

    let mut tx = pool.begin().await?;

    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users \
         (id, name, email, status, role_id, is_protected, is_trashed, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, FALSE, FALSE, NOW(), NOW()) \
         RETURNING id, name, email, avatar, status, role_id, is_protected, is_trashed, \
                   last_sign_in_at, created_at, updated_at",
    )
    .bind(Uuid::new_v4())
    .bind(&input.name)
    .bind(&input.email)
    .bind(UserStatus::Active.as_str())
    .bind(input.role_id)
    .fetch_one(&mut *tx)
    .await?;

    audit::system_log(
        &mut *tx,
        AuditEntry {
            event: "create",
            user_id: actor.id,
            entity_id: user.id,
            entity_type: "user",
            description: "User added by user.",
            ip_address: &client_ip,
        },
    )
    .await?;

    tx.commit().await?;

    Ok(Json(json!({
        "message": "User successfully added.",
        "user": user,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_supports_related_role_name() {
        assert_eq!(SORT.resolve("role_name"), "r.name");
        assert_eq!(SORT.resolve("email"), "u.created_at");
    }

    #[test]
    fn input_rejects_bad_email() {
        let input = UserAddInput {
            name: "Jane".to_string(),
            email: "not-an-email".to_string(),
            role_id: Uuid::nil(),
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn row_nests_role_object() {
        let role_id = Uuid::new_v4();
        let row = UserRow {
            id: Uuid::new_v4(),
            is_trashed: false,
            avatar: None,
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            status: "ACTIVE".to_string(),
            created_at: Utc::now(),
            last_sign_in_at: None,
            role_id: Some(role_id),
            role_name: Some("Administrator".to_string()),
        };
        let api = row.into_api();
        assert_eq!(api["role"]["name"], "Administrator");
        assert!(api.get("roleName").is_none());
    }

    #[test]
    fn row_without_role_serializes_null_role() {
        let row = UserRow {
            id: Uuid::new_v4(),
            is_trashed: false,
            avatar: None,
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            status: "ACTIVE".to_string(),
            created_at: Utc::now(),
            last_sign_in_at: None,
            role_id: None,
            role_name: None,
        };
        assert!(row.into_api()["role"].is_null());
    }
}
