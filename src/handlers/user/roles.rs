use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use sqlx::FromRow;
use uuid::Uuid;

use crate::db::Db;
use crate::error::ApiError;
use crate::query::{fetch_page, FilterBuilder, ListParams, ListQuery, SortMap};

const SORT: SortMap = SortMap::new(
    &[
        ("name", "r.name"),
        ("createdAt", "r.created_at"),
        ("userCount", "user_count"),
    ],
    "r.name",
);

const SEARCH_COLUMNS: &[&str] = &["r.name", "r.description"];

#[derive(Debug, FromRow)]
struct RoleRow {
    id: Uuid,
    slug: String,
    name: String,
    description: Option<String>,
    is_protected: bool,
    is_default: bool,
    created_at: DateTime<Utc>,
    user_count: i64,
}

impl RoleRow {
    fn into_api(self) -> Value {
        json!({
            "id": self.id,
            "slug": self.slug,
            "name": self.name,
            "description": self.description,
            "isProtected": self.is_protected,
            "isDefault": self.is_default,
            "createdAt": self.created_at,
            "userCount": self.user_count,
        })
    }
}

/// GET /api/user/roles - paginated role listing with member counts
pub async fn list(
    State(db): State<Db>,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>, ApiError> {
    let spec = params.to_spec("name");

    let filter = FilterBuilder::new()
        .search(SEARCH_COLUMNS, &spec.search)
        .build();

    let page = fetch_page::<RoleRow>(
        db.pool(),
        &spec,
        ListQuery {
            base_table: "user_roles",
            from: "user_roles r",
            select: "r.id, r.slug, r.name, r.description, r.is_protected, r.is_default, \
                     r.created_at, \
                     (SELECT COUNT(*) FROM users u WHERE u.role_id = r.id) AS user_count",
            filter,
            order_by: SORT.order_by(&spec),
        },
    )
    .await?;

    let data: Vec<Value> = page.items.into_iter().map(RoleRow::into_api).collect();

    Ok(Json(json!({
        "data": data,
        "meta": { "total": page.total, "page": spec.page, "limit": spec.limit },
        "empty": page.empty_overall,
    })))
}

#[derive(Debug, Serialize, FromRow)]
pub struct RoleOption {
    pub id: Uuid,
    pub name: String,
}

/// GET /api/user/roles/select - bare id/name list for select inputs,
/// ordered by name ascending
pub async fn select(State(db): State<Db>) -> Result<Json<Vec<RoleOption>>, ApiError> {
    let roles = sqlx::query_as::<_, RoleOption>(
        "SELECT id, name FROM user_roles ORDER BY name ASC",
    )
    .fetch_all(db.pool())
    .await?;

    Ok(Json(roles))
}
