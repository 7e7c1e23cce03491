use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::audit::{self, AuditEntry};
use crate::context::{client_ip, current_actor};
use crate::db::models::EcommerceCategory;
use crate::db::{is_unique, Db};
use crate::error::ApiError;
use crate::query::{fetch_page, FilterBuilder, ListParams, ListQuery, SortMap};

const SORT: SortMap = SortMap::new(
    &[
        ("name", "c.name"),
        ("status", "c.status"),
        ("createdAt", "c.created_at"),
        ("productCount", "product_count"),
    ],
    "c.name",
);

const SEARCH_COLUMNS: &[&str] = &["c.name", "c.description"];

#[derive(Debug, FromRow)]
struct CategoryRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    status: String,
    product_count: i64,
}

impl CategoryRow {
    // Aggregate sub-field flattened to a top-level response field
    fn into_api(self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "description": self.description,
            "status": self.status,
            "productCount": self.product_count,
        })
    }
}

/// GET /api/ecommerce/categories - paginated category listing with
/// product counts
pub async fn list(
    State(db): State<Db>,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>, ApiError> {
    let spec = params.to_spec("name");

    let filter = FilterBuilder::new()
        .search(SEARCH_COLUMNS, &spec.search)
        .build();

    let page = fetch_page::<CategoryRow>(
        db.pool(),
        &spec,
        ListQuery {
            base_table: "ecommerce_categories",
            from: "ecommerce_categories c",
            select: "c.id, c.name, c.description, c.status, \
                     (SELECT COUNT(*) FROM ecommerce_products p \
                      WHERE p.category_id = c.id) AS product_count",
            filter,
            order_by: SORT.order_by(&spec),
        },
    )
    .await?;

    let data: Vec<Value> = page.items.into_iter().map(CategoryRow::into_api).collect();

    Ok(Json(json!({
        "data": data,
        "meta": { "total": page.total, "page": spec.page, "limit": spec.limit },
        "empty": page.empty_overall,
    })))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CategoryInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub slug: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

/// POST /api/ecommerce/categories - create a category
pub async fn create(
    State(db): State<Db>,
    headers: HeaderMap,
    // Raw body: parsing happens in-handler so malformed JSON gets the
    // same error envelope as every other failure
    body: String,
) -> Result<Json<EcommerceCategory>, ApiError> {
    let pool = db.pool();

    let actor = current_actor(pool)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Unauthorized action"))?;
    let client_ip = client_ip(&headers);

    let input: CategoryInput = serde_json::from_str(&body)
        .map_err(|_| ApiError::validation("Invalid input. Please check your data and try again."))?;
    input
        .validate()
        .map_err(|_| ApiError::validation("Invalid input. Please check your data and try again."))?;

    // Best-effort pre-check; the unique index has the final say
    if !is_unique(
        pool,
        "ecommerce_categories",
        &[("slug", &input.slug), ("name", &input.name)],
    )
    .await?
    {
        return Err(ApiError::conflict("Name and slug must be unique."));
    }

    let category = sqlx::query_as::<_, EcommerceCategory>(
        "INSERT INTO ecommerce_categories \
         (id, name, slug, description, status, created_by_id, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, 'ACTIVE', $5, NOW(), NOW()) \
         RETURNING id, name, slug, description, status, created_by_id, created_at, updated_at",
    )
    .bind(Uuid::new_v4())
    .bind(&input.name)
    .bind(&input.slug)
    .bind(&input.description)
    .bind(actor.id)
    .fetch_one(pool)
    .await?;

    audit::system_log(
        pool,
        AuditEntry {
            event: "create",
            user_id: actor.id,
            entity_id: category.id,
            entity_type: "category",
            description: "Category created by user",
            ip_address: &client_ip,
        },
    )
    .await?;

    Ok(Json(category))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_allow_list_with_aggregate_alias() {
        assert_eq!(SORT.resolve("productCount"), "product_count");
        assert_eq!(SORT.resolve("description"), "c.name");
    }

    #[test]
    fn input_rejects_empty_name() {
        let input = CategoryInput {
            name: String::new(),
            slug: "shoes".to_string(),
            description: None,
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn row_flattens_product_count() {
        let row = CategoryRow {
            id: Uuid::nil(),
            name: "Shoes".to_string(),
            description: None,
            status: "ACTIVE".to_string(),
            product_count: 7,
        };
        let api = row.into_api();
        assert_eq!(api["productCount"], 7);
        assert!(api.get("product_count").is_none());
    }
}
