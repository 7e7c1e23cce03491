use serde_json::Value;
use sqlx::{postgres::PgArguments, postgres::PgRow, FromRow, PgPool, Row};

use super::filter::FilterExpr;
use super::params::QuerySpec;

/// One page of a filtered listing. `total` counts every row matching the
/// filter, ignoring pagination; `empty_overall` is true only when the
/// unfiltered base table holds zero rows.
#[derive(Debug)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub empty_overall: bool,
}

/// Resource descriptor for one list endpoint: where to count, where to
/// fetch from (joins included), what to select, and how to filter/order.
pub struct ListQuery<'a> {
    /// Unfiltered count target, no joins
    pub base_table: &'a str,
    /// FROM clause for counting and fetching, joins included
    pub from: &'a str,
    /// Select list for the fetch query
    pub select: &'a str,
    pub filter: FilterExpr,
    /// Resolved ORDER BY expression (allow-listed, never raw input)
    pub order_by: String,
}

/// Execute the list-query contract: filtered count, empty-table detection
/// when nothing matches, and a single page fetch otherwise.
pub async fn fetch_page<T>(
    pool: &PgPool,
    spec: &QuerySpec,
    query: ListQuery<'_>,
) -> Result<PageResult<T>, sqlx::Error>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let sql = count_sql(&query);
    let mut count_query = sqlx::query(&sql);
    for param in query.filter.params() {
        count_query = bind_value(count_query, param);
    }
    let total: i64 = count_query.fetch_one(pool).await?.try_get("count")?;

    if total == 0 {
        // Distinguish "nothing matches the filter" from "the table itself
        // is empty" with a second, unfiltered count. Skips the fetch.
        let overall: i64 = sqlx::query_scalar(&unfiltered_count_sql(&query))
            .fetch_one(pool)
            .await?;
        return Ok(zero_hit_page(overall));
    }

    let sql = fetch_sql(&query, spec);
    let mut fetch_query = sqlx::query_as::<_, T>(&sql);
    for param in query.filter.params() {
        fetch_query = bind_value_as(fetch_query, param);
    }
    let items = fetch_query.fetch_all(pool).await?;

    Ok(PageResult {
        items,
        total,
        empty_overall: false,
    })
}

/// Terminal page for a zero-hit filtered count: no rows are fetched, and
/// the empty flag is set only when the unfiltered base table is empty too.
fn zero_hit_page<T>(overall_total: i64) -> PageResult<T> {
    PageResult {
        items: Vec::new(),
        total: 0,
        empty_overall: overall_total == 0,
    }
}

fn count_sql(query: &ListQuery<'_>) -> String {
    format!(
        "SELECT COUNT(*) AS count FROM {} WHERE {}",
        query.from,
        query.filter.clause()
    )
}

fn unfiltered_count_sql(query: &ListQuery<'_>) -> String {
    format!("SELECT COUNT(*) FROM {}", query.base_table)
}

fn fetch_sql(query: &ListQuery<'_>, spec: &QuerySpec) -> String {
    format!(
        "SELECT {} FROM {} WHERE {} ORDER BY {} LIMIT {} OFFSET {}",
        query.select,
        query.from,
        query.filter.clause(),
        query.order_by,
        spec.limit,
        spec.offset()
    )
}

fn bind_value<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s),
        other => q.bind(other.clone()), // JSONB
    }
}

fn bind_value_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    v: &'q Value,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s),
        other => q.bind(other.clone()),
    }
}
