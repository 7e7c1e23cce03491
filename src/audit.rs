use chrono::Utc;
use uuid::Uuid;

/// One audit record: who did what to which entity, from where
#[derive(Debug)]
pub struct AuditEntry<'a> {
    pub event: &'a str,
    pub user_id: Uuid,
    pub entity_id: Uuid,
    pub entity_type: &'a str,
    pub description: &'a str,
    pub ip_address: &'a str,
}

/// Persist an audit record. Accepts any Postgres executor so a caller can
/// scope the write to an in-flight transaction (`&mut *tx`) or run it
/// directly against the pool.
pub async fn system_log(
    executor: impl sqlx::PgExecutor<'_>,
    entry: AuditEntry<'_>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO system_logs \
         (id, event, user_id, entity_id, entity_type, description, ip_address, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(Uuid::new_v4())
    .bind(entry.event)
    .bind(entry.user_id)
    .bind(entry.entity_id)
    .bind(entry.entity_type)
    .bind(entry.description)
    .bind(entry.ip_address)
    .bind(Utc::now())
    .execute(executor)
    .await?;

    Ok(())
}
