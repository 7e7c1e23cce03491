use sqlx::{PgPool, Row};

/// Best-effort uniqueness pre-check: returns true when no existing row
/// matches any of the given field/value pairs.
///
/// Table and column names come from call sites only, never from request
/// input; they are still quoted to keep identifiers inert. This check is
/// not atomic with a subsequent insert - the store's unique index remains
/// the authoritative guard, and a 23505 violation is surfaced as a
/// conflict by the error classifier.
pub async fn is_unique(
    pool: &PgPool,
    table: &str,
    fields: &[(&str, &str)],
) -> Result<bool, sqlx::Error> {
    if fields.is_empty() {
        return Ok(true);
    }

    let predicates: Vec<String> = fields
        .iter()
        .enumerate()
        .map(|(i, (column, _))| format!("{} = ${}", quote_identifier(column), i + 1))
        .collect();

    let sql = format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE {}) AS taken",
        quote_identifier(table),
        predicates.join(" OR ")
    );

    let mut query = sqlx::query(&sql);
    for (_, value) in fields {
        query = query.bind(*value);
    }

    let row = query.fetch_one(pool).await?;
    let taken: bool = row.try_get("taken")?;
    Ok(!taken)
}

/// Quote SQL identifier to prevent injection
fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_identifiers() {
        assert_eq!(quote_identifier("users"), "\"users\"");
        assert_eq!(quote_identifier("a\"b"), "\"a\"\"b\"");
    }
}
