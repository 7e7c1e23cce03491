use super::params::QuerySpec;

/// Fixed allow-list mapping request sort field names to the underlying
/// SQL sort expressions (join aliases allowed, e.g. a user's role name).
/// Unrecognized names fall back to the resource default expression.
pub struct SortMap {
    entries: &'static [(&'static str, &'static str)],
    default_expr: &'static str,
}

impl SortMap {
    pub const fn new(
        entries: &'static [(&'static str, &'static str)],
        default_expr: &'static str,
    ) -> Self {
        Self {
            entries,
            default_expr,
        }
    }

    pub fn resolve(&self, requested: &str) -> &'static str {
        self.entries
            .iter()
            .find(|(name, _)| *name == requested)
            .map(|(_, expr)| *expr)
            .unwrap_or(self.default_expr)
    }

    /// Full ORDER BY expression for a query spec
    pub fn order_by(&self, spec: &QuerySpec) -> String {
        format!("{} {}", self.resolve(&spec.sort), spec.dir.to_sql())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::params::SortDirection;

    const USERS: SortMap = SortMap::new(
        &[
            ("name", "u.name"),
            ("role_name", "r.name"),
            ("createdAt", "u.created_at"),
        ],
        "u.created_at",
    );

    #[test]
    fn resolves_allowed_fields() {
        assert_eq!(USERS.resolve("name"), "u.name");
        assert_eq!(USERS.resolve("createdAt"), "u.created_at");
    }

    #[test]
    fn related_entity_fields_resolve_to_join_alias() {
        assert_eq!(USERS.resolve("role_name"), "r.name");
    }

    #[test]
    fn unknown_fields_fall_back_to_default() {
        assert_eq!(USERS.resolve("password"), "u.created_at");
        assert_eq!(USERS.resolve(""), "u.created_at");
        assert_eq!(USERS.resolve("name; DROP TABLE users"), "u.created_at");
    }

    #[test]
    fn order_by_includes_direction() {
        let spec = QuerySpec {
            page: 1,
            limit: 10,
            search: String::new(),
            sort: "role_name".to_string(),
            dir: SortDirection::Desc,
        };
        assert_eq!(USERS.order_by(&spec), "r.name DESC");
    }
}
