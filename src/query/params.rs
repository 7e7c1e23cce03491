use serde::Deserialize;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Descending iff the raw parameter is exactly "desc"; every other
    /// value (including "DESC" or garbage) sorts ascending.
    pub fn from_param(raw: Option<&str>) -> Self {
        if raw == Some("desc") {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }

    pub fn to_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Raw list query parameters as they arrive on the request. Numeric fields
/// are kept as strings so that malformed values fall back to defaults
/// instead of failing extraction.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub query: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "roleId")]
    pub role_id: Option<String>,
}

impl ListParams {
    /// Normalize raw parameters into a QuerySpec. `default_sort` is the
    /// resource-specific sort field name used when none is requested.
    pub fn to_spec(&self, default_sort: &str) -> QuerySpec {
        QuerySpec {
            page: parse_positive(self.page.as_deref(), DEFAULT_PAGE),
            limit: parse_positive(self.limit.as_deref(), DEFAULT_LIMIT),
            search: self.query.clone().unwrap_or_default(),
            sort: self
                .sort
                .clone()
                .unwrap_or_else(|| default_sort.to_string()),
            dir: SortDirection::from_param(self.dir.as_deref()),
        }
    }

    /// Exact-match filter value: None when the parameter is absent, empty,
    /// or the sentinel "all".
    pub fn exact(value: &Option<String>) -> Option<&str> {
        match value.as_deref() {
            None | Some("") | Some("all") => None,
            Some(v) => Some(v),
        }
    }
}

/// Normalized, per-request query spec. Built fresh from untrusted input
/// and discarded once the response is shaped.
#[derive(Debug, Clone)]
pub struct QuerySpec {
    pub page: i64,
    pub limit: i64,
    pub search: String,
    pub sort: String,
    pub dir: SortDirection,
}

impl QuerySpec {
    /// Saturating so that absurd page/limit values clamp to i64::MAX
    /// instead of overflowing into a negative OFFSET.
    pub fn offset(&self) -> i64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

fn parse_positive(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|v| v.parse::<i64>().ok())
        .filter(|n| *n >= 1)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> ListParams {
        let mut p = ListParams::default();
        for (k, v) in pairs {
            let v = Some(v.to_string());
            match *k {
                "page" => p.page = v,
                "limit" => p.limit = v,
                "query" => p.query = v,
                "sort" => p.sort = v,
                "dir" => p.dir = v,
                "status" => p.status = v,
                "roleId" => p.role_id = v,
                other => panic!("unknown param {}", other),
            }
        }
        p
    }

    #[test]
    fn defaults_when_missing() {
        let spec = params(&[]).to_spec("name");
        assert_eq!(spec.page, 1);
        assert_eq!(spec.limit, 10);
        assert_eq!(spec.search, "");
        assert_eq!(spec.sort, "name");
        assert_eq!(spec.dir, SortDirection::Asc);
    }

    #[test]
    fn defaults_on_invalid_numbers() {
        let spec = params(&[("page", "abc"), ("limit", "0")]).to_spec("name");
        assert_eq!(spec.page, 1);
        assert_eq!(spec.limit, 10);

        let spec = params(&[("page", "-3"), ("limit", "2.5")]).to_spec("name");
        assert_eq!(spec.page, 1);
        assert_eq!(spec.limit, 10);
    }

    #[test]
    fn offset_skips_prior_pages() {
        let spec = params(&[("page", "2"), ("limit", "5")]).to_spec("name");
        assert_eq!(spec.offset(), 5);

        let spec = params(&[("page", "7"), ("limit", "25")]).to_spec("name");
        assert_eq!(spec.offset(), 150);
    }

    #[test]
    fn offset_saturates_on_huge_pages() {
        let spec = params(&[("page", &i64::MAX.to_string()), ("limit", "10")]).to_spec("name");
        assert_eq!(spec.offset(), i64::MAX);

        let spec = params(&[("page", &i64::MAX.to_string()), ("limit", &i64::MAX.to_string())])
            .to_spec("name");
        assert_eq!(spec.offset(), i64::MAX);
    }

    #[test]
    fn no_upper_bound_on_limit() {
        let spec = params(&[("limit", "100000")]).to_spec("name");
        assert_eq!(spec.limit, 100000);
    }

    #[test]
    fn descending_only_on_exact_desc() {
        assert_eq!(SortDirection::from_param(Some("desc")), SortDirection::Desc);
        assert_eq!(SortDirection::from_param(Some("DESC")), SortDirection::Asc);
        assert_eq!(SortDirection::from_param(Some("down")), SortDirection::Asc);
        assert_eq!(SortDirection::from_param(Some("")), SortDirection::Asc);
        assert_eq!(SortDirection::from_param(None), SortDirection::Asc);
    }

    #[test]
    fn exact_filter_skips_sentinel() {
        assert_eq!(ListParams::exact(&None), None);
        assert_eq!(ListParams::exact(&Some("".to_string())), None);
        assert_eq!(ListParams::exact(&Some("all".to_string())), None);
        assert_eq!(
            ListParams::exact(&Some("ACTIVE".to_string())),
            Some("ACTIVE")
        );
    }
}
