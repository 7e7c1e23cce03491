use serde_json::Value;

/// Immutable filter expression: a WHERE clause with positional
/// placeholders and the parameter values they bind to, in order.
#[derive(Debug, Clone)]
pub struct FilterExpr {
    clause: String,
    params: Vec<Value>,
}

impl FilterExpr {
    pub fn clause(&self) -> &str {
        &self.clause
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }
}

/// Builder for the combined list-endpoint predicate: zero or more named
/// equality filters AND-combined with an OR-group of case-insensitive
/// substring matches over the searchable columns.
///
/// Column names are supplied by resource descriptors at call sites (they
/// may be join-qualified expressions); request input only ever flows into
/// the bound parameters.
#[derive(Debug, Default)]
pub struct FilterBuilder {
    conjuncts: Vec<String>,
    params: Vec<Value>,
}

impl FilterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Equality predicate on a column
    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.params.push(value.into());
        self.conjuncts
            .push(format!("{} = ${}", column, self.params.len()));
        self
    }

    /// Equality predicate included only when a value is present
    pub fn eq_opt(self, column: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.eq(column, v),
            None => self,
        }
    }

    /// Case-insensitive substring match across the given columns,
    /// OR-joined. No-op when the search text is empty.
    pub fn search(mut self, columns: &[&str], text: &str) -> Self {
        if text.is_empty() || columns.is_empty() {
            return self;
        }

        let pattern = format!("%{}%", escape_like(text));
        let mut disjuncts = Vec::with_capacity(columns.len());
        for column in columns {
            self.params.push(Value::String(pattern.clone()));
            disjuncts.push(format!("{} ILIKE ${}", column, self.params.len()));
        }
        self.conjuncts.push(format!("({})", disjuncts.join(" OR ")));
        self
    }

    pub fn build(self) -> FilterExpr {
        let clause = if self.conjuncts.is_empty() {
            "TRUE".to_string()
        } else {
            self.conjuncts.join(" AND ")
        };
        FilterExpr {
            clause,
            params: self.params,
        }
    }
}

/// Escape ILIKE metacharacters so user search text matches literally
fn escape_like(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
