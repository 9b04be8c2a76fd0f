//! Select statement builder and composable query filters.
//!
//! Every query built here starts with the global soft-delete filter, so no
//! caller can forget to exclude tombstoned rows.

use rusqlite::types::Value;

/// Adds predicates to a select over entities of type `T`.
pub trait Filter<T> {
    fn apply(&self, query: &mut SelectQuery);
}

/// Incrementally built `SELECT` with positional bindings.
#[derive(Debug, Clone)]
pub struct SelectQuery {
    select: String,
    conditions: Vec<String>,
    bindings: Vec<Value>,
    order_by: Option<String>,
    limit: Option<i64>,
}

impl SelectQuery {
    /// Starts a query over `select` (a `SELECT ... FROM ...` prefix) that only
    /// sees live rows.
    pub fn live(select: impl Into<String>) -> Self {
        Self {
            select: select.into(),
            conditions: vec!["deleted_at IS NULL".to_string()],
            bindings: Vec::new(),
            order_by: None,
            limit: None,
        }
    }

    /// Appends `condition` joined with `AND`; `?` placeholders bind in order.
    pub fn and_where(
        &mut self,
        condition: impl Into<String>,
        bindings: impl IntoIterator<Item = Value>,
    ) -> &mut Self {
        self.conditions.push(condition.into());
        self.bindings.extend(bindings);
        self
    }

    /// Matches rows whose `column` contains `needle` literally.
    ///
    /// Blank needles add nothing.
    pub fn and_contains(&mut self, column: &str, needle: &str) -> &mut Self {
        if needle.trim().is_empty() {
            return self;
        }
        let pattern = format!("%{}%", escape_like(needle));
        self.and_where(
            format!("{column} LIKE ? ESCAPE '\\'"),
            [Value::Text(pattern)],
        )
    }

    pub fn order_by(&mut self, order_by: impl Into<String>) -> &mut Self {
        self.order_by = Some(order_by.into());
        self
    }

    pub fn limit(&mut self, limit: i64) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    pub fn sql(&self) -> String {
        let mut sql = format!("{} WHERE {}", self.select, self.conditions.join(" AND "));
        if let Some(order_by) = &self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order_by);
        }
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        sql
    }

    pub fn bindings(&self) -> &[Value] {
        &self.bindings
    }
}

/// Escapes `LIKE` wildcards so user input matches literally with `ESCAPE '\'`.
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::{escape_like, SelectQuery};
    use rusqlite::types::Value;

    #[test]
    fn live_query_always_filters_tombstones() {
        let query = SelectQuery::live("SELECT id FROM health_plans");
        assert_eq!(
            query.sql(),
            "SELECT id FROM health_plans WHERE deleted_at IS NULL"
        );
        assert!(query.bindings().is_empty());
    }

    #[test]
    fn builder_composes_conditions_order_and_limit() {
        let mut query = SelectQuery::live("SELECT id FROM health_plans");
        query
            .and_where("id > ?", [Value::Text("abc".to_string())])
            .and_contains("name", "Ouro")
            .and_contains("ans_registration_code", "   ")
            .order_by("id ASC")
            .limit(11);

        assert_eq!(
            query.sql(),
            "SELECT id FROM health_plans WHERE deleted_at IS NULL AND id > ? AND name LIKE ? ESCAPE '\\' ORDER BY id ASC LIMIT 11"
        );
        assert_eq!(
            query.bindings(),
            &[
                Value::Text("abc".to_string()),
                Value::Text("%Ouro%".to_string())
            ]
        );
    }

    #[test]
    fn escape_like_neutralizes_wildcards() {
        assert_eq!(escape_like(r"50%_off\"), r"50\%\_off\\");
        assert_eq!(escape_like("plain"), "plain");
    }
}
