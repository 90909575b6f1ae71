//! SELECT query builder

use super::where_clause::{compose_where, where_bind_values, Where};
use super::QueryBuilder;
use crate::error::Result;
use crate::ident::{quote, quote_prefixed};
use crate::query::BoundQuery;
use crate::value::ValueMap;

/// SELECT query builder
#[derive(Debug, Clone)]
pub struct Select {
    table: String,
    fields: Vec<String>,
    where_spec: Where,
}

impl Select {
    /// Create a new SELECT query builder for the given table,
    /// selecting all columns by default
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            fields: vec!["*".to_string()],
            where_spec: Where::default(),
        }
    }

    /// Set the selected fields
    ///
    /// # Examples
    /// ```
    /// use bindery_core::{select, QueryBuilder};
    ///
    /// // a comma-separated string and a list are equivalent
    /// let query = select("users").fields("id, name").to_query().unwrap();
    /// assert_eq!(query.text, "SELECT `id`,`name` FROM `users`");
    /// ```
    pub fn fields<F: IntoFields>(mut self, fields: F) -> Self {
        self.fields = fields.into_fields();
        self
    }

    /// Replace the field list with `count(*)`
    pub fn count(mut self) -> Self {
        self.fields = vec!["count(*)".to_string()];
        self
    }

    /// Set the WHERE specification
    pub fn where_(mut self, spec: impl Into<Where>) -> Self {
        self.where_spec = spec.into();
        self
    }
}

impl QueryBuilder for Select {
    fn to_query(&self) -> Result<BoundQuery> {
        let clause = compose_where(&self.where_spec, &ValueMap::new());
        let mut text = format!(
            "SELECT {} FROM {}",
            format_fields(&self.fields),
            quote(&self.table),
        );
        if !clause.is_empty() {
            text.push_str(" WHERE ");
            text.push_str(&clause);
        }

        let values = match &self.where_spec {
            Where::Map(map) => where_bind_values(map, &ValueMap::new()),
            Where::Raw(_) => ValueMap::new(),
        };

        Ok(BoundQuery::new(text, values))
    }
}

/// Trim each field and quote its column segment, leaving any field that
/// contains `*` (`*`, `t.*`, `count(*)`) untouched. Joined with commas,
/// no spaces.
fn format_fields(fields: &[String]) -> String {
    let formatted: Vec<String> = fields
        .iter()
        .map(|field| {
            let field = field.trim();
            if field.contains('*') {
                field.to_string()
            } else {
                quote_prefixed(field)
            }
        })
        .collect();
    formatted.join(",")
}

/// Trait for types that can be used as a SELECT field list
pub trait IntoFields {
    fn into_fields(self) -> Vec<String>;
}

/// A string field list is split on commas
impl IntoFields for &str {
    fn into_fields(self) -> Vec<String> {
        self.split(',').map(|s| s.to_string()).collect()
    }
}

impl IntoFields for String {
    fn into_fields(self) -> Vec<String> {
        self.as_str().into_fields()
    }
}

impl IntoFields for Vec<&str> {
    fn into_fields(self) -> Vec<String> {
        self.into_iter().map(|s| s.to_string()).collect()
    }
}

impl IntoFields for Vec<String> {
    fn into_fields(self) -> Vec<String> {
        self
    }
}

impl IntoFields for &[&str] {
    fn into_fields(self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use crate::{select, values};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_basic_select() {
        let query = select("users").to_query().unwrap();
        assert_eq!(query.text, "SELECT * FROM `users`");
        assert!(query.values.is_empty());
    }

    #[test]
    fn test_select_with_map_where() {
        let query = select("test")
            .fields(vec!["id", "string"])
            .where_(values! { "id" => 1 })
            .to_query()
            .unwrap();
        assert_eq!(
            query.text,
            "SELECT `id`,`string` FROM `test` WHERE `id` = :id"
        );
        assert_eq!(query.values, values! { "id" => 1 });
    }

    #[test]
    fn test_select_fields_from_comma_string() {
        let query = select("users").fields("id, name , email").to_query().unwrap();
        assert_eq!(query.text, "SELECT `id`,`name`,`email` FROM `users`");
    }

    #[test]
    fn test_select_star_passes_through() {
        let query = select("users").fields("*").to_query().unwrap();
        assert_eq!(query.text, "SELECT * FROM `users`");
    }

    #[test]
    fn test_select_count_star_passes_through() {
        let query = select("users")
            .count()
            .where_(values! { "status" => "active" })
            .to_query()
            .unwrap();
        assert_eq!(
            query.text,
            "SELECT count(*) FROM `users` WHERE `status` = :status"
        );
    }

    #[test]
    fn test_select_dotted_field_keeps_prefix_unquoted() {
        let query = select("users").fields("users.id, users.name").to_query().unwrap();
        assert_eq!(query.text, "SELECT users.`id`,users.`name` FROM `users`");
    }

    #[test]
    fn test_select_prefixed_star_passes_through() {
        let query = select("users").fields("u.*").to_query().unwrap();
        assert_eq!(query.text, "SELECT u.* FROM `users`");
    }

    #[test]
    fn test_select_with_raw_where() {
        let query = select("users")
            .where_("age >= 18 and age < 65")
            .to_query()
            .unwrap();
        assert_eq!(
            query.text,
            "SELECT * FROM `users` WHERE age >= 18 and age < 65"
        );
        assert!(query.values.is_empty());
    }

    #[test]
    fn test_select_empty_where_omits_clause() {
        let query = select("users").where_(ValueMap::new()).to_query().unwrap();
        assert_eq!(query.text, "SELECT * FROM `users`");
    }

    #[test]
    fn test_select_where_false_coerced_to_null() {
        let query = select("users")
            .where_(values! { "archived" => false })
            .to_query()
            .unwrap();
        assert_eq!(
            query.text,
            "SELECT * FROM `users` WHERE `archived` = :archived"
        );
        assert_eq!(query.values.get("archived"), Some(&Value::Null));
    }

    #[test]
    fn test_select_dotted_where_key() {
        let query = select("users")
            .where_(values! { "users.id" => 3 })
            .to_query()
            .unwrap();
        assert_eq!(query.text, "SELECT * FROM `users` WHERE users.`id` = :id");
        assert_eq!(query.values.get("id"), Some(&Value::I32(3)));
    }

    #[test]
    fn test_select_is_idempotent() {
        let builder = select("users")
            .fields("id, name")
            .where_(values! { "id" => 1 });
        let first = builder.clone().to_query().unwrap();
        let second = builder.to_query().unwrap();
        assert_eq!(first, second);
    }
}
