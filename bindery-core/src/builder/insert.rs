//! INSERT query builder

use super::values::{query_values, KeySpec, ValueMode};
use super::QueryBuilder;
use crate::error::{Error, Result};
use crate::ident::quote;
use crate::query::BoundQuery;
use crate::value::ValueMap;

/// INSERT query builder
///
/// By default every key of the value map participates; narrow the set
/// with [`include`](Insert::include) or [`excluding`](Insert::excluding).
#[derive(Debug, Clone)]
pub struct Insert {
    table: String,
    values: ValueMap,
    keys: KeySpec,
}

impl Insert {
    /// Create a new INSERT query builder for the given table
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            values: ValueMap::new(),
            keys: KeySpec::All,
        }
    }

    /// Set the column values to insert
    ///
    /// # Examples
    /// ```
    /// use bindery_core::{insert, values, QueryBuilder};
    ///
    /// let query = insert("users")
    ///     .values(values! { "name" => "John", "age" => 30 })
    ///     .to_query()
    ///     .unwrap();
    /// assert_eq!(
    ///     query.text,
    ///     "INSERT INTO `users` (`name`, `age`) VALUES (:name,:age)"
    /// );
    /// ```
    pub fn values(mut self, values: ValueMap) -> Self {
        self.values = values;
        self
    }

    /// Whitelist the keys that participate, in the given order
    pub fn include<S: AsRef<str>>(mut self, keys: &[S]) -> Self {
        self.keys = KeySpec::Include(keys.iter().map(|k| k.as_ref().to_string()).collect());
        self
    }

    /// Let every key participate except the named ones
    pub fn excluding<S: AsRef<str>>(mut self, keys: &[S]) -> Self {
        self.keys = KeySpec::Exclude(keys.iter().map(|k| k.as_ref().to_string()).collect());
        self
    }
}

impl QueryBuilder for Insert {
    fn to_query(&self) -> Result<BoundQuery> {
        let include = self.keys.resolve(&self.values);
        let parts = query_values(ValueMode::Insert, &self.values, &include);
        if parts.fields.is_empty() {
            return Err(Error::invalid_query(
                "INSERT requires at least one participating column",
            ));
        }

        let text = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote(&self.table),
            parts.fields.join(", "),
            parts.placeholders.join(","),
        );

        Ok(BoundQuery::new(text, parts.values))
    }
}
