//! DELETE query builder

use super::where_clause::{compose_where, where_bind_values, Where};
use super::QueryBuilder;
use crate::error::{Error, Result};
use crate::ident::quote;
use crate::query::BoundQuery;
use crate::value::{Value, ValueMap};

/// DELETE query builder
///
/// A delete must carry a WHERE condition; building one with an empty or
/// absent WHERE fails with [`Error::MissingWhereClause`] before anything
/// reaches a connection.
#[derive(Debug, Clone)]
pub struct Delete {
    table: String,
    where_spec: Where,
    limit: Option<u64>,
}

impl Delete {
    /// Create a new DELETE query builder for the given table
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            where_spec: Where::default(),
            limit: None,
        }
    }

    /// Set the WHERE specification
    pub fn where_(mut self, spec: impl Into<Where>) -> Self {
        self.where_spec = spec.into();
        self
    }

    /// Cap the number of deleted rows. A limit of 0 means no limit.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Restrict the delete to a single row
    pub fn one(self) -> Self {
        self.limit(1)
    }
}

impl QueryBuilder for Delete {
    fn to_query(&self) -> Result<BoundQuery> {
        let clause = compose_where(&self.where_spec, &ValueMap::new());
        let mut text = format!("DELETE FROM {} WHERE {}", quote(&self.table), clause);
        if clause.is_empty() {
            return Err(Error::missing_where(text));
        }

        let mut values = match &self.where_spec {
            Where::Map(map) => where_bind_values(map, &ValueMap::new()),
            Where::Raw(_) => ValueMap::new(),
        };

        if let Some(limit) = self.limit.filter(|n| *n > 0) {
            match &self.where_spec {
                // the map form has a bind map to extend, the raw form does not
                Where::Map(_) => {
                    text.push_str(" LIMIT :_limit");
                    values.insert("_limit", Value::I64(limit as i64));
                }
                Where::Raw(_) => {
                    text.push_str(&format!(" LIMIT {limit}"));
                }
            }
        }

        Ok(BoundQuery::new(text, values))
    }
}
