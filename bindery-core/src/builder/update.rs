//! UPDATE query builder

use super::values::{query_values, KeySpec, ValueMode};
use super::where_clause::{compose_where, where_bind_values, Where};
use super::QueryBuilder;
use crate::error::{Error, Result};
use crate::ident::quote;
use crate::query::BoundQuery;
use crate::value::ValueMap;

/// UPDATE query builder
///
/// SET assignments come from the value map through the value selector;
/// the WHERE clause comes from a [`Where`] spec. When a column appears
/// on both sides its WHERE bind is renamed with the collision marker so
/// the two values never clash.
#[derive(Debug, Clone)]
pub struct Update {
    table: String,
    set: ValueMap,
    keys: KeySpec,
    where_spec: Where,
    only_one: bool,
}

impl Update {
    /// Create a new UPDATE query builder for the given table
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            set: ValueMap::new(),
            keys: KeySpec::All,
            where_spec: Where::default(),
            only_one: false,
        }
    }

    /// Set the column values to assign
    pub fn set(mut self, values: ValueMap) -> Self {
        self.set = values;
        self
    }

    /// Whitelist the keys that participate in the SET clause
    pub fn include<S: AsRef<str>>(mut self, keys: &[S]) -> Self {
        self.keys = KeySpec::Include(keys.iter().map(|k| k.as_ref().to_string()).collect());
        self
    }

    /// Let every key participate in the SET clause except the named ones
    pub fn excluding<S: AsRef<str>>(mut self, keys: &[S]) -> Self {
        self.keys = KeySpec::Exclude(keys.iter().map(|k| k.as_ref().to_string()).collect());
        self
    }

    /// Set the WHERE specification
    pub fn where_(mut self, spec: impl Into<Where>) -> Self {
        self.where_spec = spec.into();
        self
    }

    /// Restrict the update to a single row (`LIMIT 1`)
    pub fn one(mut self) -> Self {
        self.only_one = true;
        self
    }
}

impl QueryBuilder for Update {
    fn to_query(&self) -> Result<BoundQuery> {
        let include = self.keys.resolve(&self.set);
        let parts = query_values(ValueMode::Update, &self.set, &include);
        if parts.fields.is_empty() {
            return Err(Error::invalid_query(
                "UPDATE requires at least one SET assignment",
            ));
        }

        let clause = compose_where(&self.where_spec, &parts.values);
        let mut text = format!(
            "UPDATE {} SET {} WHERE {}",
            quote(&self.table),
            parts.fields.join(", "),
            clause,
        );
        if clause.is_empty() {
            return Err(Error::missing_where(text));
        }

        let mut values = parts.values;
        if let Where::Map(map) = &self.where_spec {
            // collision renaming keys off the SET binds, so snapshot them
            let set_binds = values.clone();
            for (name, val) in where_bind_values(map, &set_binds) {
                values.insert(name, val);
            }
        }

        if self.only_one {
            text.push_str(" LIMIT 1");
        }

        Ok(BoundQuery::new(text, values))
    }
}
