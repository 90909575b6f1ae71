//! Bindery Core - named-parameter SQL query construction
//!
//! This crate builds parameterized INSERT, UPDATE, DELETE and SELECT
//! statements from a table name, an ordered column/value map and a WHERE
//! specification. Each builder produces a [`BoundQuery`]: the SQL text
//! with `:name` placeholders plus the matching ordered bind-value map,
//! ready to hand to a prepare-bind-execute layer.

pub mod builder;
pub mod error;
pub mod executor;
mod ident;
pub mod operator;
pub mod query;
pub mod value;

// Re-export main types
pub use builder::{
    compose_where, compose_where_with_operators, exclude_keys, query_values, Delete, Insert,
    IntoFields, QueryBuilder, QueryValues, Select, Update, ValueMode, Where, KEY_COLLISION,
};
pub use error::{Error, Result};
pub use executor::{ConnectionPool, ExecutableModification, ExecutableQuery, Row};
pub use operator::{op, IntoOperator, Operator};
pub use query::BoundQuery;
pub use value::{Value, ValueMap};

/// Create a new INSERT query builder for the given table
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
pub fn insert(table: &str) -> Insert {
    Insert::new(table)
}

/// Create a new UPDATE query builder for the given table
///
/// # Examples
/// ```
/// use bindery_core::{update, values, QueryBuilder};
///
/// let query = update("users")
///     .set(values! { "name" => "Jane" })
///     .where_(values! { "id" => 1 })
///     .to_query()
///     .unwrap();
/// assert_eq!(
///     query.text,
///     "UPDATE `users` SET `name` = :name WHERE `id` = :id"
/// );
/// ```
pub fn update(table: &str) -> Update {
    Update::new(table)
}

/// Create a new DELETE query builder for the given table
///
/// # Examples
/// ```
/// use bindery_core::{delete, values, QueryBuilder};
///
/// let query = delete("users")
///     .where_(values! { "id" => 1 })
///     .one()
///     .to_query()
///     .unwrap();
/// assert_eq!(
///     query.text,
///     "DELETE FROM `users` WHERE `id` = :id LIMIT :_limit"
/// );
/// ```
pub fn delete(table: &str) -> Delete {
    Delete::new(table)
}

/// Create a new SELECT query builder for the given table
///
/// # Examples
/// ```
/// use bindery_core::{select, values, QueryBuilder};
///
/// let query = select("users")
///     .fields("id, name")
///     .where_(values! { "status" => "active" })
///     .to_query()
///     .unwrap();
/// assert_eq!(
///     query.text,
///     "SELECT `id`,`name` FROM `users` WHERE `status` = :status"
/// );
/// ```
pub fn select(table: &str) -> Select {
    Select::new(table)
}
