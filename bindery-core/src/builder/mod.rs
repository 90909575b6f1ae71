//! Query builder module

pub mod delete;
pub mod insert;
pub mod select;
pub mod update;
pub mod values;
pub mod where_clause;

// Re-export types from submodules
pub use delete::Delete;
pub use insert::Insert;
pub use select::{IntoFields, Select};
pub use update::Update;
pub use values::{exclude_keys, query_values, QueryValues, ValueMode};
pub use where_clause::{compose_where, compose_where_with_operators, Where, KEY_COLLISION};

use crate::error::Result;
use crate::query::BoundQuery;

/// Core trait for all query builders
pub trait QueryBuilder {
    /// Produce the SQL text and its named bind-value map
    fn to_query(&self) -> Result<BoundQuery>;
}
