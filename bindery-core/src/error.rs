//! Error types for Bindery

use thiserror::Error;

/// The main error type for Bindery operations
#[derive(Error, Debug)]
pub enum Error {
    /// Database connection or execution error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A DELETE or UPDATE was built without any WHERE condition
    #[error("Query must contain a WHERE component: {query}")]
    MissingWhereClause { query: String },

    /// Invalid query configuration
    #[error("Invalid query: {message}")]
    InvalidQuery { message: String },

    /// A named placeholder has no matching bind value
    #[error("No bind value for placeholder ':{name}' in query: {query}")]
    UnboundParameter { name: String, query: String },
}

/// Convenience Result type for Bindery operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new missing-WHERE error carrying the partially-built query text
    pub fn missing_where(query: impl Into<String>) -> Self {
        Self::MissingWhereClause {
            query: query.into(),
        }
    }

    /// Create a new invalid query error
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            message: message.into(),
        }
    }

    /// Create a new unbound-parameter error
    pub fn unbound_parameter(name: impl Into<String>, query: impl Into<String>) -> Self {
        Self::UnboundParameter {
            name: name.into(),
            query: query.into(),
        }
    }
}
