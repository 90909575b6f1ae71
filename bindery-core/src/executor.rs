//! Query execution and connection pool interface

use crate::builder::{Delete, Insert, QueryBuilder, Select, Update};
use crate::error::Result;
use crate::query::BoundQuery;
use crate::value::{Value, ValueMap};
use std::future::Future;
use tracing::debug;

/// A materialized result row: column name to decoded value, in column order
pub type Row = ValueMap;

/// Trait for database connection pools
pub trait ConnectionPool: Send + Sync + Clone {
    /// Execute a modification query and return the number of affected rows
    fn execute(&self, query: &BoundQuery) -> impl Future<Output = Result<u64>> + Send;

    /// Execute an INSERT and return the last inserted id
    fn execute_id(&self, query: &BoundQuery) -> impl Future<Output = Result<i64>> + Send;

    /// Execute a query and materialize every result row
    fn fetch_rows(&self, query: &BoundQuery) -> impl Future<Output = Result<Vec<Row>>> + Send;
}

/// Extension trait connecting SELECT builders to a pool
pub trait ExecutableQuery: QueryBuilder {
    /// Execute the query and return all rows
    fn fetch_all<P: ConnectionPool>(
        self,
        pool: &P,
    ) -> impl Future<Output = Result<Vec<Row>>> + Send;

    /// Execute the query and return the first row, if any
    fn fetch_one<P: ConnectionPool>(
        self,
        pool: &P,
    ) -> impl Future<Output = Result<Option<Row>>> + Send;

    /// Execute the query and return the first column of the first row
    fn fetch_field<P: ConnectionPool>(
        self,
        pool: &P,
    ) -> impl Future<Output = Result<Option<Value>>> + Send;

    /// Execute the query and map each row's first column to its second
    fn fetch_pairs<P: ConnectionPool>(
        self,
        pool: &P,
    ) -> impl Future<Output = Result<ValueMap>> + Send;

    /// Execute the query and key each row by `key_field` (the first
    /// column when `None`). A later row with the same key overrides the
    /// earlier one.
    fn fetch_assoc<P: ConnectionPool>(
        self,
        pool: &P,
        key_field: Option<&str>,
    ) -> impl Future<Output = Result<Vec<(String, Row)>>> + Send;
}

impl ExecutableQuery for Select {
    async fn fetch_all<P: ConnectionPool>(self, pool: &P) -> Result<Vec<Row>> {
        let query = self.to_query()?;
        debug!(sql = %query.text, binds = query.values.len(), "fetch_all");
        pool.fetch_rows(&query).await
    }

    async fn fetch_one<P: ConnectionPool>(self, pool: &P) -> Result<Option<Row>> {
        let query = self.to_query()?;
        debug!(sql = %query.text, binds = query.values.len(), "fetch_one");
        Ok(pool.fetch_rows(&query).await?.into_iter().next())
    }

    async fn fetch_field<P: ConnectionPool>(self, pool: &P) -> Result<Option<Value>> {
        let row = self.fetch_one(pool).await?;
        Ok(row.and_then(|row| row.iter().next().map(|(_, value)| value.clone())))
    }

    async fn fetch_pairs<P: ConnectionPool>(self, pool: &P) -> Result<ValueMap> {
        let rows = self.fetch_all(pool).await?;
        let mut pairs = ValueMap::new();
        for row in rows {
            let mut columns = row.iter();
            let Some((_, key)) = columns.next() else {
                continue;
            };
            // a single-column row pairs the key with itself
            let value = columns.next().map(|(_, v)| v).unwrap_or(key);
            pairs.insert(key.to_string(), value.clone());
        }
        Ok(pairs)
    }

    async fn fetch_assoc<P: ConnectionPool>(
        self,
        pool: &P,
        key_field: Option<&str>,
    ) -> Result<Vec<(String, Row)>> {
        let rows = self.fetch_all(pool).await?;
        let mut assoc: Vec<(String, Row)> = Vec::with_capacity(rows.len());
        for row in rows {
            let key = match key_field {
                Some(field) => row.get(field).map(|value| value.to_string()).unwrap_or_default(),
                None => row
                    .iter()
                    .next()
                    .map(|(_, value)| value.to_string())
                    .unwrap_or_default(),
            };
            match assoc.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => entry.1 = row,
                None => assoc.push((key, row)),
            }
        }
        Ok(assoc)
    }
}

impl Select {
    /// Count matching rows: replaces the field list with `count(*)`,
    /// fetches the scalar and casts it to an integer
    pub async fn fetch_count<P: ConnectionPool>(self, pool: &P) -> Result<i64> {
        let field = self.count().fetch_field(pool).await?;
        Ok(field.and_then(|value| value.as_i64()).unwrap_or(0))
    }
}

/// Extension trait for modification queries (INSERT, UPDATE, DELETE)
pub trait ExecutableModification: QueryBuilder {
    /// Execute the modification query and return the number of affected rows
    fn execute<P: ConnectionPool>(self, pool: &P) -> impl Future<Output = Result<u64>> + Send;
}

impl ExecutableModification for Insert {
    async fn execute<P: ConnectionPool>(self, pool: &P) -> Result<u64> {
        let query = self.to_query()?;
        debug!(sql = %query.text, binds = query.values.len(), "execute");
        pool.execute(&query).await
    }
}

impl ExecutableModification for Update {
    async fn execute<P: ConnectionPool>(self, pool: &P) -> Result<u64> {
        let query = self.to_query()?;
        debug!(sql = %query.text, binds = query.values.len(), "execute");
        pool.execute(&query).await
    }
}

impl ExecutableModification for Delete {
    async fn execute<P: ConnectionPool>(self, pool: &P) -> Result<u64> {
        let query = self.to_query()?;
        debug!(sql = %query.text, binds = query.values.len(), "execute");
        pool.execute(&query).await
    }
}

impl Insert {
    /// Execute the insert and return the last inserted id
    pub async fn execute_id<P: ConnectionPool>(self, pool: &P) -> Result<i64> {
        let query = self.to_query()?;
        debug!(sql = %query.text, binds = query.values.len(), "execute_id");
        pool.execute_id(&query).await
    }
}

/// MySQL connection pool wrapper over sqlx
#[cfg(feature = "mysql")]
pub mod mysql {
    use super::*;
    use futures::TryStreamExt;
    use sqlx::mysql::{MySqlArguments, MySqlRow};
    use sqlx::{Column, Row as _, TypeInfo};
    use tracing::trace;

    /// MySQL connection pool
    #[derive(Clone)]
    pub struct MySqlPool {
        inner: sqlx::MySqlPool,
    }

    impl MySqlPool {
        /// Create a new MySQL pool from a connection string
        pub async fn connect(database_url: &str) -> Result<Self> {
            let pool = sqlx::MySqlPool::connect(database_url).await?;
            Ok(Self { inner: pool })
        }

        /// Create from an existing sqlx pool
        pub fn from_pool(pool: sqlx::MySqlPool) -> Self {
            Self { inner: pool }
        }
    }

    impl ConnectionPool for MySqlPool {
        async fn execute(&self, query: &BoundQuery) -> Result<u64> {
            let (sql, params) = query.to_positional()?;
            let result = bind_values(sqlx::query(&sql), &params)
                .execute(&self.inner)
                .await?;
            Ok(result.rows_affected())
        }

        async fn execute_id(&self, query: &BoundQuery) -> Result<i64> {
            let (sql, params) = query.to_positional()?;
            let result = bind_values(sqlx::query(&sql), &params)
                .execute(&self.inner)
                .await?;
            Ok(result.last_insert_id() as i64)
        }

        async fn fetch_rows(&self, query: &BoundQuery) -> Result<Vec<Row>> {
            let (sql, params) = query.to_positional()?;
            let mut stream = bind_values(sqlx::query(&sql), &params).fetch(&self.inner);
            let mut rows = Vec::new();
            while let Some(row) = stream.try_next().await? {
                rows.push(decode_row(&row)?);
            }
            trace!(rows = rows.len(), "fetched");
            Ok(rows)
        }
    }

    /// Bind values to a positional sqlx query, in placeholder order.
    /// Composite values travel as serialized JSON text.
    fn bind_values<'q>(
        mut query: sqlx::query::Query<'q, sqlx::MySql, MySqlArguments>,
        params: &[Value],
    ) -> sqlx::query::Query<'q, sqlx::MySql, MySqlArguments> {
        for param in params {
            query = match param {
                Value::Null => query.bind(None::<String>),
                Value::Bool(b) => query.bind(*b),
                Value::I32(i) => query.bind(*i),
                Value::I64(i) => query.bind(*i),
                Value::F32(f) => query.bind(*f),
                Value::F64(f) => query.bind(*f),
                Value::String(s) => query.bind(s.clone()),
                Value::Bytes(b) => query.bind(b.clone()),
                Value::Json(_) | Value::Array(_) => query.bind(param.to_json().to_string()),
            };
        }
        query
    }

    /// Decode a result row into an ordered `Row`, mapping each column by
    /// its reported type name and falling back to text
    fn decode_row(row: &MySqlRow) -> Result<Row> {
        let mut out = Row::new();
        for (i, column) in row.columns().iter().enumerate() {
            let value = match column.type_info().name() {
                "NULL" => Value::Null,
                "BOOLEAN" => row
                    .try_get::<Option<bool>, _>(i)?
                    .map(Value::Bool)
                    .unwrap_or(Value::Null),
                "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => row
                    .try_get::<Option<i64>, _>(i)?
                    .map(Value::I64)
                    .unwrap_or(Value::Null),
                "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED"
                | "INT UNSIGNED" | "BIGINT UNSIGNED" => row
                    .try_get::<Option<u64>, _>(i)?
                    .map(|v| Value::I64(v as i64))
                    .unwrap_or(Value::Null),
                "FLOAT" => row
                    .try_get::<Option<f32>, _>(i)?
                    .map(Value::F32)
                    .unwrap_or(Value::Null),
                "DOUBLE" => row
                    .try_get::<Option<f64>, _>(i)?
                    .map(Value::F64)
                    .unwrap_or(Value::Null),
                "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" => row
                    .try_get::<Option<Vec<u8>>, _>(i)?
                    .map(Value::Bytes)
                    .unwrap_or(Value::Null),
                _ => row
                    .try_get::<Option<String>, _>(i)?
                    .map(Value::String)
                    .unwrap_or(Value::Null),
            };
            out.insert(column.name(), value);
        }
        Ok(out)
    }
}
