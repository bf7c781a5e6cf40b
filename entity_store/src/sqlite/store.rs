//! Generic SQLite store.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use serde_json::Value;

use super::backend::SqliteTxContext;
use crate::errors::StoreError;
use crate::predicate::{Patch, Predicate};
use crate::sql;
use crate::traits::{EntityStream, Record, Store};

/// Generic store bound to one entity type at construction.
///
/// All operations execute against the handle of the shared context's
/// currently active transaction scope. Operations within one scope are
/// sequential: a stream returned by [`Store::get`] keeps the scope's handle
/// until it is drained or dropped, and the next operation waits for it.
pub struct SqliteStore<T: Record> {
    context: Arc<SqliteTxContext>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Record> SqliteStore<T> {
    pub fn new(context: Arc<SqliteTxContext>) -> Self {
        Self {
            context,
            _entity: PhantomData,
        }
    }

    /// The transactional context this store executes in.
    pub fn context(&self) -> &Arc<SqliteTxContext> {
        &self.context
    }
}

impl<T: Record> Clone for SqliteStore<T> {
    fn clone(&self) -> Self {
        Self {
            context: Arc::clone(&self.context),
            _entity: PhantomData,
        }
    }
}

impl<T: Record> std::fmt::Debug for SqliteStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("table", &T::table_name())
            .finish()
    }
}

#[async_trait]
impl<T: Record> Store for SqliteStore<T> {
    type Entity = T;

    async fn get(&self, filter: Option<Predicate>) -> Result<EntityStream<T>, StoreError> {
        let mut handle = self.context.current_handle().await?;
        let (sql_text, params) = sql::build_select(T::table_name(), filter.as_ref());
        tracing::debug!(table = T::table_name(), sql = %sql_text, "get");

        // Rows are pumped through a small channel so the caller sees a lazy
        // stream while the pump task owns the scope's handle guard. The
        // guard is released when the stream is drained or dropped.
        let (mut sender, receiver) = futures::channel::mpsc::channel::<Result<T, StoreError>>(1);
        tokio::spawn(async move {
            let mut query = sqlx::query_as::<_, T>(&sql_text);
            for param in params {
                query = bind_param(query, param);
            }
            let mut rows = query.fetch(&mut *handle);
            while let Some(row) = rows.next().await {
                if sender.send(row.map_err(StoreError::from)).await.is_err() {
                    // Receiver dropped; stop pumping and release the handle.
                    break;
                }
            }
        });

        Ok(receiver.boxed())
    }

    async fn create(&self, mut entities: Vec<T>) -> Result<Vec<T>, StoreError> {
        let mut handle = self.context.current_handle().await?;
        for entity in &mut entities {
            let query = entity.bind_insert(sqlx::query(T::insert_sql()));
            let result = query.execute(&mut *handle).await?;
            entity.set_generated_id(result.last_insert_rowid());
        }
        tracing::debug!(table = T::table_name(), count = entities.len(), "create");
        Ok(entities)
    }

    async fn update(&self, filter: Predicate, patch: Patch) -> Result<u64, StoreError> {
        let mut handle = self.context.current_handle().await?;
        let (sql_text, params) = sql::build_update(T::table_name(), &filter, &patch);
        tracing::debug!(table = T::table_name(), sql = %sql_text, "update");

        let mut query = sqlx::query(&sql_text);
        for param in params {
            query = bind_param_raw(query, param);
        }
        let result = query.execute(&mut *handle).await?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, filter: Predicate) -> Result<u64, StoreError> {
        let mut handle = self.context.current_handle().await?;
        let (sql_text, params) = sql::build_delete(T::table_name(), &filter);
        tracing::debug!(table = T::table_name(), sql = %sql_text, "delete");

        let mut query = sqlx::query(&sql_text);
        for param in params {
            query = bind_param_raw(query, param);
        }
        let result = query.execute(&mut *handle).await?;
        Ok(result.rows_affected())
    }
}

// Shared parameter binding logic: timestamps and UUIDs arrive as JSON
// strings and are coerced to their native SQLite encodings.
macro_rules! bind_json_param {
    ($query:expr, $param:expr) => {
        match $param {
            Value::String(s) => {
                if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(&s) {
                    $query.bind(dt.with_timezone(&chrono::Utc))
                } else if let Ok(id) = uuid::Uuid::parse_str(&s) {
                    $query.bind(id)
                } else {
                    $query.bind(s)
                }
            }
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    $query.bind(i)
                } else if let Some(f) = n.as_f64() {
                    $query.bind(f)
                } else {
                    $query.bind(n.to_string())
                }
            }
            Value::Bool(b) => $query.bind(b),
            Value::Null => $query.bind(Option::<String>::None),
            other => $query.bind(other.to_string()),
        }
    };
}

fn bind_param<'q, T>(
    query: sqlx::query::QueryAs<'q, sqlx::Sqlite, T, sqlx::sqlite::SqliteArguments<'q>>,
    param: Value,
) -> sqlx::query::QueryAs<'q, sqlx::Sqlite, T, sqlx::sqlite::SqliteArguments<'q>> {
    bind_json_param!(query, param)
}

fn bind_param_raw<'q>(
    query: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    param: Value,
) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
    bind_json_param!(query, param)
}
