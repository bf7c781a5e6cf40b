//! Database migration functionality
//!
//! Automatic table creation for Record types managed by AtomStore. This is a
//! bootstrap convenience for first-run setup, not a migration framework.

use entity_store::Record;

use crate::core::AtomStore;
use crate::errors::AtomStoreError;

impl AtomStore {
    /// Create the table for `T`, dropping an existing one first when
    /// `recreate` is set
    pub async fn auto_migrate<T>(&self, recreate: bool) -> Result<(), AtomStoreError>
    where
        T: Record,
    {
        let context = self.context();
        context
            .atomic(|| async {
                let mut handle = context.current_handle().await?;

                if recreate {
                    let drop_sql = T::drop_table_sql();
                    tracing::debug!(table = T::table_name(), sql = %drop_sql, "dropping table");
                    sqlx::query(&drop_sql).execute(&mut *handle).await?;
                }

                let create_sql = T::create_table_sql();
                tracing::debug!(table = T::table_name(), sql = %create_sql, "creating table");
                sqlx::query(&create_sql).execute(&mut *handle).await?;

                Ok::<_, AtomStoreError>(())
            })
            .await
    }

    /// Migrate `T`'s table and register a store for it under `name`
    pub async fn register_store_with_migration<T>(
        &mut self,
        name: String,
        recreate: bool,
    ) -> Result<(), AtomStoreError>
    where
        T: Record,
    {
        // First, run auto-migration for this type
        self.auto_migrate::<T>(recreate).await?;

        // Then register the store
        let store = self.store_for::<T>();
        self.register_store(name, store)
    }
}
