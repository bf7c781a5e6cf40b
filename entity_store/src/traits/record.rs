use std::fmt::Debug;

use sqlx::sqlite::{SqliteArguments, SqliteRow};

/// Table metadata binding an entity type to its storage shape.
///
/// Implemented once per entity. The insert statement is static and paired
/// with [`Record::bind_insert`], so stores never inspect field semantics at
/// runtime; the entity type itself is the binding.
pub trait Record:
    Clone + Send + Sync + Debug + Unpin + for<'r> sqlx::FromRow<'r, SqliteRow> + 'static
{
    /// The table this entity persists to.
    fn table_name() -> &'static str;

    /// Parameterized INSERT statement matching [`Record::bind_insert`].
    fn insert_sql() -> &'static str;

    /// Bind this entity's insert values onto `query`, in the column order of
    /// [`Record::insert_sql`].
    fn bind_insert<'q>(
        &self,
        query: sqlx::query::Query<'q, sqlx::Sqlite, SqliteArguments<'q>>,
    ) -> sqlx::query::Query<'q, sqlx::Sqlite, SqliteArguments<'q>>;

    /// Write the backend-generated row id back onto the entity after an
    /// insert.
    fn set_generated_id(&mut self, rowid: i64);

    /// CREATE TABLE statement used by bootstrap migration.
    fn create_table_sql() -> String;

    /// DROP TABLE statement used by bootstrap migration.
    fn drop_table_sql() -> String {
        format!("DROP TABLE IF EXISTS {}", Self::table_name())
    }
}
