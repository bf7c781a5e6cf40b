//! # Scoped Transactions Example
//!
//! This example demonstrates the transaction scope lifecycle:
//! - Several stores committing together inside one `atomic` scope
//! - Automatic rollback when the scope body fails
//! - Explicit `enter`/`exit` control for manual bracketing
//!
//! Run with: `cargo run --example scoped_transactions`

use atomstore::prelude::*;
use futures::TryStreamExt;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Option<i64>,
    pub email: String,
    pub is_active: bool,
}

impl Record for User {
    fn table_name() -> &'static str {
        "users"
    }

    fn insert_sql() -> &'static str {
        "INSERT INTO users (email, is_active) VALUES (?, ?)"
    }

    fn bind_insert<'q>(
        &self,
        query: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    ) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
        query.bind(self.email.clone()).bind(self.is_active)
    }

    fn set_generated_id(&mut self, rowid: i64) {
        self.id = Some(rowid);
    }

    fn create_table_sql() -> String {
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL,
            is_active BOOLEAN NOT NULL DEFAULT 0
        )"
        .to_string()
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Profile {
    pub id: Option<i64>,
    pub user_id: i64,
    pub display_name: String,
}

impl Record for Profile {
    fn table_name() -> &'static str {
        "profiles"
    }

    fn insert_sql() -> &'static str {
        "INSERT INTO profiles (user_id, display_name) VALUES (?, ?)"
    }

    fn bind_insert<'q>(
        &self,
        query: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    ) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
        query.bind(self.user_id).bind(self.display_name.clone())
    }

    fn set_generated_id(&mut self, rowid: i64) {
        self.id = Some(rowid);
    }

    fn create_table_sql() -> String {
        "CREATE TABLE IF NOT EXISTS profiles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            display_name TEXT NOT NULL
        )"
        .to_string()
    }
}

/// Sign up a user and their profile as one unit of work. Either both rows
/// land, or neither does.
async fn sign_up(
    context: &SqliteTxContext,
    users: &SqliteStore<User>,
    profiles: &SqliteStore<Profile>,
    email: &str,
    display_name: &str,
    fail_after_user: bool,
) -> Result<i64, StoreError> {
    context
        .atomic(|| async {
            let created = users
                .create(vec![User {
                    id: None,
                    email: email.to_string(),
                    is_active: true,
                }])
                .await?;
            let user_id = created[0].id.expect("id assigned on create");

            if fail_after_user {
                // Simulate a failure between the two writes. The user row
                // above must not survive this scope.
                return Err(StoreError::Database(sqlx::Error::RowNotFound));
            }

            profiles
                .create(vec![Profile {
                    id: None,
                    user_id,
                    display_name: display_name.to_string(),
                }])
                .await?;

            Ok(user_id)
        })
        .await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🚀 AtomStore Scoped Transactions Example");
    println!("=========================================");

    let config = DatabaseConfig::with_path("./scoped_transactions_demo.db");
    let atomstore = AtomStore::new(config)?;
    atomstore.auto_migrate::<User>(true).await?;
    atomstore.auto_migrate::<Profile>(true).await?;

    let users = atomstore.store_for::<User>();
    let profiles = atomstore.store_for::<Profile>();
    let context = atomstore.context();

    // 1. Two stores, one scope, one commit
    println!("\n🤝 Step 1: Multi-Store Commit");
    println!("------------------------------");

    let user_id = sign_up(&context, &users, &profiles, "alice@example.com", "Alice", false).await?;
    println!("✅ Signed up alice@example.com (user #{user_id})");

    // 2. A failing body rolls back everything written in the scope
    println!("\n💥 Step 2: Automatic Rollback");
    println!("------------------------------");

    let failed = sign_up(&context, &users, &profiles, "bob@example.com", "Bob", true).await;
    println!("❌ Sign-up failed as expected: {}", failed.unwrap_err());

    let user_count = context
        .atomic(|| async {
            let rows: Vec<User> = users.get(None).await?.try_collect().await?;
            Ok::<_, StoreError>(rows.len())
        })
        .await?;
    println!("📊 Users after rollback: {user_count} (bob was discarded)");

    // 3. Explicit enter/exit bracketing
    println!("\n🔧 Step 3: Manual Scope Control");
    println!("--------------------------------");

    let scope = context.enter().await?;
    println!("✅ Entered scope {scope}");

    users
        .update(
            Predicate::new().eq("email", "alice@example.com"),
            Patch::new().set("is_active", false),
        )
        .await?;

    // Decide against keeping the change and roll it back.
    context.exit(false).await?;
    println!("↩️  Rolled the deactivation back");

    let still_active = context
        .atomic(|| async {
            let rows: Vec<User> = users
                .get(Some(Predicate::new().eq("email", "alice@example.com")))
                .await?
                .try_collect()
                .await?;
            Ok::<_, StoreError>(rows[0].is_active)
        })
        .await?;
    println!("📊 alice is_active after rollback: {still_active}");

    println!("\n🎉 Scoped Transactions Demo Complete!");
    println!("======================================");
    println!("\n🎯 Key Takeaways:");
    println!("✅ atomic() brackets any number of store operations");
    println!("✅ A body error rolls every write in the scope back");
    println!("✅ enter()/exit() give the same guarantees by hand");

    Ok(())
}
