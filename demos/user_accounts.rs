//! # User Accounts Example
//!
//! This example demonstrates the fundamental concepts of AtomStore:
//! - Implementing the `Record` trait for an entity
//! - Building the coordinator from a `DatabaseConfig`
//! - Running CRUD operations inside a transaction scope
//! - Predicate-driven filtering and partial updates
//!
//! This is the perfect starting point for new users.
//!
//! Run with: `cargo run --example user_accounts`

use atomstore::prelude::*;
use futures::TryStreamExt;

/// A simple user entity demonstrating basic field types
#[derive(Debug, Clone, FromRow)]
pub struct User {
    /// Assigned by the database on insert
    pub id: Option<i64>,
    pub email: String,
    pub is_active: bool,
}

impl User {
    fn new(email: &str) -> Self {
        Self {
            id: None,
            email: email.to_string(),
            is_active: false,
        }
    }
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

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🚀 AtomStore User Accounts Example");
    println!("===================================");

    // 1. Setup Database
    println!("\n📊 Step 1: Database Setup");
    println!("--------------------------");

    let config = DatabaseConfig::with_path("./user_accounts_demo.db");
    let atomstore = AtomStore::new(config)?;
    atomstore.auto_migrate::<User>(true).await?;
    println!("✅ Opened SQLite database and migrated 'users' table");

    let users = atomstore.store_for::<User>();
    let context = atomstore.context();

    // 2. CREATE - Insert a batch and read back generated ids
    println!("\n📝 Step 2: Creating Records");
    println!("----------------------------");

    let created: Vec<User> = context
        .atomic(|| async {
            users
                .create(vec![
                    User::new("alice@example.com"),
                    User::new("bob@example.com"),
                    User::new("carol@example.com"),
                ])
                .await
        })
        .await?;

    for user in &created {
        println!("✅ Created user #{:?}: {}", user.id, user.email);
    }

    // 3. READ - Stream entities lazily, with and without a filter
    println!("\n📖 Step 3: Reading Records");
    println!("--------------------------");

    let all: Vec<User> = context
        .atomic(|| async { users.get(None).await?.try_collect().await })
        .await?;
    println!("📋 Total users in database: {}", all.len());

    let filtered: Vec<User> = context
        .atomic(|| async {
            users
                .get(Some(Predicate::new().eq("email", "alice@example.com")))
                .await?
                .try_collect()
                .await
        })
        .await?;
    println!("📋 Users matching alice@example.com: {}", filtered.len());

    // 4. UPDATE - Patch rows selected by a predicate
    println!("\n✏️  Step 4: Updating Records");
    println!("----------------------------");

    let activated = context
        .atomic(|| async {
            users
                .update(
                    Predicate::new().eq("email", "bob@example.com"),
                    Patch::new().set("is_active", true),
                )
                .await
        })
        .await?;
    println!("✅ Activated {} user(s)", activated);

    // 5. DELETE - Remove rows selected by a predicate
    println!("\n🗑️  Step 5: Deleting Records");
    println!("----------------------------");

    let removed = context
        .atomic(|| async {
            users
                .delete(Predicate::new().eq("email", "carol@example.com"))
                .await
        })
        .await?;
    println!("✅ Deleted {} user(s)", removed);

    let remaining: Vec<User> = context
        .atomic(|| async { users.get(None).await?.try_collect().await })
        .await?;
    println!("📊 Remaining users: {}", remaining.len());
    for user in &remaining {
        println!("  • {}: active = {}", user.email, user.is_active);
    }

    println!("\n🎉 User Accounts Demo Complete!");
    println!("================================");
    println!("\n🎯 Key Takeaways:");
    println!("✅ Record implementations bind an entity to its table once");
    println!("✅ Every operation runs inside a transaction scope");
    println!("✅ Predicates filter, patches update - no SQL at the call site");
    println!("✅ get() returns a lazy stream, drained on demand");

    println!("\n📚 Next Steps:");
    println!("  • Try scoped_transactions.rs for multi-store atomicity");

    Ok(())
}
