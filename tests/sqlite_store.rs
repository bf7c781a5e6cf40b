//! Integration tests for transactional CRUD over a file-backed SQLite
//! database.
//!
//! Covers the full path: coordinator setup, bootstrap migration, the
//! transaction scope lifecycle and predicate-driven store operations.

use atomstore::prelude::*;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use tempfile::TempDir;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct User {
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

#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: Option<i64>,
    pub token: Uuid,
    pub started_at: DateTime<Utc>,
}

impl Record for Session {
    fn table_name() -> &'static str {
        "sessions"
    }

    fn insert_sql() -> &'static str {
        "INSERT INTO sessions (token, started_at) VALUES (?, ?)"
    }

    fn bind_insert<'q>(
        &self,
        query: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    ) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
        query.bind(self.token).bind(self.started_at)
    }

    fn set_generated_id(&mut self, rowid: i64) {
        self.id = Some(rowid);
    }

    fn create_table_sql() -> String {
        "CREATE TABLE IF NOT EXISTS sessions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            token BLOB NOT NULL,
            started_at TEXT NOT NULL
        )"
        .to_string()
    }
}

/// Fresh coordinator over a database file in a per-test temp directory. The
/// directory guard must stay alive for the duration of the test.
async fn setup() -> (AtomStore, TempDir) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("test.db");
    let config = DatabaseConfig::with_path(path.to_str().expect("temp path is valid utf-8"));

    let atomstore = AtomStore::new(config).expect("failed to build coordinator");
    atomstore
        .auto_migrate::<User>(true)
        .await
        .expect("user migration failed");
    atomstore
        .auto_migrate::<Profile>(true)
        .await
        .expect("profile migration failed");

    (atomstore, dir)
}

#[tokio::test]
async fn create_assigns_ids_and_get_round_trips() {
    let (atomstore, _dir) = setup().await;
    let users = atomstore.store_for::<User>();
    let context = atomstore.context();

    let fetched: Vec<User> = context
        .atomic(|| async {
            let created = users
                .create(vec![User::new("alice@example.com"), User::new("bob@example.com")])
                .await?;
            assert_eq!(created.len(), 2);
            assert!(created.iter().all(|user| user.id.is_some()));
            assert_ne!(created[0].id, created[1].id);

            let stream = users.get(None).await?;
            stream.try_collect().await
        })
        .await
        .expect("scope failed");

    assert_eq!(fetched.len(), 2);
    let emails: Vec<&str> = fetched.iter().map(|user| user.email.as_str()).collect();
    assert!(emails.contains(&"alice@example.com"));
    assert!(emails.contains(&"bob@example.com"));
}

#[tokio::test]
async fn committed_rows_are_visible_in_a_later_scope() {
    let (atomstore, _dir) = setup().await;
    let users = atomstore.store_for::<User>();
    let context = atomstore.context();

    context
        .atomic(|| async { users.create(vec![User::new("alice@example.com")]).await })
        .await
        .expect("create scope failed");

    let fetched: Vec<User> = context
        .atomic(|| async {
            let stream = users
                .get(Some(Predicate::new().eq("email", "alice@example.com")))
                .await?;
            stream.try_collect().await
        })
        .await
        .expect("read scope failed");

    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].email, "alice@example.com");
}

#[tokio::test]
async fn update_affects_only_matching_rows() {
    let (atomstore, _dir) = setup().await;
    let users = atomstore.store_for::<User>();
    let context = atomstore.context();

    let affected = context
        .atomic(|| async {
            users
                .create(vec![User::new("alice@example.com"), User::new("bob@example.com")])
                .await?;
            users
                .update(
                    Predicate::new().eq("email", "alice@example.com"),
                    Patch::new().set("is_active", true),
                )
                .await
        })
        .await
        .expect("scope failed");
    assert_eq!(affected, 1);

    let fetched: Vec<User> = context
        .atomic(|| async {
            let stream = users.get(Some(Predicate::new().eq("is_active", true))).await?;
            stream.try_collect().await
        })
        .await
        .expect("read scope failed");

    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].email, "alice@example.com");
}

#[tokio::test]
async fn empty_predicate_updates_every_row() {
    let (atomstore, _dir) = setup().await;
    let users = atomstore.store_for::<User>();
    let context = atomstore.context();

    let affected = context
        .atomic(|| async {
            users
                .create(vec![
                    User::new("a@example.com"),
                    User::new("b@example.com"),
                    User::new("c@example.com"),
                ])
                .await?;
            users
                .update(Predicate::new(), Patch::new().set("is_active", true))
                .await
        })
        .await
        .expect("scope failed");

    assert_eq!(affected, 3);
}

#[tokio::test]
async fn delete_reports_removed_count() {
    let (atomstore, _dir) = setup().await;
    let users = atomstore.store_for::<User>();
    let context = atomstore.context();

    let (matched, remaining) = context
        .atomic(|| async {
            users
                .create(vec![User::new("alice@example.com"), User::new("bob@example.com")])
                .await?;
            let matched = users
                .delete(Predicate::new().eq("email", "alice@example.com"))
                .await?;
            let stream = users.get(None).await?;
            let remaining: Vec<User> = stream.try_collect().await?;
            Ok::<_, StoreError>((matched, remaining))
        })
        .await
        .expect("scope failed");

    assert_eq!(matched, 1);
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].email, "bob@example.com");
}

#[tokio::test]
async fn empty_predicate_deletes_every_row() {
    let (atomstore, _dir) = setup().await;
    let users = atomstore.store_for::<User>();
    let context = atomstore.context();

    let removed = context
        .atomic(|| async {
            users
                .create(vec![User::new("a@example.com"), User::new("b@example.com")])
                .await?;
            users.delete(Predicate::new()).await
        })
        .await
        .expect("scope failed");

    assert_eq!(removed, 2);
}

#[tokio::test]
async fn unmatched_predicate_deletes_nothing() {
    let (atomstore, _dir) = setup().await;
    let users = atomstore.store_for::<User>();
    let context = atomstore.context();

    let removed = context
        .atomic(|| async {
            users.create(vec![User::new("alice@example.com")]).await?;
            users
                .delete(Predicate::new().eq("email", "nobody@example.com"))
                .await
        })
        .await
        .expect("scope failed");

    assert_eq!(removed, 0);
}

#[tokio::test]
async fn get_is_repeatable_within_one_scope() {
    let (atomstore, _dir) = setup().await;
    let users = atomstore.store_for::<User>();
    let context = atomstore.context();

    context
        .atomic(|| async {
            users.create(vec![User::new("alice@example.com")]).await?;

            let first: Vec<User> = users.get(None).await?.try_collect().await?;
            let second: Vec<User> = users.get(None).await?.try_collect().await?;
            assert_eq!(first.len(), 1);
            assert_eq!(second.len(), 1);
            assert_eq!(first[0].email, second[0].email);

            Ok::<_, StoreError>(())
        })
        .await
        .expect("scope failed");
}

#[tokio::test]
async fn operations_outside_a_scope_are_rejected() {
    let (atomstore, _dir) = setup().await;
    let users = atomstore.store_for::<User>();

    let get_err = users.get(None).await.err().expect("get should fail");
    assert!(matches!(get_err, StoreError::NoActiveTransaction));

    let create_err = users
        .create(vec![User::new("alice@example.com")])
        .await
        .err()
        .expect("create should fail");
    assert!(matches!(create_err, StoreError::NoActiveTransaction));

    let update_err = users
        .update(Predicate::new(), Patch::new().set("is_active", true))
        .await
        .err()
        .expect("update should fail");
    assert!(matches!(update_err, StoreError::NoActiveTransaction));

    let delete_err = users
        .delete(Predicate::new())
        .await
        .err()
        .expect("delete should fail");
    assert!(matches!(delete_err, StoreError::NoActiveTransaction));
}

#[tokio::test]
async fn rolled_back_writes_are_invisible() {
    let (atomstore, _dir) = setup().await;
    let users = atomstore.store_for::<User>();
    let context = atomstore.context();

    context.enter().await.expect("enter failed");
    users
        .create(vec![User::new("ghost@example.com")])
        .await
        .expect("create failed");
    context.exit(false).await.expect("rollback failed");
    assert!(!context.in_scope().await);

    let fetched: Vec<User> = context
        .atomic(|| async {
            let stream = users.get(None).await?;
            stream.try_collect().await
        })
        .await
        .expect("read scope failed");

    assert!(fetched.is_empty());
}

#[tokio::test]
async fn body_error_rolls_back_every_store_in_the_scope() {
    let (atomstore, _dir) = setup().await;
    let users = atomstore.store_for::<User>();
    let profiles = atomstore.store_for::<Profile>();
    let context = atomstore.context();

    let result: Result<(), StoreError> = context
        .atomic(|| async {
            let created = users.create(vec![User::new("alice@example.com")]).await?;
            let user_id = created[0].id.expect("id assigned on create");
            profiles
                .create(vec![Profile {
                    id: None,
                    user_id,
                    display_name: "Alice".to_string(),
                }])
                .await?;
            Err(StoreError::NoActiveTransaction)
        })
        .await;
    assert!(result.is_err());

    let (user_count, profile_count) = context
        .atomic(|| async {
            let user_rows: Vec<User> = users.get(None).await?.try_collect().await?;
            let profile_rows: Vec<Profile> = profiles.get(None).await?.try_collect().await?;
            Ok::<_, StoreError>((user_rows.len(), profile_rows.len()))
        })
        .await
        .expect("read scope failed");

    assert_eq!(user_count, 0);
    assert_eq!(profile_count, 0);
}

#[tokio::test]
async fn two_stores_commit_together_in_one_scope() {
    let (atomstore, _dir) = setup().await;
    let users = atomstore.store_for::<User>();
    let profiles = atomstore.store_for::<Profile>();
    let context = atomstore.context();

    context
        .atomic(|| async {
            let created = users.create(vec![User::new("alice@example.com")]).await?;
            let user_id = created[0].id.expect("id assigned on create");
            profiles
                .create(vec![Profile {
                    id: None,
                    user_id,
                    display_name: "Alice".to_string(),
                }])
                .await?;
            Ok::<_, StoreError>(())
        })
        .await
        .expect("sign-up scope failed");

    let profile_rows: Vec<Profile> = context
        .atomic(|| async { profiles.get(None).await?.try_collect().await })
        .await
        .expect("read scope failed");

    assert_eq!(profile_rows.len(), 1);
    assert_eq!(profile_rows[0].display_name, "Alice");
}

#[tokio::test]
async fn uuid_and_timestamp_predicates_use_native_encodings() {
    let (atomstore, _dir) = setup().await;
    atomstore
        .auto_migrate::<Session>(true)
        .await
        .expect("session migration failed");
    let sessions = atomstore.store_for::<Session>();
    let context = atomstore.context();

    let token = Uuid::new_v4();
    let started_at = Utc::now();

    let matched: Vec<Session> = context
        .atomic(|| async {
            sessions
                .create(vec![Session {
                    id: None,
                    token,
                    started_at,
                }])
                .await?;
            // Predicate values arrive as strings; UUID- and RFC3339-shaped
            // ones are bound in the same native encodings the insert used.
            sessions
                .get(Some(
                    Predicate::new()
                        .eq("token", token.to_string())
                        .eq("started_at", started_at.to_rfc3339()),
                ))
                .await?
                .try_collect()
                .await
        })
        .await
        .expect("scope failed");

    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].token, token);
    assert_eq!(
        matched[0].started_at.timestamp_micros(),
        started_at.timestamp_micros()
    );
}

#[tokio::test]
async fn health_check_succeeds_on_a_reachable_database() {
    let (atomstore, _dir) = setup().await;
    atomstore.health_check().await.expect("health check failed");
}

#[tokio::test]
async fn store_registry_round_trip() {
    let (mut atomstore, _dir) = setup().await;

    let users = atomstore.store_for::<User>();
    atomstore
        .register_store("users".to_string(), users.clone())
        .expect("register failed");

    let duplicate = atomstore.register_store("users".to_string(), users);
    assert!(matches!(
        duplicate,
        Err(AtomStoreError::StoreAlreadyRegistered(_))
    ));

    assert!(atomstore.get_store::<SqliteStore<User>>("users").is_ok());
    assert!(matches!(
        atomstore.get_store::<SqliteStore<User>>("missing"),
        Err(AtomStoreError::StoreNotFound(_))
    ));

    assert_eq!(atomstore.list_stores().len(), 1);
    atomstore.unregister_store("users").expect("unregister failed");
    assert!(atomstore.list_stores().is_empty());
}

#[tokio::test]
async fn register_store_with_migration_creates_table_and_registers() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("fresh.db");
    let config = DatabaseConfig::with_path(path.to_str().expect("temp path is valid utf-8"));
    let mut atomstore = AtomStore::new(config).expect("failed to build coordinator");

    atomstore
        .register_store_with_migration::<User>("users".to_string(), false)
        .await
        .expect("migration failed");

    let users = atomstore
        .get_store::<SqliteStore<User>>("users")
        .expect("store missing")
        .clone();
    let context = atomstore.context();

    let created = context
        .atomic(|| async { users.create(vec![User::new("alice@example.com")]).await })
        .await
        .expect("scope failed");

    assert_eq!(created.len(), 1);
    assert!(created[0].id.is_some());
}
