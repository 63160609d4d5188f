//! Test database setup
#![allow(dead_code)]

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

/// SQLite rendition of `migrations/`. sqlx enables foreign keys on SQLite
/// connections, so dependents must be deleted before their item here too.
const SCHEMA: &[&str] = &[
    "CREATE TABLE events (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        created_by INTEGER NOT NULL,
        upvotes INTEGER NOT NULL DEFAULT 0 CHECK (upvotes >= 0),
        downvotes INTEGER NOT NULL DEFAULT 0 CHECK (downvotes >= 0),
        status TEXT NOT NULL DEFAULT 'active' CHECK (status IN ('active', 'flagged')),
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE resources (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        category TEXT,
        created_by INTEGER NOT NULL,
        upvotes INTEGER NOT NULL DEFAULT 0 CHECK (upvotes >= 0),
        downvotes INTEGER NOT NULL DEFAULT 0 CHECK (downvotes >= 0),
        status TEXT NOT NULL DEFAULT 'active' CHECK (status IN ('active', 'flagged')),
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE comments (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        content TEXT NOT NULL,
        event_id INTEGER REFERENCES events (id),
        resource_id INTEGER REFERENCES resources (id),
        created_by INTEGER NOT NULL,
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE rsvps (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        event_id INTEGER NOT NULL REFERENCES events (id),
        created_by INTEGER NOT NULL,
        status TEXT NOT NULL,
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE votes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        item_type TEXT NOT NULL CHECK (item_type IN ('event', 'resource')),
        item_id INTEGER NOT NULL,
        vote TEXT NOT NULL CHECK (vote IN ('up', 'down')),
        created_at TEXT NOT NULL
    )",
    "CREATE UNIQUE INDEX votes_user_item_key ON votes (user_id, item_type, item_id)",
];

/// Fresh in-memory database with the schema applied.
///
/// The pool is pinned to one connection: every connection to `sqlite::memory:`
/// opens its own empty database.
pub async fn setup_test_database() -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new("sqlite::memory:".to_owned());
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options).await?;

    for statement in SCHEMA {
        db.execute(Statement::from_string(
            db.get_database_backend(),
            statement.to_string(),
        ))
        .await?;
    }

    Ok(db)
}
