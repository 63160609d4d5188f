//! Database connection management.

use crate::app_config::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::time::Duration;

/// Opens a connection pool using the given pool settings.
pub async fn connect(
    database_url: &str,
    settings: &DatabaseConfig,
) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options
        .max_connections(settings.max_connections)
        .connect_timeout(Duration::from_secs(settings.connect_timeout_seconds))
        .sqlx_logging(settings.sqlx_logging);

    Database::connect(options).await
}

/// Opens the server's pool from the loaded configuration.
/// Panics if the database is unreachable.
pub async fn init_db(database_url: String) -> DatabaseConnection {
    let settings = crate::app_config::database();
    let pool = connect(&database_url, &settings)
        .await
        .expect("Failed to connect to database.");

    log::info!(
        "Database pool ready (max_connections = {})",
        settings.max_connections
    );
    pool
}
