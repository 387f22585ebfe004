//! Database configuration module.
//!
//! This module handles the `SQLite` connection and table creation using `SeaORM`.
//! The only table is the `system_state` key/value table; its schema is generated
//! from the entity definition with `Schema::create_table_from_entity`, so the SQL
//! always matches the Rust struct.

use crate::entities::SystemState;
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::{debug, info};

/// Database used when neither `DATABASE_URL` nor the config file name one.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/church_budget.sqlite?mode=rwc";

/// Picks the database URL: `DATABASE_URL` from the environment wins over the
/// configured value.
#[must_use]
pub fn get_database_url(configured: &str) -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| configured.to_string())
}

/// Opens a connection to the database at `database_url`.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to database at {}", database_url);
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates the `system_state` table if it does not exist yet.
///
/// Safe to call on every start.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut system_state_table = schema.create_table_from_entity(SystemState);
    system_state_table.if_not_exists();

    db.execute(builder.build(&system_state_table)).await?;
    info!("Database tables ready");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::system_state::Model as SystemStateModel;
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = create_connection("sqlite::memory:").await?;
        create_tables(&db).await?;

        let rows: Vec<SystemStateModel> = SystemState::find().limit(1).all(&db).await?;
        assert!(rows.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = create_connection("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }

    #[test]
    fn test_configured_url_used_without_env() {
        if std::env::var("DATABASE_URL").is_err() {
            assert_eq!(get_database_url("sqlite::memory:"), "sqlite::memory:");
        }
    }
}
