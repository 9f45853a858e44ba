//! Database configuration module.
//!
//! Handles the `SQLite` connection and table creation using `SeaORM`. Tables
//! are generated from the entity definitions via
//! `Schema::create_table_from_entity`, so the database schema always matches
//! the Rust struct definitions without hand-written SQL.

use crate::entities::{Account, BudgetAllocation, CashMovement};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Default connection string when `DATABASE_URL` is not set.
const DEFAULT_DATABASE_URL: &str = "sqlite://data/compta.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable, or
/// falls back to a local `SQLite` file.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by [`get_database_url`].
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url())
        .await
        .map_err(Into::into)
}

/// Creates all tables from the entity definitions.
///
/// Idempotence is handled by `if_not_exists`, so calling this on an existing
/// database is safe.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut account_table = schema.create_table_from_entity(Account);
    let mut movement_table = schema.create_table_from_entity(CashMovement);
    let mut allocation_table = schema.create_table_from_entity(BudgetAllocation);

    db.execute(builder.build(account_table.if_not_exists()))
        .await?;
    db.execute(builder.build(movement_table.if_not_exists()))
        .await?;
    db.execute(builder.build(allocation_table.if_not_exists()))
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::{Account, AccountCategory, account};
    use rust_decimal_macros::dec;
    use sea_orm::{ActiveModelTrait, EntityTrait, Set};

    #[tokio::test]
    async fn test_create_tables_in_memory() -> Result<()> {
        let db = sea_orm::Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        // A second run must be a no-op, not an error.
        create_tables(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_decimal_columns_round_trip() -> Result<()> {
        let db = sea_orm::Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        let inserted = account::ActiveModel {
            name: Set("Checking".to_string()),
            category: Set(AccountCategory::RealAsset),
            balance: Set(dec!(2450.50)),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let fetched = Account::find_by_id(inserted.id).one(&db).await?.unwrap();
        assert_eq!(fetched.balance, dec!(2450.50));
        Ok(())
    }
}
