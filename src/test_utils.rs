//! Shared test utilities.
//!
//! Common helpers for setting up in-memory test databases and creating test
//! records with sensible defaults.

use crate::{
    core::{account, movement},
    entities::{self, AccountCategory},
    errors::Result,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a `RealAsset` account with a zero opening balance.
pub async fn create_test_account(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::account::Model> {
    account::create_account(
        db,
        name.to_string(),
        AccountCategory::RealAsset,
        Decimal::ZERO,
    )
    .await
}

/// Creates a `ProvisionBucket` account with a zero opening balance.
pub async fn create_bucket_account(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::account::Model> {
    account::create_account(
        db,
        name.to_string(),
        AccountCategory::ProvisionBucket,
        Decimal::ZERO,
    )
    .await
}

/// Posts a non-deferrable movement dated 2025-11-22 with a default
/// description. Returns the movement and its single allocation.
pub async fn post_test_movement(
    db: &DatabaseConnection,
    account_id: i32,
    amount: Decimal,
) -> Result<(
    entities::cash_movement::Model,
    Vec<entities::budget_allocation::Model>,
)> {
    post_test_movement_on(db, account_id, test_date(), amount).await
}

/// Posts a non-deferrable movement on a specific date.
pub async fn post_test_movement_on(
    db: &DatabaseConnection,
    account_id: i32,
    date: NaiveDate,
    amount: Decimal,
) -> Result<(
    entities::cash_movement::Model,
    Vec<entities::budget_allocation::Model>,
)> {
    movement::post_movement(
        db,
        account_id,
        date,
        amount,
        "Test movement".to_string(),
        false,
        None,
    )
    .await
}

/// The default movement date used by the test helpers.
#[must_use]
pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, 22).unwrap_or_default()
}

/// Sets up a database with one checking account. Returns (db, account) for
/// common test scenarios.
pub async fn setup_with_account() -> Result<(DatabaseConnection, entities::account::Model)> {
    let db = setup_test_db().await?;
    let account = create_test_account(&db, "Checking").await?;
    Ok((db, account))
}

/// Sets up a database with a checking account holding an opening balance and
/// a vacation provision bucket. Returns (db, checking, bucket).
pub async fn setup_with_bucket() -> Result<(
    DatabaseConnection,
    entities::account::Model,
    entities::account::Model,
)> {
    let db = setup_test_db().await?;
    let checking = account::create_account(
        &db,
        "Checking".to_string(),
        AccountCategory::RealAsset,
        dec!(2450.50),
    )
    .await?;
    let bucket = create_bucket_account(&db, "Vacation fund").await?;
    Ok((db, checking, bucket))
}
