//! Initial account configuration loading from config.toml.
//!
//! The accounts defined in config.toml are used to seed the database on first
//! run: seeding only happens while the accounts table is empty, so re-running
//! the binary against an existing database never duplicates accounts.

use crate::core::account::create_account;
use crate::entities::{Account, AccountCategory};
use crate::errors::{Error, Result};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct Config {
    /// List of initial accounts to seed
    pub accounts: Vec<AccountConfig>,
}

/// Configuration for a single initial account
#[derive(Debug, Deserialize, Clone)]
pub struct AccountConfig {
    /// Name of the account
    pub name: String,
    /// Account class: `real_asset`, `virtual_ledger`, or `provision_bucket`
    pub category: String,
    /// Opening balance
    pub opening_balance: Decimal,
}

impl AccountConfig {
    fn parsed_category(&self) -> Result<AccountCategory> {
        match self.category.as_str() {
            "real_asset" => Ok(AccountCategory::RealAsset),
            "virtual_ledger" => Ok(AccountCategory::VirtualLedger),
            "provision_bucket" => Ok(AccountCategory::ProvisionBucket),
            other => Err(Error::Config {
                message: format!("unknown account category: {other}"),
            }),
        }
    }
}

/// Loads the account configuration from a TOML file.
///
/// # Errors
/// Returns [`Error::Io`] if the file cannot be read, or [`Error::Config`] if
/// the TOML syntax is invalid or required fields are missing.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref())?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads the account configuration from the default location (./config.toml).
pub fn load_default_config() -> Result<Config> {
    load_config("config.toml")
}

/// Seeds the configured accounts, but only when the accounts table is empty.
///
/// Returns the number of accounts created (zero when the database already
/// holds accounts).
pub async fn seed_initial_accounts(db: &DatabaseConnection, config: &Config) -> Result<usize> {
    let existing = Account::find().count(db).await?;
    if existing > 0 {
        info!(existing, "accounts already present, skipping seed");
        return Ok(0);
    }

    for account in &config.accounts {
        create_account(
            db,
            account.name.clone(),
            account.parsed_category()?,
            account.opening_balance,
        )
        .await?;
    }

    info!(seeded = config.accounts.len(), "seeded initial accounts");
    Ok(config.accounts.len())
}
