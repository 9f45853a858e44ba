//! Account business logic - Handles all account-related operations.
//!
//! Provides functions for creating, retrieving, and deleting accounts,
//! atomically adjusting the denormalized running balance, and the aggregated
//! balance views ("total treasury", "total provisioned"). The aggregator only
//! ever reads the stored balances; keeping them accurate is the job of the
//! movement-posting path, which adjusts them inside the same transaction that
//! posts or deletes a movement.

use crate::{
    entities::{Account, AccountCategory, account, budget_allocation, cash_movement},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::info;

/// Which accounts a balance total ranges over.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BalanceScope {
    /// Every account regardless of category
    All,
    /// Real and transit accounts only (category != ProvisionBucket)
    Treasury,
    /// Provision buckets only
    Provisions,
}

/// Creates a new account with the given opening balance.
///
/// The name must be non-empty and at most 200 characters; surrounding
/// whitespace is trimmed.
///
/// # Errors
/// Returns [`Error::Config`] for an invalid name, or [`Error::Database`] on
/// persistence failure.
pub async fn create_account(
    db: &DatabaseConnection,
    name: String,
    category: AccountCategory,
    opening_balance: Decimal,
) -> Result<account::Model> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(Error::Config {
            message: "Account name cannot be empty".to_string(),
        });
    }
    if name.len() > 200 {
        return Err(Error::Config {
            message: "Account name cannot exceed 200 characters".to_string(),
        });
    }

    let model = account::ActiveModel {
        name: Set(name),
        category: Set(category),
        balance: Set(opening_balance),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let result = model.insert(db).await?;
    info!(account_id = result.id, name = %result.name, "created account");
    Ok(result)
}

/// Finds an account by its unique ID.
pub async fn get_account_by_id(
    db: &DatabaseConnection,
    account_id: i32,
) -> Result<Option<account::Model>> {
    Account::find_by_id(account_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds an account by its name.
pub async fn get_account_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<account::Model>> {
    Account::find()
        .filter(account::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all accounts, ordered alphabetically by name.
pub async fn get_all_accounts(db: &DatabaseConnection) -> Result<Vec<account::Model>> {
    Account::find()
        .order_by_asc(account::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all accounts of one category, ordered alphabetically by name.
pub async fn get_accounts_by_category(
    db: &DatabaseConnection,
    category: AccountCategory,
) -> Result<Vec<account::Model>> {
    Account::find()
        .filter(account::Column::Category.eq(category))
        .order_by_asc(account::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Updates the balance of an account by atomically adding a delta.
///
/// Uses a single SQL UPDATE (`balance = balance + delta`) rather than
/// read-modify-write, so concurrent posts on the same connection cannot lose
/// updates. Generic over `ConnectionTrait` so it runs inside the caller's
/// transaction - the posting path relies on that to keep the balance
/// invariant and the movement insert in one atomic group.
///
/// # Errors
/// Returns [`Error::AccountNotFound`] if the account does not exist.
pub async fn update_account_balance_atomic<C>(
    conn: &C,
    account_id: i32,
    delta: Decimal,
) -> Result<account::Model>
where
    C: ConnectionTrait,
{
    use sea_orm::sea_query::Expr;

    Account::find_by_id(account_id)
        .one(conn)
        .await?
        .ok_or(Error::AccountNotFound { id: account_id })?;

    Account::update_many()
        .col_expr(
            account::Column::Balance,
            Expr::col(account::Column::Balance).add(delta),
        )
        .filter(account::Column::Id.eq(account_id))
        .exec(conn)
        .await?;

    Account::find_by_id(account_id)
        .one(conn)
        .await?
        .ok_or(Error::AccountNotFound { id: account_id })
}

/// Deletes an account together with its movements and their allocations.
///
/// The cascade is performed explicitly inside one transaction so it does not
/// depend on database-level foreign-key pragmas.
///
/// # Errors
/// Returns [`Error::AccountNotFound`] if the account does not exist.
pub async fn delete_account(db: &DatabaseConnection, account_id: i32) -> Result<()> {
    let txn = db.begin().await?;

    let account = Account::find_by_id(account_id)
        .one(&txn)
        .await?
        .ok_or(Error::AccountNotFound { id: account_id })?;

    let movement_ids: Vec<i32> = cash_movement::Entity::find()
        .filter(cash_movement::Column::AccountId.eq(account_id))
        .select_only()
        .column(cash_movement::Column::Id)
        .into_tuple()
        .all(&txn)
        .await?;

    if !movement_ids.is_empty() {
        budget_allocation::Entity::delete_many()
            .filter(budget_allocation::Column::MovementId.is_in(movement_ids))
            .exec(&txn)
            .await?;
        cash_movement::Entity::delete_many()
            .filter(cash_movement::Column::AccountId.eq(account_id))
            .exec(&txn)
            .await?;
    }

    account.delete(&txn).await?;
    txn.commit().await?;
    info!(account_id, "deleted account and its movements");
    Ok(())
}

/// Sums the stored balances of the accounts in `scope`.
///
/// Three views back the original UI header: all accounts, "total treasury"
/// (everything that is not a provision bucket), and "total provisioned".
/// Returns zero when no account matches. The sum is computed over exact
/// decimals in Rust; the stored balances are never recomputed from movement
/// history here.
pub async fn total_balance(db: &DatabaseConnection, scope: BalanceScope) -> Result<Decimal> {
    let query = match scope {
        BalanceScope::All => Account::find(),
        BalanceScope::Treasury => {
            Account::find().filter(account::Column::Category.ne(AccountCategory::ProvisionBucket))
        }
        BalanceScope::Provisions => {
            Account::find().filter(account::Column::Category.eq(AccountCategory::ProvisionBucket))
        }
    };

    let accounts = query.all(db).await?;
    Ok(accounts.iter().map(|a| a.balance).sum())
}
