//! Cash movement business logic - Posting and deleting real money flows.
//!
//! Posting a movement is the only way budget allocations come into existence
//! for realized cash: the movement insert, its allocation schedule, and the
//! account balance adjustment run in one database transaction, so either the
//! full group commits or nothing does. The original system adjusted the
//! balance outside the posting transaction; that gap is closed here on
//! purpose. Movements are write-once for allocation purposes - the correction
//! path is delete + re-post.

use crate::{
    core::scheduler::{self, DEFAULT_INSTALLMENTS},
    entities::{Account, AccountCategory, AllocationKind, budget_allocation, cash_movement},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;

/// Upper bound on movement descriptions, matching the persisted schema.
const MAX_DESCRIPTION_LEN: usize = 500;

/// A posted provision transfer: both cash legs and the single budget impact.
#[derive(Debug, Clone)]
pub struct ProvisionTransfer {
    /// Outbound movement on the originating account (negative amount)
    pub outbound: cash_movement::Model,
    /// Inbound movement on the provision bucket (positive amount)
    pub inbound: cash_movement::Model,
    /// The one `Provision` allocation, owned by the outbound movement
    pub allocation: budget_allocation::Model,
}

fn validate_description(description: &str) -> Result<()> {
    if description.trim().is_empty() {
        return Err(Error::InvalidScheduleRequest {
            reason: "movement description cannot be empty".to_string(),
        });
    }
    if description.len() > MAX_DESCRIPTION_LEN {
        return Err(Error::InvalidScheduleRequest {
            reason: format!("movement description cannot exceed {MAX_DESCRIPTION_LEN} characters"),
        });
    }
    Ok(())
}

async fn insert_movement<C>(
    conn: &C,
    account_id: i32,
    date: NaiveDate,
    amount: Decimal,
    description: &str,
    is_deferrable: bool,
) -> Result<cash_movement::Model>
where
    C: ConnectionTrait,
{
    let model = cash_movement::ActiveModel {
        account_id: Set(account_id),
        date: Set(date),
        amount: Set(amount),
        description: Set(description.trim().to_string()),
        is_deferrable: Set(is_deferrable),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    model.insert(conn).await.map_err(Into::into)
}

/// Posts a cash movement and materializes its budget allocation schedule.
///
/// A non-deferrable movement produces exactly one allocation anchored to the
/// movement's own calendar month with the full amount (the installment count
/// is ignored). A deferrable movement is smoothed over `installments` months
/// (defaults to 12 for annual charges); the installments sum to the movement
/// amount exactly. The account balance is incremented by the movement amount
/// inside the same transaction.
///
/// # Errors
/// Returns [`Error::InvalidScheduleRequest`] for a zero amount, an empty or
/// oversized description, or a zero installment count;
/// [`Error::AccountNotFound`] if the account does not exist; and
/// [`Error::Database`] if the atomic group cannot be committed (in which case
/// nothing is persisted).
pub async fn post_movement(
    db: &DatabaseConnection,
    account_id: i32,
    date: NaiveDate,
    amount: Decimal,
    description: String,
    is_deferrable: bool,
    installments: Option<u32>,
) -> Result<(cash_movement::Model, Vec<budget_allocation::Model>)> {
    // All validation happens before any write.
    if amount.is_zero() {
        return Err(Error::InvalidScheduleRequest {
            reason: "movement amount must be non-zero".to_string(),
        });
    }
    validate_description(&description)?;
    let installments = installments.unwrap_or(DEFAULT_INSTALLMENTS);
    if is_deferrable && installments == 0 {
        return Err(Error::InvalidScheduleRequest {
            reason: "installment count must be at least 1".to_string(),
        });
    }

    let txn = db.begin().await?;

    Account::find_by_id(account_id)
        .one(&txn)
        .await?
        .ok_or(Error::AccountNotFound { id: account_id })?;

    let movement =
        insert_movement(&txn, account_id, date, amount, &description, is_deferrable).await?;
    let allocations = scheduler::schedule_for_movement(&txn, &movement, installments).await?;
    crate::core::account::update_account_balance_atomic(&txn, account_id, amount).await?;

    txn.commit().await?;
    info!(
        movement_id = movement.id,
        account_id,
        %amount,
        allocations = allocations.len(),
        "posted cash movement"
    );
    Ok((movement, allocations))
}

/// Posts a transfer into a provision bucket.
///
/// Cash-wise this is two movements (money leaves the source account and
/// arrives in the bucket), so the all-accounts total is unchanged. Budget-wise
/// it is a single `Provision` allocation owned by the outbound movement, with
/// the outbound movement's (negative) amount anchored to the movement's
/// month: setting money aside counts as spending it. The inbound bucket leg
/// carries no allocation. This is the only path that produces `Provision`
/// allocations.
///
/// # Errors
/// Returns [`Error::InvalidScheduleRequest`] if `amount` is not strictly
/// positive, the description is invalid, the target is not a provision
/// bucket, or the source is one; [`Error::AccountNotFound`] for a missing
/// account.
pub async fn post_provision_transfer(
    db: &DatabaseConnection,
    source_account_id: i32,
    bucket_account_id: i32,
    date: NaiveDate,
    amount: Decimal,
    description: String,
) -> Result<ProvisionTransfer> {
    if amount <= Decimal::ZERO {
        return Err(Error::InvalidScheduleRequest {
            reason: "provision transfer amount must be strictly positive".to_string(),
        });
    }
    validate_description(&description)?;

    let txn = db.begin().await?;

    let source = Account::find_by_id(source_account_id)
        .one(&txn)
        .await?
        .ok_or(Error::AccountNotFound {
            id: source_account_id,
        })?;
    let bucket = Account::find_by_id(bucket_account_id)
        .one(&txn)
        .await?
        .ok_or(Error::AccountNotFound {
            id: bucket_account_id,
        })?;

    if bucket.category != AccountCategory::ProvisionBucket {
        return Err(Error::InvalidScheduleRequest {
            reason: format!("account {} is not a provision bucket", bucket.id),
        });
    }
    if source.category == AccountCategory::ProvisionBucket {
        return Err(Error::InvalidScheduleRequest {
            reason: format!("source account {} must not be a provision bucket", source.id),
        });
    }

    let outbound =
        insert_movement(&txn, source_account_id, date, -amount, &description, false).await?;
    let inbound =
        insert_movement(&txn, bucket_account_id, date, amount, &description, false).await?;

    let allocation = budget_allocation::ActiveModel {
        movement_id: Set(Some(outbound.id)),
        target_month: Set(scheduler::month_start(date)),
        virtual_amount: Set(outbound.amount),
        kind: Set(AllocationKind::Provision),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let allocation = allocation.insert(&txn).await?;

    crate::core::account::update_account_balance_atomic(&txn, source_account_id, -amount).await?;
    crate::core::account::update_account_balance_atomic(&txn, bucket_account_id, amount).await?;

    txn.commit().await?;
    info!(
        outbound_id = outbound.id,
        inbound_id = inbound.id,
        %amount,
        "posted provision transfer"
    );
    Ok(ProvisionTransfer {
        outbound,
        inbound,
        allocation,
    })
}

/// Retrieves a movement by its unique ID.
pub async fn get_movement_by_id(
    db: &DatabaseConnection,
    movement_id: i32,
) -> Result<Option<cash_movement::Model>> {
    cash_movement::Entity::find_by_id(movement_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all movements for one account, most recent date first.
pub async fn get_movements_for_account(
    db: &DatabaseConnection,
    account_id: i32,
) -> Result<Vec<cash_movement::Model>> {
    cash_movement::Entity::find()
        .filter(cash_movement::Column::AccountId.eq(account_id))
        .order_by_desc(cash_movement::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all movements dated between `start` and `end` inclusive,
/// most recent first. Used for monthly and yearly statements.
pub async fn get_movements_in_range(
    db: &DatabaseConnection,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<cash_movement::Model>> {
    cash_movement::Entity::find()
        .filter(cash_movement::Column::Date.gte(start))
        .filter(cash_movement::Column::Date.lte(end))
        .order_by_desc(cash_movement::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Counts all movements in the store.
pub async fn count_movements(db: &DatabaseConnection) -> Result<u64> {
    cash_movement::Entity::find()
        .count(db)
        .await
        .map_err(Into::into)
}

/// Deletes a movement, cascades to its owned allocations, and reverses its
/// effect on the account balance - all in one transaction.
///
/// Allocations owned by other movements are untouched. The cascade is
/// explicit rather than delegated to a foreign-key pragma so the deletion
/// policy does not depend on connection settings.
///
/// The two legs of a provision transfer are independent movements with no
/// stored linkage, so deleting one leg does not delete the other: undoing a
/// transfer means deleting both legs, or the remaining leg breaks the
/// transfer's treasury neutrality.
///
/// # Errors
/// Returns [`Error::MovementNotFound`] if the movement does not exist.
pub async fn delete_movement(db: &DatabaseConnection, movement_id: i32) -> Result<()> {
    let txn = db.begin().await?;

    let movement = cash_movement::Entity::find_by_id(movement_id)
        .one(&txn)
        .await?
        .ok_or(Error::MovementNotFound { id: movement_id })?;

    budget_allocation::Entity::delete_many()
        .filter(budget_allocation::Column::MovementId.eq(movement_id))
        .exec(&txn)
        .await?;

    let account_id = movement.account_id;
    let reversal = -movement.amount;
    movement.delete(&txn).await?;
    crate::core::account::update_account_balance_atomic(&txn, account_id, reversal).await?;

    txn.commit().await?;
    info!(movement_id, account_id, "deleted cash movement");
    Ok(())
}
