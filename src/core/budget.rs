//! Budget aggregation business logic - "What does month M's budget look like?"
//!
//! Pure read-side aggregations over the allocation set, plus the explicit
//! creation of planned (movement-less) future charges. Every call re-derives
//! its answer from the current allocation set; there is no caching layer, so
//! the figures are always consistent with whatever the scheduler last
//! committed. Month matching only compares calendar year and month - the
//! day-of-month of the argument is ignored.

use crate::{
    core::scheduler::month_start,
    entities::{AllocationKind, BudgetAllocation, budget_allocation},
    errors::{Error, Result},
};
use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::info;

/// Per-kind sub-totals for one month's budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyBreakdown {
    /// Sum of `Provision` allocations for the month (money set aside)
    pub provisions: Decimal,
    /// Sum of `Amortization` allocations for the month (smoothed charges)
    pub amortizations: Decimal,
}

impl MonthlyBreakdown {
    /// The month's net budget figure, `provisions + amortizations`.
    #[must_use]
    pub fn net(&self) -> Decimal {
        self.provisions + self.amortizations
    }
}

/// Builds the [start, end) date window covering `month`'s calendar month.
fn month_window(month: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
    let start = month_start(month);
    let end = start
        .checked_add_months(Months::new(1))
        .ok_or_else(|| Error::InvalidScheduleRequest {
            reason: format!("month out of range: {start}"),
        })?;
    Ok((start, end))
}

/// Retrieves all allocations anchored to `month`'s calendar month, ordered by
/// target month then id. The day-of-month of the argument is ignored.
pub async fn get_allocations_for_month(
    db: &DatabaseConnection,
    month: NaiveDate,
) -> Result<Vec<budget_allocation::Model>> {
    let (start, end) = month_window(month)?;
    BudgetAllocation::find()
        .filter(budget_allocation::Column::TargetMonth.gte(start))
        .filter(budget_allocation::Column::TargetMonth.lt(end))
        .order_by_asc(budget_allocation::Column::TargetMonth)
        .order_by_asc(budget_allocation::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all allocations whose target month lies between `start` and
/// `end` inclusive, ordered by ascending target month. Used for quarterly and
/// yearly reports.
pub async fn get_allocations_in_range(
    db: &DatabaseConnection,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<budget_allocation::Model>> {
    BudgetAllocation::find()
        .filter(budget_allocation::Column::TargetMonth.gte(start))
        .filter(budget_allocation::Column::TargetMonth.lte(end))
        .order_by_asc(budget_allocation::Column::TargetMonth)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Sums the virtual amounts of every allocation anchored to `month`'s
/// calendar month. A month with no allocations totals zero - that is an
/// answer, not an error. The sum is independent of insertion order.
pub async fn monthly_total(db: &DatabaseConnection, month: NaiveDate) -> Result<Decimal> {
    let allocations = get_allocations_for_month(db, month).await?;
    Ok(allocations.iter().map(|a| a.virtual_amount).sum())
}

/// Same month-matching rule as [`monthly_total`], partitioned by allocation
/// kind. Each sub-total independently defaults to zero.
pub async fn monthly_breakdown(
    db: &DatabaseConnection,
    month: NaiveDate,
) -> Result<MonthlyBreakdown> {
    let allocations = get_allocations_for_month(db, month).await?;

    let mut breakdown = MonthlyBreakdown {
        provisions: Decimal::ZERO,
        amortizations: Decimal::ZERO,
    };
    for allocation in &allocations {
        match allocation.kind {
            AllocationKind::Provision => breakdown.provisions += allocation.virtual_amount,
            AllocationKind::Amortization => breakdown.amortizations += allocation.virtual_amount,
        }
    }

    Ok(breakdown)
}

/// Retrieves every allocation owned by one movement, ordered by ascending
/// target month - the view used to inspect how a lump charge was smoothed.
/// Planned allocations with no owning movement never appear here.
pub async fn allocations_for_movement(
    db: &DatabaseConnection,
    movement_id: i32,
) -> Result<Vec<budget_allocation::Model>> {
    BudgetAllocation::find()
        .filter(budget_allocation::Column::MovementId.eq(movement_id))
        .order_by_asc(budget_allocation::Column::TargetMonth)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Records a planned future charge that has no backing cash movement yet.
///
/// The allocation is anchored to the first day of `month`'s calendar month
/// and counts in [`monthly_total`] and [`monthly_breakdown`] like any other,
/// but can never be reached through [`allocations_for_movement`]. When the
/// real cash movement is eventually posted, the planned entry should be
/// deleted in favor of the scheduled one.
///
/// # Errors
/// Returns [`Error::InvalidScheduleRequest`] if `amount` is zero.
pub async fn create_planned_allocation(
    db: &DatabaseConnection,
    month: NaiveDate,
    amount: Decimal,
    kind: AllocationKind,
) -> Result<budget_allocation::Model> {
    if amount.is_zero() {
        return Err(Error::InvalidScheduleRequest {
            reason: "planned allocation amount must be non-zero".to_string(),
        });
    }

    let model = budget_allocation::ActiveModel {
        movement_id: Set(None),
        target_month: Set(month_start(month)),
        virtual_amount: Set(amount),
        kind: Set(kind),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let result = model.insert(db).await?;
    info!(
        allocation_id = result.id,
        target_month = %result.target_month,
        "recorded planned allocation"
    );
    Ok(result)
}

/// Deletes a single allocation by ID.
///
/// # Errors
/// Returns [`Error::AllocationNotFound`] if the allocation does not exist.
pub async fn delete_allocation(db: &DatabaseConnection, allocation_id: i32) -> Result<()> {
    let allocation = BudgetAllocation::find_by_id(allocation_id)
        .one(db)
        .await?
        .ok_or(Error::AllocationNotFound { id: allocation_id })?;

    allocation.delete(db).await?;
    Ok(())
}
