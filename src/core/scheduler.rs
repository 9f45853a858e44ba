//! Allocation scheduling business logic.
//!
//! Converts one cash movement into its month-anchored budget allocations at
//! the moment the movement is posted. A non-deferrable movement maps to a
//! single allocation for its own calendar month; a deferrable movement is
//! smoothed into N equal monthly installments whose sum equals the movement
//! amount exactly. The pure planning step (`plan_installments`) is separated
//! from persistence (`schedule_for_movement`) so the arithmetic can be tested
//! without a database, and so persistence always runs inside the caller's
//! transaction.

use crate::{
    entities::{AllocationKind, budget_allocation, cash_movement},
    errors::{Error, Result},
};
use chrono::{Datelike, Months, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};

/// Number of installments used for annual smoothing when the caller does not
/// supply one (e.g. a yearly insurance premium spread over twelve months).
pub const DEFAULT_INSTALLMENTS: u32 = 12;

/// Returns the first day of the month containing `date`.
///
/// Target months are always anchored to day 1 so that month-equality queries
/// reduce to date equality.
#[must_use]
pub fn month_start(date: NaiveDate) -> NaiveDate {
    // Day 1 exists in every month, so the fallback is unreachable.
    date.with_day(1).unwrap_or(date)
}

/// Plans the amortization installments for a movement amount.
///
/// Returns `installments` pairs of (target month, virtual amount). The base
/// installment is `amount / installments` rounded to 2 decimal places with
/// banker's rounding (`MidpointNearestEven`); the final installment absorbs
/// the rounding remainder so the installments always sum to `amount` exactly.
/// Target months start at the first day of `date`'s month and advance one
/// calendar month per installment.
///
/// # Errors
/// Returns [`Error::InvalidScheduleRequest`] if `installments` is zero, the
/// amount is zero, or a target month falls outside the supported date range.
pub fn plan_installments(
    amount: Decimal,
    date: NaiveDate,
    installments: u32,
) -> Result<Vec<(NaiveDate, Decimal)>> {
    if installments == 0 {
        return Err(Error::InvalidScheduleRequest {
            reason: "installment count must be at least 1".to_string(),
        });
    }
    if amount.is_zero() {
        return Err(Error::InvalidScheduleRequest {
            reason: "movement amount must be non-zero".to_string(),
        });
    }

    let first_month = month_start(date);
    let base = (amount / Decimal::from(installments))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);

    let mut plan = Vec::with_capacity(installments as usize);
    for i in 0..installments {
        let target_month = first_month
            .checked_add_months(Months::new(i))
            .ok_or_else(|| Error::InvalidScheduleRequest {
                reason: format!("target month out of range for {first_month} + {i} months"),
            })?;
        let virtual_amount = if i + 1 == installments {
            // Last installment: whatever is left after n-1 base installments.
            amount - base * Decimal::from(installments - 1)
        } else {
            base
        };
        plan.push((target_month, virtual_amount));
    }

    Ok(plan)
}

/// Materializes and persists the budget allocations for a posted movement.
///
/// A non-deferrable movement gets exactly one `Amortization` allocation for
/// its own month with the full movement amount; a deferrable one gets the
/// installment plan from [`plan_installments`]. This automatic path never
/// produces a `Provision` allocation - those are created explicitly by
/// provision transfers (see `core::movement::post_provision_transfer`).
///
/// Runs against the caller's connection, which is expected to be the same
/// transaction that inserted the movement, so that the movement and its
/// schedule commit or roll back as a unit.
///
/// # Errors
/// Returns [`Error::InvalidScheduleRequest`] for a zero amount or zero
/// installment count, or [`Error::Database`] if the bulk insert fails.
pub async fn schedule_for_movement<C>(
    conn: &C,
    movement: &cash_movement::Model,
    installments: u32,
) -> Result<Vec<budget_allocation::Model>>
where
    C: ConnectionTrait,
{
    let effective_installments = if movement.is_deferrable {
        installments
    } else {
        // The deferral flag is off: the installment count is ignored.
        1
    };

    let plan = plan_installments(movement.amount, movement.date, effective_installments)?;
    let now = Utc::now();

    let records: Vec<budget_allocation::ActiveModel> = plan
        .iter()
        .map(|&(target_month, virtual_amount)| budget_allocation::ActiveModel {
            movement_id: Set(Some(movement.id)),
            target_month: Set(target_month),
            virtual_amount: Set(virtual_amount),
            kind: Set(AllocationKind::Amortization),
            created_at: Set(now),
            ..Default::default()
        })
        .collect();

    // Bulk insert, then read the rows back in target-month order.
    budget_allocation::Entity::insert_many(records)
        .exec(conn)
        .await?;

    budget_allocation::Entity::find()
        .filter(budget_allocation::Column::MovementId.eq(movement.id))
        .order_by_asc(budget_allocation::Column::TargetMonth)
        .all(conn)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_start_normalizes_to_day_one() {
        assert_eq!(month_start(date(2025, 11, 22)), date(2025, 11, 1));
        assert_eq!(month_start(date(2025, 11, 1)), date(2025, 11, 1));
        assert_eq!(month_start(date(2024, 2, 29)), date(2024, 2, 1));
    }

    #[test]
    fn test_plan_single_installment_keeps_amount() {
        let plan = plan_installments(dec!(-850.00), date(2025, 11, 18), 1).unwrap();
        assert_eq!(plan, vec![(date(2025, 11, 1), dec!(-850.00))]);
    }

    #[test]
    fn test_plan_twelve_even_installments() {
        // -1200.00 over 12 months starting 2025-11: twelve clean -100.00.
        let plan = plan_installments(dec!(-1200.00), date(2025, 11, 5), 12).unwrap();
        assert_eq!(plan.len(), 12);
        assert_eq!(plan[0], (date(2025, 11, 1), dec!(-100.00)));
        assert_eq!(plan[11], (date(2026, 10, 1), dec!(-100.00)));
        for (_, amount) in &plan {
            assert_eq!(*amount, dec!(-100.00));
        }
        let sum: Decimal = plan.iter().map(|(_, a)| *a).sum();
        assert_eq!(sum, dec!(-1200.00));
    }

    #[test]
    fn test_plan_last_installment_absorbs_remainder() {
        let plan = plan_installments(dec!(-100.00), date(2025, 11, 3), 3).unwrap();
        let amounts: Vec<Decimal> = plan.iter().map(|(_, a)| *a).collect();
        assert_eq!(amounts, vec![dec!(-33.33), dec!(-33.33), dec!(-33.34)]);

        let months: Vec<NaiveDate> = plan.iter().map(|(m, _)| *m).collect();
        assert_eq!(
            months,
            vec![date(2025, 11, 1), date(2025, 12, 1), date(2026, 1, 1)]
        );
    }

    #[test]
    fn test_plan_sum_is_exact_for_awkward_divisions() {
        for (amount, n) in [
            (dec!(-1.00), 3u32),
            (dec!(-999.99), 7),
            (dec!(250.01), 12),
            (dec!(-0.05), 4),
        ] {
            let plan = plan_installments(amount, date(2025, 1, 15), n).unwrap();
            assert_eq!(plan.len(), n as usize);
            let sum: Decimal = plan.iter().map(|(_, a)| *a).sum();
            assert_eq!(sum, amount, "sum drifted for {amount} / {n}");
        }
    }

    #[test]
    fn test_plan_months_cross_year_boundary() {
        let plan = plan_installments(dec!(-120.00), date(2025, 12, 31), 3).unwrap();
        let months: Vec<NaiveDate> = plan.iter().map(|(m, _)| *m).collect();
        assert_eq!(
            months,
            vec![date(2025, 12, 1), date(2026, 1, 1), date(2026, 2, 1)]
        );
    }

    #[test]
    fn test_plan_rejects_zero_installments() {
        let result = plan_installments(dec!(-100.00), date(2025, 11, 1), 0);
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidScheduleRequest { .. }
        ));
    }

    #[test]
    fn test_plan_rejects_zero_amount() {
        let result = plan_installments(Decimal::ZERO, date(2025, 11, 1), 12);
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidScheduleRequest { .. }
        ));
    }

    #[test]
    fn test_plan_positive_amounts_smooth_too() {
        // Income can be smoothed the same way (e.g. a yearly bonus).
        let plan = plan_installments(dec!(1000.00), date(2025, 6, 10), 4).unwrap();
        let sum: Decimal = plan.iter().map(|(_, a)| *a).sum();
        assert_eq!(sum, dec!(1000.00));
        assert_eq!(plan[0].1, dec!(250.00));
    }
}
