//! Budget allocation entity - Represents one month-anchored budget impact.
//!
//! A budget allocation records how much a cash movement (or a planned future
//! charge) weighs on a given calendar month's budget, independently of when
//! the cash actually moved. `target_month` is always normalized to the first
//! day of the month. `movement_id` is nullable: a planned charge with no
//! backing cash movement yet has no owner.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Budget allocation database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budget_allocations")]
pub struct Model {
    /// Unique identifier for the allocation
    #[sea_orm(primary_key)]
    pub id: i32,
    /// ID of the owning cash movement, None for a planned future charge
    pub movement_id: Option<i32>,
    /// Month the impact is anchored to, always the first day of that month
    pub target_month: Date,
    /// Signed budget impact (negative for expense, positive for income)
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub virtual_amount: Decimal,
    /// Kind of budget impact: provision or amortization installment
    pub kind: AllocationKind,
    /// When the record was created
    pub created_at: DateTimeUtc,
}

/// Kind of budget allocation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum AllocationKind {
    /// Money set aside into a provision bucket: cash-neutral in aggregate,
    /// budget-negative for the originating month
    #[sea_orm(string_value = "provision")]
    Provision,
    /// One installment of a lump cash outflow spread evenly across months
    #[sea_orm(string_value = "amortization")]
    Amortization,
}

/// Defines relationships between BudgetAllocation and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each allocation may belong to one cash movement
    #[sea_orm(
        belongs_to = "super::cash_movement::Entity",
        from = "Column::MovementId",
        to = "super::cash_movement::Column::Id"
    )]
    CashMovement,
}

impl Related<super::cash_movement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashMovement.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
