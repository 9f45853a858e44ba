//! Cash movement entity - Represents one real, dated flow of money.
//!
//! Each movement debits or credits exactly one account: a positive `amount` is
//! an inflow, a negative one an outflow. The `is_deferrable` flag marks a
//! movement as eligible for deferred budget scheduling (a lump charge smoothed
//! over several months of budget impact). Amount, date, and account are
//! write-once for allocation purposes; the correction path is delete + re-post.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Cash movement database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cash_movements")]
pub struct Model {
    /// Unique identifier for the movement
    #[sea_orm(primary_key)]
    pub id: i32,
    /// ID of the account this movement debits or credits
    pub account_id: i32,
    /// Calendar date the money actually moved
    pub date: Date,
    /// Signed amount (positive for inflow, negative for outflow)
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub amount: Decimal,
    /// Human-readable description of the movement
    pub description: String,
    /// Whether the budget impact may be spread across several months
    pub is_deferrable: bool,
    /// When the record was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between CashMovement and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each movement belongs to one account
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id"
    )]
    Account,
    /// One movement owns zero or more budget allocations
    #[sea_orm(has_many = "super::budget_allocation::Entity")]
    BudgetAllocations,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::budget_allocation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BudgetAllocations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
