//! Account entity - Represents a named money container.
//!
//! An account is either a real bank account (`RealAsset`), an internal
//! transit/pivot account (`VirtualLedger`), or a provision bucket
//! (`ProvisionBucket`) whose inbound transfers are treated as budget
//! expenditure. The `balance` column is denormalized: it is the running sum of
//! all cash movements posted against the account and is only ever mutated
//! inside the same database transaction that posts or deletes a movement.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    /// Unique identifier for the account
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Human-readable name of the account (e.g., "Checking", "Vacation fund")
    pub name: String,
    /// Account class, drives the treasury/provision aggregation views
    pub category: AccountCategory,
    /// Current balance; running sum of all movements against this account
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub balance: Decimal,
    /// When the account was created
    pub created_at: DateTimeUtc,
}

/// Account class.
///
/// `ProvisionBucket` accounts are savings pockets: money transferred into them
/// is treated as already spent from the budget's point of view, so they are
/// excluded from the "treasury" balance view.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum AccountCategory {
    /// A real bank account (checking account, savings book, ...)
    #[sea_orm(string_value = "real_asset")]
    RealAsset,
    /// An internal transit/pivot account used for internal transfers
    #[sea_orm(string_value = "virtual_ledger")]
    VirtualLedger,
    /// A savings pocket whose inbound transfers count as budget expenditure
    #[sea_orm(string_value = "provision_bucket")]
    ProvisionBucket,
}

/// Defines relationships between Account and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One account has many cash movements
    #[sea_orm(has_many = "super::cash_movement::Entity")]
    CashMovements,
}

impl Related<super::cash_movement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashMovements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
