//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod account;
pub mod budget_allocation;
pub mod cash_movement;

// Re-export specific types to avoid conflicts
pub use account::{
    AccountCategory, Column as AccountColumn, Entity as Account, Model as AccountModel,
};
pub use budget_allocation::{
    AllocationKind, Column as BudgetAllocationColumn, Entity as BudgetAllocation,
    Model as BudgetAllocationModel,
};
pub use cash_movement::{
    Column as CashMovementColumn, Entity as CashMovement, Model as CashMovementModel,
};
