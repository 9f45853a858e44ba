//! Core business logic - framework-agnostic budgeting operations.
//!
//! Split by responsibility: `scheduler` turns cash movements into
//! month-anchored allocation schedules, `movement` posts and deletes the cash
//! flows themselves (atomically with their schedules and balance updates),
//! `budget` aggregates allocations into monthly figures, and `account` manages
//! accounts and the treasury/provision balance views.

pub mod account;
pub mod budget;
pub mod movement;
pub mod scheduler;
