/// Database configuration and connection management
pub mod database;

/// Initial account seeding from config.toml
pub mod accounts;
