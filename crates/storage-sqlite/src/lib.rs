//! SQLite storage implementation for Budgetbook.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `budgetbook-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for settings and transactions
//! - Database-specific model types (with Diesel derives)
//!
//! This crate is the only place in the application where Diesel dependencies exist.

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod settings;
pub mod transactions;

#[cfg(test)]
mod test_utils;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from budgetbook-core for convenience
pub use budgetbook_core::errors::{DatabaseError, Error, Result};
