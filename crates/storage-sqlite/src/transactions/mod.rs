//! SQLite storage implementation for transactions.

mod model;
mod repository;

pub use model::{TransactionDB, TIME_TYPE_ACTUAL, TIME_TYPE_DUE};
pub use repository::TransactionRepository;

// Re-export trait from core for convenience
pub use budgetbook_core::transactions::TransactionRepositoryTrait;
