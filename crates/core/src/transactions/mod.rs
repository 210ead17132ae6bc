//! Transactions module - domain models and repository trait.

mod transactions_model;
mod transactions_traits;

#[cfg(test)]
mod transactions_model_tests;

pub use transactions_model::*;
pub use transactions_traits::TransactionRepositoryTrait;
