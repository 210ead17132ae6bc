use async_trait::async_trait;

use super::Transaction;
use crate::errors::Result;

/// Repository trait for transaction persistence.
#[async_trait]
pub trait TransactionRepositoryTrait: Send + Sync {
    fn get_transaction(&self, transaction_id: &str) -> Result<Transaction>;

    /// Non-deleted transactions, newest first, optionally for one account.
    fn list_transactions(&self, account_id: Option<&str>) -> Result<Vec<Transaction>>;

    /// Inserts or replaces the given transactions. Returns how many were written.
    async fn save_transactions(&self, transactions: Vec<Transaction>) -> Result<usize>;

    async fn soft_delete_transaction(&self, transaction_id: &str) -> Result<()>;
}
