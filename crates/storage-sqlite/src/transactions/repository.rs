use async_trait::async_trait;
use diesel::prelude::*;
use log::debug;
use std::sync::Arc;

use super::model::TransactionDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::transactions;
use budgetbook_core::errors::{DatabaseError, Error, Result};
use budgetbook_core::transactions::{
    SyncState, Transaction, TransactionRepositoryTrait, TrnState,
};

pub struct TransactionRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl TransactionRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl TransactionRepositoryTrait for TransactionRepository {
    fn get_transaction(&self, transaction_id: &str) -> Result<Transaction> {
        let mut conn = get_connection(&self.pool)?;
        let row = transactions::table
            .find(transaction_id)
            .select(TransactionDB::as_select())
            .first::<TransactionDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(Transaction::try_from(row)?)
    }

    fn list_transactions(&self, account_id: Option<&str>) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = transactions::table
            .filter(transactions::state.ne(TrnState::Deleted.as_db_str()))
            .into_boxed();
        if let Some(account_id) = account_id {
            query = query.filter(transactions::account_id.eq(account_id.to_string()));
        }

        let rows = query
            .order(transactions::time.desc())
            .select(TransactionDB::as_select())
            .load::<TransactionDB>(&mut conn)
            .map_err(StorageError::from)?;

        rows.into_iter()
            .map(|row| Transaction::try_from(row).map_err(Error::from))
            .collect()
    }

    async fn save_transactions(&self, new_transactions: Vec<Transaction>) -> Result<usize> {
        if new_transactions.is_empty() {
            return Ok(0);
        }
        let rows: Vec<TransactionDB> = new_transactions.iter().map(TransactionDB::from).collect();

        let written = self
            .writer
            .exec(move |conn| {
                let mut written = 0;
                for row in &rows {
                    written += diesel::replace_into(transactions::table)
                        .values(row)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                Ok(written)
            })
            .await?;
        debug!("Saved {} transactions", written);
        Ok(written)
    }

    async fn soft_delete_transaction(&self, transaction_id: &str) -> Result<()> {
        let id = transaction_id.to_string();
        let updated = self
            .writer
            .exec(move |conn| {
                let updated = diesel::update(transactions::table.find(id.as_str()))
                    .set((
                        transactions::state.eq(TrnState::Deleted.as_db_str()),
                        transactions::sync_state.eq(SyncState::Deleting.as_db_str()),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(updated)
            })
            .await?;

        if updated == 0 {
            return Err(Error::Database(DatabaseError::NotFound(format!(
                "Transaction {} not found",
                transaction_id
            ))));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_db;
    use budgetbook_core::transactions::{TrnTime, TrnType, Value};
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn expense(account_id: Uuid, day: u32) -> Transaction {
        Transaction::new(
            account_id,
            TrnType::Expense,
            Value {
                amount: dec!(9.99),
                currency: "USD".to_string(),
            },
            TrnTime::Actual(Utc.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap()),
        )
    }

    #[tokio::test]
    async fn test_save_and_get() {
        let (_dir, pool, writer) = setup_db();
        let repo = TransactionRepository::new(pool, writer);
        let trn = expense(Uuid::new_v4(), 3);

        assert_eq!(repo.save_transactions(vec![trn.clone()]).await.unwrap(), 1);
        assert_eq!(repo.get_transaction(&trn.id.to_string()).unwrap(), trn);
    }

    #[tokio::test]
    async fn test_save_replaces_existing_row() {
        let (_dir, pool, writer) = setup_db();
        let repo = TransactionRepository::new(pool, writer);
        let mut trn = expense(Uuid::new_v4(), 3);
        repo.save_transactions(vec![trn.clone()]).await.unwrap();

        trn.title = Some("Groceries".to_string());
        repo.save_transactions(vec![trn.clone()]).await.unwrap();

        let stored = repo.get_transaction(&trn.id.to_string()).unwrap();
        assert_eq!(stored.title.as_deref(), Some("Groceries"));
        assert_eq!(repo.list_transactions(None).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_filters_by_account() {
        let (_dir, pool, writer) = setup_db();
        let repo = TransactionRepository::new(pool, writer);
        let account = Uuid::new_v4();
        let older = expense(account, 1);
        let newer = expense(account, 20);
        let other = expense(Uuid::new_v4(), 10);
        repo.save_transactions(vec![older.clone(), newer.clone(), other.clone()])
            .await
            .unwrap();

        let all = repo.list_transactions(None).unwrap();
        let ids: Vec<Uuid> = all.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![newer.id, other.id, older.id]);

        let account_id = account.to_string();
        let mine = repo.list_transactions(Some(&account_id)).unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|t| t.account_id == account));
    }

    #[tokio::test]
    async fn test_soft_delete_hides_from_list() {
        let (_dir, pool, writer) = setup_db();
        let repo = TransactionRepository::new(pool, writer);
        let trn = expense(Uuid::new_v4(), 3);
        repo.save_transactions(vec![trn.clone()]).await.unwrap();

        repo.soft_delete_transaction(&trn.id.to_string())
            .await
            .unwrap();

        assert!(repo.list_transactions(None).unwrap().is_empty());
        let stored = repo.get_transaction(&trn.id.to_string()).unwrap();
        assert!(stored.is_deleted());
        assert_eq!(stored.sync, SyncState::Deleting);
    }

    #[tokio::test]
    async fn test_missing_transaction_is_not_found() {
        let (_dir, pool, writer) = setup_db();
        let repo = TransactionRepository::new(pool, writer);
        let missing = Uuid::new_v4().to_string();

        assert!(matches!(
            repo.get_transaction(&missing),
            Err(Error::Database(DatabaseError::NotFound(_)))
        ));
        assert!(matches!(
            repo.soft_delete_transaction(&missing).await,
            Err(Error::Database(DatabaseError::NotFound(_)))
        ));
    }
}
