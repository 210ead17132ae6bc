//! Importer for zipped JSON backups exported by the legacy app.
//!
//! The archive holds a single JSON document with accounts, categories and
//! transactions. Income and expense records map to one transaction each. A
//! transfer becomes a `TransferFrom` expense on the source account and a
//! `TransferTo` income on the destination account; transfers that cannot be
//! resolved are skipped and reported as faulty.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use super::{BackupError, BackupImportResult, BackupImporterTrait, BackupSource};
use crate::constants::DEFAULT_BASE_CURRENCY;
use crate::errors::{Error, Result};
use crate::transactions::{
    SyncState, Transaction, TransactionRepositoryTrait, TrnPurpose, TrnState, TrnTime, TrnType,
    Value,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyBackup {
    #[serde(default)]
    accounts: Vec<LegacyAccount>,
    #[serde(default)]
    categories: Vec<LegacyCategory>,
    #[serde(default)]
    transactions: Vec<LegacyTransaction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyAccount {
    id: Uuid,
    currency: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyCategory {
    id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum LegacyTransactionType {
    Income,
    Expense,
    Transfer,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyTransaction {
    id: Uuid,
    account_id: Uuid,
    #[serde(rename = "type")]
    trn_type: LegacyTransactionType,
    amount: f64,
    to_account_id: Option<Uuid>,
    to_amount: Option<f64>,
    category_id: Option<Uuid>,
    title: Option<String>,
    description: Option<String>,
    /// Epoch milliseconds of when the transaction happened
    date_time: Option<i64>,
    /// Epoch milliseconds of a planned payment that has not happened yet
    due_date: Option<i64>,
    #[serde(default)]
    is_deleted: bool,
}

/// What converting one legacy record produced.
#[derive(Debug, PartialEq)]
enum Converted {
    Transactions(Vec<Transaction>),
    Skipped,
    FaultyTransfer,
}

/// Reads the first `.json` entry of the zip archive at `path`.
fn read_backup_payload(path: &Path) -> std::result::Result<String, BackupError> {
    let file = File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)?;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        if entry.is_file() && entry.name().to_ascii_lowercase().ends_with(".json") {
            debug!("Reading backup payload from entry {}", entry.name());
            let mut payload = String::new();
            entry.read_to_string(&mut payload)?;
            return Ok(payload);
        }
    }

    Err(BackupError::MissingPayload)
}

fn parse_amount(raw: f64) -> Option<Decimal> {
    if !raw.is_finite() || raw <= 0.0 {
        return None;
    }
    Decimal::from_str(&raw.to_string()).ok()
}

fn parse_time(record: &LegacyTransaction) -> Option<TrnTime> {
    match (record.date_time, record.due_date) {
        (Some(millis), _) => DateTime::<Utc>::from_timestamp_millis(millis).map(TrnTime::Actual),
        (None, Some(millis)) => DateTime::<Utc>::from_timestamp_millis(millis).map(TrnTime::Due),
        (None, None) => None,
    }
}

struct BackupConverter {
    account_currencies: HashMap<Uuid, String>,
    categories: HashSet<Uuid>,
}

impl BackupConverter {
    fn new(backup: &LegacyBackup) -> Self {
        let account_currencies = backup
            .accounts
            .iter()
            .map(|account| {
                let currency = account
                    .currency
                    .as_deref()
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .unwrap_or(DEFAULT_BASE_CURRENCY)
                    .to_ascii_uppercase();
                (account.id, currency)
            })
            .collect();
        let categories = backup.categories.iter().map(|c| c.id).collect();
        Self {
            account_currencies,
            categories,
        }
    }

    fn transaction(
        &self,
        id: Uuid,
        record: &LegacyTransaction,
        account_id: Uuid,
        trn_type: TrnType,
        amount: Decimal,
        time: TrnTime,
    ) -> Option<Transaction> {
        let currency = self.account_currencies.get(&account_id)?.clone();
        Some(Transaction {
            id,
            account_id,
            trn_type,
            value: Value { amount, currency },
            category_id: record
                .category_id
                .filter(|category_id| self.categories.contains(category_id)),
            time,
            title: record.title.clone(),
            description: record.description.clone(),
            attachment_url: None,
            state: TrnState::Default,
            purpose: None,
            sync: SyncState::Syncing,
            metadata: Default::default(),
        })
    }

    fn convert(&self, record: &LegacyTransaction) -> Converted {
        if record.is_deleted {
            return Converted::Skipped;
        }
        let Some(time) = parse_time(record) else {
            return match record.trn_type {
                LegacyTransactionType::Transfer => Converted::FaultyTransfer,
                _ => Converted::Skipped,
            };
        };

        match record.trn_type {
            LegacyTransactionType::Income | LegacyTransactionType::Expense => {
                let trn_type = if record.trn_type == LegacyTransactionType::Income {
                    TrnType::Income
                } else {
                    TrnType::Expense
                };
                parse_amount(record.amount)
                    .and_then(|amount| {
                        self.transaction(record.id, record, record.account_id, trn_type, amount, time)
                    })
                    .map(|trn| Converted::Transactions(vec![trn]))
                    .unwrap_or(Converted::Skipped)
            }
            LegacyTransactionType::Transfer => self.convert_transfer(record, time),
        }
    }

    fn convert_transfer(&self, record: &LegacyTransaction, time: TrnTime) -> Converted {
        let Some(to_account_id) = record.to_account_id else {
            return Converted::FaultyTransfer;
        };
        if to_account_id == record.account_id {
            return Converted::FaultyTransfer;
        }
        let Some(amount) = parse_amount(record.amount) else {
            return Converted::FaultyTransfer;
        };
        // Same-currency transfers may omit the received amount.
        let to_amount = match record.to_amount {
            Some(raw) => match parse_amount(raw) {
                Some(to_amount) => to_amount,
                None => return Converted::FaultyTransfer,
            },
            None => amount,
        };

        let from = self.transaction(
            record.id,
            record,
            record.account_id,
            TrnType::Expense,
            amount,
            time,
        );
        let to = self.transaction(
            Uuid::new_v4(),
            record,
            to_account_id,
            TrnType::Income,
            to_amount,
            time,
        );

        match (from, to) {
            (Some(mut from), Some(mut to)) => {
                from.purpose = Some(TrnPurpose::TransferFrom);
                to.purpose = Some(TrnPurpose::TransferTo);
                Converted::Transactions(vec![from, to])
            }
            _ => Converted::FaultyTransfer,
        }
    }
}

/// Imports zipped JSON backups into the transaction repository.
pub struct LegacyJsonBackupImporter {
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
}

impl LegacyJsonBackupImporter {
    pub fn new(transaction_repository: Arc<dyn TransactionRepositoryTrait>) -> Self {
        Self {
            transaction_repository,
        }
    }
}

#[async_trait]
impl BackupImporterTrait for LegacyJsonBackupImporter {
    async fn import_backup(&self, source: BackupSource) -> Result<BackupImportResult> {
        let path = source.path.clone();
        let payload = tokio::task::spawn_blocking(move || read_backup_payload(&path))
            .await
            .map_err(|e| Error::Unexpected(format!("Backup reader task failed: {}", e)))??;

        let backup: LegacyBackup = serde_json::from_str(&payload).map_err(BackupError::from)?;
        info!(
            "Legacy backup contains {} accounts, {} categories, {} transactions",
            backup.accounts.len(),
            backup.categories.len(),
            backup.transactions.len()
        );

        let converter = BackupConverter::new(&backup);
        let mut transactions = Vec::with_capacity(backup.transactions.len());
        let mut faulty_transfers = 0;
        let mut skipped = 0;

        for record in &backup.transactions {
            match converter.convert(record) {
                Converted::Transactions(converted) => transactions.extend(converted),
                Converted::Skipped => skipped += 1,
                Converted::FaultyTransfer => {
                    warn!("Skipping faulty transfer {}", record.id);
                    faulty_transfers += 1;
                }
            }
        }

        if skipped > 0 {
            debug!("Skipped {} deleted or invalid records", skipped);
        }

        let imported = if transactions.is_empty() {
            0
        } else {
            self.transaction_repository
                .save_transactions(transactions)
                .await?
        };

        Ok(BackupImportResult {
            imported,
            faulty_transfers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    use crate::errors::DatabaseError;

    #[derive(Default)]
    struct RecordingTransactionRepository {
        saved: Mutex<Vec<Transaction>>,
    }

    #[async_trait]
    impl TransactionRepositoryTrait for RecordingTransactionRepository {
        fn get_transaction(&self, transaction_id: &str) -> Result<Transaction> {
            self.saved
                .lock()
                .unwrap()
                .iter()
                .find(|t| t.id.to_string() == transaction_id)
                .cloned()
                .ok_or_else(|| Error::Database(DatabaseError::NotFound(transaction_id.into())))
        }

        fn list_transactions(&self, _account_id: Option<&str>) -> Result<Vec<Transaction>> {
            Ok(self.saved.lock().unwrap().clone())
        }

        async fn save_transactions(&self, transactions: Vec<Transaction>) -> Result<usize> {
            let count = transactions.len();
            self.saved.lock().unwrap().extend(transactions);
            Ok(count)
        }

        async fn soft_delete_transaction(&self, _transaction_id: &str) -> Result<()> {
            unimplemented!()
        }
    }

    const CHECKING: &str = "7f1c0e4a-2a8e-4c53-9a57-0f6f4b1b0001";
    const SAVINGS: &str = "7f1c0e4a-2a8e-4c53-9a57-0f6f4b1b0002";
    const GROCERIES: &str = "7f1c0e4a-2a8e-4c53-9a57-0f6f4b1b0100";

    fn write_zip(dir: &Path, entry_name: &str, payload: &str) -> BackupSource {
        let path = dir.join("backup.zip");
        let file = File::create(&path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        writer
            .start_file(entry_name, zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(payload.as_bytes()).unwrap();
        writer.finish().unwrap();
        BackupSource::new(path)
    }

    fn backup_json() -> String {
        serde_json::json!({
            "accounts": [
                { "id": CHECKING, "currency": "eur" },
                { "id": SAVINGS, "currency": "USD" }
            ],
            "categories": [{ "id": GROCERIES }],
            "transactions": [
                {
                    "id": "a0000000-0000-4000-8000-000000000001",
                    "accountId": CHECKING,
                    "type": "EXPENSE",
                    "amount": 12.5,
                    "categoryId": GROCERIES,
                    "title": "Groceries",
                    "dateTime": 1_700_000_000_000_i64
                },
                {
                    "id": "a0000000-0000-4000-8000-000000000002",
                    "accountId": CHECKING,
                    "type": "INCOME",
                    "amount": 2000.0,
                    "dueDate": 1_700_000_000_000_i64
                },
                {
                    "id": "a0000000-0000-4000-8000-000000000003",
                    "accountId": CHECKING,
                    "type": "TRANSFER",
                    "amount": 100.0,
                    "toAccountId": SAVINGS,
                    "toAmount": 108.0,
                    "dateTime": 1_700_000_000_000_i64
                },
                {
                    "id": "a0000000-0000-4000-8000-000000000004",
                    "accountId": CHECKING,
                    "type": "TRANSFER",
                    "amount": 50.0,
                    "toAccountId": "a0000000-0000-4000-8000-00000000ffff",
                    "dateTime": 1_700_000_000_000_i64
                },
                {
                    "id": "a0000000-0000-4000-8000-000000000005",
                    "accountId": CHECKING,
                    "type": "TRANSFER",
                    "amount": 50.0,
                    "dateTime": 1_700_000_000_000_i64
                },
                {
                    "id": "a0000000-0000-4000-8000-000000000006",
                    "accountId": SAVINGS,
                    "type": "TRANSFER",
                    "amount": -3.0,
                    "toAccountId": CHECKING,
                    "dateTime": 1_700_000_000_000_i64
                },
                {
                    "id": "a0000000-0000-4000-8000-000000000007",
                    "accountId": CHECKING,
                    "type": "EXPENSE",
                    "amount": 9.0,
                    "dateTime": 1_700_000_000_000_i64,
                    "isDeleted": true
                }
            ]
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_import_counts_faulty_transfers() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_zip(dir.path(), "backup.json", &backup_json());
        let repo = Arc::new(RecordingTransactionRepository::default());
        let importer = LegacyJsonBackupImporter::new(repo.clone());

        let result = importer.import_backup(source).await.unwrap();

        assert_eq!(result.faulty_transfers, 3);
        assert_eq!(result.imported, 4);
        assert_eq!(result.summary(), "Faulty transfers: 3");

        let saved = repo.saved.lock().unwrap();
        let groceries = &saved[0];
        assert_eq!(groceries.trn_type, TrnType::Expense);
        assert_eq!(groceries.value.currency, "EUR");
        assert_eq!(groceries.value.amount, Decimal::from_str("12.5").unwrap());
        assert_eq!(groceries.category_id, Some(Uuid::parse_str(GROCERIES).unwrap()));

        assert!(saved[1].time.is_due());

        let transfer_from = &saved[2];
        let transfer_to = &saved[3];
        assert_eq!(transfer_from.purpose, Some(TrnPurpose::TransferFrom));
        assert_eq!(transfer_to.purpose, Some(TrnPurpose::TransferTo));
        assert_eq!(transfer_to.account_id, Uuid::parse_str(SAVINGS).unwrap());
        assert_eq!(transfer_to.value.currency, "USD");
        assert_eq!(transfer_to.value.amount, Decimal::from_str("108").unwrap());
    }

    #[tokio::test]
    async fn test_archive_without_json_is_an_operation_failure() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_zip(dir.path(), "notes.txt", "hello");
        let importer =
            LegacyJsonBackupImporter::new(Arc::new(RecordingTransactionRepository::default()));

        let err = importer.import_backup(source).await.unwrap_err();

        assert!(matches!(err, Error::Backup(BackupError::MissingPayload)));
    }

    #[tokio::test]
    async fn test_unreadable_archive_is_an_operation_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.zip");
        std::fs::write(&path, b"definitely not a zip").unwrap();
        let importer =
            LegacyJsonBackupImporter::new(Arc::new(RecordingTransactionRepository::default()));

        let err = importer
            .import_backup(BackupSource::new(path))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Backup(BackupError::InvalidArchive(_))));
    }

    #[tokio::test]
    async fn test_malformed_payload_is_an_operation_failure() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_zip(dir.path(), "backup.json", "{ not json");
        let importer =
            LegacyJsonBackupImporter::new(Arc::new(RecordingTransactionRepository::default()));

        let err = importer.import_backup(source).await.unwrap_err();

        assert!(matches!(err, Error::Backup(BackupError::MalformedPayload(_))));
    }
}
