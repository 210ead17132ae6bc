//! Database model for transactions.

use std::str::FromStr;

use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::StorageError;
use budgetbook_core::transactions::{
    SyncState, Transaction, TrnMetadata, TrnPurpose, TrnState, TrnTime, TrnType, Value,
};

pub const TIME_TYPE_ACTUAL: &str = "ACTUAL";
pub const TIME_TYPE_DUE: &str = "DUE";

/// Database model for transactions
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionDB {
    pub id: String,
    pub account_id: String,
    pub trn_type: String,
    /// Decimal rendered as a string to keep full precision.
    pub amount: String,
    pub currency: String,
    pub category_id: Option<String>,
    pub time: NaiveDateTime,
    pub time_type: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub attachment_url: Option<String>,
    pub state: String,
    pub purpose: Option<String>,
    pub sync_state: String,
    pub metadata: Option<String>,
}

impl From<&Transaction> for TransactionDB {
    fn from(domain: &Transaction) -> Self {
        let metadata = if domain.metadata == TrnMetadata::default() {
            None
        } else {
            serde_json::to_string(&domain.metadata).ok()
        };

        Self {
            id: domain.id.to_string(),
            account_id: domain.account_id.to_string(),
            trn_type: domain.trn_type.as_db_str().to_string(),
            amount: domain.value.amount.to_string(),
            currency: domain.value.currency.clone(),
            category_id: domain.category_id.map(|id| id.to_string()),
            time: domain.time.time().naive_utc(),
            time_type: if domain.time.is_due() {
                TIME_TYPE_DUE
            } else {
                TIME_TYPE_ACTUAL
            }
            .to_string(),
            title: domain.title.clone(),
            description: domain.description.clone(),
            attachment_url: domain.attachment_url.clone(),
            state: domain.state.as_db_str().to_string(),
            purpose: domain.purpose.map(|p| p.as_db_str().to_string()),
            sync_state: domain.sync.as_db_str().to_string(),
            metadata,
        }
    }
}

impl TryFrom<TransactionDB> for Transaction {
    type Error = StorageError;

    fn try_from(db: TransactionDB) -> Result<Self, Self::Error> {
        let time = db.time.and_utc();
        let time = match db.time_type.as_str() {
            TIME_TYPE_ACTUAL => TrnTime::Actual(time),
            TIME_TYPE_DUE => TrnTime::Due(time),
            other => return Err(invalid(&db.id, "time_type", other)),
        };

        let purpose = match db.purpose.as_deref() {
            Some(p) => {
                Some(TrnPurpose::from_db_str(p).ok_or_else(|| invalid(&db.id, "purpose", p))?)
            }
            None => None,
        };

        let metadata = match db.metadata.as_deref() {
            Some(json) => serde_json::from_str(json)
                .map_err(|_| invalid(&db.id, "metadata", json))?,
            None => TrnMetadata::default(),
        };

        Ok(Transaction {
            id: parse_uuid(&db.id, "id", &db.id)?,
            account_id: parse_uuid(&db.id, "account_id", &db.account_id)?,
            trn_type: TrnType::from_db_str(&db.trn_type)
                .ok_or_else(|| invalid(&db.id, "trn_type", &db.trn_type))?,
            value: Value {
                amount: Decimal::from_str(&db.amount)
                    .map_err(|_| invalid(&db.id, "amount", &db.amount))?,
                currency: db.currency,
            },
            category_id: db
                .category_id
                .as_deref()
                .map(|c| parse_uuid(&db.id, "category_id", c))
                .transpose()?,
            time,
            title: db.title,
            description: db.description,
            attachment_url: db.attachment_url,
            state: TrnState::from_db_str(&db.state)
                .ok_or_else(|| invalid(&db.id, "state", &db.state))?,
            purpose,
            sync: SyncState::from_db_str(&db.sync_state)
                .ok_or_else(|| invalid(&db.id, "sync_state", &db.sync_state))?,
            metadata,
        })
    }
}

fn parse_uuid(row_id: &str, column: &str, value: &str) -> Result<Uuid, StorageError> {
    Uuid::parse_str(value).map_err(|_| invalid(row_id, column, value))
}

fn invalid(row_id: &str, column: &str, value: &str) -> StorageError {
    StorageError::InvalidRow(format!(
        "transaction {}: invalid {} '{}'",
        row_id, column, value
    ))
}
