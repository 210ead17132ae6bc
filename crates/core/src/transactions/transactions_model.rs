//! Transaction domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of money for a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrnType {
    Income,
    Expense,
}

impl TrnType {
    pub const fn as_db_str(&self) -> &'static str {
        match self {
            TrnType::Income => "INCOME",
            TrnType::Expense => "EXPENSE",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "INCOME" => Some(TrnType::Income),
            "EXPENSE" => Some(TrnType::Expense),
            _ => None,
        }
    }
}

/// Lifecycle state. Deleting a transaction moves it to `Deleted`; rows are
/// never removed while referenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrnState {
    #[default]
    Default,
    Hidden,
    Deleted,
}

impl TrnState {
    pub const fn as_db_str(&self) -> &'static str {
        match self {
            TrnState::Default => "DEFAULT",
            TrnState::Hidden => "HIDDEN",
            TrnState::Deleted => "DELETED",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "DEFAULT" => Some(TrnState::Default),
            "HIDDEN" => Some(TrnState::Hidden),
            "DELETED" => Some(TrnState::Deleted),
            _ => None,
        }
    }
}

/// Why a transaction exists when it is not a plain income or expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrnPurpose {
    TransferFrom,
    TransferTo,
    Fee,
    AdjustBalance,
}

impl TrnPurpose {
    pub const fn as_db_str(&self) -> &'static str {
        match self {
            TrnPurpose::TransferFrom => "TRANSFER_FROM",
            TrnPurpose::TransferTo => "TRANSFER_TO",
            TrnPurpose::Fee => "FEE",
            TrnPurpose::AdjustBalance => "ADJUST_BALANCE",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "TRANSFER_FROM" => Some(TrnPurpose::TransferFrom),
            "TRANSFER_TO" => Some(TrnPurpose::TransferTo),
            "FEE" => Some(TrnPurpose::Fee),
            "ADJUST_BALANCE" => Some(TrnPurpose::AdjustBalance),
            _ => None,
        }
    }
}

/// Cloud sync status of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncState {
    #[default]
    Syncing,
    Synced,
    Deleting,
}

impl SyncState {
    pub const fn as_db_str(&self) -> &'static str {
        match self {
            SyncState::Syncing => "SYNCING",
            SyncState::Synced => "SYNCED",
            SyncState::Deleting => "DELETING",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "SYNCING" => Some(SyncState::Syncing),
            "SYNCED" => Some(SyncState::Synced),
            "DELETING" => Some(SyncState::Deleting),
            _ => None,
        }
    }
}

/// Monetary value in a single currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Value {
    pub amount: Decimal,
    pub currency: String,
}

/// When a transaction happened, or when it is due if it has not happened yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "time", rename_all = "camelCase")]
pub enum TrnTime {
    Actual(DateTime<Utc>),
    Due(DateTime<Utc>),
}

impl TrnTime {
    pub fn time(&self) -> DateTime<Utc> {
        match self {
            TrnTime::Actual(time) | TrnTime::Due(time) => *time,
        }
    }

    pub fn is_due(&self) -> bool {
        matches!(self, TrnTime::Due(_))
    }
}

/// Links from a transaction to the planning features that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TrnMetadata {
    pub recurring_rule_id: Option<Uuid>,
    pub loan_id: Option<Uuid>,
    pub loan_record_id: Option<Uuid>,
}

/// A single income or expense entry.
///
/// Account and category are referenced by id only; the transaction does not
/// own them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    pub account_id: Uuid,
    pub trn_type: TrnType,
    pub value: Value,
    pub category_id: Option<Uuid>,
    pub time: TrnTime,
    pub title: Option<String>,
    pub description: Option<String>,
    pub attachment_url: Option<String>,
    pub state: TrnState,
    pub purpose: Option<TrnPurpose>,
    pub sync: SyncState,
    pub metadata: TrnMetadata,
}

impl Transaction {
    /// Creates a freshly entered transaction that still has to be synced.
    pub fn new(account_id: Uuid, trn_type: TrnType, value: Value, time: TrnTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            trn_type,
            value,
            category_id: None,
            time,
            title: None,
            description: None,
            attachment_url: None,
            state: TrnState::Default,
            purpose: None,
            sync: SyncState::Syncing,
            metadata: TrnMetadata::default(),
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.state == TrnState::Deleted
    }

    pub fn soft_delete(&mut self) {
        self.state = TrnState::Deleted;
        self.sync = SyncState::Deleting;
    }
}
