use chrono::{TimeZone, Utc};
use rust_decimal_macros::dec;
use uuid::Uuid;

use super::*;

fn sample_value() -> Value {
    Value {
        amount: dec!(42.50),
        currency: "EUR".to_string(),
    }
}

#[test]
fn test_new_transaction_defaults() {
    let account_id = Uuid::new_v4();
    let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

    let trn = Transaction::new(account_id, TrnType::Expense, sample_value(), TrnTime::Actual(at));

    assert_eq!(trn.account_id, account_id);
    assert_eq!(trn.state, TrnState::Default);
    assert_eq!(trn.sync, SyncState::Syncing);
    assert!(trn.category_id.is_none());
    assert!(trn.purpose.is_none());
    assert_eq!(trn.metadata, TrnMetadata::default());
}

#[test]
fn test_soft_delete_marks_state_and_sync() {
    let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let mut trn = Transaction::new(
        Uuid::new_v4(),
        TrnType::Income,
        sample_value(),
        TrnTime::Actual(at),
    );

    trn.soft_delete();

    assert!(trn.is_deleted());
    assert_eq!(trn.sync, SyncState::Deleting);
}

#[test]
fn test_trn_time_tag() {
    let at = Utc.with_ymd_and_hms(2024, 5, 10, 8, 30, 0).unwrap();

    assert!(TrnTime::Due(at).is_due());
    assert!(!TrnTime::Actual(at).is_due());
    assert_eq!(TrnTime::Due(at).time(), at);
}

#[test]
fn test_db_strings_parse_back() {
    for purpose in [
        TrnPurpose::TransferFrom,
        TrnPurpose::TransferTo,
        TrnPurpose::Fee,
        TrnPurpose::AdjustBalance,
    ] {
        assert_eq!(TrnPurpose::from_db_str(purpose.as_db_str()), Some(purpose));
    }
    assert_eq!(TrnState::from_db_str("ARCHIVED"), None);
    assert_eq!(SyncState::from_db_str("SYNCED"), Some(SyncState::Synced));
    assert_eq!(TrnType::from_db_str("INCOME"), Some(TrnType::Income));
}
