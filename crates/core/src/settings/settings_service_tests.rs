use std::sync::Arc;

use tokio_stream::StreamExt;

use crate::errors::{Error, ValidationError};
use crate::settings::{
    PreferenceKey, PreferenceSource, PreferenceValue, SettingsService, SettingsServiceTrait,
};
use crate::testing::MockSettingsRepository;

#[test]
fn test_defaults_when_nothing_is_stored() {
    let service = SettingsService::new(Arc::new(MockSettingsRepository::new())).unwrap();

    assert_eq!(service.base_currency(), "USD");
    assert_eq!(service.start_day_of_month(), 1);
    assert!(!service.hide_balance());
    assert!(!service.app_locked());
}

#[test]
fn test_loads_stored_values_and_ignores_invalid_ones() {
    let repo = MockSettingsRepository::with_values(&[
        ("base_currency", "eur"),
        ("start_day_of_month", "31"),
        ("hide_balance", "true"),
        ("app_locked", "maybe"),
    ]);
    let service = SettingsService::new(Arc::new(repo)).unwrap();

    assert_eq!(service.base_currency(), "EUR");
    assert_eq!(service.start_day_of_month(), 1);
    assert!(service.hide_balance());
    assert!(!service.app_locked());
}

#[test]
fn test_validate_start_day_bounds() {
    let key = PreferenceKey::StartDayOfMonth;
    assert!(key.validate(PreferenceValue::StartDay(1)).is_ok());
    assert!(key.validate(PreferenceValue::StartDay(28)).is_ok());
    assert_eq!(
        key.validate(PreferenceValue::StartDay(0)),
        Err(ValidationError::StartDayOutOfRange {
            value: 0,
            min: 1,
            max: 28
        })
    );
    assert!(key.validate(PreferenceValue::StartDay(29)).is_err());
}

#[test]
fn test_validate_rejects_mismatched_value_kind() {
    let result = PreferenceKey::HideBalance.validate(PreferenceValue::Currency("EUR".into()));
    assert_eq!(
        result,
        Err(ValidationError::PreferenceTypeMismatch {
            key: PreferenceKey::HideBalance,
            kind: "currency"
        })
    );
}

#[test]
fn test_validate_normalizes_currency_code() {
    let value = PreferenceKey::BaseCurrency
        .validate(PreferenceValue::Currency(" gbp ".into()))
        .unwrap();
    assert_eq!(value, PreferenceValue::Currency("GBP".into()));

    assert!(PreferenceKey::BaseCurrency
        .validate(PreferenceValue::Currency("EURO".into()))
        .is_err());
    assert!(PreferenceKey::BaseCurrency
        .validate(PreferenceValue::Currency("E1R".into()))
        .is_err());
}

#[tokio::test]
async fn test_read_emits_current_value_then_changes() {
    let repo = Arc::new(MockSettingsRepository::new());
    let source = PreferenceSource::load(PreferenceKey::StartDayOfMonth, repo.clone()).unwrap();

    let mut stream = source.read();
    assert_eq!(stream.next().await, Some(PreferenceValue::StartDay(1)));

    source.write(PreferenceValue::StartDay(15)).await.unwrap();
    assert_eq!(stream.next().await, Some(PreferenceValue::StartDay(15)));
    assert_eq!(repo.stored("start_day_of_month").as_deref(), Some("15"));

    // A fresh stream starts from the latest value.
    let mut restarted = source.read();
    assert_eq!(restarted.next().await, Some(PreferenceValue::StartDay(15)));
}

#[tokio::test]
async fn test_out_of_range_write_is_rejected_without_emission() {
    let repo = Arc::new(MockSettingsRepository::new());
    let source = PreferenceSource::load(PreferenceKey::StartDayOfMonth, repo.clone()).unwrap();
    let mut receiver = source.subscribe();
    let _ = receiver.borrow_and_update();

    let err = source
        .write(PreferenceValue::StartDay(29))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Validation(ValidationError::StartDayOutOfRange { value: 29, .. })
    ));
    assert_eq!(source.current(), PreferenceValue::StartDay(1));
    assert!(!receiver.has_changed().unwrap());
    assert!(repo.stored("start_day_of_month").is_none());
}

#[tokio::test]
async fn test_failed_persistence_keeps_previous_value() {
    let repo = Arc::new(MockSettingsRepository::new());
    let service = SettingsService::new(repo.clone()).unwrap();
    repo.set_fail_writes(true);

    let result = service.update_hide_balance(true).await;

    assert!(matches!(result, Err(Error::Database(_))));
    assert!(!service.hide_balance());
}

#[tokio::test]
async fn test_writing_same_value_does_not_re_emit() {
    let repo = Arc::new(MockSettingsRepository::new());
    let service = SettingsService::new(repo.clone()).unwrap();
    let mut receiver = service.source(PreferenceKey::AppLocked).subscribe();
    let _ = receiver.borrow_and_update();

    service.update_app_locked(false).await.unwrap();

    assert!(!receiver.has_changed().unwrap());
    assert_eq!(repo.stored("app_locked").as_deref(), Some("false"));
}

#[tokio::test]
async fn test_last_write_wins_for_same_preference() {
    let repo = Arc::new(MockSettingsRepository::new());
    let service = Arc::new(SettingsService::new(repo.clone()).unwrap());

    service.update_base_currency("EUR").await.unwrap();
    service.update_base_currency("JPY").await.unwrap();

    assert_eq!(service.base_currency(), "JPY");
    assert_eq!(repo.stored("base_currency").as_deref(), Some("JPY"));
}
