//! Preference domain models.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BASE_CURRENCY, DEFAULT_START_DAY_OF_MONTH, MAX_START_DAY_OF_MONTH,
    MIN_START_DAY_OF_MONTH,
};
use crate::errors::ValidationError;

/// The independently stored user preferences shown on the settings screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PreferenceKey {
    BaseCurrency,
    StartDayOfMonth,
    HideBalance,
    AppLocked,
}

impl PreferenceKey {
    pub const ALL: [PreferenceKey; 4] = [
        PreferenceKey::BaseCurrency,
        PreferenceKey::StartDayOfMonth,
        PreferenceKey::HideBalance,
        PreferenceKey::AppLocked,
    ];

    /// Key under which the preference is persisted.
    pub const fn storage_key(&self) -> &'static str {
        match self {
            PreferenceKey::BaseCurrency => "base_currency",
            PreferenceKey::StartDayOfMonth => "start_day_of_month",
            PreferenceKey::HideBalance => "hide_balance",
            PreferenceKey::AppLocked => "app_locked",
        }
    }

    pub fn default_value(&self) -> PreferenceValue {
        match self {
            PreferenceKey::BaseCurrency => {
                PreferenceValue::Currency(DEFAULT_BASE_CURRENCY.to_string())
            }
            PreferenceKey::StartDayOfMonth => {
                PreferenceValue::StartDay(DEFAULT_START_DAY_OF_MONTH)
            }
            PreferenceKey::HideBalance | PreferenceKey::AppLocked => PreferenceValue::Flag(false),
        }
    }

    /// Checks that `value` fits this preference's domain and returns it in
    /// canonical form (currency codes are trimmed and upper-cased).
    pub fn validate(&self, value: PreferenceValue) -> Result<PreferenceValue, ValidationError> {
        match (self, value) {
            (PreferenceKey::BaseCurrency, PreferenceValue::Currency(code)) => {
                let code = code.trim().to_ascii_uppercase();
                if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
                    Ok(PreferenceValue::Currency(code))
                } else {
                    Err(ValidationError::InvalidCurrencyCode(code))
                }
            }
            (PreferenceKey::StartDayOfMonth, PreferenceValue::StartDay(day)) => {
                if (MIN_START_DAY_OF_MONTH..=MAX_START_DAY_OF_MONTH).contains(&day) {
                    Ok(PreferenceValue::StartDay(day))
                } else {
                    Err(ValidationError::StartDayOutOfRange {
                        value: day,
                        min: MIN_START_DAY_OF_MONTH,
                        max: MAX_START_DAY_OF_MONTH,
                    })
                }
            }
            (PreferenceKey::HideBalance | PreferenceKey::AppLocked, PreferenceValue::Flag(flag)) => {
                Ok(PreferenceValue::Flag(flag))
            }
            (key, other) => Err(ValidationError::PreferenceTypeMismatch {
                key: *key,
                kind: other.kind(),
            }),
        }
    }

    /// Parses a stored value. Returns None when the stored text does not
    /// decode into a valid value for this preference.
    pub fn decode(&self, raw: &str) -> Option<PreferenceValue> {
        let value = match self {
            PreferenceKey::BaseCurrency => PreferenceValue::Currency(raw.to_string()),
            PreferenceKey::StartDayOfMonth => PreferenceValue::StartDay(raw.trim().parse().ok()?),
            PreferenceKey::HideBalance | PreferenceKey::AppLocked => {
                PreferenceValue::Flag(raw.trim().parse().ok()?)
            }
        };
        self.validate(value).ok()
    }
}

impl fmt::Display for PreferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.storage_key())
    }
}

/// Current value of a single preference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum PreferenceValue {
    Currency(String),
    StartDay(u32),
    Flag(bool),
}

impl PreferenceValue {
    pub const fn kind(&self) -> &'static str {
        match self {
            PreferenceValue::Currency(_) => "currency",
            PreferenceValue::StartDay(_) => "start day",
            PreferenceValue::Flag(_) => "flag",
        }
    }

    /// Text form written to the settings store.
    pub fn encode(&self) -> String {
        match self {
            PreferenceValue::Currency(code) => code.clone(),
            PreferenceValue::StartDay(day) => day.to_string(),
            PreferenceValue::Flag(flag) => flag.to_string(),
        }
    }

    pub fn as_currency(&self) -> Option<&str> {
        match self {
            PreferenceValue::Currency(code) => Some(code),
            _ => None,
        }
    }

    pub fn as_start_day(&self) -> Option<u32> {
        match self {
            PreferenceValue::StartDay(day) => Some(*day),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            PreferenceValue::Flag(flag) => Some(*flag),
            _ => None,
        }
    }
}
