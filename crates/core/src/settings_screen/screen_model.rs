//! Settings screen state and intents.

use serde::{Deserialize, Serialize};

use crate::backup::{BackupImportState, BackupSource};
use crate::settings::{PreferenceKey, PreferenceValue};

/// Everything the settings screen shows, built from the latest value of each
/// source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsState {
    pub base_currency: String,
    pub start_day_of_month: u32,
    pub hide_balance: bool,
    pub app_locked: bool,
    pub drive_mounted: bool,
    pub import_old_data: BackupImportState,
}

impl Default for SettingsState {
    fn default() -> Self {
        Self {
            base_currency: String::new(),
            start_day_of_month: 1,
            hide_balance: false,
            app_locked: false,
            drive_mounted: false,
            import_old_data: BackupImportState::Idle,
        }
    }
}

/// A new value reported by one upstream source.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum StateUpdate {
    Preference(PreferenceKey, PreferenceValue),
    DriveMounted(bool),
    Import(BackupImportState),
}

impl SettingsState {
    /// Writes `update` into its slot. Returns whether anything changed.
    pub(crate) fn apply(&mut self, update: StateUpdate) -> bool {
        match update {
            StateUpdate::Preference(key, value) => match (key, value) {
                (PreferenceKey::BaseCurrency, PreferenceValue::Currency(code)) => {
                    replace(&mut self.base_currency, code)
                }
                (PreferenceKey::StartDayOfMonth, PreferenceValue::StartDay(day)) => {
                    replace(&mut self.start_day_of_month, day)
                }
                (PreferenceKey::HideBalance, PreferenceValue::Flag(flag)) => {
                    replace(&mut self.hide_balance, flag)
                }
                (PreferenceKey::AppLocked, PreferenceValue::Flag(flag)) => {
                    replace(&mut self.app_locked, flag)
                }
                (key, value) => {
                    log::warn!("Ignoring {} value for preference {}", value.kind(), key);
                    false
                }
            },
            StateUpdate::DriveMounted(mounted) => replace(&mut self.drive_mounted, mounted),
            StateUpdate::Import(state) => replace(&mut self.import_old_data, state),
        }
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

/// User intents raised by the settings screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SettingsEvent {
    Back,
    BaseCurrencyChange { new_currency: String },
    StartDayOfMonth { start_day_of_month: u32 },
    HideBalance { hide_balance: bool },
    AppLocked { app_locked: bool },
    ImportOldData { source: BackupSource },
    MountDrive,
    AddFrame,
}
