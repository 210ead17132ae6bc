use super::{PreferenceKey, PreferenceSource, PreferenceValue, SettingsRepositoryTrait};
use crate::constants::{DEFAULT_BASE_CURRENCY, DEFAULT_START_DAY_OF_MONTH};
use crate::errors::Result;
use crate::settings::SettingsServiceTrait;
use async_trait::async_trait;
use log::info;
use std::sync::Arc;

/// Owns the four settings-screen preference sources.
pub struct SettingsService {
    base_currency: PreferenceSource,
    start_day_of_month: PreferenceSource,
    hide_balance: PreferenceSource,
    app_locked: PreferenceSource,
}

#[async_trait]
impl SettingsServiceTrait for SettingsService {
    fn base_currency(&self) -> String {
        self.base_currency
            .current()
            .as_currency()
            .map(str::to_string)
            .unwrap_or_else(|| DEFAULT_BASE_CURRENCY.to_string())
    }

    fn start_day_of_month(&self) -> u32 {
        self.start_day_of_month
            .current()
            .as_start_day()
            .unwrap_or(DEFAULT_START_DAY_OF_MONTH)
    }

    fn hide_balance(&self) -> bool {
        self.hide_balance.current().as_flag().unwrap_or(false)
    }

    fn app_locked(&self) -> bool {
        self.app_locked.current().as_flag().unwrap_or(false)
    }

    async fn update_base_currency(&self, new_currency: &str) -> Result<()> {
        self.base_currency
            .write(PreferenceValue::Currency(new_currency.to_string()))
            .await?;
        info!("Base currency updated to {}", self.base_currency());
        Ok(())
    }

    async fn update_start_day_of_month(&self, start_day_of_month: u32) -> Result<()> {
        self.start_day_of_month
            .write(PreferenceValue::StartDay(start_day_of_month))
            .await
    }

    async fn update_hide_balance(&self, hide_balance: bool) -> Result<()> {
        self.hide_balance
            .write(PreferenceValue::Flag(hide_balance))
            .await
    }

    async fn update_app_locked(&self, app_locked: bool) -> Result<()> {
        self.app_locked.write(PreferenceValue::Flag(app_locked)).await
    }

    fn source(&self, key: PreferenceKey) -> &PreferenceSource {
        match key {
            PreferenceKey::BaseCurrency => &self.base_currency,
            PreferenceKey::StartDayOfMonth => &self.start_day_of_month,
            PreferenceKey::HideBalance => &self.hide_balance,
            PreferenceKey::AppLocked => &self.app_locked,
        }
    }
}

impl SettingsService {
    /// Loads every preference from the repository.
    pub fn new(settings_repository: Arc<dyn SettingsRepositoryTrait>) -> Result<Self> {
        Ok(SettingsService {
            base_currency: PreferenceSource::load(
                PreferenceKey::BaseCurrency,
                settings_repository.clone(),
            )?,
            start_day_of_month: PreferenceSource::load(
                PreferenceKey::StartDayOfMonth,
                settings_repository.clone(),
            )?,
            hide_balance: PreferenceSource::load(
                PreferenceKey::HideBalance,
                settings_repository.clone(),
            )?,
            app_locked: PreferenceSource::load(PreferenceKey::AppLocked, settings_repository)?,
        })
    }
}
