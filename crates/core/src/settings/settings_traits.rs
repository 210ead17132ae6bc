//! Repository and service traits for settings.

use async_trait::async_trait;

use crate::errors::Result;
use crate::settings::{PreferenceKey, PreferenceSource};

/// Repository trait for persisting individual preferences.
#[async_trait]
pub trait SettingsRepositoryTrait: Send + Sync {
    /// Get a single setting value by key. Returns None if it was never written.
    fn get_setting(&self, setting_key: &str) -> Result<Option<String>>;

    /// Insert or replace a single setting.
    async fn update_setting(&self, setting_key: &str, setting_value: &str) -> Result<()>;
}

#[async_trait]
pub trait SettingsServiceTrait: Send + Sync {
    fn base_currency(&self) -> String;

    fn start_day_of_month(&self) -> u32;

    fn hide_balance(&self) -> bool;

    fn app_locked(&self) -> bool;

    async fn update_base_currency(&self, new_currency: &str) -> Result<()>;

    async fn update_start_day_of_month(&self, start_day_of_month: u32) -> Result<()>;

    async fn update_hide_balance(&self, hide_balance: bool) -> Result<()>;

    async fn update_app_locked(&self, app_locked: bool) -> Result<()>;

    /// The live source backing a preference.
    fn source(&self, key: PreferenceKey) -> &PreferenceSource;
}
