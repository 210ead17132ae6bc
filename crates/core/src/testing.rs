//! In-memory collaborators shared by the unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::errors::{DatabaseError, Error, Result};
use crate::settings::SettingsRepositoryTrait;

#[derive(Clone, Default)]
pub struct MockSettingsRepository {
    values: Arc<Mutex<HashMap<String, String>>>,
    fail_writes: Arc<Mutex<bool>>,
}

impl MockSettingsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values(values: &[(&str, &str)]) -> Self {
        let repo = Self::new();
        {
            let mut map = repo.values.lock().unwrap();
            for (key, value) in values {
                map.insert(key.to_string(), value.to_string());
            }
        }
        repo
    }

    pub fn stored(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }
}

#[async_trait]
impl SettingsRepositoryTrait for MockSettingsRepository {
    fn get_setting(&self, setting_key: &str) -> Result<Option<String>> {
        Ok(self.values.lock().unwrap().get(setting_key).cloned())
    }

    async fn update_setting(&self, setting_key: &str, setting_value: &str) -> Result<()> {
        if *self.fail_writes.lock().unwrap() {
            return Err(Error::Database(DatabaseError::QueryFailed(
                "disk full".to_string(),
            )));
        }
        self.values
            .lock()
            .unwrap()
            .insert(setting_key.to_string(), setting_value.to_string());
        Ok(())
    }
}
