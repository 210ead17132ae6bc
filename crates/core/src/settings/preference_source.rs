//! A single persisted preference exposed as a live value.

use std::sync::Arc;

use log::{debug, warn};
use tokio::sync::{watch, Mutex};
use tokio_stream::wrappers::WatchStream;

use super::{PreferenceKey, PreferenceValue, SettingsRepositoryTrait};
use crate::errors::Result;

/// Live view over one preference.
///
/// Readers get the current value immediately and every later change. Writes
/// are validated, persisted and only then published, so an observer never sees
/// a value that failed to reach storage.
pub struct PreferenceSource {
    key: PreferenceKey,
    repository: Arc<dyn SettingsRepositoryTrait>,
    sender: watch::Sender<PreferenceValue>,
    // Serializes writes to this preference; the last applied write wins.
    write_lock: Mutex<()>,
}

impl PreferenceSource {
    /// Creates a source seeded with the stored value, or the preference's
    /// default when nothing (or nothing valid) is stored.
    pub fn load(key: PreferenceKey, repository: Arc<dyn SettingsRepositoryTrait>) -> Result<Self> {
        let initial = match repository.get_setting(key.storage_key())? {
            Some(raw) => key.decode(&raw).unwrap_or_else(|| {
                warn!(
                    "Stored value '{}' for preference {} is invalid, using default",
                    raw, key
                );
                key.default_value()
            }),
            None => key.default_value(),
        };

        let (sender, _receiver) = watch::channel(initial);
        Ok(Self {
            key,
            repository,
            sender,
            write_lock: Mutex::new(()),
        })
    }

    pub fn key(&self) -> PreferenceKey {
        self.key
    }

    pub fn current(&self) -> PreferenceValue {
        self.sender.borrow().clone()
    }

    /// Stream of values: the current one first, then one per change.
    ///
    /// Each call returns an independent stream, so a consumer can restart by
    /// calling `read` again.
    pub fn read(&self) -> WatchStream<PreferenceValue> {
        WatchStream::new(self.sender.subscribe())
    }

    /// Raw change receiver, used by the state aggregator.
    pub fn subscribe(&self) -> watch::Receiver<PreferenceValue> {
        self.sender.subscribe()
    }

    /// Validates, persists and publishes a new value.
    ///
    /// A rejected or unpersisted value leaves the current value untouched and
    /// produces no emission.
    pub async fn write(&self, new_value: PreferenceValue) -> Result<()> {
        let value = self.key.validate(new_value)?;

        let _guard = self.write_lock.lock().await;
        self.repository
            .update_setting(self.key.storage_key(), &value.encode())
            .await?;

        debug!("Preference {} set to {:?}", self.key, value);
        self.sender.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        });
        Ok(())
    }
}
