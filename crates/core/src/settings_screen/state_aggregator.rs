//! Fan-in of every settings source into one `SettingsState`.
//!
//! Each upstream gets a forwarding task that pushes its latest value into a
//! single last-known-value table. The table is the value of a watch channel:
//! updating a slot and publishing the rebuilt state is one locked step, so
//! observers see states in the order the updates were applied and never a
//! state assembled from a slot value older than one already published.

use std::sync::Arc;

use log::debug;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::WatchStream;

use super::screen_model::{SettingsState, StateUpdate};
use crate::backup::ImportJobRunner;
use crate::drive::DriveMountSignal;
use crate::settings::{PreferenceKey, SettingsServiceTrait};

pub struct SettingsStateAggregator {
    table: Arc<watch::Sender<SettingsState>>,
    forwarders: Vec<JoinHandle<()>>,
}

impl SettingsStateAggregator {
    /// Subscribes to every source and spawns the forwarding tasks.
    ///
    /// The table is seeded from each source's current value, so the first
    /// observed state is already consistent.
    pub fn spawn(
        settings: &dyn SettingsServiceTrait,
        drive: &DriveMountSignal,
        import_runner: &ImportJobRunner,
    ) -> Self {
        let mut initial = SettingsState::default();

        let mut preference_receivers = Vec::with_capacity(PreferenceKey::ALL.len());
        for key in PreferenceKey::ALL {
            let mut receiver = settings.source(key).subscribe();
            let value = receiver.borrow_and_update().clone();
            initial.apply(StateUpdate::Preference(key, value));
            preference_receivers.push((key, receiver));
        }

        let mut drive_receiver = drive.subscribe();
        let mounted = *drive_receiver.borrow_and_update();
        initial.apply(StateUpdate::DriveMounted(mounted));

        let mut import_receiver = import_runner.subscribe();
        let import_state = import_receiver.borrow_and_update().clone();
        initial.apply(StateUpdate::Import(import_state));

        let (table, _receiver) = watch::channel(initial);
        let table = Arc::new(table);

        let mut forwarders = Vec::with_capacity(preference_receivers.len() + 2);
        for (key, receiver) in preference_receivers {
            forwarders.push(tokio::spawn(forward(
                receiver,
                table.clone(),
                move |value| StateUpdate::Preference(key, value),
            )));
        }
        forwarders.push(tokio::spawn(forward(
            drive_receiver,
            table.clone(),
            StateUpdate::DriveMounted,
        )));
        forwarders.push(tokio::spawn(forward(
            import_receiver,
            table.clone(),
            StateUpdate::Import,
        )));

        Self { table, forwarders }
    }

    pub fn current(&self) -> SettingsState {
        self.table.borrow().clone()
    }

    /// Stream of states: the current one immediately, then one per change.
    /// Bursts may be coalesced; the latest state is always delivered.
    pub fn observe(&self) -> WatchStream<SettingsState> {
        WatchStream::new(self.table.subscribe())
    }

    pub fn subscribe(&self) -> watch::Receiver<SettingsState> {
        self.table.subscribe()
    }
}

impl Drop for SettingsStateAggregator {
    fn drop(&mut self) {
        for forwarder in &self.forwarders {
            forwarder.abort();
        }
    }
}

/// Copies every change of `receiver` into its slot until the source closes.
async fn forward<T, F>(
    mut receiver: watch::Receiver<T>,
    table: Arc<watch::Sender<SettingsState>>,
    to_update: F,
) where
    T: Clone + Send + Sync + 'static,
    F: Fn(T) -> StateUpdate + Send + 'static,
{
    while receiver.changed().await.is_ok() {
        let value = receiver.borrow_and_update().clone();
        let update = to_update(value);
        table.send_if_modified(|state| state.apply(update));
    }
    debug!("Settings source closed, forwarder stopping");
}
