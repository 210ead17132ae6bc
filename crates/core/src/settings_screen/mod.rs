//! Settings screen core: one observable state plus an intent handler.

mod event_dispatcher;
mod screen_model;
mod state_aggregator;


use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

pub use event_dispatcher::{SettingsEventDispatcher, SettingsEventSender};
pub use screen_model::{SettingsEvent, SettingsState};
pub use state_aggregator::SettingsStateAggregator;

use crate::backup::{BackupImporterTrait, ImportJobRunner};
use crate::constants::{IMPORT_RESULT_DISPLAY_INTERVAL, SETTINGS_EVENT_CHANNEL_CAPACITY};
use crate::drive::{DriveConnectorTrait, DriveMountSignal, DriveStorageTrait};
use crate::errors::Result;
use crate::navigation::NavigatorTrait;
use crate::settings::SettingsServiceTrait;

#[derive(Debug, Clone)]
pub struct SettingsScreenConfig {
    /// How long a finished import stays visible before reverting to idle.
    pub import_display_interval: Duration,
    pub event_channel_capacity: usize,
}

impl Default for SettingsScreenConfig {
    fn default() -> Self {
        Self {
            import_display_interval: IMPORT_RESULT_DISPLAY_INTERVAL,
            event_channel_capacity: SETTINGS_EVENT_CHANNEL_CAPACITY,
        }
    }
}

/// Collaborators the settings screen is wired to.
pub struct SettingsScreenDeps {
    pub settings: Arc<dyn SettingsServiceTrait>,
    pub importer: Arc<dyn BackupImporterTrait>,
    pub drive_connector: Arc<dyn DriveConnectorTrait>,
    pub drive_storage: Arc<dyn DriveStorageTrait>,
    pub navigator: Arc<dyn NavigatorTrait>,
}

/// Running settings screen. Cloning shares the same state and event queue.
#[derive(Clone)]
pub struct SettingsScreen {
    aggregator: Arc<SettingsStateAggregator>,
    events: SettingsEventSender,
    import_runner: Arc<ImportJobRunner>,
    drive: DriveMountSignal,
}

impl SettingsScreen {
    /// Wires the sources, the aggregator and the dispatcher. Must be called
    /// from within a Tokio runtime.
    pub fn start(deps: SettingsScreenDeps, config: SettingsScreenConfig) -> Self {
        let import_runner = Arc::new(ImportJobRunner::spawn(
            deps.importer,
            config.import_display_interval,
        ));
        let drive = DriveMountSignal::new(deps.drive_connector);

        let aggregator = Arc::new(SettingsStateAggregator::spawn(
            deps.settings.as_ref(),
            &drive,
            &import_runner,
        ));

        let events = SettingsEventDispatcher::new(
            deps.settings,
            import_runner.clone(),
            drive.clone(),
            deps.drive_storage,
            deps.navigator,
        )
        .spawn(config.event_channel_capacity);

        Self {
            aggregator,
            events,
            import_runner,
            drive,
        }
    }

    pub fn current(&self) -> SettingsState {
        self.aggregator.current()
    }

    pub fn observe(&self) -> WatchStream<SettingsState> {
        self.aggregator.observe()
    }

    pub fn subscribe(&self) -> watch::Receiver<SettingsState> {
        self.aggregator.subscribe()
    }

    pub async fn send(&self, event: SettingsEvent) -> Result<()> {
        self.events.send(event).await
    }

    pub async fn dispatch(&self, event: SettingsEvent) -> Result<()> {
        self.events.dispatch(event).await
    }

    pub fn events(&self) -> SettingsEventSender {
        self.events.clone()
    }

    pub fn import_runner(&self) -> &ImportJobRunner {
        &self.import_runner
    }

    pub fn drive(&self) -> &DriveMountSignal {
        &self.drive
    }
}
