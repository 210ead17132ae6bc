use std::path::Path;
use std::sync::Arc;

use log::{debug, error, info, warn};
use tokio::sync::{mpsc, oneshot};

use super::screen_model::SettingsEvent;
use crate::backup::ImportJobRunner;
use crate::constants::DRIVE_PROBE_PATH;
use crate::drive::{DriveMountSignal, DriveStorageTrait};
use crate::errors::{Error, Result};
use crate::navigation::{Destination, NavigatorTrait};
use crate::settings::SettingsServiceTrait;

type Reply = oneshot::Sender<Result<()>>;
type Envelope = (SettingsEvent, Option<Reply>);

/// Routes each settings intent to the collaborator that owns it.
pub struct SettingsEventDispatcher {
    settings: Arc<dyn SettingsServiceTrait>,
    import_runner: Arc<ImportJobRunner>,
    drive: DriveMountSignal,
    drive_storage: Arc<dyn DriveStorageTrait>,
    navigator: Arc<dyn NavigatorTrait>,
}

impl SettingsEventDispatcher {
    pub fn new(
        settings: Arc<dyn SettingsServiceTrait>,
        import_runner: Arc<ImportJobRunner>,
        drive: DriveMountSignal,
        drive_storage: Arc<dyn DriveStorageTrait>,
        navigator: Arc<dyn NavigatorTrait>,
    ) -> Self {
        Self {
            settings,
            import_runner,
            drive,
            drive_storage,
            navigator,
        }
    }

    /// Handles one intent.
    ///
    /// Preference writes complete before this returns. Import and mount only
    /// start their work; the outcome shows up on the state stream.
    pub async fn handle_event(&self, event: SettingsEvent) -> Result<()> {
        debug!("Handling settings event: {:?}", event);
        match event {
            SettingsEvent::Back => self.navigator.back(),
            SettingsEvent::BaseCurrencyChange { new_currency } => {
                self.settings.update_base_currency(&new_currency).await?
            }
            SettingsEvent::StartDayOfMonth { start_day_of_month } => {
                self.settings
                    .update_start_day_of_month(start_day_of_month)
                    .await?
            }
            SettingsEvent::HideBalance { hide_balance } => {
                self.settings.update_hide_balance(hide_balance).await?
            }
            SettingsEvent::AppLocked { app_locked } => {
                self.settings.update_app_locked(app_locked).await?
            }
            SettingsEvent::ImportOldData { source } => {
                // The runner logs why a start was refused.
                if !self.import_runner.start(source) {
                    info!("Backup import request not started");
                }
            }
            SettingsEvent::MountDrive => self.mount_drive(),
            SettingsEvent::AddFrame => self.navigator.navigate(Destination::AddFrame),
        }
        Ok(())
    }

    fn mount_drive(&self) {
        if !self.drive.is_mounted() {
            self.drive.connect();
            return;
        }

        // Already mounted: write a probe file so the sync folder can be checked.
        let storage = self.drive_storage.clone();
        tokio::spawn(async move {
            let content = chrono::Local::now().to_rfc3339();
            match storage.write(Path::new(DRIVE_PROBE_PATH), &content).await {
                Ok(()) => debug!("Drive probe written to {}", DRIVE_PROBE_PATH),
                Err(e) => warn!("Drive probe write failed: {}", e),
            }
        });
    }

    /// Moves the dispatcher onto a task that handles queued events one at a
    /// time, in arrival order.
    pub fn spawn(self, capacity: usize) -> SettingsEventSender {
        let (tx, mut rx) = mpsc::channel::<Envelope>(capacity.max(1));
        tokio::spawn(async move {
            while let Some((event, reply)) = rx.recv().await {
                let result = self.handle_event(event).await;
                if let Err(e) = &result {
                    warn!("Settings event failed: {}", e);
                }
                if let Some(reply) = reply {
                    // The caller may have stopped waiting.
                    let _ = reply.send(result);
                }
            }
            debug!("Settings event queue closed");
        });
        SettingsEventSender { tx }
    }
}

/// Handle for submitting intents to a running dispatcher.
#[derive(Clone)]
pub struct SettingsEventSender {
    tx: mpsc::Sender<Envelope>,
}

impl SettingsEventSender {
    /// Queues `event` without waiting for it to be handled. Failures are logged.
    pub async fn send(&self, event: SettingsEvent) -> Result<()> {
        self.tx.send((event, None)).await.map_err(|_| stopped())
    }

    /// Queues `event` and waits until it has been handled.
    pub async fn dispatch(&self, event: SettingsEvent) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send((event, Some(reply_tx)))
            .await
            .map_err(|_| stopped())?;
        reply_rx.await.map_err(|_| stopped())?
    }
}

fn stopped() -> Error {
    error!("Settings event dispatcher is not running");
    Error::Unexpected("Settings event dispatcher is not running".to_string())
}
