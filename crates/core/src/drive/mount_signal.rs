use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{error, info, warn};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use super::DriveConnectorTrait;

/// Whether the cloud drive is mounted.
///
/// `connect` only starts the handshake; its outcome shows up on the signal.
#[derive(Clone)]
pub struct DriveMountSignal {
    connector: Arc<dyn DriveConnectorTrait>,
    mounted: Arc<watch::Sender<bool>>,
    connecting: Arc<AtomicBool>,
}

impl DriveMountSignal {
    pub fn new(connector: Arc<dyn DriveConnectorTrait>) -> Self {
        let (mounted, _receiver) = watch::channel(false);
        Self {
            connector,
            mounted: Arc::new(mounted),
            connecting: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_mounted(&self) -> bool {
        *self.mounted.borrow()
    }

    /// Stream of mount states: the current one first, then one per change.
    pub fn read(&self) -> WatchStream<bool> {
        WatchStream::new(self.mounted.subscribe())
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.mounted.subscribe()
    }

    /// Starts the mount handshake in the background.
    ///
    /// Calls made while a handshake is in flight or after the drive is mounted
    /// are ignored. Must be called from within a Tokio runtime.
    pub fn connect(&self) {
        if self.is_mounted() {
            return;
        }
        if self
            .connecting
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            info!("Drive handshake already in progress");
            return;
        }

        let connector = self.connector.clone();
        let mounted = self.mounted.clone();
        let connecting = self.connecting.clone();
        tokio::spawn(async move {
            // Nested so a panicking connector still clears `connecting`.
            let outcome = tokio::spawn(async move { connector.connect().await }).await;
            match outcome {
                Ok(Ok(())) => {
                    info!("Drive mounted");
                    mounted.send_replace(true);
                }
                Ok(Err(e)) => warn!("Drive handshake failed: {}", e),
                Err(e) => error!("Drive handshake aborted: {}", e),
            }
            connecting.store(false, Ordering::SeqCst);
        });
    }
}
