//! Background runner for the legacy backup import.
//!
//! The runner owns a dedicated worker task. `start` moves the shared state to
//! `Importing` and hands the job to the worker over a channel, so callers never
//! wait for an import to finish. Phase changes are published on a watch channel
//! that the settings state aggregator subscribes to.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::sync::{mpsc, watch};
use tokio_stream::wrappers::WatchStream;

use super::{BackupImportState, BackupImporterTrait, BackupSource};

struct ImportJob {
    generation: u64,
    source: BackupSource,
}

/// State shared between the runner handle, the worker and revert timers.
struct ImportJobShared {
    state: watch::Sender<BackupImportState>,
    // Bumped on every accepted start. Only touched under the state's write lock.
    generation: AtomicU64,
}

impl ImportJobShared {
    /// Replaces the state with `next` if `generation` is still current and the
    /// present state satisfies `expected`. Check and write are one step.
    fn transition(
        &self,
        generation: u64,
        expected: impl FnOnce(&BackupImportState) -> bool,
        next: BackupImportState,
    ) -> bool {
        self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) == generation && expected(state) {
                *state = next;
                true
            } else {
                false
            }
        })
    }
}

/// Runs at most one backup import at a time.
pub struct ImportJobRunner {
    shared: Arc<ImportJobShared>,
    jobs: mpsc::UnboundedSender<ImportJob>,
}

impl ImportJobRunner {
    /// Spawns the import worker on the current Tokio runtime.
    ///
    /// `display_interval` is how long a Success or Error result stays visible
    /// before the state reverts to Idle.
    pub fn spawn(importer: Arc<dyn BackupImporterTrait>, display_interval: Duration) -> Self {
        let (state, _receiver) = watch::channel(BackupImportState::Idle);
        let shared = Arc::new(ImportJobShared {
            state,
            generation: AtomicU64::new(0),
        });
        let (jobs, rx) = mpsc::unbounded_channel();

        tokio::spawn(import_worker(rx, shared.clone(), importer, display_interval));

        Self { shared, jobs }
    }

    pub fn state(&self) -> BackupImportState {
        self.shared.state.borrow().clone()
    }

    /// Stream of states: the current one first, then one per transition.
    pub fn read(&self) -> WatchStream<BackupImportState> {
        WatchStream::new(self.shared.state.subscribe())
    }

    pub fn subscribe(&self) -> watch::Receiver<BackupImportState> {
        self.shared.state.subscribe()
    }

    /// Requests an import of `source`.
    ///
    /// Returns false and does nothing if an import is already running. A start
    /// while a previous result is still displayed is accepted and cancels that
    /// result's pending revert to Idle.
    pub fn start(&self, source: BackupSource) -> bool {
        let mut generation = 0;
        let accepted = self.shared.state.send_if_modified(|state| {
            if state.is_importing() {
                return false;
            }
            generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *state = BackupImportState::Importing;
            true
        });

        if !accepted {
            debug!("Backup import already running, ignoring start request");
            return false;
        }

        info!("Starting backup import #{} from {:?}", generation, source.path);
        if self.jobs.send(ImportJob { generation, source }).is_err() {
            error!("Backup import worker is not running");
            self.shared.transition(
                generation,
                BackupImportState::is_importing,
                BackupImportState::Error("Import worker is not running".to_string()),
            );
            return false;
        }
        true
    }
}

async fn import_worker(
    mut rx: mpsc::UnboundedReceiver<ImportJob>,
    shared: Arc<ImportJobShared>,
    importer: Arc<dyn BackupImporterTrait>,
    display_interval: Duration,
) {
    debug!("Backup import worker started");

    while let Some(ImportJob { generation, source }) = rx.recv().await {
        // Run in its own task so a panicking importer surfaces as an error state.
        let job_importer = importer.clone();
        let outcome = tokio::spawn(async move { job_importer.import_backup(source).await }).await;

        let finished = match outcome {
            Ok(Ok(result)) => {
                info!(
                    "Backup import #{} finished: {} imported, {} faulty transfers",
                    generation, result.imported, result.faulty_transfers
                );
                BackupImportState::Success(result.summary())
            }
            Ok(Err(err)) => {
                error!("Import error: {}", err);
                BackupImportState::Error(err.to_string())
            }
            Err(join_err) => {
                error!("Backup import #{} aborted: {}", generation, join_err);
                BackupImportState::Error(join_err.to_string())
            }
        };

        if !shared.transition(generation, BackupImportState::is_importing, finished) {
            warn!("Backup import #{} finished after being superseded", generation);
            continue;
        }

        let revert_shared = shared.clone();
        tokio::spawn(async move {
            tokio::time::sleep(display_interval).await;
            if revert_shared.transition(
                generation,
                BackupImportState::is_finished,
                BackupImportState::Idle,
            ) {
                debug!("Backup import #{} result cleared", generation);
            }
        });
    }

    debug!("Backup import worker shutting down");
}
