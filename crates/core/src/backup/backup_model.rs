//! Backup import domain models.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Progress of the legacy backup import as shown on the settings screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "status", content = "message", rename_all = "camelCase")]
pub enum BackupImportState {
    #[default]
    Idle,
    Importing,
    Success(String),
    Error(String),
}

impl BackupImportState {
    pub fn is_importing(&self) -> bool {
        matches!(self, BackupImportState::Importing)
    }

    /// Success or Error, i.e. a result waiting to be cleared.
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            BackupImportState::Success(_) | BackupImportState::Error(_)
        )
    }
}

/// Backup file chosen by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupSource {
    pub path: PathBuf,
}

impl BackupSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Outcome of a backup import that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BackupImportResult {
    /// Transactions written to storage
    pub imported: usize,
    /// Transfers that could not be validated and were skipped
    pub faulty_transfers: usize,
}

impl BackupImportResult {
    pub fn summary(&self) -> String {
        format!("Faulty transfers: {}", self.faulty_transfers)
    }
}
