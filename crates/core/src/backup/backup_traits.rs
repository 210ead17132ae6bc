use async_trait::async_trait;

use super::{BackupImportResult, BackupSource};
use crate::errors::Result;

/// Imports a user-chosen backup into storage.
///
/// Records that fail validation are skipped and counted in the result; an
/// `Err` means the backup as a whole could not be processed.
#[async_trait]
pub trait BackupImporterTrait: Send + Sync {
    async fn import_backup(&self, source: BackupSource) -> Result<BackupImportResult>;
}
