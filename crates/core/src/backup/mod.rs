//! Backup module - legacy backup import and its background runner.

mod backup_errors;
mod backup_model;
mod backup_traits;
mod import_job;
mod legacy_json_importer;


pub use backup_errors::BackupError;
pub use backup_model::{BackupImportResult, BackupImportState, BackupSource};
pub use backup_traits::BackupImporterTrait;
pub use import_job::ImportJobRunner;
pub use legacy_json_importer::LegacyJsonBackupImporter;
