use thiserror::Error;

/// Operation-level failures of a backup import.
///
/// Rejected records are not errors; they are counted in the import result.
#[derive(Error, Debug)]
pub enum BackupError {
    #[error("{0}")]
    InvalidArchive(String),

    #[error("Backup archive contains no JSON payload")]
    MissingPayload,

    #[error("Malformed backup payload: {0}")]
    MalformedPayload(String),

    #[error("Failed to read backup: {0}")]
    Io(#[from] std::io::Error),
}

impl From<zip::result::ZipError> for BackupError {
    fn from(err: zip::result::ZipError) -> Self {
        BackupError::InvalidArchive(err.to_string())
    }
}

impl From<serde_json::Error> for BackupError {
    fn from(err: serde_json::Error) -> Self {
        BackupError::MalformedPayload(err.to_string())
    }
}
