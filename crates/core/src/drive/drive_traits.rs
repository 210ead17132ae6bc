//! Collaborator traits for the external cloud drive.

use std::path::Path;

use async_trait::async_trait;

use crate::errors::Result;

/// Performs the mount handshake with the cloud drive.
#[async_trait]
pub trait DriveConnectorTrait: Send + Sync {
    /// Completes once the drive is mounted; an error leaves it unmounted.
    async fn connect(&self) -> Result<()>;
}

/// File access on a mounted drive.
#[async_trait]
pub trait DriveStorageTrait: Send + Sync {
    async fn write(&self, path: &Path, content: &str) -> Result<()>;
}
