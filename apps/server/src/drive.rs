use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use budgetbook_core::drive::{DriveConnectorTrait, DriveStorageTrait};
use budgetbook_core::errors::{Error, Result};

/// Drive backed by a local folder. Mounting creates the folder.
pub struct LocalFolderDrive {
    root: PathBuf,
}

impl LocalFolderDrive {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &Path) -> Result<PathBuf> {
        let inside_root = path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !inside_root {
            return Err(Error::Drive(format!(
                "Path {} is outside the drive",
                path.display()
            )));
        }
        Ok(self.root.join(path))
    }
}

#[async_trait]
impl DriveConnectorTrait for LocalFolderDrive {
    async fn connect(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            Error::Drive(format!("Cannot mount {}: {}", self.root.display(), e))
        })?;
        tracing::info!("Drive folder ready at {}", self.root.display());
        Ok(())
    }
}

#[async_trait]
impl DriveStorageTrait for LocalFolderDrive {
    async fn write(&self, path: &Path, content: &str) -> Result<()> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, content).await?;
        Ok(())
    }
}
