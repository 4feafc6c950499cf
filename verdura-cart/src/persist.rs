//! Cart persistence port
//!
//! The cart saves its durable projection after every mutation. The port
//! is an explicit seam so tests can verify persisted state without a
//! real storage backend; routine saves are fire-and-forget from the
//! store's point of view (failures are logged, never propagated).

use crate::item::PersistedLineItem;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Durable storage for the cart's persisted projection.
pub trait CartStorage: Send + Sync {
    fn save(&self, items: &[PersistedLineItem]) -> Result<(), StorageError>;
    fn load(&self) -> Result<Vec<PersistedLineItem>, StorageError>;
}

/// JSON-file storage under a fixed file name.
pub struct JsonCartFile {
    file_path: PathBuf,
}

impl JsonCartFile {
    /// Storage rooted at `dir`, written to `{dir}/cart.json`.
    pub fn new(dir: &Path) -> Self {
        Self {
            file_path: dir.join("cart.json"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

impl CartStorage for JsonCartFile {
    fn save(&self, items: &[PersistedLineItem]) -> Result<(), StorageError> {
        if let Some(parent) = self.file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(items)?;
        std::fs::write(&self.file_path, content)?;
        tracing::debug!(path = %self.file_path.display(), count = items.len(), "cart saved");
        Ok(())
    }

    fn load(&self) -> Result<Vec<PersistedLineItem>, StorageError> {
        if !self.file_path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.file_path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
