//! Artifact storage for the data room.
//!
//! Every file record owns exactly one artifact stored flat under the base
//! directory and named by the file id:
//! ```text
//! {base_path}/
//! ├── 0b6f2c1e-5a7d-4a43-9d0e-3c1f8f0b9e21
//! ├── 7d9a0c44-18e2-4bb5-8f57-1e6d2a3c4b5f
//! └── ...
//! ```
//! The display name never reaches the filesystem, so user input cannot
//! collide with another artifact or escape the base directory.

use std::io;
use std::path::{Component, Path, PathBuf};

use tokio::fs;
use tokio::io::{AsyncRead, AsyncWriteExt};

use super::types::FileType;
use crate::{DataRoomError, Result};

/// Suffix for artifacts still being written.
const PARTIAL_SUFFIX: &str = ".part";

/// Binds file records to on-disk artifacts.
#[derive(Debug, Clone)]
pub struct FileStorage {
    /// Base directory for artifacts.
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new FileStorage with the given base path.
    ///
    /// The base directory will be created if it doesn't exist.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        std::fs::create_dir_all(&base_path)?;

        Ok(Self { base_path })
    }

    /// Get the base path of this storage.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Classify a display name by its extension.
    pub fn derive_file_type(display_name: &str) -> FileType {
        Path::new(display_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(FileType::from_extension)
            .unwrap_or(FileType::Other)
    }

    /// Path of the artifact for a file id.
    ///
    /// The id must be a single plain path component.
    pub fn artifact_path(&self, file_id: &str) -> Result<PathBuf> {
        let mut components = Path::new(file_id).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(part)), None) if part == file_id => {
                Ok(self.base_path.join(file_id))
            }
            _ => Err(DataRoomError::InvalidInput(format!(
                "invalid file id: {file_id:?}"
            ))),
        }
    }

    /// Write the full content of `reader` as the artifact of `file_id`.
    ///
    /// Bytes go to a temporary `.part` file which is flushed, synced, and then
    /// renamed into place, so a failed upload never leaves an artifact at the
    /// final path. Returns the artifact path and its size on disk.
    pub async fn store<R>(&self, file_id: &str, reader: &mut R) -> Result<(PathBuf, u64)>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let final_path = self.artifact_path(file_id)?;
        let part_path = self
            .base_path
            .join(format!("{file_id}{PARTIAL_SUFFIX}"));

        fs::create_dir_all(&self.base_path).await?;

        if let Err(e) = Self::write_partial(&part_path, reader).await {
            Self::discard(&part_path).await;
            return Err(e);
        }

        if let Err(e) = fs::rename(&part_path, &final_path).await {
            Self::discard(&part_path).await;
            return Err(e.into());
        }

        let size = fs::metadata(&final_path).await?.len();
        tracing::debug!(file_id, size, path = %final_path.display(), "Stored artifact");

        Ok((final_path, size))
    }

    async fn write_partial<R>(path: &Path, reader: &mut R) -> Result<u64>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let mut file = fs::File::create(path).await?;
        let written = tokio::io::copy(reader, &mut file).await?;
        file.flush().await?;
        file.sync_all().await?;
        Ok(written)
    }

    async fn discard(path: &Path) {
        if let Err(e) = fs::remove_file(path).await {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!(path = %path.display(), error = %e, "Failed to discard partial artifact");
            }
        }
    }

    /// Read an artifact.
    ///
    /// A cataloged file always has an artifact, so a missing one is an I/O
    /// error rather than `NotFound`. The path is only logged.
    pub async fn load(&self, path: impl AsRef<Path>) -> Result<Vec<u8>> {
        let path = path.as_ref();
        fs::read(path).await.map_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "Failed to read artifact");
            DataRoomError::Io(e)
        })
    }

    /// Delete an artifact.
    ///
    /// Returns `true` if the artifact was deleted, `false` if it didn't exist.
    pub async fn remove(&self, path: impl AsRef<Path>) -> Result<bool> {
        match fs::remove_file(path.as_ref()).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Check if an artifact exists.
    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        path.as_ref().is_file()
    }
}
