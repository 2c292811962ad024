//! Data room service.
//!
//! Ties the catalog repository and the artifact storage together and
//! enforces the hierarchy rules:
//! - parents and containing folders must exist
//! - folders with sub-folders cannot be deleted
//! - deleting a folder deletes the files it directly contains
//! - a file record is visible only once its artifact is fully written
//!
//! The repository sits behind one `RwLock`: lookups share it, and every
//! mutation (including a whole cascade) holds it exclusively.

use std::collections::HashSet;
use std::path::Path;

use chrono::Utc;
use tokio::io::AsyncRead;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::folder::{Folder, FolderUpdate, NewFolder};
use super::metadata::{FileMetadata, FileUpdate};
use super::repository::{CatalogRepository, MemoryCatalog};
use super::storage::FileStorage;
use super::types::FileCategory;
use super::{MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH};
use crate::{DataRoomError, Result};

/// Metadata for a file upload. The content is passed separately.
#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    /// Display name. Falls back to `original_filename` when blank.
    pub name: Option<String>,
    /// Name of the uploaded file as sent by the client.
    pub original_filename: Option<String>,
    /// Folder to place the file in (None = root).
    pub folder_id: Option<String>,
    /// Classification tags.
    pub categories: Vec<FileCategory>,
    /// File description.
    pub description: Option<String>,
}

impl UploadRequest {
    /// Create an empty upload request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the client-side filename.
    pub fn with_original_filename(mut self, filename: impl Into<String>) -> Self {
        self.original_filename = Some(filename.into());
        self
    }

    /// Place the file in a folder.
    pub fn in_folder(mut self, folder_id: impl Into<String>) -> Self {
        self.folder_id = Some(folder_id.into());
        self
    }

    /// Set the categories.
    pub fn with_categories(mut self, categories: Vec<FileCategory>) -> Self {
        self.categories = categories;
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The display name the file will be stored under.
    pub fn display_name(&self) -> Result<String> {
        let name = [&self.name, &self.original_filename]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .ok_or_else(|| DataRoomError::InvalidInput("file name is required".to_string()))?;

        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(DataRoomError::InvalidInput(format!(
                "file name must be at most {MAX_NAME_LENGTH} characters"
            )));
        }
        if name.chars().any(char::is_control) {
            return Err(DataRoomError::InvalidInput(
                "file name must not contain control characters".to_string(),
            ));
        }
        Ok(name.to_string())
    }
}

/// Result of a file download.
#[derive(Debug)]
pub struct DownloadResult {
    /// File metadata.
    pub metadata: FileMetadata,
    /// File content.
    pub content: Vec<u8>,
}

/// Hierarchy manager for folders and files.
pub struct DataRoomService<R: CatalogRepository = MemoryCatalog> {
    catalog: RwLock<R>,
    storage: FileStorage,
}

impl DataRoomService<MemoryCatalog> {
    /// Create a service backed by an empty in-memory catalog.
    pub fn new(storage: FileStorage) -> Self {
        Self::with_repository(MemoryCatalog::new(), storage)
    }
}

impl<R: CatalogRepository> DataRoomService<R> {
    /// Create a service over an existing repository.
    pub fn with_repository(repository: R, storage: FileStorage) -> Self {
        Self {
            catalog: RwLock::new(repository),
            storage,
        }
    }

    /// Get the artifact storage.
    pub fn storage(&self) -> &FileStorage {
        &self.storage
    }

    // ------------------------------------------------------------------
    // Folders
    // ------------------------------------------------------------------

    /// Create a folder.
    ///
    /// Fails with `NotFound` if the parent does not exist.
    pub async fn create_folder(&self, new_folder: NewFolder) -> Result<Folder> {
        let mut catalog = self.catalog.write().await;

        if let Some(ref parent_id) = new_folder.parent_id {
            if !catalog.folder_exists(parent_id) {
                return Err(DataRoomError::NotFound("parent folder".to_string()));
            }
        }

        let folder = new_folder.into_folder();
        catalog.insert_folder(folder.clone());

        tracing::info!(folder_id = %folder.id, name = %folder.name, "Folder created");
        Ok(folder)
    }

    /// List the direct children of `parent_id`, or root folders when `None`.
    ///
    /// An unknown `parent_id` yields an empty list rather than `NotFound`,
    /// unlike [`list_files`](Self::list_files).
    pub async fn list_folders(&self, parent_id: Option<&str>) -> Vec<Folder> {
        self.catalog.read().await.folders_by_parent(parent_id)
    }

    /// Get a folder by ID.
    pub async fn get_folder(&self, id: &str) -> Result<Folder> {
        self.catalog
            .read()
            .await
            .folder(id)
            .ok_or_else(|| DataRoomError::NotFound("folder".to_string()))
    }

    /// Get the chain of folders from the root down to `id` (inclusive).
    pub async fn folder_path(&self, id: &str) -> Result<Vec<Folder>> {
        let catalog = self.catalog.read().await;

        let mut path = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(id.to_string());

        while let Some(folder_id) = current {
            if !seen.insert(folder_id.clone()) {
                break;
            }
            match catalog.folder(&folder_id) {
                Some(folder) => {
                    current = folder.parent_id.clone();
                    path.push(folder);
                }
                None if path.is_empty() => {
                    return Err(DataRoomError::NotFound("folder".to_string()));
                }
                None => break,
            }
        }

        path.reverse();
        Ok(path)
    }

    /// Update a folder's name and/or parent.
    ///
    /// Fails with `NotFound` if the folder or the new parent does not exist,
    /// and with `InvalidInput` if the move would put the folder inside itself.
    pub async fn update_folder(&self, id: &str, update: FolderUpdate) -> Result<Folder> {
        let mut catalog = self.catalog.write().await;

        let mut folder = catalog
            .folder(id)
            .ok_or_else(|| DataRoomError::NotFound("folder".to_string()))?;

        if let Some(Some(ref parent_id)) = update.parent_id {
            if !catalog.folder_exists(parent_id) {
                return Err(DataRoomError::NotFound("parent folder".to_string()));
            }
            if Self::is_self_or_descendant(&*catalog, parent_id, id) {
                return Err(DataRoomError::InvalidInput(
                    "a folder cannot be moved into itself or one of its sub-folders".to_string(),
                ));
            }
        }

        update.apply_to(&mut folder);
        catalog.replace_folder(folder.clone());

        tracing::info!(folder_id = %folder.id, "Folder updated");
        Ok(folder)
    }

    /// Whether `candidate` is `ancestor` itself or lies beneath it.
    fn is_self_or_descendant(catalog: &R, candidate: &str, ancestor: &str) -> bool {
        let mut seen = HashSet::new();
        let mut current = Some(candidate.to_string());

        while let Some(folder_id) = current {
            if folder_id == ancestor {
                return true;
            }
            if !seen.insert(folder_id.clone()) {
                return false;
            }
            current = catalog.folder(&folder_id).and_then(|f| f.parent_id);
        }

        false
    }

    /// Delete a folder together with the files it directly contains.
    ///
    /// Fails with `NotFound` if absent and `NotEmpty` if any folder has it
    /// as parent. Artifact removal is best effort: a failure is logged and
    /// the cascade carries on. Returns the number of files removed.
    pub async fn delete_folder(&self, id: &str) -> Result<usize> {
        let mut catalog = self.catalog.write().await;

        if !catalog.folder_exists(id) {
            return Err(DataRoomError::NotFound("folder".to_string()));
        }
        if catalog.has_children(id) {
            return Err(DataRoomError::NotEmpty(
                "folder contains sub-folders and cannot be deleted".to_string(),
            ));
        }

        let files = catalog.files_in_folder(Some(id));
        let removed = files.len();
        for file in files {
            self.remove_file_locked(&mut *catalog, &file).await;
        }
        catalog.remove_folder(id);

        tracing::info!(folder_id = %id, files_removed = removed, "Folder deleted");
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Files
    // ------------------------------------------------------------------

    /// Upload a file.
    ///
    /// `content` is required; `None` or an empty stream fails with
    /// `InvalidInput`. The artifact is written before the record is inserted,
    /// and the containing folder is checked both before the write and again
    /// under the write lock.
    pub async fn create_file<C>(
        &self,
        request: UploadRequest,
        content: Option<C>,
    ) -> Result<FileMetadata>
    where
        C: AsyncRead + Unpin,
    {
        let Some(mut content) = content else {
            return Err(DataRoomError::InvalidInput(
                "file content is required".to_string(),
            ));
        };
        let name = request.display_name()?;
        if let Some(ref description) = request.description {
            if description.chars().count() > MAX_DESCRIPTION_LENGTH {
                return Err(DataRoomError::InvalidInput(format!(
                    "description must be at most {MAX_DESCRIPTION_LENGTH} characters"
                )));
            }
            if description
                .chars()
                .any(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t'))
            {
                return Err(DataRoomError::InvalidInput(
                    "description must not contain control characters".to_string(),
                ));
            }
        }

        if let Some(ref folder_id) = request.folder_id {
            if !self.catalog.read().await.folder_exists(folder_id) {
                return Err(DataRoomError::NotFound("folder".to_string()));
            }
        }

        let id = Uuid::new_v4().to_string();
        let (path, size) = self.storage.store(&id, &mut content).await?;
        drop(content);

        if size == 0 {
            self.discard_artifact(&path).await;
            return Err(DataRoomError::InvalidInput(
                "file content must not be empty".to_string(),
            ));
        }

        let mut catalog = self.catalog.write().await;

        if let Some(ref folder_id) = request.folder_id {
            if !catalog.folder_exists(folder_id) {
                drop(catalog);
                self.discard_artifact(&path).await;
                return Err(DataRoomError::NotFound("folder".to_string()));
            }
        }

        let now = Utc::now();
        let file = FileMetadata {
            id,
            file_type: FileStorage::derive_file_type(&name),
            name,
            size,
            folder_id: request.folder_id,
            categories: request.categories,
            path: path.to_string_lossy().into_owned(),
            description: request.description,
            created_at: now,
            updated_at: now,
        };
        catalog.insert_file(file.clone());

        tracing::info!(
            file_id = %file.id,
            name = %file.name,
            size = file.size,
            folder_id = ?file.folder_id,
            "File uploaded"
        );
        Ok(file)
    }

    /// List files in a folder, or every file when `folder_id` is `None`.
    ///
    /// Fails with `NotFound` for an unknown folder.
    pub async fn list_files(&self, folder_id: Option<&str>) -> Result<Vec<FileMetadata>> {
        let catalog = self.catalog.read().await;

        match folder_id {
            Some(folder_id) => {
                if !catalog.folder_exists(folder_id) {
                    return Err(DataRoomError::NotFound("folder".to_string()));
                }
                Ok(catalog.files_in_folder(Some(folder_id)))
            }
            None => Ok(catalog.all_files()),
        }
    }

    /// Get file metadata by ID.
    pub async fn get_file(&self, id: &str) -> Result<FileMetadata> {
        self.catalog
            .read()
            .await
            .file(id)
            .ok_or_else(|| DataRoomError::NotFound("file".to_string()))
    }

    /// Get file metadata and content.
    pub async fn download_file(&self, id: &str) -> Result<DownloadResult> {
        let catalog = self.catalog.read().await;

        let metadata = catalog
            .file(id)
            .ok_or_else(|| DataRoomError::NotFound("file".to_string()))?;
        let content = self.storage.load(&metadata.path).await?;

        Ok(DownloadResult { metadata, content })
    }

    /// Update file metadata.
    ///
    /// Fails with `NotFound` if the file or the new folder does not exist.
    pub async fn update_file(&self, id: &str, update: FileUpdate) -> Result<FileMetadata> {
        let mut catalog = self.catalog.write().await;

        let mut file = catalog
            .file(id)
            .ok_or_else(|| DataRoomError::NotFound("file".to_string()))?;

        if let Some(Some(ref folder_id)) = update.folder_id {
            if !catalog.folder_exists(folder_id) {
                return Err(DataRoomError::NotFound("folder".to_string()));
            }
        }

        update.apply_to(&mut file);
        catalog.replace_file(file.clone());

        tracing::info!(file_id = %file.id, "File updated");
        Ok(file)
    }

    /// Delete a file and its artifact.
    pub async fn delete_file(&self, id: &str) -> Result<()> {
        let mut catalog = self.catalog.write().await;

        let file = catalog
            .file(id)
            .ok_or_else(|| DataRoomError::NotFound("file".to_string()))?;
        self.remove_file_locked(&mut *catalog, &file).await;

        tracing::info!(file_id = %id, "File deleted");
        Ok(())
    }

    /// Remove the artifact, then the record. The record goes even when the
    /// artifact removal fails.
    async fn remove_file_locked(&self, catalog: &mut R, file: &FileMetadata) {
        if let Err(e) = self.storage.remove(&file.path).await {
            tracing::warn!(
                file_id = %file.id,
                path = %file.path,
                error = %e,
                "Failed to remove artifact; removing record anyway"
            );
        }
        catalog.remove_file(&file.id);
    }

    async fn discard_artifact(&self, path: &Path) {
        if let Err(e) = self.storage.remove(path).await {
            tracing::warn!(path = %path.display(), error = %e, "Failed to discard artifact");
        }
    }
}
