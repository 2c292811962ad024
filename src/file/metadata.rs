//! File metadata types for the data room.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::next_timestamp;
use super::types::{FileCategory, FileType};

/// Metadata record of an uploaded file.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FileMetadata {
    /// Unique file ID.
    pub id: String,
    /// Display name, independent of the uploaded file's original name.
    pub name: String,
    /// Byte length of the stored artifact.
    pub size: u64,
    /// Declared type derived from the display name.
    pub file_type: FileType,
    /// Containing folder (None for files at the root).
    pub folder_id: Option<String>,
    /// Classification tags, in the order they were supplied.
    pub categories: Vec<FileCategory>,
    /// Storage location of the artifact, derived from `id`.
    pub path: String,
    /// Free-text description.
    pub description: Option<String>,
    /// When the file was uploaded.
    pub created_at: DateTime<Utc>,
    /// When the metadata was last modified.
    pub updated_at: DateTime<Utc>,
}

impl FileMetadata {
    pub(crate) fn touch(&mut self) {
        self.updated_at = next_timestamp(self.updated_at);
    }
}

/// Builder for updating file metadata.
///
/// `folder_id` and `description` are tri-state: `Some(None)` clears the value.
#[derive(Debug, Clone, Default)]
pub struct FileUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New containing folder.
    pub folder_id: Option<Option<String>>,
    /// Replacement category set.
    pub categories: Option<Vec<FileCategory>>,
    /// New description.
    pub description: Option<Option<String>>,
}

impl FileUpdate {
    /// Create a new FileUpdate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the folder ID.
    pub fn folder_id(mut self, folder_id: Option<String>) -> Self {
        self.folder_id = Some(folder_id);
        self
    }

    /// Replace the categories.
    pub fn categories(mut self, categories: Vec<FileCategory>) -> Self {
        self.categories = Some(categories);
        self
    }

    /// Set the description.
    pub fn description(mut self, description: Option<impl Into<String>>) -> Self {
        self.description = Some(description.map(|s| s.into()));
        self
    }

    /// Apply the supplied fields and refresh `updated_at`.
    ///
    /// `file_type` stays tied to the uploaded artifact and is not re-derived
    /// on rename.
    pub(crate) fn apply_to(self, file: &mut FileMetadata) {
        if let Some(name) = self.name {
            file.name = name;
        }
        if let Some(folder_id) = self.folder_id {
            file.folder_id = folder_id;
        }
        if let Some(categories) = self.categories {
            file.categories = categories;
        }
        if let Some(description) = self.description {
            file.description = description;
        }
        file.touch();
    }
}
