//! Folder types for the data room hierarchy.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::next_timestamp;

/// A folder in the data room.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Folder {
    /// Unique folder ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Parent folder ID (None for root folders).
    pub parent_id: Option<String>,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last modified.
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// Whether the folder sits at the root of the hierarchy.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Refresh `updated_at`, never moving it backwards.
    pub(crate) fn touch(&mut self) {
        self.updated_at = next_timestamp(self.updated_at);
    }
}

/// Data for creating a new folder.
#[derive(Debug, Clone)]
pub struct NewFolder {
    /// Folder name.
    pub name: String,
    /// Parent folder ID (None for root folders).
    pub parent_id: Option<String>,
}

impl NewFolder {
    /// Create a new root-level NewFolder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent_id: None,
        }
    }

    /// Set the parent folder.
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Materialize the record with a fresh id and both timestamps set to now.
    pub(crate) fn into_folder(self) -> Folder {
        let now = Utc::now();
        Folder {
            id: Uuid::new_v4().to_string(),
            name: self.name,
            parent_id: self.parent_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Builder for updating a folder.
///
/// `parent_id` is tri-state: `None` leaves the parent alone, `Some(None)`
/// moves the folder to the root, `Some(Some(id))` reparents it.
#[derive(Debug, Clone, Default)]
pub struct FolderUpdate {
    /// New folder name.
    pub name: Option<String>,
    /// New parent folder ID.
    pub parent_id: Option<Option<String>>,
}

impl FolderUpdate {
    /// Create a new FolderUpdate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the parent folder ID.
    pub fn parent_id(mut self, parent_id: Option<String>) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Apply the supplied fields and refresh `updated_at`.
    pub(crate) fn apply_to(self, folder: &mut Folder) {
        if let Some(name) = self.name {
            folder.name = name;
        }
        if let Some(parent_id) = self.parent_id {
            folder.parent_id = parent_id;
        }
        folder.touch();
    }
}
