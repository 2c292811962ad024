//! Request DTOs for Web API.

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::validation::{no_control_chars, normalize_id, valid_name};
use crate::file::{parse_categories, FileUpdate, FolderUpdate, NewFolder};
use crate::Result;

/// Folder creation request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateFolderRequest {
    /// Folder name.
    #[validate(
        length(min = 1, max = 255, message = "Name must be 1-255 characters"),
        custom(function = "valid_name")
    )]
    pub name: String,
    /// Parent folder ID. Omitted, null or empty creates a root folder.
    #[serde(default)]
    pub parent_id: Option<String>,
}

impl CreateFolderRequest {
    /// Convert into the service-level input.
    pub fn into_new_folder(self) -> NewFolder {
        let folder = NewFolder::new(self.name);
        match normalize_id(self.parent_id) {
            Some(parent_id) => folder.with_parent(parent_id),
            None => folder,
        }
    }
}

/// Folder update request.
///
/// Omitted or null fields are left unchanged. An empty `parent_id` moves the
/// folder to the root.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateFolderRequest {
    /// New folder name.
    #[validate(
        length(min = 1, max = 255, message = "Name must be 1-255 characters"),
        custom(function = "valid_name")
    )]
    #[serde(default)]
    pub name: Option<String>,
    /// New parent folder ID.
    #[serde(default)]
    pub parent_id: Option<String>,
}

impl UpdateFolderRequest {
    /// Convert into the service-level update.
    pub fn into_update(self) -> FolderUpdate {
        let mut update = FolderUpdate::new();
        if let Some(name) = self.name {
            update = update.name(name);
        }
        if let Some(parent_id) = self.parent_id {
            update = update.parent_id(normalize_id(Some(parent_id)));
        }
        update
    }
}

/// File metadata update request.
///
/// Omitted or null fields are left unchanged. An empty `folder_id` moves the
/// file to the root and an empty `description` clears it.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateFileRequest {
    /// New display name.
    #[validate(
        length(min = 1, max = 255, message = "Name must be 1-255 characters"),
        custom(function = "valid_name")
    )]
    #[serde(default)]
    pub name: Option<String>,
    /// New containing folder.
    #[serde(default)]
    pub folder_id: Option<String>,
    /// Replacement categories.
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    /// New description.
    #[validate(
        length(max = 2000, message = "Description must be at most 2000 characters"),
        custom(function = "no_control_chars")
    )]
    #[serde(default)]
    pub description: Option<String>,
}

impl UpdateFileRequest {
    /// Convert into the service-level update.
    ///
    /// Fails with `InvalidInput` on an unknown category.
    pub fn into_update(self) -> Result<FileUpdate> {
        let mut update = FileUpdate::new();
        if let Some(name) = self.name {
            update = update.name(name);
        }
        if let Some(folder_id) = self.folder_id {
            update = update.folder_id(normalize_id(Some(folder_id)));
        }
        if let Some(categories) = self.categories {
            update = update.categories(parse_categories(&categories)?);
        }
        if let Some(description) = self.description {
            let description = Some(description).filter(|d| !d.trim().is_empty());
            update = update.description(description);
        }
        Ok(update)
    }
}

/// Query parameters for listing folders.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListFoldersQuery {
    /// Parent folder ID. Omitted or empty lists root folders.
    pub parent_id: Option<String>,
}

/// Query parameters for listing files.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListFilesQuery {
    /// Folder ID. Omitted or empty lists every file.
    pub folder_id: Option<String>,
}
