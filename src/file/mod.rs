//! Data room catalog.
//!
//! This module provides:
//! - Hierarchical folder structure with referential checks
//! - File metadata with type and category classification
//! - Artifact storage named by file id
//! - A service tying the catalog and the storage together

mod folder;
mod metadata;
mod repository;
mod service;
mod storage;
mod types;

use chrono::{DateTime, Duration, Utc};

pub use folder::{Folder, FolderUpdate, NewFolder};
pub use metadata::{FileMetadata, FileUpdate};
pub use repository::{CatalogRepository, MemoryCatalog};
pub use service::{DataRoomService, DownloadResult, UploadRequest};
pub use storage::FileStorage;
pub use types::{parse_categories, FileCategory, FileType};

/// Maximum length for folder and file names (in characters).
pub const MAX_NAME_LENGTH: usize = 255;

/// Maximum length for file descriptions (in characters).
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;

/// Next `updated_at` value: now, but strictly after `previous`.
pub(crate) fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}
