//! Catalog repository: the storage port behind the data room hierarchy.
//!
//! The service keeps one repository behind a single lock, so implementations
//! are plain synchronous collections and need no interior locking. Mutating
//! methods take `&mut self`; lookups return owned clones.

use std::collections::HashMap;

use super::folder::Folder;
use super::metadata::FileMetadata;

/// Trait for folder and file record storage.
///
/// Implementations only store and retrieve records. Referential checks
/// (unknown parents, non-empty folders, cascades) live in the service.
pub trait CatalogRepository: Send + Sync {
    /// Store a new folder.
    fn insert_folder(&mut self, folder: Folder);

    /// Get a folder by ID.
    fn folder(&self, id: &str) -> Option<Folder>;

    /// Check whether a folder exists.
    fn folder_exists(&self, id: &str) -> bool {
        self.folder(id).is_some()
    }

    /// List folders whose parent equals `parent_id` (`None` = root folders).
    fn folders_by_parent(&self, parent_id: Option<&str>) -> Vec<Folder>;

    /// List every folder regardless of parent.
    fn all_folders(&self) -> Vec<Folder>;

    /// Check whether any folder has `id` as its parent.
    fn has_children(&self, id: &str) -> bool {
        self.all_folders()
            .iter()
            .any(|f| f.parent_id.as_deref() == Some(id))
    }

    /// Replace an existing folder record. Returns false if it was absent.
    fn replace_folder(&mut self, folder: Folder) -> bool;

    /// Remove a folder record.
    fn remove_folder(&mut self, id: &str) -> Option<Folder>;

    /// Store a new file record.
    fn insert_file(&mut self, file: FileMetadata);

    /// Get a file by ID.
    fn file(&self, id: &str) -> Option<FileMetadata>;

    /// List files whose folder equals `folder_id` (`None` = root files).
    fn files_in_folder(&self, folder_id: Option<&str>) -> Vec<FileMetadata>;

    /// List every file regardless of folder.
    fn all_files(&self) -> Vec<FileMetadata>;

    /// Replace an existing file record. Returns false if it was absent.
    fn replace_file(&mut self, file: FileMetadata) -> bool;

    /// Remove a file record.
    fn remove_file(&mut self, id: &str) -> Option<FileMetadata>;
}

/// A record plus its insertion sequence, used to keep listings stable.
#[derive(Debug, Clone)]
struct Entry<T> {
    seq: u64,
    record: T,
}

/// In-memory catalog keyed by id. Contents live for the process lifetime.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    folders: HashMap<String, Entry<Folder>>,
    files: HashMap<String, Entry<FileMetadata>>,
    next_seq: u64,
}

impl MemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of folders.
    pub fn folder_count(&self) -> usize {
        self.folders.len()
    }

    /// Number of files.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    fn bump(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    fn sorted<T: Clone>(mut entries: Vec<&Entry<T>>) -> Vec<T> {
        entries.sort_by_key(|e| e.seq);
        entries.into_iter().map(|e| e.record.clone()).collect()
    }
}

impl CatalogRepository for MemoryCatalog {
    fn insert_folder(&mut self, folder: Folder) {
        let seq = self.bump();
        self.folders
            .insert(folder.id.clone(), Entry { seq, record: folder });
    }

    fn folder(&self, id: &str) -> Option<Folder> {
        self.folders.get(id).map(|e| e.record.clone())
    }

    fn folder_exists(&self, id: &str) -> bool {
        self.folders.contains_key(id)
    }

    fn folders_by_parent(&self, parent_id: Option<&str>) -> Vec<Folder> {
        Self::sorted(
            self.folders
                .values()
                .filter(|e| e.record.parent_id.as_deref() == parent_id)
                .collect(),
        )
    }

    fn all_folders(&self) -> Vec<Folder> {
        Self::sorted(self.folders.values().collect())
    }

    fn replace_folder(&mut self, folder: Folder) -> bool {
        match self.folders.get_mut(&folder.id) {
            Some(entry) => {
                entry.record = folder;
                true
            }
            None => false,
        }
    }

    fn remove_folder(&mut self, id: &str) -> Option<Folder> {
        self.folders.remove(id).map(|e| e.record)
    }

    fn insert_file(&mut self, file: FileMetadata) {
        let seq = self.bump();
        self.files.insert(file.id.clone(), Entry { seq, record: file });
    }

    fn file(&self, id: &str) -> Option<FileMetadata> {
        self.files.get(id).map(|e| e.record.clone())
    }

    fn files_in_folder(&self, folder_id: Option<&str>) -> Vec<FileMetadata> {
        Self::sorted(
            self.files
                .values()
                .filter(|e| e.record.folder_id.as_deref() == folder_id)
                .collect(),
        )
    }

    fn all_files(&self) -> Vec<FileMetadata> {
        Self::sorted(self.files.values().collect())
    }

    fn replace_file(&mut self, file: FileMetadata) -> bool {
        match self.files.get_mut(&file.id) {
            Some(entry) => {
                entry.record = file;
                true
            }
            None => false,
        }
    }

    fn remove_file(&mut self, id: &str) -> Option<FileMetadata> {
        self.files.remove(id).map(|e| e.record)
    }
}
