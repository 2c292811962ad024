//! API handlers for the data room.

pub mod file;
pub mod folder;

pub use file::*;
pub use folder::*;

use std::sync::Arc;

use crate::file::DataRoomService;

/// Shared state for all handlers.
pub struct AppState {
    /// Folder and file catalog.
    pub service: Arc<DataRoomService>,
    /// Maximum accepted upload size in bytes.
    pub max_upload_size: u64,
}

impl AppState {
    /// Create a new application state.
    pub fn new(service: Arc<DataRoomService>, max_upload_size: u64) -> Self {
        Self {
            service,
            max_upload_size,
        }
    }
}
