//! Dataroom - a virtual data room service
//!
//! Folders form a tree, files live in folders (or at the root), and every
//! file's content is stored on disk under its own id.

pub mod config;
pub mod error;
pub mod file;
pub mod logging;
pub mod web;

pub use config::Config;
pub use error::{DataRoomError, Result};
pub use file::{
    DataRoomService, FileCategory, FileMetadata, FileStorage, FileType, FileUpdate, Folder,
    FolderUpdate, NewFolder, UploadRequest,
};
pub use web::WebServer;
