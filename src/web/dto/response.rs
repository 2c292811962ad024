//! Response DTOs for Web API.
//!
//! Folders and files are returned as the catalog records themselves.

use serde::Serialize;
use utoipa::ToSchema;

/// Body of `GET /`.
#[derive(Debug, Serialize, ToSchema)]
pub struct RootResponse {
    /// Service banner.
    pub message: String,
}

impl Default for RootResponse {
    fn default() -> Self {
        Self {
            message: "Virtual data room API".to_string(),
        }
    }
}
