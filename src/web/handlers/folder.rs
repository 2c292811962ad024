//! Folder handlers for Web API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::file::Folder;
use crate::web::dto::validation::normalize_id;
use crate::web::dto::{CreateFolderRequest, ListFoldersQuery, UpdateFolderRequest, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// POST /folders - Create a folder.
#[utoipa::path(
    post,
    path = "/folders",
    tag = "folders",
    request_body = CreateFolderRequest,
    responses(
        (status = 201, description = "Folder created", body = Folder),
        (status = 404, description = "Parent folder not found"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn create_folder(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<CreateFolderRequest>,
) -> Result<(StatusCode, Json<Folder>), ApiError> {
    let folder = state.service.create_folder(req.into_new_folder()).await?;
    Ok((StatusCode::CREATED, Json(folder)))
}

/// GET /folders - List folders under a parent, or root folders.
///
/// An unknown `parent_id` yields an empty list.
#[utoipa::path(
    get,
    path = "/folders",
    tag = "folders",
    params(ListFoldersQuery),
    responses(
        (status = 200, description = "Child folders in creation order", body = [Folder])
    )
)]
pub async fn list_folders(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListFoldersQuery>,
) -> Json<Vec<Folder>> {
    let parent_id = normalize_id(query.parent_id);
    Json(state.service.list_folders(parent_id.as_deref()).await)
}

/// GET /folders/:id - Get folder details.
#[utoipa::path(
    get,
    path = "/folders/{id}",
    tag = "folders",
    params(
        ("id" = String, Path, description = "Folder ID")
    ),
    responses(
        (status = 200, description = "Folder details", body = Folder),
        (status = 404, description = "Folder not found")
    )
)]
pub async fn get_folder(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Folder>, ApiError> {
    Ok(Json(state.service.get_folder(&id).await?))
}

/// GET /folders/:id/path - Folders from the root down to this one.
#[utoipa::path(
    get,
    path = "/folders/{id}/path",
    tag = "folders",
    params(
        ("id" = String, Path, description = "Folder ID")
    ),
    responses(
        (status = 200, description = "Breadcrumb, root first", body = [Folder]),
        (status = 404, description = "Folder not found")
    )
)]
pub async fn get_folder_path(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Folder>>, ApiError> {
    Ok(Json(state.service.folder_path(&id).await?))
}

/// PUT /folders/:id - Rename and/or move a folder.
#[utoipa::path(
    put,
    path = "/folders/{id}",
    tag = "folders",
    params(
        ("id" = String, Path, description = "Folder ID")
    ),
    request_body = UpdateFolderRequest,
    responses(
        (status = 200, description = "Folder updated", body = Folder),
        (status = 400, description = "Move would create a cycle"),
        (status = 404, description = "Folder or new parent not found"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn update_folder(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateFolderRequest>,
) -> Result<Json<Folder>, ApiError> {
    Ok(Json(state.service.update_folder(&id, req.into_update()).await?))
}

/// DELETE /folders/:id - Delete a folder and the files it contains.
#[utoipa::path(
    delete,
    path = "/folders/{id}",
    tag = "folders",
    params(
        ("id" = String, Path, description = "Folder ID")
    ),
    responses(
        (status = 204, description = "Folder deleted"),
        (status = 400, description = "Folder has sub-folders"),
        (status = 404, description = "Folder not found")
    )
)]
pub async fn delete_folder(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.service.delete_folder(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
