//! File handlers for Web API.

use axum::{
    body::Body,
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use std::sync::Arc;

use crate::file::{parse_categories, FileMetadata, UploadRequest};
use crate::web::dto::validation::normalize_id;
use crate::web::dto::{ListFilesQuery, UpdateFileRequest, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// Generate a safe Content-Disposition header value for file downloads.
///
/// This function sanitizes the filename to prevent header injection attacks
/// and uses RFC 5987 encoding for non-ASCII filenames.
///
/// # Security
///
/// The function:
/// - Removes control characters (including CR, LF which could cause header injection)
/// - Escapes double quotes and backslashes
/// - Uses RFC 5987 filename* parameter for proper Unicode support
fn content_disposition_header(filename: &str) -> String {
    let sanitized: String = filename
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            '"' | '\\' => '_',
            _ => c,
        })
        .collect();

    if filename.is_ascii() && !filename.chars().any(|c| c.is_control() || c == '"' || c == '\\') {
        return format!("attachment; filename=\"{}\"", filename);
    }

    let encoded = urlencoding::encode(filename);

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        sanitized, encoded
    )
}

/// Split repeated and/or comma separated category fields into tags.
fn split_categories(raw: &[String]) -> Vec<&str> {
    raw.iter()
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// POST /files - Upload a file.
///
/// Request body: multipart/form-data with a required "file" field and optional
/// "name", "folder_id", "categories" and "description" fields.
#[utoipa::path(
    post,
    path = "/files",
    tag = "files",
    responses(
        (status = 201, description = "File uploaded", body = FileMetadata),
        (status = 400, description = "Missing or empty content, invalid name or description, unknown category, or file too large"),
        (status = 404, description = "Folder not found")
    )
)]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<FileMetadata>), ApiError> {
    let mut request = UploadRequest::new();
    let mut raw_categories: Vec<String> = Vec::new();
    let mut content: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::warn!("Failed to read multipart field: {}", e);
        ApiError::bad_request("Invalid multipart data")
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                request.original_filename = field.file_name().map(|s| s.to_string());
                let bytes = field.bytes().await.map_err(|e| {
                    tracing::warn!("Failed to read file content: {}", e);
                    ApiError::bad_request("Failed to read file")
                })?;

                if bytes.len() as u64 > state.max_upload_size {
                    let max_mb = state.max_upload_size / 1024 / 1024;
                    return Err(ApiError::bad_request(format!(
                        "File too large (max {}MB)",
                        max_mb
                    )));
                }
                content = Some(bytes.to_vec());
            }
            "name" | "folder_id" | "categories" | "description" => {
                let value = field.text().await.map_err(|e| {
                    tracing::warn!("Failed to read field {}: {}", field_name, e);
                    ApiError::bad_request(format!("Invalid {}", field_name))
                })?;

                match field_name.as_str() {
                    "name" => request.name = Some(value),
                    "folder_id" => request.folder_id = normalize_id(Some(value)),
                    "categories" => raw_categories.push(value),
                    _ => request.description = Some(value).filter(|d| !d.trim().is_empty()),
                }
            }
            _ => {}
        }
    }

    request.categories = parse_categories(&split_categories(&raw_categories))?;

    let file = state
        .service
        .create_file(request, content.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(file)))
}

/// GET /files - List files in a folder, or every file.
#[utoipa::path(
    get,
    path = "/files",
    tag = "files",
    params(ListFilesQuery),
    responses(
        (status = 200, description = "Files in upload order", body = [FileMetadata]),
        (status = 404, description = "Folder not found")
    )
)]
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListFilesQuery>,
) -> Result<Json<Vec<FileMetadata>>, ApiError> {
    let folder_id = normalize_id(query.folder_id);
    Ok(Json(state.service.list_files(folder_id.as_deref()).await?))
}

/// GET /files/:id - Get file metadata.
#[utoipa::path(
    get,
    path = "/files/{id}",
    tag = "files",
    params(
        ("id" = String, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File metadata", body = FileMetadata),
        (status = 404, description = "File not found")
    )
)]
pub async fn get_file(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<FileMetadata>, ApiError> {
    Ok(Json(state.service.get_file(&id).await?))
}

/// GET /files/:id/download - Download a file.
#[utoipa::path(
    get,
    path = "/files/{id}/download",
    tag = "files",
    params(
        ("id" = String, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File content", content_type = "application/octet-stream"),
        (status = 404, description = "File not found"),
        (status = 500, description = "Stored content could not be read")
    )
)]
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response<Body>, ApiError> {
    let download = state.service.download_file(&id).await?;

    Response::builder()
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_header(&download.metadata.name),
        )
        .header(header::CONTENT_LENGTH, download.content.len())
        .body(Body::from(download.content))
        .map_err(|e| {
            tracing::error!("Failed to build response: {}", e);
            ApiError::internal("Failed to build response")
        })
}

/// PUT /files/:id - Update file metadata.
#[utoipa::path(
    put,
    path = "/files/{id}",
    tag = "files",
    params(
        ("id" = String, Path, description = "File ID")
    ),
    request_body = UpdateFileRequest,
    responses(
        (status = 200, description = "File updated", body = FileMetadata),
        (status = 400, description = "Unknown category"),
        (status = 404, description = "File or new folder not found"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn update_file(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateFileRequest>,
) -> Result<Json<FileMetadata>, ApiError> {
    let update = req.into_update()?;
    Ok(Json(state.service.update_file(&id, update).await?))
}

/// DELETE /files/:id - Delete a file and its content.
#[utoipa::path(
    delete,
    path = "/files/{id}",
    tag = "files",
    params(
        ("id" = String, Path, description = "File ID")
    ),
    responses(
        (status = 204, description = "File deleted"),
        (status = 404, description = "File not found")
    )
)]
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.service.delete_file(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
