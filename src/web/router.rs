//! Router configuration for Web API.

use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::dto::{CreateFolderRequest, RootResponse, UpdateFileRequest, UpdateFolderRequest};
use super::handlers::{self, AppState};
use super::middleware::create_cors_layer;
use crate::file::{FileCategory, FileMetadata, FileType, Folder};

/// Room left for multipart framing and text fields on top of the file limit.
const MULTIPART_OVERHEAD: u64 = 1024 * 1024;

/// OpenAPI document for the data room API.
#[derive(OpenApi)]
#[openapi(
    info(title = "Virtual data room API"),
    paths(
        handlers::create_folder,
        handlers::list_folders,
        handlers::get_folder,
        handlers::get_folder_path,
        handlers::update_folder,
        handlers::delete_folder,
        handlers::upload_file,
        handlers::list_files,
        handlers::get_file,
        handlers::download_file,
        handlers::update_file,
        handlers::delete_file,
    ),
    components(schemas(
        Folder,
        FileMetadata,
        FileType,
        FileCategory,
        CreateFolderRequest,
        UpdateFolderRequest,
        UpdateFileRequest,
        RootResponse,
    )),
    tags(
        (name = "folders", description = "Folder hierarchy"),
        (name = "files", description = "File upload, metadata and download")
    )
)]
pub struct ApiDoc;

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let body_limit = app_state
        .max_upload_size
        .saturating_add(MULTIPART_OVERHEAD)
        .try_into()
        .unwrap_or(usize::MAX);

    Router::new()
        .route("/", get(root))
        .route(
            "/folders",
            get(handlers::list_folders).post(handlers::create_folder),
        )
        .route(
            "/folders/:id",
            get(handlers::get_folder)
                .put(handlers::update_folder)
                .delete(handlers::delete_folder),
        )
        .route("/folders/:id/path", get(handlers::get_folder_path))
        .route(
            "/files",
            get(handlers::list_files).post(handlers::upload_file),
        )
        .route(
            "/files/:id",
            get(handlers::get_file)
                .put(handlers::update_file)
                .delete(handlers::delete_file),
        )
        .route("/files/:id/download", get(handlers::download_file))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Create the Swagger UI router serving the OpenAPI document.
pub fn create_swagger_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

/// Root handler.
async fn root() -> Json<RootResponse> {
    Json(RootResponse::default())
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
