//! Web API Folder/File Tests
//!
//! Integration tests for the data room HTTP surface.

use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use dataroom::file::{DataRoomService, FileStorage};
use dataroom::WebServer;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Create a test server with a fresh catalog and storage directory.
fn create_test_server() -> (TestServer, TempDir) {
    create_test_server_with_limit(10 * 1024 * 1024)
}

fn create_test_server_with_limit(max_upload_size: u64) -> (TestServer, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let storage =
        FileStorage::new(temp_dir.path().join("dataroom")).expect("Failed to create storage");
    let service = Arc::new(DataRoomService::new(storage));

    let web = WebServer::with_service(
        "127.0.0.1:0".parse().unwrap(),
        service,
        max_upload_size,
        vec![],
    );
    let server = TestServer::new(web.router()).expect("Failed to create test server");

    (server, temp_dir)
}

async fn create_folder(server: &TestServer, name: &str, parent_id: Option<&str>) -> Value {
    let response = server
        .post("/folders")
        .json(&json!({ "name": name, "parent_id": parent_id }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()
}

async fn upload(server: &TestServer, filename: &str, folder_id: Option<&str>, body: &[u8]) -> Value {
    let mut form = MultipartForm::new()
        .add_part("file", Part::bytes(body.to_vec()).file_name(filename));
    if let Some(folder_id) = folder_id {
        form = form.add_text("folder_id", folder_id);
    }

    let response = server.post("/files").multipart(form).await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()
}

fn id_of(value: &Value) -> String {
    value["id"].as_str().unwrap().to_string()
}

// ============================================================================
// Service endpoints
// ============================================================================

#[tokio::test]
async fn test_root_message() {
    let (server, _dir) = create_test_server();

    let response = server.get("/").await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>(),
        json!({ "message": "Virtual data room API" })
    );
}

#[tokio::test]
async fn test_health_check() {
    let (server, _dir) = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    assert_eq!(response.text(), "OK");
}

#[tokio::test]
async fn test_openapi_document_served() {
    let (server, _dir) = create_test_server();

    let response = server.get("/api-docs/openapi.json").await;

    response.assert_status_ok();
    let doc = response.json::<Value>();
    assert!(doc["paths"]["/folders/{id}"].is_object());
    assert!(doc["paths"]["/files/{id}/download"].is_object());
}

// ============================================================================
// Folders
// ============================================================================

#[tokio::test]
async fn test_create_and_get_folder() {
    let (server, _dir) = create_test_server();

    let folder = create_folder(&server, "Legal", None).await;
    assert_eq!(folder["name"], "Legal");
    assert!(folder["parent_id"].is_null());
    assert_eq!(folder["created_at"], folder["updated_at"]);

    let response = server.get(&format!("/folders/{}", id_of(&folder))).await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), folder);
}

#[tokio::test]
async fn test_create_folder_unknown_parent() {
    let (server, _dir) = create_test_server();

    let response = server
        .post("/folders")
        .json(&json!({ "name": "Orphan", "parent_id": "missing" }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["error"]["code"], "NOT_FOUND");

    let roots = server.get("/folders").await.json::<Value>();
    assert_eq!(roots, json!([]));
}

#[tokio::test]
async fn test_create_folder_validation() {
    let (server, _dir) = create_test_server();

    let response = server.post("/folders").json(&json!({ "name": "" })).await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body = response.json::<Value>();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["details"]["name"].is_array());

    let response = server
        .post("/folders")
        .json(&json!({ "name": "x".repeat(256) }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let response = server.post("/folders").json(&json!({})).await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_folders_by_parent() {
    let (server, _dir) = create_test_server();
    let legal = create_folder(&server, "Legal", None).await;
    let finance = create_folder(&server, "Finance", None).await;
    let ndas = create_folder(&server, "NDAs", Some(id_of(&legal).as_str())).await;

    let roots = server.get("/folders").await.json::<Value>();
    assert_eq!(roots, json!([legal, finance]));

    let children = server
        .get("/folders")
        .add_query_param("parent_id", id_of(&legal))
        .await
        .json::<Value>();
    assert_eq!(children, json!([ndas]));

    // An empty parent_id means the root
    let roots_again = server
        .get("/folders")
        .add_query_param("parent_id", "")
        .await
        .json::<Value>();
    assert_eq!(roots_again, roots);
}

#[tokio::test]
async fn test_list_folders_unknown_parent_is_empty() {
    let (server, _dir) = create_test_server();
    create_folder(&server, "Legal", None).await;

    let response = server
        .get("/folders")
        .add_query_param("parent_id", "missing")
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!([]));
}

#[tokio::test]
async fn test_get_folder_not_found() {
    let (server, _dir) = create_test_server();

    let response = server.get("/folders/missing").await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_folder() {
    let (server, _dir) = create_test_server();
    let a = create_folder(&server, "A", None).await;
    let b = create_folder(&server, "B", None).await;

    // Rename and move under A
    let response = server
        .put(&format!("/folders/{}", id_of(&b)))
        .json(&json!({ "name": "B2", "parent_id": id_of(&a) }))
        .await;
    response.assert_status_ok();
    let moved = response.json::<Value>();
    assert_eq!(moved["name"], "B2");
    assert_eq!(moved["parent_id"], a["id"]);
    assert_eq!(moved["created_at"], b["created_at"]);
    assert_ne!(moved["updated_at"], b["updated_at"]);

    // Omitted parent_id keeps the parent
    let renamed = server
        .put(&format!("/folders/{}", id_of(&b)))
        .json(&json!({ "name": "B3" }))
        .await
        .json::<Value>();
    assert_eq!(renamed["parent_id"], a["id"]);

    // Empty parent_id moves back to the root
    let root = server
        .put(&format!("/folders/{}", id_of(&b)))
        .json(&json!({ "parent_id": "" }))
        .await
        .json::<Value>();
    assert!(root["parent_id"].is_null());
}

#[tokio::test]
async fn test_update_folder_errors() {
    let (server, _dir) = create_test_server();
    let a = create_folder(&server, "A", None).await;
    let child = create_folder(&server, "Child", Some(id_of(&a).as_str())).await;

    let response = server
        .put("/folders/missing")
        .json(&json!({ "name": "x" }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let response = server
        .put(&format!("/folders/{}", id_of(&a)))
        .json(&json!({ "parent_id": "missing" }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let response = server
        .put(&format!("/folders/{}", id_of(&a)))
        .json(&json!({ "parent_id": id_of(&child) }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_folder_path() {
    let (server, _dir) = create_test_server();
    let root = create_folder(&server, "Root", None).await;
    let mid = create_folder(&server, "Mid", Some(id_of(&root).as_str())).await;
    let leaf = create_folder(&server, "Leaf", Some(id_of(&mid).as_str())).await;

    let response = server.get(&format!("/folders/{}/path", id_of(&leaf))).await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!([root, mid, leaf]));
}

#[tokio::test]
async fn test_delete_folder_with_subfolders() {
    let (server, _dir) = create_test_server();
    let parent = create_folder(&server, "Parent", None).await;
    create_folder(&server, "Child", Some(id_of(&parent).as_str())).await;

    let response = server.delete(&format!("/folders/{}", id_of(&parent))).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"]["code"], "NOT_EMPTY");
    server
        .get(&format!("/folders/{}", id_of(&parent)))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_delete_folder_not_found() {
    let (server, _dir) = create_test_server();

    let response = server.delete("/folders/missing").await;

    response.assert_status(StatusCode::NOT_FOUND);
}

// ============================================================================
// Files
// ============================================================================

#[tokio::test]
async fn test_upload_file_with_metadata() {
    let (server, _dir) = create_test_server();
    let folder = create_folder(&server, "Finance", None).await;

    let form = MultipartForm::new()
        .add_part(
            "file",
            Part::bytes(b"1,2,3\n".to_vec())
                .file_name("export.bin")
                .mime_type("application/octet-stream"),
        )
        .add_text("name", "Q3 numbers.xlsx")
        .add_text("folder_id", id_of(&folder))
        .add_text("categories", "financial, legal")
        .add_text("categories", "financial")
        .add_text("description", "Quarterly figures");

    let response = server.post("/files").multipart(form).await;

    response.assert_status(StatusCode::CREATED);
    let file = response.json::<Value>();
    assert_eq!(file["name"], "Q3 numbers.xlsx");
    assert_eq!(file["size"], 6);
    assert_eq!(file["file_type"], "xlsx");
    assert_eq!(file["folder_id"], folder["id"]);
    assert_eq!(file["categories"], json!(["financial", "legal"]));
    assert_eq!(file["description"], "Quarterly figures");
    assert!(file["path"].as_str().unwrap().ends_with(file["id"].as_str().unwrap()));
}

#[tokio::test]
async fn test_upload_file_type_from_name() {
    let (server, _dir) = create_test_server();

    let contract = upload(&server, "contract.pdf", None, b"%PDF-1.7").await;
    assert_eq!(contract["file_type"], "pdf");
    assert!(contract["folder_id"].is_null());

    let notes = upload(&server, "notes", None, b"plain").await;
    assert_eq!(notes["file_type"], "other");
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let (server, _dir) = create_test_server();

    let form = MultipartForm::new().add_text("name", "ghost.pdf");
    let response = server.post("/files").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(server.get("/files").await.json::<Value>(), json!([]));
}

#[tokio::test]
async fn test_upload_empty_file() {
    let (server, dir) = create_test_server();

    let form = MultipartForm::new().add_part("file", Part::bytes(Vec::new()).file_name("empty.txt"));
    let response = server.post("/files").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let leftovers = std::fs::read_dir(dir.path().join("dataroom")).unwrap().count();
    assert_eq!(leftovers, 0);
}

#[tokio::test]
async fn test_upload_unknown_folder() {
    let (server, _dir) = create_test_server();

    let form = MultipartForm::new()
        .add_part("file", Part::bytes(b"data".to_vec()).file_name("a.pdf"))
        .add_text("folder_id", "missing");
    let response = server.post("/files").multipart(form).await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_unknown_category() {
    let (server, _dir) = create_test_server();

    let form = MultipartForm::new()
        .add_part("file", Part::bytes(b"data".to_vec()).file_name("a.pdf"))
        .add_text("categories", "legal,secret");
    let response = server.post("/files").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_rejects_control_characters() {
    let (server, dir) = create_test_server();

    let form = MultipartForm::new()
        .add_part("file", Part::bytes(b"data".to_vec()).file_name("a.pdf"))
        .add_text("name", "evil\u{7}\nname.pdf");
    let response = server.post("/files").multipart(form).await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let form = MultipartForm::new()
        .add_part("file", Part::bytes(b"data".to_vec()).file_name("a.pdf"))
        .add_text("description", "null\u{0}byte");
    let response = server.post("/files").multipart(form).await;
    response.assert_status(StatusCode::BAD_REQUEST);

    assert_eq!(server.get("/files").await.json::<Value>(), json!([]));
    let leftovers = std::fs::read_dir(dir.path().join("dataroom")).unwrap().count();
    assert_eq!(leftovers, 0);
}

#[tokio::test]
async fn test_uploaded_name_accepted_on_update() {
    let (server, _dir) = create_test_server();
    let form = MultipartForm::new()
        .add_part("file", Part::bytes(b"data".to_vec()).file_name("a.pdf"))
        .add_text("name", "  Board minutes.pdf  ")
        .add_text("description", "Signed\r\nby\tall");
    let file = server.post("/files").multipart(form).await.json::<Value>();
    assert_eq!(file["name"], "Board minutes.pdf");

    let response = server
        .put(&format!("/files/{}", id_of(&file)))
        .json(&json!({ "name": file["name"], "description": file["description"] }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["name"], "Board minutes.pdf");
}

#[tokio::test]
async fn test_upload_too_large() {
    let (server, _dir) = create_test_server_with_limit(16);

    let form = MultipartForm::new()
        .add_part("file", Part::bytes(vec![b'x'; 17]).file_name("big.txt"));
    let response = server.post("/files").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let form = MultipartForm::new()
        .add_part("file", Part::bytes(vec![b'x'; 16]).file_name("fits.txt"));
    server
        .post("/files")
        .multipart(form)
        .await
        .assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_list_files() {
    let (server, _dir) = create_test_server();
    let folder = create_folder(&server, "F", None).await;
    let inside = upload(&server, "in.txt", Some(id_of(&folder).as_str()), b"1").await;
    let outside = upload(&server, "out.txt", None, b"2").await;

    let in_folder = server
        .get("/files")
        .add_query_param("folder_id", id_of(&folder))
        .await
        .json::<Value>();
    assert_eq!(in_folder, json!([inside]));

    let everything = server.get("/files").await.json::<Value>();
    assert_eq!(everything, json!([inside, outside]));
}

#[tokio::test]
async fn test_list_files_unknown_folder() {
    let (server, _dir) = create_test_server();

    let response = server
        .get("/files")
        .add_query_param("folder_id", "missing")
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_download_round_trip() {
    let (server, _dir) = create_test_server();
    let content: Vec<u8> = (0..=255u8).collect();
    let form = MultipartForm::new()
        .add_part("file", Part::bytes(content.clone()).file_name("scan.bin"))
        .add_text("name", "contrat signé.pdf");
    let file = server.post("/files").multipart(form).await.json::<Value>();
    assert_eq!(file["file_type"], "pdf");

    let response = server
        .get(&format!("/files/{}/download", id_of(&file)))
        .await;

    response.assert_status_ok();
    assert_eq!(response.as_bytes().as_ref(), content.as_slice());
    assert_eq!(response.header(CONTENT_TYPE), "application/octet-stream");
    let disposition = response.header(CONTENT_DISPOSITION);
    let disposition = disposition.to_str().unwrap();
    assert!(disposition.starts_with("attachment;"));
    assert!(disposition.contains("filename*=UTF-8''contrat%20sign%C3%A9.pdf"));
}

#[tokio::test]
async fn test_download_not_found() {
    let (server, _dir) = create_test_server();

    let response = server.get("/files/missing/download").await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_download_missing_artifact_is_internal_error() {
    let (server, _dir) = create_test_server();
    let file = upload(&server, "lost.pdf", None, b"gone soon").await;
    let path = file["path"].as_str().unwrap().to_string();
    std::fs::remove_file(&path).unwrap();

    let response = server
        .get(&format!("/files/{}/download", id_of(&file)))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.text();
    assert!(body.contains("INTERNAL_ERROR"));
    assert!(!body.contains(&path));
    assert!(!body.contains(&id_of(&file)));
}

#[tokio::test]
async fn test_update_file_categories_only() {
    let (server, _dir) = create_test_server();
    let folder = create_folder(&server, "F", None).await;
    let form = MultipartForm::new()
        .add_part("file", Part::bytes(b"a".to_vec()).file_name("a.pdf"))
        .add_text("folder_id", id_of(&folder))
        .add_text("description", "desc");
    let file = server.post("/files").multipart(form).await.json::<Value>();

    let response = server
        .put(&format!("/files/{}", id_of(&file)))
        .json(&json!({ "categories": ["hr"] }))
        .await;

    response.assert_status_ok();
    let updated = response.json::<Value>();
    assert_eq!(updated["categories"], json!(["hr"]));
    assert_eq!(updated["name"], file["name"]);
    assert_eq!(updated["folder_id"], file["folder_id"]);
    assert_eq!(updated["description"], file["description"]);
    assert_ne!(updated["updated_at"], file["updated_at"]);
}

#[tokio::test]
async fn test_update_file_errors() {
    let (server, _dir) = create_test_server();
    let file = upload(&server, "a.pdf", None, b"a").await;

    server
        .put("/files/missing")
        .json(&json!({ "name": "b.pdf" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    server
        .put(&format!("/files/{}", id_of(&file)))
        .json(&json!({ "folder_id": "missing" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    server
        .put(&format!("/files/{}", id_of(&file)))
        .json(&json!({ "categories": ["secret"] }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    server
        .put(&format!("/files/{}", id_of(&file)))
        .json(&json!({ "name": "" }))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_delete_file() {
    let (server, _dir) = create_test_server();
    let file = upload(&server, "a.txt", None, b"bye").await;
    let path = file["path"].as_str().unwrap().to_string();
    assert!(Path::new(&path).exists());

    server
        .delete(&format!("/files/{}", id_of(&file)))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    assert!(!Path::new(&path).exists());
    server
        .get(&format!("/files/{}", id_of(&file)))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .delete(&format!("/files/{}", id_of(&file)))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_legal_folder_scenario() {
    let (server, _dir) = create_test_server();
    let legal = create_folder(&server, "Legal", None).await;
    let nda = upload(&server, "nda.pdf", Some(id_of(&legal).as_str()), b"hello").await;

    let files = server
        .get("/files")
        .add_query_param("folder_id", id_of(&legal))
        .await
        .json::<Value>();
    let files = files.as_array().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["size"], 5);
    assert_eq!(files[0]["file_type"], "pdf");

    server
        .delete(&format!("/folders/{}", id_of(&legal)))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server
        .get(&format!("/files/{}", id_of(&nda)))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    assert!(!Path::new(nda["path"].as_str().unwrap()).exists());
}
