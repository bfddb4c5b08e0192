//! Tests for [`HttpMaterialApi`] against an in-process axum server.

use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use lectern_core::{
    ApiError, HttpMaterialApi, MaterialApi, PendingFile, RecordOrder, Session, UploadBatch,
};
use serde_json::json;

#[derive(Debug, Default)]
struct ReceivedUpload {
    files: Vec<(String, Vec<u8>)>,
    course: Option<String>,
    subject: Option<String>,
}

#[derive(Debug, Default)]
struct Received {
    uploads: Vec<ReceivedUpload>,
    deletes: Vec<u64>,
    lists: usize,
}

type Shared = Arc<Mutex<Received>>;

async fn handle_upload(State(state): State<Shared>, mut multipart: Multipart) -> Json<serde_json::Value> {
    let mut upload = ReceivedUpload::default();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "files" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.unwrap();
                upload.files.push((file_name, bytes.to_vec()));
            }
            "course" => upload.course = Some(field.text().await.unwrap()),
            "subject" => upload.subject = Some(field.text().await.unwrap()),
            _ => {}
        }
    }
    state.lock().unwrap().uploads.push(upload);
    Json(json!({ "message": "Files uploaded successfully" }))
}

async fn handle_list(State(state): State<Shared>) -> Json<serde_json::Value> {
    state.lock().unwrap().lists += 1;
    Json(json!([
        { "id": 1, "file_name": "x", "uploaded_at": "2024-01-01T00:00:00" },
        { "id": 2, "file_name": "y", "uploaded_at": "2024-03-01T00:00:00" }
    ]))
}

async fn handle_delete(State(state): State<Shared>, Path(id): Path<u64>) -> StatusCode {
    state.lock().unwrap().deletes.push(id);
    StatusCode::NO_CONTENT
}

fn happy_router(state: Shared) -> Router {
    Router::new()
        .route("/api/material/upload/", post(handle_upload))
        .route("/api/material/view/", get(handle_list))
        .route("/api/material/delete/{id}/", delete(handle_delete))
        .with_state(state)
}

fn failing_router() -> Router {
    Router::new()
        .route(
            "/api/material/upload/",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "disk full") }),
        )
        .route("/api/material/view/", get(|| async { "not json" }))
        .route(
            "/api/material/delete/{id}/",
            delete(|| async { (StatusCode::NOT_FOUND, "no such file") }),
        )
}

/// Serve `router` on an ephemeral port and return its base URL.
async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn batch(files: Vec<PendingFile>, course: &str, subject: &str) -> UploadBatch {
    UploadBatch {
        files,
        course: course.to_string(),
        subject: subject.to_string(),
    }
}

#[tokio::test]
async fn upload_sends_repeated_files_and_metadata() {
    let state = Shared::default();
    let base = spawn_server(happy_router(state.clone())).await;
    let api = HttpMaterialApi::builder(base).build().unwrap();

    let body = api
        .upload(&batch(
            vec![
                PendingFile::from_bytes("a.pdf", b"aaa".to_vec()),
                PendingFile::from_bytes("b.pdf", b"bbbb".to_vec()),
            ],
            "CS101",
            "",
        ))
        .await
        .unwrap();

    assert_eq!(body["message"], "Files uploaded successfully");
    let received = state.lock().unwrap();
    assert_eq!(received.uploads.len(), 1);
    let upload = &received.uploads[0];
    assert_eq!(
        upload.files,
        vec![
            ("a.pdf".to_string(), b"aaa".to_vec()),
            ("b.pdf".to_string(), b"bbbb".to_vec()),
        ]
    );
    assert_eq!(upload.course.as_deref(), Some("CS101"));
    assert_eq!(upload.subject.as_deref(), Some(""));
}

#[tokio::test]
async fn upload_reads_files_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("syllabus.pdf");
    std::fs::write(&path, b"%PDF-1.7 syllabus").unwrap();

    let state = Shared::default();
    let base = spawn_server(happy_router(state.clone())).await;
    let api = HttpMaterialApi::builder(base).build().unwrap();

    api.upload(&batch(vec![PendingFile::from_path(&path)], "MA201", "Calculus"))
        .await
        .unwrap();

    let received = state.lock().unwrap();
    let upload = &received.uploads[0];
    assert_eq!(upload.files[0].0, "syllabus.pdf");
    assert_eq!(upload.files[0].1, b"%PDF-1.7 syllabus".to_vec());
    assert_eq!(upload.subject.as_deref(), Some("Calculus"));
}

#[tokio::test]
async fn list_parses_records() {
    let base = spawn_server(happy_router(Shared::default())).await;
    let api = HttpMaterialApi::builder(base).build().unwrap();

    let records = api.list_files().await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, 1);
    assert_eq!(records[1].upload_date(), "2024-03-01");
}

#[tokio::test]
async fn delete_hits_per_id_path() {
    let state = Shared::default();
    let base = spawn_server(happy_router(state.clone())).await;
    let api = HttpMaterialApi::builder(base).build().unwrap();

    api.delete_file(42).await.unwrap();

    assert_eq!(state.lock().unwrap().deletes, vec![42]);
}

#[tokio::test]
async fn non_success_status_is_http_error() {
    let base = spawn_server(failing_router()).await;
    let api = HttpMaterialApi::builder(base).build().unwrap();

    let err = api
        .upload(&batch(vec![PendingFile::from_bytes("a", b"a".to_vec())], "", ""))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert!(err.to_string().contains("disk full"));

    let err = api.delete_file(7).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn invalid_list_body_is_deserialization_error() {
    let base = spawn_server(failing_router()).await;
    let api = HttpMaterialApi::builder(base).build().unwrap();

    let err = api.list_files().await.unwrap_err();
    assert!(matches!(err, ApiError::Deserialization(_)));
}

#[tokio::test]
async fn missing_local_file_fails_before_sending() {
    let state = Shared::default();
    let base = spawn_server(happy_router(state.clone())).await;
    let api = HttpMaterialApi::builder(base).build().unwrap();

    let err = api
        .upload(&batch(
            vec![PendingFile::from_path("/no/such/dir/lecture.pdf")],
            "",
            "",
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Io { .. }));
    assert!(state.lock().unwrap().uploads.is_empty());
}

#[tokio::test]
async fn unreachable_server_is_connection_error() {
    // Bind then drop to get a port nobody is listening on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = HttpMaterialApi::builder(format!("http://{addr}"))
        .build()
        .unwrap();
    let err = api.list_files().await.unwrap_err();
    assert!(err.is_connection_error());
}

#[tokio::test]
async fn session_over_http_uploads_then_refreshes() {
    let state = Shared::default();
    let base = spawn_server(happy_router(state.clone())).await;
    let api = HttpMaterialApi::builder(base).build().unwrap();
    let mut session = Session::new(api, RecordOrder::NewestFirst);

    session
        .screen_mut()
        .add_files([PendingFile::from_bytes("notes.pdf", b"n".to_vec())]);
    let notice = session.submit().await.unwrap();

    assert!(!notice.is_failure());
    assert!(session.screen().pending().is_empty());
    let ids: Vec<u64> = session.screen().records().iter().map(|r| r.id).collect();
    assert_eq!(ids, [2, 1]);
    let received = state.lock().unwrap();
    assert_eq!(received.uploads.len(), 1);
    assert_eq!(received.lists, 1);
}
