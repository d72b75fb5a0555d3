use super::*;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Debug, Clone)]
struct RecordedUpload {
    field: String,
    filename: Option<String>,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

#[derive(Clone, Default)]
struct ServerState {
    uploads: Arc<Mutex<Vec<RecordedUpload>>>,
    json_bodies: Arc<Mutex<Vec<Value>>>,
}

async fn spawn_server(app: Router) -> Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

async fn handle_extract(State(state): State<ServerState>, mut multipart: Multipart) -> Json<Value> {
    while let Some(field) = multipart.next_field().await.expect("multipart field") {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.expect("field bytes").to_vec();
        state.uploads.lock().await.push(RecordedUpload {
            field: name,
            filename,
            content_type,
            bytes,
        });
    }
    Json(json!({"age": "54", "gender": "Female", "glucose": "110"}))
}

async fn handle_extract_rejected() -> (StatusCode, Json<ErrorBody>) {
    (StatusCode::BAD_REQUEST, Json(ErrorBody::new("No selected file")))
}

async fn handle_extract_html_failure() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "<html>Internal Server Error</html>")
}

async fn handle_extract_not_json() -> &'static str {
    "extraction finished"
}

async fn handle_predict(State(state): State<ServerState>, Json(body): Json<Value>) -> Json<Value> {
    state.json_bodies.lock().await.push(body);
    Json(json!({"prediction": 1, "probability": 82.0}))
}

async fn handle_predict_failure() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody::new("invalid literal for int() with base 10: ''")),
    )
}

async fn handle_feedback(State(state): State<ServerState>, Json(body): Json<Value>) -> Json<Value> {
    state.json_bodies.lock().await.push(body);
    Json(json!({"success": "Feedback received!"}))
}

async fn handle_feedback_failure() -> (StatusCode, Json<ErrorBody>) {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody::new("disk full")))
}

fn happy_router(state: ServerState) -> Router {
    Router::new()
        .route("/extract", post(handle_extract))
        .route("/predict", post(handle_predict))
        .route("/feedback", post(handle_feedback))
        .with_state(state)
}

#[tokio::test]
async fn extract_uploads_file_as_multipart_field() {
    let state = ServerState::default();
    let server_url = spawn_server(happy_router(state.clone()))
        .await
        .expect("spawn server");
    let client = AnalyserClient::new(&server_url).expect("client");

    let fields = client
        .extract(UploadFile::new("report.png", b"png-bytes".to_vec()).with_mime_type("image/png"))
        .await
        .expect("extract");

    assert_eq!(fields.age, Some("54".into()));
    assert_eq!(fields.gender(), Some("Female"));
    assert_eq!(fields.glucose, Some("110".into()));
    assert_eq!(fields.height, None);

    let uploads = state.uploads.lock().await;
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].field, "file");
    assert_eq!(uploads[0].filename.as_deref(), Some("report.png"));
    assert_eq!(uploads[0].content_type.as_deref(), Some("image/png"));
    assert_eq!(uploads[0].bytes, b"png-bytes");
}

#[tokio::test]
async fn extract_surfaces_server_error_message() {
    let app = Router::new().route("/extract", post(handle_extract_rejected));
    let server_url = spawn_server(app).await.expect("spawn server");
    let client = AnalyserClient::new(&server_url).expect("client");

    let err = client
        .extract(UploadFile::new("empty.pdf", Vec::new()))
        .await
        .expect_err("must fail");

    assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    assert_eq!(err.user_message("Failed to extract data."), "No selected file");
}

#[tokio::test]
async fn non_json_error_body_falls_back_to_generic_message() {
    let app = Router::new().route("/extract", post(handle_extract_html_failure));
    let server_url = spawn_server(app).await.expect("spawn server");
    let client = AnalyserClient::new(&server_url).expect("client");

    let err = client
        .extract(UploadFile::new("scan.jpg", b"jpg".to_vec()))
        .await
        .expect_err("must fail");

    assert!(matches!(err, ClientError::Server { message: None, .. }));
    assert_eq!(
        err.user_message("Failed to extract data."),
        "Failed to extract data."
    );
}

#[tokio::test]
async fn malformed_success_body_is_reported_not_panicked() {
    let app = Router::new().route("/extract", post(handle_extract_not_json));
    let server_url = spawn_server(app).await.expect("spawn server");
    let client = AnalyserClient::new(&server_url).expect("client");

    let err = client
        .extract(UploadFile::new("scan.jpg", b"jpg".to_vec()))
        .await
        .expect_err("must fail");

    assert!(
        matches!(err, ClientError::MalformedResponse(_)),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn predict_posts_flat_json_and_parses_result() {
    let state = ServerState::default();
    let server_url = spawn_server(happy_router(state.clone()))
        .await
        .expect("spawn server");
    let client = AnalyserClient::new(&server_url).expect("client");

    let form = ManualForm::new();
    form.set(shared::domain::FormField::Age, "61");
    form.set(shared::domain::FormField::Gender, "male");

    let result = client
        .predict(&form.submission())
        .await
        .expect("predict");
    assert_eq!(result.prediction, 1);
    assert_eq!(result.tier(), shared::domain::RiskTier::High);

    let bodies = state.json_bodies.lock().await;
    let body = bodies[0].as_object().expect("object body");
    assert_eq!(body.len(), 11);
    assert_eq!(body["age"], "61");
    assert_eq!(body["gender"], "male");
    assert_eq!(body["gluc"], "");
}

#[tokio::test]
async fn predict_failure_carries_server_detail() {
    let app = Router::new().route("/predict", post(handle_predict_failure));
    let server_url = spawn_server(app).await.expect("spawn server");
    let client = AnalyserClient::new(&server_url).expect("client");

    let err = client
        .predict(&PredictRequest::default())
        .await
        .expect_err("must fail");
    assert_eq!(
        err.user_message("Prediction failed."),
        "invalid literal for int() with base 10: ''"
    );
}

#[tokio::test]
async fn feedback_posts_name_and_review() {
    let state = ServerState::default();
    let server_url = spawn_server(happy_router(state.clone()))
        .await
        .expect("spawn server");
    let client = AnalyserClient::new(&server_url).expect("client");

    client
        .submit_feedback(&FeedbackRequest {
            name: String::new(),
            review: "Clear results page".into(),
        })
        .await
        .expect("feedback");

    let bodies = state.json_bodies.lock().await;
    assert_eq!(bodies[0], json!({"name": "", "review": "Clear results page"}));
}

#[tokio::test]
async fn feedback_failure_is_a_server_error() {
    let app = Router::new().route("/feedback", post(handle_feedback_failure));
    let server_url = spawn_server(app).await.expect("spawn server");
    let client = AnalyserClient::new(&server_url).expect("client");

    let err = client
        .submit_feedback(&FeedbackRequest {
            name: "Ana".into(),
            review: "ok".into(),
        })
        .await
        .expect_err("must fail");
    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(err.user_message("Failed to submit feedback."), "disk full");
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let client = AnalyserClient::new(&format!("http://{addr}")).expect("client");
    let err = client
        .predict(&PredictRequest::default())
        .await
        .expect_err("must fail");

    assert!(matches!(err, ClientError::Transport(_)), "unexpected error: {err:?}");
    assert!(err
        .user_message("Prediction failed.")
        .contains("Could not reach the analyser service"));
}

#[test]
fn base_url_gets_trailing_slash_so_endpoints_nest() {
    let client = AnalyserClient::new("http://analyser.local:5000/app").expect("client");
    assert_eq!(client.base_url().as_str(), "http://analyser.local:5000/app/");
    assert_eq!(
        client.endpoint(EXTRACT_PATH).expect("endpoint").as_str(),
        "http://analyser.local:5000/app/extract"
    );
}

#[test]
fn rejects_unparseable_base_url() {
    let err = AnalyserClient::new("not a url").expect_err("must fail");
    assert!(matches!(err, ClientError::InvalidEndpoint(_)));
}
