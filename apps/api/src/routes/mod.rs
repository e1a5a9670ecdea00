pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::parsing::handlers::handle_upload;
use crate::render::handlers::handle_update;
use crate::state::AppState;
use crate::storage::STATIC_ROUTE;

/// Uploads larger than this are rejected before reaching a handler.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(state.store.root());

    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        .route("/upload", post(handle_upload))
        .route("/upload/", post(handle_upload))
        .route("/update", post(handle_update))
        .route("/update/", post(handle_update))
        .nest_service(STATIC_ROUTE, static_files)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::llm_client::testing::ScriptedClient;
    use crate::llm_client::LlmError;
    use crate::models::resume::ResumeRecord;
    use crate::render::render_to_bytes;
    use crate::storage::FileStore;

    const BOUNDARY: &str = "resume-test-boundary";
    const BASE_URL: &str = "http://127.0.0.1:8000";

    fn test_app(replies: Vec<Result<String, LlmError>>) -> (Router, Arc<ScriptedClient>, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let client = Arc::new(ScriptedClient::new(replies));
        let state = AppState {
            llm: client.clone(),
            store: FileStore::new(dir.path(), BASE_URL),
        };
        (build_router(state), client, dir)
    }

    fn sample_pdf() -> Vec<u8> {
        render_to_bytes(&ResumeRecord {
            full_name: "Jane Doe".to_string(),
            title: "Backend Engineer".to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    fn multipart_request(field: &str, filename: &str, bytes: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: application/pdf\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/upload/")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn json_request(uri: &str, body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn preview_name(pdf_url: &str) -> &str {
        pdf_url
            .strip_prefix(&format!("{BASE_URL}/static/"))
            .expect("pdf_url under /static/")
    }

    #[tokio::test]
    async fn test_root_reports_running() {
        let (app, _, _dir) = test_app(vec![]);
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert!(body["message"].as_str().unwrap().contains("running"));
    }

    #[tokio::test]
    async fn test_update_renders_and_serves_preview() {
        let (app, client, dir) = test_app(vec![]);
        let payload = json!({
            "parsed": {
                "full_name": "Jane Doe",
                "experience": [{"company": "Acme", "title": "Engineer", "description": ["Built billing"]}]
            }
        });

        let response = app
            .clone()
            .oneshot(json_request("/update/", payload.to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["success"], json!(true));
        let name = preview_name(body["pdf_url"].as_str().unwrap()).to_string();
        assert!(dir.path().join(&name).exists());
        assert_eq!(client.calls(), 0);

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/static/{name}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_update_twice_yields_distinct_files() {
        let (app, _, _dir) = test_app(vec![]);
        let payload = json!({"parsed": {"full_name": "Jane"}}).to_string();

        let first = read_json(
            app.clone()
                .oneshot(json_request("/update/", payload.clone()))
                .await
                .unwrap(),
        )
        .await;
        let second = read_json(app.oneshot(json_request("/update/", payload)).await.unwrap()).await;

        assert_ne!(first["pdf_url"], second["pdf_url"]);
    }

    #[tokio::test]
    async fn test_update_with_wrong_shape_is_error_body() {
        let (app, _, _dir) = test_app(vec![]);
        let payload = json!({"parsed": {"technical_skills": "Rust"}}).to_string();

        let response = app.oneshot(json_request("/update/", payload)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = read_json(response).await;
        assert_eq!(body["code"], json!("INVALID_RECORD"));
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_update_with_malformed_json_is_error_body() {
        let (app, _, _dir) = test_app(vec![]);

        let response = app
            .oneshot(json_request("/update/", "{not json".to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body["code"], json!("BAD_REQUEST"));
    }

    #[tokio::test]
    async fn test_upload_parses_and_renders() {
        let reply = r#"{"full_name": "Jane Doe", "title": "Backend Engineer", "technical_skills": ["Rust"]}"#;
        let (app, client, dir) = test_app(vec![Ok(reply.to_string())]);

        let response = app
            .oneshot(multipart_request("file", "cv.pdf", &sample_pdf()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["filename"], json!("cv.pdf"));
        assert_eq!(body["parsed"], serde_json::from_str::<Value>(reply).unwrap());
        let name = preview_name(body["pdf_url"].as_str().unwrap());
        assert!(dir.path().join(name).exists());
        assert_eq!(client.calls(), 1);

        let prompt = &client.requests()[0][1].content;
        assert!(prompt.contains("Jane Doe"));
    }

    #[tokio::test]
    async fn test_upload_with_numeric_years_still_renders() {
        let reply = r#"{"full_name": "Jane", "experience": [{"company": "Acme", "title": "Engineer", "start_year": 2019, "end_year": 2023, "description": ["Built billing"]}]}"#;
        let (app, _, dir) = test_app(vec![Ok(reply.to_string())]);

        let response = app
            .oneshot(multipart_request("file", "cv.pdf", &sample_pdf()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        // Returned untouched, numbers and all.
        assert_eq!(body["parsed"]["experience"][0]["start_year"], json!(2019));
        let name = preview_name(body["pdf_url"].as_str().expect("pdf_url set"));
        assert!(dir.path().join(name).exists());
    }

    #[tokio::test]
    async fn test_upload_with_prose_wrapped_json_skips_fixer() {
        let reply = r#"Sure! Here is the JSON: {"full_name": "Jane Doe", "email": ""} Hope that helps!"#;
        let (app, client, _dir) = test_app(vec![Ok(reply.to_string())]);

        let response = app
            .oneshot(multipart_request("file", "cv.pdf", &sample_pdf()))
            .await
            .unwrap();

        let body = read_json(response).await;
        assert_eq!(body["parsed"], json!({"full_name": "Jane Doe", "email": ""}));
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_upload_unrecoverable_returns_error_object() {
        let (app, client, _dir) = test_app(vec![
            Ok("no json here".to_string()),
            Ok("still none".to_string()),
        ]);

        let response = app
            .oneshot(multipart_request("file", "cv.pdf", &sample_pdf()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(
            body["parsed"],
            json!({"error": "Could not fix JSON", "raw_output": "still none"})
        );
        assert_eq!(body["pdf_url"], Value::Null);
        assert_eq!(client.calls(), 2);
    }

    #[tokio::test]
    async fn test_upload_garbage_pdf_is_extraction_error() {
        let (app, client, _dir) = test_app(vec![]);

        let response = app
            .oneshot(multipart_request("file", "cv.pdf", b"not a pdf at all"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = read_json(response).await;
        assert_eq!(body["code"], json!("EXTRACTION_ERROR"));
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_upload_transport_failure_is_error_body() {
        let (app, _, _dir) = test_app(vec![Err(LlmError::Api {
            status: 500,
            message: "boom".to_string(),
        })]);

        let response = app
            .oneshot(multipart_request("file", "cv.pdf", &sample_pdf()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = read_json(response).await;
        assert_eq!(body["code"], json!("LLM_ERROR"));
    }

    #[tokio::test]
    async fn test_upload_without_file_field_is_bad_request() {
        let (app, _, _dir) = test_app(vec![]);

        let response = app
            .oneshot(multipart_request("attachment", "cv.pdf", b"%PDF"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
