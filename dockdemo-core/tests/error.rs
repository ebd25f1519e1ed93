use axum::http::StatusCode;
use axum::response::IntoResponse;
use dockdemo_core::{FieldError, HttpError, ValidationErrorResponse};
use http_body_util::BodyExt;

async fn error_parts(err: HttpError) -> (StatusCode, serde_json::Value) {
    let resp = err.into_response();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_status() {
    let (status, body) = error_parts(HttpError::NotFound("User 9 not found".into())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User 9 not found");
}

#[tokio::test]
async fn bad_request_status() {
    let (status, body) = error_parts(HttpError::BadRequest("Name and email are required".into())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Name and email are required");
}

#[tokio::test]
async fn conflict_status() {
    let (status, body) = error_parts(HttpError::Conflict("taken".into())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "taken");
}

#[tokio::test]
async fn internal_status() {
    let (status, body) = error_parts(HttpError::Internal("lock poisoned".into())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "lock poisoned");
}

#[tokio::test]
async fn validation_lists_field_details() {
    let (status, body) = error_parts(HttpError::Validation(ValidationErrorResponse {
        errors: vec![FieldError {
            field: "email".into(),
            message: "not a valid email".into(),
            code: "validation".into(),
        }],
    }))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(body["details"][0]["field"], "email");
}

#[tokio::test]
async fn custom_status_and_body() {
    let custom = serde_json::json!({"detail": "teapot"});
    let (status, body) = error_parts(HttpError::Custom {
        status: StatusCode::IM_A_TEAPOT,
        body: custom.clone(),
    })
    .await;
    assert_eq!(status, StatusCode::IM_A_TEAPOT);
    assert_eq!(body, custom);
}

#[test]
fn display_formatting() {
    assert_eq!(HttpError::NotFound("x".into()).to_string(), "Not Found: x");
    assert_eq!(HttpError::BadRequest("w".into()).to_string(), "Bad Request: w");
    assert_eq!(HttpError::Conflict("c".into()).to_string(), "Conflict: c");
    assert_eq!(HttpError::Internal("v".into()).to_string(), "Internal Error: v");
}

#[test]
fn from_io_error_is_internal() {
    let io_err = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
    match HttpError::from(io_err) {
        HttpError::Internal(msg) => assert!(msg.contains("disk gone")),
        other => panic!("expected Internal, got {other}"),
    }
}
