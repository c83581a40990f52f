use axum::{body::to_bytes, http::StatusCode, response::IntoResponse};
use parking_reservation_api::error::AppError;

#[test]
fn errors_map_to_status_codes() {
    assert_eq!(AppError::NotFound.status(), StatusCode::NOT_FOUND);
    assert_eq!(AppError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
    assert_eq!(AppError::Unauthorized("x".into()).status(), StatusCode::UNAUTHORIZED);
    assert_eq!(AppError::Forbidden.status(), StatusCode::FORBIDDEN);
    assert_eq!(AppError::Conflict("x".into()).status(), StatusCode::CONFLICT);
    assert_eq!(
        AppError::internal("boom").status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[tokio::test]
async fn conflict_body_carries_user_facing_message() {
    let response =
        AppError::Conflict("Cannot delete lot with occupied spots.".into()).into_response();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["message"], "Cannot delete lot with occupied spots.");
    assert_eq!(body["level"], "danger");
    assert_eq!(body["data"]["error"], "Cannot delete lot with occupied spots.");
}

#[tokio::test]
async fn internal_errors_do_not_leak_details() {
    let response = AppError::internal("connection refused to 10.0.0.3").into_response();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["message"], "Internal Server Error");
}
