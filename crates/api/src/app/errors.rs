//! Response helpers: the `{status, message, data}` envelope and error
//! mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;
use serde_json::json;

use granite_core::DomainError;
use granite_store::StoreError;

pub fn json_success(message: impl Into<String>) -> axum::response::Response {
    (
        StatusCode::OK,
        Json(json!({
            "status": "success",
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn json_success_with<T: Serialize>(
    message: impl Into<String>,
    data: T,
) -> axum::response::Response {
    (
        StatusCode::OK,
        Json(json!({
            "status": "success",
            "message": message.into(),
            "data": data,
        })),
    )
        .into_response()
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        Json(json!({
            "status": "error",
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, msg),
        DomainError::Conflict(msg) => json_error(StatusCode::BAD_REQUEST, msg),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not found"),
    }
}

pub fn store_error_to_response(err: StoreError, what: &str) -> axum::response::Response {
    match err {
        StoreError::NotFound => json_error(StatusCode::NOT_FOUND, format!("{what} not found")),
        #[cfg(feature = "postgres")]
        StoreError::Database(e) => {
            tracing::error!("database error: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "database error")
        }
    }
}
