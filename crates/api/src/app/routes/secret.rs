//! Administrative blacklist inspection and reset.
//!
//! These endpoints are gated by a shared secret presented in the request
//! body, not by a bearer token: they exist for operational recovery even
//! when token auth is the thing being debugged. The comparison is plain
//! string equality (not constant-time).

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};

use crate::app::AppState;
use crate::app::dto::SecretRequest;
use crate::app::errors::{json_error, json_success, json_success_with};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/get-black-list", post(get_blacklist))
        .route("/clear-black-list", post(clear_blacklist))
}

fn check_password(state: &AppState, body: &SecretRequest) -> Result<(), axum::response::Response> {
    if body.password != *state.admin_secret {
        return Err(json_error(StatusCode::UNAUTHORIZED, "wrong admin password"));
    }
    Ok(())
}

async fn get_blacklist(
    State(state): State<AppState>,
    Json(body): Json<SecretRequest>,
) -> axum::response::Response {
    if let Err(resp) = check_password(&state, &body) {
        return resp;
    }
    json_success_with("blacklisted tokens", state.gate.blacklist().list_all())
}

async fn clear_blacklist(
    State(state): State<AppState>,
    Json(body): Json<SecretRequest>,
) -> axum::response::Response {
    if let Err(resp) = check_password(&state, &body) {
        return resp;
    }
    state.gate.blacklist().clear();
    json_success("blacklist cleared")
}
