//! Role CRUD.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use granite_core::validate;
use granite_store::RolePatch;

use crate::app::AppState;
use crate::app::dto::RoleRequest;
use crate::app::errors::{
    domain_error_to_response, json_error, json_success, json_success_with,
    store_error_to_response,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(get_by_id).put(update).delete(remove))
}

async fn list(State(state): State<AppState>) -> axum::response::Response {
    match state.roles.list().await {
        Ok(roles) => json_success_with("role list", roles),
        Err(err) => store_error_to_response(err, "role"),
    }
}

async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> axum::response::Response {
    match state.roles.get(id).await {
        Ok(Some(role)) => json_success_with("role detail", role),
        Ok(None) => json_error(StatusCode::NOT_FOUND, "role not found"),
        Err(err) => store_error_to_response(err, "role"),
    }
}

async fn create(
    State(state): State<AppState>,
    Json(body): Json<RoleRequest>,
) -> axum::response::Response {
    if let Err(err) = validate::role_name(&body.name) {
        return domain_error_to_response(err);
    }

    match state.roles.create(body.name).await {
        Ok(role) => json_success_with("role created", role),
        Err(err) => store_error_to_response(err, "role"),
    }
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<RoleRequest>,
) -> axum::response::Response {
    if let Err(err) = validate::role_name(&body.name) {
        return domain_error_to_response(err);
    }

    match state.roles.update(id, RolePatch { name: Some(body.name) }).await {
        Ok(role) => json_success_with("role updated", role),
        Err(err) => store_error_to_response(err, "role"),
    }
}

async fn remove(State(state): State<AppState>, Path(id): Path<i64>) -> axum::response::Response {
    match state.roles.soft_delete(id).await {
        Ok(()) => json_success("role deleted"),
        Err(err) => store_error_to_response(err, "role"),
    }
}
