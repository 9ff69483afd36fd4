//! User CRUD.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use granite_core::validate;
use granite_store::UserPatch;

use crate::app::AppState;
use crate::app::dto::{RegisterRequest, UpdateUserRequest, UserView};
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
    match state.users.list().await {
        Ok(users) => json_success_with(
            "user list",
            users.into_iter().map(UserView::from_user).collect::<Vec<_>>(),
        ),
        Err(err) => store_error_to_response(err, "user"),
    }
}

async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> axum::response::Response {
    match state.users.get(id).await {
        Ok(Some(user)) => {
            let role = state.roles.get(user.role_id).await.ok().flatten();
            json_success_with("user detail", UserView::from_user(user).with_role(role))
        }
        Ok(None) => json_error(StatusCode::NOT_FOUND, "user not found"),
        Err(err) => store_error_to_response(err, "user"),
    }
}

async fn create(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> axum::response::Response {
    // Creation by an authenticated caller follows the same rules as
    // self-registration.
    crate::app::routes::auth::register(State(state), Json(body)).await
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateUserRequest>,
) -> axum::response::Response {
    if let Some(name) = &body.name {
        if let Err(err) = validate::name(name) {
            return domain_error_to_response(err);
        }
    }
    if let Some(email) = &body.email {
        if let Err(err) = validate::email(email) {
            return domain_error_to_response(err);
        }
        match state.users.email_taken(email, Some(id)).await {
            Ok(true) => return json_error(StatusCode::BAD_REQUEST, "email already registered"),
            Ok(false) => {}
            Err(err) => return store_error_to_response(err, "user"),
        }
    }

    let password_hash = match &body.password {
        Some(password) => {
            if let Err(err) = validate::password(password) {
                return domain_error_to_response(err);
            }
            match bcrypt::hash(password, bcrypt::DEFAULT_COST) {
                Ok(hash) => Some(hash),
                Err(err) => {
                    tracing::error!("password hashing failed: {err}");
                    return json_error(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "failed to hash password",
                    );
                }
            }
        }
        None => None,
    };

    let patch = UserPatch {
        name: body.name,
        email: body.email,
        password_hash,
        role_id: body.role_id,
    };

    match state.users.update(id, patch).await {
        Ok(user) => {
            let role = state.roles.get(user.role_id).await.ok().flatten();
            json_success_with("user updated", UserView::from_user(user).with_role(role))
        }
        Err(err) => store_error_to_response(err, "user"),
    }
}

async fn remove(State(state): State<AppState>, Path(id): Path<i64>) -> axum::response::Response {
    match state.users.soft_delete(id).await {
        Ok(()) => json_success("user deleted"),
        Err(err) => store_error_to_response(err, "user"),
    }
}
