//! Registration, login, and logout.

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use chrono::{Duration, Utc};

use granite_auth::{TOKEN_TTL_HOURS, issue_token};
use granite_core::validate;

use crate::app::AppState;
use crate::app::dto::{LoginRequest, RegisterRequest, UserView};
use crate::app::errors::{
    domain_error_to_response, json_error, json_success, json_success_with,
    store_error_to_response,
};
use crate::middleware::authorization_header;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> axum::response::Response {
    if let Err(err) = validate::name(&body.name)
        .and_then(|_| validate::email(&body.email))
        .and_then(|_| validate::password(&body.password))
    {
        return domain_error_to_response(err);
    }

    match state.users.email_taken(&body.email, None).await {
        Ok(true) => return json_error(StatusCode::BAD_REQUEST, "email already registered"),
        Ok(false) => {}
        Err(err) => return store_error_to_response(err, "user"),
    }

    let password_hash = match bcrypt::hash(&body.password, bcrypt::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(err) => {
            tracing::error!("password hashing failed: {err}");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "failed to hash password");
        }
    };

    let created = state
        .users
        .create(granite_store::NewUser {
            name: body.name,
            email: body.email,
            password_hash,
            role_id: body.role_id,
        })
        .await;

    match created {
        Ok(user) => json_success_with("registration successful", UserView::from_user(user)),
        Err(err) => store_error_to_response(err, "user"),
    }
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> axum::response::Response {
    match (body.email.is_empty(), body.password.is_empty()) {
        (true, true) => {
            return json_error(StatusCode::BAD_REQUEST, "email and password must not be empty");
        }
        (true, false) => return json_error(StatusCode::BAD_REQUEST, "email must not be empty"),
        (false, true) => return json_error(StatusCode::BAD_REQUEST, "password must not be empty"),
        (false, false) => {}
    }

    let user = match state.users.find_by_email(&body.email).await {
        Ok(Some(user)) => user,
        Ok(None) => return json_error(StatusCode::UNAUTHORIZED, "email not found"),
        Err(err) => return store_error_to_response(err, "user"),
    };

    if !bcrypt::verify(&body.password, &user.password_hash).unwrap_or(false) {
        return json_error(StatusCode::UNAUTHORIZED, "incorrect password");
    }

    let token = match issue_token(state.gate.secret(), user.id, &user.email) {
        Ok(token) => token,
        Err(err) => {
            tracing::error!("token issuance failed: {err}");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "failed to issue token");
        }
    };

    let role = state.roles.get(user.role_id).await.ok().flatten();
    let expired = Utc::now() + Duration::hours(TOKEN_TTL_HOURS);

    json_success_with(
        "login successful",
        serde_json::json!({
            "expired": expired.to_rfc3339(),
            "token": token,
            "user": UserView::from_user(user).with_role(role),
        }),
    )
}

/// Revoke the presented token. The route sits behind the auth middleware, so
/// the token has already been verified and found unrevoked.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> axum::response::Response {
    match state.gate.revoke(authorization_header(&headers)) {
        Ok(()) => json_success("logout successful"),
        Err(err) => json_error(StatusCode::UNAUTHORIZED, err.to_string()),
    }
}

/// Identity claims of the presented token, as seen by the auth middleware.
pub async fn me(
    axum::extract::Extension(current): axum::extract::Extension<crate::context::CurrentUser>,
) -> axum::response::Response {
    json_success_with(
        "current user",
        serde_json::json!({
            "id": current.user_id(),
            "email": current.email(),
        }),
    )
}
