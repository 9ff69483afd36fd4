use axum::{
    extract::State,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::app::errors::json_error;
use crate::context::CurrentUser;

/// Gate every protected route: verify the bearer credential, reject revoked
/// tokens, and expose the authenticated identity via request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let header = authorization_header(req.headers());

    let claims = state
        .gate
        .authenticate(header)
        .map_err(|err| json_error(axum::http::StatusCode::UNAUTHORIZED, err.to_string()))?;

    req.extensions_mut()
        .insert(CurrentUser::new(claims.id, claims.email));

    Ok(next.run(req).await)
}

pub fn authorization_header(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}
