//! Application wiring: shared state, router construction.

pub mod dto;
pub mod errors;
pub mod routes;

use std::sync::Arc;

use axum::{Router, http::StatusCode, routing::get};

use granite_auth::{AuthGate, TokenBlacklist};
use granite_store::{RoleStore, UserStore};

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub gate: AuthGate,
    pub users: Arc<UserStore>,
    pub roles: Arc<RoleStore>,
    pub admin_secret: Arc<str>,
}

fn build_in_memory_stores() -> (Arc<UserStore>, Arc<RoleStore>) {
    (
        Arc::new(UserStore::in_memory()),
        Arc::new(RoleStore::in_memory()),
    )
}

#[cfg(feature = "postgres")]
async fn build_postgres_stores() -> (Arc<UserStore>, Arc<RoleStore>) {
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set when USE_PERSISTENT_STORES=true");

    let pool = sqlx::PgPool::connect(&database_url)
        .await
        .expect("failed to connect to Postgres");

    (
        Arc::new(UserStore::Postgres(granite_store::postgres::PgUserStore::new(pool.clone()))),
        Arc::new(RoleStore::Postgres(granite_store::postgres::PgRoleStore::new(pool))),
    )
}

pub async fn build_app(config: Config) -> Router {
    let blacklist = Arc::new(TokenBlacklist::open(&config.blacklist_path));
    let gate = AuthGate::new(config.jwt_secret, blacklist);

    let use_persistent = std::env::var("USE_PERSISTENT_STORES")
        .unwrap_or_else(|_| "false".to_string())
        .parse::<bool>()
        .unwrap_or(false);

    let (users, roles) = if use_persistent {
        #[cfg(feature = "postgres")]
        {
            build_postgres_stores().await
        }
        #[cfg(not(feature = "postgres"))]
        {
            tracing::warn!(
                "USE_PERSISTENT_STORES=true but postgres feature not enabled, falling back to in-memory"
            );
            build_in_memory_stores()
        }
    } else {
        build_in_memory_stores()
    };

    let state = AppState {
        gate,
        users,
        roles,
        admin_secret: config.admin_secret.into(),
    };

    // Protected routes: bearer token checked against signature, expiry, and
    // the revocation registry.
    let protected = Router::new()
        .route("/logout", axum::routing::post(routes::auth::logout))
        .route("/me", get(routes::auth::me))
        .nest("/user", routes::users::router())
        .nest("/role", routes::roles::router())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::auth_middleware,
        ));

    // Public routes. The secret endpoints guard themselves with the shared
    // admin secret from the request body.
    let public = Router::new()
        .route("/register", axum::routing::post(routes::auth::register))
        .route("/login", axum::routing::post(routes::auth::login))
        .nest("/secret", routes::secret::router());

    Router::new()
        .route("/health", get(health))
        .nest("/api", public.merge(protected))
        .with_state(state)
}

async fn health() -> StatusCode {
    StatusCode::OK
}
