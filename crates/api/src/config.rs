//! Process configuration, read from the environment at startup.

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    /// Listen address, `APP_ADDR`.
    pub addr: String,

    /// Symmetric secret for JWT signing/verification, `JWT_SECRET`.
    pub jwt_secret: String,

    /// Shared secret for the blacklist admin endpoints, `ADMIN_SECRET`.
    pub admin_secret: String,

    /// Path of the persisted token blacklist, `BLACKLIST_PATH`.
    pub blacklist_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });

        Self {
            addr: std::env::var("APP_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            jwt_secret,
            admin_secret: std::env::var("ADMIN_SECRET")
                .unwrap_or_else(|_| "secret123".to_string()),
            blacklist_path: std::env::var("BLACKLIST_PATH")
                .unwrap_or_else(|_| "blacklist.json".to_string())
                .into(),
        }
    }
}
