use reqwest::StatusCode;
use serde_json::json;

use granite_api::config::Config;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
    // Holds the blacklist file for the server's lifetime.
    _dir: tempfile::TempDir,
}

impl TestServer {
    async fn spawn() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let config = Config {
            addr: String::new(),
            jwt_secret: "test-secret".to_string(),
            admin_secret: "secret123".to_string(),
            blacklist_path: dir.path().join("blacklist.json"),
        };

        // Same router as prod, bound to an ephemeral port.
        let app = granite_api::app::build_app(config).await;
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            handle,
            _dir: dir,
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn register_and_login(client: &reqwest::Client, base_url: &str, email: &str) -> String {
    let res = client
        .post(format!("{base_url}/api/register"))
        .json(&json!({
            "name": "Alice",
            "email": email,
            "password": "abc123",
            "role_id": 1,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(format!("{base_url}/api/login"))
        .json(&json!({ "email": email, "password": "abc123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    body["data"]["token"].as_str().unwrap().to_string()
}

fn mint_jwt(secret: &str, exp_offset_secs: i64) -> String {
    use jsonwebtoken::{Algorithm, EncodingKey, Header};

    let claims = json!({
        "id": 1,
        "email": "alice@example.com",
        "exp": chrono::Utc::now().timestamp() + exp_offset_secs,
    });
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

#[tokio::test]
async fn auth_required_for_protected_endpoints() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/user", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn non_bearer_scheme_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/user", srv.base_url))
        .header("Authorization", "Token xyz")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("Bearer"));
}

#[tokio::test]
async fn forged_and_expired_tokens_are_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Signed with the wrong secret.
    let res = client
        .get(format!("{}/api/me", srv.base_url))
        .bearer_auth(mint_jwt("other-secret", 600))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Correct secret, already expired.
    let res = client
        .get(format!("{}/api/me", srv.base_url))
        .bearer_auth(mint_jwt("test-secret", -600))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Correct secret, still valid.
    let res = client
        .get(format!("{}/api/me", srv.base_url))
        .bearer_auth(mint_jwt("test-secret", 600))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"]["email"], "alice@example.com");
}

#[tokio::test]
async fn login_validation_messages() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let cases = [
        (json!({}), "email and password must not be empty"),
        (json!({ "password": "abc123" }), "email must not be empty"),
        (json!({ "email": "a@b.com" }), "password must not be empty"),
    ];
    for (payload, message) in cases {
        let res = client
            .post(format!("{}/api/login", srv.base_url))
            .json(&payload)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["message"], message);
    }

    // Unknown email and wrong password are both unauthorized.
    let res = client
        .post(format!("{}/api/login", srv.base_url))
        .json(&json!({ "email": "ghost@example.com", "password": "abc123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    register_and_login(&client, &srv.base_url, "alice@example.com").await;

    let res = client
        .post(format!("{}/api/register", srv.base_url))
        .json(&json!({
            "name": "Alice Again",
            "email": "alice@example.com",
            "password": "abc123",
            "role_id": 1,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "email already registered");
}

#[tokio::test]
async fn register_rejects_invalid_input() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let cases = [
        json!({ "name": "Al", "email": "al@example.com", "password": "abc123" }),
        json!({ "name": "Alice", "email": "not-an-email", "password": "abc123" }),
        json!({ "name": "Alice", "email": "alice@example.com", "password": "white space" }),
        json!({ "name": "Alice", "email": "alice@example.com", "password": "short" }),
    ];
    for payload in cases {
        let res = client
            .post(format!("{}/api/register", srv.base_url))
            .json(&payload)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "payload: {payload}");
    }
}

#[tokio::test]
async fn logout_revokes_the_token() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &srv.base_url, "alice@example.com").await;

    // Token works before logout.
    let res = client
        .get(format!("{}/api/user", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(format!("{}/api/logout", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Same token is now rejected, even though signature and expiry are fine.
    let res = client
        .get(format!("{}/api/user", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("logged out"));

    // A second logout with the revoked token is rejected by the gate.
    let res = client
        .post(format!("{}/api/logout", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn user_crud_lifecycle() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &srv.base_url, "admin@example.com").await;

    // Create
    let res = client
        .post(format!("{}/api/user", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "name": "Bob",
            "email": "bob@example.com",
            "password": "abc123",
            "role_id": 1,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let created: serde_json::Value = res.json().await.unwrap();
    let id = created["data"]["id"].as_i64().unwrap();
    assert!(created["data"].get("password_hash").is_none());

    // List contains both users.
    let res = client
        .get(format!("{}/api/user", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let listed: serde_json::Value = res.json().await.unwrap();
    assert_eq!(listed["data"].as_array().unwrap().len(), 2);

    // Partial update.
    let res = client
        .put(format!("{}/api/user/{id}", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "name": "Robert" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: serde_json::Value = res.json().await.unwrap();
    assert_eq!(updated["data"]["name"], "Robert");
    assert_eq!(updated["data"]["email"], "bob@example.com");

    // Soft delete, then the user is gone from reads.
    let res = client
        .delete(format!("{}/api/user/{id}", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/api/user/{id}", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn role_crud_lifecycle() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &srv.base_url, "admin@example.com").await;

    let res = client
        .post(format!("{}/api/role", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "name": "editor" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let created: serde_json::Value = res.json().await.unwrap();
    let id = created["data"]["id"].as_i64().unwrap();

    let res = client
        .put(format!("{}/api/role/{id}", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "name": "reviewer" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: serde_json::Value = res.json().await.unwrap();
    assert_eq!(updated["data"]["name"], "reviewer");

    let res = client
        .delete(format!("{}/api/role/{id}", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/api/role/{id}", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn secret_endpoints_require_the_admin_password() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/secret/get-black-list", srv.base_url))
        .json(&json!({ "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .post(format!("{}/api/secret/get-black-list", srv.base_url))
        .json(&json!({ "password": "secret123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn clearing_the_blacklist_readmits_logged_out_tokens() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &srv.base_url, "alice@example.com").await;

    client
        .post(format!("{}/api/logout", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    // The revoked token shows up in the admin listing.
    let res = client
        .post(format!("{}/api/secret/get-black-list", srv.base_url))
        .json(&json!({ "password": "secret123" }))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["data"].get(&token).is_some());

    let res = client
        .post(format!("{}/api/secret/clear-black-list", srv.base_url))
        .json(&json!({ "password": "secret123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // The token itself is still cryptographically valid, so after the
    // operational reset it is admitted again.
    let res = client
        .get(format!("{}/api/user", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}
