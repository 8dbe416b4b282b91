//! HTTP API integration tests
//!
//! Each test spins up a real server on an ephemeral port and drives it
//! with reqwest, covering the full register/login/logout/me flows.

use authgate::api::server::{create_router, AppState};
use authgate::config::Config;
use serde_json::{json, Value};
use std::sync::Arc;

/// Start a server on an ephemeral port and return its base URL
async fn spawn_test_server() -> String {
    let mut config = Config::default();
    // Minimum bcrypt cost keeps these tests fast
    config.auth.bcrypt_cost = 4;

    let state = Arc::new(AppState::new(config));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server run");
    });

    format!("http://{}", addr)
}

async fn register_user(client: &reqwest::Client, base: &str, email: &str) -> reqwest::Response {
    client
        .post(format!("{}/register", base))
        .json(&json!({
            "name": "A",
            "email": email,
            "password": "secret123",
        }))
        .send()
        .await
        .expect("register request")
}

#[tokio::test]
async fn test_health_endpoint() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/health", base))
        .send()
        .await
        .expect("health request");
    assert!(response.status().is_success());
}

#[tokio::test]
async fn test_register_returns_token_user_and_cookie() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();

    let response = register_user(&client, &base, "a@x.com").await;
    assert_eq!(response.status(), 201);

    let cookie = response
        .headers()
        .get("set-cookie")
        .expect("set-cookie header")
        .to_str()
        .expect("cookie string")
        .to_string();
    assert!(cookie.starts_with("token="));
    // Cookie lifetime matches the 30-day token TTL
    assert!(cookie.contains(&format!("Max-Age={}", 43200 * 60)));

    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["user"]["email"], "a@x.com");
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email_is_validation_error() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();

    assert_eq!(register_user(&client, &base, "a@x.com").await.status(), 201);

    let response = register_user(&client, &base, "a@x.com").await;
    assert_eq!(response.status(), 422);

    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["success"], false);
    assert!(body["errors"]["email"].is_array());
}

#[tokio::test]
async fn test_login_returns_fresh_token_for_same_user() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();

    let register_body: Value = register_user(&client, &base, "a@x.com")
        .await
        .json()
        .await
        .expect("register body");
    let register_token = register_body["token"].as_str().expect("token").to_string();

    let response = client
        .post(format!("{}/login", base))
        .json(&json!({"email": "a@x.com", "password": "secret123"}))
        .send()
        .await
        .expect("login request");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"]["email"], "a@x.com");
    let login_token = body["token"].as_str().expect("token");
    assert_ne!(login_token, register_token);
}

#[tokio::test]
async fn test_login_failure_responses_are_identical() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();

    register_user(&client, &base, "a@x.com").await;

    let wrong_password = client
        .post(format!("{}/login", base))
        .json(&json!({"email": "a@x.com", "password": "wrong-password"}))
        .send()
        .await
        .expect("login request");
    let unknown_email = client
        .post(format!("{}/login", base))
        .json(&json!({"email": "nobody@x.com", "password": "secret123"}))
        .send()
        .await
        .expect("login request");

    assert_eq!(wrong_password.status(), 401);
    assert_eq!(unknown_email.status(), 401);

    let a: Value = wrong_password.json().await.expect("json body");
    let b: Value = unknown_email.json().await.expect("json body");
    // No detail may reveal whether the email exists
    assert_eq!(a, b);
    assert_eq!(a["message"], "Invalid credentials");
    assert!(a["errors"]["credentials"].is_array());
}

#[tokio::test]
async fn test_me_with_bearer_token() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();

    let body: Value = register_user(&client, &base, "a@x.com")
        .await
        .json()
        .await
        .expect("register body");
    let token = body["token"].as_str().expect("token");

    let response = client
        .get(format!("{}/me", base))
        .bearer_auth(token)
        .send()
        .await
        .expect("me request");
    assert_eq!(response.status(), 200);

    let me: Value = response.json().await.expect("json body");
    assert_eq!(me["success"], true);
    assert_eq!(me["user"]["email"], "a@x.com");
}

#[tokio::test]
async fn test_me_with_cookie_token() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();

    let body: Value = register_user(&client, &base, "a@x.com")
        .await
        .json()
        .await
        .expect("register body");
    let token = body["token"].as_str().expect("token");

    let response = client
        .get(format!("{}/me", base))
        .header("Cookie", format!("token={}", token))
        .send()
        .await
        .expect("me request");
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_me_without_token() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/me", base))
        .send()
        .await
        .expect("me request");
    assert_eq!(response.status(), 401);

    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "User not authenticated");
}

#[tokio::test]
async fn test_logout_revokes_the_presented_token() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();

    let body: Value = register_user(&client, &base, "a@x.com")
        .await
        .json()
        .await
        .expect("register body");
    let token = body["token"].as_str().expect("token").to_string();

    let response = client
        .post(format!("{}/logout", base))
        .bearer_auth(&token)
        .send()
        .await
        .expect("logout request");
    assert_eq!(response.status(), 200);
    let logout: Value = response.json().await.expect("json body");
    assert_eq!(logout["message"], "Logged out successfully");

    // The token no longer authenticates
    let me = client
        .get(format!("{}/me", base))
        .bearer_auth(&token)
        .send()
        .await
        .expect("me request");
    assert_eq!(me.status(), 401);

    // A second logout with the same token is unauthenticated
    let again = client
        .post(format!("{}/logout", base))
        .bearer_auth(&token)
        .send()
        .await
        .expect("logout request");
    assert_eq!(again.status(), 404);
    let not_found: Value = again.json().await.expect("json body");
    assert_eq!(not_found["error"], "User not found!");
}

#[tokio::test]
async fn test_logout_only_revokes_the_current_device() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();

    let body: Value = register_user(&client, &base, "a@x.com")
        .await
        .json()
        .await
        .expect("register body");
    let phone = body["token"].as_str().expect("token").to_string();

    let login: Value = client
        .post(format!("{}/login", base))
        .json(&json!({"email": "a@x.com", "password": "secret123"}))
        .send()
        .await
        .expect("login request")
        .json()
        .await
        .expect("login body");
    let laptop = login["token"].as_str().expect("token").to_string();

    client
        .post(format!("{}/logout", base))
        .bearer_auth(&phone)
        .send()
        .await
        .expect("logout request");

    let me = client
        .get(format!("{}/me", base))
        .bearer_auth(&laptop)
        .send()
        .await
        .expect("me request");
    assert_eq!(me.status(), 200);
}

#[tokio::test]
async fn test_register_validation_errors() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/register", base))
        .json(&json!({"name": "", "email": "bad", "password": "short"}))
        .send()
        .await
        .expect("register request");
    assert_eq!(response.status(), 422);

    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["message"], "The given data was invalid");
    assert!(body["errors"]["name"].is_array());
    assert!(body["errors"]["email"].is_array());
    assert!(body["errors"]["password"].is_array());
}
