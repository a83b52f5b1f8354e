/// Common test utilities and fixtures
use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use faultline_server::{api, services::AuthService, state::AppState};
use faultline_storage::Database;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

/// Test user credentials
pub mod fixtures {
    pub const ALICE: &str = "alice@example.com";
    pub const BOB: &str = "bob@example.com";
    pub const PASSWORD: &str = "password123";
}

/// A router over a throwaway database; the temp dir cleans up on drop.
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    _temp_dir: TempDir,
}

/// Build the full application router against a fresh migrated database.
pub async fn create_test_app() -> TestApp {
    let temp_dir = tempfile::tempdir().unwrap();
    let db_url = format!("sqlite://{}", temp_dir.path().join("test.db").display());

    let pool = faultline_storage::create_pool(&db_url).await.unwrap();
    faultline_storage::run_migrations(&pool).await.unwrap();
    let db = Arc::new(Database::new(pool));

    // Minimum bcrypt cost keeps the suite fast
    let auth = Arc::new(AuthService::new("test-secret-key".to_string(), 7, 4));

    let state = AppState::new(db, auth);
    TestApp {
        app: api::router(state.clone()),
        state,
        _temp_dir: temp_dir,
    }
}

/// Build a JSON request, optionally authenticated.
pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().uri(uri).method(method);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Register a user through the API, returning (user id, bearer token).
pub async fn register_user(app: &Router, email: &str) -> (i64, String) {
    let request = json_request(
        "POST",
        "/api/auth/register",
        None,
        Some(serde_json::json!({
            "email": email,
            "password": fixtures::PASSWORD,
        })),
    );

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), 201, "registration failed for {email}");

    let json = body_json(response).await;
    let user_id = json["data"]["user"]["id"].as_i64().unwrap();
    let token = json["data"]["token"].as_str().unwrap().to_string();
    (user_id, token)
}

/// Create an issue through the API, returning its JSON representation.
pub async fn create_issue(
    app: &Router,
    token: &str,
    body: serde_json::Value,
) -> serde_json::Value {
    let request = json_request("POST", "/api/issues", Some(token), Some(body));
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), 201, "issue creation failed");

    let json = body_json(response).await;
    json["data"]["issue"].clone()
}
