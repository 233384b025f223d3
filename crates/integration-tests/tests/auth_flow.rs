//! End-to-end tests for login, registration, logout, and the session gate.

use axum::http::StatusCode;
use pantry_integration_tests::TestApp;

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn test_home_reports_anonymous_session() {
    let mut app = TestApp::seeded().await;

    let body = app.get("/").await.json();
    assert_eq!(body["authenticated"], false);
    assert!(body["username"].is_null());
}

#[tokio::test]
async fn test_login_sets_session() {
    let mut app = TestApp::seeded().await;

    let response = app
        .post_form(
            "/auth/login",
            &[("username", "admin"), ("password", "password123")],
        )
        .await;
    assert_eq!(response.redirect(), "/");
    assert!(app.has_session_cookie());

    let body = app.get("/").await.json();
    assert_eq!(body["authenticated"], true);
    assert_eq!(body["username"], "admin");
}

#[tokio::test]
async fn test_wrong_password_and_unknown_user_look_the_same() {
    let mut app = TestApp::seeded().await;

    let wrong = app
        .post_form("/auth/login", &[("username", "admin"), ("password", "nope")])
        .await;
    let unknown = app
        .post_form("/auth/login", &[("username", "ghost"), ("password", "nope")])
        .await;

    assert_eq!(wrong.status, unknown.status);
    assert_eq!(wrong.redirect(), "/auth/login?error=credentials");
    assert_eq!(unknown.redirect(), "/auth/login?error=credentials");
    assert_eq!(app.get("/").await.json()["authenticated"], false);
}

#[tokio::test]
async fn test_login_form_trims_username() {
    let mut app = TestApp::seeded().await;

    let response = app
        .post_form(
            "/auth/login",
            &[("username", "  admin "), ("password", "password123")],
        )
        .await;
    assert_eq!(response.redirect(), "/");
    assert_eq!(app.get("/").await.json()["username"], "admin");
}

#[tokio::test]
async fn test_login_with_blank_fields() {
    let mut app = TestApp::seeded().await;

    let response = app
        .post_form("/auth/login", &[("username", "admin"), ("password", "")])
        .await;
    assert_eq!(response.redirect(), "/auth/login?error=missing_fields");
}

#[tokio::test]
async fn test_login_page_echoes_message_code() {
    let mut app = TestApp::new().await;

    let body = app.get("/auth/login?error=credentials").await.json();
    assert_eq!(body["error"], "credentials");
    assert_eq!(body["authenticated"], false);
}

// =============================================================================
// Registration
// =============================================================================

#[tokio::test]
async fn test_register_then_login() {
    let mut app = TestApp::new().await;

    let response = app
        .post_form(
            "/auth/register",
            &[
                ("username", "carol"),
                ("password", "abcdef"),
                ("confirm_password", "abcdef"),
            ],
        )
        .await;
    assert_eq!(response.redirect(), "/auth/login?success=registered");
    // Registering does not sign in.
    assert_eq!(app.get("/").await.json()["authenticated"], false);

    let response = app
        .post_form(
            "/auth/login",
            &[("username", "carol"), ("password", "abcdef")],
        )
        .await;
    assert_eq!(response.redirect(), "/");
}

#[tokio::test]
async fn test_register_rejections() {
    let mut app = TestApp::seeded().await;

    let cases: [(&[(&str, &str)], &str); 4] = [
        (
            &[("username", ""), ("password", "abcdef"), ("confirm_password", "abcdef")],
            "missing_fields",
        ),
        (
            &[("username", "carol"), ("password", "abcdef"), ("confirm_password", "abcdeg")],
            "password_mismatch",
        ),
        (
            &[("username", "carol"), ("password", "abc"), ("confirm_password", "abc")],
            "password_too_short",
        ),
        (
            &[("username", "admin"), ("password", "abcdef"), ("confirm_password", "abcdef")],
            "username_taken",
        ),
    ];

    for (fields, code) in cases {
        let response = app.post_form("/auth/register", fields).await;
        assert_eq!(response.redirect(), format!("/auth/register?error={code}"));
    }

    // The duplicate attempt did not touch the original account.
    let response = app
        .post_form(
            "/auth/login",
            &[("username", "admin"), ("password", "password123")],
        )
        .await;
    assert_eq!(response.redirect(), "/");
}

// =============================================================================
// Logout and the session gate
// =============================================================================

#[tokio::test]
async fn test_logout_revokes_access() {
    let mut app = TestApp::logged_in().await;
    assert_eq!(app.get("/products").await.status, StatusCode::OK);

    let response = app.post_form("/auth/logout", &[]).await;
    assert_eq!(response.redirect(), "/auth/login?success=logged_out");

    let response = app.get("/products").await;
    assert_eq!(response.redirect(), "/auth/login");
}

#[tokio::test]
async fn test_protected_pages_redirect_when_anonymous() {
    let mut app = TestApp::seeded().await;

    for uri in ["/products", "/products/search?q=arroz", "/products/1"] {
        let response = app.get(uri).await;
        assert_eq!(response.redirect(), "/auth/login", "GET {uri}");
    }

    let response = app.post_form("/products/1/delete", &[]).await;
    assert_eq!(response.redirect(), "/auth/login");
}

#[tokio::test]
async fn test_health_endpoints_are_public() {
    let mut app = TestApp::new().await;

    let live = app.get("/health").await;
    assert_eq!(live.status, StatusCode::OK);
    assert_eq!(live.body, b"ok");

    assert_eq!(app.get("/health/ready").await.status, StatusCode::OK);
}
