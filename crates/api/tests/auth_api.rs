//! HTTP-level integration tests for registration, login and the auth guard.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, create_user, get_auth, post_json, send_empty, TEST_PASSWORD};
use jsonwebtoken::{encode, EncodingKey, Header};
use realty_api::auth::jwt::Claims;
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_returns_token_and_plain_user(pool: PgPool) {
    let test = common::build_test_app(pool);

    let body = json!({
        "name": "Asha",
        "email": "Asha@Example.com",
        "password": "secret1",
        "phone": "9876543210",
        "role": "admin",
    });
    let response = post_json(test.app(), "/api/users/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert!(json["token"].is_string());
    assert_eq!(json["user"]["email"], "asha@example.com");
    assert_eq!(json["user"]["role"], "user", "role is never taken from the request");
    assert_eq!(json["user"]["isAdmin"], false);
    assert!(json["user"].get("password_hash").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_rejects_missing_and_invalid_fields(pool: PgPool) {
    let test = common::build_test_app(pool);

    let cases = [
        (json!({ "email": "a@b.com", "password": "secret1" }), "name"),
        (
            json!({ "name": "x".repeat(31), "email": "a@b.com", "password": "secret1" }),
            "30 characters",
        ),
        (
            json!({ "name": "Asha", "email": "not-an-email", "password": "secret1" }),
            "valid email",
        ),
        (
            json!({ "name": "Asha", "email": "a@b.com", "password": "123" }),
            "at least 6",
        ),
    ];

    for (body, fragment) in cases {
        let response = post_json(test.app(), "/api/users/register", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        let message = json["message"].as_str().unwrap();
        assert!(message.contains(fragment), "{message:?} should mention {fragment:?}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_duplicate_email_conflicts(pool: PgPool) {
    create_user(&pool, "taken@example.com", "user").await;
    let test = common::build_test_app(pool);

    let body = json!({ "name": "Asha", "email": "taken@example.com", "password": "secret1" });
    let response = post_json(test.app(), "/api/users/register", body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_success_and_me(pool: PgPool) {
    let user = create_user(&pool, "asha@example.com", "admin").await;
    let test = common::build_test_app(pool);

    let body = json!({ "email": "asha@example.com", "password": TEST_PASSWORD });
    let response = post_json(test.app(), "/api/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["user"]["id"], user.id);
    assert_eq!(json["user"]["isAdmin"], true);

    let token = json["token"].as_str().unwrap().to_string();
    let response = get_auth(test.app(), "/api/users/me", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let me = body_json(response).await;
    assert_eq!(me["user"]["email"], "asha@example.com");
    assert_eq!(me["user"]["phone"], "9876543210");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_failures_are_indistinguishable(pool: PgPool) {
    create_user(&pool, "asha@example.com", "user").await;
    let test = common::build_test_app(pool);

    for body in [
        json!({ "email": "asha@example.com", "password": "wrong-password" }),
        json!({ "email": "ghost@example.com", "password": TEST_PASSWORD }),
    ] {
        let response = post_json(test.app(), "/api/users/login", body).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["message"], "Invalid credentials");
    }

    let response = post_json(test.app(), "/api/users/login", json!({ "email": "a@b.com" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Auth guard
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn guard_messages_distinguish_failure_modes(pool: PgPool) {
    let user = create_user(&pool, "asha@example.com", "user").await;
    let test = common::build_test_app(pool.clone());

    // No header.
    let response = get_auth(test.app(), "/api/users/me", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await["message"],
        "No token provided or invalid format"
    );

    // Garbage token.
    let response = get_auth(test.app(), "/api/users/me", Some("garbage")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Invalid token");

    // Expired token.
    let now = chrono::Utc::now().timestamp();
    let expired = encode(
        &Header::default(),
        &Claims {
            sub: user.id,
            role: "user".into(),
            exp: now - 600,
            iat: now - 1200,
            jti: "expired".into(),
        },
        &EncodingKey::from_secret(test.config.jwt.secret.as_bytes()),
    )
    .unwrap();
    let response = get_auth(test.app(), "/api/users/me", Some(&expired)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await["message"],
        "Token expired. Please log in again."
    );

    // Valid token for a user that has since been deleted.
    let token = test.token_for(&user);
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();
    let response = get_auth(test.app(), "/api/users/me", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "User not found");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_route_requires_admin_role(pool: PgPool) {
    let user = create_user(&pool, "user@example.com", "user").await;
    let admin = create_user(&pool, "admin@example.com", "admin").await;
    let test = common::build_test_app(pool);

    let response = send_empty(test.app(), Method::DELETE, "/api/properties/1", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let token = test.token_for(&user);
    let response = send_empty(test.app(), Method::DELETE, "/api/properties/1", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["message"], "Admin access required");

    // Admin passes the guard and reaches the handler.
    let token = test.token_for(&admin);
    let response = send_empty(test.app(), Method::DELETE, "/api/properties/1", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn role_is_read_from_database_not_token(pool: PgPool) {
    let user = create_user(&pool, "user@example.com", "user").await;
    let test = common::build_test_app(pool);

    // A token claiming admin for a plain user is still refused.
    let forged_role = realty_api::auth::jwt::generate_access_token(user.id, "admin", &test.config.jwt)
        .unwrap();
    let response =
        get_auth(test.app(), "/api/general-inquiries", Some(&forged_role)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Admin seeding
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_seed_is_created_once(pool: PgPool) {
    use realty_api::config::AdminSeed;
    use realty_api::handlers::user::ensure_admin_account;

    let seed = AdminSeed {
        name: "Root".into(),
        email: "root@example.com".into(),
        password: "admin-pass".into(),
    };
    assert!(ensure_admin_account(&pool, &seed).await.unwrap());
    assert!(!ensure_admin_account(&pool, &seed).await.unwrap());

    let test = common::build_test_app(pool);
    let body = json!({ "email": "root@example.com", "password": "admin-pass" });
    let response = post_json(test.app(), "/api/users/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["user"]["role"], "admin");
}
