use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use migration::MigratorTrait;
use serde_json::json;
use tower::Service;
use uuid::Uuid;

use server::routes::{self, auth};
use service::auth::token::TokenWindows;

fn cors() -> tower_http::cors::CorsLayer { tower_http::cors::CorsLayer::very_permissive() }

async fn build_app() -> anyhow::Result<Router> {
    let db = models::db::connect().await?;
    migration::Migrator::up(&db, None).await?;
    let state = auth::ServerState {
        db,
        auth: auth::ServerAuthConfig { jwt_secret: "test-secret".into(), windows: TokenWindows::default() },
    };
    Ok(routes::build_router(cors(), state))
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_register_login_me_flow() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let mut app = build_app().await?;

    let username = format!("user_{}", &Uuid::new_v4().simple().to_string()[..10]);
    let email = format!("{}@kampus.ac.id", username);
    let password = "S3curePass!";

    // Register
    let resp = app
        .call(post_json("/api/v1/auth/register", json!({
            "username": username, "email": email, "password": password, "user_type": "dosen"
        })))
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Login
    let resp = app
        .call(post_json("/api/v1/auth/login", json!({"username": username, "password": password})))
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let access = body["access_token"].as_str().unwrap().to_string();
    let refresh = body["refresh_token"].as_str().unwrap().to_string();
    assert_eq!(body["user_type"], "dosen");

    // Me with the access token
    let req = Request::builder()
        .method("GET")
        .uri("/api/v1/auth/me")
        .header("authorization", format!("Bearer {}", access))
        .body(Body::empty())?;
    let resp = app.call(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let me = body_json(resp).await;
    assert_eq!(me["username"], username.as_str());

    // Refresh rotates the pair
    let resp = app
        .call(post_json("/api/v1/auth/refresh", json!({"refresh_token": refresh})))
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let renewed = body_json(resp).await;
    assert!(renewed["access_token"].as_str().is_some());

    Ok(())
}

#[tokio::test]
async fn test_login_wrong_password() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let mut app = build_app().await?;

    let username = format!("user_{}", &Uuid::new_v4().simple().to_string()[..10]);
    let email = format!("{}@kampus.ac.id", username);

    let _ = app
        .call(post_json("/api/v1/auth/register", json!({
            "username": username, "email": email, "password": "StrongPass123", "user_type": "mahasiswa"
        })))
        .await?;

    let resp = app
        .call(post_json("/api/v1/auth/login", json!({"username": username, "password": "wrong"})))
        .await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn test_register_short_password_rejected() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let mut app = build_app().await?;

    let resp = app
        .call(post_json("/api/v1/auth/register", json!({
            "username": format!("u{}", Uuid::new_v4().simple()),
            "email": "a@b.ac.id", "password": "short", "user_type": "dosen"
        })))
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_protected_route_requires_token() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let mut app = build_app().await?;

    // No Authorization header
    let req = Request::builder().method("GET").uri("/api/v1/kurikulum").body(Body::empty())?;
    let resp = app.call(req).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Garbage token
    let req = Request::builder()
        .method("GET")
        .uri("/api/v1/kurikulum")
        .header("authorization", "Bearer not-a-token")
        .body(Body::empty())?;
    let resp = app.call(req).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn test_refresh_token_cannot_access_api() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let mut app = build_app().await?;

    let username = format!("user_{}", &Uuid::new_v4().simple().to_string()[..10]);
    let email = format!("{}@kampus.ac.id", username);
    let _ = app
        .call(post_json("/api/v1/auth/register", json!({
            "username": username, "email": email, "password": "StrongPass123", "user_type": "dosen"
        })))
        .await?;
    let resp = app
        .call(post_json("/api/v1/auth/login", json!({"username": username, "password": "StrongPass123"})))
        .await?;
    let body = body_json(resp).await;
    let refresh = body["refresh_token"].as_str().unwrap();

    let req = Request::builder()
        .method("GET")
        .uri("/api/v1/kurikulum")
        .header("authorization", format!("Bearer {}", refresh))
        .body(Body::empty())?;
    let resp = app.call(req).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
