//! End-to-end flows through the HTTP surface: curriculum lifecycle, the
//! immutability of a student's curriculum assignment, and composite course
//! keys across curricula.

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

async fn build_app() -> anyhow::Result<(Router, sea_orm::DatabaseConnection)> {
    let db = models::db::connect().await?;
    migration::Migrator::up(&db, None).await?;
    let state = auth::ServerState {
        db: db.clone(),
        auth: auth::ServerAuthConfig { jwt_secret: "test-secret".into(), windows: TokenWindows::default() },
    };
    Ok((routes::build_router(cors(), state), db))
}

fn post_json(uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(t) = token {
        builder = builder.header("authorization", format!("Bearer {}", t));
    }
    builder.body(Body::from(serde_json::to_vec(&body).unwrap())).unwrap()
}

fn put_json(uri: &str, token: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Register a staff account and return an access token.
async fn staff_token(app: &mut Router, user_type: &str) -> anyhow::Result<String> {
    let username = format!("{}_{}", user_type, &Uuid::new_v4().simple().to_string()[..10]);
    let email = format!("{}@kampus.ac.id", username);
    let resp = app
        .call(post_json("/api/v1/auth/register", None, json!({
            "username": username, "email": email, "password": "StrongPass123", "user_type": user_type
        })))
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let resp = app
        .call(post_json("/api/v1/auth/login", None, json!({"username": username, "password": "StrongPass123"})))
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    Ok(body["access_token"].as_str().unwrap().to_string())
}

async fn seed_prodi(db: &sea_orm::DatabaseConnection) -> anyhow::Result<String> {
    let id = format!("P{}", &Uuid::new_v4().simple().to_string()[..8]);
    models::prodi::create(db, &id, "Teknik Informatika", Some("S1")).await?;
    Ok(id)
}

#[tokio::test]
async fn test_kurikulum_lifecycle_over_http() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let (mut app, db) = build_app().await?;
    let token = staff_token(&mut app, "kaprodi").await?;
    let prodi = seed_prodi(&db).await?;

    // Create
    let resp = app
        .call(post_json("/api/v1/kurikulum", Some(&token), json!({
            "id_prodi": prodi, "kode_kurikulum": "K2024", "nama_kurikulum": "Kurikulum OBE 2024", "tahun_berlaku": 2024
        })))
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = body_json(resp).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["status"], "draft");

    // Duplicate kode within the prodi conflicts
    let resp = app
        .call(post_json("/api/v1/kurikulum", Some(&token), json!({
            "id_prodi": prodi, "kode_kurikulum": "K2024", "nama_kurikulum": "Duplikat", "tahun_berlaku": 2024
        })))
        .await?;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Activation before approval is rejected
    let resp = app
        .call(post_json(&format!("/api/v1/kurikulum/{}/activate", id), Some(&token), json!({"set_as_primary": true})))
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Approve, then activate as primary
    let resp = app
        .call(post_json(&format!("/api/v1/kurikulum/{}/approve", id), Some(&token), json!({
            "nomor_sk": "SK/001/2024", "tanggal_sk": "2024-07-01"
        })))
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = app
        .call(post_json(&format!("/api/v1/kurikulum/{}/activate", id), Some(&token), json!({"set_as_primary": true})))
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let active = body_json(resp).await;
    assert_eq!(active["status"], "aktif");
    assert_eq!(active["is_primary"], true);

    // Frozen after activation
    let resp = app
        .call(put_json(&format!("/api/v1/kurikulum/{}", id), &token, json!({"nama_kurikulum": "Late edit"})))
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn test_mahasiswa_kurikulum_is_immutable_over_http() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let (mut app, db) = build_app().await?;
    let token = staff_token(&mut app, "admin").await?;
    let prodi = seed_prodi(&db).await?;

    // Two activated curricula
    let mut ids = Vec::new();
    for kode in ["K2020", "K2024"] {
        let resp = app
            .call(post_json("/api/v1/kurikulum", Some(&token), json!({
                "id_prodi": prodi, "kode_kurikulum": kode, "nama_kurikulum": format!("Kurikulum {}", kode), "tahun_berlaku": 2024
            })))
            .await?;
        let body = body_json(resp).await;
        let id = body["id"].as_str().unwrap().to_string();
        app.call(post_json(&format!("/api/v1/kurikulum/{}/approve", id), Some(&token), json!({
            "nomor_sk": format!("SK/{}", kode), "tanggal_sk": "2024-07-01"
        }))).await?;
        app.call(post_json(&format!("/api/v1/kurikulum/{}/activate", id), Some(&token), json!({"set_as_primary": false}))).await?;
        ids.push(id);
    }

    let nim = format!("M{}", &Uuid::new_v4().simple().to_string()[..9]);
    let resp = app
        .call(post_json("/api/v1/mahasiswa", Some(&token), json!({
            "nim": nim, "nama": "Budi Santoso", "email": format!("{}@kampus.ac.id", nim),
            "id_prodi": prodi, "id_kurikulum": ids[0], "angkatan": "2024"
        })))
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Moving the student to the other curriculum must be rejected
    let resp = app
        .call(put_json(&format!("/api/v1/mahasiswa/{}", nim), &token, json!({"id_kurikulum": ids[1]})))
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Ordinary field updates still work
    let resp = app
        .call(put_json(&format!("/api/v1/mahasiswa/{}", nim), &token, json!({"status": "cuti"})))
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = body_json(resp).await;
    assert_eq!(updated["status"], "cuti");
    assert_eq!(updated["id_kurikulum"], ids[0].as_str());

    Ok(())
}

#[tokio::test]
async fn test_same_course_code_across_curricula_over_http() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let (mut app, db) = build_app().await?;
    let token = staff_token(&mut app, "kaprodi").await?;
    let prodi = seed_prodi(&db).await?;

    let mut ids = Vec::new();
    for kode in ["K2020", "K2024"] {
        let resp = app
            .call(post_json("/api/v1/kurikulum", Some(&token), json!({
                "id_prodi": prodi, "kode_kurikulum": kode, "nama_kurikulum": format!("Kurikulum {}", kode), "tahun_berlaku": 2024
            })))
            .await?;
        let body = body_json(resp).await;
        ids.push(body["id"].as_str().unwrap().to_string());
    }

    for id in &ids {
        let resp = app
            .call(post_json("/api/v1/matakuliah", Some(&token), json!({
                "kode_mk": "IF101", "id_kurikulum": id, "nama_mk": "Dasar Pemrograman",
                "sks": 3, "semester": 1, "jenis_mk": "wajib"
            })))
            .await?;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    // Same code again under the first curriculum conflicts
    let resp = app
        .call(post_json("/api/v1/matakuliah", Some(&token), json!({
            "kode_mk": "IF101", "id_kurikulum": ids[0], "nama_mk": "Lagi",
            "sks": 2, "semester": 1, "jenis_mk": "pilihan"
        })))
        .await?;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // DELETE deactivates but never removes
    let resp = app
        .call(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/v1/matakuliah/{}/IF101", ids[0]))
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let resp = app
        .call(
            Request::builder()
                .method("GET")
                .uri(format!("/api/v1/matakuliah/{}/IF101", ids[0]))
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let after = body_json(resp).await;
    assert_eq!(after["is_active"], false);

    Ok(())
}

#[tokio::test]
async fn test_role_guard_forbids_student_writes() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let (mut app, db) = build_app().await?;
    let token = staff_token(&mut app, "mahasiswa").await?;
    let prodi = seed_prodi(&db).await?;

    let resp = app
        .call(post_json("/api/v1/kurikulum", Some(&token), json!({
            "id_prodi": prodi, "kode_kurikulum": "K2024", "nama_kurikulum": "Kurikulum", "tahun_berlaku": 2024
        })))
        .await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    Ok(())
}
