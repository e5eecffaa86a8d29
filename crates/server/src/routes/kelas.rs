use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use service::auth::token::Claims;
use service::enrollment_service;
use service::kelas_service;

use crate::errors::JsonApiError;
use crate::routes::auth::{require_role, ServerState};

const MANAGE_ROLES: &[&str] = &["kaprodi", "admin"];

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub kode_mk: Option<String>,
    pub id_kurikulum: Option<Uuid>,
    pub semester: Option<String>,
    pub tahun_ajaran: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateKelasInput {
    pub kode_mk: String,
    pub id_kurikulum: Uuid,
    #[serde(default)]
    pub id_rps: Option<Uuid>,
    pub nama_kelas: String,
    pub semester: String,
    pub tahun_ajaran: String,
    #[serde(default = "default_kapasitas")]
    pub kapasitas: i32,
}

fn default_kapasitas() -> i32 { 40 }

#[derive(Debug, Deserialize)]
pub struct EnrollInput {
    pub nim: String,
}

pub async fn list(
    State(state): State<ServerState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<models::kelas::Model>>, JsonApiError> {
    let rows = kelas_service::list_kelas(
        &state.db,
        q.kode_mk.as_deref(),
        q.id_kurikulum,
        q.semester.as_deref(),
        q.tahun_ajaran.as_deref(),
        q.status.as_deref(),
    )
    .await?;
    Ok(Json(rows))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<models::kelas::Model>, JsonApiError> {
    match kelas_service::get_kelas(&state.db, id).await? {
        Some(m) => Ok(Json(m)),
        None => Err(JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some("kelas not found".into()))),
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<CreateKelasInput>,
) -> Result<(StatusCode, Json<models::kelas::Model>), JsonApiError> {
    require_role(&claims, MANAGE_ROLES)?;
    let created = kelas_service::create_kelas(
        &state.db,
        &input.kode_mk,
        input.id_kurikulum,
        input.id_rps,
        &input.nama_kelas,
        &input.semester,
        &input.tahun_ajaran,
        input.kapasitas,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn open(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<models::kelas::Model>, JsonApiError> {
    require_role(&claims, MANAGE_ROLES)?;
    Ok(Json(kelas_service::open_kelas(&state.db, id).await?))
}

pub async fn close(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<models::kelas::Model>, JsonApiError> {
    require_role(&claims, MANAGE_ROLES)?;
    Ok(Json(kelas_service::close_kelas(&state.db, id).await?))
}

pub async fn complete(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<models::kelas::Model>, JsonApiError> {
    require_role(&claims, MANAGE_ROLES)?;
    Ok(Json(kelas_service::complete_kelas(&state.db, id).await?))
}

/// Students may enroll themselves; staff can enroll anyone.
pub async fn enroll(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(input): Json<EnrollInput>,
) -> Result<(StatusCode, Json<models::enrollment::Model>), JsonApiError> {
    if claims.role == "mahasiswa" {
        let own = claims_ref_matches(&state, &claims, &input.nim).await?;
        if !own {
            return Err(JsonApiError::forbidden());
        }
    } else {
        require_role(&claims, MANAGE_ROLES)?;
    }
    let created = enrollment_service::enroll(&state.db, id, &input.nim).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// A student account carries its NIM in `ref_id`.
async fn claims_ref_matches(state: &ServerState, claims: &Claims, nim: &str) -> Result<bool, JsonApiError> {
    let svc = state.auth_service();
    let user = svc.current_user(&claims.sub).await?;
    Ok(user.ref_id.as_deref() == Some(nim))
}

pub async fn list_enrollment(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<models::enrollment::Model>>, JsonApiError> {
    kelas_service::get_kelas(&state.db, id)
        .await?
        .ok_or_else(|| JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some("kelas not found".into())))?;
    let rows = enrollment_service::list_by_kelas(&state.db, id).await?;
    Ok(Json(rows))
}
