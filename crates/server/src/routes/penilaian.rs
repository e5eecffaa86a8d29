use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use service::auth::token::Claims;
use service::enrollment_service;
use service::penilaian_service;

use crate::errors::JsonApiError;
use crate::routes::auth::{require_role, ServerState};

const KOMPONEN_ROLES: &[&str] = &["dosen", "kaprodi", "admin"];
const NILAI_ROLES: &[&str] = &["dosen", "admin"];

#[derive(Debug, Deserialize)]
pub struct CreateKomponenInput {
    #[serde(default)]
    pub id_cpmk: Option<Uuid>,
    pub nama_komponen: String,
    pub bobot: Decimal,
    #[serde(default = "default_nilai_maksimal")]
    pub nilai_maksimal: Decimal,
}

fn default_nilai_maksimal() -> Decimal { Decimal::from(100) }

#[derive(Debug, Deserialize)]
pub struct UpsertNilaiInput {
    pub id_komponen: Uuid,
    pub nilai_mentah: Decimal,
    #[serde(default)]
    pub catatan: Option<String>,
}

pub async fn list_komponen(
    State(state): State<ServerState>,
    Path(id_kelas): Path<Uuid>,
) -> Result<Json<Vec<models::komponen_penilaian::Model>>, JsonApiError> {
    let rows = penilaian_service::list_komponen(&state.db, id_kelas).await?;
    Ok(Json(rows))
}

pub async fn create_komponen(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id_kelas): Path<Uuid>,
    Json(input): Json<CreateKomponenInput>,
) -> Result<(StatusCode, Json<models::komponen_penilaian::Model>), JsonApiError> {
    require_role(&claims, KOMPONEN_ROLES)?;
    let created = penilaian_service::create_komponen(
        &state.db,
        id_kelas,
        input.id_cpmk,
        &input.nama_komponen,
        input.bobot,
        input.nilai_maksimal,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Record a raw score; the grader identity is taken from the token, not the
/// request body.
pub async fn upsert_nilai(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id_enrollment): Path<Uuid>,
    Json(input): Json<UpsertNilaiInput>,
) -> Result<Json<models::nilai::Model>, JsonApiError> {
    require_role(&claims, NILAI_ROLES)?;
    let grader = grader_ref(&state, &claims).await?;
    let saved = penilaian_service::upsert_nilai(
        &state.db,
        id_enrollment,
        input.id_komponen,
        input.nilai_mentah,
        input.catatan.as_deref(),
        grader.as_deref(),
    )
    .await?;
    Ok(Json(saved))
}

pub async fn list_nilai(
    State(state): State<ServerState>,
    Path(id_enrollment): Path<Uuid>,
) -> Result<Json<Vec<models::nilai::Model>>, JsonApiError> {
    enrollment_service::get_enrollment(&state.db, id_enrollment)
        .await?
        .ok_or_else(|| JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some("enrollment not found".into())))?;
    let rows = penilaian_service::list_nilai(&state.db, id_enrollment).await?;
    Ok(Json(rows))
}

pub async fn finalize(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id_enrollment): Path<Uuid>,
) -> Result<Json<models::enrollment::Model>, JsonApiError> {
    require_role(&claims, NILAI_ROLES)?;
    let updated = penilaian_service::finalize_enrollment(&state.db, id_enrollment).await?;
    Ok(Json(updated))
}

pub async fn drop_enrollment(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id_enrollment): Path<Uuid>,
) -> Result<Json<models::enrollment::Model>, JsonApiError> {
    require_role(&claims, &["kaprodi", "admin"])?;
    let updated = enrollment_service::drop_enrollment(&state.db, id_enrollment).await?;
    Ok(Json(updated))
}

/// Lecturer accounts carry their `id_dosen` in `ref_id`.
async fn grader_ref(state: &ServerState, claims: &Claims) -> Result<Option<String>, JsonApiError> {
    let svc = state.auth_service();
    let user = svc.current_user(&claims.sub).await?;
    Ok(user.ref_id)
}
