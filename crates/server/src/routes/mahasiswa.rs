use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use service::auth::token::Claims;
use service::enrollment_service;
use service::mahasiswa_service::{self, MahasiswaUpdate};

use crate::errors::JsonApiError;
use crate::routes::auth::{require_role, ServerState};

const WRITE_ROLES: &[&str] = &["kaprodi", "admin"];

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub id_prodi: Option<String>,
    pub id_kurikulum: Option<Uuid>,
    pub angkatan: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateMahasiswaInput {
    pub nim: String,
    pub nama: String,
    pub email: String,
    pub id_prodi: String,
    pub id_kurikulum: Uuid,
    pub angkatan: String,
}

/// `id_kurikulum` is accepted here only so the guard can reject it: the
/// assignment is fixed at creation.
#[derive(Debug, Deserialize)]
pub struct UpdateMahasiswaInput {
    pub nama: Option<String>,
    pub email: Option<String>,
    pub status: Option<String>,
    pub id_kurikulum: Option<Uuid>,
}

pub async fn list(
    State(state): State<ServerState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<models::mahasiswa::Model>>, JsonApiError> {
    let rows = mahasiswa_service::list_mahasiswa(
        &state.db,
        q.id_prodi.as_deref(),
        q.id_kurikulum,
        q.angkatan.as_deref(),
        q.status.as_deref(),
    )
    .await?;
    Ok(Json(rows))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(nim): Path<String>,
) -> Result<Json<models::mahasiswa::Model>, JsonApiError> {
    match mahasiswa_service::get_mahasiswa(&state.db, &nim).await? {
        Some(m) => Ok(Json(m)),
        None => Err(JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some("mahasiswa not found".into()))),
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<CreateMahasiswaInput>,
) -> Result<(StatusCode, Json<models::mahasiswa::Model>), JsonApiError> {
    require_role(&claims, WRITE_ROLES)?;
    let created = mahasiswa_service::create_mahasiswa(
        &state.db,
        &input.nim,
        &input.nama,
        &input.email,
        &input.id_prodi,
        input.id_kurikulum,
        &input.angkatan,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(nim): Path<String>,
    Json(input): Json<UpdateMahasiswaInput>,
) -> Result<Json<models::mahasiswa::Model>, JsonApiError> {
    require_role(&claims, WRITE_ROLES)?;
    let updated = mahasiswa_service::update_mahasiswa(
        &state.db,
        &nim,
        MahasiswaUpdate {
            nama: input.nama,
            email: input.email,
            status: input.status,
            id_kurikulum: input.id_kurikulum,
        },
    )
    .await?;
    Ok(Json(updated))
}

/// Transcript view: all enrollments for one student.
pub async fn list_enrollment(
    State(state): State<ServerState>,
    Path(nim): Path<String>,
) -> Result<Json<Vec<models::enrollment::Model>>, JsonApiError> {
    mahasiswa_service::get_mahasiswa(&state.db, &nim)
        .await?
        .ok_or_else(|| JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some("mahasiswa not found".into())))?;
    let rows = enrollment_service::list_by_mahasiswa(&state.db, &nim).await?;
    Ok(Json(rows))
}
