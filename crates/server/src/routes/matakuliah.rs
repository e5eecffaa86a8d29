use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use service::auth::token::Claims;
use service::matakuliah_service::{self, MatakuliahUpdate};

use crate::errors::JsonApiError;
use crate::routes::auth::{require_role, ServerState};

const WRITE_ROLES: &[&str] = &["kaprodi", "admin"];

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub id_kurikulum: Option<Uuid>,
    pub semester: Option<i32>,
    pub jenis_mk: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CreateMatakuliahInput {
    pub kode_mk: String,
    pub id_kurikulum: Uuid,
    pub nama_mk: String,
    #[serde(default)]
    pub nama_mk_eng: Option<String>,
    pub sks: i32,
    pub semester: i32,
    #[serde(default)]
    pub rumpun: Option<String>,
    pub jenis_mk: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMatakuliahInput {
    pub nama_mk: Option<String>,
    pub nama_mk_eng: Option<String>,
    pub sks: Option<i32>,
    pub semester: Option<i32>,
    pub rumpun: Option<String>,
    pub jenis_mk: Option<String>,
    pub is_active: Option<bool>,
}

pub async fn list(
    State(state): State<ServerState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<models::matakuliah::Model>>, JsonApiError> {
    let rows = matakuliah_service::list_matakuliah(&state.db, q.id_kurikulum, q.semester, q.jenis_mk.as_deref(), q.is_active).await?;
    Ok(Json(rows))
}

/// Courses are addressed by their full composite key.
pub async fn get(
    State(state): State<ServerState>,
    Path((id_kurikulum, kode_mk)): Path<(Uuid, String)>,
) -> Result<Json<models::matakuliah::Model>, JsonApiError> {
    match matakuliah_service::get_matakuliah(&state.db, &kode_mk, id_kurikulum).await? {
        Some(m) => Ok(Json(m)),
        None => Err(JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some("matakuliah not found".into()))),
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<CreateMatakuliahInput>,
) -> Result<(StatusCode, Json<models::matakuliah::Model>), JsonApiError> {
    require_role(&claims, WRITE_ROLES)?;
    let created = matakuliah_service::create_matakuliah(
        &state.db,
        &input.kode_mk,
        input.id_kurikulum,
        &input.nama_mk,
        input.nama_mk_eng.as_deref(),
        input.sks,
        input.semester,
        input.rumpun.as_deref(),
        &input.jenis_mk,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path((id_kurikulum, kode_mk)): Path<(Uuid, String)>,
    Json(input): Json<UpdateMatakuliahInput>,
) -> Result<Json<models::matakuliah::Model>, JsonApiError> {
    require_role(&claims, WRITE_ROLES)?;
    let updated = matakuliah_service::update_matakuliah(
        &state.db,
        &kode_mk,
        id_kurikulum,
        MatakuliahUpdate {
            nama_mk: input.nama_mk,
            nama_mk_eng: input.nama_mk_eng.map(Some),
            sks: input.sks,
            semester: input.semester,
            rumpun: input.rumpun.map(Some),
            jenis_mk: input.jenis_mk,
            is_active: input.is_active,
        },
    )
    .await?;
    Ok(Json(updated))
}

/// Never a physical delete; the course is deactivated and stays queryable.
pub async fn delete(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path((id_kurikulum, kode_mk)): Path<(Uuid, String)>,
) -> Result<StatusCode, JsonApiError> {
    require_role(&claims, WRITE_ROLES)?;
    matakuliah_service::delete_matakuliah(&state.db, &kode_mk, id_kurikulum).await?;
    Ok(StatusCode::NO_CONTENT)
}
