use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use service::auth::token::Claims;
use service::cpmk_service::{self, CpmkUpdate};
use service::rps_service::{self, RpsUpdate};

use crate::errors::JsonApiError;
use crate::routes::auth::{require_role, ServerState};

/// Lecturers author syllabi; kaprodi/admin review them.
const AUTHOR_ROLES: &[&str] = &["dosen", "kaprodi", "admin"];
const REVIEW_ROLES: &[&str] = &["kaprodi", "admin"];

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub kode_mk: Option<String>,
    pub id_kurikulum: Option<Uuid>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateRpsInput {
    pub kode_mk: String,
    pub id_kurikulum: Uuid,
    pub semester_berlaku: String,
    pub tahun_ajaran: String,
    #[serde(default)]
    pub ketua_pengembang: Option<String>,
    #[serde(default)]
    pub deskripsi_mk: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRpsInput {
    pub semester_berlaku: Option<String>,
    pub tahun_ajaran: Option<String>,
    pub ketua_pengembang: Option<String>,
    pub deskripsi_mk: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCpmkInput {
    pub kode_cpmk: String,
    pub deskripsi: String,
    #[serde(default)]
    pub urutan: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCpmkInput {
    pub deskripsi: Option<String>,
    pub urutan: Option<i32>,
}

pub async fn list(
    State(state): State<ServerState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<models::rps::Model>>, JsonApiError> {
    let rows = rps_service::list_rps(&state.db, q.kode_mk.as_deref(), q.id_kurikulum, q.status.as_deref()).await?;
    Ok(Json(rows))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<models::rps::Model>, JsonApiError> {
    match rps_service::get_rps(&state.db, id).await? {
        Some(m) => Ok(Json(m)),
        None => Err(JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some("rps not found".into()))),
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<CreateRpsInput>,
) -> Result<(StatusCode, Json<models::rps::Model>), JsonApiError> {
    require_role(&claims, AUTHOR_ROLES)?;
    let created = rps_service::create_rps(
        &state.db,
        &input.kode_mk,
        input.id_kurikulum,
        &input.semester_berlaku,
        &input.tahun_ajaran,
        input.ketua_pengembang.as_deref(),
        input.deskripsi_mk.as_deref(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateRpsInput>,
) -> Result<Json<models::rps::Model>, JsonApiError> {
    require_role(&claims, AUTHOR_ROLES)?;
    let updated = rps_service::update_rps(
        &state.db,
        id,
        RpsUpdate {
            semester_berlaku: input.semester_berlaku,
            tahun_ajaran: input.tahun_ajaran,
            ketua_pengembang: input.ketua_pengembang.map(Some),
            deskripsi_mk: input.deskripsi_mk.map(Some),
        },
    )
    .await?;
    Ok(Json(updated))
}

pub async fn submit(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<models::rps::Model>, JsonApiError> {
    require_role(&claims, AUTHOR_ROLES)?;
    Ok(Json(rps_service::submit_rps(&state.db, id).await?))
}

pub async fn approve(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<models::rps::Model>, JsonApiError> {
    require_role(&claims, REVIEW_ROLES)?;
    Ok(Json(rps_service::approve_rps(&state.db, id).await?))
}

pub async fn revise(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<models::rps::Model>, JsonApiError> {
    require_role(&claims, REVIEW_ROLES)?;
    Ok(Json(rps_service::revise_rps(&state.db, id).await?))
}

pub async fn activate(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<models::rps::Model>, JsonApiError> {
    require_role(&claims, REVIEW_ROLES)?;
    Ok(Json(rps_service::activate_rps(&state.db, id).await?))
}

pub async fn list_cpmk(
    State(state): State<ServerState>,
    Path(id_rps): Path<Uuid>,
) -> Result<Json<Vec<models::cpmk::Model>>, JsonApiError> {
    rps_service::get_rps(&state.db, id_rps)
        .await?
        .ok_or_else(|| JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some("rps not found".into())))?;
    let rows = cpmk_service::list_cpmk_by_rps(&state.db, id_rps).await?;
    Ok(Json(rows))
}

pub async fn create_cpmk(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id_rps): Path<Uuid>,
    Json(input): Json<CreateCpmkInput>,
) -> Result<(StatusCode, Json<models::cpmk::Model>), JsonApiError> {
    require_role(&claims, AUTHOR_ROLES)?;
    let created = cpmk_service::create_cpmk(&state.db, id_rps, &input.kode_cpmk, &input.deskripsi, input.urutan).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_cpmk(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateCpmkInput>,
) -> Result<Json<models::cpmk::Model>, JsonApiError> {
    require_role(&claims, AUTHOR_ROLES)?;
    let updated = cpmk_service::update_cpmk(
        &state.db,
        id,
        CpmkUpdate { deskripsi: input.deskripsi, urutan: input.urutan.map(Some) },
    )
    .await?;
    Ok(Json(updated))
}

pub async fn delete_cpmk(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    require_role(&claims, AUTHOR_ROLES)?;
    cpmk_service::delete_cpmk(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
