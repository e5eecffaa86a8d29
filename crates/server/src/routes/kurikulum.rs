use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use common::pagination::Pagination;
use service::auth::token::Claims;
use service::kurikulum_service::{self, KurikulumUpdate};

use crate::errors::JsonApiError;
use crate::routes::auth::{require_role, ServerState};

const WRITE_ROLES: &[&str] = &["kaprodi", "admin"];

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListQuery {
    pub id_prodi: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct CreateKurikulumInput {
    pub id_prodi: String,
    pub kode_kurikulum: String,
    pub nama_kurikulum: String,
    pub tahun_berlaku: i32,
    #[serde(default)]
    pub deskripsi: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateKurikulumInput {
    pub nama_kurikulum: Option<String>,
    pub tahun_berlaku: Option<i32>,
    pub tahun_berakhir: Option<i32>,
    pub deskripsi: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApproveInput {
    pub nomor_sk: String,
    pub tanggal_sk: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct ActivateInput {
    #[serde(default)]
    pub set_as_primary: bool,
}

#[utoipa::path(
    get, path = "/api/v1/kurikulum", tag = "kurikulum",
    params(ListQuery),
    responses((status = 200, description = "List OK"), (status = 401, description = "Unauthorized"))
)]
pub async fn list(
    State(state): State<ServerState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<models::kurikulum::Model>>, JsonApiError> {
    let mut opts = Pagination::default();
    if let Some(p) = q.page { opts.page = p; }
    if let Some(pp) = q.per_page { opts.per_page = pp; }
    let rows = kurikulum_service::list_kurikulum(&state.db, q.id_prodi.as_deref(), q.status.as_deref(), opts).await?;
    Ok(Json(rows))
}

#[utoipa::path(
    get, path = "/api/v1/kurikulum/{id}", tag = "kurikulum",
    params(("id" = Uuid, Path, description = "Kurikulum ID")),
    responses((status = 200, description = "OK"), (status = 404, description = "Not Found"))
)]
pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<models::kurikulum::Model>, JsonApiError> {
    match kurikulum_service::get_kurikulum(&state.db, id).await? {
        Some(m) => Ok(Json(m)),
        None => Err(JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some("kurikulum not found".into()))),
    }
}

#[utoipa::path(
    post, path = "/api/v1/kurikulum", tag = "kurikulum",
    request_body = crate::openapi::CreateKurikulumRequest,
    responses((status = 201, description = "Created"), (status = 403, description = "Forbidden"), (status = 409, description = "Conflict"))
)]
pub async fn create(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<CreateKurikulumInput>,
) -> Result<(StatusCode, Json<models::kurikulum::Model>), JsonApiError> {
    require_role(&claims, WRITE_ROLES)?;
    let created = kurikulum_service::create_kurikulum(
        &state.db,
        &input.id_prodi,
        &input.kode_kurikulum,
        &input.nama_kurikulum,
        input.tahun_berlaku,
        input.deskripsi.as_deref(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put, path = "/api/v1/kurikulum/{id}", tag = "kurikulum",
    params(("id" = Uuid, Path, description = "Kurikulum ID")),
    responses((status = 200, description = "Updated"), (status = 400, description = "Validation Error"), (status = 404, description = "Not Found"))
)]
pub async fn update(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateKurikulumInput>,
) -> Result<Json<models::kurikulum::Model>, JsonApiError> {
    require_role(&claims, WRITE_ROLES)?;
    let updated = kurikulum_service::update_kurikulum(
        &state.db,
        id,
        KurikulumUpdate {
            nama_kurikulum: input.nama_kurikulum,
            tahun_berlaku: input.tahun_berlaku,
            tahun_berakhir: input.tahun_berakhir.map(Some),
            deskripsi: input.deskripsi.map(Some),
        },
    )
    .await?;
    Ok(Json(updated))
}

#[utoipa::path(
    post, path = "/api/v1/kurikulum/{id}/approve", tag = "kurikulum",
    params(("id" = Uuid, Path, description = "Kurikulum ID")),
    responses((status = 200, description = "Approved"), (status = 400, description = "Validation Error"))
)]
pub async fn approve(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(input): Json<ApproveInput>,
) -> Result<Json<models::kurikulum::Model>, JsonApiError> {
    require_role(&claims, WRITE_ROLES)?;
    let updated = kurikulum_service::approve_kurikulum(&state.db, id, &input.nomor_sk, input.tanggal_sk).await?;
    Ok(Json(updated))
}

#[utoipa::path(
    post, path = "/api/v1/kurikulum/{id}/activate", tag = "kurikulum",
    params(("id" = Uuid, Path, description = "Kurikulum ID")),
    responses((status = 200, description = "Activated"), (status = 400, description = "Validation Error"))
)]
pub async fn activate(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(input): Json<ActivateInput>,
) -> Result<Json<models::kurikulum::Model>, JsonApiError> {
    require_role(&claims, WRITE_ROLES)?;
    let updated = kurikulum_service::activate_kurikulum(&state.db, id, input.set_as_primary).await?;
    Ok(Json(updated))
}

#[utoipa::path(
    post, path = "/api/v1/kurikulum/{id}/deactivate", tag = "kurikulum",
    params(("id" = Uuid, Path, description = "Kurikulum ID")),
    responses((status = 200, description = "Deactivated"), (status = 400, description = "Validation Error"))
)]
pub async fn deactivate(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<models::kurikulum::Model>, JsonApiError> {
    require_role(&claims, WRITE_ROLES)?;
    let updated = kurikulum_service::deactivate_kurikulum(&state.db, id).await?;
    Ok(Json(updated))
}
