use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use service::auth::token::Claims;
use service::cpl_service::{self, CplUpdate};

use crate::errors::JsonApiError;
use crate::routes::auth::{require_role, ServerState};

const WRITE_ROLES: &[&str] = &["kaprodi", "admin"];

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub id_kurikulum: Option<Uuid>,
    pub kategori: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCplInput {
    pub id_kurikulum: Uuid,
    pub kode_cpl: String,
    pub deskripsi: String,
    pub kategori: String,
    #[serde(default)]
    pub urutan: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCplInput {
    pub deskripsi: Option<String>,
    pub kategori: Option<String>,
    pub urutan: Option<i32>,
    pub is_active: Option<bool>,
}

pub async fn list(
    State(state): State<ServerState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<models::cpl::Model>>, JsonApiError> {
    let rows = cpl_service::list_cpl(&state.db, q.id_kurikulum, q.kategori.as_deref(), q.is_active).await?;
    Ok(Json(rows))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<models::cpl::Model>, JsonApiError> {
    match cpl_service::get_cpl(&state.db, id).await? {
        Some(m) => Ok(Json(m)),
        None => Err(JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some("cpl not found".into()))),
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<CreateCplInput>,
) -> Result<(StatusCode, Json<models::cpl::Model>), JsonApiError> {
    require_role(&claims, WRITE_ROLES)?;
    let created = cpl_service::create_cpl(
        &state.db,
        input.id_kurikulum,
        &input.kode_cpl,
        &input.deskripsi,
        &input.kategori,
        input.urutan,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateCplInput>,
) -> Result<Json<models::cpl::Model>, JsonApiError> {
    require_role(&claims, WRITE_ROLES)?;
    let updated = cpl_service::update_cpl(
        &state.db,
        id,
        CplUpdate {
            deskripsi: input.deskripsi,
            kategori: input.kategori,
            urutan: input.urutan.map(Some),
            is_active: input.is_active,
        },
    )
    .await?;
    Ok(Json(updated))
}

/// Soft delete; the row is kept with `is_active = false`.
pub async fn delete(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    require_role(&claims, WRITE_ROLES)?;
    cpl_service::delete_cpl(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
