use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use service::auth::token::Claims;
use service::dosen_service::{self, DosenUpdate};

use crate::errors::JsonApiError;
use crate::routes::auth::{require_role, ServerState};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub id_prodi: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateDosenInput {
    pub id_dosen: String,
    #[serde(default)]
    pub nidn: Option<String>,
    pub nama: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub id_prodi: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDosenInput {
    pub nama: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<String>,
}

pub async fn list(
    State(state): State<ServerState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<models::dosen::Model>>, JsonApiError> {
    let rows = dosen_service::list_dosen(&state.db, q.id_prodi.as_deref(), q.status.as_deref()).await?;
    Ok(Json(rows))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id_dosen): Path<String>,
) -> Result<Json<models::dosen::Model>, JsonApiError> {
    match dosen_service::get_dosen(&state.db, &id_dosen).await? {
        Some(m) => Ok(Json(m)),
        None => Err(JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some("dosen not found".into()))),
    }
}

/// Lecturer records are admin-managed.
pub async fn create(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<CreateDosenInput>,
) -> Result<(StatusCode, Json<models::dosen::Model>), JsonApiError> {
    require_role(&claims, &["admin"])?;
    let created = dosen_service::create_dosen(
        &state.db,
        &input.id_dosen,
        input.nidn.as_deref(),
        &input.nama,
        &input.email,
        input.phone.as_deref(),
        &input.id_prodi,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id_dosen): Path<String>,
    Json(input): Json<UpdateDosenInput>,
) -> Result<Json<models::dosen::Model>, JsonApiError> {
    require_role(&claims, &["admin"])?;
    let updated = dosen_service::update_dosen(
        &state.db,
        &id_dosen,
        DosenUpdate {
            nama: input.nama,
            email: input.email,
            phone: input.phone.map(Some),
            status: input.status,
        },
    )
    .await?;
    Ok(Json(updated))
}
