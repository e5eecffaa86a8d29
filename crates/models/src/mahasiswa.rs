use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::kurikulum;

pub const STATUSES: &[&str] = &["aktif", "cuti", "lulus", "DO"];

/// `id_kurikulum` is written exactly once, at creation. Update paths go
/// through `service::mahasiswa_service`, which never touches the column.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mahasiswa")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub nim: String,
    pub nama: String,
    pub email: String,
    pub id_prodi: String,
    pub id_kurikulum: Uuid,
    pub angkatan: String,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Kurikulum,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Kurikulum => Entity::belongs_to(kurikulum::Entity).from(Column::IdKurikulum).to(kurikulum::Column::Id).into() }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_status(status: &str) -> Result<(), errors::ModelError> {
    if !STATUSES.contains(&status) {
        return Err(errors::ModelError::Validation(format!("invalid status: {}", status)));
    }
    Ok(())
}

pub async fn create(
    db: &DatabaseConnection,
    nim: &str,
    nama: &str,
    email: &str,
    id_prodi: &str,
    id_kurikulum: Uuid,
    angkatan: &str,
) -> Result<Model, errors::ModelError> {
    if nim.trim().is_empty() { return Err(errors::ModelError::Validation("nim required".into())); }
    if nama.trim().is_empty() { return Err(errors::ModelError::Validation("nama required".into())); }
    if !email.contains('@') { return Err(errors::ModelError::Validation("invalid email".into())); }
    if angkatan.trim().is_empty() { return Err(errors::ModelError::Validation("angkatan required".into())); }
    let now = Utc::now().into();
    let am = ActiveModel {
        nim: Set(nim.to_string()),
        nama: Set(nama.to_string()),
        email: Set(email.to_string()),
        id_prodi: Set(id_prodi.to_string()),
        id_kurikulum: Set(id_kurikulum),
        angkatan: Set(angkatan.to_string()),
        status: Set("aktif".into()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
