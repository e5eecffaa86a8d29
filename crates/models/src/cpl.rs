use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::kurikulum;

pub const KATEGORI: &[&str] = &["sikap", "pengetahuan", "keterampilan_umum", "keterampilan_khusus"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cpl")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub id_kurikulum: Uuid,
    pub kode_cpl: String,
    pub deskripsi: String,
    pub kategori: String,
    pub urutan: Option<i32>,
    pub is_active: bool,
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

pub fn validate_kategori(kategori: &str) -> Result<(), errors::ModelError> {
    if !KATEGORI.contains(&kategori) {
        return Err(errors::ModelError::Validation(format!("invalid kategori: {}", kategori)));
    }
    Ok(())
}

pub async fn create(
    db: &DatabaseConnection,
    id_kurikulum: Uuid,
    kode_cpl: &str,
    deskripsi: &str,
    kategori: &str,
    urutan: Option<i32>,
) -> Result<Model, errors::ModelError> {
    if kode_cpl.trim().is_empty() { return Err(errors::ModelError::Validation("kode_cpl required".into())); }
    if deskripsi.trim().is_empty() { return Err(errors::ModelError::Validation("deskripsi required".into())); }
    validate_kategori(kategori)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        id_kurikulum: Set(id_kurikulum),
        kode_cpl: Set(kode_cpl.to_string()),
        deskripsi: Set(deskripsi.to_string()),
        kategori: Set(kategori.to_string()),
        urutan: Set(urutan),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn soft_delete(db: &DatabaseConnection, id: Uuid) -> Result<(), errors::ModelError> {
    let mut found: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?
        .ok_or_else(|| errors::ModelError::Validation("cpl not found".into()))?
        .into();
    found.is_active = Set(false);
    found.updated_at = Set(Utc::now().into());
    found.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(())
}
