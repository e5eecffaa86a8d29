use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::prodi;

pub const STATUSES: &[&str] = &["aktif", "cuti", "pensiun"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "dosen")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id_dosen: String,
    pub nidn: Option<String>,
    pub nama: String,
    pub email: String,
    pub phone: Option<String>,
    pub id_prodi: String,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Prodi,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Prodi => Entity::belongs_to(prodi::Entity).from(Column::IdProdi).to(prodi::Column::IdProdi).into() }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create(
    db: &DatabaseConnection,
    id_dosen: &str,
    nidn: Option<&str>,
    nama: &str,
    email: &str,
    phone: Option<&str>,
    id_prodi: &str,
) -> Result<Model, errors::ModelError> {
    if id_dosen.trim().is_empty() { return Err(errors::ModelError::Validation("id_dosen required".into())); }
    if nama.trim().is_empty() { return Err(errors::ModelError::Validation("nama required".into())); }
    if !email.contains('@') { return Err(errors::ModelError::Validation("invalid email".into())); }
    let now = Utc::now().into();
    let am = ActiveModel {
        id_dosen: Set(id_dosen.to_string()),
        nidn: Set(nidn.map(|s| s.to_string())),
        nama: Set(nama.to_string()),
        email: Set(email.to_string()),
        phone: Set(phone.map(|s| s.to_string())),
        id_prodi: Set(id_prodi.to_string()),
        status: Set("aktif".into()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
