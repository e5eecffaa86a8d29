use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;

pub const JENJANG: &[&str] = &["D3", "D4", "S1", "S2", "S3"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "prodi")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id_prodi: String,
    pub nama: String,
    pub jenjang: Option<String>,
    pub akreditasi: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { panic!("no relations defined here") }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create(
    db: &DatabaseConnection,
    id_prodi: &str,
    nama: &str,
    jenjang: Option<&str>,
) -> Result<Model, errors::ModelError> {
    if id_prodi.trim().is_empty() { return Err(errors::ModelError::Validation("id_prodi required".into())); }
    if nama.trim().is_empty() { return Err(errors::ModelError::Validation("nama required".into())); }
    if let Some(j) = jenjang {
        if !JENJANG.contains(&j) {
            return Err(errors::ModelError::Validation(format!("invalid jenjang: {}", j)));
        }
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id_prodi: Set(id_prodi.to_string()),
        nama: Set(nama.to_string()),
        jenjang: Set(jenjang.map(|s| s.to_string())),
        akreditasi: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
