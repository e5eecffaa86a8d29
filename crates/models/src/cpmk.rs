use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::rps;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cpmk")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub id_rps: Uuid,
    pub kode_cpmk: String,
    pub deskripsi: String,
    pub urutan: Option<i32>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Rps,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Rps => Entity::belongs_to(rps::Entity).from(Column::IdRps).to(rps::Column::Id).into() }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create(
    db: &DatabaseConnection,
    id_rps: Uuid,
    kode_cpmk: &str,
    deskripsi: &str,
    urutan: Option<i32>,
) -> Result<Model, errors::ModelError> {
    if kode_cpmk.trim().is_empty() { return Err(errors::ModelError::Validation("kode_cpmk required".into())); }
    if deskripsi.trim().is_empty() { return Err(errors::ModelError::Validation("deskripsi required".into())); }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        id_rps: Set(id_rps),
        kode_cpmk: Set(kode_cpmk.to_string()),
        deskripsi: Set(deskripsi.to_string()),
        urutan: Set(urutan),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
