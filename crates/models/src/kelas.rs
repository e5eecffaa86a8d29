use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::rps;

pub const STATUS_DRAFT: &str = "draft";
pub const STATUS_OPEN: &str = "open";
pub const STATUS_CLOSED: &str = "closed";
pub const STATUS_COMPLETED: &str = "completed";

pub const STATUSES: &[&str] = &[STATUS_DRAFT, STATUS_OPEN, STATUS_CLOSED, STATUS_COMPLETED];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "kelas")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub kode_mk: String,
    pub id_kurikulum: Uuid,
    pub id_rps: Option<Uuid>,
    pub nama_kelas: String,
    pub semester: String,
    pub tahun_ajaran: String,
    pub kapasitas: i32,
    pub kuota_terisi: i32,
    pub status: String,
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

#[allow(clippy::too_many_arguments)]
pub async fn create(
    db: &DatabaseConnection,
    kode_mk: &str,
    id_kurikulum: Uuid,
    id_rps: Option<Uuid>,
    nama_kelas: &str,
    semester: &str,
    tahun_ajaran: &str,
    kapasitas: i32,
) -> Result<Model, errors::ModelError> {
    if nama_kelas.trim().is_empty() { return Err(errors::ModelError::Validation("nama_kelas required".into())); }
    if semester.trim().is_empty() { return Err(errors::ModelError::Validation("semester required".into())); }
    if tahun_ajaran.trim().is_empty() { return Err(errors::ModelError::Validation("tahun_ajaran required".into())); }
    if kapasitas < 1 {
        return Err(errors::ModelError::Validation("kapasitas must be >= 1".into()));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        kode_mk: Set(kode_mk.to_string()),
        id_kurikulum: Set(id_kurikulum),
        id_rps: Set(id_rps),
        nama_kelas: Set(nama_kelas.to_string()),
        semester: Set(semester.to_string()),
        tahun_ajaran: Set(tahun_ajaran.to_string()),
        kapasitas: Set(kapasitas),
        kuota_terisi: Set(0),
        status: Set(STATUS_DRAFT.into()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
