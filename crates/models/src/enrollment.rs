use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::kelas;
use crate::mahasiswa;

pub const STATUS_AKTIF: &str = "aktif";
pub const STATUS_MENGULANG: &str = "mengulang";
pub const STATUS_DROP: &str = "drop";
pub const STATUS_LULUS: &str = "lulus";

pub const STATUSES: &[&str] = &[STATUS_AKTIF, STATUS_MENGULANG, STATUS_DROP, STATUS_LULUS];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "enrollment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub nim: String,
    pub id_kelas: Uuid,
    pub tanggal_daftar: Date,
    pub status: String,
    pub nilai_akhir: Option<Decimal>,
    pub nilai_huruf: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Mahasiswa,
    Kelas,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Mahasiswa => Entity::belongs_to(mahasiswa::Entity).from(Column::Nim).to(mahasiswa::Column::Nim).into(),
            Relation::Kelas => Entity::belongs_to(kelas::Entity).from(Column::IdKelas).to(kelas::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create(db: &DatabaseConnection, nim: &str, id_kelas: Uuid) -> Result<Model, errors::ModelError> {
    if nim.trim().is_empty() { return Err(errors::ModelError::Validation("nim required".into())); }
    let now = Utc::now();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        nim: Set(nim.to_string()),
        id_kelas: Set(id_kelas),
        tanggal_daftar: Set(now.date_naive()),
        status: Set(STATUS_AKTIF.into()),
        nilai_akhir: Set(None),
        nilai_huruf: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
