use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::prodi;

pub const STATUS_DRAFT: &str = "draft";
pub const STATUS_REVIEW: &str = "review";
pub const STATUS_APPROVED: &str = "approved";
pub const STATUS_AKTIF: &str = "aktif";
pub const STATUS_NON_AKTIF: &str = "non-aktif";
pub const STATUS_ARSIP: &str = "arsip";

pub const STATUSES: &[&str] = &[
    STATUS_DRAFT,
    STATUS_REVIEW,
    STATUS_APPROVED,
    STATUS_AKTIF,
    STATUS_NON_AKTIF,
    STATUS_ARSIP,
];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "kurikulum")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub id_prodi: String,
    pub kode_kurikulum: String,
    pub nama_kurikulum: String,
    pub tahun_berlaku: i32,
    pub tahun_berakhir: Option<i32>,
    pub status: String,
    pub is_primary: bool,
    pub deskripsi: Option<String>,
    pub nomor_sk: Option<String>,
    pub tanggal_sk: Option<Date>,
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
    id_prodi: &str,
    kode_kurikulum: &str,
    nama_kurikulum: &str,
    tahun_berlaku: i32,
    deskripsi: Option<&str>,
) -> Result<Model, errors::ModelError> {
    if kode_kurikulum.trim().is_empty() { return Err(errors::ModelError::Validation("kode_kurikulum required".into())); }
    if nama_kurikulum.trim().is_empty() { return Err(errors::ModelError::Validation("nama_kurikulum required".into())); }
    if tahun_berlaku < 1900 {
        return Err(errors::ModelError::Validation("tahun_berlaku out of range".into()));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        id_prodi: Set(id_prodi.to_string()),
        kode_kurikulum: Set(kode_kurikulum.to_string()),
        nama_kurikulum: Set(nama_kurikulum.to_string()),
        tahun_berlaku: Set(tahun_berlaku),
        tahun_berakhir: Set(None),
        status: Set(STATUS_DRAFT.into()),
        is_primary: Set(false),
        deskripsi: Set(deskripsi.map(|s| s.to_string())),
        nomor_sk: Set(None),
        tanggal_sk: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
