use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::dosen;
use crate::errors;

pub const STATUS_DRAFT: &str = "draft";
pub const STATUS_SUBMITTED: &str = "submitted";
pub const STATUS_REVISED: &str = "revised";
pub const STATUS_APPROVED: &str = "approved";
pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_ARCHIVED: &str = "archived";

pub const STATUSES: &[&str] = &[
    STATUS_DRAFT,
    STATUS_SUBMITTED,
    STATUS_REVISED,
    STATUS_APPROVED,
    STATUS_ACTIVE,
    STATUS_ARCHIVED,
];

/// Content edits are only legal in these states.
pub const EDITABLE_STATUSES: &[&str] = &[STATUS_DRAFT, STATUS_REVISED];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rps")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub kode_mk: String,
    pub id_kurikulum: Uuid,
    pub semester_berlaku: String,
    pub tahun_ajaran: String,
    pub status: String,
    pub ketua_pengembang: Option<String>,
    pub deskripsi_mk: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    KetuaPengembang,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::KetuaPengembang => Entity::belongs_to(dosen::Entity)
                .from(Column::KetuaPengembang)
                .to(dosen::Column::IdDosen)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[allow(clippy::too_many_arguments)]
pub async fn create(
    db: &DatabaseConnection,
    kode_mk: &str,
    id_kurikulum: Uuid,
    semester_berlaku: &str,
    tahun_ajaran: &str,
    ketua_pengembang: Option<&str>,
    deskripsi_mk: Option<&str>,
) -> Result<Model, errors::ModelError> {
    if semester_berlaku.trim().is_empty() { return Err(errors::ModelError::Validation("semester_berlaku required".into())); }
    if tahun_ajaran.trim().is_empty() { return Err(errors::ModelError::Validation("tahun_ajaran required".into())); }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        kode_mk: Set(kode_mk.to_string()),
        id_kurikulum: Set(id_kurikulum),
        semester_berlaku: Set(semester_berlaku.to_string()),
        tahun_ajaran: Set(tahun_ajaran.to_string()),
        status: Set(STATUS_DRAFT.into()),
        ketua_pengembang: Set(ketua_pengembang.map(|s| s.to_string())),
        deskripsi_mk: Set(deskripsi_mk.map(|s| s.to_string())),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
