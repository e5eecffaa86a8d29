use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::kurikulum;

pub const JENIS_MK: &[&str] = &["wajib", "pilihan", "mkwu"];

/// Composite key: the same kode_mk may appear under any number of curricula.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "matakuliah")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub kode_mk: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub id_kurikulum: Uuid,
    pub nama_mk: String,
    pub nama_mk_eng: Option<String>,
    pub sks: i32,
    pub semester: i32,
    pub rumpun: Option<String>,
    pub jenis_mk: String,
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

pub fn validate_sks(sks: i32) -> Result<(), errors::ModelError> {
    if sks <= 0 {
        return Err(errors::ModelError::Validation("sks must be > 0".into()));
    }
    Ok(())
}

pub fn validate_semester(semester: i32) -> Result<(), errors::ModelError> {
    if !(1..=14).contains(&semester) {
        return Err(errors::ModelError::Validation("semester must be in 1..=14".into()));
    }
    Ok(())
}

pub fn validate_jenis(jenis_mk: &str) -> Result<(), errors::ModelError> {
    if !JENIS_MK.contains(&jenis_mk) {
        return Err(errors::ModelError::Validation(format!("invalid jenis_mk: {}", jenis_mk)));
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn create(
    db: &DatabaseConnection,
    kode_mk: &str,
    id_kurikulum: Uuid,
    nama_mk: &str,
    nama_mk_eng: Option<&str>,
    sks: i32,
    semester: i32,
    rumpun: Option<&str>,
    jenis_mk: &str,
) -> Result<Model, errors::ModelError> {
    if kode_mk.trim().is_empty() { return Err(errors::ModelError::Validation("kode_mk required".into())); }
    if nama_mk.trim().is_empty() { return Err(errors::ModelError::Validation("nama_mk required".into())); }
    validate_sks(sks)?;
    validate_semester(semester)?;
    validate_jenis(jenis_mk)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        kode_mk: Set(kode_mk.to_string()),
        id_kurikulum: Set(id_kurikulum),
        nama_mk: Set(nama_mk.to_string()),
        nama_mk_eng: Set(nama_mk_eng.map(|s| s.to_string())),
        sks: Set(sks),
        semester: Set(semester),
        rumpun: Set(rumpun.map(|s| s.to_string())),
        jenis_mk: Set(jenis_mk.to_string()),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Courses are never removed; a delete only clears the active flag.
pub async fn deactivate(db: &DatabaseConnection, kode_mk: &str, id_kurikulum: Uuid) -> Result<(), errors::ModelError> {
    let mut found: ActiveModel = Entity::find_by_id((kode_mk.to_string(), id_kurikulum))
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?
        .ok_or_else(|| errors::ModelError::Validation("matakuliah not found".into()))?
        .into();
    found.is_active = Set(false);
    found.updated_at = Set(Utc::now().into());
    found.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sks_must_be_positive() {
        assert!(validate_sks(3).is_ok());
        assert!(validate_sks(0).is_err());
        assert!(validate_sks(-2).is_err());
    }

    #[test]
    fn semester_range_is_bounded() {
        assert!(validate_semester(1).is_ok());
        assert!(validate_semester(14).is_ok());
        assert!(validate_semester(0).is_err());
        assert!(validate_semester(15).is_err());
    }

    #[test]
    fn jenis_is_a_closed_set() {
        assert!(validate_jenis("wajib").is_ok());
        assert!(validate_jenis("elective").is_err());
    }
}
