use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::kelas;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "komponen_penilaian")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub id_kelas: Uuid,
    pub id_cpmk: Option<Uuid>,
    pub nama_komponen: String,
    pub bobot: Decimal,
    pub nilai_maksimal: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Kelas,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Kelas => Entity::belongs_to(kelas::Entity).from(Column::IdKelas).to(kelas::Column::Id).into() }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_bobot(bobot: Decimal) -> Result<(), errors::ModelError> {
    if bobot < Decimal::ZERO || bobot > Decimal::from(100) {
        return Err(errors::ModelError::Validation("bobot must be in 0..=100".into()));
    }
    Ok(())
}

pub async fn create(
    db: &DatabaseConnection,
    id_kelas: Uuid,
    id_cpmk: Option<Uuid>,
    nama_komponen: &str,
    bobot: Decimal,
    nilai_maksimal: Decimal,
) -> Result<Model, errors::ModelError> {
    if nama_komponen.trim().is_empty() { return Err(errors::ModelError::Validation("nama_komponen required".into())); }
    validate_bobot(bobot)?;
    if nilai_maksimal <= Decimal::ZERO {
        return Err(errors::ModelError::Validation("nilai_maksimal must be > 0".into()));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        id_kelas: Set(id_kelas),
        id_cpmk: Set(id_cpmk),
        nama_komponen: Set(nama_komponen.to_string()),
        bobot: Set(bobot),
        nilai_maksimal: Set(nilai_maksimal),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
