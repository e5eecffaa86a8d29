use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::enrollment;
use crate::errors;
use crate::komponen_penilaian;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "nilai")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub id_enrollment: Uuid,
    pub id_komponen: Uuid,
    pub nilai_mentah: Decimal,
    pub nilai_tertimbang: Decimal,
    pub catatan: Option<String>,
    pub dinilai_oleh: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Enrollment,
    Komponen,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Enrollment => Entity::belongs_to(enrollment::Entity).from(Column::IdEnrollment).to(enrollment::Column::Id).into(),
            Relation::Komponen => Entity::belongs_to(komponen_penilaian::Entity).from(Column::IdKomponen).to(komponen_penilaian::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[allow(clippy::too_many_arguments)]
pub async fn upsert(
    db: &DatabaseConnection,
    id_enrollment: Uuid,
    id_komponen: Uuid,
    nilai_mentah: Decimal,
    nilai_tertimbang: Decimal,
    catatan: Option<&str>,
    dinilai_oleh: Option<&str>,
) -> Result<Model, errors::ModelError> {
    use sea_orm::{ColumnTrait, QueryFilter};
    let now = Utc::now().into();
    if let Some(existing) = Entity::find()
        .filter(Column::IdEnrollment.eq(id_enrollment))
        .filter(Column::IdKomponen.eq(id_komponen))
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?
    {
        let mut am: ActiveModel = existing.into();
        am.nilai_mentah = Set(nilai_mentah);
        am.nilai_tertimbang = Set(nilai_tertimbang);
        am.catatan = Set(catatan.map(|s| s.to_string()));
        am.dinilai_oleh = Set(dinilai_oleh.map(|s| s.to_string()));
        am.updated_at = Set(now);
        am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
    } else {
        let am = ActiveModel {
            id: Set(Uuid::new_v4()),
            id_enrollment: Set(id_enrollment),
            id_komponen: Set(id_komponen),
            nilai_mentah: Set(nilai_mentah),
            nilai_tertimbang: Set(nilai_tertimbang),
            catatan: Set(catatan.map(|s| s.to_string())),
            dinilai_oleh: Set(dinilai_oleh.map(|s| s.to_string())),
            created_at: Set(now),
            updated_at: Set(now),
        };
        am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
    }
}
