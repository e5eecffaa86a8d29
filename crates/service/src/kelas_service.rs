use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tracing::info;
use uuid::Uuid;

use models::{kelas, matakuliah, rps};

use crate::errors::ServiceError;

/// Create a class section for an existing course. If a syllabus is attached
/// it must already be in use.
#[allow(clippy::too_many_arguments)]
pub async fn create_kelas(
    db: &DatabaseConnection,
    kode_mk: &str,
    id_kurikulum: Uuid,
    id_rps: Option<Uuid>,
    nama_kelas: &str,
    semester: &str,
    tahun_ajaran: &str,
    kapasitas: i32,
) -> Result<kelas::Model, ServiceError> {
    let mk = matakuliah::Entity::find_by_id((kode_mk.to_string(), id_kurikulum))
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("matakuliah"))?;
    if !mk.is_active {
        return Err(ServiceError::Validation("matakuliah is inactive".into()));
    }

    if let Some(rid) = id_rps {
        let r = rps::Entity::find_by_id(rid)
            .one(db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?
            .ok_or_else(|| ServiceError::not_found("rps"))?;
        if r.status != rps::STATUS_ACTIVE {
            return Err(ServiceError::Validation("attached rps must be active".into()));
        }
        if r.kode_mk != kode_mk || r.id_kurikulum != id_kurikulum {
            return Err(ServiceError::Validation("rps belongs to a different matakuliah".into()));
        }
    }

    let created = kelas::create(db, kode_mk, id_kurikulum, id_rps, nama_kelas, semester, tahun_ajaran, kapasitas).await?;
    info!(id = %created.id, kode_mk = %created.kode_mk, nama_kelas = %created.nama_kelas, "kelas_created");
    Ok(created)
}

pub async fn get_kelas(db: &DatabaseConnection, id: Uuid) -> Result<Option<kelas::Model>, ServiceError> {
    Ok(kelas::Entity::find_by_id(id).one(db).await.map_err(|e| ServiceError::Db(e.to_string()))?)
}

pub async fn list_kelas(
    db: &DatabaseConnection,
    kode_mk: Option<&str>,
    id_kurikulum: Option<Uuid>,
    semester: Option<&str>,
    tahun_ajaran: Option<&str>,
    status: Option<&str>,
) -> Result<Vec<kelas::Model>, ServiceError> {
    let mut query = kelas::Entity::find();
    if let Some(k) = kode_mk {
        query = query.filter(kelas::Column::KodeMk.eq(k.to_string()));
    }
    if let Some(k) = id_kurikulum {
        query = query.filter(kelas::Column::IdKurikulum.eq(k));
    }
    if let Some(s) = semester {
        query = query.filter(kelas::Column::Semester.eq(s.to_string()));
    }
    if let Some(t) = tahun_ajaran {
        query = query.filter(kelas::Column::TahunAjaran.eq(t.to_string()));
    }
    if let Some(s) = status {
        query = query.filter(kelas::Column::Status.eq(s.to_string()));
    }
    let rows = query.all(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(rows)
}

async fn transition(db: &DatabaseConnection, id: Uuid, from: &str, to: &str) -> Result<kelas::Model, ServiceError> {
    let found = get_kelas(db, id).await?.ok_or_else(|| ServiceError::not_found("kelas"))?;
    if found.status != from {
        return Err(ServiceError::Validation(format!(
            "kelas cannot move from '{}' to '{}'",
            found.status, to
        )));
    }
    let mut am: kelas::ActiveModel = found.into();
    am.status = Set(to.to_string());
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(id = %updated.id, status = %to, "kelas_status_changed");
    Ok(updated)
}

/// Open a drafted section for enrollment.
pub async fn open_kelas(db: &DatabaseConnection, id: Uuid) -> Result<kelas::Model, ServiceError> {
    transition(db, id, kelas::STATUS_DRAFT, kelas::STATUS_OPEN).await
}

/// Close enrollment.
pub async fn close_kelas(db: &DatabaseConnection, id: Uuid) -> Result<kelas::Model, ServiceError> {
    transition(db, id, kelas::STATUS_OPEN, kelas::STATUS_CLOSED).await
}

/// Mark a closed section as finished.
pub async fn complete_kelas(db: &DatabaseConnection, id: Uuid) -> Result<kelas::Model, ServiceError> {
    transition(db, id, kelas::STATUS_CLOSED, kelas::STATUS_COMPLETED).await
}
