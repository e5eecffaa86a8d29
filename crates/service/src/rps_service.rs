use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, TransactionTrait};
use tracing::info;
use uuid::Uuid;

use models::{matakuliah, rps};

use crate::errors::ServiceError;

#[derive(Debug, Default, Clone)]
pub struct RpsUpdate {
    pub semester_berlaku: Option<String>,
    pub tahun_ajaran: Option<String>,
    pub ketua_pengembang: Option<Option<String>>,
    pub deskripsi_mk: Option<Option<String>>,
}

/// Create a syllabus document for an existing course; starts in `draft`.
pub async fn create_rps(
    db: &DatabaseConnection,
    kode_mk: &str,
    id_kurikulum: Uuid,
    semester_berlaku: &str,
    tahun_ajaran: &str,
    ketua_pengembang: Option<&str>,
    deskripsi_mk: Option<&str>,
) -> Result<rps::Model, ServiceError> {
    let mk = matakuliah::Entity::find_by_id((kode_mk.to_string(), id_kurikulum))
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if mk.is_none() {
        return Err(ServiceError::not_found("matakuliah"));
    }

    let created = rps::create(db, kode_mk, id_kurikulum, semester_berlaku, tahun_ajaran, ketua_pengembang, deskripsi_mk).await?;
    info!(id = %created.id, kode_mk = %created.kode_mk, "rps_created");
    Ok(created)
}

pub async fn get_rps(db: &DatabaseConnection, id: Uuid) -> Result<Option<rps::Model>, ServiceError> {
    Ok(rps::Entity::find_by_id(id).one(db).await.map_err(|e| ServiceError::Db(e.to_string()))?)
}

pub async fn list_rps(
    db: &DatabaseConnection,
    kode_mk: Option<&str>,
    id_kurikulum: Option<Uuid>,
    status: Option<&str>,
) -> Result<Vec<rps::Model>, ServiceError> {
    let mut query = rps::Entity::find();
    if let Some(k) = kode_mk {
        query = query.filter(rps::Column::KodeMk.eq(k.to_string()));
    }
    if let Some(k) = id_kurikulum {
        query = query.filter(rps::Column::IdKurikulum.eq(k));
    }
    if let Some(s) = status {
        query = query.filter(rps::Column::Status.eq(s.to_string()));
    }
    let rows = query.all(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(rows)
}

async fn find_required(db: &DatabaseConnection, id: Uuid) -> Result<rps::Model, ServiceError> {
    rps::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("rps"))
}

/// Content edits are only legal while the document is `draft` or `revised`.
pub async fn update_rps(db: &DatabaseConnection, id: Uuid, changes: RpsUpdate) -> Result<rps::Model, ServiceError> {
    let found = find_required(db, id).await?;
    if !rps::EDITABLE_STATUSES.contains(&found.status.as_str()) {
        return Err(ServiceError::Validation(format!("cannot edit rps in status '{}'", found.status)));
    }
    let mut am: rps::ActiveModel = found.into();
    if let Some(s) = changes.semester_berlaku {
        if s.trim().is_empty() {
            return Err(ServiceError::Validation("semester_berlaku required".into()));
        }
        am.semester_berlaku = Set(s);
    }
    if let Some(t) = changes.tahun_ajaran {
        if t.trim().is_empty() {
            return Err(ServiceError::Validation("tahun_ajaran required".into()));
        }
        am.tahun_ajaran = Set(t);
    }
    if let Some(k) = changes.ketua_pengembang { am.ketua_pengembang = Set(k); }
    if let Some(d) = changes.deskripsi_mk { am.deskripsi_mk = Set(d); }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(updated)
}

async fn transition(
    db: &DatabaseConnection,
    id: Uuid,
    allowed_from: &[&str],
    to: &str,
) -> Result<rps::Model, ServiceError> {
    let found = find_required(db, id).await?;
    if !allowed_from.contains(&found.status.as_str()) {
        return Err(ServiceError::Validation(format!(
            "rps cannot move from '{}' to '{}'",
            found.status, to
        )));
    }
    let mut am: rps::ActiveModel = found.into();
    am.status = Set(to.to_string());
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(id = %updated.id, status = %to, "rps_status_changed");
    Ok(updated)
}

/// Author hands the draft in for review.
pub async fn submit_rps(db: &DatabaseConnection, id: Uuid) -> Result<rps::Model, ServiceError> {
    transition(db, id, &[rps::STATUS_DRAFT, rps::STATUS_REVISED], rps::STATUS_SUBMITTED).await
}

/// Reviewer accepts a submitted document.
pub async fn approve_rps(db: &DatabaseConnection, id: Uuid) -> Result<rps::Model, ServiceError> {
    transition(db, id, &[rps::STATUS_SUBMITTED], rps::STATUS_APPROVED).await
}

/// Reviewer sends a submitted document back for changes.
pub async fn revise_rps(db: &DatabaseConnection, id: Uuid) -> Result<rps::Model, ServiceError> {
    transition(db, id, &[rps::STATUS_SUBMITTED], rps::STATUS_REVISED).await
}

/// Put an approved document into use. Any previously active RPS for the same
/// course is archived in the same transaction.
pub async fn activate_rps(db: &DatabaseConnection, id: Uuid) -> Result<rps::Model, ServiceError> {
    let found = find_required(db, id).await?;
    if found.status != rps::STATUS_APPROVED {
        return Err(ServiceError::Validation("rps must be approved before activation".into()));
    }

    let txn = db.begin().await.map_err(|e| ServiceError::Db(e.to_string()))?;

    rps::Entity::update_many()
        .col_expr(rps::Column::Status, sea_orm::sea_query::Expr::value(rps::STATUS_ARCHIVED))
        .filter(rps::Column::KodeMk.eq(found.kode_mk.clone()))
        .filter(rps::Column::IdKurikulum.eq(found.id_kurikulum))
        .filter(rps::Column::Status.eq(rps::STATUS_ACTIVE))
        .exec(&txn)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;

    let mut am: rps::ActiveModel = found.into();
    am.status = Set(rps::STATUS_ACTIVE.into());
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(&txn).await.map_err(|e| ServiceError::Db(e.to_string()))?;

    txn.commit().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(id = %updated.id, kode_mk = %updated.kode_mk, "rps_activated");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn rps_approval_workflow() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;

        let pid = format!("P{}", &Uuid::new_v4().simple().to_string()[..8]);
        let p = models::prodi::create(&db, &pid, "Informatika", Some("S1")).await?;
        let k = models::kurikulum::create(&db, &p.id_prodi, "K2024", "Kurikulum 2024", 2024, None).await?;
        models::matakuliah::create(&db, "IF301", k.id, "Basis Data", None, 3, 5, None, "wajib").await?;

        let r1 = create_rps(&db, "IF301", k.id, "ganjil", "2024/2025", None, None).await?;
        assert_eq!(r1.status, rps::STATUS_DRAFT);

        // approve straight from draft is rejected
        assert!(matches!(approve_rps(&db, r1.id).await, Err(ServiceError::Validation(_))));

        submit_rps(&db, r1.id).await?;
        // editing while submitted is frozen
        let frozen = update_rps(&db, r1.id, RpsUpdate { deskripsi_mk: Some(Some("late".into())), ..Default::default() }).await;
        assert!(matches!(frozen, Err(ServiceError::Validation(_))));

        revise_rps(&db, r1.id).await?;
        // revised documents are editable and resubmittable
        update_rps(&db, r1.id, RpsUpdate { deskripsi_mk: Some(Some("perbaikan".into())), ..Default::default() }).await?;
        submit_rps(&db, r1.id).await?;
        approve_rps(&db, r1.id).await?;
        let active1 = activate_rps(&db, r1.id).await?;
        assert_eq!(active1.status, rps::STATUS_ACTIVE);

        // activating a second document archives the first
        let r2 = create_rps(&db, "IF301", k.id, "genap", "2024/2025", None, None).await?;
        submit_rps(&db, r2.id).await?;
        approve_rps(&db, r2.id).await?;
        activate_rps(&db, r2.id).await?;
        let r1_after = get_rps(&db, r1.id).await?.unwrap();
        assert_eq!(r1_after.status, rps::STATUS_ARCHIVED);

        rps::Entity::delete_by_id(r1.id).exec(&db).await?;
        rps::Entity::delete_by_id(r2.id).exec(&db).await?;
        matakuliah::Entity::delete_by_id(("IF301".to_string(), k.id)).exec(&db).await?;
        models::kurikulum::Entity::delete_by_id(k.id).exec(&db).await?;
        models::prodi::Entity::delete_by_id(p.id_prodi).exec(&db).await?;
        Ok(())
    }
}
