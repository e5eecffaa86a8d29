use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use models::{cpmk, rps};

use crate::errors::ServiceError;

#[derive(Debug, Default, Clone)]
pub struct CpmkUpdate {
    pub deskripsi: Option<String>,
    pub urutan: Option<Option<i32>>,
}

async fn require_editable_rps(db: &DatabaseConnection, id_rps: Uuid) -> Result<rps::Model, ServiceError> {
    let r = rps::Entity::find_by_id(id_rps)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("rps"))?;
    if !rps::EDITABLE_STATUSES.contains(&r.status.as_str()) {
        return Err(ServiceError::Validation(format!(
            "cpmk can only be edited while rps is draft or revised, currently '{}'",
            r.status
        )));
    }
    Ok(r)
}

/// Add a course learning outcome to a draft/revised syllabus.
pub async fn create_cpmk(
    db: &DatabaseConnection,
    id_rps: Uuid,
    kode_cpmk: &str,
    deskripsi: &str,
    urutan: Option<i32>,
) -> Result<cpmk::Model, ServiceError> {
    require_editable_rps(db, id_rps).await?;

    let existing = cpmk::Entity::find()
        .filter(cpmk::Column::IdRps.eq(id_rps))
        .filter(cpmk::Column::KodeCpmk.eq(kode_cpmk.to_string()))
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if existing.is_some() {
        return Err(ServiceError::Conflict("kode_cpmk already exists in this rps".into()));
    }

    let created = cpmk::create(db, id_rps, kode_cpmk, deskripsi, urutan).await?;
    Ok(created)
}

pub async fn get_cpmk(db: &DatabaseConnection, id: Uuid) -> Result<Option<cpmk::Model>, ServiceError> {
    Ok(cpmk::Entity::find_by_id(id).one(db).await.map_err(|e| ServiceError::Db(e.to_string()))?)
}

pub async fn list_cpmk_by_rps(db: &DatabaseConnection, id_rps: Uuid) -> Result<Vec<cpmk::Model>, ServiceError> {
    let rows = cpmk::Entity::find()
        .filter(cpmk::Column::IdRps.eq(id_rps))
        .order_by_asc(cpmk::Column::Urutan)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(rows)
}

pub async fn update_cpmk(db: &DatabaseConnection, id: Uuid, changes: CpmkUpdate) -> Result<cpmk::Model, ServiceError> {
    let found = get_cpmk(db, id).await?.ok_or_else(|| ServiceError::not_found("cpmk"))?;
    require_editable_rps(db, found.id_rps).await?;

    let mut am: cpmk::ActiveModel = found.into();
    if let Some(d) = changes.deskripsi {
        if d.trim().is_empty() {
            return Err(ServiceError::Validation("deskripsi required".into()));
        }
        am.deskripsi = Set(d);
    }
    if let Some(u) = changes.urutan { am.urutan = Set(u); }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(updated)
}

/// Remove an outcome from a still-editable syllabus.
pub async fn delete_cpmk(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let found = get_cpmk(db, id).await?.ok_or_else(|| ServiceError::not_found("cpmk"))?;
    require_editable_rps(db, found.id_rps).await?;
    cpmk::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn cpmk_frozen_once_rps_submitted() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;

        let pid = format!("P{}", &Uuid::new_v4().simple().to_string()[..8]);
        let p = models::prodi::create(&db, &pid, "Informatika", Some("S1")).await?;
        let k = models::kurikulum::create(&db, &p.id_prodi, "K2024", "Kurikulum 2024", 2024, None).await?;
        models::matakuliah::create(&db, "IF302", k.id, "Jaringan Komputer", None, 3, 5, None, "wajib").await?;
        let r = crate::rps_service::create_rps(&db, "IF302", k.id, "ganjil", "2024/2025", None, None).await?;

        let c = create_cpmk(&db, r.id, "CPMK-1", "Memahami lapisan protokol", Some(1)).await?;
        let dup = create_cpmk(&db, r.id, "CPMK-1", "Duplikat", Some(2)).await;
        assert!(matches!(dup, Err(ServiceError::Conflict(_))));

        crate::rps_service::submit_rps(&db, r.id).await?;
        let frozen = update_cpmk(&db, c.id, CpmkUpdate { deskripsi: Some("late".into()), ..Default::default() }).await;
        assert!(matches!(frozen, Err(ServiceError::Validation(_))));
        let frozen_delete = delete_cpmk(&db, c.id).await;
        assert!(matches!(frozen_delete, Err(ServiceError::Validation(_))));

        cpmk::Entity::delete_by_id(c.id).exec(&db).await?;
        rps::Entity::delete_by_id(r.id).exec(&db).await?;
        models::matakuliah::Entity::delete_by_id(("IF302".to_string(), k.id)).exec(&db).await?;
        models::kurikulum::Entity::delete_by_id(k.id).exec(&db).await?;
        models::prodi::Entity::delete_by_id(p.id_prodi).exec(&db).await?;
        Ok(())
    }
}
