use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tracing::info;

use models::dosen;

use crate::errors::ServiceError;

#[derive(Debug, Default, Clone)]
pub struct DosenUpdate {
    pub nama: Option<String>,
    pub email: Option<String>,
    pub phone: Option<Option<String>>,
    pub status: Option<String>,
}

/// Create a lecturer; `id_dosen` and `nidn` must both be unused.
pub async fn create_dosen(
    db: &DatabaseConnection,
    id_dosen: &str,
    nidn: Option<&str>,
    nama: &str,
    email: &str,
    phone: Option<&str>,
    id_prodi: &str,
) -> Result<dosen::Model, ServiceError> {
    let existing = dosen::Entity::find_by_id(id_dosen.to_string())
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if existing.is_some() {
        return Err(ServiceError::Conflict("id_dosen already exists".into()));
    }
    if let Some(n) = nidn {
        let by_nidn = dosen::Entity::find()
            .filter(dosen::Column::Nidn.eq(n.to_string()))
            .one(db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        if by_nidn.is_some() {
            return Err(ServiceError::Conflict("nidn already exists".into()));
        }
    }

    let created = dosen::create(db, id_dosen, nidn, nama, email, phone, id_prodi).await?;
    info!(id_dosen = %created.id_dosen, id_prodi = %created.id_prodi, "dosen_created");
    Ok(created)
}

pub async fn get_dosen(db: &DatabaseConnection, id_dosen: &str) -> Result<Option<dosen::Model>, ServiceError> {
    Ok(dosen::Entity::find_by_id(id_dosen.to_string())
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?)
}

pub async fn list_dosen(
    db: &DatabaseConnection,
    id_prodi: Option<&str>,
    status: Option<&str>,
) -> Result<Vec<dosen::Model>, ServiceError> {
    let mut query = dosen::Entity::find();
    if let Some(p) = id_prodi {
        query = query.filter(dosen::Column::IdProdi.eq(p.to_string()));
    }
    if let Some(s) = status {
        query = query.filter(dosen::Column::Status.eq(s.to_string()));
    }
    let rows = query.all(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(rows)
}

/// Update contact data or status. Lecturers are never deleted; retirement is
/// status `pensiun`.
pub async fn update_dosen(db: &DatabaseConnection, id_dosen: &str, changes: DosenUpdate) -> Result<dosen::Model, ServiceError> {
    let found = get_dosen(db, id_dosen)
        .await?
        .ok_or_else(|| ServiceError::not_found("dosen"))?;
    let mut am: dosen::ActiveModel = found.into();
    if let Some(n) = changes.nama {
        if n.trim().is_empty() {
            return Err(ServiceError::Validation("nama required".into()));
        }
        am.nama = Set(n);
    }
    if let Some(e) = changes.email {
        if !e.contains('@') {
            return Err(ServiceError::Validation("invalid email".into()));
        }
        am.email = Set(e);
    }
    if let Some(p) = changes.phone { am.phone = Set(p); }
    if let Some(s) = changes.status {
        if !dosen::STATUSES.contains(&s.as_str()) {
            return Err(ServiceError::Validation(format!("invalid status: {}", s)));
        }
        am.status = Set(s);
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use uuid::Uuid;

    #[tokio::test]
    async fn dosen_crud_service() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;

        let pid = format!("P{}", &Uuid::new_v4().simple().to_string()[..8]);
        let p = models::prodi::create(&db, &pid, "Informatika", Some("S1")).await?;

        let id = format!("D{}", &Uuid::new_v4().simple().to_string()[..9]);
        let email = format!("{}@kampus.ac.id", id);
        let d = create_dosen(&db, &id, Some(&format!("N{}", &id[1..])), "Dr. Sari", &email, None, &p.id_prodi).await?;
        assert_eq!(d.status, "aktif");

        let dup = create_dosen(&db, &id, None, "Lain", "lain@kampus.ac.id", None, &p.id_prodi).await;
        assert!(matches!(dup, Err(ServiceError::Conflict(_))));

        let updated = update_dosen(&db, &id, DosenUpdate { status: Some("pensiun".into()), ..Default::default() }).await?;
        assert_eq!(updated.status, "pensiun");

        let bad = update_dosen(&db, &id, DosenUpdate { status: Some("resigned".into()), ..Default::default() }).await;
        assert!(matches!(bad, Err(ServiceError::Validation(_))));

        dosen::Entity::delete_by_id(id).exec(&db).await?;
        models::prodi::Entity::delete_by_id(p.id_prodi).exec(&db).await?;
        Ok(())
    }
}
