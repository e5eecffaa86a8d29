use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tracing::{info, warn};
use uuid::Uuid;

use models::{kurikulum, mahasiswa};

use crate::errors::ServiceError;

/// Optional fields accepted by `update_mahasiswa`. A curriculum id is carried
/// here only so the service can refuse it: the assignment is permanent.
#[derive(Debug, Default, Clone)]
pub struct MahasiswaUpdate {
    pub nama: Option<String>,
    pub email: Option<String>,
    pub status: Option<String>,
    pub id_kurikulum: Option<Uuid>,
}

/// Create a student. The referenced curriculum must exist and be usable
/// (`aktif` or `approved`); the assignment never changes afterwards.
pub async fn create_mahasiswa(
    db: &DatabaseConnection,
    nim: &str,
    nama: &str,
    email: &str,
    id_prodi: &str,
    id_kurikulum: Uuid,
    angkatan: &str,
) -> Result<mahasiswa::Model, ServiceError> {
    let existing = mahasiswa::Entity::find_by_id(nim.to_string())
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if existing.is_some() {
        return Err(ServiceError::Conflict("nim already exists".into()));
    }

    let k = kurikulum::Entity::find_by_id(id_kurikulum)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("kurikulum"))?;
    if k.status != kurikulum::STATUS_AKTIF && k.status != kurikulum::STATUS_APPROVED {
        return Err(ServiceError::Validation(format!(
            "kurikulum must be active or approved, currently '{}'",
            k.status
        )));
    }

    let created = mahasiswa::create(db, nim, nama, email, id_prodi, id_kurikulum, angkatan).await?;
    info!(nim = %created.nim, id_kurikulum = %created.id_kurikulum, angkatan = %created.angkatan, "mahasiswa_created");
    Ok(created)
}

pub async fn get_mahasiswa(db: &DatabaseConnection, nim: &str) -> Result<Option<mahasiswa::Model>, ServiceError> {
    Ok(mahasiswa::Entity::find_by_id(nim.to_string())
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?)
}

pub async fn list_mahasiswa(
    db: &DatabaseConnection,
    id_prodi: Option<&str>,
    id_kurikulum: Option<Uuid>,
    angkatan: Option<&str>,
    status: Option<&str>,
) -> Result<Vec<mahasiswa::Model>, ServiceError> {
    let mut query = mahasiswa::Entity::find();
    if let Some(p) = id_prodi {
        query = query.filter(mahasiswa::Column::IdProdi.eq(p.to_string()));
    }
    if let Some(k) = id_kurikulum {
        query = query.filter(mahasiswa::Column::IdKurikulum.eq(k));
    }
    if let Some(a) = angkatan {
        query = query.filter(mahasiswa::Column::Angkatan.eq(a.to_string()));
    }
    if let Some(s) = status {
        query = query.filter(mahasiswa::Column::Status.eq(s.to_string()));
    }
    let rows = query.all(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(rows)
}

/// Update a student. Any attempt to move the student to a different
/// curriculum is rejected; the column is never written here.
pub async fn update_mahasiswa(
    db: &DatabaseConnection,
    nim: &str,
    changes: MahasiswaUpdate,
) -> Result<mahasiswa::Model, ServiceError> {
    let found = get_mahasiswa(db, nim)
        .await?
        .ok_or_else(|| ServiceError::not_found("mahasiswa"))?;

    if let Some(requested) = changes.id_kurikulum {
        if requested != found.id_kurikulum {
            warn!(nim = %nim, requested = %requested, current = %found.id_kurikulum, "rejected attempt to change id_kurikulum");
            return Err(ServiceError::Validation(
                "id_kurikulum cannot be changed after creation".into(),
            ));
        }
    }

    let mut am: mahasiswa::ActiveModel = found.into();
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
    if let Some(s) = changes.status {
        mahasiswa::validate_status(&s)?;
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
    use chrono::NaiveDate;

    #[tokio::test]
    async fn kurikulum_assignment_is_immutable() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;

        let pid = format!("P{}", &Uuid::new_v4().simple().to_string()[..8]);
        let p = models::prodi::create(&db, &pid, "Informatika", Some("S1")).await?;
        let sk_date = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();

        let k1 = crate::kurikulum_service::create_kurikulum(&db, &p.id_prodi, "K2020", "Kurikulum 2020", 2020, None).await?;
        crate::kurikulum_service::approve_kurikulum(&db, k1.id, "SK/1", sk_date).await?;
        crate::kurikulum_service::activate_kurikulum(&db, k1.id, false).await?;
        let k2 = crate::kurikulum_service::create_kurikulum(&db, &p.id_prodi, "K2024", "Kurikulum 2024", 2024, None).await?;

        // draft curriculum is not assignable
        let nim = format!("M{}", &Uuid::new_v4().simple().to_string()[..9]);
        let email = format!("{}@kampus.ac.id", nim);
        let rejected = create_mahasiswa(&db, &nim, "Budi", &email, &p.id_prodi, k2.id, "2024").await;
        assert!(matches!(rejected, Err(ServiceError::Validation(_))));

        let m = create_mahasiswa(&db, &nim, "Budi", &email, &p.id_prodi, k1.id, "2024").await?;

        // moving to another curriculum is rejected outright
        let moved = update_mahasiswa(&db, &m.nim, MahasiswaUpdate { id_kurikulum: Some(k2.id), ..Default::default() }).await;
        assert!(matches!(moved, Err(ServiceError::Validation(_))));

        // restating the same assignment is a harmless no-op
        let same = update_mahasiswa(&db, &m.nim, MahasiswaUpdate {
            nama: Some("Budi Santoso".into()),
            id_kurikulum: Some(k1.id),
            ..Default::default()
        }).await?;
        assert_eq!(same.nama, "Budi Santoso");
        assert_eq!(same.id_kurikulum, k1.id);

        mahasiswa::Entity::delete_by_id(m.nim).exec(&db).await?;
        kurikulum::Entity::delete_by_id(k1.id).exec(&db).await?;
        kurikulum::Entity::delete_by_id(k2.id).exec(&db).await?;
        models::prodi::Entity::delete_by_id(p.id_prodi).exec(&db).await?;
        Ok(())
    }
}
