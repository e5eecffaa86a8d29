use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, TransactionTrait};
use tracing::info;
use uuid::Uuid;

use models::{enrollment, kelas, mahasiswa};

use crate::errors::ServiceError;

/// Enroll a student into an open class section.
///
/// The seat counter and the new row are written in one transaction, so a full
/// section can never oversell under concurrent requests.
pub async fn enroll(db: &DatabaseConnection, id_kelas: Uuid, nim: &str) -> Result<enrollment::Model, ServiceError> {
    let m = mahasiswa::Entity::find_by_id(nim.to_string())
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("mahasiswa"))?;
    if m.status != "aktif" {
        return Err(ServiceError::Validation(format!("mahasiswa status '{}' cannot enroll", m.status)));
    }

    let txn = db.begin().await.map_err(|e| ServiceError::Db(e.to_string()))?;

    let k = kelas::Entity::find_by_id(id_kelas)
        .one(&txn)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("kelas"))?;
    if k.status != kelas::STATUS_OPEN {
        return Err(ServiceError::Validation(format!("kelas is not open, currently '{}'", k.status)));
    }
    if k.kuota_terisi >= k.kapasitas {
        return Err(ServiceError::Validation("kelas is full".into()));
    }

    let existing = enrollment::Entity::find()
        .filter(enrollment::Column::Nim.eq(nim.to_string()))
        .filter(enrollment::Column::IdKelas.eq(id_kelas))
        .one(&txn)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if existing.is_some() {
        return Err(ServiceError::Conflict("mahasiswa already enrolled in this kelas".into()));
    }

    let now = Utc::now();
    let am = enrollment::ActiveModel {
        id: Set(Uuid::new_v4()),
        nim: Set(nim.to_string()),
        id_kelas: Set(id_kelas),
        tanggal_daftar: Set(now.date_naive()),
        status: Set(enrollment::STATUS_AKTIF.into()),
        nilai_akhir: Set(None),
        nilai_huruf: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };
    let created = am.insert(&txn).await.map_err(|e| ServiceError::Db(e.to_string()))?;

    let kuota = k.kuota_terisi + 1;
    let mut kelas_am: kelas::ActiveModel = k.into();
    kelas_am.kuota_terisi = Set(kuota);
    kelas_am.updated_at = Set(now.into());
    kelas_am.update(&txn).await.map_err(|e| ServiceError::Db(e.to_string()))?;

    txn.commit().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(id = %created.id, nim = %nim, id_kelas = %id_kelas, kuota_terisi = kuota, "enrolled");
    Ok(created)
}

/// Drop an active enrollment and release the seat.
pub async fn drop_enrollment(db: &DatabaseConnection, id: Uuid) -> Result<enrollment::Model, ServiceError> {
    let txn = db.begin().await.map_err(|e| ServiceError::Db(e.to_string()))?;

    let e = enrollment::Entity::find_by_id(id)
        .one(&txn)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("enrollment"))?;
    if e.status != enrollment::STATUS_AKTIF && e.status != enrollment::STATUS_MENGULANG {
        return Err(ServiceError::Validation(format!("enrollment in status '{}' cannot be dropped", e.status)));
    }

    let k = kelas::Entity::find_by_id(e.id_kelas)
        .one(&txn)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("kelas"))?;

    let now = Utc::now();
    let mut am: enrollment::ActiveModel = e.into();
    am.status = Set(enrollment::STATUS_DROP.into());
    am.updated_at = Set(now.into());
    let updated = am.update(&txn).await.map_err(|e| ServiceError::Db(e.to_string()))?;

    let mut kelas_am: kelas::ActiveModel = k.clone().into();
    kelas_am.kuota_terisi = Set((k.kuota_terisi - 1).max(0));
    kelas_am.updated_at = Set(now.into());
    kelas_am.update(&txn).await.map_err(|e| ServiceError::Db(e.to_string()))?;

    txn.commit().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(id = %updated.id, nim = %updated.nim, "enrollment_dropped");
    Ok(updated)
}

pub async fn get_enrollment(db: &DatabaseConnection, id: Uuid) -> Result<Option<enrollment::Model>, ServiceError> {
    Ok(enrollment::Entity::find_by_id(id).one(db).await.map_err(|e| ServiceError::Db(e.to_string()))?)
}

pub async fn list_by_kelas(db: &DatabaseConnection, id_kelas: Uuid) -> Result<Vec<enrollment::Model>, ServiceError> {
    let rows = enrollment::Entity::find()
        .filter(enrollment::Column::IdKelas.eq(id_kelas))
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(rows)
}

pub async fn list_by_mahasiswa(db: &DatabaseConnection, nim: &str) -> Result<Vec<enrollment::Model>, ServiceError> {
    let rows = enrollment::Entity::find()
        .filter(enrollment::Column::Nim.eq(nim.to_string()))
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use chrono::NaiveDate;

    async fn seed_open_kelas(db: &DatabaseConnection, kapasitas: i32) -> Result<(models::prodi::Model, models::kurikulum::Model, kelas::Model), anyhow::Error> {
        let pid = format!("P{}", &Uuid::new_v4().simple().to_string()[..8]);
        let p = models::prodi::create(db, &pid, "Informatika", Some("S1")).await?;
        let k = crate::kurikulum_service::create_kurikulum(db, &p.id_prodi, "K2024", "Kurikulum 2024", 2024, None).await?;
        let sk_date = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        crate::kurikulum_service::approve_kurikulum(db, k.id, "SK/1", sk_date).await?;
        let k = crate::kurikulum_service::activate_kurikulum(db, k.id, false).await?;
        models::matakuliah::create(db, "IF101", k.id, "Dasar Pemrograman", None, 3, 1, None, "wajib").await?;
        let kls = crate::kelas_service::create_kelas(db, "IF101", k.id, None, "A", "ganjil", "2024/2025", kapasitas).await?;
        let kls = crate::kelas_service::open_kelas(db, kls.id).await?;
        Ok((p, k, kls))
    }

    async fn seed_mahasiswa(db: &DatabaseConnection, p: &models::prodi::Model, k: &models::kurikulum::Model) -> Result<mahasiswa::Model, anyhow::Error> {
        let nim = format!("M{}", &Uuid::new_v4().simple().to_string()[..9]);
        let email = format!("{}@kampus.ac.id", nim);
        Ok(crate::mahasiswa_service::create_mahasiswa(db, &nim, "Budi", &email, &p.id_prodi, k.id, "2024").await?)
    }

    #[tokio::test]
    async fn capacity_is_enforced() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let (p, k, kls) = seed_open_kelas(&db, 1).await?;
        let m1 = seed_mahasiswa(&db, &p, &k).await?;
        let m2 = seed_mahasiswa(&db, &p, &k).await?;

        let e1 = enroll(&db, kls.id, &m1.nim).await?;
        let full = enroll(&db, kls.id, &m2.nim).await;
        assert!(matches!(full, Err(ServiceError::Validation(_))));

        // duplicate enrollment conflicts regardless of capacity
        let dup = enroll(&db, kls.id, &m1.nim).await;
        assert!(matches!(dup, Err(ServiceError::Conflict(_) | ServiceError::Validation(_))));

        // dropping releases the seat
        drop_enrollment(&db, e1.id).await?;
        let kls_after = crate::kelas_service::get_kelas(&db, kls.id).await?.unwrap();
        assert_eq!(kls_after.kuota_terisi, 0);
        let e2 = enroll(&db, kls.id, &m2.nim).await?;
        assert_eq!(e2.status, enrollment::STATUS_AKTIF);

        enrollment::Entity::delete_by_id(e1.id).exec(&db).await?;
        enrollment::Entity::delete_by_id(e2.id).exec(&db).await?;
        kelas::Entity::delete_by_id(kls.id).exec(&db).await?;
        models::matakuliah::Entity::delete_by_id(("IF101".to_string(), k.id)).exec(&db).await?;
        mahasiswa::Entity::delete_by_id(m1.nim).exec(&db).await?;
        mahasiswa::Entity::delete_by_id(m2.nim).exec(&db).await?;
        models::kurikulum::Entity::delete_by_id(k.id).exec(&db).await?;
        models::prodi::Entity::delete_by_id(p.id_prodi).exec(&db).await?;
        Ok(())
    }
}
